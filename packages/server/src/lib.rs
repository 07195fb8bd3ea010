//! Watch party relay server.
//!
//! Keeps every connected client on the same video playback state and relays
//! a shared chat stream over WebSocket.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
