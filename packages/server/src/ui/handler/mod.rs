//! Request handlers for the HTTP API and the WebSocket endpoint.

mod http;
mod websocket;

pub use http::{health_check, relay_state};
pub use websocket::websocket_handler;
