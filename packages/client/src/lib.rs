//! Terminal client for the watch party relay.

pub mod error;
pub mod formatter;
pub mod input;
pub mod player;
pub mod reconnect;
mod runner;
mod session;
mod ui;

pub use runner::run_client;
