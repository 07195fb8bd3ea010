//! WebSocket relay server: routing, handlers and startup.

pub mod config;
mod handler;
pub mod origin;
mod server;
mod signal;
pub mod state;

pub use config::{ConfigError, DEFAULT_WEBSOCKET_PATH, ServerConfig};
pub use origin::{OriginPolicy, OriginRejection};
pub use server::{Server, ServerError};
