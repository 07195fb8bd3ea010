//! Error types for the watch party client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server refused the WebSocket handshake
    #[error("Server rejected the connection (HTTP {0})")]
    Rejected(u16),

    /// The connection could not be established
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// An established connection dropped
    #[error("Connection lost: {0}")]
    ConnectionLost(String),
}
