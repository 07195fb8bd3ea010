//! Domain errors.

use thiserror::Error;

/// Inbound text could not be read as a command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("malformed command: {0}")]
    Malformed(String),
}

/// Delivering a frame to (or closing) a single connection failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection '{0}' is not registered")]
    ConnectionNotFound(String),

    #[error("connection '{0}' is already closed")]
    ConnectionClosed(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),
}
