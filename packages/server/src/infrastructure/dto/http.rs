//! HTTP API response DTOs.

use serde::Serialize;

use super::websocket::CommandDto;

/// One registered connection
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionDetailDto {
    pub id: String,
    pub connected_at: String,
    pub open: bool,
}

/// Debug view of the relay
#[derive(Debug, Clone, Serialize)]
pub struct RelayStateDto {
    pub connections: usize,
    pub members: Vec<ConnectionDetailDto>,
    /// Last playback command, `null` before the first one
    pub playback: Option<CommandDto>,
}
