//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    infrastructure::dto::{
        http::{ConnectionDetailDto, RelayStateDto},
        websocket::CommandDto,
    },
    ui::state::AppState,
};
use watchparty_shared::time::timestamp_to_jst_rfc3339;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Current connections and the cached playback command
pub async fn relay_state(State(state): State<Arc<AppState>>) -> Json<RelayStateDto> {
    let relay = state.engine.state().await;

    // Domain Model から DTO への変換
    let members: Vec<ConnectionDetailDto> = relay
        .connections
        .iter()
        .map(|c| ConnectionDetailDto {
            id: c.id.to_string(),
            connected_at: timestamp_to_jst_rfc3339(c.connected_at.value()),
            open: c.open,
        })
        .collect();

    Json(RelayStateDto {
        connections: members.len(),
        members,
        playback: relay.playback.map(CommandDto::from),
    })
}
