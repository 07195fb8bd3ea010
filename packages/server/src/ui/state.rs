//! Server state shared with the handlers.

use std::sync::Arc;

use crate::usecase::RelayEngine;

use super::origin::OriginPolicy;

/// Shared application state
pub struct AppState {
    /// RelayEngine（接続のライフサイクルとメッセージ中継）
    pub engine: Arc<RelayEngine>,
    pub origin_policy: OriginPolicy,
}
