//! UseCase: 通信エラー処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - HandleTransportErrorUseCase::execute() メソッド
//! - 通信エラー時のクローズ要求と登録解除
//!
//! ### どのような状況を想定しているか
//! - 正常系：開いている接続はクローズ要求を受けてから登録解除される
//! - エッジケース：既に閉じている / 既に登録解除済みの接続

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry};

/// 通信エラー処理のユースケース
pub struct HandleTransportErrorUseCase {
    /// ConnectionRegistry（接続管理の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
}

impl HandleTransportErrorUseCase {
    /// 新しい HandleTransportErrorUseCase を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// 通信エラー処理を実行
    ///
    /// 接続がまだ開いていればクローズを要求し、登録を解除する。
    ///
    /// # Returns
    ///
    /// 登録を解除した場合は true、既に解除済みだった場合は false
    pub async fn execute(&self, connection_id: &ConnectionId, error: &str) -> bool {
        tracing::error!(
            "Transport error on connection '{}': {}",
            connection_id,
            error
        );

        if self.registry.is_open(connection_id).await
            && let Err(e) = self.registry.close(connection_id).await
        {
            tracing::debug!("Could not close connection '{}': {}", connection_id, e);
        }

        self.registry.remove(connection_id).await
    }
}
