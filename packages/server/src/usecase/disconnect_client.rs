//! UseCase: クライアント切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectClientUseCase::execute() メソッド
//! - 切断された接続の登録解除
//!
//! ### なぜこのテストが必要か
//! - 切断後の接続がブロードキャスト対象から外れることを保証
//! - 二重に呼ばれても問題が起きないことを確認（冪等性）

use std::sync::Arc;

use crate::domain::{CloseInfo, ConnectionId, ConnectionRegistry};

/// クライアント切断のユースケース
pub struct DisconnectClientUseCase {
    /// ConnectionRegistry（接続管理の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
}

impl DisconnectClientUseCase {
    /// 新しい DisconnectClientUseCase を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// クライアント切断を実行
    ///
    /// # Returns
    ///
    /// 登録を解除した場合は true、既に解除済みだった場合は false
    pub async fn execute(&self, connection_id: &ConnectionId, close_info: &CloseInfo) -> bool {
        let removed = self.registry.remove(connection_id).await;
        if removed {
            tracing::info!(
                "Connection '{}' closed with status {}",
                connection_id,
                close_info
            );
        } else {
            tracing::debug!("Connection '{}' was already unregistered", connection_id);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::registry::WebSocketConnectionRegistry;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_disconnect_removes_connection() {
        // テスト項目: 切断した接続が登録解除され、以後のブロードキャスト対象から外れる
        // given (前提条件):
        let registry = Arc::new(WebSocketConnectionRegistry::new());
        let usecase = DisconnectClientUseCase::new(registry.clone());
        let leaving = ConnectionId::generate();
        let (leaving_tx, _leaving_rx) = mpsc::unbounded_channel();
        let (staying_tx, _staying_rx) = mpsc::unbounded_channel();
        registry.add(leaving, leaving_tx).await;
        registry.add(ConnectionId::generate(), staying_tx).await;

        // when (操作):
        let result = usecase
            .execute(&leaving, &CloseInfo::new(1000, "bye"))
            .await;

        // then (期待する結果):
        assert!(result);
        assert!(!registry.contains(&leaving).await);
        assert_eq!(registry.broadcast("after").await.targets, 1);
    }

    #[tokio::test]
    async fn test_disconnect_is_idempotent() {
        // テスト項目: 二重に切断処理が呼ばれても問題なく処理される
        // given (前提条件):
        let registry = Arc::new(WebSocketConnectionRegistry::new());
        let usecase = DisconnectClientUseCase::new(registry.clone());
        let id = ConnectionId::generate();
        let (tx, _rx) = mpsc::unbounded_channel();
        registry.add(id, tx).await;

        // when (操作):
        let first = usecase.execute(&id, &CloseInfo::abnormal()).await;
        let second = usecase.execute(&id, &CloseInfo::abnormal()).await;

        // then (期待する結果):
        assert!(first);
        assert!(!second);
        assert_eq!(registry.len().await, 0);
    }
}
