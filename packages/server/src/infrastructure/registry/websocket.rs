//! WebSocket を使った ConnectionRegistry 実装
//!
//! ## 責務
//!
//! - 接続ごとの `PusherChannel`（送信キュー）を管理
//! - クライアントへのメッセージ送信（push_to, broadcast）とクローズ要求
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `PusherChannel` を受け取り、メッセージ送信に使用します。
//!
//! ブロードキャストは読み取りロックを保持したまま全接続へ送信します。
//! 送信はキューへの追加のみで待ちが発生しないため、ロック保持時間は短く済みます。
//! `remove` は書き込みロックを取るので、削除が完了した接続に後から配信されることはありません。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use watchparty_shared::time::get_jst_timestamp;

use crate::domain::{
    BroadcastReport, ConnectionId, ConnectionRegistry, ConnectionSummary, MessagePushError,
    OutboundFrame, PusherChannel, Timestamp,
};

/// 登録中の接続
struct RegisteredConnection {
    channel: PusherChannel,
    connected_at: Timestamp,
}

/// WebSocket を使った ConnectionRegistry 実装
///
/// ## 使用例
///
/// ```ignore
/// let registry = WebSocketConnectionRegistry::new();
/// let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
/// registry.add(connection_id, tx).await;
///
/// // 全接続に送信
/// registry.broadcast("{\"type\":\"PLAY\",\"currentTime\":1.5}").await;
/// ```
#[derive(Default)]
pub struct WebSocketConnectionRegistry {
    /// Key: ConnectionId, Value: 送信キューと接続時刻
    connections: RwLock<HashMap<ConnectionId, RegisteredConnection>>,
}

impl WebSocketConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl WebSocketConnectionRegistry {
    pub(crate) async fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.connections.read().await.contains_key(connection_id)
    }

    pub(crate) async fn len(&self) -> usize {
        self.connections.read().await.len()
    }
}

#[async_trait]
impl ConnectionRegistry for WebSocketConnectionRegistry {
    async fn add(&self, connection_id: ConnectionId, channel: PusherChannel) {
        let entry = RegisteredConnection {
            channel,
            connected_at: Timestamp::new(get_jst_timestamp()),
        };
        let mut connections = self.connections.write().await;
        if connections.insert(connection_id, entry).is_some() {
            tracing::warn!(
                "Connection '{}' was registered twice, replaced",
                connection_id
            );
        }
        tracing::debug!(
            "Connection '{}' registered ({} connected)",
            connection_id,
            connections.len()
        );
    }

    async fn remove(&self, connection_id: &ConnectionId) -> bool {
        let mut connections = self.connections.write().await;
        let removed = connections.remove(connection_id).is_some();
        if removed {
            tracing::debug!(
                "Connection '{}' unregistered ({} connected)",
                connection_id,
                connections.len()
            );
        }
        removed
    }

    async fn is_open(&self, connection_id: &ConnectionId) -> bool {
        self.connections
            .read()
            .await
            .get(connection_id)
            .is_some_and(|c| !c.channel.is_closed())
    }

    async fn snapshot(&self) -> Vec<ConnectionSummary> {
        self.connections
            .read()
            .await
            .iter()
            .map(|(id, c)| ConnectionSummary {
                id: *id,
                connected_at: c.connected_at,
                open: !c.channel.is_closed(),
            })
            .collect()
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let connections = self.connections.read().await;

        let Some(connection) = connections.get(connection_id) else {
            return Err(MessagePushError::ConnectionNotFound(
                connection_id.to_string(),
            ));
        };
        connection
            .channel
            .send(OutboundFrame::Text(content.to_string()))
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed message to connection '{}'", connection_id);
        Ok(())
    }

    async fn broadcast(&self, content: &str) -> BroadcastReport {
        let connections = self.connections.read().await;
        let mut report = BroadcastReport {
            targets: connections.len(),
            ..BroadcastReport::default()
        };

        for (id, connection) in connections.iter() {
            if connection.channel.is_closed() {
                tracing::debug!("Connection '{}' is closed, skipping", id);
                report.skipped += 1;
                continue;
            }
            // ブロードキャストでは一部の送信失敗を許容
            match connection
                .channel
                .send(OutboundFrame::Text(content.to_string()))
            {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    tracing::warn!("Failed to push message to connection '{}': {}", id, e);
                    report.failed += 1;
                }
            }
        }

        report
    }

    async fn close(&self, connection_id: &ConnectionId) -> Result<(), MessagePushError> {
        let connections = self.connections.read().await;

        let Some(connection) = connections.get(connection_id) else {
            return Err(MessagePushError::ConnectionNotFound(
                connection_id.to_string(),
            ));
        };
        connection
            .channel
            .send(OutboundFrame::Close)
            .map_err(|_| MessagePushError::ConnectionClosed(connection_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - WebSocketConnectionRegistry の登録・削除・送信
    // - push_to: 特定の接続への送信
    // - broadcast: 全接続への送信と部分失敗の扱い
    // - close: クローズ要求
    //
    // 【なぜこのテストが必要か】
    // - Registry はリレーの中核で、全ての配信がここを通る
    // - 並行した登録・削除・配信で壊れないことを保証する必要がある
    //
    // 【どのようなシナリオをテストするか】
    // 1. 登録・削除（冪等性）
    // 2. push_to の成功・失敗ケース
    // 3. broadcast の成功・部分失敗ケース
    // 4. 削除済みの接続には配信されない
    // 5. 並行した登録・削除・配信
    // ========================================

    fn text(frame: Option<OutboundFrame>) -> Option<String> {
        match frame {
            Some(OutboundFrame::Text(text)) => Some(text),
            _ => None,
        }
    }

    #[tokio::test]
    async fn test_add_and_remove() {
        // テスト項目: 登録した接続を削除でき、二重削除は no-op になる
        // given (前提条件):
        let registry = WebSocketConnectionRegistry::new();
        let id = ConnectionId::generate();
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        registry.add(id, tx).await;
        let contained = registry.contains(&id).await;
        let first = registry.remove(&id).await;
        let second = registry.remove(&id).await;

        // then (期待する結果):
        assert!(contained);
        assert!(first);
        assert!(!second);
        assert_eq!(registry.len().await, 0);
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定の接続にメッセージを送信できる
        // given (前提条件):
        let registry = WebSocketConnectionRegistry::new();
        let id = ConnectionId::generate();
        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.add(id, tx).await;

        // when (操作):
        let result = registry.push_to(&id, "Hello").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(text(rx.recv().await), Some("Hello".to_string()));
    }

    #[tokio::test]
    async fn test_push_to_connection_not_found() {
        // テスト項目: 未登録の接続への送信はエラーを返す
        // given (前提条件):
        let registry = WebSocketConnectionRegistry::new();

        // when (操作):
        let result = registry.push_to(&ConnectionId::generate(), "Hello").await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(MessagePushError::ConnectionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_push_to_closed_connection_fails() {
        // テスト項目: 受信側が閉じた接続への送信は PushFailed になる
        // given (前提条件):
        let registry = WebSocketConnectionRegistry::new();
        let id = ConnectionId::generate();
        let (tx, rx) = mpsc::unbounded_channel();
        registry.add(id, tx).await;
        drop(rx);

        // when (操作):
        let result = registry.push_to(&id, "Hello").await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::PushFailed(_))));
        assert!(registry.contains(&id).await);
        assert!(!registry.is_open(&id).await);
    }

    #[tokio::test]
    async fn test_broadcast_success() {
        // テスト項目: 全ての接続にメッセージをブロードキャストできる
        // given (前提条件):
        let registry = WebSocketConnectionRegistry::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        registry.add(ConnectionId::generate(), tx1).await;
        registry.add(ConnectionId::generate(), tx2).await;

        // when (操作):
        let report = registry.broadcast("Broadcast message").await;

        // then (期待する結果):
        assert_eq!(report.targets, 2);
        assert_eq!(report.delivered, 2);
        assert_eq!(
            text(rx1.recv().await),
            Some("Broadcast message".to_string())
        );
        assert_eq!(
            text(rx2.recv().await),
            Some("Broadcast message".to_string())
        );
    }

    #[tokio::test]
    async fn test_broadcast_skips_closed_connections() {
        // テスト項目: 閉じた接続があっても他の接続には配信され、閉じた接続は削除されない
        // given (前提条件):
        let registry = WebSocketConnectionRegistry::new();
        let closed_id = ConnectionId::generate();
        let (tx_closed, rx_closed) = mpsc::unbounded_channel();
        let (tx_open, mut rx_open) = mpsc::unbounded_channel();
        registry.add(closed_id, tx_closed).await;
        registry.add(ConnectionId::generate(), tx_open).await;
        drop(rx_closed);

        // when (操作):
        let report = registry.broadcast("still here").await;

        // then (期待する結果):
        assert_eq!(report.targets, 2);
        assert_eq!(report.delivered, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(text(rx_open.recv().await), Some("still here".to_string()));
        assert!(registry.contains(&closed_id).await);
    }

    #[tokio::test]
    async fn test_broadcast_empty_registry() {
        // テスト項目: 接続が無くてもエラーにならない
        // given (前提条件):
        let registry = WebSocketConnectionRegistry::new();

        // when (操作):
        let report = registry.broadcast("Message").await;

        // then (期待する結果):
        assert_eq!(report, BroadcastReport::default());
    }

    #[tokio::test]
    async fn test_removed_connection_receives_nothing() {
        // テスト項目: 削除済みの接続にはブロードキャストが届かない
        // given (前提条件):
        let registry = WebSocketConnectionRegistry::new();
        let id = ConnectionId::generate();
        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.add(id, tx).await;
        registry.remove(&id).await;

        // when (操作):
        let report = registry.broadcast("too late").await;

        // then (期待する結果):
        assert_eq!(report.targets, 0);
        // registry が sender を破棄したのでチャンネルは閉じている
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_close_sends_close_frame() {
        // テスト項目: close でクローズ要求がキューに入る
        // given (前提条件):
        let registry = WebSocketConnectionRegistry::new();
        let id = ConnectionId::generate();
        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.add(id, tx).await;

        // when (操作):
        let result = registry.close(&id).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some(OutboundFrame::Close));
    }

    #[tokio::test]
    async fn test_close_already_closed_connection() {
        // テスト項目: 既に閉じた接続の close は ConnectionClosed を返す
        // given (前提条件):
        let registry = WebSocketConnectionRegistry::new();
        let id = ConnectionId::generate();
        let (tx, rx) = mpsc::unbounded_channel();
        registry.add(id, tx).await;
        drop(rx);

        // when (操作):
        let result = registry.close(&id).await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::ConnectionClosed(_))));
    }

    #[tokio::test]
    async fn test_snapshot_lists_members() {
        // テスト項目: snapshot が登録中の接続を全て返す
        // given (前提条件):
        let registry = WebSocketConnectionRegistry::new();
        let a = ConnectionId::generate();
        let b = ConnectionId::generate();
        let (tx_a, _rx_a) = mpsc::unbounded_channel();
        let (tx_b, rx_b) = mpsc::unbounded_channel();
        registry.add(a, tx_a).await;
        registry.add(b, tx_b).await;
        drop(rx_b);

        // when (操作):
        let snapshot = registry.snapshot().await;

        // then (期待する結果):
        assert_eq!(snapshot.len(), 2);
        let summary_a = snapshot.iter().find(|s| s.id == a).unwrap();
        let summary_b = snapshot.iter().find(|s| s.id == b).unwrap();
        assert!(summary_a.open);
        assert!(!summary_b.open);
        assert!(summary_a.connected_at.value() > 0);
    }

    #[tokio::test]
    async fn test_concurrent_churn_and_broadcast() {
        // テスト項目: 登録・削除とブロードキャストが並行しても壊れない
        // given (前提条件):
        let registry = Arc::new(WebSocketConnectionRegistry::new());
        let (stable_tx, mut stable_rx) = mpsc::unbounded_channel();
        registry.add(ConnectionId::generate(), stable_tx).await;

        // when (操作):
        let churn = {
            let registry = registry.clone();
            tokio::spawn(async move {
                for _ in 0..200 {
                    let id = ConnectionId::generate();
                    let (tx, _rx) = mpsc::unbounded_channel();
                    registry.add(id, tx).await;
                    tokio::task::yield_now().await;
                    registry.remove(&id).await;
                }
            })
        };
        let broadcaster = {
            let registry = registry.clone();
            tokio::spawn(async move {
                for i in 0..200 {
                    registry.broadcast(&format!("message {}", i)).await;
                    tokio::task::yield_now().await;
                }
            })
        };
        churn.await.unwrap();
        broadcaster.await.unwrap();

        // then (期待する結果): 常駐している接続は全てのメッセージを順番通りに受け取る
        assert_eq!(registry.len().await, 1);
        for i in 0..200 {
            assert_eq!(text(stable_rx.recv().await), Some(format!("message {}", i)));
        }
    }
}
