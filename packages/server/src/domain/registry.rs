//! Connection Registry trait 定義
//!
//! リレーが接続中のクライアントを管理するためのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, Timestamp};

/// A frame queued for delivery to one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundFrame {
    Text(String),
    /// Ask the connection's pusher to send a close frame and stop
    Close,
}

/// Sending half of a connection's outbound queue.
///
/// The transport drains the receiving half into the socket. Once the
/// receiver is gone the connection counts as closed.
pub type PusherChannel = mpsc::UnboundedSender<OutboundFrame>;

/// Point-in-time view of one registered connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionSummary {
    pub id: ConnectionId,
    pub connected_at: Timestamp,
    pub open: bool,
}

/// Outcome of one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Members seen while iterating
    pub targets: usize,
    pub delivered: usize,
    /// Members skipped because they were already closed
    pub skipped: usize,
    pub failed: usize,
}

/// Connection Registry trait
///
/// 接続の追加・削除とブロードキャストを、並行に呼び出されても安全に行う。
///
/// ## 契約
///
/// - `add` / `remove` は失敗しない。`remove` は存在しない接続に対して no-op
/// - `broadcast` の途中で追加された接続は受信するかどうか保証しない
/// - `remove` が完了した接続には以後いかなるブロードキャストも届かない
/// - 個々の送信失敗はブロードキャスト全体を止めず、接続の削除も行わない
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// 接続を登録
    async fn add(&self, connection_id: ConnectionId, channel: PusherChannel);

    /// 接続を削除（削除した場合は true）
    async fn remove(&self, connection_id: &ConnectionId) -> bool;

    /// 登録中の接続が送信可能か（未登録の場合は false）
    async fn is_open(&self, connection_id: &ConnectionId) -> bool;

    /// 登録中の接続一覧（順序は不定）
    async fn snapshot(&self) -> Vec<ConnectionSummary>;

    /// 特定の接続にテキストを送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// 登録中の全ての接続にテキストを送信
    async fn broadcast(&self, content: &str) -> BroadcastReport;

    /// 接続のクローズを要求
    async fn close(&self, connection_id: &ConnectionId) -> Result<(), MessagePushError>;
}
