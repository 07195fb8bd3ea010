//! Repository trait 定義
//!
//! 最後に観測した再生状態（キャッシュ）へのアクセスを抽象化します。

use async_trait::async_trait;

use super::PlaybackState;

/// Playback State Repository trait
///
/// 新しく接続したクライアントに再送する「最後の再生コマンド」を受信したフレームと共に 1 件だけ保持する。
/// 保存は丸ごと置き換え（last-write-wins）で、明示的に消去されることはない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlaybackStateRepository: Send + Sync {
    /// 最後の再生コマンドを取得（まだ無ければ None）
    async fn load(&self) -> Option<PlaybackState>;

    /// 最後の再生コマンドを置き換え
    async fn save(&self, state: PlaybackState);
}
