//! InMemory Playback State Repository 実装
//!
//! ドメイン層が定義する PlaybackStateRepository trait の具体的な実装。
//! プロセス内のメモリにのみ保持し、永続化はしません（再起動で消える）。

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{PlaybackState, PlaybackStateRepository};

/// インメモリ Playback State Repository 実装
#[derive(Default)]
pub struct InMemoryPlaybackStateRepository {
    /// 最後の再生コマンドと受信したフレーム
    last_state: RwLock<Option<PlaybackState>>,
}

impl InMemoryPlaybackStateRepository {
    /// 空の状態で作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlaybackStateRepository for InMemoryPlaybackStateRepository {
    async fn load(&self) -> Option<PlaybackState> {
        self.last_state.read().await.clone()
    }

    async fn save(&self, state: PlaybackState) {
        let mut last_state = self.last_state.write().await;
        *last_state = Some(state);
    }
}
