//! UseCase: リレー状態取得処理

use std::sync::Arc;

use crate::domain::{Command, ConnectionRegistry, ConnectionSummary, PlaybackStateRepository};

/// リレーの現在の状態
#[derive(Debug, Clone, PartialEq)]
pub struct RelayState {
    /// 登録中の接続（接続時刻順）
    pub connections: Vec<ConnectionSummary>,
    pub playback: Option<Command>,
}

/// リレー状態取得のユースケース
pub struct GetRelayStateUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    playback_repository: Arc<dyn PlaybackStateRepository>,
}

impl GetRelayStateUseCase {
    /// 新しい GetRelayStateUseCase を作成
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        playback_repository: Arc<dyn PlaybackStateRepository>,
    ) -> Self {
        Self {
            registry,
            playback_repository,
        }
    }

    /// リレー状態を取得
    pub async fn execute(&self) -> RelayState {
        let mut connections = self.registry.snapshot().await;
        connections.sort_by_key(|c| c.connected_at);
        RelayState {
            connections,
            playback: self
                .playback_repository
                .load()
                .await
                .map(|state| state.command),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{CommandType, ConnectionId, MockConnectionRegistry, PlaybackState, Timestamp},
        infrastructure::repository::InMemoryPlaybackStateRepository,
    };

    #[tokio::test]
    async fn test_get_relay_state_sorted_by_connected_at() {
        // テスト項目: 接続一覧が接続時刻順に並び、再生状態と共に返される
        // given (前提条件):
        let early = ConnectionSummary {
            id: ConnectionId::generate(),
            connected_at: Timestamp::new(1000),
            open: true,
        };
        let late = ConnectionSummary {
            id: ConnectionId::generate(),
            connected_at: Timestamp::new(2000),
            open: false,
        };
        let mut registry = MockConnectionRegistry::new();
        registry
            .expect_snapshot()
            .returning(move || vec![late, early]);
        let repository = Arc::new(InMemoryPlaybackStateRepository::new());
        let play = Command::new(CommandType::Play).at(3.0);
        let frame = r#"{"type":"PLAY","currentTime":3}"#;
        repository
            .save(PlaybackState::new(play.clone(), frame))
            .await;
        let usecase = GetRelayStateUseCase::new(Arc::new(registry), repository);

        // when (操作):
        let state = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(state.connections, vec![early, late]);
        assert_eq!(state.playback, Some(play));
    }
}
