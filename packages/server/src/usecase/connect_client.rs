//! UseCase: クライアント接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectClientUseCase::execute() メソッド
//! - 接続の登録と、最後の再生状態の再送
//!
//! ### なぜこのテストが必要か
//! - 途中参加したクライアントが現在の再生状態に追いつけることを保証
//! - 再送に失敗しても登録は維持されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：再生状態がある場合の再送
//! - 正常系：再生状態が空の場合は何も送らない
//! - 異常系：登録直後に接続が閉じて再送に失敗

use std::sync::Arc;

use crate::domain::{
    ConnectionId, ConnectionRegistry, MessagePushError, PlaybackStateRepository, PusherChannel,
};

use super::sequencer::PlaybackSequencer;

/// 接続時の再生状態の再送結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateReplay {
    /// まだ再生状態が無いので何も送っていない
    Empty,
    /// 再生状態を送信した（送信したフレーム）
    Sent(String),
    /// 送信に失敗した（登録は維持される）
    Failed(MessagePushError),
}

/// クライアント接続のユースケース
pub struct ConnectClientUseCase {
    /// ConnectionRegistry（接続管理の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
    /// PlaybackStateRepository（再生状態の抽象化）
    playback_repository: Arc<dyn PlaybackStateRepository>,
    sequencer: Arc<PlaybackSequencer>,
}

impl ConnectClientUseCase {
    /// 新しい ConnectClientUseCase を作成
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        playback_repository: Arc<dyn PlaybackStateRepository>,
        sequencer: Arc<PlaybackSequencer>,
    ) -> Self {
        Self {
            registry,
            playback_repository,
            sequencer,
        }
    }

    /// クライアント接続を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 接続の ID（Domain Model）
    /// * `channel` - クライアントへのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// 再生状態の再送結果。接続の登録自体は常に成功する。
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        channel: PusherChannel,
    ) -> StateReplay {
        let _sequenced = self.sequencer.enter().await;

        // 1. Registry に接続を登録
        self.registry.add(connection_id, channel).await;

        // 2. 再生状態があれば、受信したときのフレームのままこの接続にだけ送信
        let Some(state) = self.playback_repository.load().await else {
            return StateReplay::Empty;
        };

        match self.registry.push_to(&connection_id, &state.frame).await {
            Ok(()) => {
                tracing::info!(
                    "Sent current playback state to '{}': {}",
                    connection_id,
                    state.frame
                );
                StateReplay::Sent(state.frame)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to send playback state to '{}': {}",
                    connection_id,
                    e
                );
                StateReplay::Failed(e)
            }
        }
    }
}
