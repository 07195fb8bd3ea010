//! UseCase: メッセージ中継処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayMessageUseCase::execute() メソッド
//! - 受信テキストのパース・分類、再生状態の更新、ブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 再生コマンドだけが再生状態を更新し、チャットは更新しないことを保証
//! - 受信したテキストが加工されずにそのまま配信されることを確認
//! - 不正な入力・未知のコマンドが配信されないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：再生コマンド（PLAY / PAUSE / SEEK / LOAD）とチャット
//! - 異常系：JSON として不正、未知の type
//! - エッジケース：送信者自身も配信対象に含まれる

use std::sync::Arc;

use crate::{
    domain::{
        BroadcastReport, CommandKind, CommandType, ConnectionId, ConnectionRegistry, PlaybackState,
        PlaybackStateRepository,
    },
    infrastructure::dto::conversion::decode_command,
};

use super::{error::RelayError, sequencer::PlaybackSequencer};

/// 中継に成功したメッセージの結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayOutcome {
    pub command_type: CommandType,
    /// 再生状態を更新したか
    pub state_updated: bool,
    pub report: BroadcastReport,
}

/// メッセージ中継のユースケース
pub struct RelayMessageUseCase {
    /// ConnectionRegistry（接続管理の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
    /// PlaybackStateRepository（再生状態の抽象化）
    playback_repository: Arc<dyn PlaybackStateRepository>,
    sequencer: Arc<PlaybackSequencer>,
}

impl RelayMessageUseCase {
    /// 新しい RelayMessageUseCase を作成
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

    /// メッセージ中継を実行
    ///
    /// # Arguments
    ///
    /// * `from` - 送信元の接続 ID（ログ用）
    /// * `raw` - 受信したテキスト。配信時はこのテキストをそのまま送る
    ///
    /// # Returns
    ///
    /// * `Ok(RelayOutcome)` - ブロードキャストした
    /// * `Err(RelayError)` - 破棄した（ブロードキャストも状態更新もしていない）
    pub async fn execute(
        &self,
        from: &ConnectionId,
        raw: &str,
    ) -> Result<RelayOutcome, RelayError> {
        // 1. パース
        let command = decode_command(raw)?;
        let command_type = command.command_type.clone();

        // 2. 分類して処理
        match command.kind() {
            CommandKind::Playback => {
                let _sequenced = self.sequencer.enter().await;
                self.playback_repository
                    .save(PlaybackState::new(command, raw))
                    .await;
                let report = self.registry.broadcast(raw).await;
                tracing::info!(
                    "Broadcasted {} from '{}' to {}/{} connections",
                    command_type,
                    from,
                    report.delivered,
                    report.targets
                );
                Ok(RelayOutcome {
                    command_type,
                    state_updated: true,
                    report,
                })
            }
            CommandKind::Chat => {
                let report = self.registry.broadcast(raw).await;
                tracing::info!(
                    "Broadcasted CHAT from '{}' to {}/{} connections",
                    from,
                    report.delivered,
                    report.targets
                );
                Ok(RelayOutcome {
                    command_type,
                    state_updated: false,
                    report,
                })
            }
            CommandKind::Unknown => Err(RelayError::UnknownCommand(
                command_type.as_wire().to_string(),
            )),
        }
    }
}
