//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::CommandParseError;

/// 受信メッセージを中継できなかった理由
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// スキーマに合わない入力
    #[error(transparent)]
    MalformedMessage(#[from] CommandParseError),

    /// スキーマとしては正しいが type が未知
    #[error("unknown command type '{0}'")]
    UnknownCommand(String),
}
