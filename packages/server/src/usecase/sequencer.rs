//! 再生状態の読み書きと配信の順序付け

use tokio::sync::{Mutex, MutexGuard};

/// 再生状態に関わる処理を 1 つずつ実行させるためのゲート
///
/// 新規接続（登録 → 状態の読み出し → 再送）と再生コマンドの中継
/// （状態の保存 → ブロードキャスト）はこのゲートの中で実行する。
/// これにより、新規接続が新しいブロードキャストの後に古い状態を受け取ることはない。
/// チャットは状態に触れないのでゲートを通らない。
#[derive(Debug, Default)]
pub struct PlaybackSequencer {
    gate: Mutex<()>,
}

impl PlaybackSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// ゲートに入る（ガードを drop すると抜ける）
    pub async fn enter(&self) -> MutexGuard<'_, ()> {
        self.gate.lock().await
    }
}
