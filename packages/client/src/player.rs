//! Local view of the shared player.
//!
//! The terminal client has no video surface; it tracks what a browser player
//! would be doing so that `/play` and `/pause` can report a sensible position
//! and `/state` can show where the party is.

use std::time::Instant;

use watchparty_server::domain::{Command, CommandType};

use crate::input::UserInput;

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerView {
    pub video_id: Option<String>,
    /// Position in seconds at `anchored_at`
    position: f64,
    pub playing: bool,
    anchored_at: Instant,
}

impl PlayerView {
    pub fn new(now: Instant) -> Self {
        Self {
            video_id: None,
            position: 0.0,
            playing: false,
            anchored_at: now,
        }
    }

    /// Estimated position at `now`, advancing while playing
    pub fn position_at(&self, now: Instant) -> f64 {
        if self.playing {
            let elapsed = now.saturating_duration_since(self.anchored_at);
            self.position + elapsed.as_secs_f64()
        } else {
            self.position
        }
    }

    /// Apply a command received from the relay.
    ///
    /// Returns `false` for commands that do not touch the player (chat and
    /// unknown types).
    pub fn apply(&mut self, command: &Command, now: Instant) -> bool {
        if !command.command_type.is_playback() {
            return false;
        }

        let current = self.position_at(now);
        // A different video starts playing as soon as it is loaded
        if let Some(video_id) = &command.video_id
            && self.video_id.as_ref() != Some(video_id)
        {
            self.video_id = Some(video_id.clone());
            self.playing = true;
        }

        match command.command_type {
            CommandType::Play => self.playing = true,
            CommandType::Pause => self.playing = false,
            _ => {}
        }
        let fallback = if command.command_type == CommandType::Load {
            0.0
        } else {
            current
        };
        self.position = command.current_time.unwrap_or(fallback);
        self.anchored_at = now;
        true
    }

    /// Build the command to send for a playback input.
    ///
    /// Returns `None` for inputs that are not playback commands.
    pub fn command_for(&self, input: &UserInput, now: Instant) -> Option<Command> {
        let (command_type, video_id, position) = match input {
            UserInput::Load(video_id) => (CommandType::Load, Some(video_id.clone()), 0.0),
            UserInput::Play(at) => (
                CommandType::Play,
                self.video_id.clone(),
                at.unwrap_or_else(|| self.position_at(now)),
            ),
            UserInput::Pause(at) => (
                CommandType::Pause,
                self.video_id.clone(),
                at.unwrap_or_else(|| self.position_at(now)),
            ),
            UserInput::Seek(at) => (CommandType::Seek, self.video_id.clone(), *at),
            _ => return None,
        };

        let command = Command::new(command_type).at(position);
        Some(match video_id {
            Some(video_id) => command.with_video(video_id),
            None => command,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const VIDEO: &str = "dQw4w9WgXcQ";

    #[test]
    fn test_initial_view_is_empty() {
        // テスト項目: 初期状態では動画なし・停止中・位置 0
        // given (前提条件):
        let now = Instant::now();

        // when (操作):
        let view = PlayerView::new(now);

        // then (期待する結果):
        assert_eq!(view.video_id, None);
        assert!(!view.playing);
        assert_eq!(view.position_at(now + Duration::from_secs(10)), 0.0);
    }

    #[test]
    fn test_load_new_video_starts_playing() {
        // テスト項目: 新しい動画の LOAD で動画が切り替わり再生中になる
        // given (前提条件):
        let now = Instant::now();
        let mut view = PlayerView::new(now);
        let load = Command::new(CommandType::Load).with_video(VIDEO).at(0.0);

        // when (操作):
        let applied = view.apply(&load, now);

        // then (期待する結果):
        assert!(applied);
        assert_eq!(view.video_id.as_deref(), Some(VIDEO));
        assert!(view.playing);
        assert_eq!(view.position_at(now + Duration::from_secs(3)), 3.0);
    }

    #[test]
    fn test_pause_and_play_anchor_position() {
        // テスト項目: PAUSE で位置が固定され、PLAY で再び進み始める
        // given (前提条件):
        let now = Instant::now();
        let mut view = PlayerView::new(now);
        let load = Command::new(CommandType::Load).with_video(VIDEO).at(0.0);
        view.apply(&load, now);

        // when (操作):
        view.apply(&Command::new(CommandType::Pause).at(42.0), now);
        let paused_later = view.position_at(now + Duration::from_secs(5));
        view.apply(&Command::new(CommandType::Play).at(42.0), now);

        // then (期待する結果):
        assert_eq!(paused_later, 42.0);
        assert!(view.playing);
        assert_eq!(view.position_at(now + Duration::from_secs(2)), 44.0);
        // videoId の無いコマンドは動画を変えない
        assert_eq!(view.video_id.as_deref(), Some(VIDEO));
    }

    #[test]
    fn test_seek_keeps_play_state() {
        // テスト項目: SEEK は位置だけを変え、再生・停止の状態は保つ
        // given (前提条件):
        let now = Instant::now();
        let mut view = PlayerView::new(now);
        view.apply(&Command::new(CommandType::Pause).at(1.0), now);

        // when (操作):
        view.apply(&Command::new(CommandType::Seek).at(120.0), now);

        // then (期待する結果):
        assert!(!view.playing);
        assert_eq!(view.position_at(now), 120.0);
    }

    #[test]
    fn test_chat_does_not_touch_view() {
        // テスト項目: チャットや未知のコマンドはプレイヤーに影響しない
        // given (前提条件):
        let now = Instant::now();
        let mut view = PlayerView::new(now);
        let before = view.clone();

        // when (操作):
        let chat = view.apply(&Command::chat("alice", "hi"), now);
        let unknown = view.apply(
            &Command::new(CommandType::Unknown("STOP".to_string())).at(5.0),
            now,
        );

        // then (期待する結果):
        assert!(!chat);
        assert!(!unknown);
        assert_eq!(view, before);
    }

    #[test]
    fn test_command_for_uses_current_video_and_position() {
        // テスト項目: 位置指定が無い /play /pause は現在の推定位置で送る
        // given (前提条件):
        let now = Instant::now();
        let mut view = PlayerView::new(now);
        let play = Command::new(CommandType::Play).with_video(VIDEO).at(10.0);
        view.apply(&play, now);
        let later = now + Duration::from_secs(5);

        // when (操作):
        let pause = view.command_for(&UserInput::Pause(None), later);
        let seek = view.command_for(&UserInput::Seek(30.0), later);
        let other = "aaaaaaaaaaa";
        let load = view.command_for(&UserInput::Load(other.to_string()), later);
        let chat = view.command_for(&UserInput::Chat("hi".to_string()), later);

        // then (期待する結果):
        assert_eq!(
            pause,
            Some(Command::new(CommandType::Pause).with_video(VIDEO).at(15.0))
        );
        assert_eq!(
            seek,
            Some(Command::new(CommandType::Seek).with_video(VIDEO).at(30.0))
        );
        assert_eq!(
            load,
            Some(Command::new(CommandType::Load).with_video(other).at(0.0))
        );
        assert_eq!(chat, None);
    }

    #[test]
    fn test_command_for_without_video() {
        // テスト項目: 動画が未ロードでも videoId 無しでコマンドを作れる
        // given (前提条件):
        let now = Instant::now();
        let view = PlayerView::new(now);

        // when (操作):
        let play = view.command_for(&UserInput::Play(Some(3.0)), now);

        // then (期待する結果):
        assert_eq!(play, Some(Command::new(CommandType::Play).at(3.0)));
    }
}
