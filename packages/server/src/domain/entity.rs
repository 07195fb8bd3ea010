//! Domain entities: the relayed command.

use std::fmt;

/// Type tag of a command as sent on the wire.
///
/// Tags are case-sensitive. Anything outside the known set is kept verbatim
/// in [`CommandType::Unknown`] so it can be reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandType {
    Play,
    Pause,
    Seek,
    Load,
    Chat,
    Unknown(String),
}

impl CommandType {
    pub fn from_wire(tag: &str) -> Self {
        match tag {
            "PLAY" => Self::Play,
            "PAUSE" => Self::Pause,
            "SEEK" => Self::Seek,
            "LOAD" => Self::Load,
            "CHAT" => Self::Chat,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_wire(&self) -> &str {
        match self {
            Self::Play => "PLAY",
            Self::Pause => "PAUSE",
            Self::Seek => "SEEK",
            Self::Load => "LOAD",
            Self::Chat => "CHAT",
            Self::Unknown(tag) => tag,
        }
    }

    /// Whether this command changes the shared playback state
    pub fn is_playback(&self) -> bool {
        matches!(self, Self::Play | Self::Pause | Self::Seek | Self::Load)
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// How the relay treats a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Cached as the last known state and broadcast
    Playback,
    /// Broadcast only
    Chat,
    /// Dropped and reported
    Unknown,
}

/// A playback control or chat command.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub command_type: CommandType,
    pub video_id: Option<String>,
    /// Playback position in seconds
    pub current_time: Option<f64>,
    pub sender: Option<String>,
    pub message: Option<String>,
}

impl Command {
    pub fn new(command_type: CommandType) -> Self {
        Self {
            command_type,
            video_id: None,
            current_time: None,
            sender: None,
            message: None,
        }
    }

    pub fn with_video(mut self, video_id: impl Into<String>) -> Self {
        self.video_id = Some(video_id.into());
        self
    }

    pub fn at(mut self, current_time: f64) -> Self {
        self.current_time = Some(current_time);
        self
    }

    pub fn chat(sender: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            sender: Some(sender.into()),
            message: Some(message.into()),
            ..Self::new(CommandType::Chat)
        }
    }

    pub fn kind(&self) -> CommandKind {
        match self.command_type {
            CommandType::Chat => CommandKind::Chat,
            CommandType::Unknown(_) => CommandKind::Unknown,
            _ => CommandKind::Playback,
        }
    }
}

/// The last playback command together with the frame it arrived in.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub command: Command,
    /// Received text, replayed to newcomers unchanged
    pub frame: String,
}

impl PlaybackState {
    pub fn new(command: Command, frame: impl Into<String>) -> Self {
        Self {
            command,
            frame: frame.into(),
        }
    }
}
