//! Domain layer: commands, connection identity and the interfaces the relay needs.

pub mod entity;
pub mod error;
pub mod registry;
pub mod repository;
pub mod value_object;

pub use entity::{Command, CommandKind, CommandType, PlaybackState};
pub use error::{CommandParseError, MessagePushError};
pub use registry::{
    BroadcastReport, ConnectionRegistry, ConnectionSummary, OutboundFrame, PusherChannel,
};
pub use repository::PlaybackStateRepository;
pub use value_object::{CloseInfo, ConnectionId, Timestamp};

#[cfg(test)]
pub use registry::MockConnectionRegistry;
#[cfg(test)]
pub use repository::MockPlaybackStateRepository;
