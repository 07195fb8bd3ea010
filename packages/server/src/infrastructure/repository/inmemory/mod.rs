//! InMemory Repository 実装

pub mod playback;

pub use playback::InMemoryPlaybackStateRepository;
