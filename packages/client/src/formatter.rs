//! Message formatting utilities for client display.

use std::time::Instant;

use watchparty_server::domain::{Command, CommandType};
use watchparty_shared::time::{format_playback_position, timestamp_to_jst_clock};

use crate::{input::InputError, player::PlayerView};

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a chat line
    ///
    /// # Arguments
    ///
    /// * `command` - The received CHAT command
    /// * `current_name` - This client's name (to mark as "me")
    /// * `received_at` - Unix timestamp when the line arrived (milliseconds)
    pub fn format_chat(command: &Command, current_name: &str, received_at: i64) -> String {
        let sender = command.sender.as_deref().unwrap_or("anonymous");
        let me_suffix = if sender == current_name { " (me)" } else { "" };
        format!(
            "\n[{}] @{}{}: {}\n",
            timestamp_to_jst_clock(received_at),
            sender,
            me_suffix,
            command.message.as_deref().unwrap_or_default()
        )
    }

    /// Format a playback command
    pub fn format_playback(command: &Command, received_at: i64) -> String {
        let position = command
            .current_time
            .map(format_playback_position)
            .unwrap_or_else(|| "-".to_string());
        let action = match &command.command_type {
            CommandType::Play => format!("▶ play from {}", position),
            CommandType::Pause => format!("⏸ pause at {}", position),
            CommandType::Seek => format!("⇥ seek to {}", position),
            CommandType::Load => format!(
                "⏏ load {}",
                command.video_id.as_deref().unwrap_or("(no video)")
            ),
            other => format!("{} {}", other, position),
        };
        format!("\n[{}] {}\n", timestamp_to_jst_clock(received_at), action)
    }

    /// Format the local player view for `/state`
    pub fn format_player_view(view: &PlayerView, now: Instant) -> String {
        let video = match &view.video_id {
            Some(video_id) => format!("https://youtu.be/{}", video_id),
            None => "(no video loaded)".to_string(),
        };
        let status = if view.playing { "playing" } else { "paused" };
        format!(
            "\n  video:    {}\n  status:   {}\n  position: {}\n",
            video,
            status,
            format_playback_position(view.position_at(now))
        )
    }

    pub fn format_input_error(error: &InputError) -> String {
        format!("\n! {} (type /help for commands)\n", error)
    }

    pub fn format_help() -> String {
        [
            "",
            "  /load <youtube url or id>  load a video for everyone",
            "  /play [seconds]            resume playback",
            "  /pause [seconds]           pause playback",
            "  /seek <seconds>            jump to a position (90, 1:30)",
            "  /state                     show the local player view",
            "  /quit                      leave the party",
            "  anything else              send a chat message",
            "",
        ]
        .join("\n")
    }

    /// Format a binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
