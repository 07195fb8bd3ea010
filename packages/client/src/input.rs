//! Parsing of lines typed at the prompt.
//!
//! Lines starting with a known slash command control playback; everything
//! else is chat.

use thiserror::Error;

/// Length of a YouTube video id
const VIDEO_ID_LEN: usize = 11;

/// URL markers followed by a video id
const VIDEO_ID_MARKERS: [&str; 6] = ["watch?v=", "&v=", "youtu.be/", "embed/", "shorts/", "/v/"];

/// What the user asked for
#[derive(Debug, Clone, PartialEq)]
pub enum UserInput {
    /// Load a video (by id) from the start
    Load(String),
    /// Resume playback, optionally from a position in seconds
    Play(Option<f64>),
    /// Pause playback, optionally at a position in seconds
    Pause(Option<f64>),
    Seek(f64),
    /// Print the local player view
    State,
    Help,
    Quit,
    Chat(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("/{0} needs an argument")]
    MissingArgument(&'static str),

    #[error("'{0}' is not a valid position in seconds")]
    InvalidSeconds(String),

    #[error("'{0}' is not a YouTube URL or video id")]
    InvalidVideo(String),
}

/// Parse one line typed by the user
pub fn parse_input(line: &str) -> Result<UserInput, InputError> {
    let line = line.trim();
    let (head, arg) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, Some(rest.trim()).filter(|rest| !rest.is_empty())),
        None => (line, None),
    };

    match head {
        "/load" => {
            let arg = arg.ok_or(InputError::MissingArgument("load"))?;
            extract_video_id(arg)
                .map(UserInput::Load)
                .ok_or_else(|| InputError::InvalidVideo(arg.to_string()))
        }
        "/play" => Ok(UserInput::Play(arg.map(parse_seconds).transpose()?)),
        "/pause" => Ok(UserInput::Pause(arg.map(parse_seconds).transpose()?)),
        "/seek" => {
            let arg = arg.ok_or(InputError::MissingArgument("seek"))?;
            Ok(UserInput::Seek(parse_seconds(arg)?))
        }
        "/state" => Ok(UserInput::State),
        "/help" => Ok(UserInput::Help),
        "/quit" | "/exit" => Ok(UserInput::Quit),
        _ => Ok(UserInput::Chat(line.to_string())),
    }
}

/// Accepts plain seconds (`90`, `12.5`) or a clock (`1:30`, `1:02:03`)
fn parse_seconds(arg: &str) -> Result<f64, InputError> {
    let invalid = || InputError::InvalidSeconds(arg.to_string());

    let seconds = if arg.contains(':') {
        let mut total = 0.0;
        for part in arg.split(':') {
            let value: f64 = part.parse().map_err(|_| invalid())?;
            total = total * 60.0 + value;
        }
        total
    } else {
        arg.parse().map_err(|_| invalid())?
    };

    if seconds.is_finite() && seconds >= 0.0 {
        Ok(seconds)
    } else {
        Err(invalid())
    }
}

/// Extract the video id from a YouTube URL, or accept a bare id
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();
    if is_video_id(input) {
        return Some(input.to_string());
    }

    VIDEO_ID_MARKERS.iter().find_map(|marker| {
        let start = input.find(marker)? + marker.len();
        let candidate = input[start..]
            .split(['&', '?', '#', '/'])
            .next()
            .unwrap_or_default();
        is_video_id(candidate).then(|| candidate.to_string())
    })
}

fn is_video_id(candidate: &str) -> bool {
    candidate.len() == VIDEO_ID_LEN
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
