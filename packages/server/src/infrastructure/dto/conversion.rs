//! Conversion logic between DTOs and domain entities.

use crate::domain::{Command, CommandParseError, CommandType};
use crate::infrastructure::dto::websocket::CommandDto;

// ========================================
// DTO → Domain Entity
// ========================================

impl From<CommandDto> for Command {
    fn from(dto: CommandDto) -> Self {
        Self {
            command_type: CommandType::from_wire(&dto.r#type),
            video_id: dto.video_id,
            current_time: dto.current_time,
            sender: dto.sender,
            message: dto.message,
        }
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<Command> for CommandDto {
    fn from(model: Command) -> Self {
        Self {
            r#type: model.command_type.as_wire().to_string(),
            video_id: model.video_id,
            current_time: model.current_time,
            sender: model.sender,
            message: model.message,
        }
    }
}

// ========================================
// Wire text ⇄ Domain Entity
// ========================================

/// Parse one inbound text frame into a command.
///
/// Fails when the text is not a JSON object, when `type` is missing or not a
/// string, or when a known field carries the wrong JSON type.
pub fn decode_command(raw: &str) -> Result<Command, CommandParseError> {
    serde_json::from_str::<CommandDto>(raw)
        .map(Command::from)
        .map_err(|e| CommandParseError::Malformed(e.to_string()))
}

/// Serialize a command into a text frame, omitting absent fields
pub fn encode_command(command: &Command) -> Result<String, serde_json::Error> {
    serde_json::to_string(&CommandDto::from(command.clone()))
}
