use serde::{Deserialize, Serialize};

pub const MAX_CHAT_MESSAGE_CHARS: usize = 4_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageInputError {
    #[error("message must not be empty")]
    EmptyMessage,
    #[error("message exceeds {MAX_CHAT_MESSAGE_CHARS} characters")]
    MessageTooLong,
}

/// Trims surrounding whitespace and collapses Windows line endings. The
/// length limit mirrors the backend validator so oversized input fails
/// before it leaves the client.
pub fn normalize_chat_message_text(raw: &str) -> Result<String, MessageInputError> {
    let normalized = raw.replace("\r\n", "\n");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        return Err(MessageInputError::EmptyMessage);
    }
    if trimmed.chars().count() > MAX_CHAT_MESSAGE_CHARS {
        return Err(MessageInputError::MessageTooLong);
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatMessageDirection {
    Outbound,
    Inbound,
    System,
}

impl ChatMessageDirection {
    pub fn from_wire(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "outbound" | "sent" => Self::Outbound,
            "inbound" | "received" => Self::Inbound,
            _ => Self::System,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Outbound => "outbound",
            Self::Inbound => "inbound",
            Self::System => "system",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_chat_message_trims_whitespace() {
        let normalized = normalize_chat_message_text("  hello there \n").expect("valid message");
        assert_eq!(normalized, "hello there");
    }

    #[test]
    fn normalize_chat_message_collapses_crlf() {
        let normalized = normalize_chat_message_text("line one\r\nline two").expect("valid");
        assert_eq!(normalized, "line one\nline two");
    }

    #[test]
    fn normalize_chat_message_rejects_blank_input() {
        assert_eq!(
            normalize_chat_message_text("  \r\n "),
            Err(MessageInputError::EmptyMessage)
        );
    }

    #[test]
    fn normalize_chat_message_enforces_length_limit() {
        let oversized = "x".repeat(MAX_CHAT_MESSAGE_CHARS + 1);
        assert_eq!(
            normalize_chat_message_text(&oversized),
            Err(MessageInputError::MessageTooLong)
        );
    }

    #[test]
    fn direction_projection_defaults_to_system() {
        assert_eq!(
            ChatMessageDirection::from_wire("SENT"),
            ChatMessageDirection::Outbound
        );
        assert_eq!(
            ChatMessageDirection::from_wire("mystery"),
            ChatMessageDirection::System
        );
    }
}
