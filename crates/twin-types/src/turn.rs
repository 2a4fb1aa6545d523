//! Conversation turn types for Twin.
//!
//! A [`Turn`] is one persisted message of a conversation. The on-disk layout
//! is the durable contract: an ordered JSON array of
//! `{"role", "content"[, "timestamp"]}` objects, in that field order.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::llm::Message;

// Turns share the role vocabulary of LLM messages.
pub use crate::llm::MessageRole as TurnRole;

/// One message in a conversation.
///
/// The timestamp is kept as the exact string that was written so a
/// load/save cycle reproduces the record byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl Turn {
    /// A turn without a timestamp.
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: None,
        }
    }

    /// A turn stamped with the current UTC time (RFC 3339).
    pub fn now(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Some(Utc::now().to_rfc3339()),
        }
    }

    /// The role/content pair replayed to the completion API.
    pub fn to_message(&self) -> Message {
        Message {
            role: self.role,
            content: self.content.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_field_order() {
        let turn = Turn {
            role: TurnRole::User,
            content: "hi".to_string(),
            timestamp: Some("2025-01-01T00:00:00+00:00".to_string()),
        };
        let json = serde_json::to_string(&turn).unwrap();
        assert_eq!(
            json,
            r#"{"role":"user","content":"hi","timestamp":"2025-01-01T00:00:00+00:00"}"#
        );
    }

    #[test]
    fn test_turn_without_timestamp_omits_field() {
        let json = serde_json::to_string(&Turn::new(TurnRole::Assistant, "hello")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hello"}"#);
    }

    #[test]
    fn test_turn_decodes_legacy_record() {
        let turns: Vec<Turn> =
            serde_json::from_str(r#"[{"role":"user","content":"hi"}]"#).unwrap();
        assert_eq!(turns.len(), 1);
        assert!(turns[0].timestamp.is_none());
    }

    #[test]
    fn test_turn_now_is_stamped() {
        let turn = Turn::now(TurnRole::User, "hi");
        let stamp = turn.timestamp.unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(&stamp).is_ok());
    }

    #[test]
    fn test_to_message_drops_timestamp() {
        let turn = Turn::now(TurnRole::Assistant, "hello");
        let msg = turn.to_message();
        assert_eq!(msg, Message::assistant("hello"));
    }
}
