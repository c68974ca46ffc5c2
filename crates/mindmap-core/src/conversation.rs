//! Conversation turn types.

use serde::{Deserialize, Serialize};

/// Represents the author of a turn in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the user.
    User,
    /// Reply from the model.
    Assistant,
}

/// A single exchange entry held by an in-memory chat session.
///
/// Turns are never persisted on their own; only the concatenated raw text of
/// an exchange reaches the archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: MessageRole,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Joins a user message and the model reply into the archived snapshot text.
pub fn exchange_text(message: &str, reply: &str) -> String {
    format!("{message}\n{reply}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&ConversationTurn::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }

    #[test]
    fn test_exchange_text() {
        assert_eq!(exchange_text("question", "# answer"), "question\n# answer");
    }
}
