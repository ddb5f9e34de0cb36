//! Chatbot message types.

use serde::{Deserialize, Serialize};

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

/// One entry of the chatbot conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub content: String,
    pub sender: Sender,
    /// Epoch milliseconds; unique within a conversation and used as the
    /// rendering key.
    pub timestamp: i64,
}

impl ChatMessage {
    #[must_use]
    pub fn user(content: impl Into<String>, timestamp: i64) -> Self {
        Self {
            content: content.into(),
            sender: Sender::User,
            timestamp,
        }
    }

    #[must_use]
    pub fn bot(content: impl Into<String>, timestamp: i64) -> Self {
        Self {
            content: content.into(),
            sender: Sender::Bot,
            timestamp,
        }
    }
}
