//! Chat message log.

use chrono::Utc;
use homeoware_core::ChatMessage;
use tokio::sync::watch;

use super::responder::{Answer, Responder};

/// First bot message of every conversation.
pub const GREETING: &str = "Hello! Ask a question about cattle management and health. \
For example: \"What can I use when my steer has ticks?\"";

/// One conversation with the advisor.
pub struct Conversation {
    responder: Responder,
    messages: Vec<ChatMessage>,
    typing: watch::Sender<bool>,
    last_timestamp: i64,
}

impl Conversation {
    /// A conversation seeded with [`GREETING`].
    #[must_use]
    pub fn new(responder: Responder) -> Self {
        let (typing, _) = watch::channel(false);
        let mut conversation = Self {
            responder,
            messages: Vec::new(),
            typing,
            last_timestamp: i64::MIN,
        };
        let timestamp = conversation.next_timestamp();
        conversation
            .messages
            .push(ChatMessage::bot(GREETING, timestamp));
        conversation
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Whether an answer is being produced.
    #[must_use]
    pub fn is_typing(&self) -> bool {
        *self.typing.borrow()
    }

    #[must_use]
    pub fn subscribe_typing(&self) -> watch::Receiver<bool> {
        self.typing.subscribe()
    }

    /// Wall-clock millis, bumped so no two messages share a timestamp.
    fn next_timestamp(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        self.last_timestamp = now.max(self.last_timestamp.saturating_add(1));
        self.last_timestamp
    }

    /// Ask a question and append the answer.
    ///
    /// Blank input is ignored and returns `None`.
    pub async fn ask(&mut self, question: &str) -> Option<Answer> {
        let question = question.trim();
        if question.is_empty() {
            return None;
        }

        let history = self.messages.clone();
        let timestamp = self.next_timestamp();
        self.messages.push(ChatMessage::user(question, timestamp));
        self.typing.send_replace(true);

        let answer = self.responder.answer(question, &history).await;

        let timestamp = self.next_timestamp();
        self.messages.push(ChatMessage::bot(answer.text.clone(), timestamp));
        self.typing.send_replace(false);
        Some(answer)
    }
}
