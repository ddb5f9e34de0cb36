//! Answer resolution: Gemini first, rule table on any failure.
//!
//! ```text
//! Idle ──(key configured)──▶ AwaitingExternal ──ok──▶ Answered
//!   │                              │
//!   └──────(no key)──────▶ Fallback ◀──any error──┘
//! ```

use std::sync::Arc;

use homeoware_core::ChatMessage;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::gemini::GeminiClient;
use super::{prompt, rules};
use crate::config::GeminiConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponderState {
    #[default]
    Idle,
    AwaitingExternal,
    Answered,
    Fallback,
}

/// Where an answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerSource {
    External,
    Rules,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub source: AnswerSource,
}

impl Answer {
    fn from_rules(question: &str) -> Self {
        Self {
            text: rules::fallback_answer(question).to_string(),
            source: AnswerSource::Rules,
        }
    }
}

/// Resolves chat questions. Cloning shares the state channel.
#[derive(Clone)]
pub struct Responder {
    gemini: Option<GeminiClient>,
    state: Arc<watch::Sender<ResponderState>>,
}

impl Responder {
    #[must_use]
    pub fn new(config: &GeminiConfig) -> Self {
        Self::with_client(GeminiClient::new(config))
    }

    /// A responder that only ever uses the rule table.
    #[must_use]
    pub fn offline() -> Self {
        Self::with_client(None)
    }

    fn with_client(gemini: Option<GeminiClient>) -> Self {
        let (state, _) = watch::channel(ResponderState::Idle);
        Self {
            gemini,
            state: Arc::new(state),
        }
    }

    #[must_use]
    pub fn state(&self) -> ResponderState {
        *self.state.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ResponderState> {
        self.state.subscribe()
    }

    fn enter(&self, state: ResponderState) {
        debug!(?state, "Responder state");
        self.state.send_replace(state);
    }

    /// Answer `question` given the conversation so far. Never fails.
    pub async fn answer(&self, question: &str, history: &[ChatMessage]) -> Answer {
        self.enter(ResponderState::Idle);

        let Some(gemini) = &self.gemini else {
            self.enter(ResponderState::Fallback);
            return Answer::from_rules(question);
        };

        self.enter(ResponderState::AwaitingExternal);
        let prompt = match prompt::render(history, question) {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!(error = %e, "Failed to render advisor prompt, using fallback");
                self.enter(ResponderState::Fallback);
                return Answer::from_rules(question);
            }
        };

        match gemini.generate(&prompt).await {
            Ok(text) => {
                self.enter(ResponderState::Answered);
                Answer {
                    text,
                    source: AnswerSource::External,
                }
            }
            Err(e) => {
                warn!(error = %e, "Gemini request failed, using fallback");
                self.enter(ResponderState::Fallback);
                Answer::from_rules(question)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{any, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn online(server: &MockServer) -> Responder {
        Responder::new(
            &GeminiConfig::default()
                .with_api_key("k")
                .with_api_url(server.uri()),
        )
    }

    #[tokio::test]
    async fn test_no_key_skips_network() {
        let responder = Responder::new(&GeminiConfig::default().with_api_key("your_gemini_api_key_here"));
        let answer = responder.answer("mastite", &[]).await;
        assert_eq!(answer.source, AnswerSource::Rules);
        assert!(answer.text.contains("mastitis"));
        assert_eq!(responder.state(), ResponderState::Fallback);
    }

    #[tokio::test]
    async fn test_external_answer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "Try the Mastitis product."}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let responder = online(&server);
        let answer = responder.answer("mastite", &[]).await;
        assert_eq!(answer.text, "Try the Mastitis product.");
        assert_eq!(answer.source, AnswerSource::External);
        assert_eq!(responder.state(), ResponderState::Answered);
    }

    #[tokio::test]
    async fn test_failures_fall_back() {
        for response in [
            ResponseTemplate::new(500),
            ResponseTemplate::new(200).set_body_string("{not json"),
            ResponseTemplate::new(200).set_body_json(json!({"candidates": [{}]})),
        ] {
            let server = MockServer::start().await;
            Mock::given(any()).respond_with(response).mount(&server).await;

            let responder = online(&server);
            let answer = responder
                .answer("O que usar para prevenir doenças respiratórias?", &[])
                .await;
            assert_eq!(answer.source, AnswerSource::Rules);
            assert!(answer.text.starts_with("Prevent respiratory problems"));
            assert_eq!(responder.state(), ResponderState::Fallback);
        }
    }
}
