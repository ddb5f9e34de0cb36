//! Advisor prompt sent to Gemini.

use askama::Template;
use homeoware_core::{ChatMessage, Sender};

/// How many of the latest messages are quoted back as context.
pub const HISTORY_WINDOW: usize = 6;

struct PromptLine<'a> {
    speaker: &'static str,
    content: &'a str,
}

#[derive(Template)]
#[template(path = "chat/advisor_prompt.txt")]
struct AdvisorPromptTemplate<'a> {
    history: Vec<PromptLine<'a>>,
    question: &'a str,
}

/// Render the advisor prompt for `question`, quoting the tail of `history`.
///
/// # Errors
///
/// Returns the template engine's error; the caller falls back to the rule
/// answers.
pub fn render(history: &[ChatMessage], question: &str) -> Result<String, askama::Error> {
    let start = history.len().saturating_sub(HISTORY_WINDOW);
    let history = history
        .iter()
        .skip(start)
        .map(|message| PromptLine {
            speaker: match message.sender {
                Sender::User => "User",
                Sender::Bot => "Assistant",
            },
            content: &message.content,
        })
        .collect();

    AdvisorPromptTemplate { history, question }.render()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_only_last_six_messages() {
        let history: Vec<_> = (0..8_i64)
            .map(|i| {
                if i % 2 == 0 {
                    ChatMessage::user(format!("question {i}"), i)
                } else {
                    ChatMessage::bot(format!("answer {i}"), i)
                }
            })
            .collect();

        let prompt = render(&history, "tell me more").unwrap();
        assert!(!prompt.contains("question 0"));
        assert!(!prompt.contains("answer 1"));
        assert!(prompt.contains("User: question 2"));
        assert!(prompt.contains("Assistant: answer 7"));
        assert!(prompt.contains("New question: tell me more"));
    }

    #[test]
    fn test_no_history_section_when_empty() {
        let prompt = render(&[], "mastitis?").unwrap();
        assert!(!prompt.contains("Previous conversation"));
        assert!(prompt.starts_with("You are a sales specialist"));
        assert!(prompt.contains("New question: mastitis?"));
    }
}
