//! Livestock advisor chat.
//!
//! With a question, prints one answer. Without one, starts an interactive
//! session: `/questions` lists suggestions, `/n` asks suggestion `n`, and
//! `exit` or end of input quits.

use homeoware_admin::AdminConfig;
use homeoware_admin::chat::{AnswerSource, Conversation, GREETING, QUICK_QUESTIONS, Responder};

use super::{CommandError, emit, read_line};

pub async fn run(config: &AdminConfig, question: Option<String>) -> Result<(), CommandError> {
    let responder = Responder::new(config.gemini());
    if !config.gemini().is_configured() {
        tracing::info!("GEMINI_API_KEY not set; answering from the built-in rules");
    }
    let mut conversation = Conversation::new(responder);

    if let Some(question) = question {
        ask(&mut conversation, &question).await;
        return Ok(());
    }

    emit(GREETING);
    while let Some(line) = read_line("> ")? {
        let line = line.trim();
        match line {
            "exit" | "quit" => break,
            "/questions" => {
                for (i, question) in QUICK_QUESTIONS.iter().enumerate() {
                    emit(format_args!("{:>2}. {question}", i + 1));
                }
            }
            _ => {
                let question = quick_question(line).unwrap_or(line);
                ask(&mut conversation, question).await;
            }
        }
    }
    Ok(())
}

/// `/n` selects the n-th suggested question (1-based).
fn quick_question(line: &str) -> Option<&'static str> {
    let n: usize = line.strip_prefix('/')?.parse().ok()?;
    QUICK_QUESTIONS.get(n.checked_sub(1)?).copied()
}

async fn ask(conversation: &mut Conversation, question: &str) {
    if let Some(answer) = conversation.ask(question).await {
        if answer.source == AnswerSource::Rules {
            tracing::debug!("Answered from rules");
        }
        emit(answer.text);
    }
}
