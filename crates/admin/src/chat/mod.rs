//! Livestock advisor chatbot.
//!
//! Questions go to Gemini when a key is configured. Any failure there, or a
//! missing key, falls back to a fixed keyword rule table, so an answer is
//! always produced.
//!
//! # Modules
//!
//! - [`rules`] - Ordered keyword rules and their canned answers
//! - [`gemini`] - `generateContent` client
//! - [`prompt`] - Advisor prompt template
//! - [`responder`] - External-then-fallback state machine
//! - [`conversation`] - Message log with a typing indicator

pub mod conversation;
pub mod gemini;
pub mod prompt;
pub mod responder;
pub mod rules;

pub use conversation::{Conversation, GREETING};
pub use gemini::{GeminiClient, GeminiError};
pub use responder::{Answer, AnswerSource, Responder, ResponderState};

/// Suggested questions offered next to the input box.
pub const QUICK_QUESTIONS: [&str; 20] = [
    "What can I use when my steer has ticks?",
    "Is there a natural treatment to control worms in cattle?",
    "What should I do when a calf has frequent diarrhea?",
    "How can I help cattle recover from pneumonia?",
    "What treatment is indicated for food poisoning in cattle?",
    "How can I control buller behavior (sodomy) in my herd?",
    "Is there a treatment to improve cow fertility?",
    "What can improve the semen quality of my bulls?",
    "What can help with recurrent abortion in the herd?",
    "How do I treat warts (papillomatosis) in the animals?",
    "What can I use to prevent or treat mastitis in dairy cows?",
    "How do I reduce antibiotic use in the herd without hurting production?",
    "Is there a natural way to increase milk production?",
    "How can I improve weight gain in beef cattle?",
    "What helps improve the meat quality of my herd?",
    "How can I strengthen cattle immunity naturally?",
    "Is there a way to reduce cattle stress during handling?",
    "What can I use to prevent respiratory disease in the herd?",
    "Which treatment can control internal and external parasites at the same time?",
    "How can I avoid disease outbreaks without harsh chemicals?",
];
