//! `HomeoWare` admin client library.
//!
//! Everything the admin panel does that is not rendering: talking to the
//! remote API under an authenticated session, holding per-kind record lists,
//! turning validated forms into create/update/delete calls, the account
//! flows, and the livestock advisor chatbot.
//!
//! # Modules
//!
//! - [`config`] - Environment configuration
//! - [`session`] / [`api`] - Authenticated HTTP access and the 401 lifecycle
//! - [`resources`] - Endpoint paths and wire mapping per record kind
//! - [`list_state`] - In-memory record lists
//! - [`submit`] - Create, update, and delete orchestration
//! - [`form`] - Modal form state
//! - [`auth`] - Login, logout, and password reset
//! - [`chat`] - Advisor chatbot with rule-based fallback

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth;
pub mod chat;
pub mod config;
pub mod error;
pub mod form;
pub mod list_state;
pub mod resources;
pub mod session;
pub mod submit;

pub use api::{ApiClient, ApiResponse};
pub use config::{AdminConfig, ConfigError, GeminiConfig};
pub use error::ApiError;
pub use form::{FormError, FormState, Notice, NoticeLevel};
pub use list_state::ListState;
pub use resources::{Deletable, Resource};
pub use session::{Session, SessionState, SignedInUser};
pub use submit::{
    AssumeYes, Confirm, DeleteOutcome, Lists, SubmitError, SubmitOutcome, SubmitTask,
};
