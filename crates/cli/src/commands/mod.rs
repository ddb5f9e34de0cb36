//! Command implementations.
//!
//! Status and errors are logged through `tracing` (stderr); records and chat
//! answers are written to stdout so they can be piped.

pub mod account;
pub mod chat;
pub mod records;

use std::fmt::Display;
use std::io::{self, BufRead, Write};

use homeoware_admin::auth::AuthError;
use homeoware_admin::{
    AdminConfig, ApiClient, ApiError, Confirm, FormError, Lists, Notice, NoticeLevel, Session,
    SessionState,
};
use homeoware_core::FieldErrors;
use secrecy::SecretString;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Input rejected before anything was sent.
    #[error("{0}")]
    Invalid(FieldErrors),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("{}", .0.user_message())]
    Api(#[from] ApiError),

    #[error(transparent)]
    Form(FormError),

    #[error("Terminal error: {0}")]
    Io(#[from] io::Error),
}

impl From<FormError> for CommandError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::Invalid(errors) => Self::Invalid(errors),
            other => Self::Form(other),
        }
    }
}

/// API access shared by every command of one invocation.
pub struct Context {
    pub api: ApiClient,
    pub lists: Lists,
}

impl Context {
    /// Build the client, signed in when a token was given.
    pub async fn new(config: &AdminConfig, token: Option<String>) -> Self {
        let session = Session::new();
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            session
                .sign_in(SecretString::from(token.trim().to_string()), None, None)
                .await;
        }
        Self {
            api: ApiClient::new(config, session),
            lists: Lists::default(),
        }
    }

    pub fn warn_if_expired(&self) {
        if self.api.session().state() == SessionState::Expired {
            tracing::warn!("Session expired. Run `hw-cli login` and export the new HW_TOKEN.");
        }
    }
}

/// Write one line of command output.
#[allow(clippy::print_stdout)]
pub fn emit(line: impl Display) {
    println!("{line}");
}

/// Log a form notice at the level it carries.
pub fn report(notice: &Notice) {
    match notice.level {
        NoticeLevel::Info => tracing::info!("{}", notice.message),
        NoticeLevel::Success => tracing::info!("✓ {}", notice.message),
        NoticeLevel::Error => tracing::error!("{}", notice.message),
    }
}

/// Prompt on stderr and read one line from stdin. `None` at end of input.
pub fn read_line(prompt: &str) -> io::Result<Option<String>> {
    let mut stderr = io::stderr().lock();
    stderr.write_all(prompt.as_bytes())?;
    stderr.flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Asks on the terminal; anything but `y`/`yes` declines.
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        matches!(
            read_line(&format!("{prompt} [y/N] ")),
            Ok(Some(answer)) if matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
        )
    }
}
