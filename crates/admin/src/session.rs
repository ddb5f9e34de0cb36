//! Authenticated session shared by every API call.
//!
//! A [`Session`] is a cheap cloneable handle. The credentials live behind a
//! lock; the lifecycle state is broadcast on a `watch` channel so a front end
//! can send the operator back to the sign-in screen when it turns
//! [`SessionState::Expired`].

use std::sync::Arc;

use homeoware_core::RecordId;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::{RwLock, watch};
use tracing::{info, warn};

/// Token type assumed when the login response names none.
pub const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    SignedOut,
    SignedIn,
    /// The API answered 401; credentials were dropped and the operator must
    /// sign in again.
    Expired,
}

/// The user returned by a successful login.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SignedInUser {
    pub id: Option<RecordId>,
    pub name: String,
    pub email: String,
    pub role: Option<String>,
}

struct Credentials {
    token: SecretString,
    token_type: String,
    user: Option<SignedInUser>,
}

/// Shared session handle.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    credentials: RwLock<Option<Credentials>>,
    state: watch::Sender<SessionState>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// A signed-out session.
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(SessionState::SignedOut);
        Self {
            inner: Arc::new(SessionInner {
                credentials: RwLock::new(None),
                state,
            }),
        }
    }

    /// Store credentials and announce [`SessionState::SignedIn`].
    pub async fn sign_in(
        &self,
        token: SecretString,
        token_type: Option<String>,
        user: Option<SignedInUser>,
    ) {
        let token_type = token_type
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TOKEN_TYPE.to_string());
        *self.inner.credentials.write().await = Some(Credentials {
            token,
            token_type,
            user,
        });
        self.inner.state.send_replace(SessionState::SignedIn);
        info!("Session signed in");
    }

    /// Drop credentials and announce [`SessionState::SignedOut`].
    pub async fn sign_out(&self) {
        *self.inner.credentials.write().await = None;
        self.inner.state.send_replace(SessionState::SignedOut);
        info!("Session signed out");
    }

    /// Drop credentials and announce [`SessionState::Expired`].
    pub async fn expire(&self) {
        *self.inner.credentials.write().await = None;
        self.inner.state.send_replace(SessionState::Expired);
        warn!("Session expired, sign in required");
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        *self.inner.state.borrow()
    }

    /// Observe lifecycle changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// `Authorization` header value, when signed in.
    pub async fn authorization(&self) -> Option<String> {
        self.inner
            .credentials
            .read()
            .await
            .as_ref()
            .map(|c| format!("{} {}", c.token_type, c.token.expose_secret()))
    }

    /// The signed-in user, if the login response carried one.
    pub async fn user(&self) -> Option<SignedInUser> {
        self.inner
            .credentials
            .read()
            .await
            .as_ref()
            .and_then(|c| c.user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lifecycle() {
        let session = Session::new();
        let mut rx = session.subscribe();
        assert_eq!(session.state(), SessionState::SignedOut);
        assert!(session.authorization().await.is_none());

        session
            .sign_in(SecretString::from("abc123"), None, None)
            .await;
        assert_eq!(session.state(), SessionState::SignedIn);
        assert_eq!(session.authorization().await.as_deref(), Some("Bearer abc123"));
        assert!(rx.has_changed().unwrap_or(false));
        assert_eq!(*rx.borrow_and_update(), SessionState::SignedIn);

        session.expire().await;
        assert_eq!(*rx.borrow_and_update(), SessionState::Expired);
        assert!(session.authorization().await.is_none());
    }

    #[tokio::test]
    async fn test_custom_token_type_and_user() {
        let session = Session::new();
        let user = SignedInUser {
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            ..SignedInUser::default()
        };
        session
            .sign_in(
                SecretString::from("t"),
                Some("Token".to_string()),
                Some(user.clone()),
            )
            .await;
        assert_eq!(session.authorization().await.as_deref(), Some("Token t"));
        assert_eq!(session.user().await, Some(user));

        session.sign_out().await;
        assert_eq!(session.state(), SessionState::SignedOut);
        assert!(session.user().await.is_none());
    }

    #[test]
    fn test_debug_hides_token() {
        let session = Session::new();
        assert!(format!("{session:?}").contains("SignedOut"));
    }
}
