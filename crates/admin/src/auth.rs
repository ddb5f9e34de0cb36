//! Sign-in, sign-out, and password reset.

use homeoware_core::Email;
use homeoware_core::validation::{ForgotPasswordDraft, LoginDraft, ResetPasswordDraft};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::session::{Session, SignedInUser};

/// Shortest token a reset link can carry.
pub const MIN_RESET_TOKEN_LENGTH: usize = 10;

const LOGIN_FAILED: &str = "Failed to authenticate. Check your credentials.";

/// A failed account operation, with the message to show.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{message}")]
    Api {
        message: String,
        #[source]
        source: ApiError,
    },

    /// The server answered 2xx but did not sign us in.
    #[error("{0}")]
    Rejected(String),

    /// The reset link is malformed; nothing was sent.
    #[error("{0}")]
    InvalidLink(&'static str),
}

impl AuthError {
    #[must_use]
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Message for an API failure: a per-status override, else the server's
/// message, else `fallback`. Validation errors keep their details.
fn describe(err: &ApiError, overrides: &[(u16, &str, bool)], fallback: &str) -> String {
    let status = err.status();
    for (code, text, prefer_server) in overrides {
        if status == Some(*code) {
            return if *prefer_server {
                err.user_message_or(text)
            } else {
                (*text).to_string()
            };
        }
    }
    if matches!(err, ApiError::Validation { .. }) {
        err.user_message()
    } else {
        err.user_message_or(fallback)
    }
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    message: Option<String>,
    token: Option<String>,
    token_type: Option<String>,
    user: Option<SignedInUser>,
}

/// `POST /login` and sign the session in.
///
/// # Errors
///
/// `AuthError::Api` when the call fails, `AuthError::Rejected` when the
/// response carries no token.
#[instrument(skip(api, draft), fields(email = %draft.email))]
pub async fn login(api: &ApiClient, draft: &LoginDraft) -> Result<Option<SignedInUser>, AuthError> {
    let body = json!({ "email": draft.email.as_str(), "password": draft.password });
    let response = api.post("/login", &body).await.map_err(|source| {
        warn!(error = %source, "Login failed");
        AuthError::Api {
            message: describe(
                &source,
                &[(401, "Invalid credentials.", true)],
                "Could not sign in.",
            ),
            source,
        }
    })?;

    let payload: LoginResponse = serde_json::from_value(response.data)
        .map_err(|_| AuthError::Rejected(LOGIN_FAILED.to_string()))?;
    let Some(token) = payload.token.filter(|t| !t.is_empty()) else {
        return Err(AuthError::Rejected(
            payload.message.unwrap_or_else(|| LOGIN_FAILED.to_string()),
        ));
    };

    api.session()
        .sign_in(SecretString::from(token), payload.token_type, payload.user.clone())
        .await;
    info!("Signed in");
    Ok(payload.user)
}

/// Clear stored credentials.
pub async fn logout(session: &Session) {
    session.sign_out().await;
}

/// `POST /password/reset-link`.
///
/// # Errors
///
/// `AuthError::Api`; a 404 reads "Email not found.".
#[instrument(skip(api, draft), fields(email = %draft.email))]
pub async fn request_password_reset(
    api: &ApiClient,
    draft: &ForgotPasswordDraft,
) -> Result<(), AuthError> {
    api.post("/password/reset-link", &json!({ "email": draft.email.as_str() }))
        .await
        .map_err(|source| AuthError::Api {
            message: describe(
                &source,
                &[(404, "Email not found.", false)],
                "Could not send the reset link.",
            ),
            source,
        })?;
    info!("Reset link requested");
    Ok(())
}

/// The `email` and `token` carried by a reset link.
#[derive(Clone)]
pub struct ResetLink {
    pub email: Email,
    pub token: SecretString,
}

impl std::fmt::Debug for ResetLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResetLink")
            .field("email", &self.email)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl ResetLink {
    /// Check the link parameters before showing the new-password form.
    ///
    /// # Errors
    ///
    /// `AuthError::InvalidLink` for a short token or an unusable email.
    pub fn parse(email: &str, token: &str) -> Result<Self, AuthError> {
        if token.trim().chars().count() < MIN_RESET_TOKEN_LENGTH {
            return Err(AuthError::InvalidLink("Invalid or expired token"));
        }
        let email = Email::parse(email).map_err(|_| AuthError::InvalidLink("Invalid email"))?;
        Ok(Self {
            email,
            token: SecretString::from(token.trim().to_string()),
        })
    }
}

/// `POST /password/reset`.
///
/// # Errors
///
/// `AuthError::Api`; a 400 means the token is no longer valid.
#[instrument(skip(api, draft, link), fields(email = %link.email))]
pub async fn reset_password(
    api: &ApiClient,
    draft: &ResetPasswordDraft,
    link: &ResetLink,
) -> Result<(), AuthError> {
    let body = json!({
        "email": link.email.as_str(),
        "token": link.token.expose_secret(),
        "password": draft.password,
    });
    api.post("/password/reset", &body)
        .await
        .map_err(|source| AuthError::Api {
            message: describe(
                &source,
                &[(
                    400,
                    "Invalid or expired token. Request a new reset link.",
                    false,
                )],
                "Could not reset the password.",
            ),
            source,
        })?;
    info!("Password reset");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use homeoware_core::Validate;
    use homeoware_core::validation::{ForgotPasswordInput, LoginInput, ResetPasswordInput};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::AdminConfig;
    use crate::session::SessionState;

    fn api(server: &MockServer) -> ApiClient {
        ApiClient::new(&AdminConfig::new(&server.uri()).unwrap(), Session::new())
    }

    fn credentials() -> LoginDraft {
        LoginInput {
            email: "ana@x.com".to_string(),
            password: "abcdef".to_string(),
        }
        .validate()
        .unwrap()
    }

    #[tokio::test]
    async fn test_login_signs_in() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .and(body_json(json!({"email": "ana@x.com", "password": "abcdef"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "ok",
                "token": "tok-1",
                "token_type": "Bearer",
                "user": {"id": 1, "name": "Ana", "email": "ana@x.com"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = api(&server);
        let user = login(&api, &credentials()).await.unwrap().unwrap();
        assert_eq!(user.name, "Ana");
        assert_eq!(api.session().state(), SessionState::SignedIn);
        assert_eq!(api.session().authorization().await.as_deref(), Some("Bearer tok-1"));

        logout(api.session()).await;
        assert_eq!(api.session().state(), SessionState::SignedOut);
    }

    #[tokio::test]
    async fn test_login_without_token_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let err = login(&api(&server), &credentials()).await.unwrap_err();
        assert_eq!(err.user_message(), LOGIN_FAILED);
    }

    #[tokio::test]
    async fn test_login_401() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = login(&api(&server), &credentials()).await.unwrap_err();
        assert_eq!(err.user_message(), "Invalid credentials.");
    }

    #[tokio::test]
    async fn test_reset_link_unknown_email() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/password/reset-link"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "nope"})))
            .expect(1)
            .mount(&server)
            .await;

        let draft = ForgotPasswordInput {
            email: "who@x.com".to_string(),
        }
        .validate()
        .unwrap();
        let err = request_password_reset(&api(&server), &draft).await.unwrap_err();
        assert_eq!(err.user_message(), "Email not found.");
    }

    #[tokio::test]
    async fn test_reset_password_expired_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/password/reset"))
            .and(body_json(json!({
                "email": "ana@x.com",
                "token": "0123456789abc",
                "password": "newpass123"
            })))
            .respond_with(ResponseTemplate::new(400))
            .expect(1)
            .mount(&server)
            .await;

        let draft = ResetPasswordInput {
            password: "newpass123".to_string(),
            password_confirmation: "newpass123".to_string(),
        }
        .validate()
        .unwrap();
        let link = ResetLink::parse("ana@x.com", "0123456789abc").unwrap();
        let err = reset_password(&api(&server), &draft, &link).await.unwrap_err();
        assert_eq!(
            err.user_message(),
            "Invalid or expired token. Request a new reset link."
        );
    }

    #[test]
    fn test_reset_link_checks() {
        assert!(matches!(
            ResetLink::parse("ana@x.com", "short"),
            Err(AuthError::InvalidLink("Invalid or expired token"))
        ));
        assert!(matches!(
            ResetLink::parse("ana", "0123456789"),
            Err(AuthError::InvalidLink("Invalid email"))
        ));
        let link = ResetLink::parse("ana@x.com", "0123456789").unwrap();
        assert!(!format!("{link:?}").contains("0123456789"));
    }
}
