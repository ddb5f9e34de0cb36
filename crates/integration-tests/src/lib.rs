//! Integration tests for `HomeoWare`.
//!
//! Every test starts a [`wiremock`] server standing in for the remote API
//! and drives the admin library against it, so exact call counts and bodies
//! can be asserted.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p homeoware-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `submit_flows` - Create and update through the form state
//! - `delete_flows` - Confirmation and the existence check
//! - `session_lifecycle` - Sign-in, bearer header, and the 401 reset
//! - `list_views` - Load, filter, and sort
//! - `chatbot` - Gemini answers and the rule fallback

#![allow(clippy::missing_panics_doc)]

use homeoware_admin::{AdminConfig, ApiClient, GeminiConfig, Lists, Session};
use secrecy::SecretString;
use wiremock::MockServer;

/// Bearer token used by [`TestContext::signed_in`].
pub const TEST_TOKEN: &str = "test-token";

/// A mock API server and a client pointed at it.
pub struct TestContext {
    pub server: MockServer,
    pub api: ApiClient,
    pub lists: Lists,
}

impl TestContext {
    /// Signed-out client against a fresh server.
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let config = AdminConfig::new(&server.uri()).expect("mock server URI is a valid URL");
        Self {
            api: ApiClient::new(&config, Session::new()),
            lists: Lists::default(),
            server,
        }
    }

    /// Client already holding [`TEST_TOKEN`].
    pub async fn signed_in() -> Self {
        let ctx = Self::new().await;
        ctx.session()
            .sign_in(SecretString::from(TEST_TOKEN), None, None)
            .await;
        ctx
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        self.api.session()
    }

    /// Requests the server received with this method and path.
    pub async fn calls(&self, method: &str, path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.method.as_str() == method && r.url.path() == path)
            .count()
    }
}

/// Gemini settings pointed at `server` with a usable key.
#[must_use]
pub fn gemini_config(server: &MockServer) -> GeminiConfig {
    GeminiConfig::default()
        .with_api_key("test-gemini-key")
        .with_api_url(server.uri())
}
