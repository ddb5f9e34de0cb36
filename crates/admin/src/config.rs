//! Admin client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `API_URL` - Base URL of the remote `HomeoWare` API
//!
//! ## Optional
//! - `GEMINI_API_KEY` - Gemini API key for the livestock advisor. Blank or the
//!   `.env.example` placeholder leaves the advisor on its built-in answers.
//! - `GEMINI_MODEL` - Gemini model ID (default: gemini-1.5-flash)
//! - `GEMINI_API_URL` - Gemini API base URL (default: the public v1beta endpoint)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Value shipped in `.env.example`; treated as "not configured".
const GEMINI_KEY_PLACEHOLDER: &str = "your_gemini_api_key_here";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin client configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Base URL every API path is appended to.
    pub api_url: Url,
    /// Gemini settings; the key inside may be absent.
    pub gemini: GeminiConfig,
    /// Sentry DSN for error tracking (optional)
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag (optional)
    pub sentry_environment: Option<String>,
}

/// Gemini API configuration.
#[derive(Clone)]
pub struct GeminiConfig {
    /// `None` selects the rule-based fallback answers.
    pub api_key: Option<SecretString>,
    pub model: String,
    pub api_url: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field(
                "api_key",
                &self.api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("model", &self.model)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_url: DEFAULT_GEMINI_API_URL.to_string(),
        }
    }
}

impl GeminiConfig {
    fn from_env() -> Self {
        Self {
            api_key: get_optional_env("GEMINI_API_KEY").and_then(|key| usable_api_key(&key)),
            model: get_env_or_default("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            api_url: get_env_or_default("GEMINI_API_URL", DEFAULT_GEMINI_API_URL),
        }
    }

    /// Config with an explicit key, run through the same placeholder check as
    /// the environment.
    #[must_use]
    pub fn with_api_key(mut self, key: &str) -> Self {
        self.api_key = usable_api_key(key);
        self
    }

    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Whether an external model will be consulted at all.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `API_URL` is missing or not a URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = parse_api_url("API_URL", &get_required_env("API_URL")?)?;

        Ok(Self {
            api_url,
            gemini: GeminiConfig::from_env(),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Build a configuration without touching the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `api_url` is not a URL.
    pub fn new(api_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: parse_api_url("API_URL", api_url)?,
            gemini: GeminiConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
        })
    }

    #[must_use]
    pub fn with_gemini(mut self, gemini: GeminiConfig) -> Self {
        self.gemini = gemini;
        self
    }

    /// Returns a reference to the Gemini configuration.
    #[must_use]
    pub const fn gemini(&self) -> &GeminiConfig {
        &self.gemini
    }
}

fn parse_api_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value.trim()).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// A key is usable unless it is blank or the shipped placeholder.
fn usable_api_key(raw: &str) -> Option<SecretString> {
    let key = raw.trim();
    if key.is_empty() || key == GEMINI_KEY_PLACEHOLDER {
        None
    } else {
        Some(SecretString::from(key.to_string()))
    }
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_key_is_not_configured() {
        for raw in ["", "   ", "your_gemini_api_key_here", " your_gemini_api_key_here "] {
            assert!(usable_api_key(raw).is_none(), "{raw:?}");
        }
        assert!(usable_api_key("AIzaSyRealLookingKey").is_some());
    }

    #[test]
    fn test_with_api_key() {
        let gemini = GeminiConfig::default().with_api_key("your_gemini_api_key_here");
        assert!(!gemini.is_configured());
        let gemini = GeminiConfig::default().with_api_key("k-123");
        assert!(gemini.is_configured());
        assert_eq!(gemini.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_gemini_config_debug_redacts_secrets() {
        let config = GeminiConfig::default().with_api_key("AIza-super-secret-key");

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("gemini-1.5-flash"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("AIza-super-secret-key"));
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        assert!(AdminConfig::new("http://localhost:8000").is_ok());
        let err = AdminConfig::new("not a url").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "API_URL"));
    }
}
