//! HTTP client for the remote `HomeoWare` API.
//!
//! JSON in, JSON out. Every failure is classified into an [`ApiError`]; a 401
//! also expires the shared [`Session`]. There are no retries and no
//! client-side timeout.

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderValue};
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::config::AdminConfig;
use crate::error::ApiError;
use crate::session::Session;

/// A successful response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Parsed body; `Null` when the body was empty.
    pub data: Value,
}

/// Remote API client.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    session: Session,
}

impl ApiClient {
    /// Create a client bound to `session`.
    #[must_use]
    pub fn new(config: &AdminConfig, session: Session) -> Self {
        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_url.clone(),
                session,
            }),
        }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn get(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.send(Method::GET, path, None).await
    }

    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn post(&self, path: &str, body: &Value) -> Result<ApiResponse, ApiError> {
        self.send(Method::POST, path, Some(body)).await
    }

    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn put(&self, path: &str, body: &Value) -> Result<ApiResponse, ApiError> {
        self.send(Method::PUT, path, Some(body)).await
    }

    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn delete(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.send(Method::DELETE, path, None).await
    }

    /// Base URL joined with an absolute API path.
    ///
    /// Plain concatenation, so a base with its own path prefix (`/api`) keeps
    /// it.
    fn url(&self, path: &str) -> Result<Url, ApiError> {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{base}/{path}"))
            .map_err(|e| ApiError::Offline(format!("invalid request URL: {e}")))
    }

    #[instrument(skip(self, body), fields(method = %method, path = %path))]
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.url(path)?;

        let mut request = self
            .inner
            .client
            .request(method.clone(), url)
            .header(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(authorization) = self.inner.session.authorization().await {
            request = request.header(AUTHORIZATION, authorization);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if status.is_success() {
            let data = if text.trim().is_empty() {
                Value::Null
            } else {
                serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))?
            };
            return Ok(ApiResponse {
                status: status.as_u16(),
                data,
            });
        }

        let error = ApiError::from_response(status, &text);
        match &error {
            ApiError::Unauthorized { .. } => self.inner.session.expire().await,
            ApiError::NotFound { .. } => {
                debug!(method = %method, path = %path, body = %text, "Resource not found");
            }
            _ => {}
        }
        Err(error)
    }
}
