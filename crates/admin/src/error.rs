//! Error taxonomy for calls to the remote API.
//!
//! Every failed call is classified once, here, so callers match on a kind
//! instead of on raw status codes.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// A failed call to the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 404.
    #[error("not found")]
    NotFound { message: Option<String> },

    /// 401. The session is expired as a side effect.
    #[error("unauthorized")]
    Unauthorized { message: Option<String> },

    /// 403.
    #[error("forbidden")]
    Forbidden { message: Option<String> },

    /// 422 with the server's per-field messages, flattened in field order.
    #[error("validation failed: {}", details.join("; "))]
    Validation {
        message: Option<String>,
        details: Vec<String>,
    },

    /// 400.
    #[error("bad request")]
    BadRequest { message: Option<String> },

    /// Any 5xx.
    #[error("server error ({status})")]
    Server {
        status: u16,
        message: Option<String>,
    },

    /// No response at all: connection refused, DNS, TLS, timeout.
    #[error("offline: {0}")]
    Offline(String),

    /// A response arrived but its body was not the JSON we expected.
    #[error("decode error: {0}")]
    Decode(String),

    /// Any other status.
    #[error("unexpected status {status}")]
    Unknown {
        status: u16,
        message: Option<String>,
    },
}

/// Error body shape shared by the API's failure responses.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    #[serde(default)]
    errors: Option<serde_json::Value>,
}

impl ApiError {
    /// Classify a non-success response from its status and raw body.
    #[must_use]
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let message = parsed.message.filter(|m| !m.trim().is_empty());

        match status.as_u16() {
            400 => Self::BadRequest { message },
            401 => Self::Unauthorized { message },
            403 => Self::Forbidden { message },
            404 => Self::NotFound { message },
            422 => Self::Validation {
                message,
                details: parsed.errors.as_ref().map(flatten_details).unwrap_or_default(),
            },
            code @ 500..=599 => Self::Server {
                status: code,
                message,
            },
            code => Self::Unknown {
                status: code,
                message,
            },
        }
    }

    /// HTTP status, when a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::Unauthorized { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::Validation { .. } => Some(422),
            Self::BadRequest { .. } => Some(400),
            Self::Server { status, .. } | Self::Unknown { status, .. } => Some(*status),
            Self::Offline(_) | Self::Decode(_) => None,
        }
    }

    /// The `message` field of the error body, if the server sent one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::NotFound { message }
            | Self::Unauthorized { message }
            | Self::Forbidden { message }
            | Self::Validation { message, .. }
            | Self::BadRequest { message }
            | Self::Server { message, .. }
            | Self::Unknown { message, .. } => message.as_deref(),
            Self::Offline(_) | Self::Decode(_) => None,
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Generic text for this class of failure.
    #[must_use]
    pub const fn generic_message(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "Record not found.",
            Self::Unauthorized { .. } => "Your session has expired. Sign in again.",
            Self::Forbidden { .. } => "You do not have permission to do this.",
            Self::Validation { .. } => "Validation error in the submitted data.",
            Self::BadRequest { .. } => "The request was rejected by the server.",
            Self::Server { .. } => "The server failed to process the request. Try again later.",
            Self::Offline(_) => "Could not reach the server. Check your connection.",
            Self::Decode(_) => "Unexpected response from the server.",
            Self::Unknown { .. } => "Unexpected error. Try again.",
        }
    }

    /// The single message shown to the operator.
    ///
    /// Server message when present, else the generic text. Validation errors
    /// append each server detail on its own line; unclassified statuses name
    /// the status code.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Unknown {
                status,
                message: None,
            } => format!("Unexpected error ({status}). Try again."),
            _ => self.user_message_or(self.generic_message()),
        }
    }

    /// Like [`Self::user_message`] with a caller-chosen fallback.
    #[must_use]
    pub fn user_message_or(&self, fallback: &str) -> String {
        let head = self.server_message().unwrap_or(fallback);
        match self {
            Self::Validation { details, .. } if !details.is_empty() => {
                format!("{head}\n{}", details.join("\n"))
            }
            Self::Unknown {
                status,
                message: Some(message),
            } => format!("Unexpected error ({status}): {message}"),
            _ => head.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Offline(err.to_string())
        }
    }
}

/// `{"field": ["a", "b"], "other": "c"}` or `["a", "b"]` into a flat list.
fn flatten_details(errors: &serde_json::Value) -> Vec<String> {
    let mut out = Vec::new();
    collect_strings(errors, &mut out);
    out
}

fn collect_strings(value: &serde_json::Value, out: &mut Vec<String>) {
    match value {
        serde_json::Value::String(s) => out.push(s.clone()),
        serde_json::Value::Array(items) => items.iter().for_each(|v| collect_strings(v, out)),
        serde_json::Value::Object(map) => map.values().for_each(|v| collect_strings(v, out)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifies_statuses() {
        let cases = [
            (400, "BadRequest"),
            (401, "Unauthorized"),
            (403, "Forbidden"),
            (404, "NotFound"),
            (422, "Validation"),
            (500, "Server"),
            (503, "Server"),
            (409, "Unknown"),
        ];
        for (code, expected) in cases {
            let err = ApiError::from_response(StatusCode::from_u16(code).unwrap_or_default(), "");
            let debug = format!("{err:?}");
            assert!(debug.starts_with(expected), "{code}: {debug}");
            assert_eq!(err.status(), Some(code));
        }
    }

    #[test]
    fn test_server_message_preferred() {
        let err = ApiError::from_response(
            StatusCode::BAD_REQUEST,
            r#"{"message": "Identifier already in use"}"#,
        );
        assert_eq!(err.user_message(), "Identifier already in use");
    }

    #[test]
    fn test_generic_message_without_body() {
        let err = ApiError::from_response(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(
            err.user_message(),
            "The server failed to process the request. Try again later."
        );
        let err = ApiError::from_response(StatusCode::NOT_FOUND, r#"{"message": "  "}"#);
        assert_eq!(err.user_message(), "Record not found.");
    }

    #[test]
    fn test_unclassified_status_is_templated() {
        let err = ApiError::from_response(
            StatusCode::CONFLICT,
            r#"{"message": "Identifier already in use"}"#,
        );
        assert_eq!(
            err.user_message(),
            "Unexpected error (409): Identifier already in use"
        );
        let err = ApiError::from_response(StatusCode::IM_A_TEAPOT, "");
        assert_eq!(err.user_message(), "Unexpected error (418). Try again.");
    }

    #[test]
    fn test_validation_details_one_per_line() {
        let body = r#"{
            "message": "The given data was invalid.",
            "errors": {"email": ["The email has already been taken."], "name": ["Too short."]}
        }"#;
        let err = ApiError::from_response(StatusCode::UNPROCESSABLE_ENTITY, body);
        assert_eq!(
            err.user_message(),
            "The given data was invalid.\nThe email has already been taken.\nToo short."
        );
    }

    #[test]
    fn test_validation_without_details() {
        let err = ApiError::from_response(StatusCode::UNPROCESSABLE_ENTITY, "{}");
        assert_eq!(err.user_message(), "Validation error in the submitted data.");
    }

    #[test]
    fn test_custom_fallback() {
        let err = ApiError::from_response(StatusCode::NOT_FOUND, "");
        assert_eq!(err.user_message_or("Email not found."), "Email not found.");
        assert!(err.is_not_found());
    }
}
