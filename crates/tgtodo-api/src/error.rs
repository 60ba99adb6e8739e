//! API client error types.

use reqwest::StatusCode;
use thiserror::Error;

use crate::types::ErrorBody;

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by [`ApiClient`](crate::ApiClient).
#[derive(Debug, Error)]
pub enum ApiError {
    /// No init data resolved and the call requires it.
    #[error("Telegram init data is missing; open the app from Telegram")]
    MissingInitData,

    /// Backend answered with a non-2xx status.
    #[error("{status}: {message}")]
    Status {
        status: StatusCode,
        code: Option<String>,
        message: String,
    },

    /// Backend answered 2xx with `success: false`.
    #[error("request rejected: {message}")]
    Rejected {
        code: Option<String>,
        message: String,
    },

    /// Base URL could not be parsed or cannot carry a path.
    #[error("invalid API base URL '{0}'")]
    InvalidBaseUrl(String),

    /// Transport failure or timeout.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    /// Build an error for a non-2xx response.
    ///
    /// The message comes from `error.message` (or `error` when it is a bare
    /// string), then a top-level `message`, then the raw body, then the
    /// status reason.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let parsed: Option<ErrorEnvelope> = serde_json::from_str(body).ok();
        let code = match parsed.as_ref().and_then(|p| p.error.as_ref()) {
            Some(ErrorField::Object(e)) => e.code.clone(),
            _ => None,
        };
        let message = parsed
            .and_then(|p| {
                let inner = match p.error {
                    Some(ErrorField::Object(e)) => e.message,
                    Some(ErrorField::Text(text)) => Some(text),
                    None => None,
                };
                inner.or(p.message)
            })
            .filter(|m| !m.is_empty())
            .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            });
        ApiError::Status {
            status,
            code,
            message,
        }
    }

    /// Whether the backend refused the credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::MissingInitData)
            || matches!(self, ApiError::Status { status, .. } if *status == StatusCode::UNAUTHORIZED)
    }
}

#[derive(serde::Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<ErrorField>,
    #[serde(default)]
    message: Option<String>,
}

/// Group endpoints answer `{"error": "..."}` instead of the object form.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ErrorField {
    Object(ErrorBody),
    Text(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_from_error_object() {
        let err = ApiError::from_response(
            StatusCode::UNAUTHORIZED,
            r#"{"success":false,"error":{"code":"invalid_signature","message":"Init data signature is invalid"}}"#,
        );
        match &err {
            ApiError::Status { code, message, .. } => {
                assert_eq!(code.as_deref(), Some("invalid_signature"));
                assert_eq!(message, "Init data signature is invalid");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_message_from_top_level() {
        let err = ApiError::from_response(StatusCode::BAD_REQUEST, r#"{"message":"bad view"}"#);
        assert_eq!(err.to_string(), "400 Bad Request: bad view");
    }

    #[test]
    fn test_message_from_error_string() {
        let err = ApiError::from_response(
            StatusCode::FORBIDDEN,
            r#"{"error":"only group admins can bind"}"#,
        );
        match &err {
            ApiError::Status { code, message, .. } => {
                assert!(code.is_none());
                assert_eq!(message, "only group admins can bind");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_message_from_raw_body() {
        let err = ApiError::from_response(StatusCode::BAD_GATEWAY, "upstream down\n");
        assert_eq!(err.to_string(), "502 Bad Gateway: upstream down");
    }

    #[test]
    fn test_message_from_status_reason() {
        let err = ApiError::from_response(StatusCode::NOT_FOUND, "");
        assert_eq!(err.to_string(), "404 Not Found: Not Found");
        assert!(!err.is_unauthorized());
    }
}
