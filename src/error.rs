//! Error types for the iTwins request core.
//!
//! Most failures never surface as a [`ClientError`]: the dispatcher folds them
//! into a [`ResponseEnvelope`](crate::ResponseEnvelope) so callers see one
//! uniform shape. The variants below exist for the internal plumbing and for
//! the few conditions that are reported straight to the caller.
//!
//! # Error Categories
//!
//! | Category | Variants | Reaches caller as `Err` |
//! |----------|----------|-------------------------|
//! | Programmer | `MissingCredential`, `MissingUrl` | Yes |
//! | Caller-initiated | `Cancelled` | Yes |
//! | Configuration | `Config` | Yes (at construction) |
//! | Runtime | `Http`, `Json`, `UnexpectedErrorShape` | No, flattened to a 500 envelope |
//!
//! # Examples
//!
//! ```
//! use itwins_client::ClientError;
//!
//! assert!(ClientError::MissingCredential.is_caller_error());
//! assert!(!ClientError::Http("connection reset".into()).is_caller_error());
//! ```

use thiserror::Error;

/// Result type for request-core operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while building, sending or decoding a request.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ClientError {
    /// `send` was called with an empty credential.
    #[error("credential is required")]
    MissingCredential,

    /// `send` was called with an empty URL.
    #[error("url is required")]
    MissingUrl,

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The transport failed to complete a request (DNS, TLS, connect, read).
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A failed response whose body is not `{"error": {"code", "message"}}`.
    #[error("Unexpected error body for status {0}")]
    UnexpectedErrorShape(u16),

    /// The caller cancelled the request before it resolved.
    #[error("Request cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for ClientError {
    /// Drops the request URL: its query string may carry signed tokens.
    fn from(err: reqwest::Error) -> Self {
        ClientError::Http(err.without_url().to_string())
    }
}

impl ClientError {
    /// Whether this error is reported to the caller as `Err` rather than being
    /// flattened into the generic `InternalServerError` envelope.
    #[inline]
    #[must_use]
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            ClientError::MissingCredential
                | ClientError::MissingUrl
                | ClientError::Config(_)
                | ClientError::Cancelled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_errors() {
        assert!(ClientError::MissingCredential.is_caller_error());
        assert!(ClientError::MissingUrl.is_caller_error());
        assert!(ClientError::Cancelled.is_caller_error());
        assert!(ClientError::Config("bad".into()).is_caller_error());
    }

    #[test]
    fn test_runtime_errors_are_flattened() {
        assert!(!ClientError::Http("dns".into()).is_caller_error());
        assert!(!ClientError::UnexpectedErrorShape(500).is_caller_error());
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(!ClientError::from(json_err).is_caller_error());
    }

    #[tokio::test]
    async fn test_http_error_omits_url() {
        let err = reqwest::get("http://127.0.0.1:1/itwins?sig=SECRET_SAS_TOKEN")
            .await
            .unwrap_err();
        let text = ClientError::from(err).to_string();
        assert!(text.starts_with("HTTP error"), "{text}");
        assert!(!text.contains("SECRET_SAS_TOKEN"), "{text}");
        assert!(!text.contains("127.0.0.1"), "{text}");
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ClientError::UnexpectedErrorShape(418).to_string(),
            "Unexpected error body for status 418"
        );
        assert_eq!(ClientError::MissingUrl.to_string(), "url is required");
    }
}
