//! Response types: what the transport returns and what callers receive.

use std::collections::BTreeMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::protocol::{self, constants::{codes, status}};

/// How the transport classified a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseKind {
    /// An ordinary response whose status and headers can be inspected.
    #[default]
    Basic,
    /// A redirect happened but its target is hidden from us (sandboxed
    /// fetch in manual-redirect mode). Status and headers are meaningless.
    OpaqueRedirect,
}

/// A response exactly as the transport produced it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawResponse {
    /// HTTP status; meaningless for an opaque redirect.
    pub status: u16,
    /// Header names lower-cased.
    pub headers: BTreeMap<String, String>,
    /// Raw body bytes.
    pub body: Bytes,
    /// Basic or opaque.
    pub kind: ResponseKind,
    /// The transport followed at least one redirect to produce this response.
    pub redirected: bool,
    /// Final URL the response was served from.
    pub url: String,
}

impl RawResponse {
    /// Basic response with `status` and nothing else.
    pub fn new(status: u16) -> Self {
        RawResponse {
            status,
            ..Default::default()
        }
    }

    /// Opaque-redirect marker response.
    pub fn opaque_redirect() -> Self {
        RawResponse {
            kind: ResponseKind::OpaqueRedirect,
            ..Default::default()
        }
    }

    /// Add a header, lower-casing its name.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Replace the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Set the final URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Mark whether the transport followed redirects.
    #[must_use]
    pub fn with_redirected(mut self, redirected: bool) -> Self {
        self.redirected = redirected;
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        protocol::header_value(&self.headers, name)
    }

    /// Transport hid a redirect from us.
    pub fn is_opaque_redirect(&self) -> bool {
        self.kind == ResponseKind::OpaqueRedirect
    }

    /// A readable `302 Found`.
    pub fn is_found(&self) -> bool {
        self.kind == ResponseKind::Basic && self.status == status::FOUND
    }

    /// 2xx status.
    pub fn is_success(&self) -> bool {
        protocol::is_success_status(self.status)
    }
}

/// One entry of an error's `details` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable tag.
    pub code: String,
    /// Human-readable text.
    pub message: String,
    /// Field or parameter the detail refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// Error payload carried by a failed [`ResponseEnvelope`].
///
/// Either passed through verbatim from a backend `{"error": {...}}` body or
/// produced by the request core itself with one of the codes in
/// [`codes`](crate::protocol::constants::codes). Messages produced here never
/// contain internal exception text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Stable machine-readable tag, e.g. `TooManyRedirects`.
    pub code: String,
    /// Human-readable text. Never internal exception text.
    pub message: String,
    /// Per-field failures, when the backend sends them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ErrorDetail>>,
    /// What the error is about, when the backend says.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl ApiError {
    /// Error with no details or target.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError {
            code: code.into(),
            message: message.into(),
            details: None,
            target: None,
        }
    }

    /// Redirect encountered but the caller opted out.
    pub fn redirects_not_allowed() -> Self {
        Self::new(
            codes::REDIRECTS_NOT_ALLOWED,
            "Redirects are not allowed for this request",
        )
    }

    /// `302` without a `Location` header.
    pub fn invalid_redirect() -> Self {
        Self::new(
            codes::INVALID_REDIRECT,
            "302 redirect response missing Location header",
        )
    }

    /// `Location` refused; `reason` names the offending part.
    pub fn invalid_redirect_url(reason: impl Into<String>) -> Self {
        Self::new(codes::INVALID_REDIRECT_URL, reason)
    }

    /// Hop bound reached; the message names `limit`.
    pub fn too_many_redirects(limit: u32) -> Self {
        Self::new(
            codes::TOO_MANY_REDIRECTS,
            format!("Maximum redirect limit ({limit}) exceeded"),
        )
    }

    /// The deliberately uninformative internal error.
    pub fn internal() -> Self {
        Self::new(
            codes::INTERNAL_SERVER_ERROR,
            "An internal exception happened while calling iTwins Service",
        )
    }
}

/// The uniform outcome of a call.
///
/// At most one of `data` and `error` is populated; a 204 carries neither. The
/// constructors are the only way to build one, which keeps that invariant.
///
/// # Examples
///
/// ```
/// use itwins_client::{ApiError, ResponseEnvelope};
///
/// let ok = ResponseEnvelope::success(200, Some(42));
/// assert_eq!(ok.data(), Some(&42));
///
/// let failed: ResponseEnvelope<i32> =
///     ResponseEnvelope::failure(508, ApiError::too_many_redirects(5));
/// assert_eq!(failed.error().map(|e| e.code.as_str()), Some("TooManyRedirects"));
/// assert!(failed.data().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseEnvelope<T> {
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ApiError>,
}

impl<T> ResponseEnvelope<T> {
    /// Successful outcome with optional decoded data.
    pub fn success(status: u16, data: Option<T>) -> Self {
        ResponseEnvelope {
            status,
            data,
            error: None,
        }
    }

    /// Failed outcome carrying `error`.
    pub fn failure(status: u16, error: ApiError) -> Self {
        ResponseEnvelope {
            status,
            data: None,
            error: Some(error),
        }
    }

    /// Neither data nor error, as for a 204.
    pub fn no_content(status: u16) -> Self {
        ResponseEnvelope {
            status,
            data: None,
            error: None,
        }
    }

    pub(crate) fn redirects_not_allowed() -> Self {
        Self::failure(status::FORBIDDEN, ApiError::redirects_not_allowed())
    }

    pub(crate) fn internal_error() -> Self {
        Self::failure(status::INTERNAL_SERVER_ERROR, ApiError::internal())
    }

    /// HTTP status reported to the caller.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Decoded payload, if any.
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Error payload, if any.
    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    /// Whether this is a failure.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Take the payload.
    pub fn into_data(self) -> Option<T> {
        self.data
    }

    /// Split into the success payload or the error, discarding the status.
    pub fn into_result(self) -> std::result::Result<Option<T>, ApiError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.data),
        }
    }
}
