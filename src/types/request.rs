//! Outgoing request types.

use std::collections::BTreeMap;

use bytes::Bytes;
use http::Method;
use serde::Serialize;

use crate::error::Result;

/// Body of an outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Serialized as JSON on the wire.
    Json(serde_json::Value),

    /// Opaque payload (e.g. an image upload) sent as-is, never JSON-encoded.
    Binary {
        /// Payload bytes.
        data: Bytes,
        /// Used as `content-type` unless the caller supplied one.
        content_type: Option<String>,
    },
}

impl RequestBody {
    /// Serialize any value into a JSON body.
    pub fn json<S: Serialize + ?Sized>(value: &S) -> Result<Self> {
        Ok(RequestBody::Json(serde_json::to_value(value)?))
    }

    /// Wrap raw bytes with an optional media type.
    pub fn binary(data: impl Into<Bytes>, content_type: Option<&str>) -> Self {
        RequestBody::Binary {
            data: data.into(),
            content_type: content_type.map(str::to_string),
        }
    }

    /// Wire encoding of the body.
    pub fn to_bytes(&self) -> Result<Bytes> {
        match self {
            RequestBody::Json(value) => Ok(Bytes::from(serde_json::to_vec(value)?)),
            RequestBody::Binary { data, .. } => Ok(data.clone()),
        }
    }
}

/// A single HTTP request as sent on one hop.
///
/// Built once per call by the dispatcher. Redirect hops derive a new spec via
/// [`RequestSpec::with_url`]; an existing spec is never modified.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    /// HTTP verb, reused on every hop.
    pub method: Method,
    /// Absolute target URL.
    pub url: String,
    /// Lower-cased header names.
    pub headers: BTreeMap<String, String>,
    /// Encoded body, if any.
    pub body: Option<Bytes>,
}

impl RequestSpec {
    /// Same method, headers and body aimed at a different URL.
    #[must_use]
    pub fn with_url(&self, url: impl Into<String>) -> Self {
        RequestSpec {
            method: self.method.clone(),
            url: url.into(),
            headers: self.headers.clone(),
            body: self.body.clone(),
        }
    }
}

/// A call as described by the caller.
///
/// # Examples
///
/// ```
/// use itwins_client::{ApiRequest, RequestBody};
/// use serde_json::json;
///
/// let request = ApiRequest::post("https://api.bentley.com/itwins")
///     .with_body(RequestBody::Json(json!({"displayName": "Bridge"})))
///     .with_header("Prefer", "return=representation")
///     .allow_redirects(true);
/// assert!(request.allow_redirects);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP verb.
    pub method: Method,
    /// Absolute target URL.
    pub url: String,
    /// Request body, if any.
    pub body: Option<RequestBody>,
    /// Extra headers; names are matched case-insensitively.
    pub headers: BTreeMap<String, String>,
    /// Follow validated redirects instead of failing with `RedirectsNotAllowed`.
    pub allow_redirects: bool,
}

impl ApiRequest {
    /// Request with no body, no extra headers and redirects refused.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        ApiRequest {
            method,
            url: url.into(),
            body: None,
            headers: BTreeMap::new(),
            allow_redirects: false,
        }
    }

    /// `GET` request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// `POST` request.
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    /// `PUT` request.
    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    /// `PATCH` request.
    pub fn patch(url: impl Into<String>) -> Self {
        Self::new(Method::PATCH, url)
    }

    /// `DELETE` request.
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Attach a body.
    #[must_use]
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Add or replace one header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Merge several headers.
    #[must_use]
    pub fn with_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Opt in to following validated redirects.
    #[must_use]
    pub fn allow_redirects(mut self, allow: bool) -> Self {
        self.allow_redirects = allow;
        self
    }
}
