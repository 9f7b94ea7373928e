//! Outgoing header assembly and case-insensitive header lookup.
//!
//! # Rules
//!
//! | Header | Source |
//! |--------|--------|
//! | caller headers | copied, names lower-cased |
//! | `authorization` | always the credential, overriding any caller value |
//! | `content-type` | caller value, else the binary body's type, else `application/json` |
//!
//! # Examples
//!
//! ```
//! use std::collections::BTreeMap;
//! use itwins_client::protocol::build_request_headers;
//!
//! let headers = build_request_headers("Bearer abc", &BTreeMap::new(), None);
//! assert_eq!(headers["authorization"], "Bearer abc");
//! assert_eq!(headers["content-type"], "application/json");
//! ```

use std::collections::BTreeMap;

use super::constants::{headers, media};
use crate::types::RequestBody;

/// Build the header map for one outgoing request.
///
/// # Arguments
///
/// * `credential` - Value placed verbatim in `authorization`
/// * `caller` - Headers supplied by the caller (any case)
/// * `body` - The request body, consulted for a binary content type
pub fn build_request_headers(
    credential: &str,
    caller: &BTreeMap<String, String>,
    body: Option<&RequestBody>,
) -> BTreeMap<String, String> {
    let mut out: BTreeMap<String, String> = caller
        .iter()
        .map(|(k, v)| (k.to_ascii_lowercase(), v.clone()))
        .collect();

    out.insert(headers::AUTHORIZATION.to_string(), credential.to_string());

    if !out.contains_key(headers::CONTENT_TYPE) {
        let content_type = match body {
            Some(RequestBody::Binary { content_type, .. }) => content_type
                .clone()
                .unwrap_or_else(|| media::OCTET_STREAM.to_string()),
            _ => media::JSON.to_string(),
        };
        out.insert(headers::CONTENT_TYPE.to_string(), content_type);
    }

    out
}

/// Look up a header by name, ignoring case.
pub fn header_value<'a>(headers: &'a BTreeMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn caller(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_to_json() {
        let h = build_request_headers("Bearer t", &BTreeMap::new(), None);
        assert_eq!(h.len(), 2);
        assert_eq!(h["content-type"], "application/json");
    }

    #[test]
    fn test_credential_overrides_caller_authorization() {
        let caller_headers = caller(&[("Authorization", "Bearer fake")]);
        let h = build_request_headers("Bearer real", &caller_headers, None);
        assert_eq!(h["authorization"], "Bearer real");
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn test_caller_content_type_is_kept() {
        let h = build_request_headers(
            "t",
            &caller(&[("Content-Type", "application/merge-patch+json")]),
            Some(&RequestBody::Json(serde_json::json!({"a": 1}))),
        );
        assert_eq!(h["content-type"], "application/merge-patch+json");
    }

    #[test]
    fn test_binary_body_content_type() {
        let body = RequestBody::Binary {
            data: Bytes::from_static(b"\x89PNG"),
            content_type: Some("image/png".into()),
        };
        let h = build_request_headers("t", &BTreeMap::new(), Some(&body));
        assert_eq!(h["content-type"], "image/png");

        let untyped = RequestBody::Binary {
            data: Bytes::from_static(b"raw"),
            content_type: None,
        };
        let h = build_request_headers("t", &BTreeMap::new(), Some(&untyped));
        assert_eq!(h["content-type"], "application/octet-stream");
    }

    #[test]
    fn test_extra_headers_lowercased() {
        let h = build_request_headers("t", &caller(&[("Prefer", "return=representation")]), None);
        assert_eq!(h["prefer"], "return=representation");
    }

    #[test]
    fn test_header_value_case_insensitive() {
        let h = caller(&[("Location", "https://api.bentley.com/x")]);
        assert_eq!(header_value(&h, "location"), Some("https://api.bentley.com/x"));
        assert_eq!(header_value(&h, "LOCATION"), Some("https://api.bentley.com/x"));
        assert_eq!(header_value(&h, "etag"), None);
    }
}
