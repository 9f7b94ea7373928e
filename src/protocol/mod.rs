//! Wire-level constants and header handling for the iTwins API.
//!
//! # Wire Contract
//!
//! | Direction | Item | Value |
//! |-----------|------|-------|
//! | Request | `authorization` | caller credential, verbatim |
//! | Request | `content-type` | `application/json` unless caller/body says otherwise |
//! | Response | `location` | redirect target on a 302 |
//! | Response | error body | `{"error": {"code", "message", "details"?, "target"?}}` |

pub mod headers;

pub use headers::{build_request_headers, header_value};

/// Protocol constants.
pub mod constants {
    /// Header names, always lower-case.
    pub mod headers {
        /// Carries the caller credential.
        pub const AUTHORIZATION: &str = "authorization";
        /// Request body media type.
        pub const CONTENT_TYPE: &str = "content-type";
        /// Redirect target.
        pub const LOCATION: &str = "location";
    }

    /// Media types.
    pub mod media {
        /// Default for every request.
        pub const JSON: &str = "application/json";
        /// Binary bodies with no declared type.
        pub const OCTET_STREAM: &str = "application/octet-stream";
    }

    /// Status codes the request core branches on or produces.
    pub mod status {
        /// Success with no body.
        pub const NO_CONTENT: u16 = 204;
        /// The only status treated as an explicit redirect.
        pub const FOUND: u16 = 302;
        /// `RedirectsNotAllowed`
        pub const FORBIDDEN: u16 = 403;
        /// Generic internal failure.
        pub const INTERNAL_SERVER_ERROR: u16 = 500;
        /// `InvalidRedirect` and `InvalidRedirectUrl`
        pub const BAD_GATEWAY: u16 = 502;
        /// `TooManyRedirects`
        pub const LOOP_DETECTED: u16 = 508;
    }

    /// Stable machine-readable error codes.
    pub mod codes {
        /// Redirect met, caller did not opt in.
        pub const REDIRECTS_NOT_ALLOWED: &str = "RedirectsNotAllowed";
        /// 302 without a usable `Location`.
        pub const INVALID_REDIRECT: &str = "InvalidRedirect";
        /// `Location` failed validation.
        pub const INVALID_REDIRECT_URL: &str = "InvalidRedirectUrl";
        /// Hop bound reached.
        pub const TOO_MANY_REDIRECTS: &str = "TooManyRedirects";
        /// Anything the core cannot classify.
        pub const INTERNAL_SERVER_ERROR: &str = "InternalServerError";
    }
}

/// Whether `status` is in the 2xx range.
#[inline]
pub fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_success_status() {
        assert!(is_success_status(200));
        assert!(is_success_status(204));
        assert!(!is_success_status(302));
        assert!(!is_success_status(404));
        assert!(!is_success_status(199));
    }
}
