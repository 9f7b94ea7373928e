//! Redirect URL validation against a domain allow-list.

use thiserror::Error;
use url::Url;

/// Production API host.
pub const DEFAULT_ALLOWED_DOMAIN: &str = "api.bentley.com";

/// Why a redirect target was refused. The message names the offending part.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlRejection {
    /// Not an absolute URL with a host.
    #[error("malformed URL: {0}")]
    Malformed(String),

    /// Any scheme other than `https`.
    #[error("HTTPS required, got {0}")]
    InsecureScheme(String),

    /// Host is neither an allowed domain nor a `-`-prefixed variant of one.
    #[error("redirect host not allowed: {0}")]
    HostNotAllowed(String),
}

impl UrlRejection {
    /// Short tag for logs. Unlike `Display`, never echoes the candidate URL.
    pub fn kind(&self) -> &'static str {
        match self {
            UrlRejection::Malformed(_) => "malformed",
            UrlRejection::InsecureScheme(_) => "insecure_scheme",
            UrlRejection::HostNotAllowed(_) => "host_not_allowed",
        }
    }
}

/// Allow-list of domains a credential may be redirected to.
///
/// Validation is pure: no I/O, no state, same answer for the same input.
///
/// # Examples
///
/// ```
/// use itwins_client::redirect::RedirectPolicy;
///
/// let policy = RedirectPolicy::default();
/// assert!(policy.validate("https://api.bentley.com/itwins").is_ok());
/// assert!(policy.validate("https://qa-api.bentley.com/itwins").is_ok());
/// assert!(policy.validate("https://api.bentley.com.evil.com/").is_err());
/// assert!(policy.validate("http://api.bentley.com/").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectPolicy {
    allowed_domains: Vec<String>,
}

impl Default for RedirectPolicy {
    fn default() -> Self {
        Self::new([DEFAULT_ALLOWED_DOMAIN])
    }
}

impl RedirectPolicy {
    /// Policy over `domains`, trimmed and lower-cased. Blank entries are dropped.
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        RedirectPolicy {
            allowed_domains: domains
                .into_iter()
                .map(|d| d.as_ref().trim().to_ascii_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    /// Normalized allow-list.
    pub fn allowed_domains(&self) -> &[String] {
        &self.allowed_domains
    }

    /// Check a candidate redirect target, returning the parsed URL on success.
    pub fn validate(&self, candidate: &str) -> Result<Url, UrlRejection> {
        let url =
            Url::parse(candidate).map_err(|_| UrlRejection::Malformed(candidate.to_string()))?;

        if url.scheme() != "https" {
            return Err(UrlRejection::InsecureScheme(url.scheme().to_string()));
        }

        let host = url
            .host_str()
            .ok_or_else(|| UrlRejection::Malformed(candidate.to_string()))?
            .to_ascii_lowercase();

        if !self.is_host_allowed(&host) {
            return Err(UrlRejection::HostNotAllowed(host));
        }

        Ok(url)
    }

    /// Exact match, or a `-`-separated environment prefix. Nothing else.
    pub fn is_host_allowed(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        self.allowed_domains.iter().any(|domain| {
            host == *domain
                || host
                    .strip_suffix(domain.as_str())
                    .is_some_and(|prefix| prefix.ends_with('-'))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_err;

    fn policy() -> RedirectPolicy {
        RedirectPolicy::default()
    }

    #[test]
    fn test_exact_and_prefixed_hosts() {
        for url in [
            "https://api.bentley.com/itwins/1",
            "https://API.Bentley.com/itwins",
            "https://dev-api.bentley.com/",
            "https://qa-api.bentley.com/itwins?$top=1",
            "https://api.bentley.com:443/x",
        ] {
            assert!(policy().validate(url).is_ok(), "{url} should pass");
        }
    }

    #[test]
    fn test_lookalike_hosts_rejected() {
        for (url, host) in [
            ("https://api.bentley.com.evil.com/", "api.bentley.com.evil.com"),
            ("https://evil.com.api.bentley.com/", "evil.com.api.bentley.com"),
            ("https://evilapi.bentley.com/", "evilapi.bentley.com"),
            ("https://bentley.com/", "bentley.com"),
            ("https://api.bentley.com.", "api.bentley.com."),
            ("https://api.bentley.com@evil.com/", "evil.com"),
            ("https://evil.com/x", "evil.com"),
        ] {
            let err = policy().validate(url).unwrap_err();
            assert_eq!(err, UrlRejection::HostNotAllowed(host.to_string()), "{url}");
            assert!(err.to_string().contains(host));
        }
    }

    #[test]
    fn test_non_https_rejected() {
        for (url, scheme) in [
            ("http://api.bentley.com/", "http"),
            ("file:///etc/passwd", "file"),
            ("javascript:alert(1)", "javascript"),
            ("data:text/html,hi", "data"),
            ("ftp://api.bentley.com/", "ftp"),
        ] {
            let err = policy().validate(url).unwrap_err();
            assert!(err.to_string().contains("HTTPS required"), "{url}");
            assert!(err.to_string().contains(scheme));
        }
    }

    #[test]
    fn test_malformed_rejected() {
        for url in ["", "not a url", "/relative/path", "https://", "://api.bentley.com"] {
            let err = policy().validate(url).unwrap_err();
            assert!(err.to_string().contains("malformed URL"), "{url}: {err}");
        }
    }

    #[test]
    fn test_kind_never_echoes_candidate() {
        let err = policy().validate("not a url?sig=SECRET").unwrap_err();
        assert!(err.to_string().contains("SECRET"));
        assert_eq!(err.kind(), "malformed");
        let err = policy().validate("http://api.bentley.com/").unwrap_err();
        assert_eq!(err.kind(), "insecure_scheme");
        let err = policy().validate("https://evil.com/").unwrap_err();
        assert_eq!(err.kind(), "host_not_allowed");
    }

    #[test]
    fn test_validate_is_deterministic() {
        let p = policy();
        for url in ["https://api.bentley.com/", "https://evil.com/", "garbage"] {
            let first = p.validate(url);
            for _ in 0..3 {
                assert_eq!(p.validate(url), first);
            }
        }
        assert_eq!(p, policy());
    }

    #[test]
    fn test_multiple_domains() {
        let p = RedirectPolicy::new([" Api.Bentley.com ", "connect.example.org", ""]);
        assert_eq!(p.allowed_domains(), ["api.bentley.com", "connect.example.org"]);
        assert!(p.is_host_allowed("prod-connect.example.org"));
        assert!(!p.is_host_allowed("example.org"));
    }

    #[test]
    fn test_empty_allow_list_rejects_everything() {
        let p = RedirectPolicy::new(Vec::<String>::new());
        assert_err!(p.validate("https://api.bentley.com/"));
    }
}
