//! Configuration for the iTwins request core.
//!
//! A [`ClientConfig`] is fixed when a client is constructed and shared
//! read-only by every call made through that client, so concurrent calls
//! always observe the same redirect bound and allow-list.
//!
//! # Configuration Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `base_url` | `https://api.bentley.com/itwins` | Resource root |
//! | `max_redirects` | 5 | Redirect hops followed before `TooManyRedirects` |
//! | `allowed_redirect_domains` | `["api.bentley.com"]` | Redirect allow-list |
//! | `request_timeout_ms` | 30000 | Per-hop transport timeout |
//! | `enable_logging` | false | Per-hop request logging |
//!
//! # Examples
//!
//! ```
//! use itwins_client::ClientConfig;
//!
//! let config = ClientConfig::default().with_url_prefix("dev-").with_max_redirects(2);
//! assert_eq!(config.base_url, "https://dev-api.bentley.com/itwins");
//! assert_eq!(config.max_redirects, 2);
//! ```

use url::Url;

use crate::error::{ClientError, Result};
use crate::redirect::{RedirectPolicy, DEFAULT_ALLOWED_DOMAIN};

/// Default resource root.
pub const DEFAULT_BASE_URL: &str = "https://api.bentley.com/itwins";

/// Default redirect hop bound.
pub const DEFAULT_MAX_REDIRECTS: u32 = 5;

/// Environment variable consulted by [`ClientConfig::from_env`] for the bound.
pub const MAX_REDIRECTS_ENV: &str = "ITWINS_MAX_REDIRECTS";

/// Environment variable consulted by [`ClientConfig::from_env`] for the host prefix.
pub const URL_PREFIX_ENV: &str = "ITWINS_URL_PREFIX";

/// Configuration for an iTwins client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Root URL that resource paths are joined onto.
    pub base_url: String,

    /// Maximum redirect hops followed for one call.
    ///
    /// Checked before each hop: with a bound of 5, five hops are followed and
    /// the sixth redirect fails with `TooManyRedirects`.
    pub max_redirects: u32,

    /// Domains a redirect may target (exactly, or with a `-` prefix).
    pub allowed_redirect_domains: Vec<String>,

    /// Per-hop request timeout in milliseconds.
    pub request_timeout_ms: u64,

    /// Log every hop through `tracing`.
    pub enable_logging: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            allowed_redirect_domains: vec![DEFAULT_ALLOWED_DOMAIN.to_string()],
            request_timeout_ms: 30000,
            enable_logging: false,
        }
    }
}

impl ClientConfig {
    /// Defaults, overridden by `ITWINS_MAX_REDIRECTS` and `ITWINS_URL_PREFIX`.
    ///
    /// Reads the environment once, here. Nothing else in the crate looks at
    /// process state, so clients built from explicit configs are unaffected.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(prefix) = lookup(URL_PREFIX_ENV).filter(|p| !p.trim().is_empty()) {
            config = config.with_url_prefix(prefix.trim());
        }

        if let Some(raw) = lookup(MAX_REDIRECTS_ENV) {
            let max = raw.trim().parse::<u32>().map_err(|_| {
                ClientError::Config(format!(
                    "{MAX_REDIRECTS_ENV} must be a non-negative integer, got {raw:?}"
                ))
            })?;
            config.max_redirects = max;
        }

        Ok(config)
    }

    /// Prefix the base URL host, e.g. `dev-` turns `api.bentley.com` into
    /// `dev-api.bentley.com`. Prefixed hosts stay inside the redirect allow-list.
    #[must_use]
    pub fn with_url_prefix(mut self, prefix: &str) -> Self {
        if let Ok(mut url) = Url::parse(&self.base_url) {
            if let Some(host) = url.host_str().map(|h| format!("{prefix}{h}")) {
                if url.set_host(Some(&host)).is_ok() {
                    self.base_url = url.as_str().trim_end_matches('/').to_string();
                }
            }
        }
        self
    }

    /// Replace the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replace the redirect bound.
    #[must_use]
    pub fn with_max_redirects(mut self, max_redirects: u32) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    /// Add a domain to the redirect allow-list.
    #[must_use]
    pub fn with_allowed_domain(mut self, domain: impl Into<String>) -> Self {
        self.allowed_redirect_domains.push(domain.into());
        self
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.base_url)
            .map_err(|e| {
                ClientError::Config(format!("invalid base_url {:?}: {e}", self.base_url))
            })?;
        if self.redirect_policy().allowed_domains().is_empty() {
            return Err(ClientError::Config(
                "allowed_redirect_domains must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Validator built from the allow-list.
    pub fn redirect_policy(&self) -> RedirectPolicy {
        RedirectPolicy::new(&self.allowed_redirect_domains)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://api.bentley.com/itwins");
        assert_eq!(config.max_redirects, 5);
        assert_eq!(config.allowed_redirect_domains, vec!["api.bentley.com"]);
        assert!(!config.enable_logging);
        assert_ok!(config.validate());
    }

    #[test]
    fn test_partial_override() {
        let config = ClientConfig {
            max_redirects: 10,
            ..Default::default()
        };
        assert_eq!(config.max_redirects, 10);
        assert_eq!(config.request_timeout_ms, 30000);
    }

    #[test]
    fn test_env_overrides() {
        let vars = lookup(&[(MAX_REDIRECTS_ENV, " 2 "), (URL_PREFIX_ENV, "qa-")]);
        let config = ClientConfig::from_lookup(vars).unwrap();
        assert_eq!(config.max_redirects, 2);
        assert_eq!(config.base_url, "https://qa-api.bentley.com/itwins");
        assert_ok!(config.redirect_policy().validate(&config.base_url));
    }

    #[test]
    fn test_env_absent_gives_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_env_bad_number() {
        let err = ClientConfig::from_lookup(lookup(&[(MAX_REDIRECTS_ENV, "five")])).unwrap_err();
        assert!(matches!(err, ClientError::Config(msg) if msg.contains("five")));
    }

    #[test]
    fn test_validate_rejects_bad_config() {
        assert_err!(ClientConfig::default().with_base_url("not a url").validate());
        let config = ClientConfig {
            allowed_redirect_domains: vec!["  ".into()],
            ..Default::default()
        };
        assert_err!(config.validate());
    }

    #[test]
    fn test_with_allowed_domain() {
        let config = ClientConfig::default().with_allowed_domain("connect.example.org");
        assert!(config.redirect_policy().is_host_allowed("dev-connect.example.org"));
    }
}
