//! The transport boundary: one HTTP exchange per call, nothing more.
//!
//! The request core never lets a transport decide on its own to follow a
//! redirect. Every hop is issued in [`RedirectMode::Manual`]; only the
//! opaque-redirect fallback asks for [`RedirectMode::Follow`].
//!
//! [`ReqwestTransport`] is the native implementation. Other environments
//! (e.g. a sandboxed fetch that hides redirect targets) implement
//! [`Transport`] and report [`ResponseKind::OpaqueRedirect`] where needed.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::redirect::Policy;
use url::Url;

use crate::client::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::redirect::RedirectPolicy;
use crate::types::{RawResponse, RequestSpec, ResponseKind};

/// Who follows redirects for a single exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectMode {
    /// Return 3xx responses untouched.
    Manual,
    /// Let the transport follow redirects itself.
    Follow,
}

/// Performs one HTTP exchange.
///
/// Implementations must be safe to share between concurrent calls and must
/// not retry, cache, or follow redirects in `Manual` mode.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` once and return the response as received.
    async fn execute(&self, request: &RequestSpec, mode: RedirectMode) -> Result<RawResponse>;
}

/// [`Transport`] backed by `reqwest`.
///
/// Holds one client per [`RedirectMode`]. The follow-mode client stops at the
/// first hop outside the configured allow-list and errors after
/// `max_redirects` hops.
///
/// A refused hop is reported as the redirect response itself, with `url` set
/// to the refused target and `redirected` set, so the dispatcher's final-URL
/// check rejects it with `InvalidRedirectUrl`. The refused target is never
/// contacted.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    manual: reqwest::Client,
    follow: reqwest::Client,
    policy: RedirectPolicy,
}

impl ReqwestTransport {
    /// Build both clients from `config` (timeout, redirect bound, allow-list).
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let timeout = Duration::from_millis(config.request_timeout_ms);

        let manual = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(Policy::none())
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        let policy = config.redirect_policy();
        let hop_policy = policy.clone();
        let max_redirects = config.max_redirects as usize;
        let follow = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(Policy::custom(move |attempt| {
                if attempt.previous().len() > max_redirects {
                    return attempt.error(format!("too many redirects (limit {max_redirects})"));
                }
                if hop_policy.validate(attempt.url().as_str()).is_ok() {
                    attempt.follow()
                } else {
                    attempt.stop()
                }
            }))
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        Ok(ReqwestTransport {
            manual,
            follow,
            policy,
        })
    }

    /// Target of a redirect the follow-mode policy declined to take.
    fn refused_target(&self, response: &reqwest::Response) -> Option<Url> {
        if !response.status().is_redirection() {
            return None;
        }
        let location = response.headers().get(reqwest::header::LOCATION)?.to_str().ok()?;
        let target = response.url().join(location).ok()?;
        self.policy.validate(target.as_str()).is_err().then_some(target)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: &RequestSpec, mode: RedirectMode) -> Result<RawResponse> {
        let client = match mode {
            RedirectMode::Manual => &self.manual,
            RedirectMode::Follow => &self.follow,
        };

        let mut req_builder = client.request(request.method.clone(), &request.url);

        for (k, v) in &request.headers {
            req_builder = req_builder.header(k, v);
        }

        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.clone());
        }

        let response = req_builder.send().await?;

        let status = response.status().as_u16();
        let refused = match mode {
            RedirectMode::Follow => self.refused_target(&response),
            RedirectMode::Manual => None,
        };
        let (final_url, redirected) = match refused {
            Some(target) => (target, true),
            None => {
                let served = response.url().clone();
                let redirected =
                    Url::parse(&request.url).is_ok_and(|requested| requested != served);
                (served, redirected)
            }
        };

        let mut headers = BTreeMap::new();
        for (k, v) in response.headers() {
            if let Ok(val) = v.to_str() {
                headers.insert(k.as_str().to_string(), val.to_string());
            }
        }

        let body = response.bytes().await?;

        Ok(RawResponse {
            status,
            headers,
            body,
            kind: ResponseKind::Basic,
            redirected,
            url: final_url.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    #[test]
    fn test_transport_creation() {
        let transport = ReqwestTransport::new(&ClientConfig::default());
        assert_ok!(transport);
    }

    #[test]
    fn test_transport_is_shareable() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<ReqwestTransport>();
    }
}
