//! The request dispatcher: one authenticated call in, one envelope out.
//!
//! # Flow
//!
//! ```text
//! send ─► build RequestSpec ─► transport (Manual)
//!                                  │
//!        ┌─────────────────────────┼──────────────────────────┐
//!   opaque redirect           302 Found                   anything else
//!        │                         │                          │
//!  allow? retry in Follow   allow? follow_redirects         normalize
//!        │                         │
//!  validate final URL       validate + re-issue per hop
//! ```
//!
//! Redirects the caller did not opt into yield `403 RedirectsNotAllowed`.
//! Every failure the core cannot classify (network, TLS, JSON, unexpected
//! body shape) becomes the same `500 InternalServerError` envelope, so callers
//! cannot tell those internal failure modes apart.
//!
//! # Examples
//!
//! ```ignore
//! use itwins_client::{ApiRequest, RequestSender};
//! use serde_json::Value;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sender = RequestSender::new()?;
//!     let response = sender
//!         .send::<Value>("Bearer <token>", ApiRequest::get("https://api.bentley.com/itwins"))
//!         .await?;
//!     println!("Status: {}", response.status());
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::client::config::ClientConfig;
use crate::client::normalize::normalize;
use crate::client::transport::{RedirectMode, ReqwestTransport, Transport};
use crate::client::utils::log_target;
use crate::error::{ClientError, Result};
use crate::protocol;
use crate::redirect::{RedirectPolicy, RedirectState};
use crate::types::{ApiRequest, RawResponse, RequestSpec, ResponseEnvelope};

/// Sends authenticated requests and decides which redirects are safe to follow.
///
/// Holds only immutable state (config, allow-list, transport), so one sender
/// can serve any number of concurrent calls. Cloning is cheap.
pub struct RequestSender<T = ReqwestTransport> {
    transport: Arc<T>,
    config: Arc<ClientConfig>,
    policy: Arc<RedirectPolicy>,
}

impl<T> Clone for RequestSender<T> {
    fn clone(&self) -> Self {
        RequestSender {
            transport: Arc::clone(&self.transport),
            config: Arc::clone(&self.config),
            policy: Arc::clone(&self.policy),
        }
    }
}

impl RequestSender<ReqwestTransport> {
    /// Sender with default configuration over `reqwest`.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Sender with custom configuration over `reqwest`.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> RequestSender<T> {
    /// Sender over any [`Transport`].
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        let policy = config.redirect_policy();
        RequestSender {
            transport: Arc::new(transport),
            config: Arc::new(config),
            policy: Arc::new(policy),
        }
    }

    /// Send a request and normalize the outcome.
    ///
    /// # Errors
    ///
    /// Only [`ClientError::MissingCredential`] and [`ClientError::MissingUrl`].
    /// Everything else, including transport failures, is reported inside the
    /// returned envelope.
    pub async fn send<R: DeserializeOwned>(
        &self,
        credential: &str,
        request: ApiRequest,
    ) -> Result<ResponseEnvelope<R>> {
        self.send_with_cancel(credential, request, &CancellationToken::new())
            .await
    }

    /// [`send`](Self::send), abortable through `cancel` at any hop.
    ///
    /// # Errors
    ///
    /// As `send`, plus [`ClientError::Cancelled`] once `cancel` fires.
    pub async fn send_with_cancel<R: DeserializeOwned>(
        &self,
        credential: &str,
        request: ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<ResponseEnvelope<R>> {
        if credential.trim().is_empty() {
            return Err(ClientError::MissingCredential);
        }
        if request.url.trim().is_empty() {
            return Err(ClientError::MissingUrl);
        }

        match self.dispatch(credential, &request, cancel).await {
            Ok(envelope) => Ok(envelope),
            Err(ClientError::Cancelled) => Err(ClientError::Cancelled),
            Err(err) => {
                tracing::error!(
                    method = %request.method,
                    target = %log_target(&request.url),
                    error = %err,
                    "request failed, returning generic internal error"
                );
                Ok(ResponseEnvelope::internal_error())
            }
        }
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn policy(&self) -> &RedirectPolicy {
        &self.policy
    }

    async fn dispatch<R: DeserializeOwned>(
        &self,
        credential: &str,
        request: &ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<ResponseEnvelope<R>> {
        let spec = build_spec(credential, request)?;
        let response = self.execute(&spec, RedirectMode::Manual, cancel).await?;

        if response.is_opaque_redirect() {
            if !request.allow_redirects {
                return Ok(ResponseEnvelope::redirects_not_allowed());
            }
            return self.retry_following(&spec, cancel).await;
        }

        if response.is_found() {
            if !request.allow_redirects {
                return Ok(ResponseEnvelope::redirects_not_allowed());
            }
            return self
                .follow_redirects(response, RedirectState::initial(spec), cancel)
                .await;
        }

        normalize(&response)
    }

    /// One exchange, raced against cancellation.
    pub(crate) async fn execute(
        &self,
        spec: &RequestSpec,
        mode: RedirectMode,
        cancel: &CancellationToken,
    ) -> Result<RawResponse> {
        if self.config.enable_logging {
            tracing::debug!(
                method = %spec.method,
                target = %log_target(&spec.url),
                ?mode,
                "sending request"
            );
        }

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ClientError::Cancelled),
            result = self.transport.execute(spec, mode) => result?,
        };

        if self.config.enable_logging {
            tracing::debug!(
                status = response.status,
                redirected = response.redirected,
                "received response"
            );
        }

        Ok(response)
    }
}

/// Build the wire request for the first hop.
fn build_spec(credential: &str, request: &ApiRequest) -> Result<RequestSpec> {
    let headers =
        protocol::build_request_headers(credential, &request.headers, request.body.as_ref());
    let body = request.body.as_ref().map(|b| b.to_bytes()).transpose()?;

    Ok(RequestSpec {
        method: request.method.clone(),
        url: request.url.clone(),
        headers,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RequestBody;
    use serde_json::json;

    #[test]
    fn test_sender_creation() {
        let sender = RequestSender::new().unwrap();
        assert_eq!(sender.config().max_redirects, 5);
        let cloned = sender.clone();
        assert!(Arc::ptr_eq(&sender.config, &cloned.config));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ClientConfig::default().with_base_url("::::");
        assert!(matches!(RequestSender::with_config(config), Err(ClientError::Config(_))));
    }

    #[test]
    fn test_build_spec_json() {
        let request = ApiRequest::post("https://api.bentley.com/itwins")
            .with_body(RequestBody::Json(json!({"displayName": "x"})));
        let spec = build_spec("Bearer t", &request).unwrap();
        assert_eq!(spec.headers["authorization"], "Bearer t");
        assert_eq!(spec.headers["content-type"], "application/json");
        assert_eq!(spec.body.unwrap().as_ref(), br#"{"displayName":"x"}"#);
    }

    #[test]
    fn test_build_spec_binary() {
        let request = ApiRequest::put("https://api.bentley.com/itwins/1/image")
            .with_body(RequestBody::binary(vec![1u8, 2, 3], Some("image/png")));
        let spec = build_spec("Bearer t", &request).unwrap();
        assert_eq!(spec.headers["content-type"], "image/png");
        assert_eq!(spec.body.unwrap().as_ref(), &[1, 2, 3]);
    }

    #[test]
    fn test_build_spec_without_body() {
        let spec = build_spec("t", &ApiRequest::get("https://api.bentley.com/itwins")).unwrap();
        assert!(spec.body.is_none());
        assert_eq!(spec.headers["content-type"], "application/json");
    }
}
