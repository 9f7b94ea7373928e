//! Redirect resolution for [`RequestSender`].
//!
//! Two paths lead here, both only when the caller allowed redirects:
//!
//! - A `302 Found` with a readable `Location`: each hop is bounded, validated
//!   against the allow-list and re-issued in manual mode, in a loop.
//! - An opaque redirect: the target is hidden, so the original request is sent
//!   once more in follow mode and the URL it ended on is validated afterwards.

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::client::fetch::RequestSender;
use crate::client::normalize::normalize;
use crate::client::transport::{RedirectMode, Transport};
use crate::client::utils::log_target;
use crate::error::Result;
use crate::protocol::constants::{headers, status};
use crate::redirect::RedirectState;
use crate::types::{ApiError, RawResponse, RequestSpec, ResponseEnvelope};

impl<T: Transport> RequestSender<T> {
    /// Follow a chain of `302` responses starting from `response`.
    ///
    /// `state` describes the request that produced `response`. The hop bound is
    /// checked before anything else on every iteration, so at most
    /// `max_redirects` hops are issued.
    pub(crate) async fn follow_redirects<R: DeserializeOwned>(
        &self,
        mut response: RawResponse,
        mut state: RedirectState,
        cancel: &CancellationToken,
    ) -> Result<ResponseEnvelope<R>> {
        let max_redirects = self.config().max_redirects;

        loop {
            if state.is_exhausted(max_redirects) {
                tracing::warn!(max_redirects, "redirect limit reached");
                return Ok(ResponseEnvelope::failure(
                    status::LOOP_DETECTED,
                    ApiError::too_many_redirects(max_redirects),
                ));
            }

            let location = match response
                .header(headers::LOCATION)
                .map(str::trim)
                .filter(|l| !l.is_empty())
            {
                Some(location) => location.to_string(),
                None => {
                    return Ok(ResponseEnvelope::failure(
                        status::BAD_GATEWAY,
                        ApiError::invalid_redirect(),
                    ));
                }
            };

            let target = match self.policy().validate(&location) {
                Ok(url) => url,
                Err(rejection) => {
                    tracing::warn!(
                        depth = state.depth(),
                        reason = rejection.kind(),
                        target = %log_target(&location),
                        "refusing redirect"
                    );
                    return Ok(ResponseEnvelope::failure(
                        status::BAD_GATEWAY,
                        ApiError::invalid_redirect_url(rejection.to_string()),
                    ));
                }
            };

            state = state.next_hop(target.as_str());
            tracing::debug!(
                depth = state.depth(),
                target = %log_target(target.as_str()),
                "following redirect"
            );

            response = self
                .execute(state.request(), RedirectMode::Manual, cancel)
                .await?;

            if !response.is_found() {
                return normalize(&response);
            }
        }
    }

    /// Re-send `spec` letting the transport follow redirects, then make sure
    /// the response did not come from outside the allow-list.
    pub(crate) async fn retry_following<R: DeserializeOwned>(
        &self,
        spec: &RequestSpec,
        cancel: &CancellationToken,
    ) -> Result<ResponseEnvelope<R>> {
        let response = self.execute(spec, RedirectMode::Follow, cancel).await?;

        if response.redirected {
            if let Err(rejection) = self.policy().validate(&response.url) {
                tracing::warn!(
                    reason = rejection.kind(),
                    target = %log_target(&response.url),
                    "followed redirect ended outside the allow-list"
                );
                return Ok(ResponseEnvelope::failure(
                    status::BAD_GATEWAY,
                    ApiError::invalid_redirect_url(rejection.to_string()),
                ));
            }
        }

        normalize(&response)
    }
}
