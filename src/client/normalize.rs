//! Turning a terminal [`RawResponse`] into a [`ResponseEnvelope`].
//!
//! | Response | Envelope |
//! |----------|----------|
//! | 204 | `{status}` |
//! | 2xx, empty body | `{status}` |
//! | 2xx, JSON body | `{status, data}` |
//! | non-2xx, `{"error": {code, message, ..}}` | `{status, error}` |
//! | non-2xx, anything else | `Err(UnexpectedErrorShape)` |
//!
//! Errors returned here are not meant for the caller: the dispatcher turns
//! them into the generic `InternalServerError` envelope.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{ClientError, Result};
use crate::protocol::constants::status;
use crate::types::{ApiError, RawResponse, ResponseEnvelope};

/// The only failure body shape passed through to callers.
#[derive(Deserialize)]
struct ErrorBody {
    error: ApiError,
}

/// Normalize a terminal response.
pub fn normalize<T: DeserializeOwned>(response: &RawResponse) -> Result<ResponseEnvelope<T>> {
    if response.status == status::NO_CONTENT {
        return Ok(ResponseEnvelope::no_content(response.status));
    }

    let parsed: Option<serde_json::Value> = if response.body.is_empty() {
        None
    } else {
        Some(serde_json::from_slice(&response.body)?)
    };

    if !response.is_success() {
        return match parsed.map(serde_json::from_value::<ErrorBody>) {
            Some(Ok(body)) => Ok(ResponseEnvelope::failure(response.status, body.error)),
            _ => Err(ClientError::UnexpectedErrorShape(response.status)),
        };
    }

    match parsed {
        None => Ok(ResponseEnvelope::no_content(response.status)),
        Some(value) => Ok(ResponseEnvelope::success(
            response.status,
            Some(serde_json::from_value(value)?),
        )),
    }
}
