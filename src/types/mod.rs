//! Core data types for the request core.
//!
//! | Type | Lifetime | Description |
//! |------|----------|-------------|
//! | [`ApiRequest`] | one call | What the caller asks for |
//! | [`RequestSpec`] | one hop | The fully built request put on the wire |
//! | [`RawResponse`] | one hop | What the transport handed back |
//! | [`ResponseEnvelope`] | returned | Typed success/error result of a call |
//! | [`ApiError`] | returned | Machine-readable code plus human message |

mod request;
mod response;

pub use request::{ApiRequest, RequestBody, RequestSpec};
pub use response::{ApiError, ErrorDetail, RawResponse, ResponseEnvelope, ResponseKind};
