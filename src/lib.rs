#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # iTwins Client: a safe request core for a REST API
//!
//! Resource methods of an API client are thin: build a path, pick a verb,
//! decode the body. This crate provides the part underneath them that has to
//! be right: sending an authenticated request, deciding whether a redirect may
//! be followed without leaking the bearer credential, bounding redirect
//! chains, and turning every outcome into one typed [`ResponseEnvelope`].
//!
//! ## Key Features
//!
//! - **Manual redirects**: the transport never follows a redirect on its own;
//!   the dispatcher decides.
//! - **Allow-listed targets**: redirects must be `https` and land on an
//!   allow-listed host or its `-`-prefixed environment variant.
//! - **Bounded chains**: at most `max_redirects` hops, then `508 TooManyRedirects`.
//! - **Opaque redirects**: transports that hide the redirect target are
//!   handled by one follow-mode retry whose final URL is validated.
//! - **Uniform errors**: backend `{"error": {...}}` bodies pass through;
//!   everything unclassifiable becomes `500 InternalServerError`.
//! - **Cancellation**: every hop can be aborted through a `CancellationToken`.
//!
//! | Code | Status | Trigger |
//! |------|--------|---------|
//! | `RedirectsNotAllowed` | 403 | redirect encountered, caller opted out |
//! | `InvalidRedirect` | 502 | 302 without `Location` |
//! | `InvalidRedirectUrl` | 502 | `Location` fails validation |
//! | `TooManyRedirects` | 508 | hop bound reached |
//! | `InternalServerError` | 500 | any other failure |
//!
//! ## Usage
//!
//! ```ignore
//! use itwins_client::{ApiRequest, RequestSender};
//! use serde_json::Value;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sender = RequestSender::new()?;
//!     let request = ApiRequest::get("https://api.bentley.com/itwins/favorites")
//!         .allow_redirects(true);
//!     let response = sender.send::<Value>("Bearer <token>", request).await?;
//!
//!     match response.error() {
//!         Some(error) => eprintln!("{} {}: {}", response.status(), error.code, error.message),
//!         None => println!("{:?}", response.data()),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - **[types]** - Requests, raw responses, envelopes and API errors
//! - **[error]** - Error types and result handling
//! - **[client]** - Dispatcher, redirect resolver, normalizer, transport
//! - **[redirect]** - Redirect URL validation and per-hop state
//! - **[protocol]** - Header names, status codes, error codes

pub mod client;
pub mod error;
pub mod protocol;
pub mod redirect;
pub mod types;

pub use client::{
    ApiClient, ClientConfig, RedirectMode, ReqwestTransport, RequestSender, Transport,
};
pub use error::{ClientError, Result};
pub use redirect::{RedirectPolicy, UrlRejection};
pub use types::{
    ApiError, ApiRequest, ErrorDetail, RawResponse, RequestBody, RequestSpec, ResponseEnvelope,
    ResponseKind,
};
