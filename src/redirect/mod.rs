//! Redirect safety: deciding where a credential-bearing request may go.
//!
//! A redirect target chosen by a server is untrusted input. Before the
//! request core re-sends a request (and therefore the caller's bearer
//! credential) to a new URL, the URL must pass [`RedirectPolicy::validate`]:
//!
//! 1. It parses as an absolute URL.
//! 2. Its scheme is exactly `https`.
//! 3. Its host equals an allow-listed domain, or ends with `-` followed by one
//!    (environment-prefixed hosts such as `dev-api.bentley.com`).
//!
//! [`RedirectState`] carries the per-hop bookkeeping for one logical call.

mod policy;
mod state;

pub use policy::{RedirectPolicy, UrlRejection, DEFAULT_ALLOWED_DOMAIN};
pub use state::RedirectState;
