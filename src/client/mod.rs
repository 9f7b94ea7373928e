//! iTwins HTTP client.
//!
//! # Module Organization
//!
//! ```text
//! client/
//! ├── api        - ApiClient: verb helpers for resource clients
//! ├── config     - Client configuration
//! ├── fetch      - RequestSender: the request dispatcher
//! ├── normalize  - Raw response to envelope
//! ├── redirect   - Bounded, validated redirect following
//! ├── transport  - Transport trait and the reqwest implementation
//! └── utils      - URL helpers
//! ```
//!
//! # Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`RequestSender`] | Sends one authenticated call, chases safe redirects |
//! | [`ApiClient`] | Path/verb layer embedding a `RequestSender` |
//! | [`Transport`] | One HTTP exchange; swap for tests or other runtimes |
//! | [`ClientConfig`] | Base URL, redirect bound, allow-list, timeouts |
//!
//! # Examples
//!
//! ```
//! use itwins_client::client::{ClientConfig, RequestSender};
//!
//! let config = ClientConfig {
//!     max_redirects: 3,
//!     ..Default::default()
//! };
//! let sender = RequestSender::with_config(config).unwrap();
//! assert_eq!(sender.config().max_redirects, 3);
//! ```

mod api;
mod config;
mod fetch;
mod normalize;
mod redirect;
mod transport;
mod utils;

pub use api::ApiClient;
pub use config::{
    ClientConfig, DEFAULT_BASE_URL, DEFAULT_MAX_REDIRECTS, MAX_REDIRECTS_ENV, URL_PREFIX_ENV,
};
pub use fetch::RequestSender;
pub use normalize::normalize;
pub use transport::{RedirectMode, ReqwestTransport, Transport};
pub use utils::{join_url, log_target};
