//! Fetch one iTwin (or any path under the base URL) and print the envelope.
//!
//! Run with:
//!
//! ```text
//! ITWINS_TOKEN="Bearer ..." cargo run --example send_request -- favorites
//! ```
//!
//! `ITWINS_URL_PREFIX=dev-` targets the dev environment; `ITWINS_MAX_REDIRECTS`
//! overrides the redirect bound; `RUST_LOG=itwins_client=debug` shows each hop.

use anyhow::{bail, Context};
use itwins_client::{ApiClient, ClientConfig};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let token = std::env::var("ITWINS_TOKEN").context("ITWINS_TOKEN must be set")?;
    let path = std::env::args().nth(1).unwrap_or_default();

    let config = ClientConfig {
        enable_logging: true,
        ..ClientConfig::from_env()?
    };
    println!("Base URL: {}", config.base_url);
    println!("Max redirects: {}\n", config.max_redirects);

    let client = ApiClient::with_config(config)?;
    let response = client.get::<Value>(&token, &path).await?;

    println!("Status: {}", response.status());
    if let Some(error) = response.error() {
        bail!("{}: {}", error.code, error.message);
    }
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
