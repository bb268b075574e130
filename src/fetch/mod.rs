//! Feed retrieval over HTTP or from a local file.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use tracing::debug;

/// Issues a GET for `url` through `client` and returns the body bytes.
///
/// Non-success status codes are errors.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

/// True for `http://` and `https://` sources; anything else is a file path.
pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Loads feed bytes from a local file path or fetches them over HTTP.
#[tracing::instrument(skip(client))]
pub async fn load_source<C: HttpClient>(client: &C, source: &str) -> Result<Vec<u8>> {
    let bytes = if is_url(source) {
        fetch_bytes(client, source).await?
    } else {
        std::fs::read(source).with_context(|| format!("failed to read {source}"))?
    };
    debug!(bytes = bytes.len(), "Feed bytes received");
    Ok(bytes)
}
