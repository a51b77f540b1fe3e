// HTTP client for homepage and article fetches.
//
// A thin reqwest wrapper with one HTML GET helper. All fetches across
// every source share this client so connection pooling and the
// User-Agent header are consistent.

use anyhow::{Context, Result};
use tracing::debug;

/// Shared HTTP client for all sources.
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Build a client with the configured User-Agent.
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }

    /// GET a page and return its body as text.
    ///
    /// Non-2xx responses are errors — callers decide whether a failed
    /// article fetch aborts anything (it never does; the pipeline skips).
    pub async fn fetch_html(&self, url: &str) -> Result<String> {
        debug!(url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Request failed: {url}"))?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("{url} returned {status}");
        }

        response
            .text()
            .await
            .with_context(|| format!("Failed to read response body: {url}"))
    }
}
