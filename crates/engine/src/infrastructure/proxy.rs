//! Image proxy.
//!
//! The visualization page cannot load remote-store images directly (CORS and
//! redirect hops), so the engine fetches them and streams the bytes through.

use std::time::Duration;

use reqwest::Client;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("Fetch failed: {0}")]
    Fetch(String),
    #[error("Upstream answered {0}")]
    UpstreamStatus(u16),
}

/// Pass-through fetcher with the system's only timeout.
#[derive(Clone)]
pub struct ImageProxy {
    client: Client,
}

impl ImageProxy {
    pub fn new() -> Self {
        // Redirects must be followed: direct-view links answer with a 302 to
        // the actual content.
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }

    /// Fetch `url`, returning the upstream content type and the response to
    /// stream from. Non-200 upstream answers are reported, not forwarded.
    pub async fn fetch(&self, url: &str) -> Result<(String, reqwest::Response), ProxyError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProxyError::Fetch(e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(ProxyError::UpstreamStatus(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        Ok((content_type, response))
    }
}

impl Default for ImageProxy {
    fn default() -> Self {
        Self::new()
    }
}
