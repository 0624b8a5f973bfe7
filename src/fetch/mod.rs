//! HTTP page retrieval.
//!
//! Fetches the raw HTML of a match page. One GET per call: no cache and
//! no retry.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

/// Errors that can occur during fetching.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Content too large: {size} bytes (max {max_size})")]
    ContentTooLarge { size: usize, max_size: usize },
}

/// Parse a user-supplied page URL. Only `http` and `https` are accepted.
pub fn parse_page_url(raw: &str) -> Result<Url, FetchError> {
    let url = Url::parse(raw.trim()).map_err(|e| FetchError::InvalidUrl(format!("{raw}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FetchError::InvalidUrl(format!(
            "{raw}: unsupported scheme '{other}'"
        ))),
    }
}

/// Anything that can hand back the HTML text of a page.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Retrieve the document body at `url` as text.
    async fn fetch_text(&self, url: &Url) -> Result<String, FetchError>;
}

/// Configuration for the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Request timeout
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,

    /// Maximum body size to accept (default 50MB)
    pub max_content_size: usize,

    /// Treat non-2xx responses as errors instead of parsing their body
    pub require_success: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36".to_string(),
            max_content_size: 50 * 1024 * 1024, // 50MB
            require_success: true,
        }
    }
}

/// reqwest-backed page fetcher.
pub struct Fetcher {
    client: Client,
    config: FetcherConfig,
}

impl Fetcher {
    /// Create a new fetcher with the given configuration.
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("match-stats/0.1.0")),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a fetcher with default configuration.
    pub fn with_defaults() -> Result<Self, FetchError> {
        Self::new(FetcherConfig::default())
    }
}

#[async_trait]
impl DocumentSource for Fetcher {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch_text(&self, url: &Url) -> Result<String, FetchError> {
        info!("Fetching {}", url);

        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        if !status.is_success() {
            if self.config.require_success {
                return Err(FetchError::HttpStatus {
                    status: status.as_u16(),
                    message: status.canonical_reason().unwrap_or("Unknown").to_string(),
                });
            }
            warn!("{} returned HTTP {}, parsing body anyway", url, status);
        }

        if let Some(len) = response.content_length() {
            if len as usize > self.config.max_content_size {
                return Err(FetchError::ContentTooLarge {
                    size: len as usize,
                    max_size: self.config.max_content_size,
                });
            }
        }

        let body = response.text().await?;
        if body.len() > self.config.max_content_size {
            return Err(FetchError::ContentTooLarge {
                size: body.len(),
                max_size: self.config.max_content_size,
            });
        }

        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

/// Serves a fixed body for every URL.
#[cfg(test)]
pub struct StaticSource {
    body: String,
}

#[cfg(test)]
impl StaticSource {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

#[cfg(test)]
#[async_trait]
impl DocumentSource for StaticSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn fetch_text(&self, _url: &Url) -> Result<String, FetchError> {
        Ok(self.body.clone())
    }
}

/// Fails every fetch with a 503.
#[cfg(test)]
pub struct UnavailableSource;

#[cfg(test)]
#[async_trait]
impl DocumentSource for UnavailableSource {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    async fn fetch_text(&self, _url: &Url) -> Result<String, FetchError> {
        Err(FetchError::HttpStatus {
            status: 503,
            message: "Service Unavailable".to_string(),
        })
    }
}
