//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with timeouts, user agent and session cookie
//! - GET requests for leaderboard pages
//! - Optional bounded retry for transient failures
//! - Error classification

use crate::config::CrawlerConfig;
use crate::{ConfigError, FetchError, LeaderboardError};
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Source of leaderboard page bodies
///
/// The crawler only needs "GET this URL as the authenticated user"; tests swap in
/// scripted fetchers.
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    async fn fetch_page(&self, url: &Url) -> Result<String, FetchError>;
}

/// Retry behavior for transient fetch failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first (0 disables retries)
    pub max_retries: u32,

    /// Base delay, multiplied by the attempt number
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub const NONE: RetryPolicy = RetryPolicy {
        max_retries: 0,
        base_delay: Duration::ZERO,
    };

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::NONE
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawler transport configuration
/// * `cookie` - Session cookie header value attached to every request, if any
///
/// # Example
///
/// ```no_run
/// use segment_leaderboard::config::CrawlerConfig;
/// use segment_leaderboard::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default(), Some("session=abc")).unwrap();
/// ```
pub fn build_http_client(
    config: &CrawlerConfig,
    cookie: Option<&str>,
) -> Result<Client, LeaderboardError> {
    let mut headers = HeaderMap::new();
    if let Some(cookie) = cookie {
        let mut value = HeaderValue::from_str(cookie).map_err(|_| {
            ConfigError::Credential("session cookie is not a valid header value".to_string())
        })?;
        value.set_sensitive(true);
        headers.insert(COOKIE, value);
    }

    let client = Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()?;
    Ok(client)
}

/// Fetches pages over HTTP with the configured retry policy
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    retry: RetryPolicy,
}

impl HttpFetcher {
    pub fn new(client: Client, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    /// Builds a fetcher straight from config and an optional session cookie
    pub fn from_config(
        config: &CrawlerConfig,
        cookie: Option<&str>,
    ) -> Result<Self, LeaderboardError> {
        Ok(Self::new(
            build_http_client(config, cookie)?,
            RetryPolicy::from_config(config),
        ))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl PageFetcher for HttpFetcher {
    /// Fetches a URL, retrying transient failures up to the policy's limit
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | 2xx | Return body |
    /// | 4xx | Fail immediately |
    /// | 5xx, timeout, connect error | Retry while attempts remain, then fail |
    async fn fetch_page(&self, url: &Url) -> Result<String, FetchError> {
        let mut attempt = 0;
        loop {
            match fetch_once(&self.client, url).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_transient() && attempt < self.retry.max_retries => {
                    attempt += 1;
                    let delay = self.retry.delay_for(attempt);
                    tracing::warn!(
                        "Fetch of {} failed ({}), retry {}/{} in {:?}",
                        url,
                        e,
                        attempt,
                        self.retry.max_retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

async fn fetch_once(client: &Client, url: &Url) -> Result<String, FetchError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|e| classify_error(url, e))
}

fn classify_error(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
