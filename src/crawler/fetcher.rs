//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the one HTTP client shared by every task of a run
//! - GET requests returning decoded page text
//! - Error classification and optional retry with exponential backoff

use crate::config::{RetryPolicy, UserAgentConfig};
use crate::{Result, ScribeError};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Optional per-request deadline; `None` waits indefinitely
///
/// # Example
///
/// ```no_run
/// use sumi_scribe::config::UserAgentConfig;
/// use sumi_scribe::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), None).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig, timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder()
        .user_agent(config.header_value())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true);

    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    builder.build().map_err(ScribeError::Client)
}

/// Issues GET requests over a shared connection pool
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    retry: RetryPolicy,
}

impl Fetcher {
    pub fn new(client: Client, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    /// A fetcher with the default client and no retries
    pub fn with_defaults() -> Result<Self> {
        let client = build_http_client(&UserAgentConfig::default(), None)?;
        Ok(Self::new(client, RetryPolicy::default()))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Fetches a page and returns its decoded body
    ///
    /// Transport failures and non-2xx statuses are network errors. Server
    /// errors, 429 and transport failures are retried according to the
    /// retry policy; any other status fails immediately.
    pub async fn fetch(&self, url: &Url) -> Result<String> {
        let mut attempt = 0;
        loop {
            match fetch_page(&self.client, url).await {
                Err(e) if is_retryable(&e) && attempt < self.retry.max_retries => {
                    let wait = self.retry.backoff_for(attempt);
                    attempt += 1;
                    tracing::debug!(
                        "Retrying {} in {:?} (attempt {}/{}): {}",
                        url,
                        wait,
                        attempt,
                        self.retry.max_retries,
                        e
                    );
                    tokio::time::sleep(wait).await;
                }
                result => return result,
            }
        }
    }
}

/// Performs a single GET with no retry
pub async fn fetch_page(client: &Client, url: &Url) -> Result<String> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|source| ScribeError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScribeError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| ScribeError::Http {
        url: url.to_string(),
        source,
    })
}

fn is_retryable(error: &ScribeError) -> bool {
    match error {
        ScribeError::Http { .. } => true,
        ScribeError::HttpStatus { status, .. } => {
            *status == StatusCode::TOO_MANY_REQUESTS.as_u16() || *status >= 500
        }
        _ => false,
    }
}
