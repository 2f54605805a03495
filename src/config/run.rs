//! Immutable per-run crawl configuration

use crate::config::selectors::SelectorList;
use crate::config::types::Config;
use crate::config::validation::{validate, validate_base_url};
use crate::ConfigError;
use std::time::Duration;
use url::Url;

/// Everything one crawl run needs, parsed and compiled up front
///
/// Shared read-only by every page task of the run.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Crawl root and literal prefix scope for discovered links
    pub base_url: Url,

    /// Selectors identifying the content region(s) of a page
    pub target: SelectorList,

    /// Selectors pruned from every target match
    pub exclude: SelectorList,

    /// Whether the base URL itself is processed as a page
    pub include_base_url: bool,

    /// Politeness delay applied before every page fetch
    pub delay: DelayRange,

    /// Upper bound on pages in flight; `None` runs every page at once
    pub max_concurrent_pages: Option<usize>,

    /// Retry behavior for network failures
    pub retry: RetryPolicy,
}

impl CrawlConfig {
    /// Builds a run configuration from the raw invocation strings
    ///
    /// Uses the default politeness window, unbounded concurrency and no
    /// retries.
    ///
    /// # Example
    ///
    /// ```
    /// use sumi_scribe::CrawlConfig;
    ///
    /// let config = CrawlConfig::new(
    ///     "https://example.com/docs/",
    ///     "article",
    ///     ".sidebar, nav",
    ///     true,
    /// )
    /// .unwrap();
    /// assert_eq!(config.exclude.len(), 2);
    /// ```
    pub fn new(
        base_url: &str,
        target: &str,
        exclude: &str,
        include_base_url: bool,
    ) -> Result<Self, ConfigError> {
        let base_url = validate_base_url(base_url)?;
        let target = SelectorList::parse(target)?;
        if target.is_empty() {
            return Err(ConfigError::Validation(
                "target selector cannot be empty".to_string(),
            ));
        }
        let exclude = SelectorList::parse(exclude)?;

        Ok(Self {
            base_url,
            target,
            exclude,
            include_base_url,
            delay: DelayRange::default(),
            max_concurrent_pages: None,
            retry: RetryPolicy::default(),
        })
    }

    /// Builds a run configuration from a loaded configuration file
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        validate(config)?;

        let crawler = &config.crawler;
        Ok(Self::new(
            &config.site.base_url,
            &config.extract.target,
            &config.extract.exclude,
            config.site.include_base_url,
        )?
        .with_delay(DelayRange::from_millis(crawler.min_delay, crawler.max_delay))
        .with_max_concurrent_pages(crawler.max_concurrent_pages.map(|n| n as usize))
        .with_retry(RetryPolicy {
            max_retries: crawler.max_retries,
            backoff: Duration::from_millis(crawler.retry_backoff),
        }))
    }

    pub fn with_delay(mut self, delay: DelayRange) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_max_concurrent_pages(mut self, limit: Option<usize>) -> Self {
        self.max_concurrent_pages = limit;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Uniform random delay window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    pub min: Duration,
    pub max: Duration,
}

impl DelayRange {
    pub fn from_millis(min: u64, max: u64) -> Self {
        Self {
            min: Duration::from_millis(min),
            max: Duration::from_millis(max),
        }
    }

    /// No delay at all
    pub fn none() -> Self {
        Self::from_millis(0, 0)
    }

    /// Draws a duration uniformly from `[min, max]`
    pub fn sample(&self) -> Duration {
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        if max <= min {
            return self.min;
        }
        Duration::from_millis(rand::random_range(min..=max))
    }
}

impl Default for DelayRange {
    fn default() -> Self {
        Self::from_millis(1000, 3000)
    }
}

/// Bounded retry with exponential backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first failure
    pub max_retries: u32,

    /// Wait before the first retry, doubled for each one after it
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Wait before retry number `attempt` (zero-based)
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(1u32 << attempt.min(16))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            backoff: Duration::from_millis(500),
        }
    }
}
