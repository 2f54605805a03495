//! Crawler coordinator - crawl orchestration
//!
//! This module ties one run together:
//! - Ensuring the output directory exists
//! - Discovering links on the seed page
//! - Fanning out one page task per URL over a shared connection pool
//! - Waiting for every task and tallying the results

use crate::config::{Config, CrawlConfig};
use crate::crawler::discovery::{discover_links, LinkSet};
use crate::crawler::fetcher::{build_http_client, Fetcher};
use crate::crawler::page::{run_page, PageContext};
use crate::crawler::progress::{ProgressSink, ProgressTracker};
use crate::output::ensure_workspace;
use crate::url::page_filename;
use crate::Result;
use futures::{stream, StreamExt};
use std::collections::HashMap;
use std::path::Path;
use std::time::{Duration, Instant};
use url::Url;

/// Tally of one crawl run
///
/// `total == 0` means no links were discovered, which is distinct from
/// every discovered page failing (`successful == 0 && total > 0`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Pages for which a file was written
    pub successful: usize,

    /// Pages attempted
    pub total: usize,

    /// Pages whose output file name was shared with another page
    pub collisions: usize,
}

impl RunSummary {
    /// True when no links were discovered
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// True when pages were discovered but none was saved
    pub fn all_failed(&self) -> bool {
        self.total > 0 && self.successful == 0
    }

    pub fn failed(&self) -> usize {
        self.total - self.successful
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: CrawlConfig,
    fetcher: Fetcher,
}

impl Coordinator {
    /// Creates a coordinator from a run configuration and a fetcher
    pub fn new(config: CrawlConfig, fetcher: Fetcher) -> Self {
        Self { config, fetcher }
    }

    /// Creates a coordinator from a loaded configuration file
    ///
    /// Builds the HTTP client (user agent, timeout) and the retry policy
    /// from the file's `[user-agent]` and `[crawler]` sections.
    pub fn from_config(config: &Config) -> Result<Self> {
        let crawl_config = CrawlConfig::from_config(config)?;
        let timeout = config.crawler.request_timeout.map(Duration::from_secs);
        let client = build_http_client(&config.user_agent, timeout)?;
        let fetcher = Fetcher::new(client, crawl_config.retry);
        Ok(Self::new(crawl_config, fetcher))
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Builds the set of pages a run would process
    ///
    /// Links on the base URL page, plus the base URL itself when
    /// configured.
    pub async fn discover(&self) -> LinkSet {
        let base_url = &self.config.base_url;
        let mut urls = discover_links(&self.fetcher, base_url, base_url).await;

        if self.config.include_base_url {
            urls.insert(base_url.clone());
        }

        urls
    }

    /// Runs the crawl, writing one file per page into `output_dir`
    ///
    /// # Returns
    ///
    /// * `Ok(RunSummary)` - Every launched page task finished
    /// * `Err(ScribeError)` - The output directory could not be created
    pub async fn run(&self, output_dir: &Path, sink: &dyn ProgressSink) -> Result<RunSummary> {
        let start_time = Instant::now();
        ensure_workspace(output_dir)?;

        let urls = self.discover().await;
        let total = urls.len();
        if total == 0 {
            tracing::info!("No links found under {}", self.config.base_url);
            return Ok(RunSummary::default());
        }

        let collisions = count_collisions(&urls, &self.config.base_url);
        let limit = self.config.max_concurrent_pages.unwrap_or(total).max(1);
        tracing::info!(
            "Processing {} pages (up to {} at a time) into {}",
            total,
            limit,
            output_dir.display()
        );

        let tracker = ProgressTracker::new(total, sink);
        let ctx = PageContext {
            config: &self.config,
            fetcher: &self.fetcher,
            output_dir,
            progress: &tracker,
        };

        let ctx = &ctx;
        let results: Vec<bool> = stream::iter(&urls)
            .map(move |url| run_page(url, ctx))
            .buffer_unordered(limit)
            .collect()
            .await;

        let summary = RunSummary {
            successful: results.iter().filter(|success| **success).count(),
            total,
            collisions,
        };

        tracing::info!(
            "Crawl completed: {}/{} pages saved in {:?}",
            summary.successful,
            summary.total,
            start_time.elapsed()
        );

        Ok(summary)
    }
}

/// Counts pages that share an output file name with an earlier page
///
/// Such pages overwrite each other; the last one written wins.
fn count_collisions(urls: &LinkSet, base_url: &Url) -> usize {
    let mut by_filename: HashMap<String, Vec<&Url>> = HashMap::new();
    for url in urls {
        by_filename
            .entry(page_filename(url, base_url))
            .or_default()
            .push(url);
    }

    let mut collisions = 0;
    for (filename, urls) in &by_filename {
        if urls.len() > 1 {
            tracing::warn!(
                "{} pages share the output file {}: {:?}",
                urls.len(),
                filename,
                urls.iter().map(|u| u.as_str()).collect::<Vec<_>>()
            );
            collisions += urls.len() - 1;
        }
    }

    collisions
}
