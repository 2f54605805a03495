//! Crawler module for fetching and transcribing pages
//!
//! This module contains the crawl-extract-convert pipeline:
//! - HTTP fetching over one shared client
//! - Link discovery on the seed page
//! - Content extraction by CSS selector
//! - Per-page task execution and progress reporting
//! - Overall crawl coordination

mod coordinator;
mod discovery;
mod extractor;
mod fetcher;
mod page;
mod progress;

pub use coordinator::{Coordinator, RunSummary};
pub use discovery::{discover_links, extract_scoped_links, LinkSet};
pub use extractor::{extract, Extraction};
pub use fetcher::{build_http_client, fetch_page, Fetcher};
pub use page::{no_match_message, run_page, PageContext, PageOutcome};
pub use progress::{NoProgress, ProgressSink, ProgressTracker};

use crate::config::CrawlConfig;
use crate::Result;
use std::path::Path;

/// Runs a complete crawl from raw invocation parameters
///
/// `target` and `exclude` are comma-separated CSS selector lists; `exclude`
/// may be empty. Uses the default politeness delay, unbounded concurrency,
/// no retries and the default user agent.
///
/// # Returns
///
/// * `Ok(RunSummary)` - `(successful, total)` tally of the run
/// * `Err(ScribeError)` - Invalid parameters, or the output directory could
///   not be created
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sumi_scribe::crawler::{crawl, NoProgress};
///
/// # async fn example() -> sumi_scribe::Result<()> {
/// let summary = crawl(
///     "https://fastapi.tiangolo.com/reference/",
///     Path::new("files"),
///     "article",
///     ".mkdocstrings-source",
///     &NoProgress,
///     true,
/// )
/// .await?;
/// println!("{}/{} pages saved", summary.successful, summary.total);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(
    base_url: &str,
    output_dir: &Path,
    target: &str,
    exclude: &str,
    sink: &dyn ProgressSink,
    include_base_url: bool,
) -> Result<RunSummary> {
    let config = CrawlConfig::new(base_url, target, exclude, include_base_url)?;
    let fetcher = Fetcher::new(
        build_http_client(&Default::default(), None)?,
        config.retry,
    );
    Coordinator::new(config, fetcher).run(output_dir, sink).await
}
