//! Page task runner
//!
//! One task takes one URL end to end: politeness delay, fetch, extract,
//! convert, write. Whatever happens, the task reports exactly once to the
//! progress tracker and yields a single success flag.

use crate::config::{CrawlConfig, SelectorList};
use crate::crawler::extractor::{extract, Extraction};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::progress::ProgressTracker;
use crate::output::{render_fragments, write_page};
use crate::url::page_filename;
use crate::ScribeError;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use url::Url;

/// Resources shared by every page task of a run
pub struct PageContext<'a> {
    pub config: &'a CrawlConfig,
    pub fetcher: &'a Fetcher,
    pub output_dir: &'a Path,
    pub progress: &'a ProgressTracker<'a>,
}

/// How a page task ended
#[derive(Debug)]
pub enum PageOutcome {
    /// Extracted content was written
    Saved { path: PathBuf, fragments: usize },

    /// Nothing matched; a diagnostic body was written instead
    NoMatch { path: PathBuf },

    /// Fetching or writing failed
    Failed(ScribeError),

    /// Processing panicked
    Panicked(String),
}

impl PageOutcome {
    /// True when a file was written for the page
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Saved { .. } | Self::NoMatch { .. })
    }
}

/// The file body written when no target selector matches
pub fn no_match_message(target: &SelectorList, url: &Url) -> String {
    format!(
        "Error: No elements found for selector '{}' on {}.",
        target, url
    )
}

/// Runs one page task and returns whether it succeeded
///
/// Never fails and never panics: every error, including a panic during
/// processing, becomes a `false` result for this page only.
pub async fn run_page(url: &Url, ctx: &PageContext<'_>) -> bool {
    tokio::time::sleep(ctx.config.delay.sample()).await;

    let outcome = match AssertUnwindSafe(process_page(url, ctx)).catch_unwind().await {
        Ok(outcome) => outcome,
        Err(payload) => PageOutcome::Panicked(panic_message(payload.as_ref())),
    };

    match &outcome {
        PageOutcome::Saved { path, fragments } => {
            tracing::debug!("Saved {} ({} fragments) to {}", url, fragments, path.display());
        }
        PageOutcome::NoMatch { path } => {
            tracing::warn!(
                "No elements found for selector '{}' on {} (wrote {})",
                ctx.config.target,
                url,
                path.display()
            );
        }
        PageOutcome::Failed(e) => {
            tracing::warn!("Error processing {}: {}", url, e);
        }
        PageOutcome::Panicked(message) => {
            tracing::error!("Unexpected failure processing {}: {}", url, message);
        }
    }

    let success = outcome.is_success();
    ctx.progress.record(url, success);
    success
}

/// Fetch, extract, convert and write one page
async fn process_page(url: &Url, ctx: &PageContext<'_>) -> PageOutcome {
    let html = match ctx.fetcher.fetch(url).await {
        Ok(html) => html,
        Err(e) => return PageOutcome::Failed(e),
    };

    let (body, fragments) = match extract(&html, &ctx.config.target, &ctx.config.exclude) {
        Extraction::Matched(fragments) => (render_fragments(&fragments), Some(fragments.len())),
        Extraction::NoMatch => (no_match_message(&ctx.config.target, url), None),
    };

    let filename = page_filename(url, &ctx.config.base_url);
    match (write_page(ctx.output_dir, &filename, &body), fragments) {
        (Ok(path), Some(fragments)) => PageOutcome::Saved { path, fragments },
        (Ok(path), None) => PageOutcome::NoMatch { path },
        (Err(e), _) => PageOutcome::Failed(e),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
