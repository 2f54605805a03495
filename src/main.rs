//! Sumi-Scribe main entry point
//!
//! This is the command-line interface for the Sumi-Scribe documentation
//! transcriber.

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use sumi_scribe::config::load_config_with_hash;
use sumi_scribe::crawler::{Coordinator, ProgressSink};
use sumi_scribe::output::{clear_workspace, list_markdown_files};
use sumi_scribe::url::page_filename;
use tracing_subscriber::EnvFilter;

/// Sumi-Scribe: a documentation site transcriber
///
/// Sumi-Scribe fetches every page linked from a documentation base URL,
/// extracts the content region selected by CSS selectors and saves it as
/// one Markdown file per page.
#[derive(Parser, Debug)]
#[command(name = "sumi-scribe")]
#[command(version)]
#[command(about = "A documentation site transcriber", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Override the output directory from the configuration
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Clear the output directory before crawling
    #[arg(long, conflicts_with_all = ["clear", "dry_run"])]
    fresh: bool,

    /// Delete the output directory and its contents, then exit
    #[arg(long, conflicts_with_all = ["fresh", "dry_run"])]
    clear: bool,

    /// Discover links and show the files that would be written, without crawling
    #[arg(long, conflicts_with_all = ["fresh", "clear"])]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let output_dir = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.directory));

    if cli.clear {
        return handle_clear(&output_dir, cli.quiet);
    }

    let coordinator = Coordinator::from_config(&config)?;

    if cli.dry_run {
        handle_dry_run(&coordinator).await
    } else {
        if cli.fresh {
            clear_workspace(&output_dir)?;
            tracing::info!("Cleared output directory {}", output_dir.display());
        }
        handle_crawl(&coordinator, &output_dir, cli.quiet).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_scribe=info,warn"),
            1 => EnvFilter::new("sumi_scribe=debug,info"),
            2 => EnvFilter::new("sumi_scribe=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles --clear
fn handle_clear(output_dir: &Path, quiet: bool) -> anyhow::Result<()> {
    clear_workspace(output_dir)?;
    if let Some(notice) = clear_notice(output_dir, quiet) {
        println!("{}", notice);
    }
    Ok(())
}

fn clear_notice(output_dir: &Path, quiet: bool) -> Option<String> {
    (!quiet).then(|| format!("✓ Folder and contents deleted: {}", output_dir.display()))
}

/// Handles the --dry-run mode: lists discovered pages and their target files
async fn handle_dry_run(coordinator: &Coordinator) -> anyhow::Result<()> {
    let config = coordinator.config();

    println!("=== Sumi-Scribe Dry Run ===\n");
    println!("Base URL: {}", config.base_url);
    println!("Target selectors: {}", config.target);
    println!("Exclude selectors: {}", config.exclude);
    println!("Include base URL: {}", config.include_base_url);
    match config.max_concurrent_pages {
        Some(limit) => println!("Max concurrent pages: {}", limit),
        None => println!("Max concurrent pages: unbounded"),
    }
    println!();

    let urls = coordinator.discover().await;
    if urls.is_empty() {
        println!("No links found to crawl.");
        return Ok(());
    }

    println!("Pages ({}):", urls.len());
    for url in &urls {
        println!("  {} -> {}", url, page_filename(url, &config.base_url));
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    coordinator: &Coordinator,
    output_dir: &Path,
    quiet: bool,
) -> anyhow::Result<()> {
    let sink = BarSink::new(quiet)?;
    let summary = coordinator.run(output_dir, &sink).await?;
    sink.finish();

    if summary.is_empty() {
        println!("No links found to crawl.");
    } else if summary.all_failed() {
        println!(
            "Crawl completed but no pages were saved. ({}/{})",
            summary.successful, summary.total
        );
    } else {
        println!(
            "✓ Crawl completed! ({}/{} pages saved)",
            summary.successful, summary.total
        );
    }

    if summary.collisions > 0 {
        println!(
            "  {} pages were overwritten by pages sharing their file name",
            summary.collisions
        );
    }

    let files = list_markdown_files(output_dir)?;
    println!("  {} Markdown files in {}", files.len(), output_dir.display());

    Ok(())
}

/// Progress bar driven by run progress updates
struct BarSink {
    bar: ProgressBar,
}

impl BarSink {
    const SCALE: u64 = 1000;

    fn new(hidden: bool) -> anyhow::Result<Self> {
        let bar = if hidden {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(Self::SCALE)
        };
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {percent:>3}% {wide_msg}")?
                .progress_chars("#>-"),
        );
        bar.set_message("Starting...");
        Ok(Self { bar })
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressSink for BarSink {
    fn report(&self, fraction: f64, label: &str) {
        self.bar.set_position((fraction * Self::SCALE as f64).round() as u64);
        self.bar.set_message(label.to_string());
    }
}
