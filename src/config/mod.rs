//! Configuration module for Sumi-Scribe
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and compiling them into the immutable [`CrawlConfig`] a run uses.
//!
//! # Example
//!
//! ```no_run
//! use sumi_scribe::config::{load_config, CrawlConfig};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scribe.toml")).unwrap();
//! let crawl = CrawlConfig::from_config(&config).unwrap();
//! println!("Crawling under {}", crawl.base_url);
//! ```

mod parser;
mod run;
mod selectors;
mod types;
mod validation;

pub use run::{CrawlConfig, DelayRange, RetryPolicy};
pub use selectors::SelectorList;
pub use types::{Config, CrawlerConfig, ExtractConfig, OutputConfig, SiteConfig, UserAgentConfig};

pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate_base_url;
