//! Sumi-Scribe: a documentation site transcriber
//!
//! This crate crawls a documentation site rooted at a base URL, extracts a
//! designated content region from every same-site page linked from the seed
//! page, converts it to Markdown and writes one file per page.

pub mod config;
pub mod crawler;
pub mod output;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Sumi-Scribe operations
#[derive(Debug, Error)]
pub enum ScribeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Deletion Error: {source}")]
    Deletion {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScribeError {
    /// Returns true for transport failures and non-success HTTP statuses
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::HttpStatus { .. })
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

/// Result type alias for Sumi-Scribe operations
pub type Result<T> = std::result::Result<T, ScribeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, CrawlConfig};
pub use crawler::{crawl, Coordinator, ProgressSink, RunSummary};
pub use output::{clear_workspace, to_markdown};
