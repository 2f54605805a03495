use serde::Deserialize;

/// Main configuration structure for Sumi-Scribe
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    pub extract: ExtractConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// The documentation site to transcribe
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Crawl root, also used as the literal prefix for discovered links
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Whether the base URL itself is processed as a page
    #[serde(rename = "include-base-url", default = "default_true")]
    pub include_base_url: bool,
}

/// Content extraction selectors
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractConfig {
    /// Comma-separated CSS selectors for the content region
    pub target: String,

    /// Comma-separated CSS selectors pruned from each target match
    #[serde(default)]
    pub exclude: String,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Lower bound of the politeness delay before each fetch (milliseconds)
    #[serde(rename = "min-delay", default = "default_min_delay")]
    pub min_delay: u64,

    /// Upper bound of the politeness delay before each fetch (milliseconds)
    #[serde(rename = "max-delay", default = "default_max_delay")]
    pub max_delay: u64,

    /// Maximum number of pages in flight; unbounded when absent
    #[serde(rename = "max-concurrent-pages", default)]
    pub max_concurrent_pages: Option<u32>,

    /// Extra attempts after a network failure
    #[serde(rename = "max-retries", default)]
    pub max_retries: u32,

    /// Initial retry backoff, doubled on every attempt (milliseconds)
    #[serde(rename = "retry-backoff", default = "default_retry_backoff")]
    pub retry_backoff: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout", default)]
    pub request_timeout: Option<u64>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            min_delay: default_min_delay(),
            max_delay: default_max_delay(),
            max_concurrent_pages: None,
            max_retries: 0,
            retry_backoff: default_retry_backoff(),
            request_timeout: None,
        }
    }
}

/// User agent identification configuration
///
/// Every field falls back to its default, so a partial section is valid.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Renders the header value as `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SumiScribe".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/sumi-scribe".to_string(),
            contact_email: "crawler@example.com".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving one Markdown file per page
    #[serde(default = "default_output_directory")]
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_min_delay() -> u64 {
    1000
}

fn default_max_delay() -> u64 {
    3000
}

fn default_retry_backoff() -> u64 {
    500
}

fn default_output_directory() -> String {
    "files".to_string()
}
