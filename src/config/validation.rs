use crate::config::selectors::SelectorList;
use crate::config::types::{Config, CrawlerConfig, ExtractConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_base_url(&config.site.base_url)?;
    validate_extract_config(&config.extract)?;
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates and parses the crawl base URL
pub fn validate_base_url(base_url: &str) -> Result<Url, ConfigError> {
    let base_url = base_url.trim();
    if base_url.is_empty() {
        return Err(ConfigError::Validation(
            "base_url cannot be empty".to_string(),
        ));
    }

    let url = Url::parse(base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url '{}': {}", base_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base_url '{}' must use HTTP or HTTPS scheme",
            base_url
        )));
    }

    Ok(url)
}

/// Validates extraction selectors
fn validate_extract_config(config: &ExtractConfig) -> Result<(), ConfigError> {
    if SelectorList::parse(&config.target)?.is_empty() {
        return Err(ConfigError::Validation(
            "target selector cannot be empty".to_string(),
        ));
    }

    SelectorList::parse(&config.exclude)?;

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.min_delay > config.max_delay {
        return Err(ConfigError::Validation(format!(
            "min_delay ({}ms) cannot exceed max_delay ({}ms)",
            config.min_delay, config.max_delay
        )));
    }

    if let Some(limit) = config.max_concurrent_pages {
        if !(1..=1000).contains(&limit) {
            return Err(ConfigError::Validation(format!(
                "max_concurrent_pages must be between 1 and 1000, got {}",
                limit
            )));
        }
    }

    if config.request_timeout == Some(0) {
        return Err(ConfigError::Validation(
            "request_timeout must be at least 1 second".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let (local, domain) = email.split_once('@').ok_or_else(|| {
        ConfigError::Validation(format!("Invalid email format: '{}'", email))
    })?;

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
