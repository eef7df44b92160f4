use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::url::parse_root;
use crate::output::MAX_URLS_PER_SITEMAP;
use crate::ConfigError;
use url::Url;

/// Upper bound on `max_concurrent_fetches`
pub const MAX_CONCURRENT_FETCHES: u32 = 64;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
///
/// The builder runs this before issuing any fetch, so an invalid root or
/// limit is reported without touching the network.
pub fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    parse_root(&config.root_host).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid root_host '{}': {}", config.root_host, e))
    })?;

    // max_depth >= 0 is always true for u32, so no check needed

    if config.page_limit < 1 {
        return Err(ConfigError::Validation(format!(
            "page_limit must be >= 1, got {}",
            config.page_limit
        )));
    }

    // Every graph key costs one fetch, so this keeps the sitemap exportable
    if config.page_limit as usize > MAX_URLS_PER_SITEMAP {
        return Err(ConfigError::Validation(format!(
            "page_limit must be <= {} (sitemap URL limit), got {}",
            MAX_URLS_PER_SITEMAP, config.page_limit
        )));
    }

    if config.fetch_timeout_ms < 1 {
        return Err(ConfigError::Validation(format!(
            "fetch_timeout_ms must be >= 1ms, got {}ms",
            config.fetch_timeout_ms
        )));
    }

    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > MAX_CONCURRENT_FETCHES
    {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_fetches must be between 1 and {}, got {}",
            MAX_CONCURRENT_FETCHES, config.max_concurrent_fetches
        )));
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

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.sitemap_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "sitemap_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
