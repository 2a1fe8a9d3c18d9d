use crate::config::types::{CacheConfig, Config, SourceConfig, MAX_TTL_SECS};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_cache_config(&config.cache)?;
    Ok(())
}

/// Validates source and pacing configuration
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "max-retries must be <= 10, got {}",
            config.max_retries
        )));
    }

    if config.backoff_base_ms < 1 {
        return Err(ConfigError::Validation(
            "backoff-base-ms must be >= 1".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates cache configuration
fn validate_cache_config(config: &CacheConfig) -> Result<(), ConfigError> {
    if config.profile_path.is_empty() {
        return Err(ConfigError::Validation(
            "profile-path cannot be empty".to_string(),
        ));
    }

    if config.article_path.is_empty() {
        return Err(ConfigError::Validation(
            "article-path cannot be empty".to_string(),
        ));
    }

    if config.profile_ttl_secs < 1 || config.article_ttl_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "cache TTLs must be >= 1s, got profile={} article={}",
            config.profile_ttl_secs, config.article_ttl_secs
        )));
    }

    if config.profile_ttl_secs > MAX_TTL_SECS || config.article_ttl_secs > MAX_TTL_SECS {
        return Err(ConfigError::Validation(format!(
            "cache TTLs must be <= {}s, got profile={} article={}",
            MAX_TTL_SECS, config.profile_ttl_secs, config.article_ttl_secs
        )));
    }

    Ok(())
}
