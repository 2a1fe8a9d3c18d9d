use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// Missing sections and keys fall back to their defaults, so an empty file
/// yields the same configuration as [`Config::default`].
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use scholar_cache::config::load_config;
///
/// let config = load_config(Path::new("scholar.toml")).unwrap();
/// println!("Request delay: {}ms", config.source.request_delay_ms);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}
