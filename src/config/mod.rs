//! Configuration module for Scholar-Cache
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use scholar_cache::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scholar.toml")).unwrap();
//! println!("Profiles are cached for {}s", config.cache.profile_ttl_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CacheConfig, Config, SourceConfig, DEFAULT_BASE_URL, DEFAULT_USER_AGENT, MAX_TTL_SECS,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
