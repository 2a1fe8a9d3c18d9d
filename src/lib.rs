//! Scholar-Cache: a polite publication-list harvester
//!
//! This crate retrieves a researcher's publication list and per-publication metadata
//! from a paginated, rate-limited scholar profile site, and keeps a two-tier
//! time-bounded cache (profiles and articles) so repeated queries avoid redundant
//! network traffic.

pub mod cache;
pub mod config;
pub mod crawler;
pub mod model;
pub mod state;

use thiserror::Error;

/// Main error type for Scholar-Cache operations
#[derive(Debug, Error)]
pub enum ScholarError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Rate limited at {url}: max retries ({retries}) exceeded (HTTP 429)")]
    RateLimited { url: String, retries: u32 },

    #[error(
        "Unexpected HTTP status {status} from {url} (rate limit remaining: {})",
        rate_limit_remaining.as_deref().unwrap_or("unknown")
    )]
    UnexpectedStatus {
        url: String,
        status: u16,
        rate_limit_remaining: Option<String>,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Cache error: {0}")]
    Cache(#[from] cache::CacheError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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
}

/// Result type alias for Scholar-Cache operations
pub type Result<T> = std::result::Result<T, ScholarError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use cache::ScholarCache;
pub use config::Config;
pub use crawler::Scholar;
pub use model::{Article, PartialArticle, Profile};
pub use state::Freshness;
