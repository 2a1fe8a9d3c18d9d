use serde::Deserialize;
use std::time::Duration;

/// Default scholar site
pub const DEFAULT_BASE_URL: &str = "https://scholar.google.com";

/// Browser-like identity; the source serves a reduced page to unknown agents
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:60.0) Gecko/20100101 Firefox/81.0";

/// Main configuration structure for Scholar-Cache
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Remote source and request pacing configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Base URL of the scholar site; listing and detail links resolve against it
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Minimum time between two outbound requests (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// How many times a rate-limited (HTTP 429) request is retried
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Base of the exponential backoff between rate-limit retries (milliseconds)
    #[serde(rename = "backoff-base-ms")]
    pub backoff_base_ms: u64,

    /// Per-request network timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_delay_ms: 2_000,
            max_retries: 3,
            backoff_base_ms: 5_000,
            timeout_secs: 30,
        }
    }
}

impl SourceConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Cache snapshot locations and entry lifetimes
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// JSON snapshot of the profile store
    #[serde(rename = "profile-path")]
    pub profile_path: String,

    /// JSON snapshot of the article store
    #[serde(rename = "article-path")]
    pub article_path: String,

    /// Age after which a profile listing is re-crawled (seconds)
    #[serde(rename = "profile-ttl-secs")]
    pub profile_ttl_secs: u64,

    /// Age after which an article detail page is re-fetched (seconds)
    #[serde(rename = "article-ttl-secs")]
    pub article_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            profile_path: "profiles.json".to_string(),
            article_path: "articles.json".to_string(),
            profile_ttl_secs: 24 * 60 * 60,
            article_ttl_secs: 7 * 24 * 60 * 60,
        }
    }
}

/// Longest accepted cache TTL: 100 years
pub const MAX_TTL_SECS: u64 = 100 * 365 * 24 * 60 * 60;

impl CacheConfig {
    pub fn profile_ttl(&self) -> chrono::Duration {
        ttl_from_secs(self.profile_ttl_secs)
    }

    pub fn article_ttl(&self) -> chrono::Duration {
        ttl_from_secs(self.article_ttl_secs)
    }
}

/// Converts a TTL in seconds, saturating at [`MAX_TTL_SECS`]
fn ttl_from_secs(secs: u64) -> chrono::Duration {
    let secs = secs.min(MAX_TTL_SECS) as i64;
    chrono::Duration::try_seconds(secs).unwrap_or_else(chrono::Duration::max_value)
}
