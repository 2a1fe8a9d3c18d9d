//! Dual-tier cache for profiles and articles
//!
//! The cache owns two stores for the lifetime of the process:
//! - profiles keyed by user handle, expiring after the profile TTL (1 day)
//! - articles keyed by detail-page URL, expiring after the article TTL (1 week)
//!
//! Both stores can be snapshotted to JSON and reloaded. Loading never fails:
//! an absent or unreadable snapshot yields an empty store.

mod snapshot;
mod store;

pub use snapshot::{read_snapshot, read_snapshot_or_empty, write_snapshot};
pub use store::Store;

use crate::config::CacheConfig;
use crate::model::{Article, Profile};
use crate::state::Freshness;
use chrono::{DateTime, Duration, Utc};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while persisting the cache
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cache file {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Outcome of a cache lookup
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup<T> {
    Missing,
    Stale(T),
    Fresh(T),
}

impl<T> CacheLookup<T> {
    fn classify(
        entry: Option<T>,
        last_retrieved: impl Fn(&T) -> Option<DateTime<Utc>>,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        match entry {
            None => Self::Missing,
            Some(value) => match Freshness::at(last_retrieved(&value), ttl, now) {
                Freshness::Fresh => Self::Fresh(value),
                _ => Self::Stale(value),
            },
        }
    }

    pub fn freshness(&self) -> Freshness {
        match self {
            Self::Missing => Freshness::Missing,
            Self::Stale(_) => Freshness::Stale,
            Self::Fresh(_) => Freshness::Fresh,
        }
    }
}

/// Profile and article stores with independent TTLs
#[derive(Debug)]
pub struct ScholarCache {
    profiles: Store<Profile>,
    articles: Store<Article>,
    profile_ttl: Duration,
    article_ttl: Duration,
}

impl Default for ScholarCache {
    fn default() -> Self {
        let defaults = CacheConfig::default();
        Self {
            profiles: Store::new(),
            articles: Store::new(),
            profile_ttl: defaults.profile_ttl(),
            article_ttl: defaults.article_ttl(),
        }
    }
}

impl ScholarCache {
    /// Creates an empty cache with the default TTLs
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces both TTLs
    pub fn with_ttls(mut self, profile_ttl: Duration, article_ttl: Duration) -> Self {
        self.profile_ttl = profile_ttl;
        self.article_ttl = article_ttl;
        self
    }

    /// Loads both stores from their snapshots
    ///
    /// Each store independently falls back to empty if its snapshot is absent
    /// or cannot be decoded.
    pub fn load(profile_path: &Path, article_path: &Path) -> Self {
        let profiles = read_snapshot_or_empty(profile_path);
        let articles = read_snapshot_or_empty(article_path);

        tracing::info!(
            "Loaded cache with {} profiles and {} articles",
            profiles.len(),
            articles.len()
        );

        Self {
            profiles: Store::from_map(profiles),
            articles: Store::from_map(articles),
            ..Self::default()
        }
    }

    /// Loads the snapshots and TTLs named in the configuration
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::load(
            Path::new(&config.profile_path),
            Path::new(&config.article_path),
        )
        .with_ttls(config.profile_ttl(), config.article_ttl())
    }

    /// Writes both stores to their snapshots
    pub fn save(&self, profile_path: &Path, article_path: &Path) -> Result<(), CacheError> {
        let profiles = self.profiles.snapshot();
        let articles = self.articles.snapshot();

        write_snapshot(profile_path, &profiles)?;
        write_snapshot(article_path, &articles)?;

        tracing::info!(
            "Saved cache with {} profiles and {} articles",
            profiles.len(),
            articles.len()
        );
        Ok(())
    }

    pub fn profile_ttl(&self) -> Duration {
        self.profile_ttl
    }

    pub fn article_ttl(&self) -> Duration {
        self.article_ttl
    }

    pub fn lookup_profile(&self, user: &str) -> CacheLookup<Profile> {
        self.lookup_profile_at(user, Utc::now())
    }

    pub fn lookup_profile_at(&self, user: &str, now: DateTime<Utc>) -> CacheLookup<Profile> {
        CacheLookup::classify(
            self.profiles.get(user),
            |p| Some(p.last_retrieved),
            self.profile_ttl,
            now,
        )
    }

    pub fn lookup_article(&self, url: &str) -> CacheLookup<Article> {
        self.lookup_article_at(url, Utc::now())
    }

    pub fn lookup_article_at(&self, url: &str, now: DateTime<Utc>) -> CacheLookup<Article> {
        CacheLookup::classify(
            self.articles.get(url),
            |a| a.last_retrieved,
            self.article_ttl,
            now,
        )
    }

    /// Inserts or wholesale replaces the profile for `profile.user`
    pub fn store_profile(&self, profile: Profile) {
        self.profiles.put(profile.user.clone(), profile);
    }

    /// Inserts or replaces the article under its detail URL
    ///
    /// Articles without a detail URL have no identity and are not stored.
    pub fn store_article(&self, article: Article) {
        if article.scholar_url.is_empty() {
            tracing::debug!("Not caching article '{}' without a URL", article.title);
            return;
        }
        self.articles.put(article.scholar_url.clone(), article);
    }

    /// Updates only the citation count of a cached article
    ///
    /// `last_retrieved` is left untouched. Returns the updated article, or
    /// None if it is not cached.
    pub fn refresh_citations(&self, url: &str, num_citations: u32) -> Option<Article> {
        self.articles
            .update(url, |article| article.num_citations = num_citations)
    }

    pub fn profile(&self, user: &str) -> Option<Profile> {
        self.profiles.get(user)
    }

    pub fn article(&self, url: &str) -> Option<Article> {
        self.articles.get(url)
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }

    pub fn article_count(&self) -> usize {
        self.articles.len()
    }
}
