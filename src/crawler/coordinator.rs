//! Crawl orchestration
//!
//! [`Scholar`] drives the paginated listing crawl and decides, per listing
//! row, whether the detail page must be fetched. It owns the throttled
//! requester for one source, so independent instances never share a rate
//! limit, and holds a handle to the [`ScholarCache`] it reads and writes.
//!
//! Cache-aware queries follow this state machine:
//! - no profile entry: crawl the listing, then create the profile entry
//! - fresh profile: resolve the known article URLs through the article cache
//! - stale profile: crawl again and replace the profile entry wholesale

use crate::cache::{CacheLookup, ScholarCache};
use crate::config::{Config, SourceConfig};
use crate::crawler::detail::extract_detail;
use crate::crawler::fetcher::{RetryPolicy, ThrottledRequester};
use crate::crawler::listing::extract_listing;
use crate::crawler::transport::{ReqwestTransport, Transport};
use crate::model::{Article, PartialArticle, Profile};
use crate::{Result, ScholarError};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Smallest page size requested from the listing endpoint
pub const MIN_PAGE_SIZE: usize = 20;

/// Largest page size the listing endpoint accepts
pub const MAX_PAGE_SIZE: usize = 80;

/// Page size used to crawl `limit` articles
pub fn page_size(limit: usize) -> usize {
    limit.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE)
}

/// Rows of one listing crawl and whether the crawl reached the end of the listing
struct Listing {
    rows: Vec<PartialArticle>,
    complete: bool,
}

/// Client for one scholar source
pub struct Scholar {
    base_url: Url,
    requester: ThrottledRequester,
    cache: Arc<ScholarCache>,
}

impl Scholar {
    /// Creates a client for the live source described by `config`
    ///
    /// The cache starts empty with the configured TTLs; use
    /// [`Scholar::with_cache`] to attach one loaded from disk.
    ///
    /// # Arguments
    ///
    /// * `config` - The full configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Scholar)` - Ready to query
    /// * `Err(ScholarError)` - Invalid base URL or HTTP client failure
    pub fn new(config: &Config) -> Result<Self> {
        let transport = ReqwestTransport::from_config(&config.source)?;
        let cache = ScholarCache::new()
            .with_ttls(config.cache.profile_ttl(), config.cache.article_ttl());

        let scholar = Self::with_transport(&config.source, Arc::new(transport))?;
        Ok(scholar.with_cache(Arc::new(cache)))
    }

    /// Creates a client that sends every request through `transport`
    pub fn with_transport(source: &SourceConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let mut base_url = Url::parse(&source.base_url)
            .map_err(|e| ScholarError::InvalidUrl(format!("{}: {}", source.base_url, e)))?;
        // Endpoints are joined relative to the base, so it must name a directory
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            requester: ThrottledRequester::new(
                transport,
                source.request_delay(),
                RetryPolicy::from_config(source),
            ),
            cache: Arc::new(ScholarCache::new()),
        })
    }

    /// Replaces the cache used by the cache-aware queries
    pub fn with_cache(mut self, cache: Arc<ScholarCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache(&self) -> &Arc<ScholarCache> {
        &self.cache
    }

    /// Changes the minimum delay between two outbound requests
    pub fn set_request_delay(&self, delay: Duration) {
        self.requester.set_request_delay(delay);
    }

    pub fn request_delay(&self) -> Duration {
        self.requester.request_delay()
    }

    /// URL of one listing page
    ///
    /// # Example
    ///
    /// ```
    /// use scholar_cache::config::SourceConfig;
    /// use scholar_cache::crawler::{ReqwestTransport, Scholar};
    /// use std::sync::Arc;
    ///
    /// let source = SourceConfig::default();
    /// let transport = Arc::new(ReqwestTransport::from_config(&source).unwrap());
    /// let scholar = Scholar::with_transport(&source, transport).unwrap();
    /// let url = scholar.listing_url("abc", 20, 80).unwrap();
    /// assert_eq!(
    ///     url.as_str(),
    ///     "https://scholar.google.com/citations?user=abc&cstart=20&pagesize=80"
    /// );
    /// ```
    pub fn listing_url(&self, user: &str, offset: usize, page_size: usize) -> Result<Url> {
        let mut url = self.base_url.join("citations")?;
        url.query_pairs_mut()
            .append_pair("user", user)
            .append_pair("cstart", &offset.to_string())
            .append_pair("pagesize", &page_size.to_string());
        Ok(url)
    }

    /// Returns up to `limit` articles of `user` with their details, bypassing the cache
    ///
    /// Articles are returned in listing order. Any failed request fails the
    /// whole query.
    pub async fn query_profile(&self, user: &str, limit: usize) -> Result<Vec<Article>> {
        let listing = self.crawl_listing(user, limit).await?;

        let mut articles = Vec::with_capacity(listing.rows.len());
        for row in listing.rows {
            let article = if row.scholar_url.is_empty() {
                Article::from(row)
            } else {
                self.fetch_detail(&row).await?
            };
            articles.push(article);
        }
        Ok(articles)
    }

    /// Returns up to `limit` listing rows of `user` without reading any detail page
    pub async fn query_profile_listing(
        &self,
        user: &str,
        limit: usize,
    ) -> Result<Vec<PartialArticle>> {
        Ok(self.crawl_listing(user, limit).await?.rows)
    }

    /// Fetches and extracts one detail page, bypassing the cache
    pub async fn query_article(&self, url: &str) -> Result<Article> {
        let seed = PartialArticle {
            scholar_url: url.to_string(),
            ..PartialArticle::default()
        };
        self.fetch_detail(&seed).await
    }

    /// Returns up to `limit` articles of `user`, consulting the cache first
    ///
    /// A fresh profile entry is served without touching the listing; only
    /// missing or stale articles are fetched. Otherwise the listing is
    /// crawled and the profile entry replaced.
    pub async fn query_profile_cached(&self, user: &str, limit: usize) -> Result<Vec<Article>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let lookup = self.cache.lookup_profile(user);
        match &lookup {
            CacheLookup::Fresh(profile) if profile.covers(limit) => {
                tracing::info!("Profile cache hit for {}", user);
                return self.serve_profile(profile, limit).await;
            }
            CacheLookup::Fresh(profile) => tracing::info!(
                "Cached profile for {} has {} of {} requested rows, recrawling",
                user,
                profile.listed_rows,
                limit
            ),
            other => tracing::info!("Profile for {} is {}, crawling", user, other.freshness()),
        }

        let listing = self.crawl_listing(user, limit).await?;
        let listed_rows = listing.rows.len();

        let mut articles = Vec::with_capacity(listing.rows.len());
        for row in listing.rows {
            articles.push(self.resolve_article(row, true).await?);
        }

        let identities = articles
            .iter()
            .map(|a| a.scholar_url.clone())
            .filter(|url| !url.is_empty())
            .collect();
        self.cache.store_profile(
            Profile::new(user, identities, listing.complete).with_listed_rows(listed_rows),
        );

        Ok(articles)
    }

    async fn serve_profile(&self, profile: &Profile, limit: usize) -> Result<Vec<Article>> {
        let mut articles = Vec::with_capacity(limit.min(profile.articles.len()));

        for url in profile.articles.iter().take(limit) {
            let seed = match self.cache.article(url) {
                Some(cached) => PartialArticle {
                    title: cached.title,
                    year: cached.year,
                    num_citations: cached.num_citations,
                    scholar_url: cached.scholar_url,
                },
                None => PartialArticle {
                    scholar_url: url.clone(),
                    ..PartialArticle::default()
                },
            };
            articles.push(self.resolve_article(seed, false).await?);
        }
        Ok(articles)
    }

    /// Resolves one article through the article cache
    ///
    /// `from_listing` marks a seed whose citation count was just read from
    /// the listing, in which case a fresh cached entry takes that count.
    async fn resolve_article(&self, seed: PartialArticle, from_listing: bool) -> Result<Article> {
        if seed.scholar_url.is_empty() {
            return Ok(Article::from(seed));
        }

        match self.cache.lookup_article(&seed.scholar_url) {
            CacheLookup::Missing => {
                tracing::debug!("Article cache miss for {}", seed.scholar_url);
                let article = self.fetch_detail(&seed).await?;
                self.cache.store_article(article.clone());
                Ok(article)
            }
            CacheLookup::Stale(cached) => {
                tracing::debug!("Article cache expired for {}", seed.scholar_url);
                match self.fetch_detail(&seed).await {
                    Ok(article) => {
                        self.cache.store_article(article.clone());
                        Ok(article)
                    }
                    Err(e) => {
                        tracing::warn!(
                            "Refreshing {} failed, keeping cached copy: {}",
                            seed.scholar_url,
                            e
                        );
                        Ok(cached)
                    }
                }
            }
            CacheLookup::Fresh(cached) => {
                tracing::debug!("Article cache hit for {}", seed.scholar_url);
                if !from_listing || cached.num_citations == seed.num_citations {
                    return Ok(cached);
                }
                Ok(self
                    .cache
                    .refresh_citations(&seed.scholar_url, seed.num_citations)
                    .unwrap_or(cached))
            }
        }
    }

    async fn fetch_detail(&self, seed: &PartialArticle) -> Result<Article> {
        tracing::debug!("Fetching article {}", seed.scholar_url);
        let body = self.requester.fetch(&seed.scholar_url).await?;
        Ok(extract_detail(&body, seed, &self.base_url))
    }

    /// Crawls listing pages until `limit` rows are collected or the listing ends
    async fn crawl_listing(&self, user: &str, limit: usize) -> Result<Listing> {
        let page_size = page_size(limit);
        let mut rows = Vec::new();
        let mut offset = 0;
        let mut complete = false;

        while rows.len() < limit {
            let url = self.listing_url(user, offset, page_size)?;
            let body = self.requester.fetch(url.as_str()).await?;
            let page = extract_listing(&body, &self.base_url);
            let page_len = page.len();

            tracing::debug!(
                "Listing page for {} at offset {}: {} rows",
                user,
                offset,
                page_len
            );

            if page_len == 0 {
                complete = true;
                break;
            }

            let remaining = limit - rows.len();
            rows.extend(page.into_iter().take(remaining));

            if page_len < page_size {
                complete = true;
                break;
            }
            offset += page_size;
        }

        tracing::info!(
            "Crawled {} listing rows for {}{}",
            rows.len(),
            user,
            if complete { " (end of listing)" } else { "" }
        );

        Ok(Listing { rows, complete })
    }
}
