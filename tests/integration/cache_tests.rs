//! Cache-aware queries and snapshot persistence

use crate::fixtures::*;
use chrono::{Duration as ChronoDuration, Utc};
use scholar_cache::config::{parse_config, CacheConfig};
use scholar_cache::ScholarCache;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn cache_config(dir: &TempDir) -> CacheConfig {
    CacheConfig {
        profile_path: dir.path().join("profiles.json").display().to_string(),
        article_path: dir.path().join("articles.json").display().to_string(),
        ..CacheConfig::default()
    }
}

fn save(cache: &ScholarCache, config: &CacheConfig) {
    cache
        .save(
            Path::new(&config.profile_path),
            Path::new(&config.article_path),
        )
        .unwrap();
}

#[tokio::test]
async fn test_cache_survives_restart() {
    let server = MockServer::start().await;
    mount_profile(&server, "abc", 3, 20).await;
    let dir = TempDir::new().unwrap();
    let config = cache_config(&dir);

    let cache = Arc::new(ScholarCache::from_config(&config));
    let first = scholar(&server)
        .with_cache(Arc::clone(&cache))
        .query_profile_cached("abc", 3)
        .await
        .unwrap();
    save(&cache, &config);

    let reloaded = Arc::new(ScholarCache::from_config(&config));
    assert_eq!(reloaded.profile_count(), 1);
    assert_eq!(reloaded.article_count(), 3);

    let second = scholar(&server)
        .with_cache(reloaded)
        .query_profile_cached("abc", 3)
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(listing_requests(&server).await, 1);
    assert_eq!(detail_requests(&server).await, 3);
}

#[tokio::test]
async fn test_corrupt_snapshots_start_empty() {
    let server = MockServer::start().await;
    mount_profile(&server, "abc", 2, 20).await;
    let dir = TempDir::new().unwrap();
    let config = cache_config(&dir);
    std::fs::write(&config.profile_path, "{ truncated").unwrap();
    std::fs::write(&config.article_path, "[]").unwrap();

    let cache = Arc::new(ScholarCache::from_config(&config));
    assert_eq!(cache.profile_count(), 0);
    assert_eq!(cache.article_count(), 0);

    let articles = scholar(&server)
        .with_cache(Arc::clone(&cache))
        .query_profile_cached("abc", 2)
        .await
        .unwrap();
    assert_eq!(articles.len(), 2);

    save(&cache, &config);
    assert_eq!(ScholarCache::from_config(&config).article_count(), 2);
}

#[tokio::test]
async fn test_expired_profile_recrawls_but_reuses_articles() {
    let server = MockServer::start().await;
    mount_profile(&server, "abc", 3, 20).await;
    let dir = TempDir::new().unwrap();
    let config = CacheConfig {
        profile_ttl_secs: 0,
        ..cache_config(&dir)
    };

    let scholar = scholar(&server).with_cache(Arc::new(ScholarCache::from_config(&config)));
    scholar.query_profile_cached("abc", 3).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    let articles = scholar.query_profile_cached("abc", 3).await.unwrap();

    assert_eq!(articles.len(), 3);
    assert_eq!(listing_requests(&server).await, 2);
    assert_eq!(detail_requests(&server).await, 3);
}

#[tokio::test]
async fn test_stale_article_survives_failed_refresh() {
    let server = MockServer::start().await;
    mount_listing_page(&server, "abc", 0, 20, listing_page("abc", 0..2)).await;
    mount_detail(&server, "abc", 1).await;
    Mock::given(method("GET"))
        .and(query_param("citation_for_view", "abc:0"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let cache = Arc::new(ScholarCache::new());
    let stale = scholar_cache::Article {
        title: "Paper 0".to_string(),
        authors: "Previously Retrieved".to_string(),
        scholar_url: detail_url(&server, "abc", 0),
        num_citations: 900,
        last_retrieved: Some(Utc::now() - ChronoDuration::weeks(2)),
        ..Default::default()
    };
    cache.store_article(stale.clone());

    let articles = scholar(&server)
        .with_cache(Arc::clone(&cache))
        .query_profile_cached("abc", 2)
        .await
        .unwrap();

    assert_eq!(articles[0], stale);
    assert_eq!(articles[1].authors, "Author abc");
    assert_eq!(cache.article(&stale.scholar_url), Some(stale));
    assert_eq!(cache.profile("abc").unwrap().articles.len(), 2);
}

#[tokio::test]
async fn test_config_file_drives_cache() {
    let dir = TempDir::new().unwrap();
    let profiles = dir.path().join("p.json");
    let articles = dir.path().join("a.json");
    let toml = format!(
        r#"
        [source]
        request-delay-ms = 0

        [cache]
        profile-path = "{}"
        article-path = "{}"
        profile-ttl-secs = 3600
        "#,
        profiles.display(),
        articles.display()
    );

    let config = parse_config(&toml).unwrap();
    let cache = ScholarCache::from_config(&config.cache);

    assert_eq!(cache.profile_ttl(), ChronoDuration::hours(1));
    assert_eq!(cache.article_ttl(), ChronoDuration::weeks(1));
    save(&cache, &config.cache);
    assert!(profiles.exists());
    assert!(articles.exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_cached_queries() {
    let server = MockServer::start().await;
    mount_profile(&server, "abc", 10, 20).await;
    mount_profile(&server, "xyz", 10, 20).await;

    let cache = Arc::new(ScholarCache::new());
    let scholar = Arc::new(scholar(&server).with_cache(Arc::clone(&cache)));

    let handles: Vec<_> = ["abc", "xyz", "abc", "xyz"]
        .into_iter()
        .map(|user| {
            let scholar = Arc::clone(&scholar);
            tokio::spawn(async move { scholar.query_profile_cached(user, 10).await })
        })
        .collect();

    for handle in handles {
        let articles = handle.await.unwrap().unwrap();
        assert_eq!(articles.len(), 10);
        let titles: Vec<String> = articles.iter().map(|a| a.title.clone()).collect();
        let expected: Vec<String> = (0..10).map(|i| format!("Paper {}", i)).collect();
        assert_eq!(titles, expected);
    }

    assert_eq!(cache.profile_count(), 2);
    assert_eq!(cache.article_count(), 20);
    assert_eq!(cache.profile("xyz").unwrap().articles.len(), 10);
}
