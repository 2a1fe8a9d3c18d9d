//! Uncached queries: pagination, extraction and the request policy

use crate::fixtures::*;
use scholar_cache::config::{Config, SourceConfig};
use scholar_cache::crawler::ReqwestTransport;
use scholar_cache::{Scholar, ScholarError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_query_profile_with_details() {
    let server = MockServer::start().await;
    mount_profile(&server, "abc", 5, 20).await;

    let articles = scholar(&server).query_profile("abc", 5).await.unwrap();

    assert_eq!(articles.len(), 5);
    let first = &articles[0];
    assert_eq!(first.title, "Paper 0");
    assert_eq!(first.scholar_url, detail_url(&server, "abc", 0));
    assert_eq!(first.num_citations, 1000);
    assert_eq!(first.authors, "Author abc");
    assert_eq!((first.year, first.month, first.day), (2019, 6, 1));
    assert_eq!(first.journal, "Journal of Tests");
    assert_eq!(first.volume, "0");
    assert_eq!(first.pages, "1-10");
    assert_eq!(first.publisher, "Test Press");
    assert_eq!(first.description, "About paper 0.");
    assert_eq!(
        first.pdf_url.as_deref(),
        Some("https://papers.example.org/0.pdf")
    );
    assert_eq!(first.articles, 2);
    assert_eq!(
        first.cited_by_urls,
        vec![format!("{}/scholar?cites=0", server.uri())]
    );
    assert_eq!(first.related_urls.len(), 1);
    assert_eq!(first.versions_urls.len(), 1);
    assert!(first.has_details());

    assert_eq!(listing_requests(&server).await, 1);
    assert_eq!(detail_requests(&server).await, 5);
}

#[tokio::test]
async fn test_exact_limit_in_listing_order() {
    let server = MockServer::start().await;
    mount_profile(&server, "abc", 200, 80).await;

    let rows = scholar(&server)
        .query_profile_listing("abc", 170)
        .await
        .unwrap();

    let titles: Vec<String> = rows.iter().map(|r| r.title.clone()).collect();
    let expected: Vec<String> = (0..170).map(|i| format!("Paper {}", i)).collect();
    assert_eq!(titles, expected);
    assert_eq!(listing_requests(&server).await, 3);
    assert_eq!(detail_requests(&server).await, 0);
}

#[tokio::test]
async fn test_limit_beyond_available() {
    let server = MockServer::start().await;
    mount_profile(&server, "abc", 30, 80).await;

    let rows = scholar(&server)
        .query_profile_listing("abc", 100)
        .await
        .unwrap();

    assert_eq!(rows.len(), 30);
    assert_eq!(listing_requests(&server).await, 1);
}

#[tokio::test]
async fn test_small_limit_uses_minimum_page_size() {
    let server = MockServer::start().await;
    mount_profile(&server, "abc", 50, 20).await;

    let articles = scholar(&server).query_profile("abc", 3).await.unwrap();

    assert_eq!(articles.len(), 3);
    assert_eq!(listing_requests(&server).await, 1);
    assert_eq!(detail_requests(&server).await, 3);
}

#[tokio::test]
async fn test_rate_limited_once_then_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/citations"))
        .and(query_param("user", "abc"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_profile(&server, "abc", 4, 20).await;

    let rows = scholar(&server)
        .query_profile_listing("abc", 4)
        .await
        .unwrap();

    assert_eq!(rows.len(), 4);
    assert_eq!(listing_requests(&server).await, 2);
}

#[tokio::test]
async fn test_rate_limited_until_retries_exhausted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let result = scholar(&server).query_profile("abc", 10).await;

    assert!(matches!(
        result,
        Err(ScholarError::RateLimited { retries: 3, .. })
    ));
    assert_eq!(listing_requests(&server).await, 4);
}

#[tokio::test]
async fn test_unexpected_status_carries_hint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).insert_header("x-ratelimit-remaining", "0"))
        .mount(&server)
        .await;

    let result = scholar(&server).query_profile("abc", 10).await;

    match result {
        Err(ScholarError::UnexpectedStatus {
            status,
            rate_limit_remaining,
            ..
        }) => {
            assert_eq!(status, 503);
            assert_eq!(rate_limit_remaining.as_deref(), Some("0"));
        }
        other => panic!("expected UnexpectedStatus, got {:?}", other),
    }
    assert_eq!(listing_requests(&server).await, 1);
}

#[tokio::test]
async fn test_failed_detail_fails_query() {
    let server = MockServer::start().await;
    mount_listing_page(&server, "abc", 0, 20, listing_page("abc", 0..2)).await;
    mount_detail(&server, "abc", 0).await;
    Mock::given(method("GET"))
        .and(query_param("citation_for_view", "abc:1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = scholar(&server).query_profile("abc", 2).await;

    assert!(matches!(
        result,
        Err(ScholarError::UnexpectedStatus { status: 404, .. })
    ));
}

#[tokio::test]
async fn test_transport_error_not_retried() {
    let source = SourceConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        request_delay_ms: 0,
        timeout_secs: 5,
        ..SourceConfig::default()
    };
    let transport = ReqwestTransport::from_config(&source).unwrap();
    let scholar = Scholar::with_transport(&source, Arc::new(transport)).unwrap();

    let result = scholar.query_profile_listing("abc", 10).await;

    assert!(matches!(result, Err(ScholarError::Transport { .. })));
}

#[tokio::test]
async fn test_requests_are_spaced() {
    let server = MockServer::start().await;
    mount_profile(&server, "abc", 160, 80).await;

    let scholar = scholar(&server);
    scholar.set_request_delay(Duration::from_millis(50));

    let start = Instant::now();
    scholar.query_profile_listing("abc", 200).await.unwrap();

    // Two full pages plus the empty third
    assert_eq!(listing_requests(&server).await, 3);
    assert!(start.elapsed() >= Duration::from_millis(100));
}

#[tokio::test]
async fn test_query_single_article() {
    let server = MockServer::start().await;
    mount_detail(&server, "abc", 7).await;

    let url = detail_url(&server, "abc", 7);
    let article = scholar(&server).query_article(&url).await.unwrap();

    assert_eq!(article.title, "Paper 7");
    assert_eq!(article.scholar_url, url);
    assert_eq!(article.volume, "7");
    assert_eq!(article.num_citations, 0);
}

#[tokio::test]
async fn test_scholar_from_config() {
    let server = MockServer::start().await;
    mount_profile(&server, "abc", 2, 20).await;

    let config = Config {
        source: source_config(&server),
        ..Config::default()
    };
    let scholar = Scholar::new(&config).unwrap();

    let articles = scholar.query_profile("abc", 2).await.unwrap();
    assert_eq!(articles.len(), 2);
    assert_eq!(articles[1].title, "Paper 1");
}
