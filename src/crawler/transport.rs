//! HTTP transport boundary
//!
//! The requester never talks to `reqwest` directly; it goes through the
//! [`Transport`] trait so tests can substitute fixture-backed transports.

use crate::config::SourceConfig;
use crate::ScholarError;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use std::future::Future;
use std::pin::Pin;

/// Header the source uses to hint at its remaining request budget
pub const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// Boxed future returned by [`Transport::perform`]
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<TransportResponse, ScholarError>> + Send + 'a>>;

/// An outbound GET request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub url: String,
}

impl TransportRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// A fully-read response
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TransportResponse {
    /// Builds a response with no headers
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// The source's rate-limit budget hint, if it sent one
    pub fn rate_limit_remaining(&self) -> Option<String> {
        self.headers
            .get(RATE_LIMIT_REMAINING_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

/// Performs a single HTTP exchange
///
/// Implementations must not retry or throttle; that is the requester's job.
/// Connection-level failures are reported as [`ScholarError::Transport`].
pub trait Transport: Send + Sync {
    fn perform<'a>(&'a self, request: &'a TransportRequest) -> TransportFuture<'a>;
}

/// Builds the HTTP client used against the live source
///
/// # Example
///
/// ```no_run
/// use scholar_cache::config::SourceConfig;
/// use scholar_cache::crawler::build_http_client;
///
/// let client = build_http_client(&SourceConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &SourceConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.timeout())
        .connect_timeout(config.timeout().min(std::time::Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Transport`] backed by a `reqwest` client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &SourceConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

impl Transport for ReqwestTransport {
    fn perform<'a>(&'a self, request: &'a TransportRequest) -> TransportFuture<'a> {
        Box::pin(async move {
            let transport_err = |e: reqwest::Error| ScholarError::Transport {
                url: request.url.clone(),
                message: classify_error(&e),
            };

            let response = self
                .client
                .get(&request.url)
                .send()
                .await
                .map_err(transport_err)?;

            let status = response.status();
            let headers = response.headers().clone();
            let body = response.text().await.map_err(transport_err)?;

            Ok(TransportResponse {
                status,
                headers,
                body,
            })
        })
    }
}

fn classify_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("Request timeout: {}", e)
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        e.to_string()
    }
}
