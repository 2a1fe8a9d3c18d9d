//! Throttled, retrying HTTP fetcher
//!
//! Every request passes through the shared [`ThrottleGate`] before it is
//! handed to the [`Transport`]. Responses are classified as follows:
//!
//! | Condition | Action |
//! |-----------|--------|
//! | HTTP 200 | Return body |
//! | HTTP 429 | Retry up to `max_retries` times, `backoff_base * 2^attempt` apart |
//! | Other status | Immediate → `UnexpectedStatus` |
//! | Network failure | Immediate → `Transport` (no retry) |

use crate::config::SourceConfig;
use crate::crawler::throttle::ThrottleGate;
use crate::crawler::transport::{Transport, TransportRequest};
use crate::{Result, ScholarError};
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;

/// Retry behaviour for rate-limited (HTTP 429) responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries on top of the first attempt
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each further retry
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_base: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &SourceConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            backoff_base: config.backoff_base(),
        }
    }

    /// Delay after failed attempt number `attempt` (0-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_base
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Issues GET requests through one throttle gate with rate-limit retries
pub struct ThrottledRequester {
    transport: Arc<dyn Transport>,
    gate: ThrottleGate,
    policy: RetryPolicy,
}

impl ThrottledRequester {
    pub fn new(transport: Arc<dyn Transport>, min_delay: Duration, policy: RetryPolicy) -> Self {
        Self {
            transport,
            gate: ThrottleGate::new(min_delay),
            policy,
        }
    }

    pub fn set_request_delay(&self, delay: Duration) {
        self.gate.set_min_delay(delay);
    }

    pub fn request_delay(&self) -> Duration {
        self.gate.min_delay()
    }

    /// Fetches `url` and returns the response body of a 200 response
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let request = TransportRequest::get(url);
        let mut attempt = 0;

        loop {
            self.gate.wait().await;
            let response = self.transport.perform(&request).await?;

            if response.status == StatusCode::OK {
                tracing::trace!("Response body from {}:\n{}", url, response.body);
                return Ok(response.body);
            }

            if response.status != StatusCode::TOO_MANY_REQUESTS {
                return Err(ScholarError::UnexpectedStatus {
                    url: url.to_string(),
                    status: response.status.as_u16(),
                    rate_limit_remaining: response.rate_limit_remaining(),
                });
            }

            if attempt >= self.policy.max_retries {
                return Err(ScholarError::RateLimited {
                    url: url.to_string(),
                    retries: self.policy.max_retries,
                });
            }

            let backoff = self.policy.backoff(attempt);
            tracing::warn!(
                "Rate limited (429) by {}, retrying in {:?} (attempt {}/{})",
                url,
                backoff,
                attempt + 1,
                self.policy.max_retries
            );
            tokio::time::sleep(backoff).await;
            attempt += 1;
        }
    }
}
