//! Fetching and extraction for the scholar source
//!
//! This module contains the network-facing half of the crate:
//! - a pluggable HTTP transport and the rate-limited, retrying requester
//! - listing and detail page extraction
//! - the [`Scholar`] orchestrator tying pagination, extraction and the cache together

mod coordinator;
mod detail;
mod fetcher;
mod listing;
mod parser;
mod throttle;
mod transport;

pub use coordinator::{page_size, Scholar, MAX_PAGE_SIZE, MIN_PAGE_SIZE};
pub use detail::extract_detail;
pub use fetcher::{RetryPolicy, ThrottledRequester};
pub use listing::extract_listing;
pub use throttle::ThrottleGate;
pub use transport::{
    build_http_client, ReqwestTransport, Transport, TransportFuture, TransportRequest,
    TransportResponse, RATE_LIMIT_REMAINING_HEADER,
};
