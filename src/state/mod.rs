//! State module for cache entry lifecycles
//!
//! - `Freshness`: whether a cached profile or article is missing, stale, or fresh

mod freshness;

pub use freshness::Freshness;
