//! Cache entry freshness relative to a time-to-live

use chrono::{DateTime, Duration, Utc};
use std::fmt;

/// Where a cache lookup leaves an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Freshness {
    /// No entry for the key
    Missing,

    /// Entry exists but is older than its TTL (or was never retrieved)
    Stale,

    /// Entry exists and its age is within the TTL
    Fresh,
}

impl Freshness {
    /// Classifies an entry retrieved at `last_retrieved` as of `now`
    ///
    /// The interval is closed: an entry aged exactly `ttl` is still fresh.
    pub fn at(last_retrieved: Option<DateTime<Utc>>, ttl: Duration, now: DateTime<Utc>) -> Self {
        match last_retrieved {
            Some(at) if now - at <= ttl => Self::Fresh,
            _ => Self::Stale,
        }
    }

}

impl fmt::Display for Freshness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Missing => "missing",
            Self::Stale => "stale",
            Self::Fresh => "fresh",
        };
        write!(f, "{}", s)
    }
}
