use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A researcher's publication list as seen by one complete crawl
///
/// The article list is replaced as a whole on every re-crawl and never
/// patched, so it always reflects a single listing snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user: String,
    pub last_retrieved: DateTime<Utc>,
    /// Detail-page URLs in listing order; keys into the article store
    pub articles: Vec<String>,
    /// Whether the crawl reached the end of the listing
    #[serde(default)]
    pub complete: bool,
    /// Listing rows the crawl collected, including rows without a detail link
    #[serde(default)]
    pub listed_rows: usize,
}

impl Profile {
    pub fn new(user: impl Into<String>, articles: Vec<String>, complete: bool) -> Self {
        Self {
            user: user.into(),
            last_retrieved: Utc::now(),
            listed_rows: articles.len(),
            articles,
            complete,
        }
    }

    /// Records how many listing rows the crawl collected
    ///
    /// Rows without a detail link have no identity and are absent from
    /// `articles`, but they still count towards the listing's length.
    pub fn with_listed_rows(mut self, listed_rows: usize) -> Self {
        self.listed_rows = listed_rows.max(self.articles.len());
        self
    }

    /// Whether this snapshot can answer a query for `limit` articles
    pub fn covers(&self, limit: usize) -> bool {
        self.complete || self.listed_rows.max(self.articles.len()) >= limit
    }
}
