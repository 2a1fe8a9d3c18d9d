use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of a profile listing page, before its detail page is read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialArticle {
    pub title: String,
    pub year: i32,
    pub num_citations: u32,
    /// Absolute detail-page URL; empty when the row carried no link
    pub scholar_url: String,
}

/// A publication with the metadata found on its detail page
///
/// `scholar_url` is the article's identity in the cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Article {
    pub title: String,
    pub authors: String,
    pub scholar_url: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub num_citations: u32,
    /// Number of bundled publications (merged snippets) behind this entry
    pub articles: u32,
    pub description: String,
    pub pdf_url: Option<String>,
    pub journal: String,
    pub volume: String,
    pub pages: String,
    pub publisher: String,
    pub cited_by_urls: Vec<String>,
    pub versions_urls: Vec<String>,
    pub related_urls: Vec<String>,
    /// Set when the detail page was last read; `None` for listing-only records
    pub last_retrieved: Option<DateTime<Utc>>,
}

impl From<PartialArticle> for Article {
    fn from(partial: PartialArticle) -> Self {
        Self {
            title: partial.title,
            scholar_url: partial.scholar_url,
            year: partial.year,
            num_citations: partial.num_citations,
            ..Self::default()
        }
    }
}

impl Article {
    /// Whether the detail page has ever been read for this article
    pub fn has_details(&self) -> bool {
        self.last_retrieved.is_some()
    }
}

impl fmt::Display for Article {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Article(")?;
        writeln!(f, "  title={}", self.title)?;
        writeln!(f, "  authors={}", self.authors)?;
        writeln!(f, "  scholar_url={}", self.scholar_url)?;
        writeln!(f, "  date={}/{}/{}", self.year, self.month, self.day)?;
        writeln!(f, "  citations={}", self.num_citations)?;
        writeln!(f, "  articles={}", self.articles)?;
        writeln!(f, "  description={}", self.description)?;
        writeln!(f, "  pdf_url={}", self.pdf_url.as_deref().unwrap_or(""))?;
        writeln!(f, "  journal={}", self.journal)?;
        writeln!(f, "  volume={}", self.volume)?;
        writeln!(f, "  pages={}", self.pages)?;
        writeln!(f, "  publisher={}", self.publisher)?;
        writeln!(f, "  cited_by={}", self.cited_by_urls.join(", "))?;
        writeln!(f, "  versions={}", self.versions_urls.join(", "))?;
        writeln!(f, "  related={}", self.related_urls.join(", "))?;
        match self.last_retrieved {
            Some(at) => writeln!(f, "  last_retrieved={}", at.to_rfc3339())?,
            None => writeln!(f, "  last_retrieved=never")?,
        }
        write!(f, ")")
    }
}
