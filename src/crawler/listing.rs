//! Profile listing page extraction
//!
//! A listing page is a table of the researcher's publications, one
//! `.gsc_a_tr` row per article, ranked by the source (usually by citations).
//! Each row yields a [`PartialArticle`]; missing or malformed cells degrade
//! to empty/zero values instead of dropping the row or the page.

use crate::crawler::parser::{
    element_text, first_child_element, parse_number, resolve_link, select_all, select_first,
    text_of,
};
use crate::model::PartialArticle;
use scraper::{ElementRef, Html};
use url::Url;

const ROW: &str = ".gsc_a_tr";
const TITLE_LINK: &str = ".gsc_a_t .gsc_a_at";
const YEAR: &str = ".gsc_a_y span";
const CITATIONS: &str = ".gsc_a_c";

/// Extracts the listing rows of one profile page, in document order
///
/// # Example
///
/// ```
/// use scholar_cache::crawler::extract_listing;
/// use url::Url;
///
/// let html = r#"<table><tr class="gsc_a_tr">
///   <td class="gsc_a_t"><a class="gsc_a_at" href="/citations?view_op=view_citation&c=1">A paper</a></td>
///   <td class="gsc_a_c"><a class="gsc_a_ac">12</a></td>
///   <td class="gsc_a_y"><span>2020</span></td>
/// </tr></table>"#;
/// let base = Url::parse("https://scholar.google.com").unwrap();
/// let rows = extract_listing(html, &base);
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].num_citations, 12);
/// ```
pub fn extract_listing(html: &str, base_url: &Url) -> Vec<PartialArticle> {
    let document = Html::parse_document(html);

    select_all(document.root_element(), ROW)
        .into_iter()
        .map(|row| extract_row(row, base_url))
        .collect()
}

fn extract_row(row: ElementRef<'_>, base_url: &Url) -> PartialArticle {
    let link = select_first(row, TITLE_LINK);

    let title = link.map(element_text).unwrap_or_default();
    let scholar_url = link
        .and_then(|l| l.value().attr("href"))
        .and_then(|href| resolve_link(href, base_url))
        .unwrap_or_default();

    let year = parse_number(&text_of(row, YEAR));

    let num_citations = select_first(row, CITATIONS)
        .and_then(first_child_element)
        .map(|badge| parse_number(&element_text(badge)))
        .unwrap_or(0);

    if scholar_url.is_empty() {
        tracing::debug!("Listing row '{}' has no detail link", title);
    }

    PartialArticle {
        title,
        year,
        num_citations,
        scholar_url,
    }
}
