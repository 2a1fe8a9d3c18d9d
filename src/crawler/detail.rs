//! Article detail page extraction
//!
//! A detail page carries the PDF link next to the title and a list of
//! labelled `.gs_scl` blocks, each with a `.gsc_oci_field` name and a
//! `.gsc_oci_value`. The "Scholar articles" block bundles one or more
//! `.gsc_oci_merged_snippet` sub-blocks, one per physical publication, whose
//! links point at citing works, other versions and related works.

use crate::crawler::parser::{
    element_text, first_child_element, parse_number, resolve_link, select_all, select_first,
    text_of,
};
use crate::model::{Article, PartialArticle};
use chrono::Utc;
use scraper::{ElementRef, Html};
use url::Url;

const TITLE: &str = "#gsc_oci_title";
const PDF_CONTAINER: &str = ".gsc_oci_title_ggi";
const FIELD_BLOCK: &str = ".gs_scl";
const FIELD_NAME: &str = ".gsc_oci_field";
const FIELD_VALUE: &str = ".gsc_oci_value";
const MERGED_SNIPPET: &str = ".gsc_oci_merged_snippet";
const SNIPPET_LINK: &str = ".gsc_oms_link";

/// Field name of the block holding merged snippets
const AGGREGATE_FIELD: &str = "Scholar articles";

/// Builds the full article from a detail page
///
/// Title, year and citation count are carried over from `seed`; the page
/// only overrides the year (via "Publication date") and fills the title when
/// the seed has none. `last_retrieved` is set to now.
pub fn extract_detail(html: &str, seed: &PartialArticle, base_url: &Url) -> Article {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let mut article = Article::from(seed.clone());
    article.last_retrieved = Some(Utc::now());

    if article.title.is_empty() {
        article.title = text_of(root, TITLE);
    }

    article.pdf_url = select_first(root, PDF_CONTAINER)
        .and_then(first_child_element)
        .and_then(|link| link.value().attr("href"))
        .and_then(|href| resolve_link(href, base_url));

    for block in select_all(root, FIELD_BLOCK) {
        apply_field(&mut article, block, base_url);
    }

    article
}

fn apply_field(article: &mut Article, block: ElementRef<'_>, base_url: &Url) {
    let name = text_of(block, FIELD_NAME);
    let Some(value) = select_first(block, FIELD_VALUE) else {
        return;
    };

    match name.as_str() {
        "Authors" => article.authors = element_text(value),
        "Publication date" => apply_date(article, &element_text(value)),
        "Journal" => article.journal = element_text(value),
        "Volume" => article.volume = element_text(value),
        "Pages" => article.pages = element_text(value),
        "Publisher" => article.publisher = element_text(value),
        "Description" => article.description = element_text(value),
        other if other.eq_ignore_ascii_case(AGGREGATE_FIELD) => {
            for snippet in select_all(value, MERGED_SNIPPET) {
                apply_snippet(article, snippet, base_url);
            }
        }
        other => tracing::trace!("Ignoring detail field '{}'", other),
    }
}

/// `YYYY/MM/DD`; anything with fewer parts leaves the date unchanged
fn apply_date(article: &mut Article, date: &str) {
    let parts: Vec<&str> = date.split('/').collect();
    if parts.len() == 3 {
        article.year = parse_number(parts[0]);
        article.month = parse_number(parts[1]);
        article.day = parse_number(parts[2]);
    }
}

fn apply_snippet(article: &mut Article, snippet: ElementRef<'_>, base_url: &Url) {
    article.articles += 1;

    for link in select_all(snippet, SNIPPET_LINK) {
        let text = element_text(link);
        let Some(url) = link
            .value()
            .attr("href")
            .and_then(|href| resolve_link(href, base_url))
        else {
            continue;
        };

        // Categories are independent; one link may land in several
        if text.contains("Cited by") {
            article.cited_by_urls.push(url.clone());
        }
        if text.contains("Related") {
            article.related_urls.push(url.clone());
        }
        if text.contains("versions") {
            article.versions_urls.push(url);
        }
    }
}
