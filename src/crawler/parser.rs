//! Small HTML helpers shared by the listing and detail extractors
//!
//! Selector failures and missing nodes never abort extraction; callers get
//! `None` or an empty string and fall back to zero values.

use scraper::{ElementRef, Selector};
use url::Url;

/// Parses a CSS selector, logging (not failing) on a bad pattern
pub(crate) fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(e) => {
            tracing::error!("Invalid selector '{}': {:?}", css, e);
            None
        }
    }
}

/// All descendants of `element` matching `css`, in document order
pub(crate) fn select_all<'a>(element: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match selector(css) {
        Some(sel) => element.select(&sel).collect(),
        None => Vec::new(),
    }
}

/// First descendant of `element` matching `css`
pub(crate) fn select_first<'a>(element: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let sel = selector(css)?;
    element.select(&sel).next()
}

/// First child element of `element`
pub(crate) fn first_child_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.children().find_map(ElementRef::wrap)
}

/// Concatenated, trimmed text of `element`
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Trimmed text of the first descendant matching `css`, or empty
pub(crate) fn text_of(element: ElementRef<'_>, css: &str) -> String {
    select_first(element, css)
        .map(element_text)
        .unwrap_or_default()
}

/// Parses a number out of node text; anything non-numeric degrades to zero
pub(crate) fn parse_number<T>(text: &str) -> T
where
    T: std::str::FromStr + Default,
{
    text.trim().parse().unwrap_or_default()
}

/// Resolves an `href` against the source's base URL
///
/// Returns None for empty hrefs, fragment-only links, and non-HTTP(S) results.
pub(crate) fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
