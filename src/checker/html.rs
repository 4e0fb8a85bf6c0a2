// src/checker/html.rs
// =============================================================================
// This module extracts candidate links from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Is built on html5ever, so broken real-world markup still parses
// - Supports CSS selectors for finding elements
//
// Only absolute links are candidates. Relative links are NOT resolved
// against the page URL: a link without a scheme is skipped, not checked.
//
// Rust concepts:
// - Iterators: filter + map over selected elements
// - &str vs String: we borrow the HTML, but return owned hrefs
// =============================================================================

use scraper::{Html, Selector};

// Extracts the href of every qualifying <a> element, in document order
//
// Parameters:
//   html: the page body (borrowed as &str)
//
// Returns: Vec<String> of hrefs exactly as written in the page
//
// Example:
//   html = "<a href='https://a.test/x'>x</a><a href='/docs'>d</a>"
//   result = ["https://a.test/x"]
pub fn extract_anchor_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    // "a[href]" is a constant selector and always parses
    let selector = Selector::parse("a[href]").unwrap();

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter(|href| is_checkable_href(href))
        .map(str::to_string)
        .collect()
}

// Decides whether an href should be checked
//
// We skip:
// - a bare "#" (link to the top of the same page)
// - mailto: links (email)
// - anything without "://" (relative paths, fragments, tel:, javascript:)
pub fn is_checkable_href(href: &str) -> bool {
    href != "#" && !href.starts_with("mailto:") && href.contains("://")
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why not resolve relative links?
//    - The report lists links exactly as authors wrote them
//    - A relative href would need the page URL to make sense, and checking
//      it would double-count same-site navigation
//
// 2. Why can one anchor show up twice?
//    - html5ever follows the browser parsing rules: when a new <a> starts
//      while an earlier one is still open across a block element like <p>,
//      the earlier anchor is closed and a copy of it is re-created inside
//      that block
//    - Both elements carry the href, so the page gets two report rows for
//      it, the same thing a browser's DOM would show
//
// 3. Why is the href not trimmed or normalised?
//    - The store de-duplicates on exact string equality, so
//      "https://a.test" and "https://a.test/" are two different targets
// -----------------------------------------------------------------------------
