// src/crawl/sitemap.rs
// =============================================================================
// Pulls <loc> entries out of a sitemaps.org 0.9 document.
//
// Both <urlset> and <sitemapindex> documents work: only <loc> is read and
// everything else (<lastmod>, <priority>, ...) is ignored. A <loc> only
// counts when it is bound to the sitemap namespace.
//
// The whole document must be well-formed. Any reader error, a document with
// no root element, elements still open at the end, or anything but
// whitespace, comments and processing instructions outside the single root
// reject it outright so the walker can skip the branch.
// =============================================================================

use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use thiserror::Error;

pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

#[derive(Error, Debug)]
pub enum SitemapError {
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML escape error: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    #[error("document has no root element")]
    NoRoot,

    #[error("document ended with {0} unclosed element(s)")]
    Unclosed(usize),

    #[error("content outside the root element")]
    OutsideRoot,
}

// Returns every namespaced <loc> text in document order
pub fn parse_sitemap_locs(xml: &str) -> Result<Vec<String>, SitemapError> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut locs = Vec::new();
    let mut depth = 0usize;
    let mut saw_root = false;
    let mut root_closed = false;
    // Depth at which the <loc> we are inside was opened
    let mut loc_depth: Option<usize> = None;
    let mut current = String::new();

    loop {
        match reader.read_resolved_event()? {
            (ns, Event::Start(e)) => {
                if root_closed {
                    return Err(SitemapError::OutsideRoot);
                }
                depth += 1;
                saw_root = true;
                if loc_depth.is_none() && is_sitemap_loc(&ns, e.local_name().as_ref()) {
                    loc_depth = Some(depth);
                    current.clear();
                }
            }
            (_, Event::Empty(_)) => {
                if root_closed {
                    return Err(SitemapError::OutsideRoot);
                }
                if depth == 0 {
                    root_closed = true;
                }
                saw_root = true;
            }
            (_, Event::End(_)) => {
                if depth == 0 {
                    return Err(SitemapError::OutsideRoot);
                }
                if loc_depth == Some(depth) {
                    loc_depth = None;
                    let loc = current.trim();
                    if !loc.is_empty() {
                        locs.push(loc.to_string());
                    }
                }
                depth -= 1;
                if depth == 0 {
                    root_closed = true;
                }
            }
            // Only whitespace may sit before or after the root
            (_, Event::Text(e)) if depth == 0 && !is_blank(&e) => {
                return Err(SitemapError::OutsideRoot)
            }
            (_, Event::CData(_)) if depth == 0 => return Err(SitemapError::OutsideRoot),
            (_, Event::Text(e)) if loc_depth.is_some() => current.push_str(&e.unescape()?),
            (_, Event::CData(e)) if loc_depth.is_some() => {
                current.push_str(&String::from_utf8_lossy(&e.into_inner()))
            }
            (_, Event::Eof) => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(SitemapError::NoRoot);
    }
    if depth > 0 {
        return Err(SitemapError::Unclosed(depth));
    }
    Ok(locs)
}

fn is_blank(text: &[u8]) -> bool {
    text.iter().all(u8::is_ascii_whitespace)
}

fn is_sitemap_loc(ns: &ResolveResult, local_name: &[u8]) -> bool {
    local_name == b"loc"
        && matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == SITEMAP_NS.as_bytes())
}

// True when the last path segment of `loc` mentions "sitemap.xml"
//
// Examples:
//   https://example.com/sitemap.xml      -> true
//   https://example.com/sub-sitemap.xml  -> true
//   https://example.com/sitemap/page     -> false
pub fn is_nested_sitemap(loc: &str) -> bool {
    loc.rsplit('/')
        .next()
        .is_some_and(|segment| segment.contains("sitemap.xml"))
}
