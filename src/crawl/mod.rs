// src/crawl/mod.rs
// =============================================================================
// This module handles sitemap crawling.
//
// Submodules:
// - fetch: reads a sitemap or page from http(s) or from disk
// - sitemap: pulls <loc> entries out of sitemap XML
// - walker: the recursive, depth-first walk that fills the ResultStore
// =============================================================================

mod fetch;
mod sitemap;
mod walker;

// Re-export the main crawling function
pub use walker::walk;
