// src/checker/mod.rs
// =============================================================================
// This module contains the link checking logic.
//
// Submodules:
// - http: asks a URL for its HTTP status (with the store as a cache)
// - html: pulls candidate links out of an HTML page
//
// This file (mod.rs) is the module root - it re-exports the public API so
// callers can write `checker::resolve_status()` instead of
// `checker::http::resolve_status()`.
// =============================================================================

mod html;
mod http;

pub use html::extract_anchor_links;
pub use http::{resolve_status, LinkChecker};
