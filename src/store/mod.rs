// src/store/mod.rs
// =============================================================================
// This module holds the results of a checking run.
//
// Submodules:
// - results: the ResultStore itself (append, cached lookup, snapshot)
// - report: Markdown and JSON rendering of a finished store
//
// The store is created empty when a run starts, filled while the sitemap is
// walked, rendered once, then dropped. Nothing is persisted between runs.
// =============================================================================

mod report;
mod results;

pub use results::{CheckedLink, ResultStore, NO_RESPONSE};
