// src/store/results.rs
// =============================================================================
// The ResultStore: an append-only log of checked links.
//
// Each entry records which page a link was found on, the absolute URL that
// was checked, and the HTTP status it answered with (or NO_RESPONSE).
//
// The first entry recorded for a target URL decides the status every later
// lookup of that URL sees. That lookup is what stops the walker from checking
// the same URL twice in one run, even when it is linked from many pages.
//
// Rust concepts:
// - Vec<T>: ordered storage, insertion order is the report order
// - HashMap::entry: insert only if the key is not present yet
// - thiserror: derive Display/Error for our error enum
// =============================================================================

use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

/// Status recorded when no HTTP response could be obtained at all.
pub const NO_RESPONSE: i32 = -1;

/// One checked link: found on `host_page`, pointing at `target_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckedLink {
    /// HTTP status code, or NO_RESPONSE
    pub status_code: i32,
    /// Page the anchor was found on
    pub host_page: String,
    /// Absolute URL that was checked
    pub target_url: String,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("invalid status code {0} (expected -1 or 100..=999)")]
    InvalidStatus(i32),
}

#[derive(Debug, Default, Clone)]
pub struct ResultStore {
    entries: Vec<CheckedLink>,
    // target_url -> status of its first entry
    first_seen: HashMap<String, i32>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Appends an entry
    //
    // Only fails when the status code is outside what HTTP can produce; in that
    // case nothing is stored and the existing entries are left as they were.
    pub fn add_link(
        &mut self,
        status_code: i32,
        host_page: impl Into<String>,
        target_url: impl Into<String>,
    ) -> Result<(), StoreError> {
        if !is_valid_status(status_code) {
            return Err(StoreError::InvalidStatus(status_code));
        }

        let target_url = target_url.into();
        self.first_seen
            .entry(target_url.clone())
            .or_insert(status_code);
        self.entries.push(CheckedLink {
            status_code,
            host_page: host_page.into(),
            target_url,
        });
        Ok(())
    }

    // Returns the status recorded for the first entry whose target URL is
    // exactly `target_url` (case-sensitive, no normalisation)
    pub fn lookup_status(&self, target_url: &str) -> Option<i32> {
        self.first_seen.get(target_url).copied()
    }

    pub fn entries(&self) -> &[CheckedLink] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries whose status is exactly 404.
    pub fn not_found_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|link| link.status_code == 404)
            .count()
    }
}

fn is_valid_status(status_code: i32) -> bool {
    status_code == NO_RESPONSE || (100..=999).contains(&status_code)
}
