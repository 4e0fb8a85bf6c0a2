// src/config.rs
// =============================================================================
// Runtime settings for the HTTP side of the checker.
//
// There is no config file: every value comes from a command-line flag
// (see cli.rs) and falls back to the defaults below.
// =============================================================================

use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default number of redirects reqwest will follow before giving up.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Default number of link checks allowed in flight for one page.
pub const DEFAULT_CONCURRENCY: usize = 8;

// Settings used to build the HTTP client and drive the walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerConfig {
    /// Timeout applied to every request (sitemap, page and link check)
    pub timeout: Duration,
    /// Redirect hops followed before a request counts as failed
    pub max_redirects: usize,
    /// Link checks run concurrently per page (1 = strictly sequential)
    pub concurrency: usize,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            concurrency: DEFAULT_CONCURRENCY,
            user_agent: format!("sitemap-link-checker/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
