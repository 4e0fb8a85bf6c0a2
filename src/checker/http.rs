// src/checker/http.rs
// =============================================================================
// This module finds out which HTTP status a link answers with.
//
// Key functionality:
// - Makes HTTP HEAD requests (lightweight, no body download)
// - Falls back to GET when the server refuses HEAD (405 or 501)
// - Follows redirects and reports the final status
// - Never fails: any transport error becomes NO_RESPONSE (-1)
// - Asks the ResultStore first, so each URL is checked at most once per run
//
// Rust concepts:
// - async/await: network I/O without blocking the runtime
// - Option<T>: cache hit or miss
// =============================================================================

use crate::config::CheckerConfig;
use crate::store::{ResultStore, NO_RESPONSE};
use reqwest::{Client, StatusCode};

// Owns the pooled HTTP client shared by every request of a run
//
// Client is cheap to clone (it's an Arc internally), but we only ever need one
#[derive(Debug, Clone)]
pub struct LinkChecker {
    client: Client,
    concurrency: usize,
}

impl LinkChecker {
    pub fn new(config: &CheckerConfig) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            concurrency: config.concurrency.max(1),
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    // Performs a live check of one URL, bypassing any cache
    //
    // Returns: the HTTP status code, or NO_RESPONSE if no response came back
    pub async fn check_status(&self, url: &str) -> i32 {
        let status = match self.client.head(url).send().await {
            Ok(response) if head_unsupported(response.status()) => {
                tracing::debug!(url, status = response.status().as_u16(), "HEAD refused, retrying with GET");
                self.client.get(url).send().await.map(|r| r.status())
            }
            Ok(response) => Ok(response.status()),
            Err(e) => Err(e),
        };

        match status {
            Ok(status) => {
                tracing::debug!(url, status = status.as_u16(), "checked link");
                i32::from(status.as_u16())
            }
            Err(e) => {
                tracing::debug!(url, reason = describe_error(&e), error = %e, "no response");
                NO_RESPONSE
            }
        }
    }
}

// Returns the status for `target_url`, preferring what the store already knows
//
// 1. If the store has an entry for the URL, its first-recorded status is
//    returned and no request is made
// 2. Otherwise the URL is checked live
pub async fn resolve_status(checker: &LinkChecker, target_url: &str, store: &ResultStore) -> i32 {
    if let Some(status) = store.lookup_status(target_url) {
        tracing::debug!(url = target_url, status, "cached status");
        return status;
    }
    checker.check_status(target_url).await
}

// Servers that don't implement HEAD answer 405 or 501 instead of the real status
fn head_unsupported(status: StatusCode) -> bool {
    matches!(status, StatusCode::METHOD_NOT_ALLOWED | StatusCode::NOT_IMPLEMENTED)
}

// Short label for why a request produced no response (used in logs only)
fn describe_error(error: &reqwest::Error) -> &'static str {
    let error_string = error.to_string().to_lowercase();

    if error.is_timeout() {
        "timeout"
    } else if error.is_redirect() {
        "too many redirects"
    } else if error_string.contains("certificate") || error_string.contains("ssl") {
        "tls error"
    } else if error.is_connect() {
        if error_string.contains("dns") {
            "dns error"
        } else {
            "connection failed"
        }
    } else if error.is_builder() {
        "invalid url"
    } else {
        "request failed"
    }
}
