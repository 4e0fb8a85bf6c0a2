// src/crawl/fetch.rs
// =============================================================================
// Reads the raw text behind a sitemap or page location.
//
// A location can be:
// - an http:// or https:// URL (fetched with the shared reqwest client)
// - a file:// URL
// - a plain filesystem path such as ./sitemap.xml
//
// An HTTP response outside 2xx counts as a failed fetch, the same as a
// network error: there is no usable document behind it.
// =============================================================================

use reqwest::Client;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported location: {0}")]
    UnsupportedLocation(String),
}

#[derive(Debug, PartialEq, Eq)]
enum Location {
    Remote(Url),
    Local(PathBuf),
}

fn parse_location(location: &str) -> Result<Location, FetchError> {
    match Url::parse(location) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(Location::Remote(url)),
            "file" => url
                .to_file_path()
                .map(Location::Local)
                .map_err(|_| FetchError::UnsupportedLocation(location.to_string())),
            _ => Err(FetchError::UnsupportedLocation(location.to_string())),
        },
        // No scheme at all: treat it as a path on disk
        Err(url::ParseError::RelativeUrlWithoutBase) => Ok(Location::Local(PathBuf::from(location))),
        Err(_) => Err(FetchError::UnsupportedLocation(location.to_string())),
    }
}

// Fetches the full body at `location` as text
pub async fn fetch_text(client: &Client, location: &str) -> Result<String, FetchError> {
    match parse_location(location)? {
        Location::Remote(url) => {
            tracing::debug!(url = %url, "fetching");
            let response = client.get(url).send().await?;

            if !response.status().is_success() {
                return Err(FetchError::Status(response.status().as_u16()));
            }

            Ok(response.text().await?)
        }
        Location::Local(path) => {
            tracing::debug!(path = %path.display(), "reading");
            Ok(tokio::fs::read_to_string(&path).await?)
        }
    }
}
