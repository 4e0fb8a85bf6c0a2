// src/crawl/walker.rs
// =============================================================================
// This module walks a sitemap depth-first and checks every page it lists.
//
// How it works:
// 1. Fetch the sitemap and read its <loc> entries, in document order
// 2. A <loc> whose last path segment mentions "sitemap.xml" is another
//    sitemap: walk it fully before moving on to the next sibling
// 3. Any other <loc> is a page: fetch it, pull out its absolute links,
//    find each link's status and append (status, page, link) to the store
// 4. Hand the store back to the caller
//
// Failure policy:
// - A sitemap or page that can't be fetched or parsed is skipped (logged at
//   warn) and the walk carries on with its siblings
// - A link that can't be reached is not an error, it's recorded as -1
//
// There is no cycle detection: a sitemap that lists itself recurses forever.
//
// Rust concepts:
// - BoxFuture: an async fn can't call itself directly, the recursive future
//   has to live on the heap
// - Moving ownership: the store goes in by value and comes back out
// =============================================================================

use crate::checker::{extract_anchor_links, resolve_status, LinkChecker};
use crate::crawl::fetch::fetch_text;
use crate::crawl::sitemap::{is_nested_sitemap, parse_sitemap_locs};
use crate::store::{ResultStore, NO_RESPONSE};
use futures::future::{BoxFuture, FutureExt};
use futures::stream::{self, StreamExt};
use std::collections::{HashMap, HashSet};

// Walks the sitemap at `location` and returns the store with every link
// found below it appended
//
// Parameters:
//   checker: shared HTTP client and concurrency setting
//   location: sitemap URL or local path
//   store: results so far (taken by value, returned when done)
pub fn walk(checker: &LinkChecker, location: String, mut store: ResultStore) -> BoxFuture<'_, ResultStore> {
    async move {
        let xml = match fetch_text(checker.client(), &location).await {
            Ok(xml) => xml,
            Err(e) => {
                tracing::warn!(sitemap = %location, error = %e, "skipping sitemap, fetch failed");
                return store;
            }
        };

        let locs = match parse_sitemap_locs(&xml) {
            Ok(locs) => locs,
            Err(e) => {
                tracing::warn!(sitemap = %location, error = %e, "skipping sitemap, not well-formed");
                return store;
            }
        };

        tracing::info!(sitemap = %location, entries = locs.len(), "walking sitemap");

        for loc in locs {
            if is_nested_sitemap(&loc) {
                store = walk(checker, loc, store).await;
            } else {
                store = check_page(checker, &loc, store).await;
            }
        }

        store
    }
    .boxed()
}

// Fetches one page and records a result for each qualifying anchor on it
async fn check_page(checker: &LinkChecker, page: &str, mut store: ResultStore) -> ResultStore {
    let html = match fetch_text(checker.client(), page).await {
        Ok(html) => html,
        Err(e) => {
            tracing::warn!(page, error = %e, "skipping page, fetch failed");
            return store;
        }
    };

    let links = extract_anchor_links(&html);
    tracing::info!(page, links = links.len(), "checking page");

    let fresh = check_unseen(checker, &links, &store).await;

    // Appending in anchor order keeps the report identical to a sequential run
    for link in links {
        let status = store
            .lookup_status(&link)
            .or_else(|| fresh.get(&link).copied())
            .unwrap_or(NO_RESPONSE);

        if let Err(e) = store.add_link(status, page, link) {
            tracing::warn!(page, error = %e, "dropping result");
        }
    }

    store
}

// Checks, at most once each, the links the store has not seen yet
//
// Up to `checker.concurrency()` checks run at a time. The store is only read
// here; results are written back by the caller.
async fn check_unseen(
    checker: &LinkChecker,
    links: &[String],
    store: &ResultStore,
) -> HashMap<String, i32> {
    let mut queued = HashSet::new();
    let unseen: Vec<String> = links
        .iter()
        .filter(|link| store.lookup_status(link).is_none())
        .filter(|link| queued.insert(link.as_str()))
        .cloned()
        .collect();

    stream::iter(unseen)
        .map(move |link: String| async move {
            let status = resolve_status(checker, &link, store).await;
            (link, status)
        })
        .buffered(checker.concurrency())
        .collect()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CheckerConfig;
    use std::io::Write;
    use std::time::Duration;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn checker_with(concurrency: usize) -> LinkChecker {
        let config = CheckerConfig {
            timeout: Duration::from_secs(5),
            concurrency,
            ..CheckerConfig::default()
        };
        LinkChecker::new(&config).unwrap()
    }

    fn sitemap_xml(locs: &[String]) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#,
        );
        for loc in locs {
            xml.push_str(&format!("<url><loc>{}</loc></url>", loc));
        }
        xml.push_str("</urlset>");
        xml
    }

    async fn serve_get(server: &MockServer, route: &str, body: String) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(body)
                    .insert_header("content-type", "text/html"),
            )
            .mount(server)
            .await;
    }

    async fn serve_head(server: &MockServer, route: &str, status: u16, times: u64) {
        Mock::given(method("HEAD"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status))
            .expect(times)
            .mount(server)
            .await;
    }

    fn host_pages(store: &ResultStore) -> Vec<&str> {
        store.entries().iter().map(|l| l.host_page.as_str()).collect()
    }

    #[tokio::test]
    async fn test_single_page_scenario() {
        let server = MockServer::start().await;
        let base = server.uri();

        serve_get(&server, "/sitemap.xml", sitemap_xml(&[format!("{base}/page1")])).await;
        serve_get(
            &server,
            "/page1",
            format!(
                r##"<html><body>
                <a href="{base}/broken">bad</a>
                <a href="#top">top</a>
                <a href="mailto:x@example.com">mail</a>
                <a href="/relative">rel</a>
                </body></html>"##
            ),
        )
        .await;
        serve_head(&server, "/broken", 404, 1).await;

        let store = walk(&checker_with(1), format!("{base}/sitemap.xml"), ResultStore::new()).await;

        assert_eq!(store.len(), 1);
        let entry = &store.entries()[0];
        assert_eq!(entry.host_page, format!("{base}/page1"));
        assert_eq!(entry.target_url, format!("{base}/broken"));
        assert_eq!(entry.status_code, 404);

        let report = store.render_report();
        assert!(report.contains("URLs checked: 1\t\t404 Errors found: 1"));
    }

    #[tokio::test]
    async fn test_nested_sitemap_recurses() {
        let server = MockServer::start().await;
        let base = server.uri();

        serve_get(&server, "/sitemap.xml", sitemap_xml(&[format!("{base}/sub-sitemap.xml")])).await;
        serve_get(&server, "/sub-sitemap.xml", sitemap_xml(&[format!("{base}/pageA")])).await;
        serve_get(&server, "/pageA", format!(r#"<a href="{base}/ok">ok</a>"#)).await;
        serve_head(&server, "/ok", 200, 1).await;

        let store = walk(&checker_with(1), format!("{base}/sitemap.xml"), ResultStore::new()).await;

        assert_eq!(store.len(), 1);
        assert_eq!(store.entries()[0].host_page, format!("{base}/pageA"));
        assert_eq!(store.entries()[0].status_code, 200);
    }

    #[tokio::test]
    async fn test_depth_first_document_order() {
        let server = MockServer::start().await;
        let base = server.uri();

        serve_get(
            &server,
            "/sitemap.xml",
            sitemap_xml(&[
                format!("{base}/page1"),
                format!("{base}/inner-sitemap.xml"),
                format!("{base}/page3"),
            ]),
        )
        .await;
        serve_get(&server, "/inner-sitemap.xml", sitemap_xml(&[format!("{base}/page2")])).await;
        for page in ["page1", "page2", "page3"] {
            serve_get(&server, &format!("/{page}"), format!(r#"<a href="{base}/t/{page}">x</a>"#)).await;
            serve_head(&server, &format!("/t/{page}"), 200, 1).await;
        }

        let store = walk(&checker_with(1), format!("{base}/sitemap.xml"), ResultStore::new()).await;

        assert_eq!(
            host_pages(&store),
            vec![
                format!("{base}/page1"),
                format!("{base}/page2"),
                format!("{base}/page3"),
            ]
        );
    }

    #[tokio::test]
    async fn test_same_target_checked_once_across_pages() {
        let server = MockServer::start().await;
        let base = server.uri();

        serve_get(
            &server,
            "/sitemap.xml",
            sitemap_xml(&[format!("{base}/one"), format!("{base}/two")]),
        )
        .await;
        let html = format!(r#"<a href="{base}/shared">shared</a>"#);
        serve_get(&server, "/one", html.clone()).await;
        serve_get(&server, "/two", html).await;
        // MockServer verifies the expectation when it is dropped
        serve_head(&server, "/shared", 404, 1).await;

        let store = walk(&checker_with(1), format!("{base}/sitemap.xml"), ResultStore::new()).await;

        assert_eq!(store.len(), 2);
        assert_eq!(host_pages(&store), vec![format!("{base}/one"), format!("{base}/two")]);
        assert!(store.entries().iter().all(|l| l.status_code == 404));
        assert_eq!(store.not_found_count(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_checks_keep_order_and_run_once() {
        let server = MockServer::start().await;
        let base = server.uri();

        serve_get(&server, "/sitemap.xml", sitemap_xml(&[format!("{base}/page")])).await;

        let mut html = String::new();
        let mut expected = Vec::new();
        for i in 0..12 {
            // Every link appears twice on the page
            html.push_str(&format!(r#"<a href="{base}/l{i}">{i}</a><a href="{base}/l{i}">again</a>"#));
            expected.push(format!("{base}/l{i}"));
            expected.push(format!("{base}/l{i}"));
            let status = if i % 3 == 0 { 404 } else { 200 };
            serve_head(&server, &format!("/l{i}"), status, 1).await;
        }
        serve_get(&server, "/page", html).await;

        let store = walk(&checker_with(4), format!("{base}/sitemap.xml"), ResultStore::new()).await;

        let targets: Vec<_> = store.entries().iter().map(|l| l.target_url.clone()).collect();
        assert_eq!(targets, expected);
        assert_eq!(store.not_found_count(), 8);
    }

    #[tokio::test]
    async fn test_malformed_sitemap_leaves_store_unchanged() {
        let server = MockServer::start().await;
        let base = server.uri();

        serve_get(&server, "/sitemap.xml", "<urlset><url><loc>oops</url>".to_string()).await;

        let mut store = ResultStore::new();
        store.add_link(200, "https://earlier.test/", "https://x.test/").unwrap();

        let store = walk(&checker_with(1), format!("{base}/sitemap.xml"), store).await;
        assert_eq!(store.len(), 1);
        assert_eq!(store.entries()[0].host_page, "https://earlier.test/");
    }

    #[tokio::test]
    async fn test_sitemap_with_trailing_content_is_skipped() {
        let server = MockServer::start().await;
        let base = server.uri();

        let xml = format!("{}<extra/>", sitemap_xml(&[format!("{base}/page")]));
        serve_get(&server, "/sitemap.xml", xml).await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!(r#"<a href="{base}/t">t</a>"#)))
            .expect(0)
            .mount(&server)
            .await;

        let store = walk(&checker_with(1), format!("{base}/sitemap.xml"), ResultStore::new()).await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_sitemap_is_skipped() {
        let store = walk(
            &checker_with(1),
            "http://127.0.0.1:9/sitemap.xml".to_string(),
            ResultStore::new(),
        )
        .await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_failed_page_is_skipped_and_siblings_continue() {
        let server = MockServer::start().await;
        let base = server.uri();

        serve_get(
            &server,
            "/sitemap.xml",
            sitemap_xml(&[
                format!("{base}/missing-page"),
                format!("{base}/broken-sitemap.xml"),
                format!("{base}/good"),
            ]),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/missing-page"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        serve_get(&server, "/broken-sitemap.xml", "not xml at all".to_string()).await;
        serve_get(&server, "/good", format!(r#"<a href="{base}/target">t</a>"#)).await;
        serve_head(&server, "/target", 200, 1).await;

        let store = walk(&checker_with(1), format!("{base}/sitemap.xml"), ResultStore::new()).await;

        assert_eq!(host_pages(&store), vec![format!("{base}/good")]);
    }

    #[tokio::test]
    async fn test_unreachable_link_recorded_as_no_response() {
        let server = MockServer::start().await;
        let base = server.uri();

        serve_get(&server, "/sitemap.xml", sitemap_xml(&[format!("{base}/page")])).await;
        serve_get(&server, "/page", r#"<a href="http://127.0.0.1:9/dead">dead</a>"#.to_string()).await;

        let store = walk(&checker_with(1), format!("{base}/sitemap.xml"), ResultStore::new()).await;

        assert_eq!(store.len(), 1);
        assert_eq!(store.entries()[0].status_code, NO_RESPONSE);
        assert_eq!(store.not_found_count(), 0);
    }

    #[tokio::test]
    async fn test_local_sitemap_file() {
        let server = MockServer::start().await;
        let base = server.uri();

        serve_get(&server, "/page", format!(r#"<a href="{base}/target">t</a>"#)).await;
        serve_head(&server, "/target", 410, 1).await;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", sitemap_xml(&[format!("{base}/page")])).unwrap();
        let location = file.path().to_str().unwrap().to_string();

        let store = walk(&checker_with(1), location, ResultStore::new()).await;

        assert_eq!(store.len(), 1);
        assert_eq!(store.entries()[0].status_code, 410);
        // 410 is broken but is not counted as a 404
        assert_eq!(store.not_found_count(), 0);
    }
}
