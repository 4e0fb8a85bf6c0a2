// src/store/report.rs
// =============================================================================
// Renders a ResultStore for humans (Markdown) and for machines (JSON).
//
// Markdown layout:
//
//   # CheckedURLs
//
//   URLs checked: <N>\t\t404 Errors found: <M>
//   | Website Page | Target URL | HTTP Response Code |
//   | ------------ | ---------- | ------------------ |
//   | <host page> | <target url> | <status> |
//   ...
//   <blank line>
//
// N counts every entry, M only entries whose status is exactly 404.
// =============================================================================

use super::{CheckedLink, ResultStore};
use serde::Serialize;
use std::fmt::{self, Write as _};

/// JSON shape of a finished run.
#[derive(Debug, Serialize)]
pub struct ReportSummary<'a> {
    pub urls_checked: usize,
    pub not_found: usize,
    pub links: &'a [CheckedLink],
}

impl ResultStore {
    pub fn summary(&self) -> ReportSummary<'_> {
        ReportSummary {
            urls_checked: self.len(),
            not_found: self.not_found_count(),
            links: self.entries(),
        }
    }

    pub fn render_report(&self) -> String {
        let mut out = String::new();
        out.push_str("# CheckedURLs\n\n");
        // Writing into a String never fails
        let _ = writeln!(
            out,
            "URLs checked: {}\t\t404 Errors found: {}",
            self.len(),
            self.not_found_count()
        );
        out.push_str("| Website Page | Target URL | HTTP Response Code |\n");
        out.push_str("| ------------ | ---------- | ------------------ |\n");
        for link in self.entries() {
            let _ = writeln!(
                out,
                "| {} | {} | {} |",
                link.host_page, link.target_url, link.status_code
            );
        }
        out.push('\n');
        out
    }

    pub fn render_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.summary())
    }
}

impl fmt::Display for ResultStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_report())
    }
}
