// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// The one required input is the sitemap to start from. Everything else tunes
// the HTTP client, the output format or the exit code.
//
// Older invocations pass the sitemap as `-sitemap=<path>` (single dash). clap
// only knows single-character short flags, so those arguments are rewritten
// to `--sitemap` before parsing.
// =============================================================================

use crate::config::{CheckerConfig, DEFAULT_CONCURRENCY, DEFAULT_MAX_REDIRECTS, DEFAULT_TIMEOUT_SECS};
use clap::builder::TypedValueParser;
use clap::Parser;
use std::ffi::OsString;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "sitemap-link-checker",
    version,
    about = "Walks an XML sitemap and reports broken links on every page it lists",
    long_about = "sitemap-link-checker reads a sitemap (following nested sitemaps), extracts every \
                  absolute link from each listed page and checks its HTTP status. \
                  The result is a Markdown table written to stdout."
)]
pub struct Cli {
    /// Sitemap to start from: an http(s) URL, a file:// URL or a local path
    ///
    /// Also accepted as -sitemap=<PATH_OR_URL>
    #[arg(long, value_name = "PATH_OR_URL")]
    pub sitemap: String,

    /// Output results as JSON instead of a Markdown table
    #[arg(long)]
    pub json: bool,

    /// Exit with code 1 when any link answered 404
    #[arg(long)]
    pub fail_on_broken: bool,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Redirects to follow before a link counts as unreachable
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_REDIRECTS)]
    pub max_redirects: usize,

    /// Link checks allowed in flight per page
    #[arg(
        long,
        value_name = "N",
        default_value_t = DEFAULT_CONCURRENCY,
        value_parser = clap::value_parser!(u16).range(1..).map(usize::from)
    )]
    pub concurrency: usize,

    /// Log every fetch and link check to stderr
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    // Parses std::env::args, accepting the legacy single-dash sitemap flag
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_legacy_args(std::env::args_os()))
    }

    pub fn checker_config(&self) -> CheckerConfig {
        CheckerConfig {
            timeout: Duration::from_secs(self.timeout),
            max_redirects: self.max_redirects,
            concurrency: self.concurrency,
            ..CheckerConfig::default()
        }
    }
}

// Rewrites `-sitemap=<x>` to `--sitemap=<x>` and `-sitemap` to `--sitemap`
//
// Only the value after the first '=' is the flag's value, so URLs that carry
// '=' in their query string survive intact.
pub fn normalize_legacy_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| match arg.to_str() {
            Some("-sitemap") => OsString::from("--sitemap"),
            Some(s) if s.starts_with("-sitemap=") => OsString::from(format!("-{s}")),
            _ => arg,
        })
        .collect()
}
