// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr only, stdout is reserved for the report)
// 3. Walk the sitemap into an empty ResultStore
// 4. Print the report as Markdown or JSON
// 5. Exit with proper code (0 = success, 1 = broken links with
//    --fail-on-broken, 2 = error)
// =============================================================================

mod checker; // src/checker/ - link status and anchor extraction
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - HTTP client settings
mod crawl; // src/crawl/ - sitemap walking
mod store; // src/store/ - results and reports

use anyhow::{Context, Result};
use checker::LinkChecker;
use cli::Cli;
use store::ResultStore;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    // Usage errors exit inside parse_args (clap prints them and exits with 2)
    let cli = Cli::parse_args();

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = report printed
//   Ok(1) = report printed, 404s found and --fail-on-broken set
//   Err = setup or output failure
async fn run(cli: Cli) -> Result<i32> {
    init_logging(&cli)?;

    let checker = LinkChecker::new(&cli.checker_config()).context("failed to build HTTP client")?;

    tracing::info!(sitemap = %cli.sitemap, "starting link check");
    let store = crawl::walk(&checker, cli.sitemap.clone(), ResultStore::new()).await;

    if store.is_empty() {
        tracing::warn!(sitemap = %cli.sitemap, "no links were checked");
    }

    print_report(&store, cli.json)?;

    if cli.fail_on_broken && store.not_found_count() > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("failed to set up logging")?;
    Ok(())
}

fn print_report(store: &ResultStore, json: bool) -> Result<()> {
    if json {
        let json_output = store.render_json().context("failed to serialize report")?;
        println!("{}", json_output);
    } else {
        // The report already ends with its own blank line
        print!("{}", store);
    }
    Ok(())
}
