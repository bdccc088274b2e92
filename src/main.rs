// src/main.rs
// =============================================================================
// This is the entry point of the scope-crawler CLI.
//
// What happens here:
// 1. Set up logging (tracing, to stderr, filtered by RUST_LOG)
// 2. Parse command-line arguments using clap
// 3. Load the scope file and build the crawler
// 4. Crawl, printing every newly found URL to stdout as it is admitted
// 5. Optionally print all fetched results as JSON
// 6. Exit with 0 when the crawl finishes, 2 on a configuration error
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use scope_crawler::{CrawlOptions, Crawler, FetchResult, HttpTransport, Locator, Scope};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("scope_crawler=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!("{:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let scope = Scope::load(&cli.scope, !cli.lenient_scope)
        .with_context(|| format!("could not load scope from {}", cli.scope.display()))?;

    let timeout = Duration::from_secs(cli.timeout);
    let workers = usize::try_from(cli.threads)
        .ok()
        .and_then(NonZeroUsize::new)
        .context("thread count must be a positive integer")?;

    let options = CrawlOptions::default()
        .with_max_workers(workers)
        .with_policy(cli.policy())
        .with_fetch_timeout(timeout);

    let transport = HttpTransport::new(timeout)?;

    let seeds: Vec<Locator> = cli.urls.iter().map(|u| Locator::parse(u)).collect();

    let mut crawler = Crawler::new(Some(scope), options, Arc::new(transport))
        .on_locator_found(|locator| println!("{}", locator));

    let store = crawler.crawl(seeds).await?;

    if cli.json {
        let results: Vec<&FetchResult> = store.fetched().iter().collect();
        println!("{}", serde_json::to_string_pretty(&results)?);
    }

    Ok(())
}
