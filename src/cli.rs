// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Example:
//   scope-crawler -u https://example.com -s scope.json -t 20 --light-scan
//
// The scan mode picks the admission policy:
//   (default)              moderate
//   -a / --aggressive-scan aggressive
//   -l / --light-scan      light
// =============================================================================

use clap::Parser;
use scope_crawler::Policy;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "scope-crawler",
    version,
    about = "Crawl websites concurrently, bounded by a regex scope",
    long_about = "scope-crawler starts from one or more URLs and follows every link that \
                  stays inside the scope file's rules, printing each newly found URL."
)]
pub struct Cli {
    /// URLs to start crawling from (repeat -u for several)
    #[arg(short = 'u', long = "url", required = true)]
    pub urls: Vec<String>,

    /// JSON scope file with "urls", "content-type" and "extensions" rules
    #[arg(short = 's', long = "scope")]
    pub scope: PathBuf,

    /// Maximum number of pages fetched at the same time
    #[arg(short = 't', long = "threads", default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub threads: u64,

    /// Aggressive scan: fetch every distinct query variant
    #[arg(short = 'a', long = "aggressive-scan", conflicts_with = "light")]
    pub aggressive: bool,

    /// Light scan: fetch each path only once
    #[arg(short = 'l', long = "light-scan")]
    pub light: bool,

    /// Seconds before a single fetch is given up on
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Ignore invalid scope patterns instead of refusing to start
    #[arg(long)]
    pub lenient_scope: bool,

    /// Print the fetched results as JSON when the crawl ends
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn policy(&self) -> Policy {
        if self.aggressive {
            Policy::Aggressive
        } else if self.light {
            Policy::Light
        } else {
            Policy::Moderate
        }
    }
}
