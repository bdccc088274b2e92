// src/error.rs
// =============================================================================
// Error types for the crawler.
//
// There are two very different kinds of failure:
// - CrawlError: configuration problems found before the crawl starts.
//   These are fatal and abort the whole crawl.
// - FetchError: something went wrong with ONE locator. These never stop
//   the crawl; the scheduler logs them and moves on.
// =============================================================================

use crate::hooks::HookPoint;
use crate::store::FetchResult;
use std::time::Duration;
use thiserror::Error;

/// Fatal misconfiguration, raised before any fetch happens.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("no scope configured; refusing to crawl without one")]
    MissingScope,

    #[error("invalid {section} pattern {pattern:?}: {source}")]
    InvalidPattern {
        section: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("could not parse scope document: {0}")]
    ScopeDocument(#[from] serde_json::Error),

    #[error("could not read scope file: {0}")]
    ScopeFile(#[from] std::io::Error),

    #[error("could not build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// The transport could not produce a response at all.
///
/// A 404 or 500 is NOT a transport error: it is a perfectly good response.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("fetch timed out after {0:?}")]
    Timeout(Duration),

    #[error("unreachable: {0}")]
    Unreachable(String),
}

/// Why a single fetch task did not contribute discovered locators.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("vetoed by {0} hook")]
    HookVeto(HookPoint),

    // Still carries the result so the scheduler can record it as fetched
    #[error("page {} is out of scope", .0.locator)]
    OutOfScope(Box<FetchResult>),
}
