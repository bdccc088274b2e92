// src/lib.rs
// =============================================================================
// scope-crawler: a concurrent web crawler bounded by a regex scope.
//
// Give it seed URLs and a Scope; it fetches pages, extracts links, filters
// them against the scope and an admission policy, and keeps going until
// there is nothing left to visit.
//
// Modules (leaves first):
// - locator:   canonical URL model, the dedup key everywhere
// - extract:   link extraction from raw HTML
// - scope:     include/exclude rules for URLs, extensions, content types
// - policy:    aggressive / moderate / light admission
// - store:     frontier + fetched results
// - hooks:     pre/post-fetch veto points
// - transport: the network boundary (reqwest by default)
// - crawl:     the scheduler loop
// =============================================================================

pub mod config;
pub mod crawl;
pub mod error;
pub mod extract;
pub mod hooks;
pub mod locator;
pub mod policy;
pub mod scope;
pub mod store;
pub mod transport;

pub use config::CrawlOptions;
pub use crawl::Crawler;
pub use error::{CrawlError, FetchError, TransportError};
pub use hooks::{HookPoint, Hooks};
pub use locator::Locator;
pub use policy::Policy;
pub use scope::{Scope, ScopeRule};
pub use store::{CrawlerStore, FetchResult, FetchedResults};
pub use transport::{HttpTransport, Transport, TransportResponse};
