// src/config.rs
// =============================================================================
// Options controlling a crawl.
//
// The scope is not part of CrawlOptions: it is required, and the Crawler
// checks for it before doing anything else.
// =============================================================================

use crate::policy::Policy;
use std::num::NonZeroUsize;
use std::time::Duration;

pub const DEFAULT_MAX_WORKERS: usize = 10;
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Upper bound on fetch tasks running at the same time
    pub max_workers: NonZeroUsize,
    /// Decides which discovered locators get fetched
    pub policy: Policy,
    /// A fetch still running after this long counts as a transport failure
    pub fetch_timeout: Duration,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            max_workers: NonZeroUsize::new(DEFAULT_MAX_WORKERS).unwrap_or(NonZeroUsize::MIN),
            policy: Policy::default(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

impl CrawlOptions {
    pub fn with_max_workers(mut self, max_workers: NonZeroUsize) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = CrawlOptions::default();
        assert_eq!(options.max_workers.get(), 10);
        assert_eq!(options.policy, Policy::Moderate);
        assert_eq!(options.fetch_timeout, Duration::from_secs(10));
    }
}
