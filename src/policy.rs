// src/policy.rs
// =============================================================================
// Admission policies: should a newly discovered locator be fetched?
//
// The three variants trade coverage for speed:
// - Aggressive: fetch every distinct locator (all query variants)
// - Moderate:   stop exploring an endpoint once it looks constant
// - Light:      fetch each base path only once
//
// Frontier/visited dedup happens in the store before a policy is asked, so a
// policy only has to reason about what it adds on top of that.
// =============================================================================

use crate::locator::Locator;
use crate::store::CrawlerStore;
use serde::Serialize;
use std::fmt;

/// How many results a base path needs before Moderate may call it constant.
pub const MODERATE_THRESHOLD: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    Aggressive,
    #[default]
    Moderate,
    Light,
}

impl Policy {
    pub fn admit(&self, candidate: &Locator, store: &CrawlerStore) -> bool {
        let seen = store.fetched().for_base(candidate.base());

        match self {
            Policy::Aggressive => !seen.iter().any(|result| result.locator == *candidate),
            Policy::Moderate => {
                if seen.len() <= MODERATE_THRESHOLD {
                    return true;
                }
                // Same length for every variant: the parameters don't matter
                let first = seen[0].content_length;
                !seen.iter().all(|result| result.content_length == first)
            }
            Policy::Light => seen.is_empty() && !store.is_base_claimed(candidate.base()),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Aggressive => f.write_str("aggressive"),
            Policy::Moderate => f.write_str("moderate"),
            Policy::Light => f.write_str("light"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FetchResult;
    use std::collections::BTreeMap;

    fn loc(raw: &str) -> Locator {
        Locator::parse(raw)
    }

    fn store_with(lengths: &[usize]) -> CrawlerStore {
        let mut store = CrawlerStore::new();
        for (i, len) in lengths.iter().enumerate() {
            let locator = loc(&format!("https://a.com/item?id={}", i));
            store.record_fetched(FetchResult::new(locator, 200, *len, BTreeMap::new(), Vec::new()));
        }
        store
    }

    #[test]
    fn test_aggressive_rejects_exact_but_admits_variants() {
        let store = store_with(&[100]);
        assert!(!Policy::Aggressive.admit(&loc("https://a.com/item?id=0"), &store));
        assert!(Policy::Aggressive.admit(&loc("https://a.com/item?id=7"), &store));
        assert!(Policy::Aggressive.admit(&loc("https://a.com/other"), &store));
    }

    #[test]
    fn test_moderate_stops_on_constant_endpoint() {
        let store = store_with(&[100, 100, 100, 100]);
        assert!(!Policy::Moderate.admit(&loc("https://a.com/item?id=5"), &store));
    }

    #[test]
    fn test_moderate_admits_when_lengths_vary() {
        let store = store_with(&[100, 50, 100, 100]);
        assert!(Policy::Moderate.admit(&loc("https://a.com/item?id=5"), &store));
    }

    #[test]
    fn test_moderate_admits_below_threshold() {
        let store = store_with(&[100, 100, 100]);
        assert!(Policy::Moderate.admit(&loc("https://a.com/item?id=5"), &store));
    }

    #[test]
    fn test_light_admits_one_per_base_path() {
        let store = store_with(&[100]);
        assert!(!Policy::Light.admit(&loc("https://a.com/item?id=9"), &store));
        assert!(Policy::Light.admit(&loc("https://a.com/fresh"), &store));
    }

    #[test]
    fn test_light_counts_queued_variants() {
        let mut store = CrawlerStore::new();
        assert!(store.add_to_fetch(loc("https://a.com/p?v=1"), Policy::Light));
        assert!(!store.add_to_fetch(loc("https://a.com/p?v=2"), Policy::Light));
        assert!(!store.add_to_fetch(loc("https://a.com/p#frag"), Policy::Light));
    }

    #[test]
    fn test_default_is_moderate() {
        assert_eq!(Policy::default(), Policy::Moderate);
    }
}
