// src/store.rs
// =============================================================================
// The frontier (locators waiting to be fetched) and the fetched results.
//
// Invariants this module enforces:
// - the frontier never holds two locators with the same canonical form
// - a locator that was already popped (fetched or in flight) never re-enters
//   the frontier
// - pop_to_fetch never returns the same locator twice
//
// Only the scheduler's control loop mutates the store. Fetch tasks get a
// read-only snapshot of the fetched results (an Arc) instead. Mutation is
// copy-on-write, so a snapshot held by a running task is never changed
// underneath it.
//
// Rust concepts:
// - VecDeque + HashSet: an ordered queue with an O(1) membership index
// - Arc::make_mut: clone-on-write for shared data
// =============================================================================

use crate::locator::Locator;
use crate::policy::Policy;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Arc;

/// Everything we learned from fetching one locator.
#[derive(Debug, Clone, Serialize)]
pub struct FetchResult {
    pub locator: Locator,
    pub status_code: u16,
    /// Byte length of the received body
    pub content_length: usize,
    /// Header names are lower-cased; a header may repeat
    pub headers: BTreeMap<String, Vec<String>>,
    pub discovered: Vec<Locator>,
}

impl FetchResult {
    pub fn new(
        locator: Locator,
        status_code: u16,
        content_length: usize,
        headers: BTreeMap<String, Vec<String>>,
        discovered: Vec<Locator>,
    ) -> Self {
        Self {
            locator,
            status_code,
            content_length,
            headers,
            discovered,
        }
    }

    /// A result for a locator that has not been fetched yet (status 0).
    /// This is what pre-fetch hooks see.
    pub fn pending(locator: Locator) -> Self {
        Self::new(locator, 0, 0, BTreeMap::new(), Vec::new())
    }

    pub fn with_discovered(mut self, discovered: Vec<Locator>) -> Self {
        self.discovered = discovered;
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// The media type without parameters: "text/html; charset=utf-8" -> "text/html".
    /// Empty when the server sent no Content-Type.
    pub fn content_type(&self) -> &str {
        self.header("content-type")
            .and_then(|value| value.split(';').next())
            .map(str::trim)
            .unwrap_or("")
    }
}

/// Fetched results grouped by base path.
///
/// Grouping by base path lets admission policies ask "how many variants of
/// this endpoint have we already seen, and did they differ?"
#[derive(Debug, Clone, Default)]
pub struct FetchedResults {
    by_base: HashMap<String, Vec<Arc<FetchResult>>>,
    total: usize,
}

impl FetchedResults {
    pub fn for_base(&self, base: &str) -> &[Arc<FetchResult>] {
        self.by_base.get(base).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Exact (canonical) match against results for the same base path.
    pub fn contains(&self, locator: &Locator) -> bool {
        self.for_base(locator.base())
            .iter()
            .any(|result| result.locator == *locator)
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &FetchResult> {
        self.by_base.values().flatten().map(|result| &**result)
    }

    fn insert(&mut self, result: FetchResult) -> bool {
        if self.contains(&result.locator) {
            return false;
        }
        self.by_base
            .entry(result.locator.base().to_string())
            .or_default()
            .push(Arc::new(result));
        self.total += 1;
        true
    }
}

// Crawl state, owned by the scheduler's control loop
#[derive(Debug, Default)]
pub struct CrawlerStore {
    /// Locators waiting to be fetched, oldest first
    frontier: VecDeque<Locator>,
    /// Canonical forms currently in `frontier`
    queued: HashSet<String>,
    /// Canonical forms ever popped; covers in-flight and failed fetches too
    visited: HashSet<String>,
    /// Base paths that ever entered the frontier
    claimed_bases: HashSet<String>,
    /// Shared with running tasks; cloned on write if a task still holds it
    fetched: Arc<FetchedResults>,
}

impl CrawlerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a seed to the frontier without consulting any policy.
    pub fn seed(&mut self, locator: Locator) -> bool {
        if !self.can_enqueue(&locator) {
            return false;
        }
        self.enqueue(locator);
        true
    }

    /// Adds a discovered locator if it is new and the policy admits it.
    pub fn add_to_fetch(&mut self, locator: Locator, policy: Policy) -> bool {
        if !self.can_enqueue(&locator) || !policy.admit(&locator, self) {
            return false;
        }
        self.enqueue(locator);
        true
    }

    /// Applies `add_to_fetch` to each locator in order and returns the ones
    /// that were actually admitted.
    pub fn add_many_to_fetch<I>(&mut self, locators: I, policy: Policy) -> Vec<Locator>
    where
        I: IntoIterator<Item = Locator>,
    {
        locators
            .into_iter()
            .filter(|locator| self.add_to_fetch(locator.clone(), policy))
            .collect()
    }

    /// Removes the oldest pending locator and marks it as visited.
    pub fn pop_to_fetch(&mut self) -> Option<Locator> {
        let locator = self.frontier.pop_front()?;
        let key = locator.to_string();
        self.queued.remove(&key);
        self.visited.insert(key);
        Some(locator)
    }

    /// Records a result. Idempotent: the same exact locator is stored once.
    pub fn record_fetched(&mut self, result: FetchResult) -> bool {
        self.visited.insert(result.locator.to_string());
        Arc::make_mut(&mut self.fetched).insert(result)
    }

    pub fn fetched(&self) -> &FetchedResults {
        &self.fetched
    }

    /// A cheap read-only handle on the fetched results for worker tasks.
    pub fn snapshot(&self) -> Arc<FetchedResults> {
        Arc::clone(&self.fetched)
    }

    pub fn fetched_count(&self) -> usize {
        self.fetched.len()
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn is_frontier_empty(&self) -> bool {
        self.frontier.is_empty()
    }

    pub fn is_base_claimed(&self, base: &str) -> bool {
        self.claimed_bases.contains(base)
    }

    fn can_enqueue(&self, locator: &Locator) -> bool {
        if locator.is_empty() {
            return false;
        }
        let key = locator.to_string();
        !self.queued.contains(&key) && !self.visited.contains(&key) && !self.fetched.contains(locator)
    }

    fn enqueue(&mut self, locator: Locator) {
        self.queued.insert(locator.to_string());
        self.claimed_bases.insert(locator.base().to_string());
        self.frontier.push_back(locator);
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why a visited set when fetched results already exist?
//    - A result is only recorded once its task finishes
//    - Between pop and record the locator is in flight, and a page fetched
//      in the same round may link back to it
//    - Failed and vetoed fetches are never recorded at all, yet must not be
//      retried forever
//
// 2. Why track claimed base paths?
//    - The light policy asks "has this endpoint been seen?"
//    - Fetched results alone answer that too late: two variants found on one
//      page would both be queued before either comes back
//
// 3. Why Arc::make_mut for the fetched results?
//    - Each task gets the Arc as it was when the task was spawned
//    - A record made while some task still holds its snapshot clones the
//      map once; once no task holds it, records write in place
// -----------------------------------------------------------------------------
