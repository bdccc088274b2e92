// src/hooks.rs
// =============================================================================
// Extension points invoked by every fetch task.
//
// There are exactly two points:
// - PreFetch: runs before the transport is called. The result passed in only
//   has its locator filled in.
// - PostFetch: runs on the raw result, before links are extracted.
//
// Each point holds an ordered list of predicates. They run in registration
// order and the first one returning false vetoes the task.
// =============================================================================

use crate::store::{FetchResult, FetchedResults};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPoint {
    PreFetch,
    PostFetch,
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookPoint::PreFetch => f.write_str("pre-fetch"),
            HookPoint::PostFetch => f.write_str("post-fetch"),
        }
    }
}

/// A hook sees the result so far and a read-only view of what has been fetched.
pub type Hook = Arc<dyn Fn(&FetchResult, &FetchedResults) -> bool + Send + Sync>;

#[derive(Clone, Default)]
pub struct Hooks {
    pre_fetch: Vec<Hook>,
    post_fetch: Vec<Hook>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, point: HookPoint, hook: F)
    where
        F: Fn(&FetchResult, &FetchedResults) -> bool + Send + Sync + 'static,
    {
        self.slot_mut(point).push(Arc::new(hook));
    }

    /// Runs every hook registered for `point`; false means "vetoed".
    pub fn run(&self, point: HookPoint, result: &FetchResult, fetched: &FetchedResults) -> bool {
        // all() stops at the first false
        self.slot(point).iter().all(|hook| hook(result, fetched))
    }

    pub fn len(&self, point: HookPoint) -> usize {
        self.slot(point).len()
    }

    fn slot(&self, point: HookPoint) -> &Vec<Hook> {
        match point {
            HookPoint::PreFetch => &self.pre_fetch,
            HookPoint::PostFetch => &self.post_fetch,
        }
    }

    fn slot_mut(&mut self, point: HookPoint) -> &mut Vec<Hook> {
        match point {
            HookPoint::PreFetch => &mut self.pre_fetch,
            HookPoint::PostFetch => &mut self.post_fetch,
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("pre_fetch", &self.pre_fetch.len())
            .field("post_fetch", &self.post_fetch.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::Locator;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn pending() -> FetchResult {
        FetchResult::pending(Locator::parse("https://example.com/"))
    }

    #[test]
    fn test_no_hooks_means_continue() {
        let hooks = Hooks::new();
        assert!(hooks.run(HookPoint::PreFetch, &pending(), &FetchedResults::default()));
    }

    #[test]
    fn test_first_veto_short_circuits() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut hooks = Hooks::new();

        let c = calls.clone();
        hooks.register(HookPoint::PostFetch, move |_, _| {
            c.fetch_add(1, Ordering::SeqCst);
            false
        });
        let c = calls.clone();
        hooks.register(HookPoint::PostFetch, move |_, _| {
            c.fetch_add(1, Ordering::SeqCst);
            true
        });

        assert!(!hooks.run(HookPoint::PostFetch, &pending(), &FetchedResults::default()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_points_are_independent() {
        let mut hooks = Hooks::new();
        hooks.register(HookPoint::PreFetch, |_, _| false);

        assert_eq!(hooks.len(HookPoint::PreFetch), 1);
        assert_eq!(hooks.len(HookPoint::PostFetch), 0);
        assert!(hooks.run(HookPoint::PostFetch, &pending(), &FetchedResults::default()));
    }
}
