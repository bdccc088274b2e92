// src/crawl/scheduler.rs
// =============================================================================
// The crawl loop.
//
// How it works:
// 1. Seed the frontier (no admission policy for seeds)
// 2. Dispatch: pop locators and spawn fetch tasks until max_workers are busy
//    or the frontier is empty
// 3. Collect: wait for every task of this round, in completion order
//    - failures (transport, hook veto, panic) are logged and skipped
//    - out-of-scope pages are recorded but their links are dropped
//    - otherwise record the result, run the admission policy on each
//      discovered link and call on_locator_found for each admitted one
// 4. Repeat until the frontier is empty and nothing is in flight
//
// The store is owned by this loop alone. Tasks get Arc snapshots and return
// their results through their JoinHandle, so the store needs no locking.
//
// Rust concepts:
// - tokio::spawn: tasks run in parallel on the multi-threaded runtime
// - FuturesUnordered: yields JoinHandles as they finish, not in spawn order
// =============================================================================

use super::worker::{fetch_task, TaskContext};
use crate::config::CrawlOptions;
use crate::error::{CrawlError, FetchError};
use crate::hooks::{HookPoint, Hooks};
use crate::locator::Locator;
use crate::scope::Scope;
use crate::store::{CrawlerStore, FetchResult, FetchedResults};
use crate::transport::Transport;
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tokio::task::JoinError;

type LocatorCallback = Box<dyn FnMut(&Locator) + Send>;

// Owns the crawl configuration; each call to `crawl` starts from a fresh store
pub struct Crawler {
    /// Shared with every fetch task; `None` aborts the crawl up front
    scope: Option<Arc<Scope>>,
    /// Worker limit, admission policy and per-fetch timeout
    options: CrawlOptions,
    /// Where pages come from (reqwest in the CLI, fakes in tests)
    transport: Arc<dyn Transport>,
    /// Copied into an Arc once per crawl so tasks can share them
    hooks: Hooks,
    /// Runs on the control loop, never inside a fetch task
    on_locator_found: Option<LocatorCallback>,
}

impl Crawler {
    /// Creates a crawler. A `None` scope is accepted here but makes `crawl`
    /// fail with `CrawlError::MissingScope` before anything is fetched.
    pub fn new(scope: Option<Scope>, options: CrawlOptions, transport: Arc<dyn Transport>) -> Self {
        Self {
            scope: scope.map(Arc::new),
            options,
            transport,
            hooks: Hooks::new(),
            on_locator_found: None,
        }
    }

    /// Registers a hook; returning false from it vetoes that fetch.
    pub fn with_hook<F>(mut self, point: HookPoint, hook: F) -> Self
    where
        F: Fn(&FetchResult, &FetchedResults) -> bool + Send + Sync + 'static,
    {
        self.hooks.register(point, hook);
        self
    }

    /// Called once per newly admitted locator, on the control loop.
    pub fn on_locator_found<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&Locator) + Send + 'static,
    {
        self.on_locator_found = Some(Box::new(callback));
        self
    }

    /// Crawls from `seeds` until nothing is left, then returns the store.
    pub async fn crawl<I>(&mut self, seeds: I) -> Result<CrawlerStore, CrawlError>
    where
        I: IntoIterator<Item = Locator>,
    {
        let scope = self.scope.clone().ok_or(CrawlError::MissingScope)?;

        let ctx = TaskContext {
            scope,
            hooks: Arc::new(self.hooks.clone()),
            transport: Arc::clone(&self.transport),
            fetch_timeout: self.options.fetch_timeout,
        };
        let max_workers = self.options.max_workers.get();
        let policy = self.options.policy;

        let mut store = CrawlerStore::new();
        for seed in seeds {
            store.seed(seed);
        }

        tracing::info!(
            seeds = store.frontier_len(),
            max_workers,
            policy = %policy,
            "Starting crawl"
        );

        let mut in_flight = FuturesUnordered::new();

        while !store.is_frontier_empty() || !in_flight.is_empty() {
            // Dispatch phase
            while in_flight.len() < max_workers {
                let Some(locator) = store.pop_to_fetch() else {
                    break;
                };
                let handle = tokio::spawn(fetch_task(locator, ctx.clone(), store.snapshot()));
                in_flight.push(handle);
            }

            // Collection phase: drain this round, fastest first
            while let Some(joined) = in_flight.next().await {
                self.collect(&mut store, joined);
            }
        }

        tracing::info!(
            fetched = store.fetched_count(),
            "Crawl finished"
        );

        Ok(store)
    }

    fn collect(
        &mut self,
        store: &mut CrawlerStore,
        joined: Result<Result<FetchResult, FetchError>, JoinError>,
    ) {
        let result = match joined {
            Ok(Ok(result)) => result,
            Ok(Err(FetchError::OutOfScope(result))) => {
                tracing::debug!(url = %result.locator, "Out of scope, links not followed");
                store.record_fetched(*result);
                return;
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Fetch skipped");
                return;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Fetch task did not complete");
                return;
            }
        };

        if result.locator.is_empty() {
            return;
        }

        tracing::debug!(
            url = %result.locator,
            status = result.status_code,
            content_length = result.content_length,
            discovered = result.discovered.len(),
            "Fetched"
        );

        let discovered = result.discovered.clone();
        store.record_fetched(result);

        let admitted = store.add_many_to_fetch(discovered, self.options.policy);
        if let Some(callback) = self.on_locator_found.as_mut() {
            for locator in &admitted {
                callback(locator);
            }
        }
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why drain a whole round before dispatching again?
//    - Every task in a round sees the same snapshot of fetched results
//    - Admission for the next round then runs against everything this round
//      learned, which keeps the policies deterministic per round
//
// 2. Why completion order inside a round?
//    - A slow page should not hold back recording the fast ones
//    - Discovered links are still admitted one result at a time, in the
//      order each page listed them
//
// 3. Why does the callback run here and not in the task?
//    - Only the control loop knows whether a link was admitted
//    - It also means the callback needs no Sync bound and sees links one at a
//      time
// -----------------------------------------------------------------------------
