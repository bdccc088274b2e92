// src/crawl/mod.rs
// =============================================================================
// This module runs the crawl itself.
//
// Submodules:
// - scheduler: the control loop (dispatch, collect, admit, repeat)
// - worker: what a single fetch task does
//
// Features:
// - Bounded concurrency (max_workers tasks at once)
// - Scope filtering of discovered links
// - Pluggable admission policy (aggressive / moderate / light)
// - Pre/post-fetch hooks that can veto a fetch
// - Per-fetch timeout; one failed fetch never stops the crawl
// =============================================================================

mod scheduler;
mod worker;

pub use scheduler::Crawler;
