// src/crawl/worker.rs
// =============================================================================
// One fetch task: everything that happens to a single locator.
//
// Steps, in order:
// 1. pre-fetch hooks (may veto)
// 2. transport fetch, bounded by a timeout
// 3. post-fetch hooks on the raw result (may veto)
// 4. page scope check; an out-of-scope page is handed back without links
// 5. link extraction
// 6. keep only discovered links whose URL is in scope
//
// A task only READS shared state (scope, hooks, a snapshot of the fetched
// results). Its output goes back to the scheduler through its JoinHandle.
// =============================================================================

use crate::error::{FetchError, TransportError};
use crate::extract::extract_links;
use crate::hooks::{HookPoint, Hooks};
use crate::locator::Locator;
use crate::scope::Scope;
use crate::store::{FetchResult, FetchedResults};
use crate::transport::Transport;
use std::sync::Arc;
use std::time::Duration;

/// Shared, read-only inputs for every fetch task of a crawl.
#[derive(Clone)]
pub(crate) struct TaskContext {
    pub scope: Arc<Scope>,
    pub hooks: Arc<Hooks>,
    pub transport: Arc<dyn Transport>,
    pub fetch_timeout: Duration,
}

pub(crate) async fn fetch_task(
    locator: Locator,
    ctx: TaskContext,
    fetched: Arc<FetchedResults>,
) -> Result<FetchResult, FetchError> {
    let pending = FetchResult::pending(locator.clone());
    if !ctx.hooks.run(HookPoint::PreFetch, &pending, &fetched) {
        return Err(FetchError::HookVeto(HookPoint::PreFetch));
    }

    let url = locator.request_url();
    tracing::debug!(url = %url, "Fetching");

    let response = tokio::time::timeout(ctx.fetch_timeout, ctx.transport.fetch(&url))
        .await
        .map_err(|_| TransportError::Timeout(ctx.fetch_timeout))??;

    let result = FetchResult::new(
        locator,
        response.status,
        response.body.len(),
        response.headers,
        Vec::new(),
    );

    if !ctx.hooks.run(HookPoint::PostFetch, &result, &fetched) {
        return Err(FetchError::HookVeto(HookPoint::PostFetch));
    }

    if !ctx.scope.page_in_scope(&result) {
        return Err(FetchError::OutOfScope(Box::new(result)));
    }

    let discovered: Vec<Locator> = extract_links(&response.body, &result.locator)
        .into_iter()
        .filter(|link| ctx.scope.url_in_scope(link))
        .collect();

    Ok(result.with_discovered(discovered))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::ScopeRule;
    use crate::transport::TransportResponse;
    use async_trait::async_trait;

    // Serves the same response for every URL
    struct Fixed(TransportResponse);

    #[async_trait]
    impl Transport for Fixed {
        async fn fetch(&self, _url: &str) -> Result<TransportResponse, TransportError> {
            Ok(self.0.clone())
        }
    }

    fn ctx(scope: Scope, hooks: Hooks, body: &str) -> TaskContext {
        TaskContext {
            scope: Arc::new(scope),
            hooks: Arc::new(hooks),
            transport: Arc::new(Fixed(
                TransportResponse::new(200, body).with_header("Content-Type", "text/html"),
            )),
            fetch_timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn test_discovered_links_are_filtered_by_url_scope() {
        let scope = Scope::for_urls(ScopeRule::new("urls", [r"^https://example\.com"], [r"/logout"]).unwrap());
        let body = r#"<a href="/in">in</a> <a href="/logout">out</a> https://elsewhere.org/"#;

        let result = fetch_task(
            Locator::parse("https://example.com/"),
            ctx(scope, Hooks::new(), body),
            Arc::new(FetchedResults::default()),
        )
        .await
        .unwrap();

        assert_eq!(result.status_code, 200);
        assert_eq!(result.content_length, body.len());
        assert_eq!(result.content_type(), "text/html");
        assert_eq!(result.discovered, vec![Locator::parse("https://example.com/in")]);
    }

    #[tokio::test]
    async fn test_veto_reports_which_hook() {
        let mut hooks = Hooks::new();
        hooks.register(HookPoint::PostFetch, |_, _| false);

        let err = fetch_task(
            Locator::parse("https://example.com/"),
            ctx(Scope::default(), hooks, "body"),
            Arc::new(FetchedResults::default()),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, FetchError::HookVeto(HookPoint::PostFetch)));
    }

    #[tokio::test]
    async fn test_pre_fetch_hook_sees_pending_result() {
        let mut hooks = Hooks::new();
        hooks.register(HookPoint::PreFetch, |pending, fetched| {
            pending.status_code == 0 && pending.discovered.is_empty() && fetched.is_empty()
        });

        let result = fetch_task(
            Locator::parse("https://example.com/"),
            ctx(Scope::default(), hooks, "body"),
            Arc::new(FetchedResults::default()),
        )
        .await;

        assert!(result.is_ok());
    }
}
