//! Sequential provider fallback with per-attempt time budgets

use super::models::{AttemptError, AttemptOutcome, AttemptRecord, SearchReport};
use crate::metrics::Metrics;
use crate::providers::{ProviderChain, ProviderDescriptor};
use crate::results::{ProviderError, SearchOutput};
use crate::FAILURE_SENTINEL;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, info_span, warn, Instrument};

/// Walks the provider chain in order and returns the first answer.
///
/// Every attempt runs on its own spawned task so the budget holds even when
/// the provider never yields. On timeout the task is aborted; async work
/// stops at its next await point, blocking work keeps its thread until it
/// returns and the result is thrown away.
pub struct FallbackRouter {
    chain: Arc<ProviderChain>,
    metrics: Option<Arc<Metrics>>,
}

impl FallbackRouter {
    /// Create a router over a fixed chain
    pub fn new(chain: Arc<ProviderChain>) -> Self {
        Self {
            chain,
            metrics: None,
        }
    }

    /// Report attempts to a metrics collector
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn chain(&self) -> &ProviderChain {
        &self.chain
    }

    /// Resolve a query to the first provider answer, or the failure sentinel
    pub async fn search(&self, query: &str) -> SearchOutput {
        self.search_with_report(query).await.result
    }

    /// Same as [`FallbackRouter::search`], keeping the per-attempt record
    pub async fn search_with_report(&self, query: &str) -> SearchReport {
        let span = info_span!("search", call_id = %uuid::Uuid::new_v4(), query = %query);
        self.run(query).instrument(span).await
    }

    async fn run(&self, query: &str) -> SearchReport {
        if let Some(ref metrics) = self.metrics {
            metrics.inc_search();
        }

        let mut attempts = Vec::with_capacity(self.chain.len());

        for descriptor in self.chain.iter() {
            let name = descriptor.name().to_string();
            let start = Instant::now();
            self.observe(|m| m.record_attempt(&name));
            debug!(provider = %name, budget = ?descriptor.budget, "Trying provider");

            let result = Self::attempt(descriptor, query).await;
            let elapsed = start.elapsed();
            let elapsed_ms = elapsed.as_millis() as u64;

            match result {
                Ok(output) => {
                    info!(provider = %name, elapsed_ms, "Provider answered");
                    self.observe(|m| m.record_success(&name, elapsed_ms));
                    attempts.push(AttemptRecord {
                        provider: name.clone(),
                        outcome: AttemptOutcome::Success,
                        elapsed_ms,
                    });
                    return SearchReport {
                        query: query.to_string(),
                        provider: Some(name),
                        result: output,
                        attempts,
                    };
                }
                Err(err) => {
                    match err {
                        AttemptError::Timeout(_) => {
                            warn!(provider = %name, elapsed_ms, "Provider timed out, worker abandoned");
                            self.observe(|m| m.record_timeout(&name));
                        }
                        AttemptError::Provider(ref e) => {
                            warn!(provider = %name, elapsed_ms, kind = e.kind(), error = %e, "Provider failed");
                            self.observe(|m| m.record_failure(&name));
                        }
                    }
                    attempts.push(AttemptRecord {
                        provider: name,
                        outcome: AttemptOutcome::from(&err),
                        elapsed_ms,
                    });
                }
            }
        }

        warn!(tried = attempts.len(), "All providers failed");
        self.observe(|m| m.inc_exhausted());

        SearchReport {
            query: query.to_string(),
            provider: None,
            result: SearchOutput::Text(FAILURE_SENTINEL.to_string()),
            attempts,
        }
    }

    /// One budgeted attempt on a single-use worker
    async fn attempt(
        descriptor: &ProviderDescriptor,
        query: &str,
    ) -> Result<SearchOutput, AttemptError> {
        let provider = Arc::clone(&descriptor.provider);
        let query = query.to_string();
        let mut worker = tokio::spawn(async move { provider.search(&query).await });

        match timeout(descriptor.budget, &mut worker).await {
            Ok(Ok(result)) => result.map_err(AttemptError::from),
            Ok(Err(join_err)) if join_err.is_panic() => Err(ProviderError::Panicked.into()),
            Ok(Err(join_err)) => Err(ProviderError::Other(join_err.to_string()).into()),
            Err(_) => {
                worker.abort();
                Err(AttemptError::Timeout(descriptor.budget))
            }
        }
    }

    fn observe(&self, f: impl FnOnce(&Metrics)) {
        if let Some(ref metrics) = self.metrics {
            f(metrics);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{BlockingProvider, SearchProvider};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const BUDGET: Duration = Duration::from_millis(100);

    enum Behavior {
        Answer(SearchOutput),
        Fail,
        Sleep(Duration),
        Panic,
    }

    struct Stub {
        name: String,
        behavior: Behavior,
        calls: AtomicUsize,
    }

    impl Stub {
        fn new(name: &str, behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                behavior,
                calls: AtomicUsize::new(0),
            })
        }

        fn answering(name: &str, text: &str) -> Arc<Self> {
            Self::new(name, Behavior::Answer(SearchOutput::from(text)))
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SearchProvider for Stub {
        fn name(&self) -> &str {
            &self.name
        }

        async fn search(&self, _query: &str) -> Result<SearchOutput, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                Behavior::Answer(output) => Ok(output.clone()),
                Behavior::Fail => Err(ProviderError::Http(500)),
                Behavior::Sleep(d) => {
                    tokio::time::sleep(*d).await;
                    Ok(SearchOutput::from("too late"))
                }
                Behavior::Panic => panic!("stub provider panicked"),
            }
        }
    }

    fn router(providers: &[Arc<Stub>]) -> FallbackRouter {
        let chain = providers.iter().fold(ProviderChain::new(), |chain, p| {
            chain.with(p.clone() as Arc<dyn SearchProvider>, BUDGET)
        });
        FallbackRouter::new(Arc::new(chain))
    }

    #[tokio::test]
    async fn test_first_provider_wins() {
        let first = Stub::answering("first", "one");
        let second = Stub::answering("second", "two");
        let third = Stub::answering("third", "three");
        let router = router(&[first.clone(), second.clone(), third.clone()]);

        let result = router.search("rust").await;

        assert_eq!(result, SearchOutput::from("one"));
        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 0);
        assert_eq!(third.calls(), 0);
    }

    #[tokio::test]
    async fn test_falls_back_after_error() {
        let failing = Stub::new("failing", Behavior::Fail);
        let backup = Stub::new(
            "backup",
            Behavior::Answer(SearchOutput::List(vec!["a".into(), "b".into()])),
        );
        let router = router(&[failing.clone(), backup.clone()]);

        let report = router.search_with_report("rust").await;

        assert_eq!(report.provider.as_deref(), Some("backup"));
        assert_eq!(report.result, SearchOutput::List(vec!["a".into(), "b".into()]));
        assert_eq!(report.attempts.len(), 2);
        assert_eq!(
            report.attempts[0].outcome,
            AttemptOutcome::Failed {
                kind: "http".to_string(),
                error: "HTTP error: 500".to_string(),
            }
        );
        assert_eq!(report.attempts[1].outcome, AttemptOutcome::Success);
        assert_eq!(failing.calls(), 1);
    }

    #[tokio::test]
    async fn test_slow_provider_is_abandoned() {
        let slow = Stub::new("slow", Behavior::Sleep(Duration::from_secs(10)));
        let fast = Stub::answering("fast", "quick answer");
        let router = router(&[slow.clone(), fast.clone()]);

        let start = Instant::now();
        let report = router.search_with_report("rust").await;
        let elapsed = start.elapsed();

        assert_eq!(report.result, SearchOutput::from("quick answer"));
        assert_eq!(
            report.attempts[0].outcome,
            AttemptOutcome::TimedOut { budget_ms: 100 }
        );
        assert!(elapsed < Duration::from_secs(1), "took {:?}", elapsed);
    }

    #[tokio::test]
    async fn test_blocking_provider_timeout_does_not_block_router() {
        let blocking: Arc<dyn SearchProvider> = Arc::new(BlockingProvider::new("sync", |_| {
            std::thread::sleep(Duration::from_millis(600));
            Ok(SearchOutput::from("too late"))
        }));
        let chain = ProviderChain::new().with(blocking, BUDGET);
        let router = FallbackRouter::new(Arc::new(chain));

        let start = Instant::now();
        let result = router.search("rust").await;

        assert_eq!(result, SearchOutput::from(FAILURE_SENTINEL));
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_all_fail_returns_sentinel() {
        let router = router(&[
            Stub::new("a", Behavior::Fail),
            Stub::new("b", Behavior::Sleep(Duration::from_secs(5))),
            Stub::new("c", Behavior::Panic),
        ]);

        let report = router.search_with_report("rust").await;

        assert!(report.is_exhausted());
        assert_eq!(report.result, SearchOutput::Text(FAILURE_SENTINEL.to_string()));
        assert_eq!(report.attempts.len(), 3);
        assert!(matches!(
            report.attempts[2].outcome,
            AttemptOutcome::Failed { ref kind, .. } if kind == "panicked"
        ));
    }

    #[tokio::test]
    async fn test_repeated_calls_give_same_result() {
        let flaky_first = Stub::new("down", Behavior::Fail);
        let stable = Stub::answering("stable", "same");
        let router = router(&[flaky_first.clone(), stable.clone()]);

        let first = router.search("rust").await;
        let second = router.search("rust").await;

        assert_eq!(first, second);
        // No memory of earlier failures: every call starts from the top
        assert_eq!(flaky_first.calls(), 2);
        assert_eq!(stable.calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_chain_returns_sentinel() {
        let router = FallbackRouter::new(Arc::new(ProviderChain::new()));

        let start = Instant::now();
        let report = router.search_with_report("anything").await;

        assert_eq!(report.result, SearchOutput::from(FAILURE_SENTINEL));
        assert!(report.attempts.is_empty());
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_blank_query_is_passed_through() {
        let echo: Arc<dyn SearchProvider> =
            Arc::new(BlockingProvider::new("echo", |q| Ok(SearchOutput::from(format!("[{}]", q)))));
        let router = FallbackRouter::new(Arc::new(ProviderChain::new().with(echo, BUDGET)));

        assert_eq!(router.search("   ").await, SearchOutput::from("[   ]"));
    }

    #[tokio::test]
    async fn test_metrics_are_recorded() {
        let metrics = Arc::new(Metrics::new());
        let router = router(&[
            Stub::new("slow", Behavior::Sleep(Duration::from_secs(5))),
            Stub::new("broken", Behavior::Fail),
            Stub::answering("ok", "fine"),
        ])
        .with_metrics(metrics.clone());

        router.search("rust").await;

        assert_eq!(metrics.get_total_searches(), 1);
        assert_eq!(metrics.get_total_exhausted(), 0);
        assert_eq!(metrics.get_provider_stats("slow").unwrap().timeouts, 1);
        assert_eq!(metrics.get_provider_stats("broken").unwrap().failures, 1);
        assert_eq!(metrics.get_provider_stats("ok").unwrap().successes, 1);
    }
}
