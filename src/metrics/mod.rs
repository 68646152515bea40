//! Metrics collection module
//!
//! Tracks provider attempts, failures, timeouts and latency. The router only
//! writes here; nothing it decides depends on these numbers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Latency samples kept per provider
const LATENCY_WINDOW: usize = 100;

/// Process-wide metrics collector
#[derive(Default)]
pub struct Metrics {
    /// Router calls
    total_searches: AtomicU64,
    /// Router calls that ended with the failure sentinel
    total_exhausted: AtomicU64,
    providers: Mutex<HashMap<String, ProviderCounters>>,
}

#[derive(Default)]
struct ProviderCounters {
    attempts: u64,
    successes: u64,
    failures: u64,
    timeouts: u64,
    abandoned: u64,
    latencies_ms: Vec<u64>,
    last_failure: Option<DateTime<Utc>>,
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    fn providers(&self) -> MutexGuard<'_, HashMap<String, ProviderCounters>> {
        // Counters stay usable even if a holder panicked
        self.providers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Increment router call count
    pub fn inc_search(&self) {
        self.total_searches.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a call that no provider could answer
    pub fn inc_exhausted(&self) {
        self.total_exhausted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the start of a provider attempt
    pub fn record_attempt(&self, provider: &str) {
        self.providers().entry(provider.to_string()).or_default().attempts += 1;
    }

    /// Record a successful attempt and its latency
    pub fn record_success(&self, provider: &str, time_ms: u64) {
        let mut providers = self.providers();
        let entry = providers.entry(provider.to_string()).or_default();
        entry.successes += 1;

        if entry.latencies_ms.len() >= LATENCY_WINDOW {
            entry.latencies_ms.remove(0);
        }
        entry.latencies_ms.push(time_ms);
    }

    /// Record a failed attempt
    pub fn record_failure(&self, provider: &str) {
        let mut providers = self.providers();
        let entry = providers.entry(provider.to_string()).or_default();
        entry.failures += 1;
        entry.last_failure = Some(Utc::now());
    }

    /// Record an attempt that ran out of budget. Its worker is abandoned.
    pub fn record_timeout(&self, provider: &str) {
        let mut providers = self.providers();
        let entry = providers.entry(provider.to_string()).or_default();
        entry.failures += 1;
        entry.timeouts += 1;
        entry.abandoned += 1;
        entry.last_failure = Some(Utc::now());
    }

    /// Get total router calls
    pub fn get_total_searches(&self) -> u64 {
        self.total_searches.load(Ordering::Relaxed)
    }

    /// Get total exhausted calls
    pub fn get_total_exhausted(&self) -> u64 {
        self.total_exhausted.load(Ordering::Relaxed)
    }

    /// Get a snapshot of one provider's statistics
    pub fn get_provider_stats(&self, provider: &str) -> Option<ProviderStats> {
        self.providers().get(provider).map(ProviderStats::from)
    }

    /// Get a snapshot of everything
    pub fn snapshot(&self) -> MetricsSnapshot {
        let providers = self
            .providers()
            .iter()
            .map(|(name, counters)| (name.clone(), ProviderStats::from(counters)))
            .collect();

        MetricsSnapshot {
            total_searches: self.get_total_searches(),
            total_exhausted: self.get_total_exhausted(),
            providers,
        }
    }
}

/// Statistics for a single provider
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProviderStats {
    pub attempts: u64,
    pub successes: u64,
    pub failures: u64,
    pub timeouts: u64,
    pub abandoned: u64,
    pub avg_response_time_ms: Option<u64>,
    /// Percentage of attempts that succeeded
    pub reliability: f64,
    pub last_failure: Option<DateTime<Utc>>,
}

impl From<&ProviderCounters> for ProviderStats {
    fn from(c: &ProviderCounters) -> Self {
        let avg_response_time_ms = if c.latencies_ms.is_empty() {
            None
        } else {
            Some(c.latencies_ms.iter().sum::<u64>() / c.latencies_ms.len() as u64)
        };

        let total = c.successes + c.failures;
        let reliability = if total == 0 {
            100.0
        } else {
            (c.successes as f64 / total as f64) * 100.0
        };

        Self {
            attempts: c.attempts,
            successes: c.successes,
            failures: c.failures,
            timeouts: c.timeouts,
            abandoned: c.abandoned,
            avg_response_time_ms,
            reliability,
            last_failure: c.last_failure,
        }
    }
}

/// Serializable view served by `/stats`
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub total_searches: u64,
    pub total_exhausted: u64,
    pub providers: HashMap<String, ProviderStats>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let metrics = Metrics::new();

        metrics.inc_search();
        metrics.record_attempt("duckduckgo");
        metrics.record_success("duckduckgo", 100);

        assert_eq!(metrics.get_total_searches(), 1);
        let stats = metrics.get_provider_stats("duckduckgo").unwrap();
        assert_eq!(stats.avg_response_time_ms, Some(100));
        assert_eq!(stats.reliability, 100.0);
        assert!(stats.last_failure.is_none());
    }

    #[test]
    fn test_timeouts_count_as_failures() {
        let metrics = Metrics::new();

        metrics.record_attempt("brave");
        metrics.record_timeout("brave");
        metrics.record_attempt("brave");
        metrics.record_success("brave", 40);

        let stats = metrics.get_provider_stats("brave").unwrap();
        assert_eq!(stats.attempts, 2);
        assert_eq!(stats.timeouts, 1);
        assert_eq!(stats.abandoned, 1);
        assert_eq!(stats.reliability, 50.0);
        assert!(stats.last_failure.is_some());
    }

    #[test]
    fn test_latency_window() {
        let metrics = Metrics::new();
        for _ in 0..LATENCY_WINDOW {
            metrics.record_success("wikipedia", 1000);
        }
        for _ in 0..LATENCY_WINDOW {
            metrics.record_success("wikipedia", 10);
        }

        let stats = metrics.get_provider_stats("wikipedia").unwrap();
        assert_eq!(stats.avg_response_time_ms, Some(10));
    }
}
