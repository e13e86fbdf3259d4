//! Prometheus metrics for the search session subsystem.
//!
//! Covers search resolution outcomes, cache churn, provider latency, and
//! suggestion sources. The server assembles these into its registry and
//! renders them at `/metrics`.

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry};

/// Search resolutions by outcome.
pub static SEARCHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("bibliofind_searches_total", "Total search resolutions"),
        &["outcome"], // "cache_hit", "fetched", "error", "stale_dropped"
    )
    .unwrap()
});

/// Provider request duration in seconds.
pub static PROVIDER_REQUEST_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "bibliofind_provider_request_duration_seconds",
            "Duration of book search provider requests",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
    )
    .unwrap()
});

/// Cache entries evicted for capacity.
pub static CACHE_EVICTIONS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "bibliofind_cache_evictions_total",
        "Cache entries evicted by the LRU capacity bound",
    )
    .unwrap()
});

/// Cache entries dropped as expired.
pub static CACHE_EXPIRED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "bibliofind_cache_expired_total",
        "Cache entries dropped after exceeding the TTL",
    )
    .unwrap()
});

/// Suggestions served by source.
pub static SUGGESTIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("bibliofind_suggestions_total", "Suggestions served"),
        &["source"], // "history", "popular", "trending"
    )
    .unwrap()
});

/// Register all core metrics with a registry.
pub fn register_core_metrics(registry: &Registry) {
    let _ = registry.register(Box::new(SEARCHES_TOTAL.clone()));
    let _ = registry.register(Box::new(PROVIDER_REQUEST_DURATION.clone()));
    let _ = registry.register(Box::new(CACHE_EVICTIONS.clone()));
    let _ = registry.register(Box::new(CACHE_EXPIRED.clone()));
    let _ = registry.register(Box::new(SUGGESTIONS_TOTAL.clone()));
}
