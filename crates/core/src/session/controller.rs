use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::analytics::{AnalyticsTracker, QueryCount};
use crate::cache::SearchCache;
use crate::clock::Clock;
use crate::config::SessionConfig;
use crate::debounce::QueryDebouncer;
use crate::facets::{compute_facets, FacetLimits};
use crate::history::{HistoryEntry, HistoryStore};
use crate::metrics::{PROVIDER_REQUEST_DURATION, SEARCHES_TOTAL, SUGGESTIONS_TOTAL};
use crate::provider::{BookSearchProvider, SearchQuery};
use crate::session::types::{SearchFilters, SessionPhase, SessionSnapshot};
use crate::store::KeyValueStore;
use crate::suggest::{blend_suggestions, Suggestion, SuggestionKind};

/// Orchestrates one search session: debounced input, cached resolution,
/// history and analytics recording, and sequenced state publication.
///
/// Every resolution gets a monotonically increasing sequence number when it
/// is dispatched. Only the resolution holding the latest sequence may publish
/// a snapshot; responses arriving for superseded sequences are dropped, so a
/// slow fetch can never overwrite the result of a newer query.
pub struct SearchSessionController {
    inner: Arc<SessionInner>,
    debouncer: QueryDebouncer,
    worker: tokio::task::JoinHandle<()>,
}

struct SessionInner {
    provider: Arc<dyn BookSearchProvider>,
    cache: Mutex<SearchCache>,
    history: Mutex<HistoryStore>,
    analytics: Mutex<AnalyticsTracker>,
    filters: Mutex<SearchFilters>,
    facet_limits: FacetLimits,
    suggestion_limit: usize,
    trending_window: Duration,
    next_seq: AtomicU64,
    publisher: Publisher,
}

/// Snapshot publication gated on the latest dispatched sequence.
struct Publisher {
    latest_seq: Mutex<u64>,
    tx: watch::Sender<SessionSnapshot>,
}

impl Publisher {
    /// Mark `seq` as the latest dispatched resolution.
    fn dispatch(&self, seq: u64) {
        let mut latest = self.latest_seq.lock().unwrap();
        *latest = seq;
    }

    fn is_current(&self, seq: u64) -> bool {
        *self.latest_seq.lock().unwrap() == seq
    }

    /// Publish `snapshot` if `seq` is still the latest dispatched sequence.
    /// Returns the snapshot now visible to subscribers either way.
    fn publish_if_current(&self, seq: u64, snapshot: SessionSnapshot) -> SessionSnapshot {
        let latest = self.latest_seq.lock().unwrap();
        if *latest == seq {
            self.tx.send_replace(snapshot.clone());
            snapshot
        } else {
            self.tx.borrow().clone()
        }
    }

    fn current(&self) -> SessionSnapshot {
        self.tx.borrow().clone()
    }
}

impl SearchSessionController {
    pub fn new(
        provider: Arc<dyn BookSearchProvider>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        config: &SessionConfig,
    ) -> Self {
        let (debouncer, mut settled_rx) =
            QueryDebouncer::new(Duration::from_millis(config.debounce_ms));
        let (tx, _) = watch::channel(SessionSnapshot::default());

        let inner = Arc::new(SessionInner {
            provider,
            cache: Mutex::new(SearchCache::new(
                config.cache.capacity,
                Duration::from_secs(config.cache.ttl_secs),
                clock.clone(),
            )),
            history: Mutex::new(HistoryStore::new(store, clock.clone(), config.history.capacity)),
            analytics: Mutex::new(AnalyticsTracker::new(clock)),
            filters: Mutex::new(SearchFilters::default()),
            facet_limits: config.facets.clone(),
            suggestion_limit: config.suggestion_limit,
            trending_window: Duration::from_secs(config.analytics.trending_window_hours * 3600),
            next_seq: AtomicU64::new(0),
            publisher: Publisher {
                latest_seq: Mutex::new(0),
                tx,
            },
        });

        let worker_inner = inner.clone();
        let worker = tokio::spawn(async move {
            while let Some(text) = settled_rx.recv().await {
                let resolve_inner = worker_inner.clone();
                tokio::spawn(async move {
                    resolve_inner.resolve(text).await;
                });
            }
        });

        Self {
            inner,
            debouncer,
            worker,
        }
    }

    /// Feed a keystroke-level input change into the debouncer.
    ///
    /// Publishes a `Debouncing` snapshot immediately; resolution happens only
    /// once the input settles.
    pub fn submit_input(&self, raw: &str) {
        let mut snapshot = self.inner.publisher.current();
        snapshot.phase = SessionPhase::Debouncing;
        snapshot.query_text = raw.trim().to_string();
        snapshot.error = None;
        self.inner.publisher.tx.send_replace(snapshot);
        self.debouncer.submit(raw);
    }

    /// Bypass the remaining quiet period for the pending input, if any.
    pub fn flush(&self) {
        self.debouncer.flush_now();
    }

    /// Replace the structured filters. Takes effect on the next resolution;
    /// callers re-execute the current text to apply them immediately.
    pub fn set_filters(&self, filters: SearchFilters) {
        let mut guard = self.inner.filters.lock().unwrap();
        *guard = filters;
    }

    pub fn filters(&self) -> SearchFilters {
        self.inner.filters.lock().unwrap().clone()
    }

    /// Resolve `text` right now, skipping the debouncer entirely.
    pub async fn execute(&self, text: &str) -> SessionSnapshot {
        self.inner.resolve(text.trim().to_string()).await
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.publisher.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.publisher.tx.subscribe()
    }

    /// Blended suggestions for a prefix: own history first, then trending,
    /// then all-time popular, deduplicated case-insensitively.
    pub fn suggestions(&self, prefix: &str, limit: Option<usize>) -> Vec<Suggestion> {
        let limit = limit.unwrap_or(self.inner.suggestion_limit);
        let history = self.inner.history.lock().unwrap().suggestions(prefix, limit);
        let (trending, popular) = {
            let analytics = self.inner.analytics.lock().unwrap();
            let trending = analytics
                .trending(self.inner.trending_window, limit)
                .into_iter()
                .filter(|c| matches_prefix(&c.text, prefix))
                .map(|c| Suggestion::new(c.text, SuggestionKind::Trending, None))
                .collect();
            let popular = analytics
                .popular(limit)
                .into_iter()
                .filter(|c| matches_prefix(&c.text, prefix))
                .map(|c| Suggestion::new(c.text, SuggestionKind::Popular, None))
                .collect();
            (trending, popular)
        };

        let blended = blend_suggestions(history, trending, popular, limit);
        for suggestion in &blended {
            let source = match suggestion.kind {
                SuggestionKind::History => "history",
                SuggestionKind::Trending => "trending",
                SuggestionKind::Popular => "popular",
            };
            SUGGESTIONS_TOTAL.with_label_values(&[source]).inc();
        }
        blended
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.inner.history.lock().unwrap().all().to_vec()
    }

    pub fn remove_history(&self, text: &str) -> bool {
        self.inner.history.lock().unwrap().remove(text)
    }

    pub fn clear_history(&self) {
        self.inner.history.lock().unwrap().clear();
    }

    pub fn history_degraded(&self) -> bool {
        self.inner.history.lock().unwrap().is_degraded()
    }

    pub fn popular(&self, limit: usize) -> Vec<QueryCount> {
        self.inner.analytics.lock().unwrap().popular(limit)
    }

    pub fn trending(&self, window: Option<Duration>, limit: usize) -> Vec<QueryCount> {
        let window = window.unwrap_or(self.inner.trending_window);
        self.inner.analytics.lock().unwrap().trending(window, limit)
    }

    pub fn cache_signatures(&self) -> Vec<String> {
        self.inner.cache.lock().unwrap().signatures()
    }

    pub fn clear_cache(&self) {
        self.inner.cache.lock().unwrap().clear();
    }
}

impl Drop for SearchSessionController {
    fn drop(&mut self) {
        self.debouncer.cancel();
        self.worker.abort();
    }
}

impl SessionInner {
    async fn resolve(&self, text: String) -> SessionSnapshot {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.publisher.dispatch(seq);

        if text.is_empty() {
            return self.publisher.publish_if_current(
                seq,
                SessionSnapshot {
                    sequence: seq,
                    ..SessionSnapshot::default()
                },
            );
        }

        let query = self.filters.lock().unwrap().clone().into_query(text.clone());

        let cached = self.cache.lock().unwrap().get(&query);
        if let Some(result) = cached {
            debug!(text = %text, "cache hit");
            SEARCHES_TOTAL.with_label_values(&["cache_hit"]).inc();
            let facets = compute_facets(&result.items, &self.facet_limits);
            return self.publisher.publish_if_current(
                seq,
                SessionSnapshot {
                    phase: SessionPhase::Ready,
                    query_text: text,
                    result: Some(result),
                    facets,
                    error: None,
                    sequence: seq,
                },
            );
        }

        // Keep the previous result visible while the fetch is in flight.
        let mut fetching = self.publisher.current();
        fetching.phase = SessionPhase::Fetching;
        fetching.query_text = text.clone();
        fetching.error = None;
        fetching.sequence = seq;
        self.publisher.publish_if_current(seq, fetching);

        let timer = PROVIDER_REQUEST_DURATION.start_timer();
        let outcome = self.provider.search(&query).await;
        timer.observe_duration();

        match outcome {
            Ok(result) => {
                // Side effects only for the resolution still current; a stale
                // response must not touch the cache, history or analytics.
                if !self.publisher.is_current(seq) {
                    debug!(text = %text, seq, "dropping superseded result");
                    SEARCHES_TOTAL.with_label_values(&["stale_dropped"]).inc();
                    return self.publisher.current();
                }

                self.cache.lock().unwrap().put(&query, result.clone());
                self.history.lock().unwrap().record(&text, result.total_matches);
                self.analytics.lock().unwrap().record(&query, result.total_matches);
                SEARCHES_TOTAL.with_label_values(&["fetched"]).inc();

                let facets = compute_facets(&result.items, &self.facet_limits);
                self.publisher.publish_if_current(
                    seq,
                    SessionSnapshot {
                        phase: SessionPhase::Ready,
                        query_text: text,
                        result: Some(result),
                        facets,
                        error: None,
                        sequence: seq,
                    },
                )
            }
            Err(err) => {
                if !self.publisher.is_current(seq) {
                    debug!(text = %text, seq, "dropping superseded error");
                    SEARCHES_TOTAL.with_label_values(&["stale_dropped"]).inc();
                    return self.publisher.current();
                }

                warn!(text = %text, error = %err, "search failed");
                SEARCHES_TOTAL.with_label_values(&["error"]).inc();
                self.publisher.publish_if_current(
                    seq,
                    SessionSnapshot {
                        phase: SessionPhase::Errored,
                        query_text: text,
                        result: None,
                        facets: Vec::new(),
                        error: Some(err.to_string()),
                        sequence: seq,
                    },
                )
            }
        }
    }
}

fn matches_prefix(text: &str, prefix: &str) -> bool {
    let prefix = prefix.trim();
    prefix.is_empty() || text.to_lowercase().contains(&prefix.to_lowercase())
}
