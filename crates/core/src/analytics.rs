//! Query analytics: all-time popularity and recent-window trending.
//!
//! Events are append-only and aggregated on read, so re-aggregation is
//! always consistent and replayable. The clock is injected so window
//! boundaries are testable without wall-clock sleeps.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::provider::SearchQuery;

/// Default trending window.
pub const DEFAULT_TRENDING_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

/// One recorded query execution. Never mutated after append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    /// Normalized query text.
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub result_count: u64,
    /// The full filter set the query ran with.
    pub query: SearchQuery,
}

/// Aggregated ranking row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryCount {
    pub text: String,
    pub count: u64,
    pub last_seen: DateTime<Utc>,
}

/// Append-only event log with popularity aggregations.
pub struct AnalyticsTracker {
    clock: Arc<dyn Clock>,
    events: Vec<AnalyticsEvent>,
}

impl AnalyticsTracker {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            events: Vec::new(),
        }
    }

    /// Append an event for an executed query. Blank text is ignored.
    pub fn record(&mut self, query: &SearchQuery, result_count: u64) {
        let text = query.normalized_text();
        if text.is_empty() {
            return;
        }
        self.events.push(AnalyticsEvent {
            text,
            timestamp: self.clock.now(),
            result_count,
            query: query.clone(),
        });
    }

    /// All-time ranking: count descending, ties broken by most recent
    /// event descending.
    pub fn popular(&self, limit: usize) -> Vec<QueryCount> {
        self.rank(self.events.iter(), limit)
    }

    /// Ranking over the trailing window only. A query with high all-time
    /// volume but no recent activity does not appear.
    pub fn trending(&self, window: Duration, limit: usize) -> Vec<QueryCount> {
        let window = chrono::Duration::from_std(window)
            .unwrap_or_else(|_| chrono::Duration::hours(24));
        let cutoff = self.clock.now() - window;
        self.rank(
            self.events.iter().filter(|e| e.timestamp >= cutoff),
            limit,
        )
    }

    /// The raw event log, oldest first.
    pub fn events(&self) -> &[AnalyticsEvent] {
        &self.events
    }

    fn rank<'a>(
        &self,
        events: impl Iterator<Item = &'a AnalyticsEvent>,
        limit: usize,
    ) -> Vec<QueryCount> {
        let mut counts: HashMap<&str, (u64, DateTime<Utc>)> = HashMap::new();
        for event in events {
            let entry = counts
                .entry(event.text.as_str())
                .or_insert((0, event.timestamp));
            entry.0 += 1;
            entry.1 = entry.1.max(event.timestamp);
        }

        let mut ranked: Vec<QueryCount> = counts
            .into_iter()
            .map(|(text, (count, last_seen))| QueryCount {
                text: text.to_string(),
                count,
                last_seen,
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then(b.last_seen.cmp(&a.last_seen))
                .then(a.text.cmp(&b.text))
        });
        ranked.truncate(limit);
        ranked
    }
}
