//! Search history with ranked autocomplete suggestions.
//!
//! History is dedup-on-write: repeating a query refreshes the existing
//! entry instead of duplicating it. Every mutation is written through to
//! the persistent client store; a failed write is logged and the store
//! degrades to in-memory-only for the rest of the session.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::clock::Clock;
use crate::store::KeyValueStore;
use crate::suggest::{Suggestion, SuggestionKind};

/// Namespaced key the serialized history list lives under.
pub const HISTORY_STORAGE_KEY: &str = "bibliofind.search_history";

/// Default maximum retained entries.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Default suggestion list length.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 10;

/// One executed query. At most one entry per distinct normalized text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub text: String,
    pub recorded_at: DateTime<Utc>,
    pub result_count: u64,
}

/// Bounded, recency-ordered query history persisted across reloads.
pub struct HistoryStore {
    capacity: usize,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    /// Most-recent-first.
    entries: Vec<HistoryEntry>,
    /// Set after a failed write; no further persistence is attempted.
    degraded: bool,
}

impl HistoryStore {
    /// Create a store, reloading any previously persisted history.
    ///
    /// A missing or corrupt payload starts the session with empty history.
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, capacity: usize) -> Self {
        let entries = match store.get(HISTORY_STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(error = %e, "Discarding corrupt persisted search history");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read persisted search history");
                Vec::new()
            }
        };

        Self {
            capacity: capacity.max(1),
            store,
            clock,
            entries,
            degraded: false,
        }
    }

    /// Upsert an executed query.
    ///
    /// An entry with the same normalized text is refreshed (timestamp and
    /// count) and moved to most-recent; otherwise a new entry is added.
    /// Overflow drops the least-recently-recorded entry.
    pub fn record(&mut self, text: &str, result_count: u64) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        let normalized = trimmed.to_lowercase();

        if let Some(pos) = self
            .entries
            .iter()
            .position(|e| e.text.to_lowercase() == normalized)
        {
            self.entries.remove(pos);
        }

        self.entries.insert(
            0,
            HistoryEntry {
                text: trimmed.to_string(),
                recorded_at: self.clock.now(),
                result_count,
            },
        );
        self.entries.truncate(self.capacity);
        self.persist();
    }

    /// Case-insensitive substring suggestions, most recent first.
    pub fn suggestions(&self, prefix: &str, limit: usize) -> Vec<Suggestion> {
        let needle = prefix.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|e| e.text.to_lowercase().contains(&needle))
            .take(limit)
            .map(|e| Suggestion::new(e.text.clone(), SuggestionKind::History, Some(e.result_count)))
            .collect()
    }

    /// All entries, most recent first.
    pub fn all(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Remove the entry matching the normalized text, if present.
    pub fn remove(&mut self, text: &str) -> bool {
        let normalized = text.trim().to_lowercase();
        let before = self.entries.len();
        self.entries.retain(|e| e.text.to_lowercase() != normalized);
        let removed = self.entries.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    /// Drop all history.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    /// Whether persistence has been disabled after a write failure.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Write-through after an in-memory update. A crash between the update
    /// and this write loses at most the latest record; not retried.
    fn persist(&mut self) {
        if self.degraded {
            return;
        }
        let payload = match serde_json::to_string(&self.entries) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "Failed to serialize search history");
                return;
            }
        };
        if let Err(e) = self.store.set(HISTORY_STORAGE_KEY, &payload) {
            warn!(error = %e, "Failed to persist search history, continuing in-memory only");
            self.degraded = true;
        }
    }
}
