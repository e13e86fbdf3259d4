//! Memoization of provider responses.
//!
//! Responses are keyed by the canonical signature of the query that produced
//! them, bounded by an LRU capacity and a TTL. Expired entries are treated
//! as misses and removed lazily on access.

mod signature;

pub use signature::canonical_signature;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::clock::Clock;
use crate::metrics;
use crate::provider::{SearchQuery, SearchResult};

/// Default maximum number of live entries.
pub const DEFAULT_CACHE_CAPACITY: usize = 50;

/// Default time-to-live for an entry.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

struct CacheEntry {
    result: SearchResult,
    inserted_at: DateTime<Utc>,
    /// Monotonic touch counter for LRU ordering.
    last_touch: u64,
}

/// LRU + TTL cache of search results.
///
/// `get` has no side effect beyond promoting the entry in LRU order and
/// removing it if expired. No two live entries share a signature.
pub struct SearchCache {
    capacity: usize,
    ttl: chrono::Duration,
    clock: Arc<dyn Clock>,
    entries: HashMap<String, CacheEntry>,
    tick: u64,
}

impl SearchCache {
    pub fn new(capacity: usize, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            capacity: capacity.max(1),
            ttl: chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::seconds(300)),
            clock,
            entries: HashMap::new(),
            tick: 0,
        }
    }

    /// Look up a cached result for an equivalent query.
    ///
    /// An entry older than the TTL is removed and reported as a miss.
    pub fn get(&mut self, query: &SearchQuery) -> Option<SearchResult> {
        let sig = canonical_signature(query);
        let now = self.clock.now();

        let expired = match self.entries.get(&sig) {
            Some(entry) => now - entry.inserted_at >= self.ttl,
            None => return None,
        };

        if expired {
            self.entries.remove(&sig);
            metrics::CACHE_EXPIRED.inc();
            debug!(signature = %sig, "Cache entry expired");
            return None;
        }

        self.tick += 1;
        let entry = self.entries.get_mut(&sig).expect("entry checked above");
        entry.last_touch = self.tick;
        Some(entry.result.clone())
    }

    /// Insert or replace the entry for the query's signature.
    ///
    /// Inserting beyond capacity evicts the least-recently-used entry.
    pub fn put(&mut self, query: &SearchQuery, result: SearchResult) {
        let sig = canonical_signature(query);
        self.tick += 1;
        self.entries.insert(
            sig,
            CacheEntry {
                result,
                inserted_at: self.clock.now(),
                last_touch: self.tick,
            },
        );

        while self.entries.len() > self.capacity {
            let lru = self
                .entries
                .iter()
                .min_by_key(|(_, e)| e.last_touch)
                .map(|(sig, _)| sig.clone());
            if let Some(sig) = lru {
                self.entries.remove(&sig);
                metrics::CACHE_EVICTIONS.inc();
                debug!(signature = %sig, "Evicted least-recently-used cache entry");
            }
        }
    }

    /// Signatures of all live (non-expired) entries, sorted.
    pub fn signatures(&mut self) -> Vec<String> {
        let now = self.clock.now();
        let ttl = self.ttl;
        self.entries.retain(|_, e| now - e.inserted_at < ttl);

        let mut sigs: Vec<_> = self.entries.keys().cloned().collect();
        sigs.sort();
        sigs
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
