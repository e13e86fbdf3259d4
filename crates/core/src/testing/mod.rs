//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the external collaborator
//! traits (search provider, persistent store, clock), allowing session
//! behavior to be tested without real infrastructure.
//!
//! # Example
//!
//! ```rust,ignore
//! use bibliofind_core::testing::{fixtures, ManualClock, MockProvider};
//!
//! let provider = MockProvider::new();
//! provider.set_items(vec![fixtures::book("Dune", "Frank Herbert", Some(4.3), 1965)]);
//!
//! let clock = ManualClock::default();
//! clock.advance(std::time::Duration::from_secs(3600));
//! ```

mod mock_provider;

pub use mock_provider::{MockProvider, RecordedSearch};

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};

use crate::clock::Clock;
use crate::store::{KeyValueStore, MemoryStore, StoreError};

/// A clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        }
    }
}

impl ManualClock {
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += chrono::Duration::from_std(by).expect("advance duration out of range");
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap() = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// A key-value store whose writes can be made to fail on demand.
///
/// Reads always work (backed by an in-memory store); successful writes are
/// counted so tests can assert that a degraded history stops persisting.
#[derive(Default)]
pub struct FailingStore {
    inner: MemoryStore,
    fail_writes: AtomicBool,
    write_count: AtomicUsize,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of writes that reached the backing store.
    pub fn write_count(&self) -> usize {
        self.write_count.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("simulated write failure".to_string()));
        }
        self.inner.set(key, value)?;
        self.write_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("simulated write failure".to_string()));
        }
        self.inner.remove(key)
    }
}

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::NaiveDate;

    use crate::provider::BookItem;

    /// Create a test book with reasonable defaults.
    pub fn book(title: &str, author: &str, rating: Option<f32>, year: i32) -> BookItem {
        BookItem {
            id: format!("/works/{}", title.to_lowercase().replace(' ', "-")),
            title: title.to_string(),
            author: author.to_string(),
            genres: vec!["Fiction".to_string()],
            rating,
            published: NaiveDate::from_ymd_opt(year, 1, 1),
        }
    }

    /// Create a test book with explicit genre tags.
    pub fn book_with_genres(
        title: &str,
        author: &str,
        genres: &[&str],
        rating: Option<f32>,
        year: i32,
    ) -> BookItem {
        BookItem {
            genres: genres.iter().map(|g| g.to_string()).collect(),
            ..book(title, author, rating, year)
        }
    }
}
