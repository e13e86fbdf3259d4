//! Mock search provider for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{oneshot, Mutex, RwLock};

use crate::provider::{BookItem, BookSearchProvider, SearchError, SearchQuery, SearchResult};

/// A recorded search for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedSearch {
    /// The query that was searched.
    pub query: SearchQuery,
    /// When the search was made.
    pub timestamp: std::time::Instant,
}

/// A query handler that produces items dynamically based on the query text.
type QueryHandler = Box<dyn Fn(&str) -> Option<Vec<BookItem>> + Send + Sync>;

/// Mock implementation of the `BookSearchProvider` trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable items, statically or per query
/// - Track searched queries for assertions
/// - Queue failures
/// - Hold in-flight searches and release them in any order, so
///   out-of-order response races are reproducible
///
/// # Example
///
/// ```rust,ignore
/// use bibliofind_core::testing::{fixtures, MockProvider};
///
/// let provider = MockProvider::new();
/// provider.set_items(vec![fixtures::book("Dune", "Frank Herbert", Some(4.3), 1965)]).await;
///
/// let result = provider.search(&SearchQuery::from_text("dune")).await?;
/// assert_eq!(result.items.len(), 1);
///
/// let searches = provider.recorded_searches().await;
/// assert_eq!(searches[0].query.text, "dune");
/// ```
pub struct MockProvider {
    /// Items to return when no query handler matches.
    items: Arc<RwLock<Vec<BookItem>>>,
    /// Recorded search queries.
    searches: Arc<RwLock<Vec<RecordedSearch>>>,
    /// Queued errors, consumed one per search.
    queued_errors: Arc<Mutex<VecDeque<SearchError>>>,
    /// Dynamic item generation by query text.
    query_handler: Arc<RwLock<Option<QueryHandler>>>,
    /// When holding, in-flight searches park here until released.
    held: Arc<Mutex<Vec<oneshot::Sender<()>>>>,
    holding: Arc<RwLock<bool>>,
}

impl std::fmt::Debug for MockProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockProvider").finish_non_exhaustive()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    /// Create a new mock provider with no items.
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(Vec::new())),
            searches: Arc::new(RwLock::new(Vec::new())),
            queued_errors: Arc::new(Mutex::new(VecDeque::new())),
            query_handler: Arc::new(RwLock::new(None)),
            held: Arc::new(Mutex::new(Vec::new())),
            holding: Arc::new(RwLock::new(false)),
        }
    }

    /// Configure the items returned by subsequent searches.
    pub async fn set_items(&self, items: Vec<BookItem>) {
        *self.items.write().await = items;
    }

    /// Configure dynamic items keyed on the query text. A handler returning
    /// `None` falls back to the static items.
    pub async fn set_query_handler<F>(&self, handler: F)
    where
        F: Fn(&str) -> Option<Vec<BookItem>> + Send + Sync + 'static,
    {
        *self.query_handler.write().await = Some(Box::new(handler));
    }

    /// Queue an error; each queued error fails exactly one search.
    pub async fn queue_error(&self, error: SearchError) {
        self.queued_errors.lock().await.push_back(error);
    }

    /// Park subsequent searches until explicitly released.
    pub async fn hold(&self) {
        *self.holding.write().await = true;
    }

    /// Number of searches currently parked.
    pub async fn pending_searches(&self) -> usize {
        self.held.lock().await.len()
    }

    /// Release the oldest parked search.
    pub async fn release_first(&self) {
        let mut held = self.held.lock().await;
        if !held.is_empty() {
            let _ = held.remove(0).send(());
        }
    }

    /// Release the newest parked search.
    pub async fn release_last(&self) {
        if let Some(tx) = self.held.lock().await.pop() {
            let _ = tx.send(());
        }
    }

    /// Release every parked search and stop holding new ones.
    pub async fn release_all(&self) {
        *self.holding.write().await = false;
        for tx in self.held.lock().await.drain(..) {
            let _ = tx.send(());
        }
    }

    /// All queries searched so far.
    pub async fn recorded_searches(&self) -> Vec<RecordedSearch> {
        self.searches.read().await.clone()
    }

    /// Number of searches executed (including failed ones).
    pub async fn search_count(&self) -> usize {
        self.searches.read().await.len()
    }
}

#[async_trait]
impl BookSearchProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchResult, SearchError> {
        self.searches.write().await.push(RecordedSearch {
            query: query.clone(),
            timestamp: std::time::Instant::now(),
        });

        if *self.holding.read().await {
            let (tx, rx) = oneshot::channel();
            self.held.lock().await.push(tx);
            let _ = rx.await;
        }

        if let Some(error) = self.queued_errors.lock().await.pop_front() {
            return Err(error);
        }

        let items = {
            let handler = self.query_handler.read().await;
            match handler.as_ref().and_then(|h| h(&query.text)) {
                Some(items) => items,
                None => self.items.read().await.clone(),
            }
        };

        Ok(SearchResult {
            query: query.clone(),
            total_matches: items.len() as u64,
            items,
        })
    }
}
