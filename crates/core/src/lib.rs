pub mod analytics;
pub mod cache;
pub mod clock;
pub mod config;
pub mod debounce;
pub mod facets;
pub mod history;
pub mod metrics;
pub mod provider;
pub mod session;
pub mod store;
pub mod suggest;
pub mod testing;

pub use analytics::{AnalyticsEvent, AnalyticsTracker, QueryCount, DEFAULT_TRENDING_WINDOW};
pub use cache::{canonical_signature, SearchCache, DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL};
pub use clock::{Clock, SystemClock};
pub use config::{
    load_config, load_config_from_str, validate_config, AnalyticsConfig, CacheConfig, Config,
    ConfigError, DatabaseConfig, HistoryConfig, OpenLibraryConfig, ProviderBackend,
    SanitizedConfig, ServerConfig, SessionConfig,
};
pub use debounce::{QueryDebouncer, DEFAULT_DEBOUNCE_DELAY};
pub use facets::{compute_facets, Facet, FacetDimension, FacetLimits, FacetValue};
pub use history::{HistoryEntry, HistoryStore, DEFAULT_HISTORY_CAPACITY, DEFAULT_SUGGESTION_LIMIT};
pub use metrics::register_core_metrics;
pub use provider::{
    BookItem, BookSearchProvider, OpenLibraryProvider, SearchError, SearchQuery, SearchResult,
    SortField, SortOrder,
};
pub use session::{SearchFilters, SearchSessionController, SessionPhase, SessionSnapshot};
pub use store::{KeyValueStore, MemoryStore, SqliteKeyValueStore, StoreError};
pub use suggest::{blend_suggestions, Suggestion, SuggestionKind};
