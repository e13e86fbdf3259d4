//! Types for the book search system.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default page size for provider requests.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Query parameters for a book search.
///
/// Two queries are equivalent when their canonical signatures match (see
/// `cache::canonical_signature`), regardless of field order or
/// default-valued filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text search query.
    pub text: String,
    /// Optional: restrict to a genre tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    /// Optional: author name substring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Optional: minimum rating (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f32>,
    /// Optional: maximum rating (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rating: Option<f32>,
    /// Optional: earliest publication date (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_from: Option<NaiveDate>,
    /// Optional: latest publication date (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_to: Option<NaiveDate>,
    /// Sort field (default: relevance, i.e. provider order).
    #[serde(default)]
    pub sort: SortField,
    /// Sort direction (default: descending).
    #[serde(default)]
    pub order: SortOrder,
    /// Zero-based page offset.
    #[serde(default)]
    pub page: u32,
    /// Results per page (default: 20).
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            text: String::new(),
            genre: None,
            author: None,
            min_rating: None,
            max_rating: None,
            published_from: None,
            published_to: None,
            sort: SortField::default(),
            order: SortOrder::default(),
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SearchQuery {
    /// Create a text-only query with default filters.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Query text normalized for dedup/signature purposes.
    pub fn normalized_text(&self) -> String {
        self.text.trim().to_lowercase()
    }
}

/// Field to sort results by.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Relevance,
    Title,
    Rating,
    PublicationDate,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// A single book in a search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookItem {
    /// Provider-scoped identifier.
    pub id: String,
    /// Book title.
    pub title: String,
    /// Primary author.
    pub author: String,
    /// Genre tags; an item may carry several.
    #[serde(default)]
    pub genres: Vec<String>,
    /// Average rating on a 0-5 scale, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    /// Publication date, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<NaiveDate>,
}

/// A page of search results. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The query that produced this page.
    pub query: SearchQuery,
    /// Ordered items for the requested page.
    pub items: Vec<BookItem>,
    /// Total matches across all pages, as reported by the provider.
    pub total_matches: u64,
}

/// Errors that can occur when talking to the search provider.
///
/// All failure modes (network, non-2xx, malformed payload) surface uniformly
/// here; the session controller maps any of them to an errored session state.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search provider connection failed: {0}")]
    ConnectionFailed(String),

    #[error("search provider request timed out")]
    Timeout,

    #[error("search provider API error: {0}")]
    Api(String),

    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

/// Trait for book search backends.
///
/// Implementations are stateless per call; latency is unspecified and the
/// caller is responsible for caching and for discarding stale responses.
#[async_trait]
pub trait BookSearchProvider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Execute a search and return one page of results.
    async fn search(&self, query: &SearchQuery) -> Result<SearchResult, SearchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query_minimal_deserialization() {
        let json = r#"{"text": "dune"}"#;
        let parsed: SearchQuery = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.text, "dune");
        assert!(parsed.genre.is_none());
        assert_eq!(parsed.sort, SortField::Relevance);
        assert_eq!(parsed.order, SortOrder::Desc);
        assert_eq!(parsed.page, 0);
        assert_eq!(parsed.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_search_query_roundtrip() {
        let query = SearchQuery {
            text: "the great gatsby".to_string(),
            genre: Some("Fiction".to_string()),
            min_rating: Some(3.5),
            page: 2,
            ..SearchQuery::default()
        };

        let json = serde_json::to_string(&query).unwrap();
        let parsed: SearchQuery = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, query);
        // Absent filters are skipped on the wire
        assert!(!json.contains("author"));
        assert!(!json.contains("max_rating"));
    }

    #[test]
    fn test_sort_field_serialization() {
        assert_eq!(
            serde_json::to_string(&SortField::PublicationDate).unwrap(),
            "\"publication_date\""
        );
        assert_eq!(serde_json::to_string(&SortOrder::Asc).unwrap(), "\"asc\"");
    }

    #[test]
    fn test_normalized_text() {
        let query = SearchQuery::from_text("  The Great GATSBY ");
        assert_eq!(query.normalized_text(), "the great gatsby");
    }

    #[test]
    fn test_book_item_optional_fields_skipped() {
        let item = BookItem {
            id: "b1".to_string(),
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            genres: vec!["Sci-Fi".to_string()],
            rating: None,
            published: None,
        };

        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("rating"));
        assert!(!json.contains("published"));
    }
}
