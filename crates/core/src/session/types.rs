//! Session state types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::facets::Facet;
use crate::provider::{SearchQuery, SearchResult, SortField, SortOrder, DEFAULT_PAGE_SIZE};

/// Where the session currently is in the resolution cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No query active.
    Idle,
    /// Input received, waiting for the quiet period.
    Debouncing,
    /// Cache missed; a provider fetch is in flight.
    Fetching,
    /// A result is available.
    Ready,
    /// The last fetch failed.
    Errored,
}

/// The session state exposed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    /// The query text this snapshot belongs to.
    pub query_text: String,
    /// Current result, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<SearchResult>,
    /// Facets derived from the current result page.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facets: Vec<Facet>,
    /// Human-readable error when phase is `Errored`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Resolution sequence number that produced this snapshot.
    pub sequence: u64,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Idle,
            query_text: String::new(),
            result: None,
            facets: Vec::new(),
            error: None,
            sequence: 0,
        }
    }
}

/// The structured part of a query, kept across text changes.
///
/// Settled text plus the current filters form the `SearchQuery` that gets
/// resolved. Changing filters resets the page offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_from: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_to: Option<NaiveDate>,
    #[serde(default)]
    pub sort: SortField,
    #[serde(default)]
    pub order: SortOrder,
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
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

impl SearchFilters {
    /// Combine with settled text into a full query.
    pub fn into_query(self, text: String) -> SearchQuery {
        SearchQuery {
            text,
            genre: self.genre,
            author: self.author,
            min_rating: self.min_rating,
            max_rating: self.max_rating,
            published_from: self.published_from,
            published_to: self.published_to,
            sort: self.sort,
            order: self.order,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_snapshot_is_idle() {
        let snapshot = SessionSnapshot::default();
        assert_eq!(snapshot.phase, SessionPhase::Idle);
        assert_eq!(snapshot.sequence, 0);
        assert!(snapshot.result.is_none());
    }

    #[test]
    fn test_filters_into_query() {
        let filters = SearchFilters {
            genre: Some("Fiction".to_string()),
            page: 3,
            ..SearchFilters::default()
        };

        let query = filters.into_query("dune".to_string());
        assert_eq!(query.text, "dune");
        assert_eq!(query.genre.as_deref(), Some("Fiction"));
        assert_eq!(query.page, 3);
        assert_eq!(query.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_snapshot_serialization_skips_empty() {
        let snapshot = SessionSnapshot::default();
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(!json.contains("result"));
        assert!(!json.contains("facets"));
        assert!(!json.contains("error"));
        assert!(json.contains("\"phase\":\"idle\""));
    }
}
