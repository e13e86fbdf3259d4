//! Open Library search backend implementation.
//!
//! The remote API only matches free text; the structured filters and sort
//! of `SearchQuery` are applied to the fetched page before it is returned.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::OpenLibraryConfig;

use super::{BookItem, BookSearchProvider, SearchError, SearchQuery, SearchResult, SortField, SortOrder};

use async_trait::async_trait;
use chrono::NaiveDate;

/// Maximum genre tags carried per item; Open Library subjects can run into
/// the hundreds and only the leading ones are meaningful for facets.
const MAX_GENRE_TAGS: usize = 8;

/// Open Library search backend.
pub struct OpenLibraryProvider {
    client: Client,
    config: OpenLibraryConfig,
}

impl OpenLibraryProvider {
    /// Create a new provider with the given configuration.
    pub fn new(config: OpenLibraryConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| SearchError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Build the search API URL for a query.
    fn build_search_url(&self, query: &SearchQuery) -> String {
        format!(
            "{}/search.json?q={}&page={}&limit={}&fields=key,title,author_name,subject,first_publish_year,ratings_average",
            self.config.url.trim_end_matches('/'),
            urlencoding::encode(query.text.trim()),
            query.page + 1, // Open Library pages are 1-based
            query.page_size,
        )
    }
}

#[async_trait]
impl BookSearchProvider for OpenLibraryProvider {
    fn name(&self) -> &str {
        "open_library"
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchResult, SearchError> {
        let url = self.build_search_url(query);
        debug!(query = %query.text, page = query.page, "Searching Open Library");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                SearchError::Timeout
            } else if e.is_connect() {
                SearchError::ConnectionFailed(e.to_string())
            } else {
                SearchError::Api(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Api(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let payload: OpenLibraryResponse = response
            .json()
            .await
            .map_err(|e| SearchError::MalformedResponse(e.to_string()))?;

        let total_found = payload.num_found;
        let mut items: Vec<BookItem> = payload
            .docs
            .into_iter()
            .filter_map(doc_to_item)
            .collect();

        let filtered = apply_filters(&mut items, query);
        sort_items(&mut items, query.sort, query.order);

        debug!(
            items = items.len(),
            total = total_found,
            "Open Library search complete"
        );

        // The remote total only holds when no structured filter narrowed
        // the page locally.
        let total_matches = if filtered { items.len() as u64 } else { total_found };

        Ok(SearchResult {
            query: query.clone(),
            items,
            total_matches,
        })
    }
}

/// Map a raw doc into a `BookItem`. Docs without a title are dropped.
fn doc_to_item(doc: OpenLibraryDoc) -> Option<BookItem> {
    let title = doc.title?;
    let author = doc
        .author_name
        .as_ref()
        .and_then(|names| names.first().cloned())
        .unwrap_or_else(|| "Unknown".to_string());

    let genres = doc
        .subject
        .unwrap_or_default()
        .into_iter()
        .take(MAX_GENRE_TAGS)
        .collect();

    Some(BookItem {
        id: doc.key,
        title,
        author,
        genres,
        rating: doc.ratings_average,
        published: doc.first_publish_year.and_then(year_to_date),
    })
}

/// First day of the publication year, or `None` for out-of-range years.
fn year_to_date(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
}

/// Apply the query's structured filters in place.
///
/// Returns `true` if any filter was active. Items missing a rating or date
/// fail the corresponding range filter.
fn apply_filters(items: &mut Vec<BookItem>, query: &SearchQuery) -> bool {
    let mut filtered = false;

    if let Some(genre) = &query.genre {
        let wanted = genre.trim().to_lowercase();
        items.retain(|i| i.genres.iter().any(|g| g.to_lowercase() == wanted));
        filtered = true;
    }

    if let Some(author) = &query.author {
        let needle = author.trim().to_lowercase();
        items.retain(|i| i.author.to_lowercase().contains(&needle));
        filtered = true;
    }

    if let Some(min) = query.min_rating {
        items.retain(|i| i.rating.map(|r| r >= min).unwrap_or(false));
        filtered = true;
    }

    if let Some(max) = query.max_rating {
        items.retain(|i| i.rating.map(|r| r <= max).unwrap_or(false));
        filtered = true;
    }

    if let Some(from) = query.published_from {
        items.retain(|i| i.published.map(|d| d >= from).unwrap_or(false));
        filtered = true;
    }

    if let Some(to) = query.published_to {
        items.retain(|i| i.published.map(|d| d <= to).unwrap_or(false));
        filtered = true;
    }

    filtered
}

/// Sort the page. Relevance keeps provider order regardless of direction.
fn sort_items(items: &mut [BookItem], sort: SortField, order: SortOrder) {
    match sort {
        SortField::Relevance => return,
        SortField::Title => items.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase())),
        SortField::Rating => items.sort_by(|a, b| {
            a.rating
                .unwrap_or(0.0)
                .partial_cmp(&b.rating.unwrap_or(0.0))
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
        SortField::PublicationDate => items.sort_by(|a, b| a.published.cmp(&b.published)),
    }

    if order == SortOrder::Desc {
        items.reverse();
    }
}

// Open Library API response types
#[derive(Debug, Deserialize)]
struct OpenLibraryResponse {
    #[serde(rename = "numFound", default)]
    num_found: u64,
    #[serde(default)]
    docs: Vec<OpenLibraryDoc>,
}

#[derive(Debug, Deserialize)]
struct OpenLibraryDoc {
    key: String,
    title: Option<String>,
    author_name: Option<Vec<String>>,
    subject: Option<Vec<String>>,
    first_publish_year: Option<i32>,
    ratings_average: Option<f32>,
}
