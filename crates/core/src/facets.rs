//! Facet aggregation over a result page.
//!
//! Facets reflect the sampled result window (the current page, tens of
//! items), not the full matching corpus - full-corpus aggregation would
//! need provider-side support. Pure functions, no I/O, cheap enough to run
//! inline on page-sized inputs.

use std::collections::HashMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::provider::BookItem;

/// A facet dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetDimension {
    Genre,
    Author,
    Rating,
    PublicationYear,
}

/// One (value, count) pair within a facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetValue {
    pub value: String,
    pub count: u64,
}

/// A count-by-value breakdown of a result set along one dimension.
///
/// Values are sorted by count descending, ties broken by natural order of
/// the value (lexical for strings, numeric for buckets and years), and
/// truncated to a bounded top-N per dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facet {
    pub dimension: FacetDimension,
    pub values: Vec<FacetValue>,
}

/// Per-dimension truncation bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacetLimits {
    /// Top genres retained (default 20).
    #[serde(default = "default_genre_top")]
    pub genre_top: usize,
    /// Top authors retained (default 20).
    #[serde(default = "default_author_top")]
    pub author_top: usize,
    /// Most recent distinct publication years retained (default 10).
    #[serde(default = "default_year_top")]
    pub year_top: usize,
}

fn default_genre_top() -> usize {
    20
}

fn default_author_top() -> usize {
    20
}

fn default_year_top() -> usize {
    10
}

impl Default for FacetLimits {
    fn default() -> Self {
        Self {
            genre_top: default_genre_top(),
            author_top: default_author_top(),
            year_top: default_year_top(),
        }
    }
}

/// Compute all facets for a page of items.
///
/// Always returns the four dimensions in a fixed order; a dimension with no
/// data carries an empty value list.
pub fn compute_facets(items: &[BookItem], limits: &FacetLimits) -> Vec<Facet> {
    vec![
        Facet {
            dimension: FacetDimension::Genre,
            values: genre_facet(items, limits.genre_top),
        },
        Facet {
            dimension: FacetDimension::Author,
            values: author_facet(items, limits.author_top),
        },
        Facet {
            dimension: FacetDimension::Rating,
            values: rating_facet(items),
        },
        Facet {
            dimension: FacetDimension::PublicationYear,
            values: year_facet(items, limits.year_top),
        },
    ]
}

/// Genre counts. Multi-valued: an item contributes to every tag it carries.
fn genre_facet(items: &[BookItem], top: usize) -> Vec<FacetValue> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for item in items {
        for genre in &item.genres {
            *counts.entry(genre.as_str()).or_default() += 1;
        }
    }
    ranked_strings(counts, top)
}

fn author_facet(items: &[BookItem], top: usize) -> Vec<FacetValue> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for item in items {
        *counts.entry(item.author.as_str()).or_default() += 1;
    }
    ranked_strings(counts, top)
}

/// Unit-width rating buckets `floor(r)..floor(r)+1`, clamped to 0-5 so a
/// perfect 5.0 lands in the 4-5 bucket. Items without a rating are skipped.
/// Buckets are never truncated (there are at most five).
fn rating_facet(items: &[BookItem]) -> Vec<FacetValue> {
    let mut counts: HashMap<u8, u64> = HashMap::new();
    for item in items {
        if let Some(rating) = item.rating {
            let bucket = (rating.clamp(0.0, 5.0).floor() as u8).min(4);
            *counts.entry(bucket).or_default() += 1;
        }
    }

    let mut buckets: Vec<(u8, u64)> = counts.into_iter().collect();
    // Count desc, tie-break lower bucket first
    buckets.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    buckets
        .into_iter()
        .map(|(bucket, count)| FacetValue {
            value: format!("{}-{}", bucket, bucket + 1),
            count,
        })
        .collect()
}

/// Publication year counts, restricted to the `top` most recent distinct
/// years present in the page. Recency governs membership; counts govern
/// order, ties broken by year ascending like every other dimension.
fn year_facet(items: &[BookItem], top: usize) -> Vec<FacetValue> {
    let mut counts: HashMap<i32, u64> = HashMap::new();
    for item in items {
        if let Some(date) = item.published {
            *counts.entry(date.year()).or_default() += 1;
        }
    }

    let mut years: Vec<i32> = counts.keys().copied().collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.truncate(top);

    let mut values: Vec<(i32, u64)> = years.into_iter().map(|y| (y, counts[&y])).collect();
    values.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    values
        .into_iter()
        .map(|(year, count)| FacetValue {
            value: year.to_string(),
            count,
        })
        .collect()
}

fn ranked_strings(counts: HashMap<&str, u64>, top: usize) -> Vec<FacetValue> {
    let mut values: Vec<(&str, u64)> = counts.into_iter().collect();
    // Count desc, tie-break alphabetic
    values.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    values.truncate(top);
    values
        .into_iter()
        .map(|(value, count)| FacetValue {
            value: value.to_string(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn item(genres: &[&str], author: &str, rating: Option<f32>, year: Option<i32>) -> BookItem {
        BookItem {
            id: format!("{}-{}", author, year.unwrap_or(0)),
            title: "Test".to_string(),
            author: author.to_string(),
            genres: genres.iter().map(|g| g.to_string()).collect(),
            rating,
            published: year.and_then(|y| NaiveDate::from_ymd_opt(y, 6, 1)),
        }
    }

    fn facet_values(facets: &[Facet], dimension: FacetDimension) -> &[FacetValue] {
        &facets
            .iter()
            .find(|f| f.dimension == dimension)
            .unwrap()
            .values
    }

    #[test]
    fn test_genre_facet_multi_valued() {
        let items = vec![
            item(&["A", "B"], "x", Some(4.2), None),
            item(&["A"], "y", Some(3.9), None),
        ];
        let facets = compute_facets(&items, &FacetLimits::default());

        let genre = facet_values(&facets, FacetDimension::Genre);
        assert_eq!(genre.len(), 2);
        assert_eq!(genre[0].value, "A");
        assert_eq!(genre[0].count, 2);
        assert_eq!(genre[1].value, "B");
        assert_eq!(genre[1].count, 1);
    }

    #[test]
    fn test_rating_buckets() {
        let items = vec![
            item(&[], "x", Some(4.2), None),
            item(&[], "y", Some(3.9), None),
        ];
        let facets = compute_facets(&items, &FacetLimits::default());

        let rating = facet_values(&facets, FacetDimension::Rating);
        assert!(rating.contains(&FacetValue {
            value: "3-4".to_string(),
            count: 1
        }));
        assert!(rating.contains(&FacetValue {
            value: "4-5".to_string(),
            count: 1
        }));
    }

    #[test]
    fn test_rating_five_clamps_into_top_bucket() {
        let items = vec![item(&[], "x", Some(5.0), None)];
        let facets = compute_facets(&items, &FacetLimits::default());

        let rating = facet_values(&facets, FacetDimension::Rating);
        assert_eq!(rating, &[FacetValue {
            value: "4-5".to_string(),
            count: 1
        }]);
    }

    #[test]
    fn test_unrated_items_skipped_in_rating_facet() {
        let items = vec![item(&[], "x", None, None), item(&[], "y", Some(2.5), None)];
        let facets = compute_facets(&items, &FacetLimits::default());

        let rating = facet_values(&facets, FacetDimension::Rating);
        assert_eq!(rating.len(), 1);
        assert_eq!(rating[0].value, "2-3");
    }

    #[test]
    fn test_tie_break_alphabetic() {
        let items = vec![item(&["Zeta", "Alpha"], "x", None, None)];
        let facets = compute_facets(&items, &FacetLimits::default());

        let genre = facet_values(&facets, FacetDimension::Genre);
        assert_eq!(genre[0].value, "Alpha");
        assert_eq!(genre[1].value, "Zeta");
    }

    #[test]
    fn test_genre_truncation() {
        let many: Vec<String> = (0..30).map(|i| format!("g{:02}", i)).collect();
        let refs: Vec<&str> = many.iter().map(|s| s.as_str()).collect();
        let items = vec![item(&refs, "x", None, None)];

        let facets = compute_facets(&items, &FacetLimits::default());
        assert_eq!(facet_values(&facets, FacetDimension::Genre).len(), 20);
    }

    #[test]
    fn test_year_facet_keeps_most_recent_distinct_years() {
        let items: Vec<BookItem> = (1990..2005).map(|y| item(&[], "x", None, Some(y))).collect();
        let facets = compute_facets(&items, &FacetLimits::default());

        let years = facet_values(&facets, FacetDimension::PublicationYear);
        assert_eq!(years.len(), 10);
        // 1990..1994 fell outside the 10 most recent years
        assert!(!years.iter().any(|v| v.value == "1994"));
        assert!(years.iter().any(|v| v.value == "2004"));
        assert!(years.iter().any(|v| v.value == "1995"));
    }

    #[test]
    fn test_year_facet_counts_rank_members() {
        let items = vec![
            item(&[], "a", None, Some(2001)),
            item(&[], "b", None, Some(2001)),
            item(&[], "c", None, Some(2003)),
        ];
        let facets = compute_facets(&items, &FacetLimits::default());

        let years = facet_values(&facets, FacetDimension::PublicationYear);
        assert_eq!(years[0].value, "2001");
        assert_eq!(years[0].count, 2);
        assert_eq!(years[1].value, "2003");
    }

    #[test]
    fn test_empty_input_yields_empty_dimensions() {
        let facets = compute_facets(&[], &FacetLimits::default());
        assert_eq!(facets.len(), 4);
        assert!(facets.iter().all(|f| f.values.is_empty()));
    }
}
