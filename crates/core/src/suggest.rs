//! Autocomplete suggestions.
//!
//! Suggestions are derived, never persisted. History supplies the personal
//! candidates; analytics supplies the trending and popular ones; the
//! controller blends the three sources into one ranked list.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Where a suggestion came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    History,
    Popular,
    Trending,
}

/// A single autocomplete candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    pub kind: SuggestionKind,
    /// Result-count estimate from the source, if it tracks one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_count: Option<u64>,
}

impl Suggestion {
    pub fn new(text: impl Into<String>, kind: SuggestionKind, result_count: Option<u64>) -> Self {
        Self {
            text: text.into(),
            kind,
            result_count,
        }
    }
}

/// Merge suggestion sources into one ranked list.
///
/// History first (personal and most specific), then trending, then popular.
/// Duplicate texts (case-insensitive) keep their first, highest-priority
/// occurrence. Truncated to `limit`.
pub fn blend_suggestions(
    history: Vec<Suggestion>,
    trending: Vec<Suggestion>,
    popular: Vec<Suggestion>,
    limit: usize,
) -> Vec<Suggestion> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut blended = Vec::new();

    for suggestion in history.into_iter().chain(trending).chain(popular) {
        let key = suggestion.text.trim().to_lowercase();
        if key.is_empty() || !seen.insert(key) {
            continue;
        }
        blended.push(suggestion);
        if blended.len() == limit {
            break;
        }
    }

    blended
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str, kind: SuggestionKind) -> Suggestion {
        Suggestion::new(text, kind, None)
    }

    #[test]
    fn test_history_ranks_first() {
        let blended = blend_suggestions(
            vec![s("emma", SuggestionKind::History)],
            vec![s("dune", SuggestionKind::Trending)],
            vec![s("gatsby", SuggestionKind::Popular)],
            10,
        );

        let kinds: Vec<_> = blended.iter().map(|x| x.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SuggestionKind::History,
                SuggestionKind::Trending,
                SuggestionKind::Popular
            ]
        );
    }

    #[test]
    fn test_duplicates_keep_highest_priority_source() {
        let blended = blend_suggestions(
            vec![s("Dune", SuggestionKind::History)],
            vec![s("dune", SuggestionKind::Trending)],
            vec![s("DUNE", SuggestionKind::Popular)],
            10,
        );

        assert_eq!(blended.len(), 1);
        assert_eq!(blended[0].kind, SuggestionKind::History);
        assert_eq!(blended[0].text, "Dune");
    }

    #[test]
    fn test_limit_applied() {
        let popular: Vec<_> = (0..20)
            .map(|i| s(&format!("query {}", i), SuggestionKind::Popular))
            .collect();
        let blended = blend_suggestions(vec![], vec![], popular, 5);
        assert_eq!(blended.len(), 5);
    }

    #[test]
    fn test_blank_texts_dropped() {
        let blended = blend_suggestions(vec![s("  ", SuggestionKind::History)], vec![], vec![], 10);
        assert!(blended.is_empty());
    }
}
