//! Canonical query signatures.
//!
//! A signature is a deterministic string form of a `SearchQuery` used as the
//! cache key: fixed field order, trimmed/lowercased text, default-valued
//! fields omitted. Semantically identical queries collide by construction.

use crate::provider::{SearchQuery, SortField, SortOrder, DEFAULT_PAGE_SIZE};

/// Render a query as its canonical signature.
///
/// Free-text values are percent-encoded so a value containing `&` or `=`
/// cannot forge another query's signature.
pub fn canonical_signature(query: &SearchQuery) -> String {
    let mut sig = format!("text={}", urlencoding::encode(&query.normalized_text()));

    if let Some(genre) = &query.genre {
        sig.push_str(&format!(
            "&genre={}",
            urlencoding::encode(&genre.trim().to_lowercase())
        ));
    }
    if let Some(author) = &query.author {
        sig.push_str(&format!(
            "&author={}",
            urlencoding::encode(&author.trim().to_lowercase())
        ));
    }
    if let Some(min) = query.min_rating {
        sig.push_str(&format!("&min_rating={}", min));
    }
    if let Some(max) = query.max_rating {
        sig.push_str(&format!("&max_rating={}", max));
    }
    if let Some(from) = query.published_from {
        sig.push_str(&format!("&from={}", from));
    }
    if let Some(to) = query.published_to {
        sig.push_str(&format!("&to={}", to));
    }
    if query.sort != SortField::Relevance {
        sig.push_str(&format!("&sort={}", sort_token(query.sort)));
    }
    if query.order != SortOrder::Desc {
        sig.push_str("&order=asc");
    }
    if query.page != 0 {
        sig.push_str(&format!("&page={}", query.page));
    }
    if query.page_size != DEFAULT_PAGE_SIZE {
        sig.push_str(&format!("&page_size={}", query.page_size));
    }

    sig
}

fn sort_token(sort: SortField) -> &'static str {
    match sort {
        SortField::Relevance => "relevance",
        SortField::Title => "title",
        SortField::Rating => "rating",
        SortField::PublicationDate => "publication_date",
    }
}
