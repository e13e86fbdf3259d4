//! Book search provider abstraction.
//!
//! This module provides a `BookSearchProvider` trait for text search across
//! book catalog backends, plus the Open Library implementation.

mod openlibrary;
mod types;

pub use openlibrary::OpenLibraryProvider;
pub use types::*;
