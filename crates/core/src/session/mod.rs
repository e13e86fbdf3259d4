//! Search session orchestration.
//!
//! A [`SearchSessionController`] ties the debouncer, cache, facets, history
//! and analytics together and publishes [`SessionSnapshot`] updates over a
//! watch channel.

mod controller;
mod types;

pub use controller::SearchSessionController;
pub use types::{SearchFilters, SessionPhase, SessionSnapshot};
