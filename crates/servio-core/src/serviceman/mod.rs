//! Serviceman discovery domain.
//!
//! This module contains the candidate model and the pure stages of the
//! discovery pipeline:
//!
//! backend -> [`CandidatePool`] -> [`filter_candidates`] -> [`compute_statistics`]
//! -> [`rank_candidates`] -> [`DiscoveryView`]
//!
//! # Module Structure
//!
//! - `model`: normalized `Candidate` and name/rating normalization rules
//! - `filter`: free-text filter
//! - `stats`: pool statistics
//! - `ranking`: sort keys and ordering
//! - `view`: view assembly from pool and query
//! - `backend`: trait for fetching candidates

mod backend;
mod filter;
mod model;
mod ranking;
mod stats;
mod view;

// Re-export public API
pub use backend::{CandidatePool, ServicemanBackend, ServicemanFilters};
pub use filter::{filter_candidates, matches_query, normalize_query};
pub use model::{
    Candidate, CategoryRef, MAX_RATING, PLACEHOLDER_NAME, normalize_rating, resolve_display_name,
};
pub use ranking::{SortKey, rank_candidates};
pub use stats::{AvailabilityStatistics, PoolStatistics, compute_statistics, top_rated};
pub use view::{DiscoveryQuery, DiscoveryView, build_view};
