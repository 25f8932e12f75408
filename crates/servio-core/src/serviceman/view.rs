//! Assembly of the rendering-ready discovery view.

use serde::{Deserialize, Serialize};

use super::backend::CandidatePool;
use super::filter::filter_candidates;
use super::model::Candidate;
use super::ranking::{SortKey, rank_candidates};
use super::stats::{AvailabilityStatistics, PoolStatistics, compute_statistics};

/// Client-side inputs that shape the grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryQuery {
    /// Free-text search, may be empty.
    pub text: String,
    pub sort: SortKey,
}

impl DiscoveryQuery {
    pub fn new(text: impl Into<String>, sort: SortKey) -> Self {
        Self {
            text: text.into(),
            sort,
        }
    }
}

/// Everything a listing page renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryView {
    /// Over the full pool.
    pub statistics: PoolStatistics,
    pub availability: Option<AvailabilityStatistics>,
    /// Filtered by the query, then ranked by the sort key.
    pub results: Vec<Candidate>,
}

/// Derives the view from a pool and the current query.
///
/// Pure: recomputed whenever the pool, the text or the sort key changes.
pub fn build_view(pool: &CandidatePool, query: &DiscoveryQuery) -> DiscoveryView {
    let filtered = filter_candidates(&pool.candidates, &query.text);

    DiscoveryView {
        statistics: compute_statistics(&pool.candidates),
        availability: pool.availability,
        results: rank_candidates(&filtered, query.sort),
    }
}
