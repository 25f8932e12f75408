//! Aggregate statistics over a candidate pool.

use serde::{Deserialize, Serialize};

use super::model::Candidate;

/// Statistics shown above the grid.
///
/// Always computed over the full pool a page fetched, never over the
/// filtered view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolStatistics {
    pub count: usize,
    /// Mean rating; 0 for an empty pool.
    pub average_rating: f64,
    /// Highest rated candidate, first one wins ties.
    pub top_rated: Option<Candidate>,
}

/// Availability breakdown reported by the listing endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityStatistics {
    pub total: u32,
    pub available: u32,
    pub busy: u32,
}

pub fn compute_statistics(candidates: &[Candidate]) -> PoolStatistics {
    let count = candidates.len();
    let average_rating = if count == 0 {
        0.0
    } else {
        candidates.iter().map(|c| c.rating).sum::<f64>() / count as f64
    };

    PoolStatistics {
        count,
        average_rating,
        top_rated: top_rated(candidates).cloned(),
    }
}

/// First candidate holding the maximum rating.
pub fn top_rated(candidates: &[Candidate]) -> Option<&Candidate> {
    candidates.iter().fold(None, |best: Option<&Candidate>, c| match best {
        Some(b) if c.rating <= b.rating => Some(b),
        _ => Some(c),
    })
}
