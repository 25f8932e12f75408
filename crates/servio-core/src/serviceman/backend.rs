//! Backend contract for fetching servicemen.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::error::Result;

use super::model::Candidate;
use super::ranking::SortKey;
use super::stats::AvailabilityStatistics;

/// Normalized output of a serviceman fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidatePool {
    pub candidates: Vec<Candidate>,
    /// Auxiliary statistics, only sent by the listing endpoint.
    pub availability: Option<AvailabilityStatistics>,
}

impl CandidatePool {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self {
            candidates,
            availability: None,
        }
    }

    pub fn with_availability(mut self, availability: AvailabilityStatistics) -> Self {
        self.availability = Some(availability);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Server-side filters for the serviceman listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServicemanFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordering: Option<SortKey>,
}

impl ServicemanFilters {
    /// Query-string pairs in the form the listing endpoint expects.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(category) = self.category {
            pairs.push(("category", category.to_string()));
        }
        if let Some(available) = self.is_available {
            pairs.push(("is_available", available.to_string()));
        }
        if let Some(min_rating) = self.min_rating {
            pairs.push(("min_rating", min_rating.to_string()));
        }
        if let Some(ordering) = self.ordering {
            pairs.push(("ordering", ordering.wire_ordering().to_string()));
        }
        pairs
    }
}

/// Source of serviceman and category data.
///
/// Implementations resolve every response shape the backend may send into a
/// [`CandidatePool`]. Unexpected shapes become an empty pool; only transport
/// or status failures are returned as errors.
#[async_trait]
pub trait ServicemanBackend: Send + Sync {
    /// Candidates working in one category.
    async fn servicemen_by_category(&self, category_id: u64) -> Result<CandidatePool>;

    /// Candidates matching server-side filters.
    async fn list_servicemen(&self, filters: &ServicemanFilters) -> Result<CandidatePool>;

    /// All categories, for headers and pickers.
    async fn list_categories(&self) -> Result<Vec<Category>>;

    /// A single category.
    async fn category(&self, category_id: u64) -> Result<Category>;
}
