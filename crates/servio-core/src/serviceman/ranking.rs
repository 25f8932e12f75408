//! Ordering of candidates for display.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum::{Display, EnumIter, EnumString};

use super::model::Candidate;

/// Key the grid is sorted by. Every key sorts descending.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum SortKey {
    /// Highest rating first
    #[default]
    #[strum(to_string = "rating", serialize = "top_rated")]
    Rating,
    /// Most completed jobs first
    #[strum(to_string = "jobs", serialize = "most_jobs")]
    Jobs,
    /// Most years of experience first
    #[strum(to_string = "experience", serialize = "most_experienced")]
    Experience,
}

impl SortKey {
    /// Value of the backend's `ordering` query parameter for this key.
    pub fn wire_ordering(self) -> &'static str {
        match self {
            SortKey::Rating => "-rating",
            SortKey::Jobs => "-total_jobs_completed",
            SortKey::Experience => "-years_of_experience",
        }
    }

    /// Human label for headings.
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Rating => "Top rated",
            SortKey::Jobs => "Most jobs",
            SortKey::Experience => "Most experienced",
        }
    }

    /// Compares two candidates so that the better one sorts first.
    ///
    /// Equal primary keys fall back to ascending id.
    pub fn compare(self, a: &Candidate, b: &Candidate) -> Ordering {
        let primary = match self {
            // 0.0 and -0.0 compare equal so the id tie-break applies
            SortKey::Rating => b
                .rating
                .partial_cmp(&a.rating)
                .unwrap_or_else(|| b.rating.total_cmp(&a.rating)),
            SortKey::Jobs => b.total_jobs_completed.cmp(&a.total_jobs_completed),
            SortKey::Experience => b.years_of_experience.cmp(&a.years_of_experience),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

/// Returns a new, sorted sequence; the input is left untouched.
pub fn rank_candidates(candidates: &[Candidate], key: SortKey) -> Vec<Candidate> {
    let mut ranked = candidates.to_vec();
    // stable: candidates equal on key and id keep their input order
    ranked.sort_by(|a, b| key.compare(a, b));
    ranked
}
