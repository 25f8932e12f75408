//! Serviceman domain models.

use serde::{Deserialize, Serialize};

/// Shown when a serviceman has no usable name at all.
pub const PLACEHOLDER_NAME: &str = "Unnamed serviceman";

/// Highest rating a serviceman can hold.
pub const MAX_RATING: f64 = 5.0;

/// Reference to the category a serviceman works in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: Option<u64>,
    /// Label shown to the user; empty when the backend only sent an id.
    pub name: String,
}

/// A service provider as the discovery pipeline sees it.
///
/// Instances are always normalized: numeric aggregates are plain numbers
/// (absent values were coerced to zero at ingestion) and text fields are
/// never `None`. Downstream stages can do arithmetic without guarding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: u64,
    /// Resolved name, see [`resolve_display_name`].
    pub display_name: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Average rating in `[0, 5]`.
    pub rating: f64,
    pub total_jobs_completed: u32,
    pub years_of_experience: u32,
    pub bio: String,
    pub category: Option<CategoryRef>,
    pub skills: Vec<String>,
    pub is_available: Option<bool>,
}

impl Candidate {
    /// Label of the category, empty when the candidate has none.
    pub fn category_label(&self) -> &str {
        self.category.as_ref().map(|c| c.name.as_str()).unwrap_or("")
    }

    /// All skill labels joined by a single space.
    pub fn skills_text(&self) -> String {
        self.skills.join(" ")
    }
}

/// Picks the name to display for a serviceman.
///
/// Fallback chain: explicit full name, then first and last name composed,
/// then username, then [`PLACEHOLDER_NAME`]. Blank values count as absent.
pub fn resolve_display_name(
    full_name: Option<&str>,
    first_name: Option<&str>,
    last_name: Option<&str>,
    username: Option<&str>,
) -> String {
    if let Some(full) = non_blank(full_name) {
        return full.to_string();
    }

    let composed = [first_name, last_name]
        .into_iter()
        .filter_map(non_blank)
        .collect::<Vec<_>>()
        .join(" ");
    if !composed.is_empty() {
        return composed;
    }

    non_blank(username)
        .map(str::to_string)
        .unwrap_or_else(|| PLACEHOLDER_NAME.to_string())
}

/// Coerces a raw rating into `[0, 5]`; absent or non-finite values become 0.
pub fn normalize_rating(raw: Option<f64>) -> f64 {
    match raw {
        // `+ 0.0` folds -0.0 into 0.0
        Some(r) if r.is_finite() => r.clamp(0.0, MAX_RATING) + 0.0,
        _ => 0.0,
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
