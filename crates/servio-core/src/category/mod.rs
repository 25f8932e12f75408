//! Service category domain model.

use serde::{Deserialize, Serialize};

/// A category of services offered on the marketplace (plumbing, cleaning, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}
