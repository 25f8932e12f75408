//! Serviceman discovery pages.
//!
//! A [`DiscoveryPage`] backs both the category page and the filtered listing:
//! it fetches a candidate pool, guards against stale and post-teardown
//! results, and derives the rendered view from the current query.

mod page;
mod status;

pub use page::{DiscoveryPage, FetchRequest};
pub use status::PageStatus;
