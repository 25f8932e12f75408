//! Application layer for Servio.
//!
//! Coordinates the pure discovery pipeline and account validation from
//! `servio-core` with a backend implementation, and owns the page state that
//! the UI renders from.

pub mod account;
pub mod discovery;

pub use account::AccountUseCase;
pub use discovery::{DiscoveryPage, FetchRequest, PageStatus};
