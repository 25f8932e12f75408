//! Domain layer of the Servio marketplace client.
//!
//! Models, pure discovery pipeline stages, form validation and the backend
//! traits the outer layers implement.

pub mod account;
pub mod category;
pub mod config;
pub mod error;
pub mod field_errors;
pub mod serviceman;

// Re-export common error type
pub use error::{Result, ServioError};
pub use field_errors::FieldErrors;
