//! Account domain module.
//!
//! Sign-in, sign-up and password reset forms, their client-side validation
//! and the backend trait that submits them.

mod backend;
mod model;
pub mod validation;

// Re-export public API
pub use backend::AccountBackend;
pub use model::{AuthSession, ClientRegistrationForm, LoginForm, WorkerRegistrationForm};
pub use validation::{
    validate_client_registration, validate_login, validate_password_reset,
    validate_worker_registration,
};
