//! Backend contract for account operations.

use async_trait::async_trait;

use crate::error::Result;

use super::model::{AuthSession, ClientRegistrationForm, LoginForm, WorkerRegistrationForm};

/// Authentication and registration endpoints of the marketplace backend.
///
/// Field-level rejections are returned as `ServioError::Validation` with the
/// backend's messages kept verbatim.
#[async_trait]
pub trait AccountBackend: Send + Sync {
    async fn login(&self, form: &LoginForm) -> Result<AuthSession>;

    async fn register_client(&self, form: &ClientRegistrationForm) -> Result<()>;

    async fn register_worker(&self, form: &WorkerRegistrationForm) -> Result<()>;

    async fn request_password_reset(&self, email: &str) -> Result<()>;
}
