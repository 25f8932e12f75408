use servio_core::account::{
    AccountBackend, AuthSession, ClientRegistrationForm, LoginForm, WorkerRegistrationForm,
    validate_client_registration, validate_login, validate_password_reset,
    validate_worker_registration,
};
use servio_core::error::Result;
use std::sync::Arc;

/// Submits account forms after validating them locally.
///
/// A form that fails validation is rejected with `ServioError::Validation`
/// and never reaches the backend. Backend field errors come back the same
/// way, so callers render both identically.
pub struct AccountUseCase {
    backend: Arc<dyn AccountBackend>,
}

impl AccountUseCase {
    pub fn new(backend: Arc<dyn AccountBackend>) -> Self {
        Self { backend }
    }

    pub async fn login(&self, form: &LoginForm) -> Result<AuthSession> {
        validate_login(form)?;
        let session = self.backend.login(form).await?;
        tracing::info!("Login succeeded");
        Ok(session)
    }

    pub async fn register_client(&self, form: &ClientRegistrationForm) -> Result<()> {
        validate_client_registration(form)?;
        self.backend.register_client(form).await?;
        tracing::info!("Client account created for {}", form.email.trim());
        Ok(())
    }

    pub async fn register_worker(&self, form: &WorkerRegistrationForm) -> Result<()> {
        validate_worker_registration(form)?;
        self.backend.register_worker(form).await?;
        tracing::info!(
            "Serviceman account created for {}",
            form.account.email.trim()
        );
        Ok(())
    }

    /// Requests a reset link. Success means the backend accepted the request,
    /// whether or not the address is registered.
    pub async fn request_password_reset(&self, email: &str) -> Result<()> {
        validate_password_reset(email)?;
        self.backend.request_password_reset(email.trim()).await
    }
}
