//! HttpBackend - JSON-over-HTTP client for the marketplace backend.
//!
//! Implements both [`ServicemanBackend`] and [`AccountBackend`] on top of a
//! shared `reqwest::Client`. Configuration comes from `ApiSettings`
//! (config.toml > environment variables > defaults).

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use servio_core::account::{
    AccountBackend, AuthSession, ClientRegistrationForm, LoginForm, WorkerRegistrationForm,
};
use servio_core::category::Category;
use servio_core::config::ApiSettings;
use servio_core::error::{Result, ServioError};
use servio_core::serviceman::{CandidatePool, ServicemanBackend, ServicemanFilters};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::dto::{
    CategoryDto, ClientRegisterRequest, LoginRequest, LoginResponse, PasswordResetRequest,
    WorkerRegisterRequest, categories_from_value, map_http_error, pool_from_value,
};

const USER_AGENT: &str = concat!("servio-client/", env!("CARGO_PKG_VERSION"));

const CATEGORIES_PATH: &str = "categories/";
const SERVICEMEN_PATH: &str = "servicemen/";
const LOGIN_PATH: &str = "auth/login/";
const REGISTER_CLIENT_PATH: &str = "auth/register/client/";
const REGISTER_WORKER_PATH: &str = "auth/register/serviceman/";
const PASSWORD_RESET_PATH: &str = "auth/password-reset/";

/// Backend implementation that talks to the marketplace REST API.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    /// Auth token from the last successful login.
    token: Arc<RwLock<Option<String>>>,
}

impl HttpBackend {
    /// Creates a backend for `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ServioError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn from_settings(settings: &ApiSettings) -> Result<Self> {
        Self::new(&settings.base_url, Duration::from_secs(settings.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Uses `token` for subsequent requests.
    pub async fn set_token(&self, token: impl Into<String>) {
        *self.token.write().await = Some(token.into());
    }

    pub async fn clear_token(&self) {
        *self.token.write().await = None;
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let request = self.client.get(self.url(path)).query(query);
        self.send(request).await
    }

    async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        let request = self.client.post(self.url(path)).json(body);
        self.send(request).await
    }

    async fn send(&self, mut request: RequestBuilder) -> Result<Value> {
        if let Some(token) = self.token.read().await.as_deref() {
            request = request.header("Authorization", format!("Token {token}"));
        }

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let url = response.url().clone();

        let body = response
            .text()
            .await
            .map_err(|e| ServioError::network(format!("Failed to read response body: {e}")))?;

        if !status.is_success() {
            tracing::warn!("{} answered {}", url.path(), status);
            return Err(map_http_error(status.as_u16(), &body));
        }

        tracing::debug!("{} answered {} ({} bytes)", url.path(), status, body.len());
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(parse_success_body(url.path(), &body))
    }
}

/// Parses a 2xx body. A body that is not JSON (a proxy error page, say) is
/// logged and read as `null`, which list endpoints resolve to an empty result.
fn parse_success_body(path: &str, body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|e| {
        tracing::warn!("{} sent a non-JSON success body ({}), treating as empty", path, e);
        Value::Null
    })
}

fn map_transport_error(err: reqwest::Error) -> ServioError {
    if err.is_timeout() {
        ServioError::timeout(format!("Request timed out: {err}"))
    } else {
        ServioError::network(format!("Request failed: {err}"))
    }
}

#[async_trait]
impl ServicemanBackend for HttpBackend {
    async fn servicemen_by_category(&self, category_id: u64) -> Result<CandidatePool> {
        let path = format!("{CATEGORIES_PATH}{category_id}/servicemen/");
        let value = self.get_json(&path, &[]).await?;
        Ok(pool_from_value(value))
    }

    async fn list_servicemen(&self, filters: &ServicemanFilters) -> Result<CandidatePool> {
        let value = self
            .get_json(SERVICEMEN_PATH, &filters.to_query_pairs())
            .await?;
        Ok(pool_from_value(value))
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let value = self.get_json(CATEGORIES_PATH, &[]).await?;
        Ok(categories_from_value(value))
    }

    async fn category(&self, category_id: u64) -> Result<Category> {
        let path = format!("{CATEGORIES_PATH}{category_id}/");
        let value = self.get_json(&path, &[]).await.map_err(|e| {
            if e.is_not_found() {
                ServioError::not_found("category", category_id.to_string())
            } else {
                e
            }
        })?;
        let dto: CategoryDto = serde_json::from_value(value)?;
        Ok(Category::from(dto))
    }
}

#[async_trait]
impl AccountBackend for HttpBackend {
    async fn login(&self, form: &LoginForm) -> Result<AuthSession> {
        let request = LoginRequest {
            email: form.email.trim(),
            password: &form.password,
        };
        let value = self.post_json(LOGIN_PATH, &request).await?;
        let response: LoginResponse = serde_json::from_value(value)?;

        let session = AuthSession::from(response);
        self.set_token(session.token.clone()).await;
        tracing::info!(
            "Signed in as {}",
            session.username.as_deref().unwrap_or(request.email)
        );
        Ok(session)
    }

    async fn register_client(&self, form: &ClientRegistrationForm) -> Result<()> {
        self.post_json(REGISTER_CLIENT_PATH, &ClientRegisterRequest::from(form))
            .await?;
        Ok(())
    }

    async fn register_worker(&self, form: &WorkerRegistrationForm) -> Result<()> {
        self.post_json(REGISTER_WORKER_PATH, &WorkerRegisterRequest::from(form))
            .await?;
        Ok(())
    }

    async fn request_password_reset(&self, email: &str) -> Result<()> {
        self.post_json(PASSWORD_RESET_PATH, &PasswordResetRequest { email: email.trim() })
            .await?;
        Ok(())
    }
}
