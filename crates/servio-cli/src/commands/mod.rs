pub mod account;
pub mod discovery;
pub mod render;

use anyhow::{Context, Result};
use servio_core::config::ClientConfig;
use servio_infrastructure::ConfigService;
use servio_interaction::HttpBackend;
use std::path::Path;
use std::sync::Arc;

/// Resolved configuration for one CLI invocation.
pub struct AppContext {
    pub config: ClientConfig,
}

impl AppContext {
    /// Loads the config file (explicit path or the default location) with
    /// environment overrides applied.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let service = match path {
            Some(path) => ConfigService::with_path(path),
            None => ConfigService::new(),
        };
        let config = service
            .get_config()
            .context("Failed to load configuration")?;
        Ok(Self { config })
    }

    /// Applies command-line overrides, which win over the file and the
    /// environment. A blank `--api-url` is ignored.
    pub fn apply_cli_overrides(&mut self, api_url: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.config.api.base_url = url.trim().to_string();
        }
    }

    pub fn backend(&self) -> Result<Arc<HttpBackend>> {
        Ok(Arc::new(HttpBackend::from_settings(&self.config.api)?))
    }
}
