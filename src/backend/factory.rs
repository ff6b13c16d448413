//! Backend factory for creating the REST backend from configuration.

use anyhow::{Context, Result};
use std::sync::Arc;

use super::{AdminBackend, RestBackend};
use crate::api::ApiClient;
use crate::config::Config;
use crate::notify::Notifier;
use crate::storage::{FileTokenStore, TokenStore};

/// Token store selected by configuration.
///
/// # Errors
/// Returns error if no storage path is configured and the platform data
/// directory cannot be determined.
pub fn create_token_store(config: &Config) -> Result<Arc<dyn TokenStore>> {
    let store = match &config.storage.path {
        Some(path) => FileTokenStore::new(path.clone()),
        None => FileTokenStore::in_data_dir().context("Failed to locate token storage")?,
    };
    log::debug!("Token storage at {}", store.path().display());
    Ok(Arc::new(store))
}

/// Create the backend the UI talks to.
///
/// # Errors
/// Returns error if:
/// - The configured base URL is invalid
/// - The HTTP client cannot be built
pub fn create_backend(
    config: &Config,
    tokens: Arc<dyn TokenStore>,
    notifier: Arc<dyn Notifier>,
) -> Result<Arc<dyn AdminBackend>> {
    let client = ApiClient::with_timeout(&config.api.base_url, config.request_timeout(), tokens, notifier)
        .context("Failed to create API client")?;
    log::info!("Using backend at {}", client.base_url());
    Ok(Arc::new(RestBackend::new(client)))
}
