//! REST implementation of [`AdminBackend`] on top of [`ApiClient`].

use super::AdminBackend;
use crate::api::resources::{self, Pagination};
use crate::api::{ApiClient, ApiError, ApiPath};
use crate::record::{records_from_values, Record};
use crate::storage::StorageError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    access_token: String,
}

#[derive(Clone)]
pub struct RestBackend {
    client: ApiClient,
}

impl RestBackend {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

#[async_trait]
impl AdminBackend for RestBackend {
    async fn list(
        &self,
        path: &ApiPath,
        page: Pagination,
        mut query: Vec<(&'static str, String)>,
    ) -> Result<Vec<Record>, ApiError> {
        query.extend(page.query());
        let records = records_from_values(self.client.get_list(path, &query).await?);
        log::info!("Fetched {} records from {}", records.len(), path);
        Ok(records)
    }

    async fn create(&self, path: &ApiPath, payload: Map<String, Value>) -> Result<Value, ApiError> {
        log::info!("POST {} ({} fields)", path, payload.len());
        self.client.post_json(path, &payload).await
    }

    async fn update(&self, path: &ApiPath, id: &str, payload: Map<String, Value>) -> Result<Value, ApiError> {
        let record_path = resources::record_path(path, id);
        log::info!("PUT {} ({} fields)", record_path, payload.len());
        self.client.put_json(&record_path, &payload).await
    }

    async fn delete(&self, path: &ApiPath, id: &str) -> Result<(), ApiError> {
        let record_path = resources::record_path(path, id);
        log::info!("DELETE {}", record_path);
        self.client.delete(&record_path).await
    }

    async fn activate(&self, path: &ApiPath, id: &str) -> Result<Value, ApiError> {
        let activate_path = resources::activate_path(path, id);
        log::info!("POST {}", activate_path);
        self.client.post_json(&activate_path, &Map::new()).await
    }

    async fn login(&self, username: &str, password: &str) -> Result<(), ApiError> {
        let response: LoginResponse = self
            .client
            .post_json(&ApiPath::new(resources::LOGIN), &LoginRequest { username, password })
            .await?;

        if let Err(e) = self.client.token_store().set_token(&response.access_token) {
            log::error!("Failed to store token after login as {}: {}", username, e);
            return Err(e.into());
        }
        log::info!("Logged in as {}", username);
        Ok(())
    }

    fn logout(&self) -> Result<(), StorageError> {
        log::info!("Clearing stored token");
        self.client.token_store().remove_token()
    }

    fn has_token(&self) -> bool {
        matches!(self.client.token_store().token(), Ok(Some(_)))
    }
}
