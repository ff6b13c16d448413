//! Backend abstraction used by the UI and the fetch helper.
//!
//! The console talks to the school-management API only through
//! [`AdminBackend`]. The production implementation is [`rest::RestBackend`];
//! anything else implementing the trait (for instance a canned backend in
//! tests) can drive the same views.

use crate::api::{ApiError, ApiPath, Pagination};
use crate::record::Record;
use crate::storage::StorageError;
use async_trait::async_trait;
use serde_json::{Map, Value};

pub mod factory;
pub mod rest;

pub use factory::{create_backend, create_token_store};
pub use rest::RestBackend;

/// Operations the admin views need from the backend.
///
/// Paths are collection paths with any `{parent}` placeholder already
/// filled in.
#[async_trait]
pub trait AdminBackend: Send + Sync {
    /// List a collection page with extra query parameters.
    async fn list(
        &self,
        path: &ApiPath,
        page: Pagination,
        query: Vec<(&'static str, String)>,
    ) -> Result<Vec<Record>, ApiError>;

    async fn create(&self, path: &ApiPath, payload: Map<String, Value>) -> Result<Value, ApiError>;
    async fn update(&self, path: &ApiPath, id: &str, payload: Map<String, Value>) -> Result<Value, ApiError>;
    async fn delete(&self, path: &ApiPath, id: &str) -> Result<(), ApiError>;
    async fn activate(&self, path: &ApiPath, id: &str) -> Result<Value, ApiError>;

    /// Exchange credentials for a token and persist it.
    async fn login(&self, username: &str, password: &str) -> Result<(), ApiError>;

    /// Forget the stored token.
    fn logout(&self) -> Result<(), StorageError>;

    fn has_token(&self) -> bool;
}
