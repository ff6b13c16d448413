//! Backend REST API access.
//!
//! * [`client`] - the HTTP client wrapper with its request/response hooks
//! * [`alert`] - failure classification and message extraction
//! * [`resources`] - endpoint paths and pagination parameters

use serde_json::Value;

pub mod alert;
pub mod client;
pub mod resources;

pub use client::ApiClient;
pub use resources::{ApiPath, Pagination};

/// Error returned by every [`ApiClient`] call.
///
/// By the time a caller sees one of these the matching alert has already
/// been broadcast.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        body: Option<Value>,
    },

    #[error("Invalid response data: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Storage(#[from] crate::storage::StorageError),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Short text for a view's failure state.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http { message, .. } => message.clone(),
            ApiError::Network(_) => crate::constants::NETWORK_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}
