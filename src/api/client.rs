//! HTTP client wrapper used for every backend call.
//!
//! Each request passes through two hooks:
//!
//! * [`ApiClient::authorize`] attaches `Authorization: Bearer <token>` when
//!   the token store holds a token.
//! * [`ApiClient::intercept`] classifies failures, clears the token on 401,
//!   broadcasts the resulting alert and hands the original error back to
//!   the caller.

use super::alert::{network_alert, response_alert};
use super::{ApiError, ApiPath};
use crate::notify::{Alert, Notification, Notifier};
use crate::storage::TokenStore;
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
    notifier: Arc<dyn Notifier>,
}

impl ApiClient {
    /// Create a client for `base_url` using library default timeouts.
    pub fn new(base_url: &str, tokens: Arc<dyn TokenStore>, notifier: Arc<dyn Notifier>) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, None, tokens, notifier)
    }

    pub fn with_timeout(
        base_url: &str,
        timeout: Option<Duration>,
        tokens: Arc<dyn TokenStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ApiError> {
        let base_url = parse_base_url(base_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            tokens,
            notifier,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Append `path` to the base origin, encoding each segment.
    ///
    /// Empty and dot segments are refused.
    pub fn url(&self, path: &ApiPath) -> Result<Url, ApiError> {
        if let Some(segment) = path
            .segments()
            .iter()
            .find(|segment| matches!(segment.as_str(), "" | "." | ".."))
        {
            return Err(ApiError::InvalidUrl(format!("{}: bad path segment '{}'", path, segment)));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(format!("{} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(path.segments());
        Ok(url)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &ApiPath, query: &[(&str, String)]) -> Result<T, ApiError> {
        let request = self.http.get(self.resolve(path)?).query(query);
        let response = self.intercept(request).await?;
        self.decode(response).await
    }

    /// GET a collection that may be a bare array or wrapped in an envelope.
    pub async fn get_list(&self, path: &ApiPath, query: &[(&str, String)]) -> Result<Vec<Value>, ApiError> {
        let payload: Value = self.get_json(path, query).await?;
        list_items(payload).map_err(|error| self.fail(error))
    }

    pub async fn post_json<B, T>(&self, path: &ApiPath, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http.post(self.resolve(path)?).json(body);
        let response = self.intercept(request).await?;
        self.decode(response).await
    }

    pub async fn put_json<B, T>(&self, path: &ApiPath, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http.put(self.resolve(path)?).json(body);
        let response = self.intercept(request).await?;
        self.decode(response).await
    }

    pub async fn delete(&self, path: &ApiPath) -> Result<(), ApiError> {
        let request = self.http.delete(self.resolve(path)?);
        self.intercept(request).await?;
        Ok(())
    }

    fn resolve(&self, path: &ApiPath) -> Result<Url, ApiError> {
        self.url(path).map_err(|error| self.fail(error))
    }

    /// Request hook: attach the stored bearer token, if any.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.tokens.token() {
            Ok(Some(token)) => request.bearer_auth(token),
            Ok(None) => request,
            Err(e) => {
                log::warn!("Could not read stored token, sending request without it: {}", e);
                request
            }
        }
    }

    /// Send a request through both hooks.
    async fn intercept(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = match self.authorize(request).send().await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Request failed without a response: {}", e);
                self.broadcast(network_alert());
                return Err(ApiError::Network(e.to_string()));
            }
        };

        let status = response.status();
        let url = response.url().clone();
        if status.is_success() {
            return Ok(response);
        }

        // Error bodies are best effort; a broken stream still yields an alert
        let body = response.bytes().await.unwrap_or_default();
        let alert = response_alert(status, &body);
        log::warn!("{} {} -> {}", status.as_u16(), url, alert.message);

        if status == StatusCode::UNAUTHORIZED {
            self.expire_session();
        }
        self.broadcast(alert.clone());

        Err(ApiError::Http {
            status: status.as_u16(),
            message: alert.message,
            body: serde_json::from_slice(&body).ok(),
        })
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response) -> Result<T, ApiError> {
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                self.broadcast(network_alert());
                return Err(ApiError::Network(e.to_string()));
            }
        };

        // No content decodes as JSON null so `Value` and `Option<_>` callers work
        let payload: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &bytes
        };

        serde_json::from_slice(payload).map_err(|e| self.fail(ApiError::Decode(e.to_string())))
    }

    /// Report a failure that happened on our side of the request.
    fn fail(&self, error: ApiError) -> ApiError {
        log::warn!("{}", error);
        self.broadcast(Alert::error(error.to_string()));
        error
    }

    fn expire_session(&self) {
        if let Err(e) = self.tokens.remove_token() {
            log::error!("Failed to clear stored token after 401: {}", e);
        }
        self.notifier.notify(Notification::TokenExpired);
    }

    fn broadcast(&self, alert: Alert) {
        self.notifier.notify(Notification::GlobalAlert(alert));
    }
}

fn parse_base_url(base_url: &str) -> Result<Url, ApiError> {
    let url = Url::parse(base_url.trim()).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ApiError::InvalidUrl(format!("unsupported scheme '{}' in {}", scheme, base_url))),
    }
}

/// Extract a list payload that may be bare or wrapped in an envelope.
fn list_items(payload: Value) -> Result<Vec<Value>, ApiError> {
    match payload {
        Value::Array(items) => Ok(items),
        Value::Object(mut object) => ["items", "data", "results"]
            .iter()
            .find_map(|key| match object.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .ok_or_else(|| ApiError::Decode("expected a list of records".to_string())),
        _ => Err(ApiError::Decode("expected a list of records".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;
    use crate::storage::MemoryTokenStore;
    use serde_json::json;

    fn client(base: &str) -> Result<ApiClient, ApiError> {
        ApiClient::new(base, Arc::new(MemoryTokenStore::new()), Arc::new(RecordingNotifier::new()))
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let api = client("http://localhost:8000/").unwrap();
        assert_eq!(
            api.url(&ApiPath::new("/api/v1/users")).unwrap().as_str(),
            "http://localhost:8000/api/v1/users"
        );
    }

    #[test]
    fn test_url_keeps_base_path_prefix() {
        let api = client("https://school.example/backend").unwrap();
        assert_eq!(
            api.url(&ApiPath::new("/api/v1/tenants")).unwrap().as_str(),
            "https://school.example/backend/api/v1/tenants"
        );
    }

    #[test]
    fn test_record_ids_stay_inside_their_segment() {
        let api = client("http://h/").unwrap();
        let users = ApiPath::new("/api/v1/users");

        assert_eq!(api.url(&users.join("a\\b")).unwrap().as_str(), "http://h/api/v1/users/a%5Cb");
        assert_eq!(api.url(&users.join("a/b")).unwrap().as_str(), "http://h/api/v1/users/a%2Fb");
        assert_eq!(api.url(&users.join("x?y#z")).unwrap().as_str(), "http://h/api/v1/users/x%3Fy%23z");
        assert_eq!(api.url(&users.join("50%")).unwrap().as_str(), "http://h/api/v1/users/50%25");
    }

    #[test]
    fn test_dot_and_empty_ids_are_refused() {
        let api = client("http://h/").unwrap();
        let users = ApiPath::new("/api/v1/users");

        for id in ["..", ".", ""] {
            assert!(matches!(api.url(&users.join(id)), Err(ApiError::InvalidUrl(_))), "{:?}", id);
        }
    }

    #[test]
    fn test_rejects_non_http_base() {
        assert!(matches!(client("ftp://example.com"), Err(ApiError::InvalidUrl(_))));
        assert!(matches!(client("not a url"), Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_list_items_accepts_envelopes() {
        assert_eq!(list_items(json!([1, 2])).unwrap().len(), 2);
        assert_eq!(list_items(json!({"items": [1]})).unwrap().len(), 1);
        assert_eq!(list_items(json!({"total": 3, "data": [1, 2, 3]})).unwrap().len(), 3);
        assert_eq!(list_items(json!({"results": []})).unwrap().len(), 0);
        assert!(list_items(json!({"id": 1})).is_err());
        assert!(list_items(json!("nope")).is_err());
    }
}
