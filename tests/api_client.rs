//! HTTP client behaviour against an in-process server.

use axum::{
    extract::Path,
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use schooldesk::api::{ApiClient, ApiError, ApiPath};
use schooldesk::notify::{Alert, Notification, RecordingNotifier, Severity};
use schooldesk::storage::{FileTokenStore, MemoryTokenStore, TokenStore};
use serde_json::{json, Value};
use std::sync::Arc;

async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn echo_authorization(headers: HeaderMap) -> Json<Value> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    Json(json!({ "authorization": authorization }))
}

fn test_router() -> Router {
    Router::new()
        .route("/api/v1/users", get(echo_authorization))
        .route(
            "/api/v1/tenants",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"detail": [{"msg": "name is required"}, {"msg": "email is required"}]})),
                )
            }),
        )
        .route(
            "/api/v1/students",
            get(|| async { (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Could not validate credentials"}))) }),
        )
        .route(
            "/api/v1/auth/roles",
            get(|| async { (StatusCode::FORBIDDEN, Json(json!({"message": "Not enough permissions"}))) }),
        )
        .route("/api/v1/staff/salaries", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .route("/api/v1/broken", get(|| async { "<html>not json</html>" }))
        .route("/api/v1/counts", get(|| async { Json(json!({"total": 3})) }))
        .route(
            "/api/v1/users/{id}",
            get(|Path(id): Path<String>| async move { Json(json!({ "id": id })) }),
        )
}

struct Harness {
    client: ApiClient,
    tokens: Arc<MemoryTokenStore>,
    notifier: Arc<RecordingNotifier>,
}

async fn harness(token: Option<&str>) -> Harness {
    let base = spawn_server(test_router()).await;
    let tokens = Arc::new(match token {
        Some(token) => MemoryTokenStore::with_token(token),
        None => MemoryTokenStore::new(),
    });
    let notifier = Arc::new(RecordingNotifier::new());
    let client = ApiClient::new(&base, tokens.clone(), notifier.clone()).unwrap();
    Harness {
        client,
        tokens,
        notifier,
    }
}

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let h = harness(Some("abc123")).await;

    let body: Value = h.client.get_json(&ApiPath::new("/api/v1/users"), &[]).await.unwrap();

    assert_eq!(body["authorization"], "Bearer abc123");
    assert!(h.notifier.notifications().is_empty());
}

#[tokio::test]
async fn test_no_token_means_no_header() {
    let h = harness(None).await;

    let body: Value = h.client.get_json(&ApiPath::new("/api/v1/users"), &[]).await.unwrap();

    assert_eq!(body["authorization"], Value::Null);
}

#[tokio::test]
async fn test_unauthorized_clears_token_and_expires_once() {
    let h = harness(Some("stale")).await;

    let err = h.client.get_json::<Value>(&ApiPath::new("/api/v1/students"), &[]).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(h.tokens.token().unwrap(), None);
    assert_eq!(h.notifier.token_expired_count(), 1);
    assert_eq!(
        h.notifier.alerts(),
        vec![Alert::error("Could not validate credentials")]
    );

    // A second 401 fires its own expiry signal
    let _ = h.client.get_json::<Value>(&ApiPath::new("/api/v1/students"), &[]).await;
    assert_eq!(h.notifier.token_expired_count(), 2);
}

#[tokio::test]
async fn test_validation_errors_are_joined_warnings() {
    let h = harness(Some("abc123")).await;

    let err = h
        .client
        .post_json::<_, Value>(&ApiPath::new("/api/v1/tenants"), &json!({"name": ""}))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(
        h.notifier.alerts(),
        vec![Alert::new("name is required email is required", Severity::Warning)]
    );
    // Only a 401 touches the token
    assert_eq!(h.tokens.token().unwrap().as_deref(), Some("abc123"));
    assert_eq!(h.notifier.token_expired_count(), 0);
}

#[tokio::test]
async fn test_message_field_and_status_text_fallbacks() {
    let h = harness(Some("abc123")).await;

    let _ = h.client.get_json::<Value>(&ApiPath::new("/api/v1/auth/roles"), &[]).await;
    let _ = h.client.get_json::<Value>(&ApiPath::new("/api/v1/staff/salaries"), &[]).await;

    assert_eq!(
        h.notifier.alerts(),
        vec![
            Alert::error("Not enough permissions"),
            Alert::error("Internal Server Error"),
        ]
    );
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // Grab a free port and close it again
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let tokens = Arc::new(MemoryTokenStore::with_token("abc123"));
    let notifier = Arc::new(RecordingNotifier::new());
    let client = ApiClient::new(&format!("http://{}", addr), tokens.clone(), notifier.clone()).unwrap();

    let err = client.get_json::<Value>(&ApiPath::new("/api/v1/users"), &[]).await.unwrap_err();

    assert!(matches!(err, ApiError::Network(_)));
    assert_eq!(
        notifier.notifications(),
        vec![Notification::GlobalAlert(Alert::new("Network error", Severity::Error))]
    );
    assert_eq!(tokens.token().unwrap().as_deref(), Some("abc123"));
}

#[tokio::test]
async fn test_undecodable_success_body() {
    let h = harness(None).await;

    let err = h.client.get_json::<Value>(&ApiPath::new("/api/v1/broken"), &[]).await.unwrap_err();

    assert!(matches!(err, ApiError::Decode(_)));
    let alerts = h.notifier.alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].severity, Severity::Error);
}

#[tokio::test]
async fn test_file_store_token_removed_on_unauthorized() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    let store = FileTokenStore::new(&path);
    store.set_token("expired").unwrap();

    let base = spawn_server(test_router()).await;
    let notifier = Arc::new(RecordingNotifier::new());
    let client = ApiClient::new(&base, Arc::new(store), notifier.clone()).unwrap();

    let _ = client.get_json::<Value>(&ApiPath::new("/api/v1/students"), &[]).await;

    assert_eq!(FileTokenStore::new(&path).token().unwrap(), None);
    assert_eq!(notifier.token_expired_count(), 1);
}

#[tokio::test]
async fn test_list_without_recognizable_envelope_alerts_once() {
    let h = harness(None).await;

    let err = h.client.get_list(&ApiPath::new("/api/v1/counts"), &[]).await.unwrap_err();

    assert!(matches!(err, ApiError::Decode(_)));
    let alerts = h.notifier.alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].severity, Severity::Error);
}

#[tokio::test]
async fn test_record_id_arrives_as_one_segment() {
    let h = harness(None).await;
    let users = ApiPath::new("/api/v1/users");

    for id in ["a/b", "a\\b", "x?y#z"] {
        let body: Value = h.client.get_json(&users.join(id), &[]).await.unwrap();
        assert_eq!(body["id"], id);
    }
}

#[tokio::test]
async fn test_dot_id_is_refused_with_alert() {
    let h = harness(Some("abc123")).await;

    let err = h.client.delete(&ApiPath::new("/api/v1/users").join("..")).await.unwrap_err();

    assert!(matches!(err, ApiError::InvalidUrl(_)));
    let alerts = h.notifier.alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].severity, Severity::Error);
    assert_eq!(h.tokens.token().unwrap().as_deref(), Some("abc123"));
}
