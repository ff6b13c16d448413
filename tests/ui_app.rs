//! Driving the app component headlessly with a canned backend.

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use schooldesk::api::{ApiError, ApiPath, Pagination};
use schooldesk::backend::AdminBackend;
use schooldesk::constants::ERROR_SESSION_EXPIRED;
use schooldesk::fetch::LoadState;
use schooldesk::notify::{Alert, Notification};
use schooldesk::record::{records_from_values, Record};
use schooldesk::storage::StorageError;
use schooldesk::ui::core::{Component, DialogType, EventType};
use schooldesk::ui::AppComponent;
use schooldesk::views::ViewKind;
use serde_json::{json, Map, Value};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

#[derive(Default)]
struct CannedBackend {
    token: Mutex<bool>,
    calls: Mutex<Vec<String>>,
    /// When set, deletes behave like a request rejected with 401
    expire_on_delete: Mutex<Option<mpsc::UnboundedSender<Notification>>>,
}

impl CannedBackend {
    fn signed_in() -> Self {
        Self {
            token: Mutex::new(true),
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AdminBackend for CannedBackend {
    async fn list(
        &self,
        path: &ApiPath,
        _page: Pagination,
        _query: Vec<(&'static str, String)>,
    ) -> Result<Vec<Record>, ApiError> {
        self.calls.lock().unwrap().push(format!("GET {}", path));
        Ok(records_from_values(vec![
            json!({"id": 11, "first_name": "Amina"}),
            json!({"id": 12, "first_name": "Tomas"}),
        ]))
    }

    async fn create(&self, path: &ApiPath, _payload: Map<String, Value>) -> Result<Value, ApiError> {
        self.calls.lock().unwrap().push(format!("POST {}", path));
        Ok(Value::Null)
    }

    async fn update(&self, _path: &ApiPath, _id: &str, _payload: Map<String, Value>) -> Result<Value, ApiError> {
        Ok(Value::Null)
    }

    async fn delete(&self, path: &ApiPath, id: &str) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(format!("DELETE {}/{}", path, id));
        if let Some(tx) = self.expire_on_delete.lock().unwrap().as_ref() {
            *self.token.lock().unwrap() = false;
            tx.send(Notification::TokenExpired).unwrap();
            tx.send(Notification::GlobalAlert(Alert::error("Could not validate credentials")))
                .unwrap();
            return Err(ApiError::Http {
                status: 401,
                message: "Could not validate credentials".to_string(),
                body: None,
            });
        }
        Ok(())
    }

    async fn activate(&self, _path: &ApiPath, _id: &str) -> Result<Value, ApiError> {
        Ok(Value::Null)
    }

    async fn login(&self, _username: &str, password: &str) -> Result<(), ApiError> {
        if password == "secret" {
            *self.token.lock().unwrap() = true;
            Ok(())
        } else {
            Err(ApiError::Http {
                status: 401,
                message: "Incorrect username or password".to_string(),
                body: None,
            })
        }
    }

    fn logout(&self) -> Result<(), StorageError> {
        *self.token.lock().unwrap() = false;
        Ok(())
    }

    fn has_token(&self) -> bool {
        *self.token.lock().unwrap()
    }
}

fn key(code: KeyCode) -> EventType {
    EventType::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn app_with(backend: Arc<CannedBackend>, view: ViewKind) -> (AppComponent, mpsc::UnboundedSender<Notification>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (AppComponent::new(backend, rx, view, 100, 24), tx)
}

/// Feed background results back into the app until `done` holds
async fn pump(app: &mut AppComponent, done: impl Fn(&AppComponent) -> bool) {
    for _ in 0..200 {
        for action in app.process_background_actions() {
            let action = app.update(action);
            app.handle_app_action(action).await;
        }
        if done(app) {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    panic!("app did not settle");
}

fn loaded(app: &AppComponent) -> bool {
    matches!(app.view_state(), LoadState::Loaded(_))
}

#[tokio::test]
async fn test_startup_without_token_asks_for_login() {
    let backend = Arc::new(CannedBackend::default());
    let (mut app, _tx) = app_with(backend.clone(), ViewKind::Users);

    app.start();

    assert_eq!(app.current_dialog(), Some(&DialogType::Login { reason: None }));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_login_then_load() {
    let backend = Arc::new(CannedBackend::default());
    let (mut app, _tx) = app_with(backend.clone(), ViewKind::Users);
    app.start();

    for c in "admin".chars() {
        app.handle_event(key(KeyCode::Char(c))).await.unwrap();
    }
    app.handle_event(key(KeyCode::Tab)).await.unwrap();
    for c in "secret".chars() {
        app.handle_event(key(KeyCode::Char(c))).await.unwrap();
    }
    app.handle_event(key(KeyCode::Enter)).await.unwrap();

    pump(&mut app, loaded).await;
    assert!(app.current_dialog().is_none());
    assert_eq!(backend.calls(), vec!["GET /api/v1/users".to_string()]);
}

#[tokio::test]
async fn test_failed_login_reopens_dialog_with_reason() {
    let backend = Arc::new(CannedBackend::default());
    let (mut app, _tx) = app_with(backend, ViewKind::Users);
    app.start();

    app.handle_event(key(KeyCode::Char('a'))).await.unwrap();
    app.handle_event(key(KeyCode::Tab)).await.unwrap();
    app.handle_event(key(KeyCode::Char('x'))).await.unwrap();
    app.handle_event(key(KeyCode::Enter)).await.unwrap();

    pump(&mut app, |app| app.current_dialog().is_some()).await;
    assert_eq!(
        app.current_dialog(),
        Some(&DialogType::Login {
            reason: Some("Incorrect username or password".to_string())
        })
    );
}

#[tokio::test]
async fn test_child_view_follows_parent_selection() {
    let backend = Arc::new(CannedBackend::signed_in());
    let (mut app, _tx) = app_with(backend.clone(), ViewKind::StudentFees);
    app.start();

    pump(&mut app, |app| !app.view_state().is_loading()).await;
    assert_eq!(app.view_state(), &LoadState::NeedsParent(ViewKind::Students));

    // Students, pick the second row, then back to its fees
    app.handle_event(key(KeyCode::Char('K'))).await.unwrap();
    assert_eq!(app.current_view(), ViewKind::Students);
    pump(&mut app, loaded).await;
    app.handle_event(key(KeyCode::Char('j'))).await.unwrap();
    app.handle_event(key(KeyCode::Char('J'))).await.unwrap();
    pump(&mut app, loaded).await;

    assert_eq!(app.current_view(), ViewKind::StudentFees);
    assert_eq!(
        backend.calls(),
        vec![
            "GET /api/v1/students".to_string(),
            "GET /api/v1/students/12/fees".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_delete_confirms_then_reloads() {
    let backend = Arc::new(CannedBackend::signed_in());
    let (mut app, _tx) = app_with(backend.clone(), ViewKind::Roles);
    app.start();
    pump(&mut app, loaded).await;

    app.handle_event(key(KeyCode::Char('d'))).await.unwrap();
    assert_eq!(
        app.current_dialog(),
        Some(&DialogType::DeleteConfirmation {
            kind: ViewKind::Roles,
            record_id: "11".to_string()
        })
    );
    app.handle_event(key(KeyCode::Enter)).await.unwrap();

    pump(&mut app, |_| backend.calls().len() == 3).await;
    pump(&mut app, loaded).await;
    assert_eq!(
        backend.calls(),
        vec![
            "GET /api/v1/auth/roles".to_string(),
            "DELETE /api/v1/auth/roles/11".to_string(),
            "GET /api/v1/auth/roles".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_expired_session_opens_login_once() {
    let backend = Arc::new(CannedBackend::signed_in());
    let (mut app, tx) = app_with(backend, ViewKind::Users);
    app.start();
    pump(&mut app, loaded).await;

    tx.send(Notification::TokenExpired).unwrap();
    tx.send(Notification::GlobalAlert(Alert::error("Could not validate credentials")))
        .unwrap();
    tx.send(Notification::TokenExpired).unwrap();
    pump(&mut app, |app| app.current_dialog().is_some()).await;

    assert_eq!(
        app.current_dialog(),
        Some(&DialogType::Login {
            reason: Some(ERROR_SESSION_EXPIRED.to_string())
        })
    );
}

#[tokio::test]
async fn test_unauthorized_mutation_keeps_login_dialog() {
    let backend = Arc::new(CannedBackend::signed_in());
    let (mut app, tx) = app_with(backend.clone(), ViewKind::Roles);
    *backend.expire_on_delete.lock().unwrap() = Some(tx);
    app.start();
    pump(&mut app, loaded).await;

    app.handle_event(key(KeyCode::Char('d'))).await.unwrap();
    app.handle_event(key(KeyCode::Enter)).await.unwrap();
    pump(&mut app, |app| app.current_dialog().is_some()).await;
    // Let the failed mutation report back as well
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    pump(&mut app, |_| true).await;

    assert_eq!(
        app.current_dialog(),
        Some(&DialogType::Login {
            reason: Some(ERROR_SESSION_EXPIRED.to_string())
        })
    );
    assert!(!backend.has_token());
}

#[tokio::test]
async fn test_logout_clears_session() {
    let backend = Arc::new(CannedBackend::signed_in());
    let (mut app, _tx) = app_with(backend.clone(), ViewKind::Users);
    app.start();
    pump(&mut app, loaded).await;

    app.handle_event(key(KeyCode::Char('L'))).await.unwrap();

    assert!(!backend.has_token());
    assert_eq!(app.view_state(), &LoadState::Idle);
    assert_eq!(app.current_dialog(), Some(&DialogType::Login { reason: None }));
}

#[tokio::test]
async fn test_stale_load_is_ignored() {
    let backend = Arc::new(CannedBackend::signed_in());
    let (mut app, _tx) = app_with(backend, ViewKind::Users);
    app.start();
    pump(&mut app, loaded).await;

    app.handle_app_action(schooldesk::ui::core::Action::ViewLoaded {
        generation: 0,
        kind: ViewKind::Users,
        state: LoadState::Failed("late".to_string()),
    })
    .await;

    assert!(loaded(&app));
}

#[tokio::test]
async fn test_quit_keys() {
    let backend = Arc::new(CannedBackend::signed_in());
    let (mut app, _tx) = app_with(backend, ViewKind::Users);

    app.handle_event(EventType::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)))
        .await
        .unwrap();
    assert!(app.should_quit());
}
