use crate::backend::AdminBackend;
use crate::constants::{ERROR_SESSION_EXPIRED, SUCCESS_LOGGED_IN, SUCCESS_LOGGED_OUT};
use crate::fetch::LoadState;
use crate::logger::Logger;
use crate::notify::Notification;
use crate::ui::components::{DialogComponent, ResourceTableComponent, SidebarComponent, StatusBar};
use crate::ui::core::{
    actions::{Action, DialogType},
    event_handler::EventType,
    task_manager::TaskManager,
    Component,
};
use crate::ui::layout::LayoutManager;
use crate::views::ViewKind;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{layout::Rect, Frame};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

pub struct AppComponent {
    // Component composition
    sidebar: SidebarComponent,
    table: ResourceTableComponent,
    dialog: DialogComponent,
    status_bar: StatusBar,

    // Services
    backend: Arc<dyn AdminBackend>,
    task_manager: TaskManager,
    background_action_rx: mpsc::UnboundedReceiver<Action>,
    notification_rx: mpsc::UnboundedReceiver<Notification>,
    logger: Logger,

    /// Selected record id per view, read by views scoped to that view
    parent_selections: HashMap<ViewKind, String>,
    /// Bumped on every load; results from older loads are dropped
    load_generation: u64,
    sidebar_width: u16,
    should_quit: bool,
}

impl AppComponent {
    pub fn new(
        backend: Arc<dyn AdminBackend>,
        notification_rx: mpsc::UnboundedReceiver<Notification>,
        initial_view: ViewKind,
        page_size: u32,
        sidebar_width: u16,
    ) -> Self {
        let (task_manager, background_action_rx) = TaskManager::new();
        let logger = Logger::new();
        let mut dialog = DialogComponent::new();
        dialog.set_logger(logger.clone());

        Self {
            sidebar: SidebarComponent::new(initial_view),
            table: ResourceTableComponent::new(initial_view, page_size),
            dialog,
            status_bar: StatusBar::new(),
            backend,
            task_manager,
            background_action_rx,
            notification_rx,
            logger,
            parent_selections: HashMap::new(),
            load_generation: 0,
            sidebar_width,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn current_view(&self) -> ViewKind {
        self.table.kind
    }

    pub fn view_state(&self) -> &LoadState {
        &self.table.state
    }

    pub fn current_dialog(&self) -> Option<&DialogType> {
        self.dialog.dialog_type.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.table.state.is_loading() || self.task_manager.task_count() > 0
    }

    /// Ask for credentials when no token is stored, otherwise load the first view
    pub fn start(&mut self) {
        if self.backend.has_token() {
            self.logger.log(format!("Startup: opening {}", self.table.kind.title()));
            self.load_current_view();
        } else {
            self.logger.log("Startup: no stored token, asking for login".to_string());
            self.show_dialog(DialogType::Login { reason: None });
        }
    }

    fn show_dialog(&mut self, dialog_type: DialogType) {
        self.dialog.update(Action::ShowDialog(dialog_type));
    }

    fn load_current_view(&mut self) {
        self.load_generation += 1;
        let query = self.table.query();
        self.logger.log(format!(
            "Load: {} page {} (generation {})",
            query.kind.title(),
            query.page.page(),
            self.load_generation
        ));
        self.table.set_state(LoadState::Loading);
        self.task_manager
            .spawn_load(self.backend.clone(), query, self.load_generation);
    }

    fn remember_selection(&mut self) {
        match self.table.selected_id() {
            Some(id) => {
                self.parent_selections.insert(self.table.kind, id);
            }
            None => {
                self.parent_selections.remove(&self.table.kind);
            }
        }
    }

    fn switch_view(&mut self, kind: ViewKind) {
        self.remember_selection();
        let parent_id = kind
            .spec()
            .parent
            .and_then(|parent| self.parent_selections.get(&parent).cloned());
        self.logger.log(format!(
            "Navigation: {} -> {} (parent {:?})",
            self.table.kind.title(),
            kind.title(),
            parent_id
        ));
        self.table.set_view(kind, parent_id);
        self.load_current_view();
    }

    /// Handle global keyboard shortcuts that aren't component-specific
    fn handle_global_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('q') => {
                self.logger.log("Global key: 'q' - quitting application".to_string());
                Action::Quit
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.logger.log("Global key: Ctrl+C - quitting application".to_string());
                Action::Quit
            }
            KeyCode::Char('?') => Action::ShowDialog(DialogType::Help),
            KeyCode::Char('G') => Action::ShowDialog(DialogType::Logs),
            KeyCode::Char('r') => {
                self.logger.log("Global key: 'r' - reloading view".to_string());
                Action::Refresh
            }
            KeyCode::Char('L') => Action::Logout,
            KeyCode::Esc => Action::Quit,
            _ => Action::None,
        }
    }

    /// Handle app-level actions that require business logic
    pub async fn handle_app_action(&mut self, action: Action) -> Action {
        match action {
            Action::Quit => {
                self.should_quit = true;
                Action::Quit
            }
            Action::SelectView(kind) => {
                self.switch_view(kind);
                Action::None
            }
            Action::Refresh => {
                self.load_current_view();
                Action::None
            }
            Action::ViewLoaded {
                generation,
                kind,
                state,
            } => {
                if generation != self.load_generation || kind != self.table.kind {
                    self.logger.log(format!(
                        "Load: dropping stale result for {} (generation {})",
                        kind.title(),
                        generation
                    ));
                    return Action::None;
                }
                match &state {
                    LoadState::Loaded(records) => self
                        .logger
                        .log(format!("Load: {} returned {} records", kind.title(), records.len())),
                    LoadState::Failed(message) => {
                        self.logger.log(format!("Load: {} failed: {}", kind.title(), message))
                    }
                    _ => {}
                }
                self.table.set_state(state);
                Action::None
            }
            Action::Mutate(mutation) => {
                self.logger
                    .log(format!("Mutation: {:?} on {}", mutation.action(), self.table.kind.title()));
                self.task_manager.spawn_mutation(
                    self.backend.clone(),
                    self.table.kind,
                    self.table.parent_id.clone(),
                    mutation,
                );
                Action::None
            }
            Action::MutationSucceeded(message) => {
                self.logger.log(format!("Mutation: {}", message));
                self.status_bar.show_info(message);
                self.load_current_view();
                Action::None
            }
            Action::MutationFailed(message) => {
                self.logger.log(format!("Mutation failed: {}", message));
                // An expired session already asked for credentials; the alert is in the status bar
                if !self.dialog.is_login() {
                    self.show_dialog(DialogType::Error(message));
                }
                Action::None
            }
            Action::Login { username, password } => {
                self.logger.log(format!("Session: logging in as {}", username));
                self.task_manager
                    .spawn_login(self.backend.clone(), username, password);
                Action::None
            }
            Action::LoginSucceeded => {
                self.status_bar.show_info(SUCCESS_LOGGED_IN.to_string());
                self.load_current_view();
                Action::None
            }
            Action::LoginFailed(reason) => {
                self.logger.log(format!("Session: login failed: {}", reason));
                self.show_dialog(DialogType::Login { reason: Some(reason) });
                Action::None
            }
            Action::Logout => {
                match self.backend.logout() {
                    Ok(()) => {
                        self.logger.log("Session: logged out".to_string());
                        self.parent_selections.clear();
                        self.table.set_state(LoadState::Idle);
                        self.status_bar.show_info(SUCCESS_LOGGED_OUT.to_string());
                        self.show_dialog(DialogType::Login { reason: None });
                    }
                    Err(e) => {
                        self.logger.log(format!("Session: logout failed: {}", e));
                        self.show_dialog(DialogType::Error(format!("Logout failed: {}", e)));
                    }
                }
                Action::None
            }
            Action::SessionExpired => {
                // Several requests can expire at once; one login dialog is enough
                if !self.dialog.is_login() {
                    self.logger.log("Session: token expired".to_string());
                    self.show_dialog(DialogType::Login {
                        reason: Some(ERROR_SESSION_EXPIRED.to_string()),
                    });
                }
                Action::None
            }
            Action::ShowAlert(alert) => {
                self.logger
                    .log(format!("Alert [{}]: {}", alert.severity, alert.message));
                self.status_bar.show_alert(alert);
                Action::None
            }
            Action::ShowDialog(dialog_type) => {
                self.show_dialog(dialog_type);
                Action::None
            }
            Action::HideDialog => {
                self.dialog.update(Action::HideDialog);
                Action::None
            }
            other => other,
        }
    }

    /// Drain results of background tasks and pending notifications
    pub fn process_background_actions(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();

        while let Ok(notification) = self.notification_rx.try_recv() {
            actions.push(match notification {
                Notification::TokenExpired => Action::SessionExpired,
                Notification::GlobalAlert(alert) => Action::ShowAlert(alert),
            });
        }

        while let Ok(action) = self.background_action_rx.try_recv() {
            actions.push(action);
        }

        let completed_tasks = self.task_manager.cleanup_finished_tasks();
        for task in &completed_tasks {
            log::debug!("Task {} ({}) finished in {:?}", task.id, task.description, task.started_at.elapsed());
        }

        actions
    }

    pub async fn handle_event(&mut self, event_type: EventType) -> anyhow::Result<()> {
        let action = match event_type {
            EventType::Key(key) => {
                if self.dialog.is_visible() {
                    // Dialog has priority when visible
                    self.dialog.handle_key_events(key)
                } else {
                    // Sidebar first (J/K), then the table, then global keys
                    let sidebar_action = self.sidebar.handle_key_events(key);
                    if !matches!(sidebar_action, Action::None) {
                        sidebar_action
                    } else {
                        let table_action = self.table.handle_key_events(key);
                        if !matches!(table_action, Action::None) {
                            table_action
                        } else {
                            self.handle_global_key(key)
                        }
                    }
                }
            }
            EventType::Resize(_, _) | EventType::Tick | EventType::Other => Action::None,
        };

        let action = self.update(action);
        self.handle_app_action(action).await;
        Ok(())
    }
}

impl Component for AppComponent {
    fn handle_key_events(&mut self, _key: KeyEvent) -> Action {
        // Key routing lives in handle_event
        Action::None
    }

    fn update(&mut self, action: Action) -> Action {
        let action = self.dialog.update(action);
        let action = self.sidebar.update(action);
        self.table.update(action)
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let (body, status) = LayoutManager::main_layout(rect);
        let (sidebar_area, content_area) = LayoutManager::body_layout(body, self.sidebar_width);

        self.sidebar.render(f, sidebar_area);
        self.table.render(f, content_area);
        self.status_bar
            .render(f, status, &self.table.hints(), self.is_busy());

        // Render dialog on top if visible
        if self.dialog.is_visible() {
            self.dialog.render(f, rect);
        }
    }
}
