//! Modal dialog component for record forms, confirmations and system panels.
//!
//! One component renders every modal: create/edit forms generated from a
//! view's form fields, the bulk-assign form, delete and activate
//! confirmations, the login form, info/error messages, help and logs.

use crate::constants::{ERROR_INVALID_ID_LIST, ERROR_NO_SELECTION};
use crate::fetch::Mutation;
use crate::logger::Logger;
use crate::ui::components::dialogs::form_dialogs::{self, FormRow};
use crate::ui::components::dialogs::{system_dialogs, DialogScroll};
use crate::ui::core::{
    actions::{Action, DialogType, FormMode},
    Component,
};
use crate::views::FieldKind;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{layout::Rect, style::Color, Frame};

const LOGIN_FIELDS: [(&str, bool); 2] = [("Username", false), ("Password", true)];

pub struct DialogComponent {
    pub dialog_type: Option<DialogType>,
    pub inputs: Vec<String>,
    pub active_field: usize,
    pub cursor_position: usize,
    /// Inline validation error or login reason
    pub note: Option<String>,
    scroll: DialogScroll,
    logger: Option<Logger>,
}

impl Default for DialogComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogComponent {
    pub fn new() -> Self {
        Self {
            dialog_type: None,
            inputs: Vec::new(),
            active_field: 0,
            cursor_position: 0,
            note: None,
            scroll: DialogScroll::default(),
            logger: None,
        }
    }

    pub fn set_logger(&mut self, logger: Logger) {
        self.logger = Some(logger);
    }

    pub fn is_visible(&self) -> bool {
        self.dialog_type.is_some()
    }

    pub fn is_login(&self) -> bool {
        matches!(self.dialog_type, Some(DialogType::Login { .. }))
    }

    fn field_count(&self) -> usize {
        match &self.dialog_type {
            Some(DialogType::RecordForm { kind, .. }) => kind.spec().form.len(),
            Some(DialogType::Assign { .. }) => 1,
            Some(DialogType::Login { .. }) => LOGIN_FIELDS.len(),
            _ => 0,
        }
    }

    fn open(&mut self, dialog_type: DialogType) {
        self.clear_dialog();
        self.dialog_type = Some(dialog_type.clone());
        self.inputs = vec![String::new(); self.field_count()];

        match dialog_type {
            DialogType::RecordForm { initial, .. } => {
                for (input, value) in self.inputs.iter_mut().zip(initial) {
                    *input = value;
                }
            }
            DialogType::Login { reason } => {
                self.note = reason;
            }
            _ => {}
        }
        self.cursor_position = self.current_input().chars().count();
    }

    fn clear_dialog(&mut self) {
        self.dialog_type = None;
        self.inputs.clear();
        self.active_field = 0;
        self.cursor_position = 0;
        self.note = None;
        self.scroll.reset();
    }

    fn current_input(&self) -> &str {
        self.inputs.get(self.active_field).map(String::as_str).unwrap_or("")
    }

    fn focus_field(&mut self, index: usize) {
        if self.inputs.is_empty() {
            return;
        }
        self.active_field = index % self.inputs.len();
        self.cursor_position = self.current_input().chars().count();
    }

    fn byte_position(&self) -> usize {
        self.current_input()
            .chars()
            .take(self.cursor_position)
            .map(|ch| ch.len_utf8())
            .sum()
    }

    fn insert_char(&mut self, c: char) {
        let byte_pos = self.byte_position();
        if let Some(input) = self.inputs.get_mut(self.active_field) {
            input.insert(byte_pos, c);
            self.cursor_position += 1;
        }
    }

    fn backspace(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        self.cursor_position -= 1;
        let byte_pos = self.byte_position();
        if let Some(input) = self.inputs.get_mut(self.active_field) {
            input.remove(byte_pos);
        }
    }

    fn delete_char(&mut self) {
        if self.cursor_position >= self.current_input().chars().count() {
            return;
        }
        let byte_pos = self.byte_position();
        if let Some(input) = self.inputs.get_mut(self.active_field) {
            input.remove(byte_pos);
        }
    }

    fn handle_submit(&mut self) -> Action {
        let action = match &self.dialog_type {
            Some(DialogType::RecordForm {
                kind, mode, record_id, ..
            }) => match kind.spec().build_payload(&self.inputs) {
                Ok(payload) => match (mode, record_id) {
                    (FormMode::Create, _) => Action::Mutate(Mutation::Create(payload)),
                    (FormMode::Edit, Some(id)) => Action::Mutate(Mutation::Update {
                        id: id.clone(),
                        payload,
                    }),
                    (FormMode::Edit, None) => {
                        self.note = Some(ERROR_NO_SELECTION.to_string());
                        return Action::None;
                    }
                },
                Err(message) => {
                    self.note = Some(message);
                    return Action::None;
                }
            },
            Some(DialogType::Assign { kind }) => {
                let ids = self.inputs.first().cloned().unwrap_or_default();
                if kind.spec().build_assignment(&ids).is_none() {
                    self.note = Some(ERROR_INVALID_ID_LIST.to_string());
                    return Action::None;
                }
                Action::Mutate(Mutation::Assign { ids })
            }
            Some(DialogType::DeleteConfirmation { record_id, .. }) => Action::Mutate(Mutation::Delete {
                id: record_id.clone(),
            }),
            Some(DialogType::ActivateConfirmation { record_id, .. }) => Action::Mutate(Mutation::Activate {
                id: record_id.clone(),
            }),
            Some(DialogType::Login { .. }) => {
                let username = self.inputs.first().map(|u| u.trim().to_string()).unwrap_or_default();
                let password = self.inputs.get(1).cloned().unwrap_or_default();
                if username.is_empty() || password.is_empty() {
                    self.note = Some("Username and password are required".to_string());
                    return Action::None;
                }
                Action::Login { username, password }
            }
            _ => return Action::None,
        };

        self.clear_dialog();
        action
    }

    fn handle_scroll_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll.up(),
            KeyCode::Down | KeyCode::Char('j') => self.scroll.down(),
            KeyCode::PageUp => self.scroll.page_up(),
            KeyCode::PageDown => self.scroll.page_down(),
            KeyCode::Home => self.scroll.top(),
            KeyCode::End => self.scroll.bottom(),
            _ => return false,
        }
        true
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => Action::HideDialog,
            KeyCode::Enter => self.handle_submit(),
            KeyCode::Tab | KeyCode::Down => {
                self.focus_field(self.active_field + 1);
                Action::None
            }
            KeyCode::BackTab | KeyCode::Up => {
                let count = self.inputs.len().max(1);
                self.focus_field(self.active_field + count - 1);
                Action::None
            }
            KeyCode::Char(c) => {
                self.insert_char(c);
                Action::None
            }
            KeyCode::Backspace => {
                self.backspace();
                Action::None
            }
            KeyCode::Delete => {
                self.delete_char();
                Action::None
            }
            KeyCode::Left => {
                self.cursor_position = self.cursor_position.saturating_sub(1);
                Action::None
            }
            KeyCode::Right => {
                if self.cursor_position < self.current_input().chars().count() {
                    self.cursor_position += 1;
                }
                Action::None
            }
            _ => Action::None,
        }
    }

    fn render_form(&self, f: &mut Frame, rect: Rect, title: &str, labels: &[(&str, bool)], theme_color: Color) {
        let rows: Vec<FormRow<'_>> = labels
            .iter()
            .zip(&self.inputs)
            .map(|((label, masked), value)| FormRow {
                label: *label,
                value: value.as_str(),
                masked: *masked,
            })
            .collect();
        form_dialogs::render_form_dialog(
            f,
            rect,
            title,
            &rows,
            self.active_field,
            self.note.as_deref(),
            theme_color,
        );
    }
}

impl Component for DialogComponent {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        match &self.dialog_type {
            None => Action::None,
            Some(DialogType::Info(_)) | Some(DialogType::Error(_)) => {
                if self.handle_scroll_key(key) {
                    Action::None
                } else {
                    // Any other key dismisses the dialog
                    Action::HideDialog
                }
            }
            Some(DialogType::Help) => match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Action::HideDialog,
                _ => {
                    self.handle_scroll_key(key);
                    Action::None
                }
            },
            Some(DialogType::Logs) => match key.code {
                KeyCode::Esc | KeyCode::Char('G') | KeyCode::Char('q') => Action::HideDialog,
                _ => {
                    self.handle_scroll_key(key);
                    Action::None
                }
            },
            Some(DialogType::DeleteConfirmation { .. }) | Some(DialogType::ActivateConfirmation { .. }) => {
                match key.code {
                    KeyCode::Esc => Action::HideDialog,
                    KeyCode::Enter => self.handle_submit(),
                    _ => Action::None,
                }
            }
            Some(DialogType::RecordForm { .. }) | Some(DialogType::Assign { .. }) | Some(DialogType::Login { .. }) => {
                self.handle_input_key(key)
            }
        }
    }

    fn update(&mut self, action: Action) -> Action {
        match action {
            Action::ShowDialog(dialog_type) => {
                self.open(dialog_type);
                Action::None
            }
            Action::HideDialog => {
                self.clear_dialog();
                Action::None
            }
            _ => action,
        }
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let Some(dialog_type) = self.dialog_type.clone() else {
            return;
        };

        match dialog_type {
            DialogType::RecordForm { kind, mode, .. } => {
                let spec = kind.spec();
                let title = match mode {
                    FormMode::Create => format!(" New record - {} ", spec.title),
                    FormMode::Edit => format!(" Edit record - {} ", spec.title),
                };
                let labels: Vec<(&str, bool)> = spec
                    .form
                    .iter()
                    .map(|field| (field.label, field.kind == FieldKind::Secret))
                    .collect();
                self.render_form(f, rect, &title, &labels, Color::Cyan);
            }
            DialogType::Assign { kind } => {
                let spec = kind.spec();
                let title = format!(" Assign - {} ", spec.title);
                let label = spec.form.first().map(|field| field.label).unwrap_or("IDs");
                self.render_form(f, rect, &title, &[(label, false)], Color::Cyan);
            }
            DialogType::Login { .. } => {
                self.render_form(f, rect, " 🔑 Log in ", &LOGIN_FIELDS, Color::Green);
            }
            DialogType::DeleteConfirmation { kind, record_id } => {
                let message = format!("Delete record {} from {}?", record_id, kind.title());
                system_dialogs::render_confirmation_dialog(f, rect, " ⚠ Confirm Delete ", &message, Color::Red);
            }
            DialogType::ActivateConfirmation { kind, record_id } => {
                let message = format!("Activate record {} from {}?", record_id, kind.title());
                system_dialogs::render_confirmation_dialog(f, rect, " Confirm Activation ", &message, Color::Green);
            }
            DialogType::Info(message) => {
                system_dialogs::render_message_dialog(f, rect, " ℹ Info ", &message, Color::Blue, &mut self.scroll);
            }
            DialogType::Error(message) => {
                system_dialogs::render_message_dialog(f, rect, " ⚠ Error ", &message, Color::Red, &mut self.scroll);
            }
            DialogType::Help => system_dialogs::render_help_dialog(f, rect, &mut self.scroll),
            DialogType::Logs => {
                let logs = self.logger.as_ref().map(Logger::get_logs).unwrap_or_default();
                system_dialogs::render_logs_dialog(f, rect, &logs, &mut self.scroll);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::ViewKind;
    use crossterm::event::KeyModifiers;
    use serde_json::json;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(dialog: &mut DialogComponent, text: &str) {
        for c in text.chars() {
            dialog.handle_key_events(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_create_form_builds_payload() {
        let mut dialog = DialogComponent::new();
        dialog.update(Action::ShowDialog(DialogType::RecordForm {
            kind: ViewKind::Roles,
            mode: FormMode::Create,
            record_id: None,
            initial: Vec::new(),
        }));

        type_text(&mut dialog, "Teacher");
        dialog.handle_key_events(key(KeyCode::Tab));
        type_text(&mut dialog, "Class teachers");

        match dialog.handle_key_events(key(KeyCode::Enter)) {
            Action::Mutate(Mutation::Create(payload)) => {
                assert_eq!(
                    serde_json::Value::Object(payload),
                    json!({"name": "Teacher", "description": "Class teachers"})
                );
            }
            other => panic!("unexpected action {:?}", other),
        }
        assert!(!dialog.is_visible());
    }

    #[test]
    fn test_edit_form_is_prefilled() {
        let mut dialog = DialogComponent::new();
        dialog.update(Action::ShowDialog(DialogType::RecordForm {
            kind: ViewKind::Roles,
            mode: FormMode::Edit,
            record_id: Some("4".to_string()),
            initial: vec!["Admin".to_string(), "".to_string()],
        }));
        assert_eq!(dialog.cursor_position, 5);

        type_text(&mut dialog, "s");

        match dialog.handle_key_events(key(KeyCode::Enter)) {
            Action::Mutate(Mutation::Update { id, payload }) => {
                assert_eq!(id, "4");
                assert_eq!(serde_json::Value::Object(payload), json!({"name": "Admins"}));
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_invalid_form_stays_open_with_note() {
        let mut dialog = DialogComponent::new();
        dialog.update(Action::ShowDialog(DialogType::RecordForm {
            kind: ViewKind::Roles,
            mode: FormMode::Create,
            record_id: None,
            initial: Vec::new(),
        }));

        assert!(matches!(dialog.handle_key_events(key(KeyCode::Enter)), Action::None));
        assert!(dialog.is_visible());
        assert!(dialog.note.is_some());
    }

    #[test]
    fn test_assign_rejects_empty_list() {
        let mut dialog = DialogComponent::new();
        dialog.update(Action::ShowDialog(DialogType::Assign {
            kind: ViewKind::RolePermissions,
        }));
        type_text(&mut dialog, " , ");
        assert!(matches!(dialog.handle_key_events(key(KeyCode::Enter)), Action::None));
        assert_eq!(dialog.note.as_deref(), Some(ERROR_INVALID_ID_LIST));

        dialog.handle_key_events(key(KeyCode::Backspace));
        type_text(&mut dialog, "5");
        assert!(matches!(
            dialog.handle_key_events(key(KeyCode::Enter)),
            Action::Mutate(Mutation::Assign { .. })
        ));
    }

    #[test]
    fn test_login_collects_credentials() {
        let mut dialog = DialogComponent::new();
        dialog.update(Action::ShowDialog(DialogType::Login {
            reason: Some("Session expired".to_string()),
        }));
        assert!(dialog.is_login());
        assert_eq!(dialog.note.as_deref(), Some("Session expired"));

        type_text(&mut dialog, "admin");
        dialog.handle_key_events(key(KeyCode::Tab));
        type_text(&mut dialog, "pä55");

        match dialog.handle_key_events(key(KeyCode::Enter)) {
            Action::Login { username, password } => {
                assert_eq!(username, "admin");
                assert_eq!(password, "pä55");
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_delete_confirmation() {
        let mut dialog = DialogComponent::new();
        dialog.update(Action::ShowDialog(DialogType::DeleteConfirmation {
            kind: ViewKind::Users,
            record_id: "9".to_string(),
        }));
        assert!(matches!(dialog.handle_key_events(key(KeyCode::Char('y'))), Action::None));
        assert!(matches!(
            dialog.handle_key_events(key(KeyCode::Enter)),
            Action::Mutate(Mutation::Delete { ref id }) if id == "9"
        ));
    }

    #[test]
    fn test_editing_multibyte_input() {
        let mut dialog = DialogComponent::new();
        dialog.update(Action::ShowDialog(DialogType::Assign {
            kind: ViewKind::RolePermissions,
        }));
        type_text(&mut dialog, "éa");
        dialog.handle_key_events(key(KeyCode::Left));
        dialog.handle_key_events(key(KeyCode::Backspace));
        assert_eq!(dialog.inputs[0], "a");
        dialog.handle_key_events(key(KeyCode::Delete));
        assert_eq!(dialog.inputs[0], "");
    }
}
