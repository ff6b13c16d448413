//! Generic record table shared by every admin view.
//!
//! What the table shows and which keys do something is decided by the
//! current view's [`ViewSpec`](crate::views::ViewSpec). Attendance uses the
//! same component but draws a month calendar instead of rows.

use crate::api::Pagination;
use crate::attendance::AttendanceMonth;
use crate::constants::{ERROR_NO_SELECTION, HINT_LOADING, HINT_NO_DATA};
use crate::fetch::{select_parent_hint, LoadState, ViewQuery};
use crate::record::Record;
use crate::ui::components::attendance_calendar;
use crate::ui::components::scrollbar_helper::ScrollbarHelper;
use crate::ui::core::{
    actions::{Action, DialogType, FormMode},
    Component,
};
use crate::utils::datetime;
use crate::views::{FieldKind, Presentation, ViewAction, ViewKind};
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{block::BorderType, Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

pub struct ResourceTableComponent {
    pub kind: ViewKind,
    pub state: LoadState,
    pub selected_index: usize,
    pub page: Pagination,
    /// Month shown by calendar views
    pub month: NaiveDate,
    /// Selected record of the parent view, for scoped views
    pub parent_id: Option<String>,
    table_state: TableState,
    scrollbar_helper: ScrollbarHelper,
}

impl ResourceTableComponent {
    pub fn new(kind: ViewKind, page_size: u32) -> Self {
        Self {
            kind,
            state: LoadState::Idle,
            selected_index: 0,
            page: Pagination::new(page_size),
            month: datetime::current_month(),
            parent_id: None,
            table_state: TableState::default(),
            scrollbar_helper: ScrollbarHelper::new(),
        }
    }

    /// Switch to another view, back on its first page
    pub fn set_view(&mut self, kind: ViewKind, parent_id: Option<String>) {
        self.kind = kind;
        self.parent_id = parent_id;
        self.page = Pagination::new(self.page.limit);
        self.selected_index = 0;
        self.state = LoadState::Idle;
        self.update_table_state();
    }

    pub fn set_state(&mut self, state: LoadState) {
        self.state = state;
        self.update_table_state();
    }

    pub fn query(&self) -> ViewQuery {
        ViewQuery::new(self.kind, self.page)
            .with_parent(self.parent_id.clone())
            .with_month(Some(self.month))
    }

    pub fn selected_record(&self) -> Option<&Record> {
        self.state.records().get(self.selected_index)
    }

    pub fn selected_id(&self) -> Option<String> {
        self.selected_record()
            .and_then(|record| record.id(self.kind.spec().id_field))
    }

    fn update_table_state(&mut self) {
        let len = self.state.records().len();
        if len == 0 {
            self.selected_index = 0;
            self.table_state.select(None);
        } else {
            self.selected_index = self.selected_index.min(len - 1);
            self.table_state.select(Some(self.selected_index));
        }
    }

    fn is_calendar(&self) -> bool {
        self.kind.spec().presentation == Presentation::Calendar
    }

    fn missing_parent(&self) -> bool {
        self.kind.spec().parent.is_some() && self.parent_id.is_none()
    }

    fn create_action(&self) -> Action {
        let spec = self.kind.spec();
        if self.missing_parent() {
            return Action::ShowDialog(DialogType::Info(select_parent_hint(spec.parent)));
        }
        if spec.supports(ViewAction::Assign) {
            Action::ShowDialog(DialogType::Assign { kind: self.kind })
        } else if spec.supports(ViewAction::Create) {
            Action::ShowDialog(DialogType::RecordForm {
                kind: self.kind,
                mode: FormMode::Create,
                record_id: None,
                initial: Vec::new(),
            })
        } else {
            Action::None
        }
    }

    fn edit_action(&self) -> Action {
        let spec = self.kind.spec();
        if !spec.supports(ViewAction::Edit) {
            return Action::None;
        }
        let (Some(record), Some(record_id)) = (self.selected_record(), self.selected_id()) else {
            return Action::ShowDialog(DialogType::Error(ERROR_NO_SELECTION.to_string()));
        };

        let initial = spec
            .form
            .iter()
            .map(|field| match field.kind {
                FieldKind::Secret => String::new(),
                _ => record.input_value(field.key),
            })
            .collect();

        Action::ShowDialog(DialogType::RecordForm {
            kind: self.kind,
            mode: FormMode::Edit,
            record_id: Some(record_id),
            initial,
        })
    }

    fn record_action(&self, action: ViewAction) -> Action {
        if !self.kind.spec().supports(action) {
            return Action::None;
        }
        let Some(record_id) = self.selected_id() else {
            return Action::ShowDialog(DialogType::Error(ERROR_NO_SELECTION.to_string()));
        };
        let kind = self.kind;
        match action {
            ViewAction::Delete => Action::ShowDialog(DialogType::DeleteConfirmation { kind, record_id }),
            ViewAction::Activate => Action::ShowDialog(DialogType::ActivateConfirmation { kind, record_id }),
            _ => Action::None,
        }
    }

    /// Status bar hints for the current view
    pub fn hints(&self) -> String {
        let spec = self.kind.spec();
        let mut hints: Vec<&str> = Vec::new();
        if self.is_calendar() {
            hints.push("←/→: month");
        } else {
            hints.push("j/k: move");
            hints.push("n/p: page");
        }
        if spec.supports(ViewAction::Assign) {
            hints.push("a: assign");
        } else if spec.supports(ViewAction::Create) {
            hints.push("a: new");
        }
        if spec.supports(ViewAction::Edit) {
            hints.push("e: edit");
        }
        if spec.supports(ViewAction::Delete) {
            hints.push("d: delete");
        }
        if spec.supports(ViewAction::Activate) {
            hints.push("Enter: activate");
        }
        hints.extend(["r: reload", "?: help", "q: quit"]);
        hints.join(" • ")
    }

    fn title(&self) -> String {
        let spec = self.kind.spec();
        let mut title = format!(" {} ", spec.title);
        if let (Some(parent), Some(parent_id)) = (spec.parent, &self.parent_id) {
            title.push_str(&format!("· {} #{} ", parent.title(), parent_id));
        }
        if !self.is_calendar() {
            title.push_str(&format!("· page {} ", self.page.page()));
        }
        title
    }

    fn render_message(f: &mut Frame, rect: Rect, block: Block<'_>, message: String, color: Color) {
        let paragraph = Paragraph::new(message)
            .block(block)
            .style(Style::default().fg(color))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, rect);
    }

    fn render_rows(&mut self, f: &mut Frame, rect: Rect, block: Block<'_>) {
        let spec = self.kind.spec();
        let records = self.state.records();

        let header = Row::new(spec.columns.iter().map(|column| Cell::from(column.title)))
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        let rows: Vec<Row> = records
            .iter()
            .map(|record| Row::new(spec.columns.iter().map(|column| Cell::from(record.display(column.field)))))
            .collect();
        let widths: Vec<Constraint> = spec
            .columns
            .iter()
            .map(|column| Constraint::Min(column.width))
            .collect();

        // Borders plus the header row
        let (table_area, scrollbar_area) = ScrollbarHelper::calculate_areas(rect, records.len(), 3);
        self.scrollbar_helper.update_state(
            records.len(),
            self.selected_index,
            rect.height.saturating_sub(3) as usize,
        );

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .column_spacing(1)
            .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

        f.render_stateful_widget(table, table_area, &mut self.table_state);
        self.scrollbar_helper.render(f, scrollbar_area);
    }
}

impl Component for ResourceTableComponent {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => Action::PreviousRow,
            KeyCode::Down | KeyCode::Char('j') => Action::NextRow,
            KeyCode::Char('n') => Action::NextPage,
            KeyCode::Char('p') => Action::PreviousPage,
            KeyCode::Left if self.is_calendar() => Action::PreviousMonth,
            KeyCode::Right if self.is_calendar() => Action::NextMonth,
            KeyCode::Char('a') => self.create_action(),
            KeyCode::Char('e') => self.edit_action(),
            KeyCode::Char('d') => self.record_action(ViewAction::Delete),
            KeyCode::Enter => self.record_action(ViewAction::Activate),
            _ => Action::None,
        }
    }

    /// Row and page movement; page and month changes come back as a refresh
    fn update(&mut self, action: Action) -> Action {
        let len = self.state.records().len();
        match action {
            Action::NextRow => {
                if len > 0 {
                    self.selected_index = (self.selected_index + 1) % len;
                    self.update_table_state();
                }
                Action::None
            }
            Action::PreviousRow => {
                if len > 0 {
                    self.selected_index = if self.selected_index == 0 {
                        len - 1
                    } else {
                        self.selected_index - 1
                    };
                    self.update_table_state();
                }
                Action::None
            }
            Action::NextPage => {
                // A short page is the last one
                if self.is_calendar() || (len as u32) < self.page.limit {
                    return Action::None;
                }
                self.page = self.page.next();
                self.selected_index = 0;
                Action::Refresh
            }
            Action::PreviousPage => {
                if self.is_calendar() || self.page.skip == 0 {
                    return Action::None;
                }
                self.page = self.page.previous();
                self.selected_index = 0;
                Action::Refresh
            }
            Action::NextMonth => {
                self.month = datetime::next_month(self.month);
                Action::Refresh
            }
            Action::PreviousMonth => {
                self.month = datetime::previous_month(self.month);
                Action::Refresh
            }
            _ => action,
        }
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(self.title());

        match &self.state {
            LoadState::Idle | LoadState::Loading => {
                Self::render_message(f, rect, block, HINT_LOADING.to_string(), Color::Yellow);
            }
            LoadState::NeedsParent(parent) => {
                let hint = select_parent_hint(Some(*parent));
                Self::render_message(f, rect, block, hint, Color::Gray);
            }
            LoadState::Failed(message) => {
                let message = format!("Could not load {}: {} (press r to retry)", self.kind.title(), message);
                Self::render_message(f, rect, block, message, Color::Red);
            }
            LoadState::Loaded(records) if self.is_calendar() => {
                let attendance = AttendanceMonth::from_records(self.month, records);
                attendance_calendar::render_calendar(f, rect, &attendance, block);
            }
            LoadState::Loaded(records) if records.is_empty() => {
                Self::render_message(f, rect, block, HINT_NO_DATA.to_string(), Color::Gray);
            }
            LoadState::Loaded(_) => self.render_rows(f, rect, block),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::records_from_values;
    use crossterm::event::KeyModifiers;
    use serde_json::json;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn loaded(values: Vec<serde_json::Value>) -> LoadState {
        LoadState::Loaded(records_from_values(values))
    }

    #[test]
    fn test_row_navigation_wraps() {
        let mut table = ResourceTableComponent::new(ViewKind::Roles, 10);
        table.set_state(loaded(vec![json!({"id": 1}), json!({"id": 2})]));

        table.update(Action::PreviousRow);
        assert_eq!(table.selected_id().as_deref(), Some("2"));
        table.update(Action::NextRow);
        assert_eq!(table.selected_id().as_deref(), Some("1"));
    }

    #[test]
    fn test_selection_is_clamped_after_reload() {
        let mut table = ResourceTableComponent::new(ViewKind::Roles, 10);
        table.set_state(loaded(vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 3})]));
        table.selected_index = 2;
        table.set_state(loaded(vec![json!({"id": 1})]));
        assert_eq!(table.selected_index, 0);
    }

    #[test]
    fn test_paging_only_past_full_pages() {
        let mut table = ResourceTableComponent::new(ViewKind::Users, 2);
        table.set_state(loaded(vec![json!({"id": 1})]));
        assert!(matches!(table.update(Action::NextPage), Action::None));

        table.set_state(loaded(vec![json!({"id": 1}), json!({"id": 2})]));
        assert!(matches!(table.update(Action::NextPage), Action::Refresh));
        assert_eq!(table.page.skip, 2);
        assert!(matches!(table.update(Action::PreviousPage), Action::Refresh));
        assert!(matches!(table.update(Action::PreviousPage), Action::None));
    }

    #[test]
    fn test_edit_prefills_form_without_secrets() {
        let mut table = ResourceTableComponent::new(ViewKind::Users, 10);
        table.set_state(loaded(vec![
            json!({"id": 5, "username": "amina", "email": "a@school.test", "is_active": true}),
        ]));

        match table.handle_key_events(key(KeyCode::Char('e'))) {
            Action::ShowDialog(DialogType::RecordForm {
                mode: FormMode::Edit,
                record_id,
                initial,
                ..
            }) => {
                assert_eq!(record_id.as_deref(), Some("5"));
                assert_eq!(initial[0], "amina");
                assert_eq!(initial[2], "a@school.test");
                assert_eq!(initial[3], "");
                assert_eq!(initial[6], "true");
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_keys_do_nothing() {
        let mut table = ResourceTableComponent::new(ViewKind::Permissions, 10);
        table.set_state(loaded(vec![json!({"id": 1})]));
        assert!(matches!(table.handle_key_events(key(KeyCode::Char('e'))), Action::None));
        assert!(matches!(table.handle_key_events(key(KeyCode::Enter)), Action::None));
        assert!(matches!(
            table.handle_key_events(key(KeyCode::Char('d'))),
            Action::ShowDialog(DialogType::DeleteConfirmation { .. })
        ));
    }

    #[test]
    fn test_scoped_create_needs_parent() {
        let mut table = ResourceTableComponent::new(ViewKind::StudentFees, 10);
        assert!(matches!(
            table.handle_key_events(key(KeyCode::Char('a'))),
            Action::ShowDialog(DialogType::Info(_))
        ));

        table.set_view(ViewKind::RolePermissions, Some("3".to_string()));
        assert!(matches!(
            table.handle_key_events(key(KeyCode::Char('a'))),
            Action::ShowDialog(DialogType::Assign { kind: ViewKind::RolePermissions })
        ));
    }

    #[test]
    fn test_calendar_months_trigger_refresh() {
        let mut table = ResourceTableComponent::new(ViewKind::Attendance, 10);
        table.month = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert!(matches!(table.handle_key_events(key(KeyCode::Left)), Action::PreviousMonth));
        assert!(matches!(table.update(Action::PreviousMonth), Action::Refresh));
        assert_eq!(table.month, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        assert_eq!(table.query().month, Some(table.month));
    }
}
