//! Sidebar listing every admin view.
//!
//! Child views are indented under the view whose selection scopes them.

use crate::ui::components::scrollbar_helper::ScrollbarHelper;
use crate::ui::core::{actions::Action, Component};
use crate::views::ViewKind;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{block::BorderType, Block, Borders, List, ListItem, ListState},
    Frame,
};

pub struct SidebarComponent {
    pub selection: ViewKind,
    list_state: ListState,
    scrollbar_helper: ScrollbarHelper,
}

impl SidebarComponent {
    pub fn new(selection: ViewKind) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(selection.index()));
        Self {
            selection,
            list_state,
            scrollbar_helper: ScrollbarHelper::new(),
        }
    }

    fn step(&self, forward: bool) -> ViewKind {
        let count = ViewKind::ALL.len();
        let index = self.selection.index();
        let next = if forward {
            (index + 1) % count
        } else {
            (index + count - 1) % count
        };
        ViewKind::ALL[next]
    }

    fn item_label(kind: ViewKind) -> String {
        match kind.spec().parent {
            Some(_) => format!("  └ {}", kind.title()),
            None => kind.title().to_string(),
        }
    }
}

impl Component for SidebarComponent {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('J') => Action::SelectView(self.step(true)),
            KeyCode::Char('K') => Action::SelectView(self.step(false)),
            _ => Action::None,
        }
    }

    fn update(&mut self, action: Action) -> Action {
        if let Action::SelectView(kind) = action {
            self.selection = kind;
            self.list_state.select(Some(kind.index()));
        }
        action
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let items: Vec<ListItem> = ViewKind::ALL
            .iter()
            .map(|kind| {
                let style = if kind.spec().parent.is_some() {
                    Style::default().fg(Color::Gray)
                } else {
                    Style::default().fg(Color::White)
                };
                ListItem::new(Self::item_label(*kind)).style(style)
            })
            .collect();

        let (list_area, scrollbar_area) = ScrollbarHelper::calculate_areas(rect, items.len(), 2);
        self.scrollbar_helper.update_state(
            items.len(),
            self.selection.index(),
            rect.height.saturating_sub(2) as usize,
        );

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(" Views "),
            )
            .highlight_style(Style::default().bg(Color::Blue).add_modifier(Modifier::BOLD));

        f.render_stateful_widget(list, list_area, &mut self.list_state);
        self.scrollbar_helper.render(f, scrollbar_area);
    }
}
