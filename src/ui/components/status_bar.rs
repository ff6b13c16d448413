//! Status bar component

use crate::constants::ALERT_DISPLAY_SECS;
use crate::notify::{Alert, Severity};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::{Block, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};

/// Bottom line: the latest global alert while it is fresh, otherwise
/// success messages, then key hints.
pub struct StatusBar {
    alert: Option<(Alert, Instant)>,
    info: Option<(String, Instant)>,
    display_for: Duration,
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            alert: None,
            info: None,
            display_for: Duration::from_secs(ALERT_DISPLAY_SECS),
        }
    }

    pub fn show_alert(&mut self, alert: Alert) {
        self.alert = Some((alert, Instant::now()));
    }

    pub fn show_info(&mut self, message: String) {
        self.info = Some((message, Instant::now()));
    }

    /// Alert still on screen, if any
    pub fn current_alert(&self) -> Option<&Alert> {
        self.alert
            .as_ref()
            .filter(|(_, shown_at)| shown_at.elapsed() < self.display_for)
            .map(|(alert, _)| alert)
    }

    pub fn current_info(&self) -> Option<&str> {
        self.info
            .as_ref()
            .filter(|(_, shown_at)| shown_at.elapsed() < self.display_for)
            .map(|(message, _)| message.as_str())
    }

    /// Render the status bar
    pub fn render(&self, f: &mut Frame, area: Rect, hints: &str, busy: bool) {
        let (status_text, status_color) = if let Some(alert) = self.current_alert() {
            let color = match alert.severity {
                Severity::Warning => Color::Yellow,
                Severity::Error => Color::Red,
            };
            (format!("[{}] {}", alert.severity, alert.message), color)
        } else if let Some(message) = self.current_info() {
            (message.to_string(), Color::Green)
        } else if busy {
            ("⟳ Working...".to_string(), Color::Yellow)
        } else {
            (hints.to_string(), Color::Gray)
        };

        let status_bar = Paragraph::new(status_text)
            .block(Block::default())
            .alignment(Alignment::Center)
            .style(Style::default().fg(status_color));

        f.render_widget(status_bar, area);
    }
}
