//! Layout management and calculations

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Manages layout calculations and constraints for the UI
pub struct LayoutManager;

impl LayoutManager {
    /// Split the screen into the body and a one-line status bar
    #[must_use]
    pub fn main_layout(area: Rect) -> (Rect, Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);
        (chunks[0], chunks[1])
    }

    /// Sidebar on the left, content on the right.
    ///
    /// The sidebar never takes more than a third of the screen.
    #[must_use]
    pub fn body_layout(area: Rect, sidebar_width: u16) -> (Rect, Rect) {
        let sidebar_width = sidebar_width.min(area.width / 3);
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(sidebar_width), Constraint::Min(0)])
            .split(area);
        (chunks[0], chunks[1])
    }

    /// Calculate a centered rectangle within the given area
    #[must_use]
    pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
        let popup_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ])
            .split(r);

        Self::centered_columns(percent_x, popup_layout[1])
    }

    /// Calculate a centered rectangle with percentage width and fixed line height
    #[must_use]
    pub fn centered_rect_lines(percent_x: u16, height_lines: u16, r: Rect) -> Rect {
        let popup_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(height_lines.min(r.height)),
                Constraint::Min(0),
            ])
            .split(r);

        Self::centered_columns(percent_x, popup_layout[1])
    }

    fn centered_columns(percent_x: u16, r: Rect) -> Rect {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ])
            .split(r)[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_bar_takes_last_line() {
        let (body, status) = LayoutManager::main_layout(Rect::new(0, 0, 100, 40));
        assert_eq!(body.height, 39);
        assert_eq!(status, Rect::new(0, 39, 100, 1));
    }

    #[test]
    fn test_sidebar_capped_at_a_third() {
        let (sidebar, content) = LayoutManager::body_layout(Rect::new(0, 0, 60, 20), 30);
        assert_eq!(sidebar.width, 20);
        assert_eq!(content.width, 40);

        let (sidebar, _) = LayoutManager::body_layout(Rect::new(0, 0, 200, 20), 24);
        assert_eq!(sidebar.width, 24);
    }

    #[test]
    fn test_centered_rect_lines_fits_small_screens() {
        let area = Rect::new(0, 0, 80, 5);
        let popup = LayoutManager::centered_rect_lines(50, 12, area);
        assert!(popup.height <= area.height);
        assert_eq!(popup.width, 40);
    }
}
