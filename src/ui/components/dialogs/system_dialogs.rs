use super::common::{create_dialog_block, create_instructions_paragraph, shortcuts};
use super::scroll_behavior::DialogScroll;
use crate::constants::DIALOG_TITLE_LOGS;
use crate::ui::layout::LayoutManager;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, Wrap},
    Frame,
};

const HELP_TEXT: &str = r"
SCHOOLDESK - School administration console
==========================================

NAVIGATION
----------
J/K         Previous/next view in the sidebar
j/k ↑/↓     Move through records
n/p         Next/previous page
←/→         Previous/next month (attendance)
r           Reload the current view
Esc         Close dialog or quit

RECORDS
-------
a           Create a record (or assign permissions)
e           Edit the selected record
d           Delete the selected record (with confirmation)
Enter       Activate the selected candidate (probable staff/parents)

PARENT VIEWS
------------
Role permissions use the role selected in Roles.
Fees, facilities and attendance use the student selected in Students.

SESSION
-------
L           Log out and forget the stored token
q, Ctrl+C   Quit

DIALOGS
-------
?           Toggle this help
G           Show application logs
Tab/↓ ↑     Move between form fields
Enter       Submit form or confirm

Press 'Esc' or '?' to close this help panel
";

fn render_scrollbar(f: &mut Frame, area: Rect, scroll: &mut DialogScroll) {
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("↑"))
        .end_symbol(Some("↓"))
        .track_symbol(Some("│"))
        .thumb_symbol("▐")
        .style(Style::default().fg(Color::Gray))
        .thumb_style(Style::default().fg(Color::White));

    f.render_stateful_widget(scrollbar, area, &mut scroll.scrollbar_state);
}

/// Yes/no confirmation (delete, activate)
pub fn render_confirmation_dialog(f: &mut Frame, area: Rect, title: &str, message: &str, theme_color: Color) {
    let dialog_area = LayoutManager::centered_rect_lines(50, 6, area);
    f.render_widget(Clear, dialog_area);

    let block = create_dialog_block(title, theme_color);
    let inner = block.inner(dialog_area);
    f.render_widget(block, dialog_area);

    let chunks = Layout::vertical([Constraint::Length(2), Constraint::Length(1)]).split(inner);

    let message_paragraph = Paragraph::new(message.to_string())
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(message_paragraph, chunks[0]);

    let instructions = create_instructions_paragraph(&[
        shortcuts::ENTER_CONFIRM,
        shortcuts::SEPARATOR,
        shortcuts::ESC_CANCEL,
    ]);
    f.render_widget(instructions, chunks[1]);
}

/// Info and error messages; any key closes, j/k scroll long text
pub fn render_message_dialog(
    f: &mut Frame,
    area: Rect,
    title: &str,
    message: &str,
    theme_color: Color,
    scroll: &mut DialogScroll,
) {
    let dialog_area = LayoutManager::centered_rect_lines(60, 10, area);
    f.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .style(Style::default().fg(theme_color));

    let content_area = Rect::new(
        dialog_area.x + 1,
        dialog_area.y + 1,
        dialog_area.width.saturating_sub(2),
        dialog_area.height.saturating_sub(4),
    );
    let instructions_area = Rect::new(
        dialog_area.x + 1,
        dialog_area.y + dialog_area.height.saturating_sub(2),
        dialog_area.width.saturating_sub(2),
        1,
    );

    let lines: Vec<&str> = message.lines().collect();
    let visible_height = content_area.height as usize;
    let message_text = scroll.visible(&lines, visible_height).join("\n");

    let message_paragraph = Paragraph::new(message_text)
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });

    let instructions_paragraph = Paragraph::new("Press any key to continue • j/k to scroll if needed")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);

    f.render_widget(block, dialog_area);
    f.render_widget(message_paragraph, content_area);
    f.render_widget(instructions_paragraph, instructions_area);

    if lines.len() > visible_height {
        render_scrollbar(f, content_area, scroll);
    }
}

fn render_scrollable_panel(f: &mut Frame, area: Rect, title: &str, content: &str, scroll: &mut DialogScroll) {
    let panel_area = LayoutManager::centered_rect(90, 90, area);
    f.render_widget(Clear, panel_area);

    let margin_x = 2;
    let margin_y = 1;
    let content_area = Rect::new(
        panel_area.x + margin_x,
        panel_area.y + margin_y,
        panel_area.width.saturating_sub(margin_x * 2),
        panel_area.height.saturating_sub(margin_y * 2),
    );

    let lines: Vec<&str> = content.lines().collect();
    let visible_height = content_area.height.saturating_sub(2) as usize;
    let text = scroll.visible(&lines, visible_height).join("\n");

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string())
                .title_alignment(Alignment::Center),
        )
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Left);

    f.render_widget(paragraph, content_area);

    if lines.len() > visible_height {
        render_scrollbar(f, content_area, scroll);
    }
}

pub fn render_help_dialog(f: &mut Frame, area: Rect, scroll: &mut DialogScroll) {
    render_scrollable_panel(f, area, "📖 Help - Press 'Esc' or '?' to close", HELP_TEXT, scroll);
}

/// Application logs, newest first
pub fn render_logs_dialog(f: &mut Frame, area: Rect, logs: &[String], scroll: &mut DialogScroll) {
    let content = if logs.is_empty() {
        "No logs yet".to_string()
    } else {
        logs.join("\n")
    };
    render_scrollable_panel(f, area, DIALOG_TITLE_LOGS, &content, scroll);
}
