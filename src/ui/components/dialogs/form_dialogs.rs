use super::common::{create_dialog_block, create_input_paragraph, create_instructions_paragraph, shortcuts};
use crate::ui::layout::LayoutManager;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};

/// One input row of a form dialog
pub struct FormRow<'a> {
    pub label: &'a str,
    pub value: &'a str,
    pub masked: bool,
}

/// Multi-field input dialog used for record forms, assignment and login.
///
/// Each field takes three lines; an optional note (validation error or
/// login reason) is shown above the instructions.
pub fn render_form_dialog(
    f: &mut Frame,
    area: Rect,
    title: &str,
    rows: &[FormRow<'_>],
    active_field: usize,
    note: Option<&str>,
    theme_color: Color,
) {
    let note_height = if note.is_some() { 2 } else { 0 };
    let height = (rows.len() as u16) * 3 + note_height + 3;
    let dialog_area = LayoutManager::centered_rect_lines(60, height, area);
    f.render_widget(Clear, dialog_area);

    let block = create_dialog_block(title, theme_color);
    let inner = block.inner(dialog_area);
    f.render_widget(block, dialog_area);

    let mut constraints: Vec<Constraint> = rows.iter().map(|_| Constraint::Length(3)).collect();
    constraints.push(Constraint::Length(note_height));
    constraints.push(Constraint::Length(1));
    let chunks = Layout::vertical(constraints).split(inner);

    for (index, row) in rows.iter().enumerate() {
        let input = create_input_paragraph(row.value, row.label, index == active_field, row.masked);
        f.render_widget(input, chunks[index]);
    }

    if let Some(note) = note {
        let note_paragraph = Paragraph::new(note.to_string())
            .style(Style::default().fg(Color::Yellow))
            .wrap(Wrap { trim: true });
        f.render_widget(note_paragraph, chunks[rows.len()]);
    }

    let mut instructions = vec![shortcuts::ENTER_SUBMIT, shortcuts::SEPARATOR];
    if rows.len() > 1 {
        instructions.push(shortcuts::TAB_NEXT_FIELD);
        instructions.push(shortcuts::SEPARATOR);
    }
    instructions.push(shortcuts::ESC_CANCEL);
    f.render_widget(create_instructions_paragraph(&instructions), chunks[rows.len() + 1]);
}
