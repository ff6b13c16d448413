//! Month grid for the attendance view.

use crate::attendance::{AttendanceMonth, AttendanceStatus};
use crate::utils::datetime;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Cell, Paragraph, Row, Table},
    Frame,
};

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

fn status_color(status: AttendanceStatus) -> Color {
    match status {
        AttendanceStatus::Present => Color::Green,
        AttendanceStatus::Absent => Color::Red,
        AttendanceStatus::Late => Color::Yellow,
        AttendanceStatus::Leave => Color::Blue,
        AttendanceStatus::Unknown => Color::Magenta,
    }
}

/// Cell text: day number plus the status marker, blank outside the month
pub fn cell_text(attendance: &AttendanceMonth, day: Option<u32>) -> String {
    match day {
        None => String::new(),
        Some(day) => match attendance.status_on(day) {
            Some(status) => format!("{:>2} {}", day, status.marker()),
            None => format!("{:>2}  ", day),
        },
    }
}

pub fn render_calendar(f: &mut Frame, area: Rect, attendance: &AttendanceMonth, block: Block<'_>) {
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::vertical([Constraint::Min(0), Constraint::Length(2)]).split(inner);

    let header = Row::new(WEEKDAYS.iter().map(|day| Cell::from(*day)))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = attendance
        .weeks()
        .into_iter()
        .map(|week| {
            Row::new(week.into_iter().map(|day| {
                let style = day
                    .and_then(|d| attendance.status_on(d))
                    .map(|status| Style::default().fg(status_color(status)))
                    .unwrap_or_default();
                Cell::from(cell_text(attendance, day)).style(style)
            }))
            .height(2)
        })
        .collect();

    let table = Table::new(rows, [Constraint::Ratio(1, 7); 7]).header(header.bottom_margin(1));
    f.render_widget(table, chunks[0]);

    let summary = attendance.summary();
    let legend = Line::from(vec![
        Span::styled(
            format!("{}  ", datetime::format_month(attendance.month)),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("P present {}  ", summary.present), Style::default().fg(Color::Green)),
        Span::styled(format!("A absent {}  ", summary.absent), Style::default().fg(Color::Red)),
        Span::styled(format!("L late {}  ", summary.late), Style::default().fg(Color::Yellow)),
        Span::styled(format!("V leave {}", summary.leave), Style::default().fg(Color::Blue)),
    ]);
    f.render_widget(Paragraph::new(vec![Line::default(), legend]), chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_cell_text() {
        let month = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let records = vec![Record::from_value(json!({"date": "2025-03-04", "status": "absent"})).unwrap()];
        let attendance = AttendanceMonth::from_records(month, &records);

        assert_eq!(cell_text(&attendance, Some(4)), " 4 A");
        assert_eq!(cell_text(&attendance, Some(12)), "12  ");
        assert_eq!(cell_text(&attendance, None), "");
    }
}
