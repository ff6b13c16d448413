//! Date utility functions
//!
//! Month arithmetic for the attendance calendar and the date formats the
//! backend speaks.

use chrono::{Datelike, Local, NaiveDate};

/// Date format used by the backend for day values
pub const API_DATE_FORMAT: &str = "%Y-%m-%d";

/// Format used for `month=` query parameters and salary months
pub const API_MONTH_FORMAT: &str = "%Y-%m";

/// Parse a date string in YYYY-MM-DD format to NaiveDate
///
/// Timestamps such as `2025-03-04T08:00:00` are accepted; only the date
/// part is read.
pub fn parse_date(date_str: &str) -> Result<NaiveDate, chrono::ParseError> {
    let date_part = date_str.get(..10).unwrap_or(date_str);
    NaiveDate::parse_from_str(date_part, API_DATE_FORMAT)
}

/// Format the month containing `d` as YYYY-MM
pub fn format_month(d: NaiveDate) -> String {
    d.format(API_MONTH_FORMAT).to_string()
}

/// First day of the month containing `d`
pub fn first_of_month(d: NaiveDate) -> NaiveDate {
    d.with_day(1).unwrap_or(d)
}

/// First day of the current local month
pub fn current_month() -> NaiveDate {
    first_of_month(Local::now().date_naive())
}

/// First day of the following month
pub fn next_month(d: NaiveDate) -> NaiveDate {
    let (year, month) = if d.month() == 12 {
        (d.year() + 1, 1)
    } else {
        (d.year(), d.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(d)
}

/// First day of the preceding month
pub fn previous_month(d: NaiveDate) -> NaiveDate {
    let (year, month) = if d.month() == 1 {
        (d.year() - 1, 12)
    } else {
        (d.year(), d.month() - 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(d)
}

/// Number of days in the month containing `d`
pub fn days_in_month(d: NaiveDate) -> u32 {
    let first = first_of_month(d);
    next_month(first).signed_duration_since(first).num_days() as u32
}

/// Month laid out as Monday-first weeks; `None` pads days outside it.
pub fn month_grid(d: NaiveDate) -> Vec<[Option<u32>; 7]> {
    let first = first_of_month(d);
    let offset = first.weekday().num_days_from_monday() as usize;
    let days = days_in_month(first);

    let mut weeks = Vec::new();
    let mut week = [None; 7];
    let mut slot = offset;

    for day in 1..=days {
        week[slot] = Some(day);
        slot += 1;
        if slot == 7 {
            weeks.push(week);
            week = [None; 7];
            slot = 0;
        }
    }
    if slot > 0 {
        weeks.push(week);
    }
    weeks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_accepts_timestamps() {
        assert_eq!(parse_date("2025-03-04").unwrap(), date(2025, 3, 4));
        assert_eq!(parse_date("2025-03-04T08:30:00Z").unwrap(), date(2025, 3, 4));
        assert!(parse_date("04/03/2025").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_month_navigation_wraps_years() {
        assert_eq!(next_month(date(2024, 12, 15)), date(2025, 1, 1));
        assert_eq!(previous_month(date(2025, 1, 31)), date(2024, 12, 1));
        assert_eq!(format_month(date(2025, 2, 9)), "2025-02");
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(date(2024, 2, 10)), 29);
        assert_eq!(days_in_month(date(2025, 2, 1)), 28);
        assert_eq!(days_in_month(date(2025, 12, 1)), 31);
    }

    #[test]
    fn test_month_grid_starts_on_monday() {
        // September 2025 starts on a Monday and has 30 days
        let grid = month_grid(date(2025, 9, 1));
        assert_eq!(grid.len(), 5);
        assert_eq!(grid[0][0], Some(1));
        assert_eq!(grid[4][1], Some(30));
        assert_eq!(grid[4][2], None);

        // June 2025 starts on a Sunday
        let grid = month_grid(date(2025, 6, 1));
        assert_eq!(grid[0][6], Some(1));
        assert_eq!(grid[0][5], None);
        assert_eq!(grid.len(), 6);
    }
}
