//! Attendance records folded into a month calendar.

use crate::record::Record;
use crate::utils::datetime;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Leave,
    Unknown,
}

impl AttendanceStatus {
    pub fn parse(status: &str) -> Self {
        match status.trim().to_lowercase().as_str() {
            "present" | "p" => AttendanceStatus::Present,
            "absent" | "a" => AttendanceStatus::Absent,
            "late" | "l" => AttendanceStatus::Late,
            "leave" | "on_leave" | "excused" => AttendanceStatus::Leave,
            _ => AttendanceStatus::Unknown,
        }
    }

    /// One-letter marker shown in a calendar cell
    pub fn marker(self) -> char {
        match self {
            AttendanceStatus::Present => 'P',
            AttendanceStatus::Absent => 'A',
            AttendanceStatus::Late => 'L',
            AttendanceStatus::Leave => 'V',
            AttendanceStatus::Unknown => '?',
        }
    }
}

/// Attendance for one student over one month.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceMonth {
    pub month: NaiveDate,
    days: BTreeMap<u32, AttendanceStatus>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttendanceSummary {
    pub present: usize,
    pub absent: usize,
    pub late: usize,
    pub leave: usize,
}

impl AttendanceMonth {
    /// Keep the records that fall inside `month`; later records for the
    /// same day win.
    pub fn from_records(month: NaiveDate, records: &[Record]) -> Self {
        let month = datetime::first_of_month(month);
        let mut days = BTreeMap::new();

        for record in records {
            let Some(date) = record.str_field("date").and_then(|d| datetime::parse_date(d).ok()) else {
                log::debug!("Attendance record without a usable date: {:?}", record.fields());
                continue;
            };
            if datetime::first_of_month(date) != month {
                continue;
            }
            let status = record
                .str_field("status")
                .map(AttendanceStatus::parse)
                .unwrap_or(AttendanceStatus::Unknown);
            days.insert(date.day(), status);
        }

        Self { month, days }
    }

    pub fn status_on(&self, day: u32) -> Option<AttendanceStatus> {
        self.days.get(&day).copied()
    }

    pub fn summary(&self) -> AttendanceSummary {
        let mut summary = AttendanceSummary::default();
        for status in self.days.values() {
            match status {
                AttendanceStatus::Present => summary.present += 1,
                AttendanceStatus::Absent => summary.absent += 1,
                AttendanceStatus::Late => summary.late += 1,
                AttendanceStatus::Leave => summary.leave += 1,
                AttendanceStatus::Unknown => {}
            }
        }
        summary
    }

    pub fn weeks(&self) -> Vec<[Option<u32>; 7]> {
        datetime::month_grid(self.month)
    }
}
