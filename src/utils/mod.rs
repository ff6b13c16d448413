//! Utility modules for the schooldesk console.
//!
//! - [`datetime`] - Date parsing, month arithmetic and calendar layout

pub mod datetime;
