//! Dialog rendering helpers

pub mod common;
pub mod form_dialogs;
pub mod scroll_behavior;
pub mod system_dialogs;

pub use scroll_behavior::DialogScroll;
