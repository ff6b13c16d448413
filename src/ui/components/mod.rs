//! Reusable UI components

pub mod attendance_calendar;
pub mod scrollbar_helper;
pub mod status_bar;

// Component architecture
pub mod dialog_component;
pub mod dialogs;
pub mod resource_table_component;
pub mod sidebar_component;

// Component exports
pub use dialog_component::DialogComponent;
pub use resource_table_component::ResourceTableComponent;
pub use sidebar_component::SidebarComponent;
pub use status_bar::StatusBar;
