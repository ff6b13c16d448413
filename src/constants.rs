//! Constants used throughout the application
//!
//! This module centralizes magic strings, UI text, and other constant values
//! to improve maintainability and consistency.

// Environment
pub const ENV_API_URL: &str = "SCHOOLDESK_API_URL";
pub const ENV_CONFIG_PATH: &str = "SCHOOLDESK_CONFIG";

// Persisted client state
/// Fixed key the bearer token is stored under
pub const TOKEN_STORAGE_KEY: &str = "token";
pub const STORAGE_FILE_NAME: &str = "storage.json";
pub const LOG_FILE_NAME: &str = "schooldesk.log";
pub const APP_DIR_NAME: &str = "schooldesk";

// Alert messages
pub const NETWORK_ERROR_MESSAGE: &str = "Network error";
pub const FALLBACK_ERROR_MESSAGE: &str = "An unexpected error occurred.";

// Display defaults
pub const MISSING_FIELD_PLACEHOLDER: &str = "N/A";

// Success Messages
pub const SUCCESS_RECORD_CREATED: &str = "✅ Record created";
pub const SUCCESS_RECORD_UPDATED: &str = "✅ Record updated";
pub const SUCCESS_RECORD_DELETED: &str = "✅ Record deleted";
pub const SUCCESS_RECORD_ACTIVATED: &str = "✅ Record activated";
pub const SUCCESS_PERMISSIONS_ASSIGNED: &str = "✅ Permissions assigned";
pub const SUCCESS_LOGGED_IN: &str = "✅ Logged in";
pub const SUCCESS_LOGGED_OUT: &str = "✅ Logged out";

// Error Messages
pub const ERROR_SESSION_EXPIRED: &str = "❌ Session expired, please log in again";
pub const ERROR_NO_SELECTION: &str = "❌ No record selected";
pub const ERROR_ACTION_UNSUPPORTED: &str = "❌ This view does not support that action";
pub const ERROR_INVALID_ID_LIST: &str = "❌ Expected a comma-separated list of ids";
pub const ERROR_EMPTY_FORM: &str = "❌ Fill in at least one field";

// UI Messages
pub const CONFIG_GENERATED: &str = "✅ Generated default configuration file";
pub const DIALOG_TITLE_LOGS: &str = "🔍 Logs - Press 'Esc', 'G' or 'q' to close";
pub const HINT_NO_DATA: &str = "No records";
pub const HINT_LOADING: &str = "Loading...";

// Pagination
pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const MAX_PAGE_SIZE: u32 = 1000;

// UI Layout Constants
/// Minimum sidebar width in columns
pub const SIDEBAR_MIN_WIDTH: u16 = 15;
/// Maximum sidebar width in columns
pub const SIDEBAR_MAX_WIDTH: u16 = 50;
/// Default sidebar width in columns
pub const SIDEBAR_DEFAULT_WIDTH: u16 = 24;
/// How long a global alert stays in the status bar
pub const ALERT_DISPLAY_SECS: u64 = 6;
