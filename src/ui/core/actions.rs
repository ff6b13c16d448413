use crate::fetch::{LoadState, Mutation};
use crate::notify::Alert;
use crate::views::ViewKind;

#[derive(Debug, Clone)]
pub enum Action {
    // Navigation
    SelectView(ViewKind),
    NextRow,
    PreviousRow,
    NextPage,
    PreviousPage,
    NextMonth,
    PreviousMonth,
    Refresh,

    // Background results
    ViewLoaded {
        generation: u64,
        kind: ViewKind,
        state: LoadState,
    },
    MutationSucceeded(String),
    MutationFailed(String),

    // Record operations
    Mutate(Mutation),

    // Session
    Login {
        username: String,
        password: String,
    },
    LoginSucceeded,
    LoginFailed(String),
    Logout,
    SessionExpired,

    // Notifications
    ShowAlert(Alert),

    // UI operations
    ShowDialog(DialogType),
    HideDialog,

    // App control
    Quit,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DialogType {
    RecordForm {
        kind: ViewKind,
        mode: FormMode,
        /// Id of the record being edited
        record_id: Option<String>,
        /// Pre-filled inputs, one per form field
        initial: Vec<String>,
    },
    Assign {
        kind: ViewKind,
    },
    DeleteConfirmation {
        kind: ViewKind,
        record_id: String,
    },
    ActivateConfirmation {
        kind: ViewKind,
        record_id: String,
    },
    Login {
        /// Why the login dialog opened (expired session, failed attempt)
        reason: Option<String>,
    },
    Error(String),
    Info(String),
    Help,
    Logs,
}
