//! Generic data loading and mutations for every admin view.
//!
//! One helper serves all views: it resolves the view's collection path
//! from its [`ViewSpec`](crate::views::ViewSpec), fetches a page and
//! reports the outcome as a [`LoadState`]. A failed fetch is its own state
//! rather than an empty list, so "no data" and "could not load" render
//! differently.

use crate::api::{ApiError, Pagination};
use crate::backend::AdminBackend;
use crate::constants::{
    ERROR_ACTION_UNSUPPORTED, ERROR_INVALID_ID_LIST, SUCCESS_PERMISSIONS_ASSIGNED, SUCCESS_RECORD_ACTIVATED,
    SUCCESS_RECORD_CREATED, SUCCESS_RECORD_DELETED, SUCCESS_RECORD_UPDATED,
};
use crate::record::Record;
use crate::utils::datetime;
use crate::views::{Presentation, ViewAction, ViewKind};
use chrono::NaiveDate;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    /// The view is scoped to a parent record and none is selected
    NeedsParent(ViewKind),
    Loaded(Vec<Record>),
    Failed(String),
}

impl LoadState {
    pub fn records(&self) -> &[Record] {
        match self {
            LoadState::Loaded(records) => records,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

/// Everything needed to load one view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewQuery {
    pub kind: ViewKind,
    pub parent_id: Option<String>,
    pub page: Pagination,
    /// Calendar views load one month at a time
    pub month: Option<NaiveDate>,
}

impl ViewQuery {
    pub fn new(kind: ViewKind, page: Pagination) -> Self {
        Self {
            kind,
            parent_id: None,
            page,
            month: None,
        }
    }

    pub fn with_parent(mut self, parent_id: Option<String>) -> Self {
        self.parent_id = parent_id;
        self
    }

    pub fn with_month(mut self, month: Option<NaiveDate>) -> Self {
        self.month = month;
        self
    }

    fn extra_query(&self) -> Vec<(&'static str, String)> {
        match (self.kind.spec().presentation, self.month) {
            (Presentation::Calendar, Some(month)) => vec![("month", datetime::format_month(month))],
            _ => Vec::new(),
        }
    }
}

/// Hint shown when a scoped view has no parent selection.
pub fn select_parent_hint(parent: Option<ViewKind>) -> String {
    format!("Select a record in {} first", parent.map(ViewKind::title).unwrap_or("the parent view"))
}

/// Load the rows of a view.
pub async fn load_view(backend: &dyn AdminBackend, query: &ViewQuery) -> LoadState {
    let spec = query.kind.spec();

    let Some(path) = spec.collection_path(query.parent_id.as_deref()) else {
        return match spec.parent {
            Some(parent) => LoadState::NeedsParent(parent),
            None => LoadState::Failed(format!("{} has no collection path", spec.title)),
        };
    };

    match backend.list(&path, query.page, query.extra_query()).await {
        Ok(records) => LoadState::Loaded(records),
        Err(e) => {
            log::warn!("Loading {} failed: {}", spec.title, e);
            LoadState::Failed(e.user_message())
        }
    }
}

/// A change requested from a view.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Create(Map<String, Value>),
    Update { id: String, payload: Map<String, Value> },
    Delete { id: String },
    Activate { id: String },
    /// Raw comma-separated id list from the assign form
    Assign { ids: String },
}

impl Mutation {
    pub fn action(&self) -> ViewAction {
        match self {
            Mutation::Create(_) => ViewAction::Create,
            Mutation::Update { .. } => ViewAction::Edit,
            Mutation::Delete { .. } => ViewAction::Delete,
            Mutation::Activate { .. } => ViewAction::Activate,
            Mutation::Assign { .. } => ViewAction::Assign,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MutationError {
    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Apply a mutation to a view's collection and return the success message.
pub async fn apply_mutation(
    backend: &dyn AdminBackend,
    kind: ViewKind,
    parent_id: Option<&str>,
    mutation: Mutation,
) -> Result<&'static str, MutationError> {
    let spec = kind.spec();
    if !spec.supports(mutation.action()) {
        return Err(MutationError::Invalid(ERROR_ACTION_UNSUPPORTED.to_string()));
    }

    let path = spec
        .collection_path(parent_id)
        .ok_or_else(|| MutationError::Invalid(select_parent_hint(spec.parent)))?;

    match mutation {
        Mutation::Create(payload) => {
            backend.create(&path, payload).await?;
            Ok(SUCCESS_RECORD_CREATED)
        }
        Mutation::Update { id, payload } => {
            backend.update(&path, &id, payload).await?;
            Ok(SUCCESS_RECORD_UPDATED)
        }
        Mutation::Delete { id } => {
            backend.delete(&path, &id).await?;
            Ok(SUCCESS_RECORD_DELETED)
        }
        Mutation::Activate { id } => {
            backend.activate(&path, &id).await?;
            Ok(SUCCESS_RECORD_ACTIVATED)
        }
        Mutation::Assign { ids } => {
            let payload = spec
                .build_assignment(&ids)
                .ok_or_else(|| MutationError::Invalid(ERROR_INVALID_ID_LIST.to_string()))?;
            backend.create(&path, payload).await?;
            Ok(SUCCESS_PERMISSIONS_ASSIGNED)
        }
    }
}
