//! State held by one editor screen

use crate::editor::Editable;
use crate::resource::ResourceList;
use crate::validation::ValidationErrors;

/// Fetch lifecycle of an editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing fetched yet
    Idle,
    /// A fetch is in flight
    Loading,
    /// The last fetch succeeded
    Loaded,
    /// The last fetch failed; see [`EditorState::error`]
    Failed,
}

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A dismissible message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub(crate) fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    pub(crate) fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Whether this reports a failure
    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

/// Result of submitting the dialog
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The record was saved and the list refetched
    Saved,
    /// Validation failed; nothing was sent
    Invalid(ValidationErrors),
    /// The API call failed; the dialog stays open with its values
    Failed(String),
}

/// Everything one list editor screen renders from
#[derive(Debug, Clone)]
pub struct EditorState<R: Editable> {
    /// The current page, exactly as the server returned it
    pub items: ResourceList<R>,

    /// Fetch lifecycle
    pub phase: Phase,

    /// True exactly while a fetch is in flight
    pub loading: bool,

    /// Message of the last failed fetch
    pub error: Option<String>,

    /// Record being edited; `None` while creating
    pub selected: Option<R>,

    /// Whether the edit dialog is open
    pub dialog_open: bool,

    /// Values in the dialog
    pub form: R::Form,

    /// Current field errors of `form`
    pub field_errors: ValidationErrors,

    /// Record awaiting delete confirmation
    pub pending_delete: Option<String>,

    /// Set when the API rejected the session; the screen should go to login
    pub session_expired: bool,
}

impl<R: Editable> Default for EditorState<R> {
    fn default() -> Self {
        Self {
            items: ResourceList::default(),
            phase: Phase::Idle,
            loading: false,
            error: None,
            selected: None,
            dialog_open: false,
            form: R::Form::default(),
            field_errors: ValidationErrors::new(),
            pending_delete: None,
            session_expired: false,
        }
    }
}

impl<R: Editable> EditorState<R> {
    /// Whether submitting would create rather than update
    pub fn is_creating(&self) -> bool {
        self.selected.is_none()
    }

    /// Whether the delete trigger should be enabled
    pub fn can_request_delete(&self) -> bool {
        self.pending_delete.is_none()
    }
}
