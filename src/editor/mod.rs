//! Controllers behind the admin editor screens
//!
//! A [`ListEditor`] drives one resource kind: it fetches a page, opens a
//! create or edit dialog, gates submission on validation, runs delete
//! confirmations and refetches after every successful mutation. It never
//! patches its list locally; the server stays the source of truth.

mod profile;
mod state;

use log::{debug, warn};
use std::fmt;

use crate::error::Error;
use crate::resource::{ListParams, Resource, ResourceApi, ResourceClient};
use crate::validation::Validate;

pub use profile::*;
pub use state::*;

/// A resource that can be edited through a dialog form
pub trait Editable: Resource + fmt::Debug {
    /// Values shown in the dialog
    type Form: Validate + Default + Clone + PartialEq + fmt::Debug + Send + Sync;

    /// Prefill the dialog from an existing record
    fn to_form(&self) -> Self::Form;

    /// Create payload from validated values; `existing` is the loaded page
    fn new_from_form(form: &Self::Form, existing: &[Self]) -> Self::New;

    /// Update payload from validated values
    fn patch_from_form(form: &Self::Form) -> Self::Patch;
}

/// Controller for one list editor screen
pub struct ListEditor<R: Editable, A = ResourceClient<R>> {
    api: A,
    params: ListParams,
    state: EditorState<R>,
    notifications: Vec<Notification>,
}

impl<R: Editable, A: ResourceApi<R>> ListEditor<R, A> {
    /// Create an editor showing the first page of the default size
    pub fn new(api: A) -> Self {
        Self::with_params(api, ListParams::default())
    }

    /// Create an editor for a specific page
    pub fn with_params(api: A, params: ListParams) -> Self {
        Self {
            api,
            params,
            state: EditorState::default(),
            notifications: Vec::new(),
        }
    }

    /// Current screen state
    pub fn state(&self) -> &EditorState<R> {
        &self.state
    }

    /// Page parameters used by every fetch
    pub fn params(&self) -> &ListParams {
        &self.params
    }

    /// The API this editor drives
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Drain pending notifications
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Initial fetch when the screen opens
    pub async fn mount(&mut self) -> bool {
        self.refresh().await
    }

    /// Refetch the current page. Returns whether the fetch succeeded.
    pub async fn refresh(&mut self) -> bool {
        self.state.phase = Phase::Loading;
        self.state.loading = true;

        let result = self.api.list(&self.params).await;
        self.state.loading = false;

        match result {
            Ok(items) => {
                debug!("Loaded {} {} record(s)", items.len(), R::LABEL);
                self.state.items = items;
                self.state.phase = Phase::Loaded;
                self.state.error = None;
                self.state.session_expired = false;
                true
            }
            Err(err) => {
                warn!("Failed to load {}: {}", R::LABEL, err);
                self.note_auth_failure(&err);
                self.state.phase = Phase::Failed;
                self.state.error = Some(err.user_message());
                self.notify_error(format!("Failed to load {}", R::LABEL.to_lowercase()), &err);
                false
            }
        }
    }

    /// Move to `page` and refetch
    pub async fn set_page(&mut self, page: u32) -> bool {
        self.params.page = page.max(1);
        self.refresh().await
    }

    /// Change the page size, go back to the first page and refetch
    pub async fn set_limit(&mut self, limit: u32) -> bool {
        self.params.limit = limit.max(1);
        self.params.page = 1;
        self.refresh().await
    }

    /// Open the dialog with empty values
    pub fn open_create(&mut self) {
        self.state.selected = None;
        self.state.form = R::Form::default();
        self.state.field_errors.clear();
        self.state.dialog_open = true;
    }

    /// Open the dialog prefilled from `item`
    pub fn open_edit(&mut self, item: &R) {
        self.state.form = item.to_form();
        self.state.selected = Some(item.clone());
        self.state.field_errors.clear();
        self.state.dialog_open = true;
    }

    /// Open the dialog for the loaded record `id`. Returns false when it is not on this page.
    pub fn open_edit_id(&mut self, id: &str) -> bool {
        match self.state.items.find(id).cloned() {
            Some(item) => {
                self.open_edit(&item);
                true
            }
            None => false,
        }
    }

    /// Close the dialog and discard its values
    pub fn close_dialog(&mut self) {
        self.state.dialog_open = false;
        self.state.selected = None;
        self.state.form = R::Form::default();
        self.state.field_errors.clear();
    }

    /// Store edited values and revalidate them for display
    pub fn on_field_change(&mut self, form: R::Form) {
        self.state.field_errors = form.validate().err().unwrap_or_default();
        self.state.form = form;
    }

    /// Validate and save `form`.
    ///
    /// Invalid values never reach the network. On success the dialog closes
    /// and the list is refetched; on failure the dialog keeps its values.
    pub async fn submit(&mut self, form: R::Form) -> SubmitOutcome {
        self.state.form = form;

        if let Err(errors) = self.state.form.validate() {
            debug!("{} form has {} invalid field(s)", R::LABEL, errors.len());
            self.state.field_errors = errors.clone();
            return SubmitOutcome::Invalid(errors);
        }
        self.state.field_errors.clear();

        let (result, verb) = match &self.state.selected {
            Some(item) => {
                let patch = R::patch_from_form(&self.state.form);
                (self.api.update(item.id(), &patch).await, "updated")
            }
            None => {
                let payload = R::new_from_form(&self.state.form, &self.state.items.items);
                (self.api.create(&payload).await, "added")
            }
        };

        match result {
            Ok(saved) => {
                debug!("{} {} {}", R::LABEL, saved.id(), verb);
                self.notifications.push(Notification::success(
                    format!("{} {}", R::LABEL, verb),
                    format!("Your {} has been {} successfully.", R::LABEL.to_lowercase(), verb),
                ));
                self.close_dialog();
                self.refresh().await;
                SubmitOutcome::Saved
            }
            Err(err) => {
                warn!("Failed to save {}: {}", R::LABEL, err);
                self.note_auth_failure(&err);
                let message = err.user_message();
                self.notify_error(format!("Failed to save {}", R::LABEL.to_lowercase()), &err);
                SubmitOutcome::Failed(message)
            }
        }
    }

    /// Ask for confirmation before deleting `id`.
    ///
    /// Only one confirmation can be open at a time; the request is refused
    /// (returns false) while another one is pending.
    pub fn request_delete(&mut self, id: &str) -> bool {
        if let Some(pending) = &self.state.pending_delete {
            debug!("Delete of {} refused, {} still awaiting confirmation", id, pending);
            return false;
        }
        if id.trim().is_empty() {
            return false;
        }
        self.state.pending_delete = Some(id.to_string());
        true
    }

    /// Dismiss the open confirmation
    pub fn cancel_delete(&mut self) {
        self.state.pending_delete = None;
    }

    /// Delete the record awaiting confirmation.
    ///
    /// On success the confirmation closes and the list is refetched. On
    /// failure it stays open so the user can retry or cancel.
    pub async fn confirm_delete(&mut self) -> bool {
        let id = match self.state.pending_delete.clone() {
            Some(id) => id,
            None => return false,
        };

        match self.api.delete(&id).await {
            Ok(()) => {
                debug!("{} {} deleted", R::LABEL, id);
                self.state.pending_delete = None;
                self.notifications.push(Notification::success(
                    format!("{} deleted", R::LABEL),
                    format!("Your {} has been deleted successfully.", R::LABEL.to_lowercase()),
                ));
                self.refresh().await;
                true
            }
            Err(err) => {
                warn!("Failed to delete {} {}: {}", R::LABEL, id, err);
                self.note_auth_failure(&err);
                self.notify_error(format!("Failed to delete {}", R::LABEL.to_lowercase()), &err);
                false
            }
        }
    }

    fn note_auth_failure(&mut self, err: &Error) {
        if err.is_auth() || err.status() == Some(401) {
            self.state.session_expired = true;
        }
    }

    fn notify_error(&mut self, title: String, err: &Error) {
        self.notifications.push(Notification::error(title, err.user_message()));
    }
}
