use std::sync::Arc;

use uuid::Uuid;

use super::{Confirm, DELETE_PROMPT, DeleteOutcome, Route, Submission};
use crate::api::BugApi;
use crate::forms::BugForm;
use crate::models::BugReport;

const LOAD_FALLBACK: &str = "Failed to load bug report";
const UPDATE_FALLBACK: &str = "Failed to update bug report";
const DELETE_FALLBACK: &str = "Failed to delete bug report";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailMode {
    View,
    /// Editing with the shared bug form, pre-populated from the record
    Edit(BugForm),
}

/// A single bug: read view that toggles into an edit form.
pub struct BugDetailPage {
    api: Arc<dyn BugApi>,
    id: Uuid,
    bug: Option<BugReport>,
    loading: bool,
    error: Option<String>,
    mode: DetailMode,
    submitting: bool,
}

impl BugDetailPage {
    pub fn new(api: Arc<dyn BugApi>, id: Uuid) -> Self {
        Self {
            api,
            id,
            bug: None,
            loading: true,
            error: None,
            mode: DetailMode::View,
            submitting: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn bug(&self) -> Option<&BugReport> {
        self.bug.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn mode(&self) -> &DetailMode {
        &self.mode
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub async fn load(&mut self) {
        self.loading = true;
        match self.api.get_bug(self.id).await {
            Ok(bug) => {
                self.bug = Some(bug);
                self.error = None;
            }
            Err(err) => self.error = Some(err.display_message(LOAD_FALLBACK)),
        }
        self.loading = false;
    }

    /// Switch to edit mode. Returns the form, or `None` if nothing is loaded.
    pub fn begin_edit(&mut self) -> Option<&mut BugForm> {
        let bug = self.bug.as_ref()?;
        self.mode = DetailMode::Edit(BugForm::from_bug(bug));
        self.form_mut()
    }

    pub fn form_mut(&mut self) -> Option<&mut BugForm> {
        match &mut self.mode {
            DetailMode::Edit(form) => Some(form),
            DetailMode::View => None,
        }
    }

    pub fn cancel_edit(&mut self) {
        self.mode = DetailMode::View;
    }

    /// Validate the edit form and send a full update.
    pub async fn submit_edit(&mut self) -> Submission {
        if self.submitting {
            return Submission::Ignored;
        }
        let payload = match &self.mode {
            DetailMode::Edit(form) => match form.validate() {
                Ok(payload) => payload,
                Err(errors) => return Submission::Invalid(errors),
            },
            DetailMode::View => return Submission::Ignored,
        };

        self.error = None;
        self.submitting = true;
        let result = self.api.update_bug(self.id, &payload).await;
        self.submitting = false;

        match result {
            Ok(updated) => {
                self.bug = Some(updated);
                self.mode = DetailMode::View;
                Submission::Saved
            }
            Err(err) => {
                let message = err.display_message(UPDATE_FALLBACK);
                self.error = Some(message.clone());
                Submission::Failed(message)
            }
        }
    }

    /// Delete after confirmation; on success the caller goes back to the list.
    pub async fn delete(&mut self, confirm: &dyn Confirm) -> (DeleteOutcome, Option<Route>) {
        if !confirm.confirm(DELETE_PROMPT) {
            return (DeleteOutcome::Cancelled, None);
        }
        match self.api.delete_bug(self.id).await {
            Ok(()) => (DeleteOutcome::Deleted, Some(Route::BugList)),
            Err(err) => {
                let message = err.display_message(DELETE_FALLBACK);
                self.error = Some(message.clone());
                (DeleteOutcome::Failed(message), None)
            }
        }
    }
}
