use std::sync::Arc;

use super::{Route, Submission};
use crate::api::BugApi;
use crate::forms::BugForm;
use crate::models::BugReport;

const CREATE_FALLBACK: &str = "Failed to create bug report";

/// The create form. Starts at severity `medium`, status `open`.
pub struct NewBugPage {
    api: Arc<dyn BugApi>,
    pub form: BugForm,
    error: Option<String>,
    submitting: bool,
    created: Option<BugReport>,
}

impl NewBugPage {
    pub fn new(api: Arc<dyn BugApi>) -> Self {
        Self {
            api,
            form: BugForm::default(),
            error: None,
            submitting: false,
            created: None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// The record the backend returned for the last successful submit.
    pub fn created(&self) -> Option<&BugReport> {
        self.created.as_ref()
    }

    pub async fn submit(&mut self) -> Submission {
        if self.submitting {
            return Submission::Ignored;
        }
        let payload = match self.form.validate() {
            Ok(payload) => payload,
            Err(errors) => return Submission::Invalid(errors),
        };

        self.error = None;
        self.submitting = true;
        let result = self.api.create_bug(&payload).await;
        self.submitting = false;

        match result {
            Ok(bug) => {
                self.created = Some(bug);
                Submission::Navigate(Route::BugList)
            }
            Err(err) => {
                let message = err.display_message(CREATE_FALLBACK);
                self.error = Some(message.clone());
                Submission::Failed(message)
            }
        }
    }
}
