//! Sign-in and account creation screens.

use super::{Route, Submission};
use crate::auth::AuthContext;
use crate::errors::ClientError;
use crate::forms::{LoginForm, RegisterForm};

const UNEXPECTED: &str = "An unexpected error occurred";

#[derive(Debug, Default)]
pub struct LoginPage {
    pub form: LoginForm,
    error: Option<String>,
    submitting: bool,
}

impl LoginPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn submit(&mut self, auth: &mut AuthContext) -> Submission {
        if self.submitting {
            return Submission::Ignored;
        }
        let credentials = match self.form.validate() {
            Ok(credentials) => credentials,
            Err(errors) => return Submission::Invalid(errors),
        };

        self.error = None;
        self.submitting = true;
        let result = auth.login(&credentials).await;
        self.submitting = false;

        match result {
            Ok(()) => Submission::Navigate(Route::BugList),
            Err(err) => {
                let message = login_error_message(&err);
                self.error = Some(message.clone());
                Submission::Failed(message)
            }
        }
    }
}

pub fn login_error_message(err: &ClientError) -> String {
    match err.as_api() {
        Some(api) if !api.message.is_empty() => api.message.clone(),
        Some(_) => "Invalid credentials".to_string(),
        None => UNEXPECTED.to_string(),
    }
}

#[derive(Debug, Default)]
pub struct RegisterPage {
    pub form: RegisterForm,
    error: Option<String>,
    submitting: bool,
}

impl RegisterPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Register, sign in, and land on the bug list.
    pub async fn submit(&mut self, auth: &mut AuthContext) -> Submission {
        if self.submitting {
            return Submission::Ignored;
        }
        let registration = match self.form.validate() {
            Ok(registration) => registration,
            Err(errors) => return Submission::Invalid(errors),
        };

        self.error = None;
        self.submitting = true;
        let result = auth.register(&registration).await;
        self.submitting = false;

        match result {
            Ok(_) => Submission::Navigate(Route::BugList),
            Err(err) => {
                let message = registration_error_message(&err);
                self.error = Some(message.clone());
                Submission::Failed(message)
            }
        }
    }
}

/// Field errors the user can act on come first: username, email, password.
pub fn registration_error_message(err: &ClientError) -> String {
    let Some(api) = err.as_api() else {
        return UNEXPECTED.to_string();
    };
    for (field, label) in [
        ("username", "Username"),
        ("email", "Email"),
        ("password", "Password"),
    ] {
        if let Some(message) = api.field(field) {
            return format!("{}: {}", label, message);
        }
    }
    if api.message.is_empty() {
        "Registration failed".to_string()
    } else {
        api.message.clone()
    }
}
