//! Sign-in and registration forms.

use std::sync::LazyLock;

use regex::Regex;

use super::FieldErrors;
use crate::models::{Credentials, Registration};

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 30;
pub const PASSWORD_MIN: usize = 8;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is a valid static pattern")
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<Credentials, FieldErrors> {
        let mut errors = FieldErrors::default();
        if self.username.trim().is_empty() {
            errors.add("username", "Username is required");
        }
        if self.password.is_empty() {
            errors.add("password", "Password is required");
        }
        errors.into_result(|| Credentials {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// The first password rule `password` breaks, if any.
pub fn password_problem(password: &str) -> Option<String> {
    if password.chars().count() < PASSWORD_MIN {
        return Some(format!("Password must be at least {} characters", PASSWORD_MIN));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Some("Password must contain at least one uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Some("Password must contain at least one lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Some("Password must contain at least one number".to_string());
    }
    None
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

impl RegisterForm {
    pub fn validate(&self) -> Result<Registration, FieldErrors> {
        let mut errors = FieldErrors::default();

        let username = self.username.trim();
        let username_len = username.chars().count();
        if username_len < USERNAME_MIN {
            errors.add(
                "username",
                format!("Username must be at least {} characters", USERNAME_MIN),
            );
        } else if username_len > USERNAME_MAX {
            errors.add(
                "username",
                format!("Username must be at most {} characters", USERNAME_MAX),
            );
        }

        let email = self.email.trim();
        if !is_valid_email(email) {
            errors.add("email", "Invalid email address");
        }

        if let Some(problem) = password_problem(&self.password) {
            errors.add("password", problem);
        }

        if self.password != self.password_confirm {
            errors.add("password_confirm", "Passwords don't match");
        }

        errors.into_result(|| Registration {
            username: username.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
            password_confirm: self.password_confirm.clone(),
        })
    }
}
