//! Typed error hierarchy for the bugdesk client.
//!
//! Two shapes reach the pages:
//! - `ApiError`: the backend answered with a non-success status; carries a
//!   human-readable message and the per-field validation messages
//! - everything else in `ClientError`: transport, decoding and session
//!   failures, shown to the user as "unexpected"

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

/// Error returned by the backend for a non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    pub field_errors: BTreeMap<String, String>,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            field_errors: BTreeMap::new(),
        }
    }

    /// Build an error from a response status and its (possibly empty) body.
    ///
    /// The backend reports errors either as `{"detail": "..."}`, as
    /// `{"non_field_errors": [...]}`, or as a map of field name to a message
    /// or list of messages. With only field errors, the message quotes the
    /// first field by name, not the first one in the body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: Option<serde_json::Map<String, Value>> = serde_json::from_str(body).ok();
        let Some(object) = parsed else {
            return Self::new(status, format!("Request failed with status {}", status));
        };

        let mut field_errors = BTreeMap::new();
        let mut detail = None;
        let mut non_field = None;

        for (key, value) in &object {
            let Some(text) = first_message(value) else {
                continue;
            };
            match key.as_str() {
                "detail" => detail = Some(text),
                "non_field_errors" => non_field = Some(text),
                _ => {
                    field_errors.insert(key.clone(), text);
                }
            }
        }

        let message = detail
            .or(non_field)
            .or_else(|| {
                field_errors
                    .iter()
                    .next()
                    .map(|(field, msg)| format!("{}: {}", field, msg))
            })
            .unwrap_or_else(|| format!("Request failed with status {}", status));

        Self {
            status,
            message,
            field_errors,
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.field_errors.get(name).map(String::as_str)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

fn first_message(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(first_message),
        Value::Object(map) => map.values().find_map(first_message),
        _ => None,
    }
}

/// Every failure an API call or session operation can produce.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Network error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Unexpected response from server: {0}")]
    Decode(String),

    #[error("Session storage error: {0}")]
    Session(String),

    #[error("Not signed in")]
    NotSignedIn,
}

impl ClientError {
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            ClientError::Api(err) => Some(err),
            _ => None,
        }
    }

    /// The text a page shows for this error: the backend's message when it
    /// sent one, otherwise the page's own fallback.
    pub fn display_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Api(err) if !err.message.is_empty() => err.message.clone(),
            _ => fallback.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err)
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
