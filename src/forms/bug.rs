//! The bug report form, shared by the create page and the detail page's
//! edit mode.

use super::FieldErrors;
use crate::models::{BugPayload, BugReport, Severity, Status};

pub const TITLE_MIN: usize = 5;
pub const TITLE_MAX: usize = 255;
pub const DESCRIPTION_MIN: usize = 10;
pub const ENVIRONMENT_MAX: usize = 255;
pub const TAG_MAX: usize = 50;

/// Raw form input, exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BugForm {
    pub title: String,
    pub description: String,
    pub steps_to_reproduce: String,
    pub expected_result: String,
    pub actual_result: String,
    pub severity: String,
    pub status: String,
    pub environment: String,
    /// Comma-separated
    pub tags: String,
}

impl Default for BugForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            steps_to_reproduce: String::new(),
            expected_result: String::new(),
            actual_result: String::new(),
            severity: Severity::Medium.as_str().to_string(),
            status: Status::Open.as_str().to_string(),
            environment: String::new(),
            tags: String::new(),
        }
    }
}

impl BugForm {
    /// Pre-populate from a loaded record for editing.
    pub fn from_bug(bug: &BugReport) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            title: bug.title.clone(),
            description: bug.description.clone(),
            steps_to_reproduce: text(&bug.steps_to_reproduce),
            expected_result: text(&bug.expected_result),
            actual_result: text(&bug.actual_result),
            severity: bug.severity.as_str().to_string(),
            status: bug.status.as_str().to_string(),
            environment: text(&bug.environment),
            tags: bug.tags.join(", "),
        }
    }

    pub fn validate(&self) -> Result<BugPayload, FieldErrors> {
        let mut errors = FieldErrors::default();

        let title = self.title.trim();
        let title_len = title.chars().count();
        if title_len < TITLE_MIN {
            errors.add("title", format!("Title must be at least {} characters", TITLE_MIN));
        } else if title_len > TITLE_MAX {
            errors.add("title", format!("Title must be at most {} characters", TITLE_MAX));
        }

        let description = self.description.trim();
        if description.chars().count() < DESCRIPTION_MIN {
            errors.add(
                "description",
                format!("Description must be at least {} characters", DESCRIPTION_MIN),
            );
        }

        let severity = self.severity.trim().parse::<Severity>();
        if let Err(message) = &severity {
            errors.add("severity", message.clone());
        }
        let status = self.status.trim().parse::<Status>();
        if let Err(message) = &status {
            errors.add("status", message.clone());
        }

        let environment = self.environment.trim();
        if environment.chars().count() > ENVIRONMENT_MAX {
            errors.add(
                "environment",
                format!("Environment must be at most {} characters", ENVIRONMENT_MAX),
            );
        }

        let tags = parse_tags(&self.tags);
        if let Some(tag) = tags.iter().find(|t| t.chars().count() > TAG_MAX) {
            let preview: String = tag.chars().take(20).collect();
            errors.add(
                "tags",
                format!("Tag '{}...' exceeds {} characters", preview, TAG_MAX),
            );
        }

        errors.into_result(|| BugPayload {
            title: title.to_string(),
            description: description.to_string(),
            steps_to_reproduce: self.steps_to_reproduce.trim().to_string(),
            expected_result: self.expected_result.trim().to_string(),
            actual_result: self.actual_result.trim().to_string(),
            severity: severity.unwrap_or_default(),
            status: status.unwrap_or_default(),
            environment: environment.to_string(),
            tags,
        })
    }
}

/// Split a comma-separated tag list: trim, lowercase, drop empties.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}
