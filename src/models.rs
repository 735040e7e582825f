use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(format!(
                "Invalid severity: {}. Choose from: low, medium, high, critical",
                s
            )),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl Status {
    pub const ALL: [Status; 4] = [Self::Open, Self::InProgress, Self::Resolved, Self::Closed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
            Self::Closed => "Closed",
        }
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "in_progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            "closed" => Ok(Self::Closed),
            _ => Err(format!(
                "Invalid status: {}. Choose from: open, in_progress, resolved, closed",
                s
            )),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort expressions accepted by the bug list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Ordering {
    #[default]
    #[serde(rename = "-created_at")]
    NewestFirst,
    #[serde(rename = "created_at")]
    OldestFirst,
    #[serde(rename = "-updated_at")]
    RecentlyUpdated,
    #[serde(rename = "title")]
    TitleAsc,
    #[serde(rename = "-title")]
    TitleDesc,
    #[serde(rename = "severity")]
    SeverityAsc,
    #[serde(rename = "-severity")]
    SeverityDesc,
}

impl Ordering {
    pub const ALL: [Ordering; 7] = [
        Self::NewestFirst,
        Self::OldestFirst,
        Self::RecentlyUpdated,
        Self::TitleAsc,
        Self::TitleDesc,
        Self::SeverityAsc,
        Self::SeverityDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewestFirst => "-created_at",
            Self::OldestFirst => "created_at",
            Self::RecentlyUpdated => "-updated_at",
            Self::TitleAsc => "title",
            Self::TitleDesc => "-title",
            Self::SeverityAsc => "severity",
            Self::SeverityDesc => "-severity",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NewestFirst => "Newest first",
            Self::OldestFirst => "Oldest first",
            Self::RecentlyUpdated => "Recently updated",
            Self::TitleAsc => "Title A-Z",
            Self::TitleDesc => "Title Z-A",
            Self::SeverityAsc => "Severity (Low to Critical)",
            Self::SeverityDesc => "Severity (Critical to Low)",
        }
    }
}

impl FromStr for Ordering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|o| o.as_str()).collect();
                format!("Invalid ordering: {}. Choose from: {}", s, valid.join(", "))
            })
    }
}

impl std::fmt::Display for Ordering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The backend stores unset optional text as `""`; treat both as absent.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BugReport {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub steps_to_reproduce: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub expected_result: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub actual_result: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub environment: Option<String>,
    pub severity: Severity,
    pub status: Status,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_by: User,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable fields of a bug report, sent on create and on full update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BugPayload {
    pub title: String,
    pub description: String,
    pub steps_to_reproduce: String,
    pub expected_result: String,
    pub actual_result: String,
    pub severity: Severity,
    pub status: Status,
    pub environment: String,
    pub tags: Vec<String>,
}

/// Query-parameter bag for the bug list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BugFilters {
    pub search: Option<String>,
    pub severity: Option<Severity>,
    pub status: Option<Status>,
    pub tag: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    pub ordering: Ordering,
    pub page: u32,
}

impl Default for BugFilters {
    fn default() -> Self {
        Self {
            search: None,
            severity: None,
            status: None,
            tag: None,
            created_after: None,
            created_before: None,
            ordering: Ordering::default(),
            page: 1,
        }
    }
}

impl BugFilters {
    /// Query pairs in the order the backend documents them; unset filters are omitted.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query.push(("search", search.to_string()));
        }
        if let Some(severity) = self.severity {
            query.push(("severity", severity.as_str().to_string()));
        }
        if let Some(status) = self.status {
            query.push(("status", status.as_str().to_string()));
        }
        if let Some(tag) = self.tag.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query.push(("tags", tag.to_lowercase()));
        }
        if let Some(after) = self.created_after {
            query.push(("created_after", after.to_rfc3339()));
        }
        if let Some(before) = self.created_before {
            query.push(("created_before", before.to_rfc3339()));
        }
        query.push(("ordering", self.ordering.as_str().to_string()));
        query.push(("page", self.page.max(1).to_string()));
        query
    }

    pub fn has_active_filters(&self) -> bool {
        self.search.is_some()
            || self.severity.is_some()
            || self.status.is_some()
            || self.tag.is_some()
            || self.created_after.is_some()
            || self.created_before.is_some()
    }
}

/// Page-number pagination envelope returned by list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

impl Registration {
    pub fn credentials(&self) -> Credentials {
        Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    /// Only present when the backend rotates refresh tokens.
    #[serde(default)]
    pub refresh: Option<String>,
}
