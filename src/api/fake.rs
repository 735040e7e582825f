//! In-memory `BugApi` double for page and auth tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::BugApi;
use crate::errors::{ApiError, ClientError, ClientResult};
use crate::models::{
    BugFilters, BugPayload, BugReport, Credentials, Page, RefreshResponse, Registration,
    Severity, Status, TokenPair, User,
};

pub(crate) const PAGE_SIZE: usize = 10;

#[derive(Default)]
struct FakeState {
    bugs: Vec<BugReport>,
    calls: Vec<String>,
    token: Option<String>,
    fail_next: Option<ApiError>,
    fail_unexpected: bool,
}

#[derive(Default)]
pub(crate) struct FakeApi {
    state: Mutex<FakeState>,
}

pub(crate) fn sample_user() -> User {
    User {
        id: 1,
        username: "testuser".into(),
        email: "test@example.com".into(),
    }
}

pub(crate) fn sample_bug(title: &str) -> BugReport {
    let now = Utc::now();
    BugReport {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: "Something goes wrong when clicking".into(),
        steps_to_reproduce: None,
        expected_result: None,
        actual_result: None,
        environment: None,
        severity: Severity::Medium,
        status: Status::Open,
        tags: Vec::new(),
        created_by: sample_user(),
        created_at: now,
        updated_at: now,
    }
}

impl FakeApi {
    pub(crate) fn with_bugs(count: usize) -> Self {
        let api = Self::default();
        {
            let mut state = api.state.lock().unwrap();
            for i in 0..count {
                state.bugs.push(sample_bug(&format!("Bug number {}", i + 1)));
            }
        }
        api
    }

    pub(crate) fn bugs(&self) -> Vec<BugReport> {
        self.state.lock().unwrap().bugs.clone()
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub(crate) fn token(&self) -> Option<String> {
        self.state.lock().unwrap().token.clone()
    }

    pub(crate) fn fail_next(&self, err: ApiError) {
        self.state.lock().unwrap().fail_next = Some(err);
    }

    pub(crate) fn fail_unexpected(&self) {
        self.state.lock().unwrap().fail_unexpected = true;
    }

    fn record(&self, call: String) -> ClientResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if state.fail_unexpected {
            state.fail_unexpected = false;
            return Err(ClientError::Decode("garbled body".into()));
        }
        match state.fail_next.take() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    fn not_found() -> ClientError {
        ApiError::new(404, "No BugReport matches the given query.").into()
    }
}

fn apply(bug: &mut BugReport, payload: &BugPayload) {
    let optional = |s: &str| (!s.is_empty()).then(|| s.to_string());
    bug.title = payload.title.clone();
    bug.description = payload.description.clone();
    bug.steps_to_reproduce = optional(&payload.steps_to_reproduce);
    bug.expected_result = optional(&payload.expected_result);
    bug.actual_result = optional(&payload.actual_result);
    bug.environment = optional(&payload.environment);
    bug.severity = payload.severity;
    bug.status = payload.status;
    bug.tags = payload.tags.clone();
    bug.updated_at = Utc::now();
}

#[async_trait]
impl BugApi for FakeApi {
    async fn list_bugs(&self, filters: &BugFilters) -> ClientResult<Page<BugReport>> {
        self.record(format!("list page={}", filters.page))?;
        let state = self.state.lock().unwrap();
        let matching: Vec<BugReport> = state
            .bugs
            .iter()
            .filter(|b| filters.severity.is_none_or(|s| b.severity == s))
            .filter(|b| filters.status.is_none_or(|s| b.status == s))
            .filter(|b| {
                filters
                    .search
                    .as_deref()
                    .is_none_or(|q| b.title.to_lowercase().contains(&q.to_lowercase()))
            })
            .cloned()
            .collect();

        let page = filters.page.max(1) as usize;
        let start = (page - 1) * PAGE_SIZE;
        let results: Vec<BugReport> = matching.iter().skip(start).take(PAGE_SIZE).cloned().collect();
        Ok(Page {
            count: matching.len() as u64,
            next: (start + PAGE_SIZE < matching.len()).then(|| format!("?page={}", page + 1)),
            previous: (page > 1).then(|| format!("?page={}", page - 1)),
            results,
        })
    }

    async fn get_bug(&self, id: Uuid) -> ClientResult<BugReport> {
        self.record(format!("get {}", id))?;
        let state = self.state.lock().unwrap();
        state
            .bugs
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(Self::not_found)
    }

    async fn create_bug(&self, payload: &BugPayload) -> ClientResult<BugReport> {
        self.record(format!("create {}", payload.title))?;
        let mut bug = sample_bug(&payload.title);
        apply(&mut bug, payload);
        self.state.lock().unwrap().bugs.insert(0, bug.clone());
        Ok(bug)
    }

    async fn update_bug(&self, id: Uuid, payload: &BugPayload) -> ClientResult<BugReport> {
        self.record(format!("update {}", id))?;
        let mut state = self.state.lock().unwrap();
        let bug = state
            .bugs
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(Self::not_found)?;
        apply(bug, payload);
        Ok(bug.clone())
    }

    async fn delete_bug(&self, id: Uuid) -> ClientResult<()> {
        self.record(format!("delete {}", id))?;
        let mut state = self.state.lock().unwrap();
        let before = state.bugs.len();
        state.bugs.retain(|b| b.id != id);
        if state.bugs.len() == before {
            return Err(Self::not_found());
        }
        Ok(())
    }

    async fn login(&self, credentials: &Credentials) -> ClientResult<TokenPair> {
        self.record(format!("login {}", credentials.username))?;
        let tokens = TokenPair {
            access: format!("access-{}", credentials.username),
            refresh: format!("refresh-{}", credentials.username),
        };
        Ok(tokens)
    }

    async fn register(&self, registration: &Registration) -> ClientResult<User> {
        self.record(format!("register {}", registration.username))?;
        Ok(User {
            id: 7,
            username: registration.username.clone(),
            email: registration.email.clone(),
        })
    }

    async fn refresh(&self, refresh_token: &str) -> ClientResult<RefreshResponse> {
        self.record(format!("refresh {}", refresh_token))?;
        let access = refresh_token.replacen("refresh-", "access2-", 1);
        Ok(RefreshResponse {
            access,
            refresh: None,
        })
    }

    fn set_token(&self, token: Option<String>) {
        self.state.lock().unwrap().token = token;
    }
}
