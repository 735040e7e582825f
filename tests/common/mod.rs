//! In-process fake of the bug tracker REST API.
//!
//! Mirrors the backend's observable behavior: JWT-style bearer tokens,
//! owner-scoped bug lists, DRF error bodies, page-number pagination with
//! ten results per page and `-created_at` as the default ordering.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Duration, Utc};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use uuid::Uuid;

use bugdesk::models::{BugPayload, BugReport, User};

pub const PAGE_SIZE: usize = 10;

struct Account {
    user: User,
    password: String,
}

#[derive(Default)]
struct Store {
    accounts: Vec<Account>,
    bugs: Vec<BugReport>,
    /// access token → username
    access: HashMap<String, String>,
    /// refresh token → username
    refresh: HashMap<String, String>,
    last_created: Option<DateTime<Utc>>,
}

impl Store {
    fn user(&self, username: &str) -> Option<&User> {
        self.accounts
            .iter()
            .map(|a| &a.user)
            .find(|u| u.username == username)
    }

    /// Strictly increasing timestamps so ordering is deterministic.
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let at = match self.last_created {
            Some(last) if now <= last => last + Duration::milliseconds(1),
            _ => now,
        };
        self.last_created = Some(at);
        at
    }

    fn issue_tokens(&mut self, username: &str) -> (String, String) {
        let access = format!("access-{}", Uuid::new_v4());
        let refresh = format!("refresh-{}", Uuid::new_v4());
        self.access.insert(access.clone(), username.to_string());
        self.refresh.insert(refresh.clone(), username.to_string());
        (access, refresh)
    }
}

type Shared = Arc<Mutex<Store>>;

fn error(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

fn detail(status: StatusCode, message: &str) -> Response {
    error(status, json!({ "detail": message }))
}

fn not_found() -> Response {
    detail(StatusCode::NOT_FOUND, "No BugReport matches the given query.")
}

/// The signed-in user for a request, or the DRF 401 response.
fn authenticate(store: &Store, headers: &HeaderMap) -> Result<User, Response> {
    let Some(header) = headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok()) else {
        return Err(detail(
            StatusCode::UNAUTHORIZED,
            "Authentication credentials were not provided.",
        ));
    };
    let token = header.trim_start_matches("Bearer ").trim();
    store
        .access
        .get(token)
        .and_then(|username| store.user(username))
        .cloned()
        .ok_or_else(|| {
            error(
                StatusCode::UNAUTHORIZED,
                json!({
                    "detail": "Given token not valid for any token type",
                    "code": "token_not_valid"
                }),
            )
        })
}

async fn register(State(store): State<Shared>, Json(body): Json<Value>) -> Response {
    let field = |name: &str| body.get(name).and_then(Value::as_str).unwrap_or("").to_string();
    let (username, email, password, confirm) = (
        field("username"),
        field("email"),
        field("password"),
        field("password_confirm"),
    );

    let mut store = store.lock().unwrap();
    let mut errors = serde_json::Map::new();
    if username.is_empty() {
        errors.insert("username".into(), json!(["This field may not be blank."]));
    } else if store.user(&username).is_some() {
        errors.insert(
            "username".into(),
            json!(["A user with that username already exists."]),
        );
    }
    if !email.contains('@') {
        errors.insert("email".into(), json!(["Enter a valid email address."]));
    }
    if password.len() < 8 {
        errors.insert(
            "password".into(),
            json!(["This password is too short. It must contain at least 8 characters."]),
        );
    }
    if errors.is_empty() && password != confirm {
        errors.insert("password_confirm".into(), json!("Passwords don't match."));
    }
    if !errors.is_empty() {
        return error(StatusCode::BAD_REQUEST, Value::Object(errors));
    }

    let user = User {
        id: store.accounts.len() as i64 + 1,
        username,
        email,
    };
    store.accounts.push(Account {
        user: user.clone(),
        password,
    });
    (
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully.", "user": user })),
    )
        .into_response()
}

async fn token(State(store): State<Shared>, Json(body): Json<Value>) -> Response {
    let username = body.get("username").and_then(Value::as_str).unwrap_or("");
    let password = body.get("password").and_then(Value::as_str).unwrap_or("");

    let mut store = store.lock().unwrap();
    let valid = store
        .accounts
        .iter()
        .any(|a| a.user.username == username && a.password == password);
    if !valid {
        return detail(
            StatusCode::UNAUTHORIZED,
            "No active account found with the given credentials",
        );
    }
    let (access, refresh) = store.issue_tokens(username);
    Json(json!({ "access": access, "refresh": refresh })).into_response()
}

async fn refresh(State(store): State<Shared>, Json(body): Json<Value>) -> Response {
    let refresh = body.get("refresh").and_then(Value::as_str).unwrap_or("");
    let mut store = store.lock().unwrap();
    let Some(username) = store.refresh.get(refresh).cloned() else {
        return error(
            StatusCode::UNAUTHORIZED,
            json!({ "detail": "Token is invalid or expired", "code": "token_not_valid" }),
        );
    };
    let access = format!("access-{}", Uuid::new_v4());
    store.access.insert(access.clone(), username);
    Json(json!({ "access": access })).into_response()
}

fn severity_rank(bug: &BugReport) -> &'static str {
    // the backend sorts the stored string, not the logical level
    bug.severity.as_str()
}

fn sort(bugs: &mut [BugReport], ordering: &str) {
    let (descending, key) = match ordering.strip_prefix('-') {
        Some(key) => (true, key),
        None => (false, ordering),
    };
    bugs.sort_by(|a, b| {
        let order = match key {
            "created_at" => a.created_at.cmp(&b.created_at),
            "updated_at" => a.updated_at.cmp(&b.updated_at),
            "title" => a.title.cmp(&b.title),
            "severity" => severity_rank(a).cmp(severity_rank(b)),
            "status" => a.status.as_str().cmp(b.status.as_str()),
            _ => b.created_at.cmp(&a.created_at),
        };
        if descending { order.reverse() } else { order }
    });
}

fn page_link(base: &str, query: &HashMap<String, String>, page: usize) -> String {
    let mut pairs: Vec<String> = query
        .iter()
        .filter(|(k, _)| k.as_str() != "page")
        .map(|(k, v)| format!("{}={}", k, v))
        .collect();
    pairs.sort();
    pairs.push(format!("page={}", page));
    format!("{}?{}", base, pairs.join("&"))
}

async fn list_bugs(
    State(store): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let store = store.lock().unwrap();
    let user = match authenticate(&store, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    let param = |name: &str| query.get(name).map(String::as_str).filter(|v| !v.is_empty());
    let mut bugs: Vec<BugReport> = store
        .bugs
        .iter()
        .filter(|b| b.created_by.id == user.id)
        .filter(|b| param("severity").is_none_or(|s| b.severity.as_str() == s))
        .filter(|b| param("status").is_none_or(|s| b.status.as_str() == s))
        .filter(|b| param("tags").is_none_or(|t| b.tags.iter().any(|tag| tag == &t.to_lowercase())))
        .filter(|b| {
            param("search").is_none_or(|q| {
                let q = q.to_lowercase();
                b.title.to_lowercase().contains(&q) || b.description.to_lowercase().contains(&q)
            })
        })
        .filter(|b| {
            param("created_after")
                .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
                .is_none_or(|after| b.created_at >= after)
        })
        .filter(|b| {
            param("created_before")
                .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
                .is_none_or(|before| b.created_at <= before)
        })
        .cloned()
        .collect();
    sort(&mut bugs, param("ordering").unwrap_or("-created_at"));

    let page: usize = param("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let start = (page.max(1) - 1) * PAGE_SIZE;
    if page == 0 || (start >= bugs.len() && page > 1) {
        return detail(StatusCode::NOT_FOUND, "Invalid page.");
    }
    let base = "http://testserver/api/bugs/";
    let results: Vec<&BugReport> = bugs.iter().skip(start).take(PAGE_SIZE).collect();
    Json(json!({
        "count": bugs.len(),
        "next": (start + PAGE_SIZE < bugs.len()).then(|| page_link(base, &query, page + 1)),
        "previous": (page > 1).then(|| page_link(base, &query, page - 1)),
        "results": results,
    }))
    .into_response()
}

/// DRF-style field validation for create and update bodies.
fn validate_payload(body: Value) -> Result<BugPayload, Response> {
    let payload: BugPayload = serde_json::from_value(body).map_err(|e| {
        error(StatusCode::BAD_REQUEST, json!({ "non_field_errors": [e.to_string()] }))
    })?;
    let mut errors = serde_json::Map::new();
    if payload.title.trim().chars().count() < 5 {
        errors.insert(
            "title".into(),
            json!(["Title must be at least 5 characters long."]),
        );
    }
    if payload.description.trim().chars().count() < 10 {
        errors.insert(
            "description".into(),
            json!(["Description must be at least 10 characters long."]),
        );
    }
    if errors.is_empty() {
        Ok(payload)
    } else {
        Err(error(StatusCode::BAD_REQUEST, Value::Object(errors)))
    }
}

fn apply(bug: &mut BugReport, payload: BugPayload) {
    let optional = |s: String| Some(s).filter(|s| !s.is_empty());
    bug.title = payload.title.trim().to_string();
    bug.description = payload.description.trim().to_string();
    bug.steps_to_reproduce = optional(payload.steps_to_reproduce);
    bug.expected_result = optional(payload.expected_result);
    bug.actual_result = optional(payload.actual_result);
    bug.environment = optional(payload.environment);
    bug.severity = payload.severity;
    bug.status = payload.status;
    bug.tags = payload.tags.iter().map(|t| t.trim().to_lowercase()).collect();
}

async fn create_bug(
    State(store): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut store = store.lock().unwrap();
    let user = match authenticate(&store, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    let payload = match validate_payload(body) {
        Ok(payload) => payload,
        Err(response) => return response,
    };

    let now = store.next_timestamp();
    let mut bug = BugReport {
        id: Uuid::new_v4(),
        title: String::new(),
        description: String::new(),
        steps_to_reproduce: None,
        expected_result: None,
        actual_result: None,
        environment: None,
        severity: payload.severity,
        status: payload.status,
        tags: Vec::new(),
        created_by: user,
        created_at: now,
        updated_at: now,
    };
    apply(&mut bug, payload);
    store.bugs.push(bug.clone());
    (StatusCode::CREATED, Json(bug)).into_response()
}

fn owned_index(store: &Store, user: &User, id: &str) -> Option<usize> {
    let id = Uuid::parse_str(id).ok()?;
    store
        .bugs
        .iter()
        .position(|b| b.id == id && b.created_by.id == user.id)
}

async fn get_bug(
    State(store): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let store = store.lock().unwrap();
    let user = match authenticate(&store, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    match owned_index(&store, &user, &id) {
        Some(index) => Json(store.bugs[index].clone()).into_response(),
        None => not_found(),
    }
}

async fn update_bug(
    State(store): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut store = store.lock().unwrap();
    let user = match authenticate(&store, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    let Some(index) = owned_index(&store, &user, &id) else {
        return not_found();
    };
    let payload = match validate_payload(body) {
        Ok(payload) => payload,
        Err(response) => return response,
    };
    let now = store.next_timestamp();
    let bug = &mut store.bugs[index];
    apply(bug, payload);
    bug.updated_at = now;
    Json(bug.clone()).into_response()
}

async fn delete_bug(
    State(store): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let mut store = store.lock().unwrap();
    let user = match authenticate(&store, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    match owned_index(&store, &user, &id) {
        Some(index) => {
            store.bugs.remove(index);
            StatusCode::NO_CONTENT.into_response()
        }
        None => not_found(),
    }
}

fn router(store: Shared) -> Router {
    Router::new()
        .route("/api/auth/register/", post(register))
        .route("/api/auth/token/", post(token))
        .route("/api/auth/token/refresh/", post(refresh))
        .route("/api/bugs/", get(list_bugs).post(create_bug))
        .route(
            "/api/bugs/{id}/",
            get(get_bug).put(update_bug).delete(delete_bug),
        )
        .with_state(store)
}

/// A running fake backend.
pub struct Backend {
    pub addr: SocketAddr,
}

impl Backend {
    /// Serve on an ephemeral port inside the current tokio runtime.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(Shared::default());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self { addr }
    }

    /// Serve from a dedicated thread with its own runtime, for blocking
    /// tests that drive the CLI binary.
    pub fn start_in_thread() -> Self {
        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            runtime.block_on(async move {
                let backend = Backend::start().await;
                tx.send(backend.addr).unwrap();
                std::future::pending::<()>().await;
            });
        });
        Self {
            addr: rx.recv().unwrap(),
        }
    }

    /// Base URL including the `/api` prefix.
    pub fn api_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }
}
