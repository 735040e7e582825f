use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use uuid::Uuid;

use super::BugApi;
use crate::errors::{ApiError, ClientError, ClientResult};
use crate::models::{
    BugFilters, BugPayload, BugReport, Credentials, Page, RefreshResponse, RegisterResponse,
    Registration, TokenPair, User,
};

const USER_AGENT: &str = concat!("bugdesk/", env!("CARGO_PKG_VERSION"));

/// HTTP implementation of [`BugApi`].
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    /// `base_url` includes the API prefix, e.g. `http://localhost:8000/api`.
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ClientError::Transport)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self
            .http
            .request(method, url)
            .header(ACCEPT, "application/json");

        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send the request and turn any non-2xx status into an [`ApiError`].
    async fn dispatch(&self, builder: RequestBuilder) -> ClientResult<Response> {
        let request = builder.build().map_err(ClientError::Transport)?;
        let method = request.method().clone();
        let url = request.url().clone();

        debug!(%method, %url, "sending request");
        let response = self.http.execute(request).await?;
        let status = response.status();
        debug!(%method, %url, status = status.as_u16(), "received response");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_response(status.as_u16(), &body);
        warn!(%method, %url, status = status.as_u16(), message = %err.message, "request rejected");
        Err(err.into())
    }

    async fn fetch_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let response = self.dispatch(builder).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

fn bug_path(id: Uuid) -> String {
    format!("/bugs/{}/", id)
}

#[async_trait]
impl BugApi for ApiClient {
    async fn list_bugs(&self, filters: &BugFilters) -> ClientResult<Page<BugReport>> {
        let builder = self
            .request(Method::GET, "/bugs/")
            .query(&filters.to_query());
        self.fetch_json(builder).await
    }

    async fn get_bug(&self, id: Uuid) -> ClientResult<BugReport> {
        self.fetch_json(self.request(Method::GET, &bug_path(id)))
            .await
    }

    async fn create_bug(&self, payload: &BugPayload) -> ClientResult<BugReport> {
        let builder = self.request(Method::POST, "/bugs/").json(payload);
        self.fetch_json(builder).await
    }

    async fn update_bug(&self, id: Uuid, payload: &BugPayload) -> ClientResult<BugReport> {
        let builder = self.request(Method::PUT, &bug_path(id)).json(payload);
        self.fetch_json(builder).await
    }

    async fn delete_bug(&self, id: Uuid) -> ClientResult<()> {
        self.dispatch(self.request(Method::DELETE, &bug_path(id)))
            .await?;
        Ok(())
    }

    async fn login(&self, credentials: &Credentials) -> ClientResult<TokenPair> {
        let builder = self.request(Method::POST, "/auth/token/").json(credentials);
        let tokens: TokenPair = self.fetch_json(builder).await?;
        Ok(tokens)
    }

    async fn register(&self, registration: &Registration) -> ClientResult<User> {
        let builder = self
            .request(Method::POST, "/auth/register/")
            .json(registration);
        let response: RegisterResponse = self.fetch_json(builder).await?;
        if let Some(message) = &response.message {
            debug!(username = %response.user.username, %message, "registered");
        }
        Ok(response.user)
    }

    async fn refresh(&self, refresh_token: &str) -> ClientResult<RefreshResponse> {
        let builder = self
            .request(Method::POST, "/auth/token/refresh/")
            .json(&serde_json::json!({ "refresh": refresh_token }));
        let refreshed: RefreshResponse = self.fetch_json(builder).await?;
        Ok(refreshed)
    }

    fn set_token(&self, token: Option<String>) {
        let mut guard = self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = token;
    }
}
