//! Backend access.
//!
//! `BugApi` is the seam between pages and the network: pages and the auth
//! context only ever talk to the trait, `ApiClient` implements it over HTTP.

pub mod client;

#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::ClientResult;
use crate::models::{
    BugFilters, BugPayload, BugReport, Credentials, Page, RefreshResponse, Registration,
    TokenPair, User,
};

pub use client::ApiClient;

/// One method per backend operation.
#[async_trait]
pub trait BugApi: Send + Sync {
    async fn list_bugs(&self, filters: &BugFilters) -> ClientResult<Page<BugReport>>;

    async fn get_bug(&self, id: Uuid) -> ClientResult<BugReport>;

    async fn create_bug(&self, payload: &BugPayload) -> ClientResult<BugReport>;

    /// Full replace of the editable fields.
    async fn update_bug(&self, id: Uuid, payload: &BugPayload) -> ClientResult<BugReport>;

    async fn delete_bug(&self, id: Uuid) -> ClientResult<()>;

    /// Exchange credentials for a token pair. The bearer token is left alone;
    /// callers attach it with `set_token` once the session is stored.
    async fn login(&self, credentials: &Credentials) -> ClientResult<TokenPair>;

    async fn register(&self, registration: &Registration) -> ClientResult<User>;

    async fn refresh(&self, refresh_token: &str) -> ClientResult<RefreshResponse>;

    /// Replace the bearer token sent with requests (`None` signs out).
    fn set_token(&self, token: Option<String>);
}
