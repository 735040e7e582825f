//! Authentication state for the current user.
//!
//! `AuthContext` owns the session: it restores a persisted token at startup,
//! and login/register/logout keep the API client's bearer token and the
//! session store in step. It never decides where the user goes next; pages
//! read `state()` and redirect themselves.

pub mod session;

use std::sync::Arc;

use tracing::{debug, info};

use crate::api::BugApi;
use crate::errors::{ClientError, ClientResult};
use crate::models::{Credentials, Registration, User};

pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Session not yet restored
    Loading,
    Authenticated { username: String },
    Unauthenticated,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated { .. })
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, AuthState::Loading)
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            AuthState::Authenticated { username } => Some(username),
            _ => None,
        }
    }
}

pub struct AuthContext {
    api: Arc<dyn BugApi>,
    store: Box<dyn SessionStore>,
    state: AuthState,
}

impl AuthContext {
    pub fn new(api: Arc<dyn BugApi>, store: Box<dyn SessionStore>) -> Self {
        Self {
            api,
            store,
            state: AuthState::Loading,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn api(&self) -> Arc<dyn BugApi> {
        Arc::clone(&self.api)
    }

    /// Load the persisted session, if any, and attach its token.
    pub fn restore(&mut self) -> ClientResult<&AuthState> {
        match self.store.load()? {
            Some(session) => {
                debug!(username = %session.username, "restored session");
                self.api.set_token(Some(session.access.clone()));
                self.state = AuthState::Authenticated {
                    username: session.username,
                };
            }
            None => {
                self.api.set_token(None);
                self.state = AuthState::Unauthenticated;
            }
        }
        Ok(&self.state)
    }

    /// On failure the error is returned untouched and the state is unchanged.
    pub async fn login(&mut self, credentials: &Credentials) -> ClientResult<()> {
        let tokens = self.api.login(credentials).await?;
        let session = Session::new(credentials.username.clone(), tokens);
        self.store.save(&session)?;
        self.api.set_token(Some(session.access.clone()));
        info!(username = %session.username, "signed in");
        self.state = AuthState::Authenticated {
            username: session.username,
        };
        Ok(())
    }

    /// Create the account, then sign in with the same credentials.
    pub async fn register(&mut self, registration: &Registration) -> ClientResult<User> {
        let user = self.api.register(registration).await?;
        info!(username = %user.username, "registered account");
        self.login(&registration.credentials()).await?;
        Ok(user)
    }

    pub fn logout(&mut self) -> ClientResult<()> {
        self.store.clear()?;
        self.api.set_token(None);
        if let Some(username) = self.state.username() {
            info!(%username, "signed out");
        }
        self.state = AuthState::Unauthenticated;
        Ok(())
    }

    /// Trade the stored refresh token for a fresh access token.
    pub async fn refresh(&mut self) -> ClientResult<()> {
        let mut session = self.store.load()?.ok_or(ClientError::NotSignedIn)?;
        let refreshed = self.api.refresh(&session.refresh).await?;
        session.access = refreshed.access;
        if let Some(rotated) = refreshed.refresh {
            session.refresh = rotated;
        }
        self.store.save(&session)?;
        self.api.set_token(Some(session.access.clone()));
        self.state = AuthState::Authenticated {
            username: session.username,
        };
        Ok(())
    }
}
