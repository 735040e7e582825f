//! Page controllers.
//!
//! Each page owns its screen state (filters, loaded records, form input,
//! error text, submitting flag) and the operations a user can trigger on it.
//! Pages never print; the `ui` module renders them and the CLI decides what
//! to do with the [`Route`] a page asks for.
//!
//! | Page             | Screen                                  |
//! |------------------|-----------------------------------------|
//! | `BugListPage`    | filterable, paginated list with delete  |
//! | `BugDetailPage`  | read view with embedded edit form       |
//! | `NewBugPage`     | create form                             |
//! | `LoginPage`      | sign in                                 |
//! | `RegisterPage`   | create account                          |

pub mod auth;
pub mod detail;
pub mod list;
pub mod new;

use uuid::Uuid;

use crate::auth::AuthState;
use crate::forms::FieldErrors;

pub use auth::{LoginPage, RegisterPage};
pub use detail::{BugDetailPage, DetailMode};
pub use list::BugListPage;
pub use new::NewBugPage;

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this bug?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    BugList,
    NewBug,
    BugDetail(Uuid),
}

/// Asynchronous data as a page sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Result of a form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Another submission is still in flight
    Ignored,
    /// Client-side validation failed; nothing was sent
    Invalid(FieldErrors),
    /// The request failed; the text is what the page shows
    Failed(String),
    /// Saved in place
    Saved,
    Navigate(Route),
}

/// Outcome of a delete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined; no request was made
    Cancelled,
    Deleted,
    Failed(String),
}

/// Interactive yes/no question asked before destructive actions.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Where the landing page sends the user, if anywhere.
pub fn home_redirect(state: &AuthState) -> Option<Route> {
    state.is_authenticated().then_some(Route::BugList)
}

/// Redirect for pages that need a signed-in user.
pub fn require_auth(state: &AuthState) -> Option<Route> {
    (!state.is_authenticated()).then_some(Route::Login)
}

/// Where signing out lands.
pub fn after_logout() -> Route {
    Route::Login
}
