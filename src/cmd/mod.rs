//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module     | Commands handled                                      |
//! |------------|-------------------------------------------------------|
//! | `auth`     | `Register`, `Login`, `Logout`, `Whoami`, `Refresh`    |
//! | `bugs`     | `List`, `Show`, `New`, `Edit`, `Delete`               |
//! | `browse`   | `Browse`                                              |
//! | `config`   | `Config`                                              |
//! | `prompts`  | interactive form filling shared by the above          |

pub mod auth;
pub mod browse;
pub mod bugs;
pub mod config;
pub mod prompts;

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::warn;
use uuid::Uuid;

use bugdesk::api::{ApiClient, BugApi};
use bugdesk::auth::{AuthContext, FileSessionStore};
use bugdesk::config::{BugdeskConfig, resolve_home};
use bugdesk::pages::{Route, Submission, require_auth};
use bugdesk::ui;

use super::Cli;

pub use auth::{cmd_login, cmd_logout, cmd_refresh, cmd_register, cmd_whoami};
pub use browse::cmd_browse;
pub use bugs::{cmd_delete, cmd_edit, cmd_list, cmd_new, cmd_show};
pub use config::cmd_config;

pub fn load_config(cli: &Cli) -> Result<BugdeskConfig> {
    let home = resolve_home(cli.home.clone())?;
    let config = BugdeskConfig::with_cli_args(home, cli.api_url.clone(), cli.verbose, cli.yes)?;
    for warning in config.validate() {
        warn!("{}", warning);
    }
    Ok(config)
}

/// Everything a command needs: effective config plus a restored session.
pub struct App {
    pub config: BugdeskConfig,
    pub auth: AuthContext,
}

impl App {
    pub fn open(config: BugdeskConfig) -> Result<Self> {
        let client = ApiClient::new(&config.api_url(), config.timeout())
            .context("Failed to build HTTP client")?;
        let store = FileSessionStore::new(config.session_file());
        let mut auth = AuthContext::new(Arc::new(client), Box::new(store));
        auth.restore().context("Failed to read saved session")?;
        Ok(Self { config, auth })
    }

    /// The API handle, or an error pointing at `bugdesk login`.
    pub fn api(&self) -> Result<Arc<dyn BugApi>> {
        if let Some(route) = require_auth(self.auth.state()) {
            bail!("Not signed in. Run `{}` first.", route_hint(&route));
        }
        Ok(self.auth.api())
    }
}

/// The command that shows the screen a page navigated to.
pub fn route_hint(route: &Route) -> String {
    match route {
        Route::Home => "bugdesk".to_string(),
        Route::Login => "bugdesk login".to_string(),
        Route::Register => "bugdesk register".to_string(),
        Route::BugList => "bugdesk list".to_string(),
        Route::NewBug => "bugdesk new".to_string(),
        Route::BugDetail(id) => format!("bugdesk show {}", id),
    }
}

/// Turn a page submission into a command result, printing field errors.
pub fn finish(submission: Submission) -> Result<Option<Route>> {
    match submission {
        Submission::Saved => Ok(None),
        Submission::Navigate(route) => Ok(Some(route)),
        Submission::Invalid(errors) => {
            ui::print_field_errors(&errors);
            bail!("{} field(s) need attention", errors.len())
        }
        Submission::Failed(message) => bail!(message),
        Submission::Ignored => bail!("A request is already in progress"),
    }
}

pub fn parse_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id.trim()).with_context(|| format!("'{}' is not a valid bug id", id))
}

/// `YYYY-MM-DD` (midnight UTC) or a full RFC 3339 timestamp.
pub fn parse_date(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("Invalid date: {}. Use YYYY-MM-DD or RFC 3339", value))
}
