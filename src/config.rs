//! Configuration for bugdesk.
//!
//! Settings live in `config.toml` inside the bugdesk home directory
//! (`$BUGDESK_HOME`, else `<config dir>/bugdesk`). Values are layered
//! file → environment → CLI.
//!
//! # Configuration File Format
//!
//! ```toml
//! [api]
//! base_url = "https://bugs.example.com/api"
//! timeout_secs = 30
//!
//! [list]
//! default_ordering = "-updated_at"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::Ordering;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const API_URL_ENV: &str = "BUGDESK_API_URL";
pub const HOME_ENV: &str = "BUGDESK_HOME";
pub const CONFIG_FILE: &str = "config.toml";
pub const SESSION_FILE: &str = "session.json";

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSection {
    /// Base URL of the REST API, including the `/api` prefix
    #[serde(default)]
    pub base_url: Option<String>,
    /// Request timeout applied by the HTTP transport
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListSection {
    #[serde(default)]
    pub default_ordering: Ordering,
}

/// Parsed `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BugdeskToml {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub list: ListSection,
}

impl BugdeskToml {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config.toml")
    }

    /// Returns the default configuration if the file doesn't exist.
    pub fn load_or_default(home: &Path) -> Result<Self> {
        let config_path = home.join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Warnings for values that parse but will not work.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if let Some(url) = &self.api.base_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                warnings.push(format!(
                    "api.base_url '{}' should start with http:// or https://",
                    url
                ));
            }
            if url.ends_with('/') {
                warnings.push("api.base_url should not end with '/'".to_string());
            }
        }

        if self.api.timeout_secs == 0 {
            warnings.push("api.timeout_secs is 0; every request will time out".to_string());
        }

        warnings
    }
}

/// Resolve the home directory: CLI flag, then `$BUGDESK_HOME`, then the
/// platform config directory.
pub fn resolve_home(cli_home: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(home) = cli_home {
        return Ok(home);
    }
    if let Some(home) = std::env::var(HOME_ENV).ok().filter(|h| !h.trim().is_empty()) {
        return Ok(PathBuf::from(home));
    }
    dirs::config_dir()
        .map(|dir| dir.join("bugdesk"))
        .context("Could not determine a configuration directory; set BUGDESK_HOME")
}

/// Effective configuration with CLI overrides applied.
#[derive(Debug, Clone)]
pub struct BugdeskConfig {
    pub home: PathBuf,
    pub toml: BugdeskToml,
    pub cli_api_url: Option<String>,
    pub verbose: bool,
    /// Skip confirmation prompts
    pub yes: bool,
}

impl BugdeskConfig {
    pub fn new(home: PathBuf) -> Result<Self> {
        let toml = BugdeskToml::load_or_default(&home)?;
        Ok(Self {
            home,
            toml,
            cli_api_url: None,
            verbose: false,
            yes: false,
        })
    }

    pub fn with_cli_args(
        home: PathBuf,
        api_url: Option<String>,
        verbose: bool,
        yes: bool,
    ) -> Result<Self> {
        let mut config = Self::new(home)?;
        config.cli_api_url = api_url;
        config.verbose = verbose;
        config.yes = yes;
        Ok(config)
    }

    /// API base URL (CLI → env → file → default), without trailing slash.
    pub fn api_url(&self) -> String {
        let env_url = std::env::var(API_URL_ENV).ok().filter(|v| !v.trim().is_empty());
        self.resolve_api_url(env_url)
    }

    fn resolve_api_url(&self, env_url: Option<String>) -> String {
        let url = self
            .cli_api_url
            .clone()
            .or(env_url)
            .or_else(|| self.toml.api.base_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        url.trim_end_matches('/').to_string()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.toml.api.timeout_secs)
    }

    pub fn default_ordering(&self) -> Ordering {
        self.toml.list.default_ordering
    }

    pub fn config_file(&self) -> PathBuf {
        self.home.join(CONFIG_FILE)
    }

    pub fn session_file(&self) -> PathBuf {
        self.home.join(SESSION_FILE)
    }

    pub fn validate(&self) -> Vec<String> {
        self.toml.validate()
    }
}
