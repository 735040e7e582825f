//! Configuration view and setup commands: `bugdesk config`.

use anyhow::Result;
use console::style;

use bugdesk::auth::{FileSessionStore, SessionStore};
use bugdesk::config::{API_URL_ENV, BugdeskConfig, BugdeskToml};
use bugdesk::ui;

use crate::ConfigCommands;

pub fn cmd_config(config: &BugdeskConfig, command: Option<ConfigCommands>) -> Result<()> {
    let config_path = config.config_file();

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("bugdesk Configuration");
            println!("=====================");
            println!();
            println!("Home:        {}", config.home.display());
            if config_path.exists() {
                println!("Config file: {}", config_path.display());
            } else {
                println!(
                    "Config file: {} {}",
                    config_path.display(),
                    style("(not created, using defaults)").dim()
                );
            }
            println!();

            println!("[api]");
            match &config.toml.api.base_url {
                Some(url) => println!("  base_url = \"{}\"", url),
                None => println!("  base_url = (unset)"),
            }
            println!("  timeout_secs = {}", config.toml.api.timeout_secs);
            println!();
            println!("[list]");
            println!("  default_ordering = \"{}\"", config.toml.list.default_ordering);
            println!();

            println!("Effective values (with env/CLI overrides):");
            println!("  api_url = \"{}\"", config.api_url());
            if std::env::var(API_URL_ENV).is_ok() {
                println!("  ({} is set)", API_URL_ENV);
            }
            let session = FileSessionStore::new(config.session_file()).load()?;
            match session {
                Some(session) => println!("  signed in as {}", session.username),
                None => println!("  not signed in"),
            }
            println!();

            let warnings = config.validate();
            if !warnings.is_empty() {
                println!("Warnings:");
                for warning in &warnings {
                    println!("  {}{}", ui::icons::WARN, warning);
                }
                println!();
            }
        }
        Some(ConfigCommands::Init { force }) => {
            if config_path.exists() && !force {
                println!("config.toml already exists at {}", config_path.display());
                println!("Use --force to overwrite it.");
                return Ok(());
            }
            BugdeskToml::default().save(&config_path)?;
            ui::success(&format!("Wrote {}", config_path.display()));
        }
    }

    Ok(())
}
