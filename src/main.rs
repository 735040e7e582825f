use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use bugdesk::config::HOME_ENV;
use bugdesk::models::{Ordering, Severity, Status};

mod cmd;

/// Env var holding a `tracing` filter directive, e.g. `bugdesk=debug`.
const LOG_ENV: &str = "BUGDESK_LOG";

#[derive(Parser)]
#[command(name = "bugdesk")]
#[command(version, about = "Terminal client for the bug tracker API")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Answer "yes" to confirmation prompts
    #[arg(long, global = true)]
    pub yes: bool,

    /// API base URL. Overrides BUGDESK_API_URL and config.toml.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Directory holding config.toml and the saved session
    #[arg(long, global = true, env = HOME_ENV)]
    pub home: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        username: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
        #[arg(long, env = "BUGDESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Defaults to --password when that is given
        #[arg(long)]
        password_confirm: Option<String>,
    },
    /// Sign in and save the session
    Login {
        #[arg(short, long)]
        username: Option<String>,
        #[arg(long, env = "BUGDESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the saved session
    Logout,
    /// Show who is signed in
    Whoami,
    /// Exchange the refresh token for a new access token
    Refresh,
    /// List bug reports
    List(ListArgs),
    /// Browse bug reports interactively
    Browse(ListArgs),
    /// Show a single bug report
    Show { id: String },
    /// Report a new bug
    New(BugFields),
    /// Edit a bug report
    Edit {
        id: String,
        #[command(flatten)]
        fields: BugFields,
    },
    /// Delete a bug report
    Delete { id: String },
    /// View or initialize configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Args, Clone, Default)]
pub struct ListArgs {
    /// Search titles and descriptions
    #[arg(short, long)]
    pub search: Option<String>,
    #[arg(long)]
    pub severity: Option<Severity>,
    #[arg(long)]
    pub status: Option<Status>,
    /// Only bugs carrying this tag
    #[arg(long)]
    pub tag: Option<String>,
    /// Created on or after (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_parser = cmd::parse_date)]
    pub created_after: Option<DateTime<Utc>>,
    /// Created on or before (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_parser = cmd::parse_date)]
    pub created_before: Option<DateTime<Utc>>,
    /// Sort key, e.g. -created_at, title, -severity
    #[arg(long, allow_hyphen_values = true)]
    pub sort: Option<Ordering>,
    #[arg(short, long, default_value = "1")]
    pub page: u32,
}

/// Bug form fields. Any flag given skips the interactive prompts.
#[derive(Args, Clone, Default)]
pub struct BugFields {
    #[arg(short, long)]
    pub title: Option<String>,
    #[arg(short, long)]
    pub description: Option<String>,
    #[arg(long)]
    pub steps: Option<String>,
    #[arg(long)]
    pub expected: Option<String>,
    #[arg(long)]
    pub actual: Option<String>,
    /// low, medium, high or critical
    #[arg(long)]
    pub severity: Option<String>,
    /// open, in_progress, resolved or closed
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub environment: Option<String>,
    /// Comma-separated
    #[arg(long)]
    pub tags: Option<String>,
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Write a default config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cmd::load_config(&cli)?;

    match cli.command {
        Commands::Register {
            username,
            email,
            password,
            password_confirm,
        } => {
            let mut app = cmd::App::open(config)?;
            cmd::cmd_register(&mut app, username, email, password, password_confirm).await?;
        }
        Commands::Login { username, password } => {
            let mut app = cmd::App::open(config)?;
            cmd::cmd_login(&mut app, username, password).await?;
        }
        Commands::Logout => cmd::cmd_logout(&mut cmd::App::open(config)?)?,
        Commands::Whoami => cmd::cmd_whoami(&cmd::App::open(config)?),
        Commands::Refresh => cmd::cmd_refresh(&mut cmd::App::open(config)?).await?,
        Commands::List(args) => cmd::cmd_list(&cmd::App::open(config)?, args).await?,
        Commands::Browse(args) => cmd::cmd_browse(&cmd::App::open(config)?, args).await?,
        Commands::Show { id } => cmd::cmd_show(&cmd::App::open(config)?, &id).await?,
        Commands::New(fields) => cmd::cmd_new(&cmd::App::open(config)?, fields).await?,
        Commands::Edit { id, fields } => {
            cmd::cmd_edit(&cmd::App::open(config)?, &id, fields).await?
        }
        Commands::Delete { id } => cmd::cmd_delete(&cmd::App::open(config)?, &id).await?,
        Commands::Config { command } => cmd::cmd_config(&config, command)?,
    }

    Ok(())
}
