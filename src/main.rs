//! gsuite - audit and reporting CLI for Google Workspace
//!
//! Reads the Admin SDK Directory and Reports APIs and the Drive API and
//! prints audit findings to stdout. Logs and progress go to stderr.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (config, auth, API failure, bad argument)
//!   2 - Command-line usage error (reported by clap)

mod actions;
mod analysis;
mod auth;
mod cli;
mod config;
mod error;
mod google;
mod models;
mod report;
mod services;

use actions::{AuditActions, DriveActions, GroupActions, LoginActions, OrgActions, UserActions};
use anyhow::{Context, Result};
use chrono::Utc;
use clap::CommandFactory;
use cli::{
    Args, AuditCommand, Command, DriveCommand, GroupCommand, LoginCommand, OrgCommand,
    OutputFormat, UserCommand,
};
use config::{Config, DEFAULT_CONFIG_FILE};
use google::GoogleClient;
use std::path::Path;
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        if let Err(e) = handle_init_config() {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    let Some(command) = args.command.clone() else {
        let _ = Args::command().print_help();
        return;
    };

    init_logging(&args);
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(&args, command).await {
        error!("Command failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Handle --init-config: generate a default gsuite_config.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        anyhow::bail!(
            "{} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
    }

    let content = Config::default_toml().context("Failed to render default config")?;
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("Edit [owner] and [networks], then place client_secret.json next to it.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Warning: a tracing subscriber was already installed");
    }
}

/// Load, merge and validate configuration.
fn load_config(args: &Args) -> Result<Config> {
    info!("Loading config from: {}", args.config.display());
    let mut config = Config::load(&args.config)?;
    config.merge_with_args(args);
    config.validate()?;
    Ok(config)
}

/// Authenticate, run one command and print its result.
async fn run(args: &Args, command: Command) -> Result<()> {
    let config = load_config(args)?;
    let domain = config.owner.domain.as_str();

    let token = auth::access_token(&config.auth, &config.scopes)
        .await
        .context("Authentication failed")?;
    let client = GoogleClient::new(token, &config.api, !args.quiet)?;

    let now = Utc::now();
    let format = args.format;

    let output = match command {
        Command::Audit { action } => {
            let audit = AuditActions::new(&client);
            let events = match action {
                AuditCommand::CreatedUsers { window } => audit.created_users(window, now).await?,
                AuditCommand::Privileges { window } => {
                    audit.granted_privileges(window, now).await?
                }
            };
            report::render(format, events.as_slice(), report::generate_admin_events)?
        }

        Command::Group { action } => {
            let groups = GroupActions::new(&client);
            let found = match action {
                GroupCommand::List => groups.list(domain).await?,
                GroupCommand::Search { email } => groups.search(domain, &email).await?,
            };
            report::render(format, found.as_slice(), report::generate_groups)?
        }

        Command::Drive { action } => {
            let drive = DriveActions::new(&client);
            let folders = match action {
                DriveCommand::List => drive.folders(None).await?,
                DriveCommand::Search { keyword } => drive.folders(Some(keyword.as_str())).await?,
            };
            report::render(format, folders.as_slice(), report::generate_folders)?
        }

        Command::Login { action } => {
            let login = LoginActions::new(&client, &client, &client);
            match action {
                LoginCommand::Non2sv => {
                    let result = login
                        .non_2sv(now.date_naive(), config.api.usage_report_retries)
                        .await?;
                    report::render(format, &result, report::generate_two_step_report)?
                }
                LoginCommand::Suspicious { google_flagged, .. } => {
                    let result = login
                        .suspicious(
                            &config.reference_set(),
                            config.api.login_lookback_days,
                            google_flagged,
                            now,
                        )
                        .await?;
                    report::render(format, &result, report::generate_suspicious_logins)?
                }
                LoginCommand::Rare { .. } => {
                    let stale = login
                        .rare(domain, config.api.rare_login_days, now)
                        .await?;
                    report::render(format, stale.as_slice(), report::generate_stale_users)?
                }
            }
        }

        Command::User { action } => {
            let users = UserActions::new(&client);
            match action {
                UserCommand::StaleAdmins { .. } => {
                    let stale = users
                        .stale_admins(domain, config.api.stale_admin_days, now)
                        .await?;
                    report::render(format, stale.as_slice(), report::generate_stale_users)?
                }
                UserCommand::Admins => {
                    let found = users.admins(domain).await?;
                    report::render(format, found.as_slice(), report::generate_users)?
                }
                UserCommand::Suspended => {
                    let found = users.suspended(domain).await?;
                    report::render(format, found.as_slice(), report::generate_users)?
                }
                UserCommand::Non2sv => {
                    let found = users.non_2sv(domain).await?;
                    report::render(format, found.as_slice(), report::generate_users)?
                }
            }
        }

        Command::Org {
            action: OrgCommand::List,
        } => {
            let units = OrgActions::new(&client).list().await?;
            report::render(format, units.as_slice(), report::generate_org_units)?
        }
    };

    if output.is_empty() && format == OutputFormat::Text {
        info!("No results");
    } else {
        print!("{}", output);
        if format == OutputFormat::Json {
            println!();
        }
    }

    Ok(())
}
