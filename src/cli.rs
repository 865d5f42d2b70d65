//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::analysis::{AuditWindow, MAX_DAYS};
use crate::config::DEFAULT_CONFIG_FILE;
use crate::error::ValidationError;
use clap::{Parser, Subcommand};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)+$")
        .expect("email pattern is valid")
});

/// gsuite - audit and reporting for Google Workspace
///
/// Reads the Admin SDK (Directory, Reports) and Drive APIs and prints
/// created users, granted privileges, login anomalies, 2SV status,
/// groups, organization units and Drive sharing.
///
/// Examples:
///   gsuite login suspicious --days 30
///   gsuite audit privileges --window last-three-months
///   gsuite group search alice@example.com
///   gsuite user stale-admins --format json
///   gsuite --init-config
#[derive(Parser, Debug, Clone)]
#[command(name = "gsuite", author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to configuration file
    #[arg(
        short,
        long,
        global = true,
        default_value = DEFAULT_CONFIG_FILE,
        env = "GSUITE_CONFIG",
        value_name = "FILE"
    )]
    pub config: PathBuf,

    /// Output format (text, json)
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (errors only, no progress spinner)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Generate a default gsuite_config.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Resource areas.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Audit administrator actions
    Audit {
        #[command(subcommand)]
        action: AuditCommand,
    },
    /// Inspect groups and group membership
    Group {
        #[command(subcommand)]
        action: GroupCommand,
    },
    /// Inspect Drive folders and their sharing
    Drive {
        #[command(subcommand)]
        action: DriveCommand,
    },
    /// Login activity and 2-step verification
    Login {
        #[command(subcommand)]
        action: LoginCommand,
    },
    /// Directory user reports
    User {
        #[command(subcommand)]
        action: UserCommand,
    },
    /// Organization units
    Org {
        #[command(subcommand)]
        action: OrgCommand,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum AuditCommand {
    /// Users created within the window
    CreatedUsers {
        #[arg(long, value_enum, default_value_t = AuditWindow::LastMonth)]
        window: AuditWindow,
    },
    /// Admin and delegated-admin privileges granted within the window
    Privileges {
        #[arg(long, value_enum, default_value_t = AuditWindow::LastMonth)]
        window: AuditWindow,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum GroupCommand {
    /// List every group of the domain
    List,
    /// List the groups a member belongs to
    Search {
        /// Member email address
        #[arg(value_parser = parse_email)]
        email: String,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum DriveCommand {
    /// Every folder with its permissions and contents
    List,
    /// Folders whose name contains the keyword
    Search {
        #[arg(value_parser = parse_keyword)]
        keyword: String,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum LoginCommand {
    /// Users not enrolled in 2-step verification (usage report)
    #[command(name = "non2sv")]
    Non2sv,
    /// Users with at least one sign-in from outside the trusted networks
    #[command(alias = "suspicious_login")]
    Suspicious {
        /// Days of login history to inspect [default: api.login_lookback_days]
        #[arg(long, value_parser = parse_days)]
        days: Option<u32>,

        /// Also list logins Google itself marked as suspicious
        #[arg(long)]
        google_flagged: bool,
    },
    /// Users who have not signed in recently
    #[command(alias = "rare-login")]
    Rare {
        /// Inactivity threshold in days [default: api.rare_login_days]
        #[arg(long, value_parser = parse_days)]
        days: Option<u32>,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Super admins and delegated admins
    Admins,
    /// Admins who have not signed in recently
    StaleAdmins {
        /// Inactivity threshold in days [default: api.stale_admin_days]
        #[arg(long, value_parser = parse_days)]
        days: Option<u32>,
    },
    /// Suspended users
    Suspended,
    /// Users neither enforced nor enrolled in 2-step verification
    #[command(name = "non2sv")]
    Non2sv,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum OrgCommand {
    /// List every organization unit
    List,
}

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text lines (default)
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

impl Command {
    /// `--days` given to `login suspicious`.
    pub fn login_lookback_days(&self) -> Option<u32> {
        match self {
            Command::Login {
                action: LoginCommand::Suspicious { days, .. },
            } => *days,
            _ => None,
        }
    }

    /// `--days` given to `login rare`.
    pub fn rare_login_days(&self) -> Option<u32> {
        match self {
            Command::Login {
                action: LoginCommand::Rare { days },
            } => *days,
            _ => None,
        }
    }

    /// `--days` given to `user stale-admins`.
    pub fn stale_admin_days(&self) -> Option<u32> {
        match self {
            Command::User {
                action: UserCommand::StaleAdmins { days },
            } => *days,
            _ => None,
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.verbose && self.quiet {
            return Err(ValidationError::ConflictingVerbosity);
        }
        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

/// Accept only something shaped like an email address.
pub fn parse_email(value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if EMAIL_PATTERN.is_match(value) {
        Ok(value.to_string())
    } else {
        Err(ValidationError::InvalidEmail(value.to_string()))
    }
}

pub fn parse_keyword(value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::EmptyKeyword);
    }
    Ok(value.to_string())
}

pub fn parse_days(value: &str) -> Result<u32, ValidationError> {
    let days: u32 = value
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidDays(value.to_string()))?;
    if days == 0 {
        return Err(ValidationError::ZeroDays);
    }
    if days > MAX_DAYS {
        return Err(ValidationError::DaysOutOfRange {
            days,
            max: MAX_DAYS,
        });
    }
    Ok(days)
}
