//! Report text generation.
//!
//! Each command's result has a plain-text renderer here; JSON output goes
//! through `generate_json_report` for all of them.

use crate::actions::{AdminEvent, FileReport, FolderReport, SuspiciousLoginReport, TwoStepReport};
use crate::analysis::StaleUser;
use crate::models::{Group, OrgUnit, Permission, User};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

fn format_time(time: Option<DateTime<Utc>>) -> String {
    match time {
        Some(t) => t.format(TIME_FORMAT).to_string(),
        None => "-".to_string(),
    }
}

/// Admin console events, one line each.
pub fn generate_admin_events(events: &[AdminEvent]) -> String {
    let mut output = String::new();

    for event in events {
        output.push_str(&format!(
            "{}  {}  {}",
            format_time(event.time),
            event.actor,
            event.event
        ));
        for (name, value) in &event.parameters {
            output.push_str(&format!("  {}={}", name, value));
        }
        output.push('\n');
    }

    output
}

/// `name - email` per group.
pub fn generate_groups(groups: &[Group]) -> String {
    groups
        .iter()
        .map(|g| format!("{} - {}\n", g.name, g.email))
        .collect()
}

pub fn generate_org_units(units: &[OrgUnit]) -> String {
    let mut output = String::new();

    for unit in units {
        output.push_str(&format!("{}  {}", unit.org_unit_path, unit.name));
        if let Some(ref description) = unit.description {
            if !description.is_empty() {
                output.push_str(&format!(" - {}", description));
            }
        }
        output.push('\n');
    }

    output
}

fn permission_line(permission: &Permission, indent: &str) -> String {
    let who = permission
        .email_address
        .as_deref()
        .unwrap_or(permission.permission_type.as_str());
    format!("{}{}: {}\n", indent, permission.role, who)
}

fn generate_file_block(file: &FileReport) -> String {
    let mut block = String::new();

    block.push_str(&format!("\t{} - {}\n", file.name, file.can_share));
    if let Some(ref modifier) = file.last_modifier {
        block.push_str(&format!("\t\tLastModifier: {}\n", modifier));
    }
    for owner in &file.owners {
        block.push_str(&format!("\t\tOwner: {}\n", owner));
    }
    for permission in &file.permissions {
        block.push_str(&permission_line(permission, "\t\t"));
    }

    block
}

/// Folder tree: `parent > folder`, its permissions, then each file within.
pub fn generate_folders(folders: &[FolderReport]) -> String {
    let mut output = String::new();

    for folder in folders {
        match folder.parent {
            Some(ref parent) => output.push_str(&format!("{} > {}\n", parent, folder.name)),
            None => output.push_str(&format!("{}\n", folder.name)),
        }
        for permission in &folder.permissions {
            output.push_str(&permission_line(permission, "\t"));
        }
        for file in &folder.files {
            output.push_str(&generate_file_block(file));
        }
    }

    output
}

/// Flagged actors with every IP they signed in from.
pub fn generate_suspicious_logins(report: &SuspiciousLoginReport) -> String {
    let mut output = String::new();

    for record in &report.flagged {
        output.push_str(&format!("{}\n", record.actor));
        output.push_str(&format!("     IP: [{}]\n", record.observed.join(" ")));
    }

    if let Some(ref google) = report.google_flagged {
        output.push_str(&format!(
            "\nFlagged by Google ({} logins):\n",
            google.len()
        ));
        for event in google {
            output.push_str(&format!(
                "{}  {}  {}\n",
                format_time(event.timestamp),
                event.actor,
                event.value
            ));
        }
    }

    output
}

pub fn generate_two_step_report(report: &TwoStepReport) -> String {
    let mut output = format!("Latest Report: {}\n", report.date.format("%Y-%m-%d"));
    for email in &report.users {
        output.push_str(email);
        output.push('\n');
    }
    output
}

/// Email plus last login, `never` for accounts that never signed in.
pub fn generate_stale_users(users: &[StaleUser]) -> String {
    users
        .iter()
        .map(|u| {
            let last = match u.last_login {
                Some(t) => t.format(TIME_FORMAT).to_string(),
                None => "never".to_string(),
            };
            format!("{}  last login: {}\n", u.email, last)
        })
        .collect()
}

fn user_role(user: &User) -> Option<&'static str> {
    if user.is_admin {
        Some("super admin")
    } else if user.is_delegated_admin {
        Some("delegated admin")
    } else {
        None
    }
}

/// Primary email per user, with the admin role when there is one.
pub fn generate_users(users: &[User]) -> String {
    users
        .iter()
        .map(|u| match user_role(u) {
            Some(role) => format!("{}  ({})\n", u.primary_email, role),
            None => format!("{}\n", u.primary_email),
        })
        .collect()
}

/// Generate a JSON report.
pub fn generate_json_report<T: Serialize + ?Sized>(report: &T) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
