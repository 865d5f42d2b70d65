//! Account-level checks: stale logins and 2-step-verification enrollment.

use crate::error::ApiError;
use crate::models::{UsageReport, User};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

/// Usage-report parameter carrying 2SV enrollment.
pub const TWO_SV_ENROLLED: &str = "accounts:is_2sv_enrolled";

/// A user whose last login is older than the cutoff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaleUser {
    pub email: String,
    /// `None` when the account has never signed in.
    pub last_login: Option<DateTime<Utc>>,
}

/// Parse a Directory `lastLoginTime`. The epoch means "never".
pub fn parse_last_login(user: &User) -> Result<Option<DateTime<Utc>>, ApiError> {
    let Some(raw) = user.last_login_time.as_deref() else {
        return Ok(None);
    };

    let parsed = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| {
            ApiError::Malformed(format!(
                "lastLoginTime '{}' of {}: {}",
                raw, user.primary_email, e
            ))
        })?
        .with_timezone(&Utc);

    if parsed.timestamp() == 0 {
        Ok(None)
    } else {
        Ok(Some(parsed))
    }
}

/// Users that have not signed in since `cutoff`, in input order.
pub fn stale_users(users: &[User], cutoff: DateTime<Utc>) -> Result<Vec<StaleUser>, ApiError> {
    let mut stale = Vec::new();

    for user in users {
        let last_login = parse_last_login(user)?;
        let is_stale = match last_login {
            Some(at) => at < cutoff,
            None => true,
        };
        if is_stale {
            stale.push(StaleUser {
                email: user.primary_email.clone(),
                last_login,
            });
        }
    }

    Ok(stale)
}

/// Emails of users the usage report lists as not enrolled in 2SV.
///
/// Reports that lack the enrollment parameter are skipped.
pub fn unenrolled_in_2sv(reports: &[UsageReport]) -> Vec<String> {
    reports
        .iter()
        .filter_map(|report| match report.bool_parameter(TWO_SV_ENROLLED) {
            Some(false) => report.entity.user_email.clone(),
            Some(true) => None,
            None => {
                debug!(
                    "Usage report for {:?} has no {} parameter",
                    report.entity.user_email, TWO_SV_ENROLLED
                );
                None
            }
        })
        .collect()
}
