//! Directory user reports.

use crate::analysis::{days_ago, merge_by_key, stale_users, StaleUser};
use crate::error::ApiError;
use crate::models::User;
use crate::services::{user_queries, UserDirectory};
use chrono::{DateTime, Utc};
use tracing::info;

pub struct UserActions<'a> {
    users: &'a dyn UserDirectory,
}

impl<'a> UserActions<'a> {
    pub fn new(users: &'a dyn UserDirectory) -> Self {
        Self { users }
    }

    /// Super admins followed by delegated admins, one entry per email.
    pub async fn admins(&self, domain: &str) -> Result<Vec<User>, ApiError> {
        let admins = self
            .users
            .list_users(domain, Some(user_queries::ADMINS))
            .await?;
        let delegated = self
            .users
            .list_users(domain, Some(user_queries::DELEGATED_ADMINS))
            .await?;

        let merged = merge_by_key(vec![admins, delegated], |u: &User| u.primary_email.clone());
        info!("{} admin accounts", merged.len());
        Ok(merged)
    }

    /// Admins that have not signed in for `days` days.
    pub async fn stale_admins(
        &self,
        domain: &str,
        days: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<StaleUser>, ApiError> {
        let admins = self.admins(domain).await?;
        stale_users(&admins, days_ago(now, days)?)
    }

    pub async fn suspended(&self, domain: &str) -> Result<Vec<User>, ApiError> {
        self.users
            .list_users(domain, Some(user_queries::SUSPENDED))
            .await
    }

    /// Users neither enforced into nor enrolled in 2SV, per the directory.
    pub async fn non_2sv(&self, domain: &str) -> Result<Vec<User>, ApiError> {
        self.users
            .list_users(domain, Some(user_queries::NOT_IN_2SV))
            .await
    }
}
