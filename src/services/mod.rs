//! Capability interfaces, one per resource area.
//!
//! Actions receive exactly the capabilities they call as trait objects at
//! construction time. `GoogleClient` implements all of them; tests use the
//! in-memory fakes.

use crate::error::ApiError;
use crate::models::{Activity, DriveFile, Group, OrgUnit, UsageReport, User};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

#[cfg(test)]
pub mod fakes;

/// Reports API application an activity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Application {
    Admin,
    Login,
}

impl Application {
    pub fn as_str(self) -> &'static str {
        match self {
            Application::Admin => "admin",
            Application::Login => "login",
        }
    }
}

/// Activity event names the reports ask for.
pub mod event_names {
    pub const CREATE_USER: &str = "CREATE_USER";
    pub const GRANT_ADMIN_PRIVILEGE: &str = "GRANT_ADMIN_PRIVILEGE";
    pub const GRANT_DELEGATED_ADMIN_PRIVILEGE: &str = "GRANT_DELEGATED_ADMIN_PRIVILEGE";
    pub const LOGIN_SUCCESS: &str = "login_success";
    pub const SUSPICIOUS_LOGIN: &str = "suspicious_login";
}

/// Directory `users.list` query expressions.
pub mod user_queries {
    pub const ADMINS: &str = "isAdmin=true";
    pub const DELEGATED_ADMINS: &str = "isDelegatedAdmin=true";
    pub const SUSPENDED: &str = "isSuspended=true";
    pub const NOT_IN_2SV: &str = "isEnforcedIn2Sv=false isEnrolledIn2Sv=false";
}

/// Parameters for an activity list call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityQuery {
    /// `all` or a specific user's email / profile id.
    pub user_key: String,
    pub application: Application,
    pub event_name: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
}

impl ActivityQuery {
    pub fn new(application: Application) -> Self {
        Self {
            user_key: "all".to_string(),
            application,
            event_name: None,
            start_time: None,
        }
    }

    pub fn event(mut self, name: &str) -> Self {
        self.event_name = Some(name.to_string());
        self
    }

    pub fn since(mut self, start: DateTime<Utc>) -> Self {
        self.start_time = Some(start);
        self
    }
}

/// Reports API activity records.
#[async_trait]
pub trait ActivityService: Sync {
    async fn list_activities(&self, query: &ActivityQuery) -> Result<Vec<Activity>, ApiError>;
}

/// Reports API per-user usage reports.
#[async_trait]
pub trait UsageService: Sync {
    /// Usage reports for `user_key` (`all` for every user) on `date`,
    /// limited to the comma-separated `parameters`.
    async fn user_usage(
        &self,
        user_key: &str,
        date: NaiveDate,
        parameters: &str,
    ) -> Result<Vec<UsageReport>, ApiError>;
}

/// Directory API users.
#[async_trait]
pub trait UserDirectory: Sync {
    /// Users of `domain`, ordered by email, optionally filtered by a search query.
    async fn list_users(&self, domain: &str, query: Option<&str>) -> Result<Vec<User>, ApiError>;
}

/// Directory API groups.
#[async_trait]
pub trait GroupDirectory: Sync {
    /// Groups of `domain`; with `member`, only groups that address belongs to.
    async fn list_groups(&self, domain: &str, member: Option<&str>)
        -> Result<Vec<Group>, ApiError>;
}

/// Directory API organization units.
#[async_trait]
pub trait OrgUnitDirectory: Sync {
    async fn list_org_units(&self) -> Result<Vec<OrgUnit>, ApiError>;
}

/// Drive API files and folders.
#[async_trait]
pub trait DriveService: Sync {
    /// Folders, optionally restricted to names containing `name`.
    async fn find_folders(&self, name: Option<&str>) -> Result<Vec<DriveFile>, ApiError>;

    /// Direct children of a folder.
    async fn files_in_folder(&self, folder_id: &str) -> Result<Vec<DriveFile>, ApiError>;

    /// Minimal metadata (id, name) of one file.
    async fn get_file(&self, file_id: &str) -> Result<DriveFile, ApiError>;
}
