//! In-memory service implementations for action tests.

use super::*;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// A canned Workspace tenant. Every trait is served from plain collections
/// and every call is recorded for assertions.
#[derive(Default)]
pub struct FakeWorkspace {
    /// Activities keyed by event name.
    pub activities: HashMap<String, Vec<Activity>>,
    /// Status code returned by every activity call when set.
    pub activity_failure: Option<u16>,
    /// Usage responses served in order; `Err` holds an HTTP status.
    pub usage: Mutex<VecDeque<Result<Vec<UsageReport>, u16>>>,
    /// Users keyed by directory query; the empty key is the unfiltered list.
    pub users: HashMap<String, Vec<User>>,
    /// Groups with their member addresses.
    pub groups: Vec<(Group, Vec<String>)>,
    pub org_units: Vec<OrgUnit>,
    pub folders: Vec<DriveFile>,
    /// Folder id to its children.
    pub children: HashMap<String, Vec<DriveFile>>,
    /// Files reachable through `get_file`.
    pub files: HashMap<String, DriveFile>,

    pub activity_calls: Mutex<Vec<ActivityQuery>>,
    pub usage_calls: Mutex<Vec<NaiveDate>>,
}

impl FakeWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_activities(mut self, event: &str, activities: Vec<Activity>) -> Self {
        self.activities.insert(event.to_string(), activities);
        self
    }

    pub fn with_users(mut self, query: Option<&str>, users: Vec<User>) -> Self {
        self.users.insert(query.unwrap_or_default().to_string(), users);
        self
    }

    pub fn with_usage(self, responses: Vec<Result<Vec<UsageReport>, u16>>) -> Self {
        *self.usage.lock().unwrap() = responses.into();
        self
    }

    pub fn activity_calls(&self) -> Vec<ActivityQuery> {
        self.activity_calls.lock().unwrap().clone()
    }

    pub fn usage_calls(&self) -> Vec<NaiveDate> {
        self.usage_calls.lock().unwrap().clone()
    }
}

fn not_found(what: &str) -> ApiError {
    ApiError::from_status(404, format!("{} not found", what))
}

#[async_trait]
impl ActivityService for FakeWorkspace {
    async fn list_activities(&self, query: &ActivityQuery) -> Result<Vec<Activity>, ApiError> {
        self.activity_calls.lock().unwrap().push(query.clone());
        if let Some(status) = self.activity_failure {
            return Err(ApiError::from_status(status, "scripted activity failure"));
        }
        let key = query.event_name.clone().unwrap_or_default();
        Ok(self.activities.get(&key).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl UsageService for FakeWorkspace {
    async fn user_usage(
        &self,
        _user_key: &str,
        date: NaiveDate,
        _parameters: &str,
    ) -> Result<Vec<UsageReport>, ApiError> {
        self.usage_calls.lock().unwrap().push(date);
        match self.usage.lock().unwrap().pop_front() {
            Some(Ok(reports)) => Ok(reports),
            Some(Err(status)) => Err(ApiError::from_status(status, "scripted usage failure")),
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl UserDirectory for FakeWorkspace {
    async fn list_users(&self, _domain: &str, query: Option<&str>) -> Result<Vec<User>, ApiError> {
        Ok(self
            .users
            .get(query.unwrap_or_default())
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl GroupDirectory for FakeWorkspace {
    async fn list_groups(
        &self,
        _domain: &str,
        member: Option<&str>,
    ) -> Result<Vec<Group>, ApiError> {
        Ok(self
            .groups
            .iter()
            .filter(|(_, members)| member.map_or(true, |m| members.iter().any(|x| x == m)))
            .map(|(group, _)| group.clone())
            .collect())
    }
}

#[async_trait]
impl OrgUnitDirectory for FakeWorkspace {
    async fn list_org_units(&self) -> Result<Vec<OrgUnit>, ApiError> {
        Ok(self.org_units.clone())
    }
}

/// Drive's `name contains` term: a case-insensitive prefix of some word in
/// the name, so `budg` matches "Budget 2024" and `get` does not.
fn name_contains(name: &str, keyword: &str) -> bool {
    let name = name.to_lowercase();
    let keyword = keyword.to_lowercase();
    name.char_indices()
        .filter(|&(i, c)| {
            let after_separator = !name[..i]
                .chars()
                .next_back()
                .is_some_and(char::is_alphanumeric);
            c.is_alphanumeric() && after_separator
        })
        .any(|(i, _)| name[i..].starts_with(&keyword))
}

#[async_trait]
impl DriveService for FakeWorkspace {
    async fn find_folders(&self, name: Option<&str>) -> Result<Vec<DriveFile>, ApiError> {
        Ok(self
            .folders
            .iter()
            .filter(|f| name.map_or(true, |n| name_contains(&f.name, n)))
            .cloned()
            .collect())
    }

    async fn files_in_folder(&self, folder_id: &str) -> Result<Vec<DriveFile>, ApiError> {
        Ok(self.children.get(folder_id).cloned().unwrap_or_default())
    }

    async fn get_file(&self, file_id: &str) -> Result<DriveFile, ApiError> {
        self.files
            .get(file_id)
            .cloned()
            .ok_or_else(|| not_found(file_id))
    }
}
