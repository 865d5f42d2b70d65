//! Group listings.

use crate::error::ApiError;
use crate::models::Group;
use crate::services::GroupDirectory;

pub struct GroupActions<'a> {
    groups: &'a dyn GroupDirectory,
}

impl<'a> GroupActions<'a> {
    pub fn new(groups: &'a dyn GroupDirectory) -> Self {
        Self { groups }
    }

    pub async fn list(&self, domain: &str) -> Result<Vec<Group>, ApiError> {
        self.groups.list_groups(domain, None).await
    }

    /// Groups `email` is a member of.
    pub async fn search(&self, domain: &str, email: &str) -> Result<Vec<Group>, ApiError> {
        self.groups.list_groups(domain, Some(email)).await
    }
}
