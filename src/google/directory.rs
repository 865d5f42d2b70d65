//! Admin SDK Directory API: users, groups and organization units.

use crate::error::ApiError;
use crate::google::client::{GoogleClient, Query};
use crate::models::{Group, OrgUnit, User};
use crate::services::{GroupDirectory, OrgUnitDirectory, UserDirectory};
use async_trait::async_trait;

const USER_PAGE_SIZE: &str = "500";

fn user_params(domain: &str, query: Option<&str>) -> Query {
    let mut params: Query = vec![
        ("domain", domain.to_string()),
        ("orderBy", "email".to_string()),
        ("maxResults", USER_PAGE_SIZE.to_string()),
    ];
    if let Some(q) = query {
        params.push(("query", q.to_string()));
    }
    params
}

fn group_params(domain: &str, member: Option<&str>) -> Query {
    let mut params: Query = vec![("domain", domain.to_string())];
    if let Some(email) = member {
        params.push(("userKey", email.to_string()));
    }
    params
}

#[async_trait]
impl UserDirectory for GoogleClient {
    async fn list_users(&self, domain: &str, query: Option<&str>) -> Result<Vec<User>, ApiError> {
        let url = self.admin_url("/admin/directory/v1/users");
        let label = match query {
            Some(q) => format!("users ({})", q),
            None => "users".to_string(),
        };
        self.fetch_list(&label, self.list(url, user_params(domain, query), "users"))
            .await
    }
}

#[async_trait]
impl GroupDirectory for GoogleClient {
    async fn list_groups(
        &self,
        domain: &str,
        member: Option<&str>,
    ) -> Result<Vec<Group>, ApiError> {
        let url = self.admin_url("/admin/directory/v1/groups");
        self.fetch_list("groups", self.list(url, group_params(domain, member), "groups"))
            .await
    }
}

#[async_trait]
impl OrgUnitDirectory for GoogleClient {
    async fn list_org_units(&self) -> Result<Vec<OrgUnit>, ApiError> {
        let url = self.admin_url("/admin/directory/v1/customer/my_customer/orgunits");
        let query: Query = vec![("type", "all".to_string())];
        self.fetch_list("organization units", self.list(url, query, "organizationUnits"))
            .await
    }
}
