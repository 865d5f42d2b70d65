//! Admin SDK Reports API: activities and per-user usage.

use crate::error::ApiError;
use crate::google::client::{GoogleClient, Query};
use crate::models::{Activity, UsageReport};
use crate::services::{ActivityQuery, ActivityService, UsageService};
use async_trait::async_trait;
use chrono::{NaiveDate, SecondsFormat};
use tracing::info;

const ACTIVITY_PAGE_SIZE: &str = "1000";

/// Query pairs for an activity list call.
fn activity_params(query: &ActivityQuery) -> Query {
    let mut params: Query = vec![("maxResults", ACTIVITY_PAGE_SIZE.to_string())];
    if let Some(ref event) = query.event_name {
        params.push(("eventName", event.clone()));
    }
    if let Some(start) = query.start_time {
        params.push(("startTime", start.to_rfc3339_opts(SecondsFormat::Millis, true)));
    }
    params
}

#[async_trait]
impl ActivityService for GoogleClient {
    async fn list_activities(&self, query: &ActivityQuery) -> Result<Vec<Activity>, ApiError> {
        let url = self.admin_url(&format!(
            "/admin/reports/v1/activity/users/{}/applications/{}",
            query.user_key,
            query.application.as_str()
        ));
        let label = format!(
            "{} activities",
            query.event_name.as_deref().unwrap_or(query.application.as_str())
        );

        let activities: Vec<Activity> = self
            .fetch_list(&label, self.list(url, activity_params(query), "items"))
            .await?;
        info!("Fetched {} {}", activities.len(), label);
        Ok(activities)
    }
}

#[async_trait]
impl UsageService for GoogleClient {
    async fn user_usage(
        &self,
        user_key: &str,
        date: NaiveDate,
        parameters: &str,
    ) -> Result<Vec<UsageReport>, ApiError> {
        let url = self.admin_url(&format!(
            "/admin/reports/v1/usage/users/{}/dates/{}",
            user_key,
            date.format("%Y-%m-%d")
        ));
        let query: Query = vec![("parameters", parameters.to_string())];

        self.fetch_list(
            &format!("usage report {}", date),
            self.list(url, query, "usageReports"),
        )
        .await
    }
}
