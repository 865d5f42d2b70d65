//! Administrator activity audits.

use crate::analysis::AuditWindow;
use crate::error::ApiError;
use crate::models::Activity;
use crate::services::{event_names, ActivityQuery, ActivityService, Application};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

/// One admin console event, flattened for printing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminEvent {
    pub time: Option<DateTime<Utc>>,
    /// Administrator who performed the action.
    pub actor: String,
    pub event: String,
    /// `(name, value)` pairs, e.g. `("USER_EMAIL", "bob@example.com")`.
    pub parameters: Vec<(String, String)>,
}

impl AdminEvent {
    /// One entry per event contained in the activity.
    fn from_activity(activity: &Activity) -> Vec<Self> {
        let actor = activity.actor.email.clone().unwrap_or_default();
        activity
            .events
            .iter()
            .map(|event| AdminEvent {
                time: activity.id.time,
                actor: actor.clone(),
                event: event.name.clone(),
                parameters: event
                    .parameters
                    .iter()
                    .map(|p| (p.name.clone(), p.display_value()))
                    .collect(),
            })
            .collect()
    }
}

pub struct AuditActions<'a> {
    activities: &'a dyn ActivityService,
}

impl<'a> AuditActions<'a> {
    pub fn new(activities: &'a dyn ActivityService) -> Self {
        Self { activities }
    }

    async fn admin_events(
        &self,
        event: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<AdminEvent>, ApiError> {
        let query = ActivityQuery::new(Application::Admin).event(event).since(since);
        let activities = self.activities.list_activities(&query).await?;
        Ok(activities.iter().flat_map(AdminEvent::from_activity).collect())
    }

    /// Accounts created since the start of `window`.
    pub async fn created_users(
        &self,
        window: AuditWindow,
        now: DateTime<Utc>,
    ) -> Result<Vec<AdminEvent>, ApiError> {
        let since = window.start(now);
        info!("Looking for created users since {}", since);
        self.admin_events(event_names::CREATE_USER, since).await
    }

    /// Super-admin and delegated-admin grants since the start of `window`,
    /// super-admin grants first.
    pub async fn granted_privileges(
        &self,
        window: AuditWindow,
        now: DateTime<Utc>,
    ) -> Result<Vec<AdminEvent>, ApiError> {
        let since = window.start(now);
        info!("Looking for privilege grants since {}", since);

        let mut events = self
            .admin_events(event_names::GRANT_ADMIN_PRIVILEGE, since)
            .await?;
        events.extend(
            self.admin_events(event_names::GRANT_DELEGATED_ADMIN_PRIVILEGE, since)
                .await?,
        );
        Ok(events)
    }
}
