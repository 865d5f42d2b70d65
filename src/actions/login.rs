//! Login activity and 2-step verification reports.

use crate::analysis::accounts::TWO_SV_ENROLLED;
use crate::analysis::{
    aggregate, days_ago, flagged, stale_users, unenrolled_in_2sv, ActorRecord, ReferenceSet,
    StaleUser,
};
use crate::error::ApiError;
use crate::models::Event;
use crate::services::{
    event_names, ActivityQuery, ActivityService, Application, UsageService, UserDirectory,
};
use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Result of `login suspicious`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuspiciousLoginReport {
    pub since: DateTime<Utc>,
    /// Number of login events inspected.
    pub logins: usize,
    /// Actors with at least one login from outside the trusted networks.
    pub flagged: Vec<ActorRecord>,
    /// Logins Google classified as suspicious, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_flagged: Option<Vec<Event>>,
}

/// Result of `login non2sv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TwoStepReport {
    /// Date of the usage report the list comes from.
    pub date: NaiveDate,
    pub users: Vec<String>,
}

pub struct LoginActions<'a> {
    activities: &'a dyn ActivityService,
    usage: &'a dyn UsageService,
    users: &'a dyn UserDirectory,
}

impl<'a> LoginActions<'a> {
    pub fn new(
        activities: &'a dyn ActivityService,
        usage: &'a dyn UsageService,
        users: &'a dyn UserDirectory,
    ) -> Self {
        Self {
            activities,
            usage,
            users,
        }
    }

    async fn login_events(&self, event: &str, since: DateTime<Utc>) -> Result<Vec<Event>, ApiError> {
        let query = ActivityQuery::new(Application::Login).event(event).since(since);
        let activities = self.activities.list_activities(&query).await?;
        Ok(activities.iter().map(Event::from).collect())
    }

    /// Actors whose logins over the last `days` days did not all come from
    /// a trusted network.
    pub async fn suspicious(
        &self,
        reference: &ReferenceSet,
        days: u32,
        include_google_flagged: bool,
        now: DateTime<Utc>,
    ) -> Result<SuspiciousLoginReport, ApiError> {
        let since = days_ago(now, days)?;
        if reference.is_empty() {
            warn!("No trusted networks configured; every actor will be flagged");
        } else {
            debug!("Checking logins against {} trusted addresses", reference.len());
        }

        let events = self.login_events(event_names::LOGIN_SUCCESS, since).await?;
        let records = aggregate(&events, reference);
        let flagged_actors: Vec<ActorRecord> = flagged(&records).into_iter().cloned().collect();
        info!(
            "{} logins from {} users, {} flagged",
            events.len(),
            records.len(),
            flagged_actors.len()
        );

        let google_flagged = if include_google_flagged {
            Some(
                self.login_events(event_names::SUSPICIOUS_LOGIN, since)
                    .await?,
            )
        } else {
            None
        };

        Ok(SuspiciousLoginReport {
            since,
            logins: events.len(),
            flagged: flagged_actors,
            google_flagged,
        })
    }

    /// Users not enrolled in 2SV according to the most recent published
    /// usage report.
    ///
    /// Usage reports lag by a few days, so the lookup starts at `today` and
    /// steps back one day per attempt. A 403 stops immediately.
    pub async fn non_2sv(
        &self,
        today: NaiveDate,
        max_attempts: u32,
    ) -> Result<TwoStepReport, ApiError> {
        let mut last_error = None;

        for attempt in 0..max_attempts {
            let Some(date) = today.checked_sub_days(Days::new(u64::from(attempt))) else {
                break;
            };

            match self.usage.user_usage("all", date, TWO_SV_ENROLLED).await {
                Ok(reports) if !reports.is_empty() => {
                    info!("Using usage report of {}", date);
                    return Ok(TwoStepReport {
                        date,
                        users: unenrolled_in_2sv(&reports),
                    });
                }
                Ok(_) => {
                    debug!("Usage report for {} is empty", date);
                    last_error = None;
                }
                Err(e) if e.is_forbidden() => return Err(e),
                Err(e) => {
                    debug!("Usage report for {} unavailable: {}", date, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ApiError::Unavailable(format!(
                "no 2SV usage report found in the {} days up to {}",
                max_attempts, today
            ))
        }))
    }

    /// Users of `domain` that have not signed in for `days` days.
    pub async fn rare(
        &self,
        domain: &str,
        days: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<StaleUser>, ApiError> {
        let users = self.users.list_users(domain, None).await?;
        stale_users(&users, days_ago(now, days)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Activity, ActivityActor, UsageEntity, UsageParameter, UsageReport, User};
    use crate::services::fakes::FakeWorkspace;
    use chrono::TimeZone;
    use tokio_test::{assert_err, assert_ok};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 15, 10, 0, 0).unwrap()
    }

    fn login(actor: &str, ip: &str) -> Activity {
        Activity {
            actor: ActivityActor {
                email: Some(actor.to_string()),
                ..ActivityActor::default()
            },
            ip_address: Some(ip.to_string()),
            ..Activity::default()
        }
    }

    fn usage(email: &str, enrolled: bool) -> UsageReport {
        UsageReport {
            date: "2024-05-12".to_string(),
            entity: UsageEntity {
                user_email: Some(email.to_string()),
                ..UsageEntity::default()
            },
            parameters: vec![UsageParameter {
                name: TWO_SV_ENROLLED.to_string(),
                bool_value: Some(enrolled),
                ..UsageParameter::default()
            }],
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_suspicious_flags_out_of_office_actors() {
        let fake = FakeWorkspace::new().with_activities(
            event_names::LOGIN_SUCCESS,
            vec![
                login("x@example.com", "10.0.0.1"),
                login("y@example.com", "10.0.0.1"),
                login("x@example.com", "8.8.8.8"),
            ],
        );
        let actions = LoginActions::new(&fake, &fake, &fake);
        let reference = ReferenceSet::new(["10.0.0.1"]);

        let report = assert_ok!(actions.suspicious(&reference, 45, false, now()).await);

        assert_eq!(report.logins, 3);
        assert_eq!(report.flagged.len(), 1);
        assert_eq!(report.flagged[0].actor, "x@example.com");
        assert_eq!(report.flagged[0].observed, vec!["10.0.0.1", "8.8.8.8"]);
        assert!(report.google_flagged.is_none());

        let calls = fake.activity_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].event_name.as_deref(), Some("login_success"));
        assert_eq!(
            calls[0].start_time,
            Some(Utc.with_ymd_and_hms(2024, 3, 31, 10, 0, 0).unwrap())
        );
    }

    #[tokio::test]
    async fn test_suspicious_with_google_flagged() {
        let fake = FakeWorkspace::new()
            .with_activities(event_names::LOGIN_SUCCESS, vec![login("y@example.com", "10.0.0.1")])
            .with_activities(
                event_names::SUSPICIOUS_LOGIN,
                vec![login("z@example.com", "198.51.100.9")],
            );
        let actions = LoginActions::new(&fake, &fake, &fake);
        let reference = ReferenceSet::new(["10.0.0.1"]);

        let report = assert_ok!(actions.suspicious(&reference, 7, true, now()).await);

        assert!(report.flagged.is_empty());
        let google = report.google_flagged.unwrap();
        assert_eq!(google, vec![Event::new("z@example.com", "198.51.100.9")]);
        assert_eq!(fake.activity_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_oversized_lookback_is_rejected_before_fetching() {
        let fake = FakeWorkspace::new();
        let actions = LoginActions::new(&fake, &fake, &fake);
        let reference = ReferenceSet::new(["10.0.0.1"]);

        let err = assert_err!(actions.suspicious(&reference, u32::MAX, false, now()).await);
        assert!(matches!(
            err,
            ApiError::InvalidRequest(crate::error::ValidationError::DaysOutOfRange { .. })
        ));
        assert!(fake.activity_calls().is_empty());

        let err = assert_err!(actions.rare("example.com", u32::MAX, now()).await);
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_non_2sv_steps_back_until_available() {
        let fake = FakeWorkspace::new().with_usage(vec![
            Err(400),
            Ok(vec![]),
            Ok(vec![
                usage("a@example.com", true),
                usage("b@example.com", false),
            ]),
        ]);
        let actions = LoginActions::new(&fake, &fake, &fake);

        let report = assert_ok!(actions.non_2sv(date(2024, 5, 15), 10).await);

        assert_eq!(report.date, date(2024, 5, 13));
        assert_eq!(report.users, vec!["b@example.com"]);
        assert_eq!(
            fake.usage_calls(),
            vec![date(2024, 5, 15), date(2024, 5, 14), date(2024, 5, 13)]
        );
    }

    #[tokio::test]
    async fn test_non_2sv_stops_on_forbidden() {
        let fake = FakeWorkspace::new().with_usage(vec![Err(400), Err(403), Ok(vec![])]);
        let actions = LoginActions::new(&fake, &fake, &fake);

        let err = assert_err!(actions.non_2sv(date(2024, 5, 15), 10).await);

        assert!(err.is_forbidden());
        assert_eq!(fake.usage_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_non_2sv_gives_up_after_max_attempts() {
        let fake = FakeWorkspace::new();
        let actions = LoginActions::new(&fake, &fake, &fake);

        let err = assert_err!(actions.non_2sv(date(2024, 5, 15), 3).await);

        assert!(matches!(err, ApiError::Unavailable(_)));
        assert_eq!(fake.usage_calls().len(), 3);
    }

    #[tokio::test]
    async fn test_non_2sv_reports_last_error() {
        let fake = FakeWorkspace::new().with_usage(vec![Err(400), Err(503)]);
        let actions = LoginActions::new(&fake, &fake, &fake);

        let err = assert_err!(actions.non_2sv(date(2024, 5, 15), 2).await);
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_rare_login_threshold() {
        let fake = FakeWorkspace::new().with_users(
            None,
            vec![
                User {
                    primary_email: "active@example.com".to_string(),
                    last_login_time: Some("2024-05-10T08:00:00.000Z".to_string()),
                    ..User::default()
                },
                User {
                    primary_email: "idle@example.com".to_string(),
                    last_login_time: Some("2024-04-20T08:00:00.000Z".to_string()),
                    ..User::default()
                },
            ],
        );
        let actions = LoginActions::new(&fake, &fake, &fake);

        let stale = assert_ok!(actions.rare("example.com", 14, now()).await);
        let emails: Vec<&str> = stale.iter().map(|s| s.email.as_str()).collect();
        assert_eq!(emails, vec!["idle@example.com"]);

        let stale = assert_ok!(actions.rare("example.com", 30, now()).await);
        assert!(stale.is_empty());
    }
}
