//! Time windows for activity queries.

use crate::error::ValidationError;
use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

/// Longest rolling window accepted for `--days` and the `[api]` day settings.
pub const MAX_DAYS: u32 = 3650;

/// How far back an activity report reaches.
///
/// The Reports API keeps roughly six months of activity, so `HalfYear` is
/// the widest useful window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AuditWindow {
    /// Since Monday of the current week.
    ThisWeek,
    /// Since the first day of the current month.
    ThisMonth,
    /// Since the first day of the previous month.
    #[default]
    LastMonth,
    /// Since the first day of the month three months ago.
    LastThreeMonths,
    /// Since the first day of the month six months ago.
    HalfYear,
}

impl AuditWindow {
    /// Start of the window (midnight UTC) relative to `now`.
    pub fn start(self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = now.date_naive();
        let date = match self {
            AuditWindow::ThisWeek => {
                today - Duration::days(i64::from(today.weekday().num_days_from_monday()))
            }
            AuditWindow::ThisMonth => first_of_month(today, 0),
            AuditWindow::LastMonth => first_of_month(today, 1),
            AuditWindow::LastThreeMonths => first_of_month(today, 3),
            AuditWindow::HalfYear => first_of_month(today, 6),
        };
        midnight(date)
    }
}

/// Start of a rolling window of `days` days ending at `now`.
pub fn days_ago(now: DateTime<Utc>, days: u32) -> Result<DateTime<Utc>, ValidationError> {
    let out_of_range = ValidationError::DaysOutOfRange {
        days,
        max: MAX_DAYS,
    };
    if days > MAX_DAYS {
        return Err(out_of_range);
    }
    Duration::try_days(i64::from(days))
        .and_then(|span| now.checked_sub_signed(span))
        .ok_or(out_of_range)
}

fn first_of_month(date: NaiveDate, months_back: u32) -> NaiveDate {
    let first = date.with_day(1).unwrap_or(date);
    first
        .checked_sub_months(Months::new(months_back))
        .unwrap_or(first)
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
