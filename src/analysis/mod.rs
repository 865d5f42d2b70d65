//! Analysis over fetched report data.
//!
//! Everything here is a pure in-memory transform; fetching happens in
//! `google` and orchestration in `actions`.

pub mod accounts;
pub mod aggregator;
pub mod reference;
pub mod window;

pub use accounts::{stale_users, unenrolled_in_2sv, StaleUser};
pub use aggregator::{aggregate, flagged, merge_by_key, ActorRecord};
pub use reference::ReferenceSet;
pub use window::{days_ago, AuditWindow, MAX_DAYS};
