//! Command orchestration.
//!
//! One action type per resource area. Each holds references to exactly the
//! service capabilities it calls, fetches sequentially, runs the analysis
//! and returns a serializable result for the report layer.

pub mod audit;
pub mod drive;
pub mod group;
pub mod login;
pub mod org;
pub mod user;

pub use audit::{AdminEvent, AuditActions};
pub use drive::{DriveActions, FileReport, FolderReport};
pub use group::GroupActions;
pub use login::{LoginActions, SuspiciousLoginReport, TwoStepReport};
pub use org::OrgActions;
pub use user::UserActions;
