//! Data models for the Workspace audit tool.
//!
//! Most of these mirror the JSON resources returned by the Admin SDK
//! (Reports, Directory) and Drive REST APIs. Only the fields the reports
//! actually print are modelled; unknown fields are ignored by serde.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reports API activity record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(default)]
    pub id: ActivityId,
    #[serde(default)]
    pub actor: ActivityActor,
    /// IP address the action originated from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub events: Vec<ActivityEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityId {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub application_name: String,
    #[serde(default)]
    pub unique_qualifier: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityActor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    #[serde(default, rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<EventParameter>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventParameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bool_value: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub int_value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub multi_value: Vec<String>,
}

impl EventParameter {
    /// Render whichever value variant the API filled in.
    pub fn display_value(&self) -> String {
        if let Some(ref v) = self.value {
            v.clone()
        } else if let Some(b) = self.bool_value {
            b.to_string()
        } else if let Some(ref i) = self.int_value {
            i.clone()
        } else {
            self.multi_value.join(",")
        }
    }
}

/// A single observation fed to the anomaly aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    /// Identity the event is attributed to (an email address).
    pub actor: String,
    /// Value checked against the reference set (a source IP).
    pub value: String,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Event {
    pub fn new(actor: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            value: value.into(),
            timestamp: None,
        }
    }
}

impl From<&Activity> for Event {
    /// Missing actor or IP become empty strings and are checked literally.
    fn from(activity: &Activity) -> Self {
        Self {
            timestamp: activity.id.time,
            ..Event::new(
                activity.actor.email.clone().unwrap_or_default(),
                activity.ip_address.clone().unwrap_or_default(),
            )
        }
    }
}

/// Directory API user resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub primary_email: String,
    #[serde(default)]
    pub name: UserName,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_delegated_admin: bool,
    #[serde(default)]
    pub suspended: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspension_reason: Option<String>,
    #[serde(default)]
    pub is_enrolled_in2_sv: bool,
    #[serde(default)]
    pub is_enforced_in2_sv: bool,
    /// Raw timestamp string; Google reports `1970-01-01T00:00:00.000Z` for "never".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_unit_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserName {
    #[serde(default)]
    pub given_name: String,
    #[serde(default)]
    pub family_name: String,
    #[serde(default)]
    pub full_name: String,
}

/// Directory API group resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_members_count: Option<String>,
}

/// Directory API organization unit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgUnit {
    pub name: String,
    pub org_unit_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_org_unit_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Reports API per-user usage report for one date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageReport {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub entity: UsageEntity,
    #[serde(default)]
    pub parameters: Vec<UsageParameter>,
}

impl UsageReport {
    /// Boolean value of a named parameter, if present.
    pub fn bool_parameter(&self, name: &str) -> Option<bool> {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .and_then(|p| p.bool_value)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageEntity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
    #[serde(default, rename = "type")]
    pub entity_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageParameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bool_value: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub int_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
}

/// Drive API file resource (folders included).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub parents: Vec<String>,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    #[serde(default)]
    pub owners: Vec<DriveUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modifying_user: Option<DriveUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<FileCapabilities>,
}

impl DriveFile {
    pub fn can_share(&self) -> bool {
        self.capabilities.as_ref().is_some_and(|c| c.can_share)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    #[serde(default)]
    pub role: String,
    #[serde(default, rename = "type")]
    pub permission_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileCapabilities {
    #[serde(default)]
    pub can_share: bool,
}
