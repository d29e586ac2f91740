//! Security audit log entries

use crate::core::query::SortSpec;
use crate::{impl_field_enum, impl_view_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Success,
    Failure,
}

impl_field_enum!(AuditStatus {
    Success => "success",
    Failure => "failure",
});

/// Icon bucket for an audit action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditCategory {
    Login,
    Password,
    UserManagement,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: String,
    pub action: String,
    pub user: String,
    pub timestamp: DateTime<Utc>,
    pub ip: String,
    pub status: AuditStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl_view_entity!(
    AuditLogEntry,
    "audit_logs",
    search: ["action", "user", "ip", "details"],
    fields: {
        "action" => action,
        "user" => user,
        "timestamp" => timestamp,
        "ip" => ip,
        "status" => status,
        "details" => details,
    },
    timestamp: timestamp,
    default_sort: SortSpec::descending("timestamp"),
);

impl AuditLogEntry {
    /// Bucket the action by keyword, first match wins
    pub fn category(&self) -> AuditCategory {
        if self.action.contains("Login") {
            AuditCategory::Login
        } else if self.action.contains("Password") {
            AuditCategory::Password
        } else if self.action.contains("User") {
            AuditCategory::UserManagement
        } else {
            AuditCategory::Other
        }
    }
}
