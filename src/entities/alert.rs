//! Alert entity raised by the vision pipeline

use crate::core::query::SortSpec;
use crate::{impl_field_enum, impl_view_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How urgent an alert is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl_field_enum!(AlertSeverity {
    Critical => "critical",
    High => "high",
    Medium => "medium",
    Low => "low",
    Info => "info",
});

/// Where an alert is in its triage lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    New,
    Acknowledged,
    Resolved,
}

impl_field_enum!(AlertStatus {
    New => "new",
    Acknowledged => "acknowledged",
    Resolved => "resolved",
});

/// A single alert row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub title: String,
    pub description: String,
    pub severity: AlertSeverity,
    pub timestamp: DateTime<Utc>,
    pub camera: String,
    pub location: String,
    pub status: AlertStatus,
    /// Recorded clip backing this alert, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
}

impl_view_entity!(
    Alert,
    "alerts",
    search: ["title", "description", "camera", "location"],
    fields: {
        "title" => title,
        "description" => description,
        "severity" => severity,
        "timestamp" => timestamp,
        "camera" => camera,
        "location" => location,
        "status" => status,
        "video_id" => video_id,
    },
    timestamp: timestamp,
    default_sort: SortSpec::descending("timestamp"),
);

impl Alert {
    /// Prompt used to open this alert's footage in the chat assistant
    ///
    /// Only alerts with a recorded clip can be viewed in chat.
    pub fn chat_prompt(&self) -> Option<String> {
        self.video_id
            .as_ref()
            .map(|_| format!("Show me {}", self.title))
    }
}

/// Count of alerts at one severity, as shown on the summary cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeverityCount {
    pub severity: AlertSeverity,
    pub total: usize,
    /// Alerts at this severity still in the `new` state
    pub unresolved: usize,
}

/// Per-severity totals over the whole (unfiltered) alert list
pub fn severity_summary(alerts: &[Alert]) -> Vec<SeverityCount> {
    AlertSeverity::ALL
        .iter()
        .map(|&severity| {
            let at_level = alerts.iter().filter(|a| a.severity == severity);
            let (total, unresolved) = at_level.fold((0, 0), |(total, new), a| {
                (total + 1, new + usize::from(a.status == AlertStatus::New))
            });
            SeverityCount {
                severity,
                total,
                unresolved,
            }
        })
        .collect()
}
