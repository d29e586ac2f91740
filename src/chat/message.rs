//! Chat message model shared by the backend client and the conversation view

use crate::entities::AlertSeverity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Ai,
    /// Session greeting stored by the backend
    System,
}

/// A video clip attached to an AI reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRef {
    pub id: String,
    pub title: String,
    /// Display time of the clip, e.g. "11:05 PM"
    pub timestamp: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl VideoRef {
    pub fn new(id: &str, title: &str, timestamp: &str, location: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            timestamp: timestamp.to_string(),
            location: location.to_string(),
            url: None,
        }
    }
}

/// An anomaly highlighted in an AI reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: AlertSeverity,
    pub description: String,
}

impl Anomaly {
    pub fn new(kind: &str, severity: AlertSeverity, description: &str) -> Self {
        Self {
            kind: kind.to_string(),
            severity,
            description: description.to_string(),
        }
    }
}

/// One chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,

    /// Missing when the backend sent something that is not a date
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub videos: Vec<VideoRef>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub anomalies: Vec<Anomaly>,
}

impl Message {
    fn new(role: Role, content: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Some(now),
            videos: Vec::new(),
            anomalies: Vec::new(),
        }
    }

    pub fn user(content: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self::new(Role::User, content, now)
    }

    pub fn ai(content: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self::new(Role::Ai, content, now)
    }

    pub fn with_videos(mut self, videos: Vec<VideoRef>) -> Self {
        self.videos = videos;
        self
    }

    pub fn with_anomalies(mut self, anomalies: Vec<Anomaly>) -> Self {
        self.anomalies = anomalies;
        self
    }
}

/// Accept RFC 3339, RFC 2822 (Flask's default) or garbage, which becomes `None`
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(serde_json::Value::String(raw)) = raw else {
        return Ok(None);
    };

    let parsed = DateTime::parse_from_rfc3339(&raw)
        .or_else(|_| DateTime::parse_from_rfc2822(&raw))
        .map(|ts| ts.with_timezone(&Utc))
        .ok();

    if parsed.is_none() {
        tracing::trace!(raw = %raw, "Ignoring unparseable message timestamp");
    }

    Ok(parsed)
}
