//! Chat session rows listed in the history sidebar

use crate::core::query::SortSpec;
use crate::impl_view_entity;
use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Summary of one chat session
///
/// Serialized in camelCase so cached lists stay readable by the web client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: String,
    pub title: String,
    pub preview: String,
    pub timestamp: DateTime<Utc>,
    pub message_count: u32,
}

impl_view_entity!(
    SessionSummary,
    "chat_sessions",
    search: ["title", "preview"],
    fields: {
        "title" => title,
        "preview" => preview,
        "timestamp" => timestamp,
        "message_count" => message_count,
    },
    timestamp: timestamp,
    default_sort: SortSpec::descending("timestamp"),
);

/// Session titles are the first 30 characters of the opening message
pub const TITLE_CHARS: usize = 30;

impl SessionSummary {
    /// Summary for a session just created on the backend
    pub fn new(id: impl Into<String>, first_message: Option<&str>, now: DateTime<Utc>) -> Self {
        let title = match first_message.map(str::trim).filter(|m| !m.is_empty()) {
            Some(text) => text.chars().take(TITLE_CHARS).collect(),
            None => "New Chat".to_string(),
        };

        Self {
            id: id.into(),
            title,
            preview: first_message.unwrap_or_default().trim().to_string(),
            timestamp: now,
            message_count: 0,
        }
    }

    /// Sidebar date label relative to `today` (local calendar)
    pub fn day_label(&self, today: NaiveDate) -> String {
        relative_day_label(self.timestamp, today)
    }
}

/// "Today", "Yesterday", or a short month/day label such as "Apr 15"
pub fn relative_day_label(ts: DateTime<Utc>, today: NaiveDate) -> String {
    let day = ts.with_timezone(&Local).date_naive();
    if day == today {
        "Today".to_string()
    } else if Some(day) == today.checked_sub_signed(Duration::days(1)) {
        "Yesterday".to_string()
    } else {
        day.format("%b %-d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at_local(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Local
            .with_ymd_and_hms(y, m, d, h, 0, 0)
            .earliest()
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_new_truncates_title() {
        let summary = SessionSummary::new(
            "s1",
            Some("  Show me everyone who entered after 11 PM yesterday  "),
            Utc::now(),
        );
        assert_eq!(summary.title, "Show me everyone who entered a");
        assert_eq!(summary.title.chars().count(), TITLE_CHARS);
        assert_eq!(summary.message_count, 0);
    }

    #[test]
    fn test_new_without_message() {
        let summary = SessionSummary::new("s2", None, Utc::now());
        assert_eq!(summary.title, "New Chat");
        assert_eq!(summary.preview, "");
    }

    #[test]
    fn test_relative_day_label() {
        let today = NaiveDate::from_ymd_opt(2023, 4, 15).unwrap();
        assert_eq!(relative_day_label(at_local(2023, 4, 15, 8), today), "Today");
        assert_eq!(relative_day_label(at_local(2023, 4, 14, 23), today), "Yesterday");
        assert_eq!(relative_day_label(at_local(2023, 4, 2, 12), today), "Apr 2");
    }
}
