//! Request and response bodies of the backend REST API

use crate::chat::message::Message;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Today-versus-yesterday (or this-week-versus-last-week) counter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountDelta {
    #[serde(alias = "today_count", alias = "this_week_count")]
    pub count: i64,

    #[serde(
        default,
        alias = "yesterday_count",
        alias = "last_week_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub previous: Option<i64>,

    pub percent_change: f64,
}

impl CountDelta {
    /// Build a delta, computing the percentage the way the backend does
    ///
    /// Both zero gives 0, a zero baseline gives +100, dropping to zero gives -100.
    pub fn from_counts(count: i64, previous: i64) -> Self {
        let percent_change = match (count, previous) {
            (0, 0) => 0.0,
            (_, 0) => 100.0,
            (0, _) => -100.0,
            _ => ((count - previous) as f64 / previous as f64 * 100.0 * 100.0).round() / 100.0,
        };

        Self {
            count,
            previous: Some(previous),
            percent_change,
        }
    }
}

/// Analytics counters exposed by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeltaMetric {
    People,
    Vehicles,
    Objects,
    PeopleWeekly,
}

impl DeltaMetric {
    pub const ALL: [DeltaMetric; 4] = [
        DeltaMetric::People,
        DeltaMetric::Vehicles,
        DeltaMetric::Objects,
        DeltaMetric::PeopleWeekly,
    ];

    /// Path under `/analytics`
    pub fn path(&self) -> &'static str {
        match self {
            DeltaMetric::People => "person-count-delta",
            DeltaMetric::Vehicles => "vehicle-count-delta",
            DeltaMetric::Objects => "object-count-delta",
            DeltaMetric::PeopleWeekly => "person-weekly-delta",
        }
    }

    /// Card title on the overview page
    pub fn title(&self) -> &'static str {
        match self {
            DeltaMetric::People => "People Detected",
            DeltaMetric::Vehicles => "Vehicles Detected",
            DeltaMetric::Objects => "Objects Detected",
            DeltaMetric::PeopleWeekly => "People This Week",
        }
    }

    /// Caption naming the comparison period
    pub fn baseline(&self) -> &'static str {
        match self {
            DeltaMetric::PeopleWeekly => "from last week",
            _ => "from yesterday",
        }
    }
}

/// Window of the detection trend chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TrendRange {
    #[serde(rename = "24h")]
    Day,
    #[default]
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
}

impl TrendRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendRange::Day => "24h",
            TrendRange::Week => "7d",
            TrendRange::Month => "30d",
        }
    }
}

impl fmt::Display for TrendRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One bucket of the trend chart: a label plus a count per detected class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub label: String,
    #[serde(flatten)]
    pub counts: BTreeMap<String, u64>,
}

impl TrendPoint {
    pub fn count(&self, class: &str) -> u64 {
        self.counts.get(class).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResponse {
    pub range: TrendRange,
    pub trend_data: Vec<TrendPoint>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateSessionRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SessionCreated {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct PostMessageRequest<'a> {
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PostMessageResponse {
    pub ai_response: Message,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessagesResponse {
    pub messages: Vec<Message>,
}

/// `{ "error": ... }` body of a failed request
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}
