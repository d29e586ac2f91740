//! Canned reply routing for the offline assistant
//!
//! Routes are checked in table order against the lowercased message and the
//! first one with a matching trigger wins. A message no route understands gets
//! the generic fallback reply.

use crate::chat::message::{Anomaly, Message, VideoRef};
use crate::entities::AlertSeverity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Greeting shown when a conversation starts without a question
pub const WELCOME_MESSAGE: &str = "Hello! I'm your AI video assistant. Ask me about any footage or events, and I'll find relevant clips for you.";

/// Body of a canned AI reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CannedReply {
    pub content: String,
    #[serde(default)]
    pub videos: Vec<VideoRef>,
    #[serde(default)]
    pub anomalies: Vec<Anomaly>,
}

impl CannedReply {
    pub fn text(content: &str) -> Self {
        Self {
            content: content.to_string(),
            videos: Vec::new(),
            anomalies: Vec::new(),
        }
    }

    fn with_video(mut self, video: VideoRef) -> Self {
        self.videos.push(video);
        self
    }

    fn with_anomaly(mut self, anomaly: Anomaly) -> Self {
        self.anomalies.push(anomaly);
        self
    }

    /// Stamp the reply as a new AI message
    pub fn to_message(&self, now: DateTime<Utc>) -> Message {
        Message::ai(self.content.clone(), now)
            .with_videos(self.videos.clone())
            .with_anomalies(self.anomalies.clone())
    }
}

/// One routing rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub name: String,
    pub triggers: Vec<String>,
    pub reply: CannedReply,
}

impl Route {
    pub fn new(name: &str, triggers: &[&str], reply: CannedReply) -> Self {
        Self {
            name: name.to_string(),
            triggers: triggers.iter().map(|t| t.to_lowercase()).collect(),
            reply,
        }
    }

    fn matches(&self, message_lower: &str) -> bool {
        self.triggers
            .iter()
            .any(|t| !t.is_empty() && message_lower.contains(t.as_str()))
    }
}

/// Priority-ordered reply table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRouter {
    pub routes: Vec<Route>,
    pub fallback: CannedReply,
}

impl Default for ResponseRouter {
    fn default() -> Self {
        Self::canned()
    }
}

impl ResponseRouter {
    pub fn new(routes: Vec<Route>, fallback: CannedReply) -> Self {
        Self { routes, fallback }
    }

    /// The dashboard's built-in replies
    pub fn canned() -> Self {
        Self::new(
            vec![
                Route::new(
                    "time_window",
                    &["after 11"],
                    CannedReply::text(
                        "I found 3 instances of people entering the building after 11 PM last night. Here are the relevant clips:",
                    )
                    .with_video(VideoRef::new(
                        "v1",
                        "Main Entrance - 3 individuals",
                        "11:05 PM",
                        "Front Lobby",
                    ))
                    .with_video(VideoRef::new(
                        "v2",
                        "Side Entrance - 1 individual",
                        "11:32 PM",
                        "Employee Entrance",
                    )),
                ),
                Route::new(
                    "vehicles",
                    &["parking", "car"],
                    CannedReply::text(
                        "I found several vehicles in the parking lot. Here are the most recent activities:",
                    )
                    .with_video(VideoRef::new(
                        "v3",
                        "Blue sedan parking",
                        "2:15 PM",
                        "North Parking Lot",
                    ))
                    .with_anomaly(Anomaly::new(
                        "Unauthorized Parking",
                        AlertSeverity::Low,
                        "Vehicle parked in reserved space",
                    )),
                ),
                Route::new(
                    "suspicious",
                    &["suspicious", "unusual"],
                    CannedReply::text(
                        "I detected some unusual activities in the last 24 hours. Here are the relevant clips:",
                    )
                    .with_video(VideoRef::new(
                        "v4",
                        "Unusual movement near storage",
                        "1:42 AM",
                        "Storage Area",
                    ))
                    .with_anomaly(Anomaly::new(
                        "After Hours Activity",
                        AlertSeverity::High,
                        "Movement detected in restricted area after closing",
                    )),
                ),
            ],
            CannedReply::text("I've analyzed the footage based on your query. Here's what I found:")
                .with_video(VideoRef::new("v5", "Recent activity", "3:20 PM", "Main Area")),
        )
    }

    /// The first route whose trigger occurs in `message`
    pub fn matched_route(&self, message: &str) -> Option<&Route> {
        let lower = message.to_lowercase();
        self.routes.iter().find(|route| route.matches(&lower))
    }

    /// Reply for `message`, the fallback when no route matches
    pub fn reply_for(&self, message: &str) -> &CannedReply {
        self.matched_route(message)
            .map(|route| &route.reply)
            .unwrap_or(&self.fallback)
    }

    /// Build the AI message answering `message`
    pub fn route(&self, message: &str, now: DateTime<Utc>) -> Message {
        let reply = self.reply_for(message);
        tracing::debug!(
            route = self.matched_route(message).map(|r| r.name.as_str()).unwrap_or("fallback"),
            "Routed chat message"
        );
        reply.to_message(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::message::Role;

    fn route_name(router: &ResponseRouter, message: &str) -> Option<String> {
        router.matched_route(message).map(|r| r.name.clone())
    }

    #[test]
    fn test_time_window_reply() {
        let router = ResponseRouter::canned();
        let reply = router.route("Who came in AFTER 11 pm?", Utc::now());

        assert_eq!(reply.role, Role::Ai);
        assert!(reply.content.starts_with("I found 3 instances"));
        let ids: Vec<&str> = reply.videos.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["v1", "v2"]);
        assert!(reply.anomalies.is_empty());
    }

    #[test]
    fn test_priority_order() {
        let router = ResponseRouter::canned();
        // Both the time window and the vehicle route match; the first wins
        assert_eq!(
            route_name(&router, "cars in the parking lot after 11").as_deref(),
            Some("time_window")
        );
        // Vehicles outrank suspicious activity
        assert_eq!(
            route_name(&router, "unusual car activity").as_deref(),
            Some("vehicles")
        );
        assert_eq!(
            route_name(&router, "anything suspicious?").as_deref(),
            Some("suspicious")
        );
    }

    #[test]
    fn test_car_is_a_substring_trigger() {
        let router = ResponseRouter::canned();
        assert_eq!(
            route_name(&router, "show me the security cameras").as_deref(),
            None
        );
        // "scary" contains "car"
        assert_eq!(route_name(&router, "something scary").as_deref(), Some("vehicles"));
    }

    #[test]
    fn test_fallback() {
        let router = ResponseRouter::canned();
        let reply = router.route("what happened today", Utc::now());

        assert_eq!(
            reply.content,
            "I've analyzed the footage based on your query. Here's what I found:"
        );
        assert_eq!(reply.videos.len(), 1);
        assert_eq!(reply.videos[0].location, "Main Area");
    }

    #[test]
    fn test_vehicle_anomaly() {
        let router = ResponseRouter::canned();
        let reply = router.route("Parking", Utc::now());

        assert_eq!(reply.anomalies.len(), 1);
        assert_eq!(reply.anomalies[0].severity, AlertSeverity::Low);
        assert_eq!(reply.anomalies[0].kind, "Unauthorized Parking");
    }
}
