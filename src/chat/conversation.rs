//! One chat conversation with per-message delivery state
//!
//! ```text
//! send ──▶ Pending ──reply──▶ Confirmed  (AI reply appended)
//!             │
//!             └──error──▶ Failed { reason } ──retry──▶ Pending
//! ```
//!
//! A failed send never removes the user's message; it stays in the transcript
//! with the reason until it is retried.

use crate::chat::message::{Message, Role};
use crate::chat::router::WELCOME_MESSAGE;
use crate::chat::service::ChatService;
use crate::core::error::{DashboardError, Result, ValidationError};
use chrono::Utc;
use std::sync::Arc;

/// Delivery state of a message in the transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageState {
    /// Sent, waiting for the reply
    Pending,
    /// Delivered (user messages) or received (AI messages)
    Confirmed,
    /// Delivery failed; `reason` is shown under the message
    Failed { reason: String },
}

/// A transcript line
#[derive(Debug, Clone, PartialEq)]
pub struct ChatEntry {
    pub message: Message,
    pub state: MessageState,
}

impl ChatEntry {
    fn confirmed(message: Message) -> Self {
        Self {
            message,
            state: MessageState::Confirmed,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, MessageState::Failed { .. })
    }
}

/// Conversation view state bound to one chat service
pub struct Conversation {
    service: Arc<dyn ChatService>,
    session_id: Option<String>,
    entries: Vec<ChatEntry>,
}

impl Conversation {
    pub fn new(service: Arc<dyn ChatService>) -> Self {
        Self {
            service,
            session_id: None,
            entries: Vec::new(),
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn entry(&self, message_id: &str) -> Option<&ChatEntry> {
        self.entries.iter().find(|e| e.message.id == message_id)
    }

    /// True while a reply is outstanding (the typing indicator)
    pub fn is_awaiting_reply(&self) -> bool {
        self.entries.iter().any(|e| e.state == MessageState::Pending)
    }

    /// Open a new session
    ///
    /// Without a question the transcript starts with the assistant's greeting;
    /// with one, the question is sent straight away.
    pub async fn start(&mut self, initial_message: Option<&str>) -> Result<()> {
        let session_id = self.service.create_session(None).await?;
        tracing::debug!(session_id = %session_id, "Started conversation");

        self.session_id = Some(session_id);
        self.entries.clear();

        match initial_message.filter(|m| !m.trim().is_empty()) {
            Some(question) => self.send(question).await.map(|_| ()),
            None => {
                let mut greeting = Message::ai(WELCOME_MESSAGE, Utc::now());
                greeting.id = "welcome".to_string();
                self.entries.push(ChatEntry::confirmed(greeting));
                Ok(())
            }
        }
    }

    /// Switch to an existing session and load its transcript
    pub async fn open(&mut self, session_id: &str) -> Result<()> {
        let history = self.service.history(session_id).await?;

        self.session_id = Some(session_id.to_string());
        self.entries = history
            .into_iter()
            .filter(|m| m.role != Role::System)
            .map(ChatEntry::confirmed)
            .collect();
        Ok(())
    }

    /// Send a user message, returning its ID
    ///
    /// Blank input is rejected without touching the transcript. A delivery
    /// failure leaves the message in the transcript as `Failed` and is also
    /// returned as the error.
    pub async fn send(&mut self, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Err(ValidationError::required("message").into());
        }

        if self.session_id.is_none() {
            self.session_id = Some(self.service.create_session(None).await?);
        }

        let message = Message::user(text, Utc::now());
        let id = message.id.clone();
        self.entries.push(ChatEntry {
            message,
            state: MessageState::Pending,
        });

        self.deliver(&id).await?;
        Ok(id)
    }

    /// Re-submit a failed message
    pub async fn retry(&mut self, message_id: &str) -> Result<()> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.message.id == message_id)
            .ok_or_else(|| ValidationError::Invalid {
                field: "message_id".to_string(),
                message: format!("no message '{}'", message_id),
            })?;

        if !entry.is_failed() {
            return Err(ValidationError::Invalid {
                field: "message_id".to_string(),
                message: format!("message '{}' has not failed", message_id),
            }
            .into());
        }

        entry.state = MessageState::Pending;
        tracing::debug!(message_id = %message_id, "Retrying chat message");
        self.deliver(message_id).await
    }

    /// Submit the pending entry `message_id` and record the outcome
    async fn deliver(&mut self, message_id: &str) -> Result<()> {
        let (session_id, content) = match (&self.session_id, self.entry(message_id)) {
            (Some(session_id), Some(entry)) => (session_id.clone(), entry.message.content.clone()),
            _ => return Err(DashboardError::Internal("no pending message to deliver".to_string())),
        };

        let outcome = self.service.submit(&session_id, &content).await;

        let state = match &outcome {
            Ok(_) => MessageState::Confirmed,
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "Chat message failed");
                MessageState::Failed {
                    reason: e.user_message(),
                }
            }
        };
        if let Some(entry) = self.entries.iter_mut().find(|e| e.message.id == message_id) {
            entry.state = state;
        }

        let mut reply = outcome?;
        if reply.timestamp.is_none() {
            reply.timestamp = Some(Utc::now());
        }
        self.entries.push(ChatEntry::confirmed(reply));
        Ok(())
    }
}
