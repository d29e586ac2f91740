//! Chat backends a conversation can talk to

use crate::chat::message::{Message, Role};
use crate::chat::router::{ResponseRouter, WELCOME_MESSAGE};
use crate::client::ApiClient;
use crate::core::error::{DashboardError, Result, ValidationError};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use uuid::Uuid;

/// Something that answers chat messages within a session
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Open a session, optionally with the first user message
    async fn create_session(&self, initial_message: Option<&str>) -> Result<String>;

    /// Submit a user message and wait for the AI reply
    async fn submit(&self, session_id: &str, content: &str) -> Result<Message>;

    /// Messages stored for a session, oldest first
    async fn history(&self, session_id: &str) -> Result<Vec<Message>>;
}

#[async_trait]
impl ChatService for ApiClient {
    async fn create_session(&self, initial_message: Option<&str>) -> Result<String> {
        ApiClient::create_session(self, initial_message).await
    }

    async fn submit(&self, session_id: &str, content: &str) -> Result<Message> {
        self.post_message(session_id, content).await
    }

    async fn history(&self, session_id: &str) -> Result<Vec<Message>> {
        self.session_messages(session_id).await
    }
}

/// Default typing delay of the offline assistant
pub const CANNED_REPLY_DELAY: Duration = Duration::from_secs(2);

/// Offline assistant answering from a [`ResponseRouter`]
///
/// Keeps sessions in memory the way the backend keeps them in its database.
#[derive(Clone)]
pub struct CannedChatService {
    router: Arc<ResponseRouter>,
    delay: Duration,
    sessions: Arc<RwLock<HashMap<String, Vec<Message>>>>,
}

impl CannedChatService {
    pub fn new(router: ResponseRouter) -> Self {
        Self {
            router: Arc::new(router),
            delay: CANNED_REPLY_DELAY,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Builder: change the simulated typing delay
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn append(&self, session_id: &str, messages: Vec<Message>) -> Result<()> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| DashboardError::Internal(format!("Failed to acquire write lock: {}", e)))?;

        let Some(history) = sessions.get_mut(session_id) else {
            return Err(DashboardError::Status {
                endpoint: format!("/chat/sessions/{}/messages", session_id),
                status: 404,
                message: "Session not found".to_string(),
            });
        };
        history.extend(messages);
        Ok(())
    }
}

impl Default for CannedChatService {
    fn default() -> Self {
        Self::new(ResponseRouter::canned())
    }
}

#[async_trait]
impl ChatService for CannedChatService {
    async fn create_session(&self, initial_message: Option<&str>) -> Result<String> {
        let now = Utc::now();
        let session_id = Uuid::new_v4().to_string();

        let mut greeting = Message::ai(WELCOME_MESSAGE, now);
        greeting.role = Role::System;
        let mut messages = vec![greeting];
        if let Some(text) = initial_message.map(str::trim).filter(|t| !t.is_empty()) {
            messages.push(Message::user(text, now));
        }

        self.sessions
            .write()
            .map_err(|e| DashboardError::Internal(format!("Failed to acquire write lock: {}", e)))?
            .insert(session_id.clone(), messages);

        Ok(session_id)
    }

    async fn submit(&self, session_id: &str, content: &str) -> Result<Message> {
        if content.trim().is_empty() {
            return Err(ValidationError::required("content").into());
        }

        self.append(session_id, vec![Message::user(content, Utc::now())])?;

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let reply = self.router.route(content, Utc::now());
        self.append(session_id, vec![reply.clone()])?;
        Ok(reply)
    }

    async fn history(&self, session_id: &str) -> Result<Vec<Message>> {
        let sessions = self
            .sessions
            .read()
            .map_err(|e| DashboardError::Internal(format!("Failed to acquire read lock: {}", e)))?;

        sessions
            .get(session_id)
            .map(|messages| {
                messages
                    .iter()
                    .filter(|m| m.role != Role::System)
                    .cloned()
                    .collect()
            })
            .ok_or_else(|| DashboardError::Status {
                endpoint: format!("/chat/sessions/{}/messages", session_id),
                status: 404,
                message: "Session not found".to_string(),
            })
    }
}
