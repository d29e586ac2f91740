//! Chat history sidebar: the list of past sessions, cached locally

use crate::core::error::Result;
use crate::core::query::FilterCriteria;
use crate::core::view::derive_view;
use crate::entities::SessionSummary;
use crate::storage::LocalStore;
use chrono::{DateTime, Utc};

/// Local store key holding the session list
pub const SESSIONS_KEY: &str = "chatSessions";

/// Sessions shown in the sidebar, newest first
#[derive(Debug)]
pub struct SessionList {
    store: LocalStore,
    sessions: Vec<SessionSummary>,
    current: Option<String>,
}

impl SessionList {
    /// Load the cached list from `store`; a missing key is an empty list
    pub fn load(store: LocalStore) -> Result<Self> {
        let sessions = store.get::<Vec<SessionSummary>>(SESSIONS_KEY)?.unwrap_or_default();
        tracing::debug!(count = sessions.len(), "Loaded chat sessions");

        Ok(Self {
            store,
            sessions,
            current: None,
        })
    }

    pub fn sessions(&self) -> &[SessionSummary] {
        &self.sessions
    }

    pub fn current(&self) -> Option<&SessionSummary> {
        let id = self.current.as_deref()?;
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Sessions whose title or preview contains `query`
    pub fn search(&self, query: &str) -> Vec<SessionSummary> {
        derive_view(&self.sessions, &FilterCriteria::new().with_text(query), None)
    }

    /// Record a newly created session and make it current
    pub async fn add(&mut self, summary: SessionSummary) -> Result<()> {
        self.sessions.retain(|s| s.id != summary.id);
        self.current = Some(summary.id.clone());
        self.sessions.insert(0, summary);
        self.persist().await
    }

    /// Note new messages in a session: bump its count, preview and time
    pub async fn touch(
        &mut self,
        session_id: &str,
        preview: &str,
        new_messages: u32,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let Some(pos) = self.sessions.iter().position(|s| s.id == session_id) else {
            return Ok(false);
        };

        let mut session = self.sessions.remove(pos);
        session.message_count = session.message_count.saturating_add(new_messages);
        session.preview = preview.trim().to_string();
        session.timestamp = now;
        self.sessions.insert(0, session);

        self.persist().await?;
        Ok(true)
    }

    /// Make `session_id` current; returns false if it is unknown
    pub fn select(&mut self, session_id: &str) -> bool {
        let known = self.sessions.iter().any(|s| s.id == session_id);
        if known {
            self.current = Some(session_id.to_string());
        }
        known
    }

    /// Remove a session; clears the selection if it was current
    pub async fn delete(&mut self, session_id: &str) -> Result<bool> {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != session_id);
        if self.sessions.len() == before {
            return Ok(false);
        }

        if self.current.as_deref() == Some(session_id) {
            self.current = None;
        }
        self.persist().await?;
        Ok(true)
    }

    async fn persist(&mut self) -> Result<()> {
        self.store.set(SESSIONS_KEY, &self.sessions).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn summary(id: &str, title: &str, minutes_ago: i64) -> SessionSummary {
        SessionSummary::new(id, Some(title), Utc::now() - Duration::minutes(minutes_ago))
    }

    #[tokio::test]
    async fn test_sessions_are_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.json");

        let mut list = SessionList::load(LocalStore::open(&path).await.unwrap()).unwrap();
        list.add(summary("s1", "Parking lot last night", 30)).await.unwrap();
        list.add(summary("s2", "Side entrance", 5)).await.unwrap();

        let reloaded = SessionList::load(LocalStore::open(&path).await.unwrap()).unwrap();
        let ids: Vec<&str> = reloaded.sessions().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s2", "s1"]);
        assert!(reloaded.current().is_none());
    }

    #[tokio::test]
    async fn test_touch_moves_session_to_top() {
        let mut list = SessionList::load(LocalStore::in_memory()).unwrap();
        list.add(summary("s1", "First", 30)).await.unwrap();
        list.add(summary("s2", "Second", 5)).await.unwrap();

        assert!(list.touch("s1", "Any cars?", 2, Utc::now()).await.unwrap());
        assert!(!list.touch("missing", "x", 1, Utc::now()).await.unwrap());

        let first = &list.sessions()[0];
        assert_eq!(first.id, "s1");
        assert_eq!(first.message_count, 2);
        assert_eq!(first.preview, "Any cars?");
    }

    #[tokio::test]
    async fn test_message_count_saturates() {
        let mut list = SessionList::load(LocalStore::in_memory()).unwrap();
        list.add(summary("s1", "Night shift", 10)).await.unwrap();

        list.touch("s1", "first", u32::MAX, Utc::now()).await.unwrap();
        list.touch("s1", "second", 3, Utc::now()).await.unwrap();

        assert_eq!(list.sessions()[0].message_count, u32::MAX);
        assert_eq!(list.sessions()[0].preview, "second");
    }

    #[tokio::test]
    async fn test_search_and_delete() {
        let mut list = SessionList::load(LocalStore::in_memory()).unwrap();
        list.add(summary("s1", "Parking lot last night", 30)).await.unwrap();
        list.add(summary("s2", "Side entrance", 5)).await.unwrap();

        let found = list.search("PARKING");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "s1");
        assert_eq!(list.search("").len(), 2);

        assert_eq!(list.current().map(|s| s.id.as_str()), Some("s2"));
        assert!(list.delete("s2").await.unwrap());
        assert!(list.current().is_none());
        assert!(!list.delete("s2").await.unwrap());
        assert!(list.select("s1"));
        assert!(!list.select("s2"));
    }
}
