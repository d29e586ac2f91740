//! In-memory implementation of EntityRepository for testing and offline use

use crate::core::entity::Entity;
use crate::core::error::{DashboardError, Result};
use crate::core::repository::EntityRepository;
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// In-memory entity repository
///
/// Keeps insertion order, which is the order `list` returns. Clones share the
/// same storage.
#[derive(Clone)]
pub struct InMemoryRepository<T: Entity> {
    items: Arc<RwLock<Vec<T>>>,
}

impl<T: Entity> InMemoryRepository<T> {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    /// Create a repository seeded with `items`
    pub fn with_items(items: Vec<T>) -> Self {
        Self {
            items: Arc::new(RwLock::new(items)),
        }
    }

    /// Insert or replace an entity by ID
    pub fn upsert(&self, entity: T) -> Result<()> {
        let mut items = self
            .items
            .write()
            .map_err(|e| DashboardError::Internal(format!("Failed to acquire write lock: {}", e)))?;

        match items.iter_mut().find(|item| item.id() == entity.id()) {
            Some(existing) => *existing = entity,
            None => items.push(entity),
        }

        Ok(())
    }

    /// Remove an entity, returning whether it existed
    pub fn remove(&self, id: &str) -> Result<bool> {
        let mut items = self
            .items
            .write()
            .map_err(|e| DashboardError::Internal(format!("Failed to acquire write lock: {}", e)))?;

        let before = items.len();
        items.retain(|item| item.id() != id);
        Ok(items.len() != before)
    }

    /// Apply `f` to the entity with `id`, if present
    pub fn update<F>(&self, id: &str, f: F) -> Result<Option<T>>
    where
        F: FnOnce(&mut T),
    {
        let mut items = self
            .items
            .write()
            .map_err(|e| DashboardError::Internal(format!("Failed to acquire write lock: {}", e)))?;

        Ok(items.iter_mut().find(|item| item.id() == id).map(|item| {
            f(item);
            item.clone()
        }))
    }
}

impl<T: Entity> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> EntityRepository<T> for InMemoryRepository<T> {
    async fn list(&self) -> Result<Vec<T>> {
        let items = self
            .items
            .read()
            .map_err(|e| DashboardError::Internal(format!("Failed to acquire read lock: {}", e)))?;

        Ok(items.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<T>> {
        let items = self
            .items
            .read()
            .map_err(|e| DashboardError::Internal(format!("Failed to acquire read lock: {}", e)))?;

        Ok(items.iter().find(|item| item.id() == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::fixtures;

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let repo = InMemoryRepository::with_items(fixtures::alerts());
        let ids: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.id)
            .collect();

        assert_eq!(ids.first().map(String::as_str), Some("a1"));
        assert_eq!(ids.last().map(String::as_str), Some("a10"));
    }

    #[tokio::test]
    async fn test_upsert_replaces_in_place() {
        let repo = InMemoryRepository::with_items(fixtures::cameras());
        let mut camera = repo.get("cam-3").await.unwrap().unwrap();
        camera.name = "Renamed".to_string();
        repo.upsert(camera).unwrap();

        let listed = repo.list().await.unwrap();
        assert_eq!(listed.len(), 10);
        assert_eq!(listed[2].name, "Renamed");
    }

    #[tokio::test]
    async fn test_update_and_remove() {
        let repo = InMemoryRepository::with_items(fixtures::cameras());

        let updated = repo.update("cam-1", |c| c.active = false).unwrap();
        assert_eq!(updated.map(|c| c.active), Some(false));
        assert!(repo.update("missing", |c| c.active = true).unwrap().is_none());

        assert!(repo.remove("cam-1").unwrap());
        assert!(!repo.remove("cam-1").unwrap());
        assert_eq!(repo.list().await.unwrap().len(), 9);
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let repo = InMemoryRepository::new();
        let other = repo.clone();
        repo.upsert(fixtures::cameras().remove(0)).unwrap();

        assert_eq!(other.list().await.unwrap().len(), 1);
    }
}
