//! Data-access trait injected into page views

use crate::core::entity::Entity;
use crate::core::error::Result;
use async_trait::async_trait;

/// Source of truth for one entity type
///
/// Pages never own authoritative data: they hold a local copy obtained from a
/// repository and refresh it explicitly. Implementations exist for in-memory
/// fixtures and for the REST backend; the view layer is agnostic to which one
/// it talks to.
#[async_trait]
pub trait EntityRepository<T: Entity>: Send + Sync {
    /// List all entities, in the order the source returns them
    async fn list(&self) -> Result<Vec<T>>;

    /// Get an entity by ID
    async fn get(&self, id: &str) -> Result<Option<T>> {
        Ok(self.list().await?.into_iter().find(|e| e.id() == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::FieldValue;

    #[derive(Clone, Debug)]
    struct Item(&'static str);

    impl Entity for Item {
        fn resource_name() -> &'static str {
            "items"
        }

        fn id(&self) -> &str {
            self.0
        }

        fn searchable_fields() -> &'static [&'static str] {
            &[]
        }

        fn field_value(&self, _field: &str) -> Option<FieldValue> {
            None
        }
    }

    struct Fixed;

    #[async_trait]
    impl EntityRepository<Item> for Fixed {
        async fn list(&self) -> Result<Vec<Item>> {
            Ok(vec![Item("a"), Item("b")])
        }
    }

    #[tokio::test]
    async fn test_default_get_scans_list() {
        let repo = Fixed;
        assert_eq!(repo.get("b").await.unwrap().map(|i| i.0), Some("b"));
        assert!(repo.get("z").await.unwrap().is_none());
    }
}
