//! Entity trait defining the field-accessor table shared by every view

use crate::core::field::FieldValue;
use crate::core::query::SortSpec;
use chrono::{DateTime, Utc};

/// Base trait for every row type a dashboard page can filter and sort.
///
/// The engine never looks at concrete struct fields. Everything it needs goes
/// through this trait:
/// - `searchable_fields`: the fields free-text search looks at (OR-ed)
/// - `field_value`: dynamic access for equality filters, keyword rules and sorting
/// - `timestamp`: the instant the calendar-date filter compares against
///
/// Most implementations are generated with [`impl_view_entity!`](crate::impl_view_entity).
pub trait Entity: Clone + Send + Sync + 'static {
    /// The resource name used in logs and URLs (e.g., "alerts", "cameras")
    fn resource_name() -> &'static str;

    /// Get the identifier for this entity instance
    fn id(&self) -> &str;

    /// Fields matched by free-text search
    fn searchable_fields() -> &'static [&'static str];

    /// Get the value of a specific field by name
    ///
    /// Unknown names return `None`; the engine treats that as "no value"
    /// instead of failing.
    fn field_value(&self, field: &str) -> Option<FieldValue>;

    /// The instant used by the date filter, if this entity has one
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        None
    }

    /// Sort applied when a page showing this entity is first created
    fn default_sort() -> Option<SortSpec> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    struct TestEntity {
        id: String,
        label: String,
    }

    impl Entity for TestEntity {
        fn resource_name() -> &'static str {
            "test_entities"
        }

        fn id(&self) -> &str {
            &self.id
        }

        fn searchable_fields() -> &'static [&'static str] {
            &["label"]
        }

        fn field_value(&self, field: &str) -> Option<FieldValue> {
            match field {
                "label" => Some(FieldValue::from(self.label.as_str())),
                _ => None,
            }
        }
    }

    #[test]
    fn test_entity_defaults() {
        let entity = TestEntity {
            id: "t1".to_string(),
            label: "Lobby".to_string(),
        };

        assert_eq!(TestEntity::resource_name(), "test_entities");
        assert_eq!(entity.id(), "t1");
        assert!(entity.timestamp().is_none());
        assert!(TestEntity::default_sort().is_none());
        assert!(entity.field_value("missing").is_none());
    }
}
