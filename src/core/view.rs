//! Filter/sort engine producing derived views
//!
//! One generic pipeline replaces the per-page filter chains: free text,
//! equality filters and the calendar-date filter are AND-ed, then the result
//! is sorted on a single key. The source slice is never touched.

use crate::core::entity::Entity;
use crate::core::query::{FilterCriteria, SortSpec};
use chrono::{DateTime, Local, NaiveDate, Utc};

/// Filter and sort `entities` into a new derived sequence
///
/// Never fails: unknown fields simply fail to match, an unknown sort key
/// leaves the filtered order as it was. Cheap enough to run on every keystroke.
pub fn derive_view<T: Entity>(
    entities: &[T],
    criteria: &FilterCriteria,
    sort: Option<&SortSpec>,
) -> Vec<T> {
    let needle = criteria.text_needle();

    let filtered: Vec<T> = entities
        .iter()
        .filter(|entity| {
            needle
                .as_deref()
                .is_none_or(|needle| matches_text(*entity, needle))
        })
        .filter(|entity| matches_filters(*entity, criteria))
        .filter(|entity| criteria.date.is_none_or(|date| matches_date(*entity, date)))
        .cloned()
        .collect();

    match sort {
        Some(spec) => sort_entities(filtered, spec),
        None => filtered,
    }
}

/// True when any searchable field contains `needle` (already lowercase)
pub fn matches_text<T: Entity>(entity: &T, needle: &str) -> bool {
    T::searchable_fields().iter().any(|field| {
        entity
            .field_value(field)
            .is_some_and(|value| value.contains_lowercase(needle))
    })
}

/// True when every active equality filter holds exactly
pub fn matches_filters<T: Entity>(entity: &T, criteria: &FilterCriteria) -> bool {
    criteria
        .active_filters()
        .all(|(field, expected)| {
            entity
                .field_value(field)
                .is_some_and(|actual| actual.filter_eq(expected))
        })
}

/// True when the entity timestamp falls on `date` in local time
///
/// Time of day is ignored. Entities without a timestamp never match.
pub fn matches_date<T: Entity>(entity: &T, date: NaiveDate) -> bool {
    entity
        .timestamp()
        .is_some_and(|ts| local_date(ts) == date)
}

/// The local calendar date of an instant
pub fn local_date(ts: DateTime<Utc>) -> NaiveDate {
    ts.with_timezone(&Local).date_naive()
}

/// Stable single-key sort
///
/// The comparator dispatches on the field's value type (see
/// [`FieldValue::sort_cmp`](crate::core::field::FieldValue::sort_cmp)). Entities
/// whose key is missing compare equal to everything and keep their position
/// relative to each other.
pub fn sort_entities<T: Entity>(mut data: Vec<T>, sort: &SortSpec) -> Vec<T> {
    let known = data.iter().any(|e| e.field_value(&sort.key).is_some());
    if !known {
        tracing::trace!(
            resource = T::resource_name(),
            key = %sort.key,
            "Unknown sort key, keeping order"
        );
        return data;
    }

    // Extract keys once instead of on every comparison
    let mut keyed: Vec<_> = data
        .drain(..)
        .map(|entity| (entity.field_value(&sort.key), entity))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        let ordering = match (a, b) {
            (Some(a), Some(b)) => a.sort_cmp(b),
            _ => std::cmp::Ordering::Equal,
        };
        sort.direction.apply(ordering)
    });

    keyed.into_iter().map(|(_, entity)| entity).collect()
}
