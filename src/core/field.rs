//! Field value types and comparison

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A polymorphic field value that can hold different types
///
/// Entities expose their filterable and sortable fields through this type so
/// that a single engine can work across alerts, cameras and users.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    DateTime(DateTime<Utc>),
    String(String),
    Null,
}

impl FieldValue {
    /// Equality as used by filters, driven by the kind of `self`
    ///
    /// `self` is the entity's value. Strings compare as text, so a zone named
    /// `"2"` equals the filter text `"2"`. Numbers compare numerically across
    /// integers and floats, booleans accept `true`/`false` text and timestamps
    /// accept RFC 3339 text. Nothing is trimmed or case-folded.
    pub fn filter_eq(&self, expected: &FieldValue) -> bool {
        match (self, expected) {
            (FieldValue::String(actual), expected) => {
                expected.filter_text().is_some_and(|text| *actual == text)
            }
            (FieldValue::Integer(a), FieldValue::Integer(b)) => a == b,
            (FieldValue::Integer(_) | FieldValue::Float(_), expected) => {
                match (self.as_f64(), expected.number()) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
            }
            (FieldValue::Boolean(actual), expected) => match expected {
                FieldValue::Boolean(b) => actual == b,
                FieldValue::String(s) => s.parse::<bool>().is_ok_and(|b| *actual == b),
                _ => false,
            },
            (FieldValue::DateTime(actual), expected) => match expected {
                FieldValue::DateTime(b) => actual == b,
                FieldValue::String(s) => {
                    DateTime::parse_from_rfc3339(s).is_ok_and(|b| *actual == b)
                }
                _ => false,
            },
            (FieldValue::Null, expected) => expected.is_null(),
        }
    }

    fn filter_text(&self) -> Option<String> {
        match self {
            FieldValue::String(s) => Some(s.clone()),
            FieldValue::Integer(i) => Some(i.to_string()),
            FieldValue::Float(f) => Some(f.to_string()),
            FieldValue::Boolean(b) => Some(b.to_string()),
            FieldValue::DateTime(_) | FieldValue::Null => None,
        }
    }

    fn number(&self) -> Option<f64> {
        match self {
            FieldValue::String(s) => s.parse::<f64>().ok().filter(|f| f.is_finite()),
            other => other.as_f64(),
        }
    }

    /// Get the value as a float if it is numeric
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get the value as a string if possible
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as a boolean if possible
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the value as a timestamp if possible
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Case-insensitive substring test; `needle` must already be lowercase
    ///
    /// Only string values can contain text. Numbers, booleans and timestamps
    /// never match a free-text query.
    pub fn contains_lowercase(&self, needle: &str) -> bool {
        match self {
            FieldValue::String(s) => s.to_lowercase().contains(needle),
            _ => false,
        }
    }

    /// Compare two values for sorting
    ///
    /// Timestamps compare by epoch milliseconds, strings with [`locale_cmp`],
    /// numbers numerically and booleans with `false < true`. Values of
    /// different kinds (or nulls) compare as equal so a stable sort leaves
    /// them where they were.
    pub fn sort_cmp(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::DateTime(a), FieldValue::DateTime(b)) => {
                a.timestamp_millis().cmp(&b.timestamp_millis())
            }
            (FieldValue::String(a), FieldValue::String(b)) => locale_cmp(a, b),
            (FieldValue::Integer(a), FieldValue::Integer(b)) => a.cmp(b),
            (FieldValue::Float(a), FieldValue::Float(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (FieldValue::Integer(a), FieldValue::Float(b)) => {
                (*a as f64).partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (FieldValue::Float(a), FieldValue::Integer(b)) => {
                a.partial_cmp(&(*b as f64)).unwrap_or(Ordering::Equal)
            }
            (FieldValue::Boolean(a), FieldValue::Boolean(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// Locale-style string ordering
///
/// Letters compare case-insensitively first; on a tie lowercase sorts before
/// uppercase, which is what ICU collation does for `"a"` vs `"A"`.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::DateTime(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}
