//! Keyword query interpreter
//!
//! Turns a free-text "natural language" query into a filter by looking for
//! trigger words. The rules are plain data (a [`RuleTable`] of
//! [`KeywordGroup`]s) so they can be loaded from configuration and tested in
//! isolation.
//!
//! # Semantics
//!
//! ```text
//! query ──lowercase──▶ for each group: any trigger substring present?
//!                              │
//!                         yes ─┴─▶ AND the group's condition into the filter
//!                         no  ───▶ group contributes nothing
//! ```
//!
//! Groups are independent and AND-ed, so their order never changes the result.

use crate::core::entity::Entity;
use crate::core::field::FieldValue;
use serde::{Deserialize, Serialize};

/// Predicate over an entity, expressed as data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Condition {
    /// Some field in `fields` contains some needle (case-insensitive)
    Contains {
        fields: Vec<String>,
        needles: Vec<String>,
    },
    /// The field equals `value`; strings may be compared ignoring case
    Equals {
        field: String,
        value: FieldValue,
        #[serde(default)]
        ignore_case: bool,
    },
    /// The boolean field is `true`
    IsTrue { field: String },
    /// The boolean field is `false`
    IsFalse { field: String },
    /// At least one nested condition holds
    AnyOf { conditions: Vec<Condition> },
    /// Every nested condition holds
    AllOf { conditions: Vec<Condition> },
}

impl Condition {
    pub fn contains(fields: &[&str], needles: &[&str]) -> Self {
        Condition::Contains {
            fields: fields.iter().map(|s| s.to_string()).collect(),
            needles: needles.iter().map(|s| s.to_lowercase()).collect(),
        }
    }

    pub fn equals(field: &str, value: impl Into<FieldValue>) -> Self {
        Condition::Equals {
            field: field.to_string(),
            value: value.into(),
            ignore_case: false,
        }
    }

    pub fn equals_ignore_case(field: &str, value: &str) -> Self {
        Condition::Equals {
            field: field.to_string(),
            value: FieldValue::from(value),
            ignore_case: true,
        }
    }

    pub fn is_true(field: &str) -> Self {
        Condition::IsTrue {
            field: field.to_string(),
        }
    }

    pub fn is_false(field: &str) -> Self {
        Condition::IsFalse {
            field: field.to_string(),
        }
    }

    pub fn any_of(conditions: Vec<Condition>) -> Self {
        Condition::AnyOf { conditions }
    }

    /// Evaluate against an entity; missing fields never satisfy a condition
    pub fn matches<T: Entity>(&self, entity: &T) -> bool {
        match self {
            Condition::Contains { fields, needles } => fields.iter().any(|field| {
                entity.field_value(field).is_some_and(|value| {
                    needles
                        .iter()
                        .any(|needle| value.contains_lowercase(&needle.to_lowercase()))
                })
            }),
            Condition::Equals {
                field,
                value,
                ignore_case,
            } => match (entity.field_value(field), value) {
                (Some(FieldValue::String(actual)), FieldValue::String(expected))
                    if *ignore_case =>
                {
                    actual.to_lowercase() == expected.to_lowercase()
                }
                (Some(actual), expected) => actual.filter_eq(expected),
                (None, _) => false,
            },
            Condition::IsTrue { field } => entity
                .field_value(field)
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            Condition::IsFalse { field } => entity
                .field_value(field)
                .and_then(|v| v.as_bool())
                .is_some_and(|b| !b),
            Condition::AnyOf { conditions } => conditions.iter().any(|c| c.matches(entity)),
            Condition::AllOf { conditions } => conditions.iter().all(|c| c.matches(entity)),
        }
    }
}

/// A named set of trigger words mapped to one condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordGroup {
    pub name: String,
    pub triggers: Vec<String>,
    pub condition: Condition,
}

impl KeywordGroup {
    pub fn new(name: &str, triggers: &[&str], condition: Condition) -> Self {
        Self {
            name: name.to_string(),
            triggers: triggers.iter().map(|t| t.to_lowercase()).collect(),
            condition,
        }
    }

    /// Check whether any trigger occurs in the (lowercased) query
    pub fn is_triggered(&self, query_lower: &str) -> bool {
        self.triggers
            .iter()
            .any(|trigger| !trigger.is_empty() && query_lower.contains(&trigger.to_lowercase()))
    }
}

/// What to show when no keyword group fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchedPolicy {
    /// Show the whole collection (the dashboard's historical behaviour)
    #[default]
    ShowAll,
    /// Show nothing for a query the rules don't understand
    ShowNone,
}

/// Result of interpreting a query
#[derive(Debug, Clone)]
pub struct Interpretation<T> {
    /// Entities satisfying every triggered group
    pub entities: Vec<T>,
    /// Names of the groups that fired, in table order
    pub matched_groups: Vec<String>,
}

impl<T> Interpretation<T> {
    /// True when no keyword group recognised the query
    pub fn is_unrecognized(&self) -> bool {
        self.matched_groups.is_empty()
    }
}

/// An ordered table of keyword groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RuleTable {
    pub groups: Vec<KeywordGroup>,

    #[serde(default)]
    pub unmatched: UnmatchedPolicy,
}

impl RuleTable {
    pub fn new(groups: Vec<KeywordGroup>) -> Self {
        Self {
            groups,
            unmatched: UnmatchedPolicy::default(),
        }
    }

    /// Builder: change the unmatched policy
    pub fn with_unmatched(mut self, policy: UnmatchedPolicy) -> Self {
        self.unmatched = policy;
        self
    }

    /// Groups triggered by `query`
    pub fn triggered<'a>(&'a self, query: &str) -> Vec<&'a KeywordGroup> {
        let query = query.to_lowercase();
        self.groups
            .iter()
            .filter(|group| group.is_triggered(&query))
            .collect()
    }

    /// Interpret `query` against `entities`
    pub fn interpret<T: Entity>(&self, query: &str, entities: &[T]) -> Interpretation<T> {
        let triggered = self.triggered(query);
        let matched_groups: Vec<String> = triggered.iter().map(|g| g.name.clone()).collect();

        let entities = if triggered.is_empty() {
            match self.unmatched {
                UnmatchedPolicy::ShowAll => entities.to_vec(),
                UnmatchedPolicy::ShowNone => Vec::new(),
            }
        } else {
            entities
                .iter()
                .filter(|entity| triggered.iter().all(|g| g.condition.matches(*entity)))
                .cloned()
                .collect()
        };

        tracing::debug!(
            resource = T::resource_name(),
            groups = ?matched_groups,
            results = entities.len(),
            "Interpreted keyword query"
        );

        Interpretation {
            entities,
            matched_groups,
        }
    }

    /// Keyword groups for the camera grid
    pub fn cameras() -> Self {
        Self::new(vec![
            KeywordGroup::new(
                "entrance",
                &["entrance", "door"],
                Condition::any_of(vec![
                    Condition::contains(&["name"], &["entrance", "door"]),
                    Condition::equals_ignore_case("zone", "entrance"),
                ]),
            ),
            KeywordGroup::new(
                "parking",
                &["parking", "garage"],
                Condition::any_of(vec![
                    Condition::contains(&["name"], &["parking", "garage"]),
                    Condition::equals_ignore_case("zone", "parking"),
                ]),
            ),
            KeywordGroup::new(
                "office",
                &["office", "executive"],
                Condition::any_of(vec![
                    Condition::contains(&["name"], &["office"]),
                    Condition::equals_ignore_case("zone", "office"),
                ]),
            ),
            KeywordGroup::new(
                "indoor",
                &["indoor", "inside"],
                Condition::equals("type", "indoor"),
            ),
            KeywordGroup::new(
                "outdoor",
                &["outdoor", "outside"],
                Condition::equals("type", "outdoor"),
            ),
            KeywordGroup::new("active", &["active", "online"], Condition::is_true("active")),
            KeywordGroup::new(
                "inactive",
                &["inactive", "offline"],
                Condition::is_false("active"),
            ),
            KeywordGroup::new(
                "alerts",
                &["alert", "warning"],
                Condition::is_true("has_alerts"),
            ),
        ])
    }

    /// Keyword groups for the alert table
    pub fn alerts() -> Self {
        Self::new(vec![
            KeywordGroup::new(
                "critical",
                &["critical", "urgent"],
                Condition::equals("severity", "critical"),
            ),
            KeywordGroup::new(
                "high",
                &["high priority", "high severity"],
                Condition::equals("severity", "high"),
            ),
            KeywordGroup::new(
                "parking",
                &["parking", "garage", "vehicle"],
                Condition::contains(
                    &["camera", "location", "title", "description"],
                    &["parking", "garage", "vehicle"],
                ),
            ),
            KeywordGroup::new(
                "entrance",
                &["entrance", "door", "lobby"],
                Condition::contains(&["camera", "location"], &["entrance", "door", "lobby"]),
            ),
            KeywordGroup::new(
                "new",
                &["new", "unacknowledged", "open"],
                Condition::equals("status", "new"),
            ),
            KeywordGroup::new(
                "resolved",
                &["resolved", "closed"],
                Condition::equals("status", "resolved"),
            ),
        ])
    }
}

/// Interpret `query` with `rules` and return only the matching entities
pub fn interpret_query<T: Entity>(query: &str, entities: &[T], rules: &RuleTable) -> Vec<T> {
    rules.interpret(query, entities).entities
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Cam {
        id: &'static str,
        name: &'static str,
        zone: &'static str,
        kind: &'static str,
        active: bool,
        has_alerts: bool,
    }

    impl Entity for Cam {
        fn resource_name() -> &'static str {
            "cams"
        }

        fn id(&self) -> &str {
            self.id
        }

        fn searchable_fields() -> &'static [&'static str] {
            &["name", "zone"]
        }

        fn field_value(&self, field: &str) -> Option<FieldValue> {
            match field {
                "name" => Some(self.name.into()),
                "zone" => Some(self.zone.into()),
                "type" => Some(self.kind.into()),
                "active" => Some(self.active.into()),
                "has_alerts" => Some(self.has_alerts.into()),
                _ => None,
            }
        }
    }

    fn cams() -> Vec<Cam> {
        vec![
            Cam {
                id: "c1",
                name: "Main Entrance",
                zone: "lobby",
                kind: "indoor",
                active: true,
                has_alerts: false,
            },
            Cam {
                id: "c2",
                name: "Loading Bay",
                zone: "Entrance",
                kind: "outdoor",
                active: true,
                has_alerts: true,
            },
            Cam {
                id: "c3",
                name: "Parking Garage",
                zone: "parking",
                kind: "outdoor",
                active: false,
                has_alerts: true,
            },
        ]
    }

    fn ids(view: &[Cam]) -> Vec<&str> {
        view.iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_location_group_checks_name_and_zone() {
        let result = interpret_query("show me the front door", &cams(), &RuleTable::cameras());
        assert_eq!(ids(&result), vec!["c1", "c2"]);
    }

    #[test]
    fn test_groups_are_and_combined() {
        let result = interpret_query("Outside cameras with ALERTS", &cams(), &RuleTable::cameras());
        assert_eq!(ids(&result), vec!["c2", "c3"]);

        let result = interpret_query("outside offline alert", &cams(), &RuleTable::cameras());
        assert_eq!(ids(&result), vec!["c3"]);
    }

    #[test]
    fn test_outdoor_also_triggers_entrance() {
        // triggers are substrings: "outdoor" contains "door"
        let interpretation = RuleTable::cameras().interpret("outdoor cameras with alerts", &cams());
        assert_eq!(
            interpretation.matched_groups,
            vec!["entrance", "outdoor", "alerts"]
        );
        assert_eq!(ids(&interpretation.entities), vec!["c2"]);
    }

    #[test]
    fn test_unrecognized_query_shows_everything() {
        let interpretation = RuleTable::cameras().interpret("xyzzy", &cams());
        assert!(interpretation.is_unrecognized());
        assert_eq!(interpretation.entities.len(), 3);
    }

    #[test]
    fn test_unrecognized_query_show_none_policy() {
        let rules = RuleTable::cameras().with_unmatched(UnmatchedPolicy::ShowNone);
        assert!(interpret_query("xyzzy", &cams(), &rules).is_empty());
    }

    #[test]
    fn test_group_order_does_not_matter() {
        let forward = RuleTable::cameras();
        let mut reversed = forward.clone();
        reversed.groups.reverse();

        for query in ["outdoor alert", "parking offline", "entrance active", "inside"] {
            assert_eq!(
                interpret_query(query, &cams(), &forward),
                interpret_query(query, &cams(), &reversed),
                "query {query:?}"
            );
        }
    }

    #[test]
    fn test_inactive_also_triggers_active() {
        // "inactive" contains "active": both groups fire and nothing survives
        let interpretation = RuleTable::cameras().interpret("inactive", &cams());
        assert_eq!(interpretation.matched_groups, vec!["active", "inactive"]);
        assert!(interpretation.entities.is_empty());
    }

    #[test]
    fn test_missing_field_never_matches() {
        let condition = Condition::is_false("nonexistent");
        assert!(!cams().iter().any(|c| condition.matches(c)));
    }

    #[test]
    fn test_rule_table_from_yaml() {
        let yaml = r#"
groups:
  - name: indoor
    triggers: [indoor, inside]
    condition:
      op: equals
      field: type
      value: indoor
  - name: live
    triggers: [live]
    condition:
      op: is_true
      field: active
unmatched: show_none
"#;
        let rules: RuleTable = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(rules.unmatched, UnmatchedPolicy::ShowNone);
        assert_eq!(ids(&interpret_query("live inside", &cams(), &rules)), vec!["c1"]);
    }
}
