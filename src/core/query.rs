//! Filter criteria, sort specification and pagination utilities

use crate::core::field::FieldValue;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Sentinel used by every page dropdown for "no constraint"
pub const ALL: &str = "all";

/// Expected value of an equality filter
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FilterValue {
    /// No constraint on this field
    #[default]
    All,
    /// The field must equal this value exactly
    Is(FieldValue),
}

impl FilterValue {
    /// Build a constraint from any convertible value
    pub fn is(value: impl Into<FieldValue>) -> Self {
        FilterValue::Is(value.into())
    }

    /// Parse a dropdown value; the `"all"` sentinel means no constraint
    ///
    /// The text is kept as typed. It is interpreted against the kind of the
    /// entity's field when the filter is applied.
    pub fn parse(raw: &str) -> Self {
        if raw == ALL {
            FilterValue::All
        } else {
            FilterValue::Is(FieldValue::from(raw))
        }
    }

    /// Check whether this filter constrains anything
    pub fn is_all(&self) -> bool {
        matches!(self, FilterValue::All)
    }
}

/// The combined set of active filter constraints applied to a collection
///
/// All constraints are AND-ed by the engine. The default value constrains
/// nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    /// Case-insensitive substring matched against the searchable fields
    pub free_text: Option<String>,

    /// Field name -> expected value
    pub equality: BTreeMap<String, FilterValue>,

    /// Calendar date (local time) the entity timestamp must fall on
    pub date: Option<NaiveDate>,
}

impl FilterCriteria {
    /// Create empty criteria
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the free-text query
    pub fn with_text(mut self, query: impl Into<String>) -> Self {
        self.set_text(query);
        self
    }

    /// Builder: add an equality filter
    pub fn with_filter(mut self, field: impl Into<String>, value: FilterValue) -> Self {
        self.set_filter(field, value);
        self
    }

    /// Builder: set the date filter
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Replace the free-text query
    pub fn set_text(&mut self, query: impl Into<String>) {
        self.free_text = Some(query.into());
    }

    /// Replace (or clear with [`FilterValue::All`]) an equality filter
    pub fn set_filter(&mut self, field: impl Into<String>, value: FilterValue) {
        self.equality.insert(field.into(), value);
    }

    /// Replace or clear the date filter
    pub fn set_date(&mut self, date: Option<NaiveDate>) {
        self.date = date;
    }

    /// Lowercased free-text needle, or `None` when the query is blank
    pub fn text_needle(&self) -> Option<String> {
        self.free_text
            .as_deref()
            .filter(|q| !q.trim().is_empty())
            .map(str::to_lowercase)
    }

    /// Equality filters that actually constrain a field
    pub fn active_filters(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.equality.iter().filter_map(|(field, value)| match value {
            FilterValue::All => None,
            FilterValue::Is(v) => Some((field.as_str(), v)),
        })
    }

    /// True when no constraint is active
    pub fn is_unconstrained(&self) -> bool {
        self.text_needle().is_none() && self.date.is_none() && self.active_filters().next().is_none()
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// The opposite direction
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Apply this direction to an ascending comparison
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Column sort: a single key and a direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: key.into(),
            direction,
        }
    }

    pub fn ascending(key: impl Into<String>) -> Self {
        Self::new(key, SortDirection::Ascending)
    }

    pub fn descending(key: impl Into<String>) -> Self {
        Self::new(key, SortDirection::Descending)
    }

    /// The sort that results from clicking the `key` column header
    ///
    /// Same key flips the direction, a new key starts ascending.
    pub fn toggled(&self, key: &str) -> Self {
        if self.key == key {
            Self::new(key, self.direction.flip())
        } else {
            Self::ascending(key)
        }
    }

    /// Parse a sort expression
    ///
    /// # Format
    /// - `field:asc` or `field` (ascending)
    /// - `field:desc` (descending)
    ///
    /// Anything else (empty field, unknown direction) yields `None`.
    pub fn parse(expr: &str) -> Option<Self> {
        let (key, direction) = match expr.split_once(':') {
            Some((key, "asc")) => (key, SortDirection::Ascending),
            Some((key, "desc")) => (key, SortDirection::Descending),
            Some(_) => return None,
            None => (expr, SortDirection::Ascending),
        };

        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        Some(Self::new(key, direction))
    }
}

/// Query-string shaped view parameters
///
/// # Example
/// ```text
/// ?q=entrance&filter=severity=critical,status=new&date=2023-04-15&sort=timestamp:desc&page=1&limit=20
/// ```
///
/// Malformed pieces are dropped rather than rejected: this feeds a search box
/// and a few dropdowns, not an API contract.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewParams {
    /// Page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Free-text query
    pub q: Option<String>,

    /// Comma separated `field=value` pairs; `value` may be `all`
    pub filter: Option<String>,

    /// Calendar date as `YYYY-MM-DD`
    pub date: Option<String>,

    /// Sort expression, see [`SortSpec::parse`]
    pub sort: Option<String>,
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            q: None,
            filter: None,
            date: None,
            sort: None,
        }
    }
}

impl ViewParams {
    /// Get page number, ensuring minimum of 1
    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    /// Get limit, clamped to 1..=100
    pub fn limit(&self) -> usize {
        self.limit.clamp(1, 100)
    }

    /// Build filter criteria from these parameters
    pub fn criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::new();

        if let Some(q) = &self.q {
            criteria.set_text(q.clone());
        }

        if let Some(filter) = &self.filter {
            for pair in filter.split(',') {
                let Some((field, value)) = pair.split_once('=') else {
                    continue;
                };
                let field = field.trim();
                if field.is_empty() {
                    continue;
                }
                criteria.set_filter(field, FilterValue::parse(value.trim()));
            }
        }

        criteria.date = self
            .date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok());

        criteria
    }

    /// Parse the sort expression, if any
    pub fn sort_spec(&self) -> Option<SortSpec> {
        self.sort.as_deref().and_then(SortSpec::parse)
    }
}

/// One page of a derived view
#[derive(Debug, Serialize)]
pub struct Page<T> {
    /// The paginated data
    pub data: Vec<T>,

    /// Pagination metadata
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Total number of items (after filters)
    pub total: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Create pagination metadata from calculation
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let total_pages = if total == 0 { 0 } else { total.div_ceil(limit) };
        let start = (page - 1) * limit;

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: start + limit < total,
            has_prev: page > 1,
        }
    }
}

/// Slice a derived view into a page
///
/// Pages are only stable if the view order is; the engine sorts stably on a
/// single key, so equal keys keep source order.
pub fn paginate<T: Clone>(view: &[T], page: usize, limit: usize) -> Page<T> {
    let pagination = PaginationMeta::new(page, limit, view.len());
    let start = (pagination.page - 1) * pagination.limit;
    let data = view
        .iter()
        .skip(start)
        .take(pagination.limit)
        .cloned()
        .collect();

    Page { data, pagination }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_params_defaults() {
        let params = ViewParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 20);
        assert!(params.criteria().is_unconstrained());
        assert!(params.sort_spec().is_none());
    }

    #[test]
    fn test_view_params_criteria() {
        let params = ViewParams {
            q: Some("Entrance".to_string()),
            filter: Some("severity=critical, status=all,broken,=x".to_string()),
            date: Some("2023-04-15".to_string()),
            sort: Some("timestamp:desc".to_string()),
            ..ViewParams::default()
        };

        let criteria = params.criteria();
        assert_eq!(criteria.text_needle().as_deref(), Some("entrance"));
        assert_eq!(
            criteria.equality.get("severity"),
            Some(&FilterValue::is("critical"))
        );
        assert_eq!(criteria.equality.get("status"), Some(&FilterValue::All));
        assert_eq!(criteria.equality.len(), 2);
        assert_eq!(criteria.date, NaiveDate::from_ymd_opt(2023, 4, 15));
        assert_eq!(params.sort_spec(), Some(SortSpec::descending("timestamp")));
    }

    #[test]
    fn test_view_params_bad_date_is_ignored() {
        let params = ViewParams {
            date: Some("15/04/2023".to_string()),
            ..ViewParams::default()
        };
        assert!(params.criteria().date.is_none());
    }

    #[test]
    fn test_blank_text_is_no_constraint() {
        let criteria = FilterCriteria::new().with_text("   ");
        assert!(criteria.text_needle().is_none());
        assert!(criteria.is_unconstrained());
    }

    #[test]
    fn test_sort_toggle() {
        let spec = SortSpec::ascending("title");
        let flipped = spec.toggled("title");
        assert_eq!(flipped.direction, SortDirection::Descending);
        assert_eq!(flipped.toggled("title"), spec);

        let other = flipped.toggled("severity");
        assert_eq!(other, SortSpec::ascending("severity"));
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!(SortSpec::parse("title"), Some(SortSpec::ascending("title")));
        assert_eq!(
            SortSpec::parse("title:asc"),
            Some(SortSpec::ascending("title"))
        );
        assert_eq!(SortSpec::parse("title:sideways"), None);
        assert_eq!(SortSpec::parse(":desc"), None);
        assert_eq!(SortSpec::parse(""), None);
    }

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(1, 20, 145);
        assert_eq!(meta.total, 145);
        assert_eq!(meta.total_pages, 8);
        assert!(!meta.has_prev);
        assert!(meta.has_next);
    }

    #[test]
    fn test_paginate_last_page() {
        let items: Vec<u32> = (1..=7).collect();
        let page = paginate(&items, 3, 3);
        assert_eq!(page.data, vec![7]);
        assert!(page.pagination.has_prev);
        assert!(!page.pagination.has_next);

        let empty = paginate(&items, 9, 3);
        assert!(empty.data.is_empty());
    }
}
