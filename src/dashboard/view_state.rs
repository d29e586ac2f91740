//! Page view state: a local copy of a collection plus the filters shown on
//! the page, with the derived view kept up to date
//!
//! The page never owns the data. It holds whatever the injected repository
//! returned on the last [`ViewState::refresh`], and every filter change
//! recomputes the derived view from that copy.

use crate::core::entity::Entity;
use crate::core::error::Result;
use crate::core::interpreter::RuleTable;
use crate::core::query::{FilterCriteria, FilterValue, Page, SortSpec, ViewParams, paginate};
use crate::core::repository::EntityRepository;
use crate::core::view::derive_view;
use chrono::NaiveDate;
use std::sync::Arc;

pub struct ViewState<T: Entity> {
    repository: Arc<dyn EntityRepository<T>>,
    source: Vec<T>,
    criteria: FilterCriteria,
    sort: Option<SortSpec>,
    rules: Option<RuleTable>,
    keyword_query: String,
    matched_groups: Vec<String>,
    view: Vec<T>,
    last_error: Option<String>,
}

impl<T: Entity> ViewState<T> {
    /// Fresh page state: no text, every filter "all", the entity's default sort
    pub fn new(repository: Arc<dyn EntityRepository<T>>) -> Self {
        Self {
            repository,
            source: Vec::new(),
            criteria: FilterCriteria::default(),
            sort: T::default_sort(),
            rules: None,
            keyword_query: String::new(),
            matched_groups: Vec::new(),
            view: Vec::new(),
            last_error: None,
        }
    }

    /// Builder: enable keyword queries with `rules`
    pub fn with_rules(mut self, rules: RuleTable) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Reload the local copy from the repository
    ///
    /// On failure the previous copy stays in place and the error text is kept
    /// for display.
    pub async fn refresh(&mut self) -> Result<()> {
        match self.repository.list().await {
            Ok(items) => {
                tracing::debug!(resource = T::resource_name(), count = items.len(), "Refreshed view source");
                self.last_error = None;
                self.replace_source(items);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(resource = T::resource_name(), error = %e, "Failed to refresh view source");
                self.last_error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Replace the local copy without going through the repository
    pub fn replace_source(&mut self, items: Vec<T>) {
        self.source = items;
        self.recompute();
    }

    /// Apply an in-place change to one entity of the local copy
    pub fn update_entity<F>(&mut self, id: &str, f: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        let Some(entity) = self.source.iter_mut().find(|e| e.id() == id) else {
            return false;
        };
        f(entity);
        self.recompute();
        true
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.criteria.set_text(text);
        self.recompute();
    }

    pub fn set_filter(&mut self, field: impl Into<String>, value: FilterValue) {
        self.criteria.set_filter(field, value);
        self.recompute();
    }

    pub fn set_date(&mut self, date: Option<NaiveDate>) {
        self.criteria.set_date(date);
        self.recompute();
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
        self.recompute();
    }

    /// Column-header click: same key flips direction, a new key sorts ascending
    pub fn toggle_sort(&mut self, key: &str) {
        self.sort = Some(match &self.sort {
            Some(current) => current.toggled(key),
            None => SortSpec::ascending(key),
        });
        self.recompute();
    }

    /// Set the keyword query; ignored unless rules were configured
    ///
    /// A blank query switches back to the plain filters.
    pub fn set_keyword_query(&mut self, query: impl Into<String>) {
        self.keyword_query = query.into();
        self.recompute();
    }

    /// Apply query-string parameters (search, filters, date, sort)
    pub fn apply_params(&mut self, params: &ViewParams) {
        self.criteria = params.criteria();
        if let Some(sort) = params.sort_spec() {
            self.sort = Some(sort);
        }
        self.recompute();
    }

    /// Back to the page defaults, keeping the loaded data
    pub fn reset(&mut self) {
        self.criteria = FilterCriteria::default();
        self.sort = T::default_sort();
        self.keyword_query.clear();
        self.recompute();
    }

    pub fn view(&self) -> &[T] {
        &self.view
    }

    pub fn page(&self, page: usize, limit: usize) -> Page<T> {
        paginate(&self.view, page, limit)
    }

    pub fn source(&self) -> &[T] {
        &self.source
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn keyword_query(&self) -> &str {
        &self.keyword_query
    }

    /// Keyword groups recognised in the current query
    pub fn matched_groups(&self) -> &[String] {
        &self.matched_groups
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn recompute(&mut self) {
        let interpreted = match &self.rules {
            Some(rules) if !self.keyword_query.trim().is_empty() => {
                Some(rules.interpret(&self.keyword_query, &self.source))
            }
            _ => None,
        };

        self.view = match interpreted {
            Some(interpretation) => {
                self.matched_groups = interpretation.matched_groups;
                derive_view(&interpretation.entities, &self.criteria, self.sort.as_ref())
            }
            None => {
                self.matched_groups.clear();
                derive_view(&self.source, &self.criteria, self.sort.as_ref())
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::DashboardError;
    use crate::core::query::SortDirection;
    use crate::entities::{Alert, Camera};
    use crate::storage::{InMemoryRepository, fixtures};
    use async_trait::async_trait;

    async fn alert_view() -> ViewState<Alert> {
        let repo = Arc::new(InMemoryRepository::with_items(fixtures::alerts()));
        let mut state = ViewState::<Alert>::new(repo);
        state.refresh().await.unwrap();
        state
    }

    fn ids<T: Entity>(items: &[T]) -> Vec<String> {
        items.iter().map(|e| e.id().to_string()).collect()
    }

    #[tokio::test]
    async fn test_defaults() {
        let state = alert_view().await;

        assert_eq!(state.view().len(), 10);
        assert_eq!(state.view()[0].id, "a1");
        assert_eq!(state.sort(), Some(&SortSpec::descending("timestamp")));
        assert!(state.criteria().is_unconstrained());
    }

    #[tokio::test]
    async fn test_filters_compose() {
        let mut state = alert_view().await;
        state.set_filter("severity", FilterValue::parse("critical"));
        assert_eq!(ids(state.view()), vec!["a1", "a6"]);

        state.set_search("server");
        assert_eq!(ids(state.view()), vec!["a1"]);

        state.set_filter("severity", FilterValue::parse("all"));
        state.set_search("");
        assert_eq!(state.view().len(), 10);
        assert_eq!(state.source().len(), 10);
    }

    #[tokio::test]
    async fn test_toggle_sort() {
        let mut state = alert_view().await;

        state.toggle_sort("timestamp");
        assert_eq!(state.sort().map(|s| s.direction), Some(SortDirection::Ascending));
        assert_eq!(state.view()[0].id, "a10");

        state.toggle_sort("title");
        assert_eq!(state.sort(), Some(&SortSpec::ascending("title")));
        assert_eq!(state.view()[0].title, "After Hours Access");
    }

    #[tokio::test]
    async fn test_keyword_query_with_rules() {
        let repo = Arc::new(InMemoryRepository::with_items(fixtures::cameras()));
        let mut state = ViewState::<Camera>::new(repo).with_rules(RuleTable::cameras());
        state.refresh().await.unwrap();

        state.set_keyword_query("outdoor cameras with alert");
        assert_eq!(ids(state.view()), vec!["cam-2"]);
        assert_eq!(state.matched_groups(), &["entrance", "outdoor", "alerts"]);

        state.set_keyword_query("   ");
        assert_eq!(state.view().len(), 10);
        assert!(state.matched_groups().is_empty());
    }

    #[tokio::test]
    async fn test_update_entity_recomputes() {
        let repo = Arc::new(InMemoryRepository::with_items(fixtures::cameras()));
        let mut state = ViewState::<Camera>::new(repo);
        state.refresh().await.unwrap();
        state.set_filter("active", FilterValue::is(false));
        assert_eq!(ids(state.view()), vec!["cam-4", "cam-9"]);

        assert!(state.update_entity("cam-4", |c| c.active = true));
        assert_eq!(ids(state.view()), vec!["cam-9"]);
        assert!(!state.update_entity("missing", |c| c.active = true));
    }

    #[tokio::test]
    async fn test_apply_params_and_reset() {
        let mut state = alert_view().await;
        let params = ViewParams {
            filter: Some("status=new".to_string()),
            sort: Some("timestamp:asc".to_string()),
            ..ViewParams::default()
        };

        state.apply_params(&params);
        assert_eq!(ids(state.view()), vec!["a2", "a1"]);

        state.reset();
        assert_eq!(state.view().len(), 10);
        assert_eq!(state.view()[0].id, "a1");
    }

    struct Down;

    #[async_trait]
    impl EntityRepository<Alert> for Down {
        async fn list(&self) -> Result<Vec<Alert>> {
            Err(DashboardError::Network {
                endpoint: "/alerts".to_string(),
                message: "connection refused".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_copy() {
        let mut state = ViewState::<Alert>::new(Arc::new(Down));
        state.replace_source(fixtures::alerts());

        assert!(state.refresh().await.is_err());
        assert_eq!(state.view().len(), 10);
        assert!(state.last_error().is_some());
    }
}
