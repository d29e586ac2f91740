//! Core module containing the entity model, the filter/sort engine and the
//! keyword query interpreter

pub mod entity;
pub mod error;
pub mod field;
pub mod interpreter;
pub mod query;
pub mod repository;
pub mod view;

pub use entity::Entity;
pub use error::{DashboardError, Result, ValidationError};
pub use field::{FieldValue, locale_cmp};
pub use interpreter::{
    Condition, Interpretation, KeywordGroup, RuleTable, UnmatchedPolicy, interpret_query,
};
pub use query::{
    ALL, FilterCriteria, FilterValue, Page, PaginationMeta, SortDirection, SortSpec, ViewParams,
    paginate,
};
pub use repository::EntityRepository;
pub use view::derive_view;
