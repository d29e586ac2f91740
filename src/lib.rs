//! # Vigil Dash
//!
//! View core for a video-surveillance dashboard.
//!
//! ## Features
//!
//! - **Generic filter/sort engine**: free-text search, equality filters, date
//!   filter and column sort over any collection that exposes its fields
//! - **Keyword query interpreter**: natural-language camera and alert queries
//!   driven by a data-defined rule table
//! - **Typed backend client**: cameras, MJPEG streams, analytics counters and
//!   chat sessions over the REST API
//! - **Chat state**: optimistic message sending, retry of failed messages and a
//!   persisted session sidebar
//! - **Page lifetimes**: background work is owned by a page scope and aborted
//!   when the page goes away
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vigil::prelude::*;
//!
//! let config = DashboardConfig::from_yaml_file("dashboard.yaml")?.with_env_overrides();
//! let client = ApiClient::new(&config.api)?;
//!
//! let mut cameras = ViewState::<Camera>::new(Arc::new(CameraApiRepository::new(client)))
//!     .with_rules(config.search.camera_rules());
//! cameras.refresh().await?;
//! cameras.set_keyword_query("outdoor cameras with alert");
//!
//! for camera in cameras.view() {
//!     println!("{} ({})", camera.name, camera.location);
//! }
//! ```

pub mod chat;
pub mod client;
pub mod config;
pub mod core;
pub mod dashboard;
pub mod entities;
pub mod storage;
pub mod telemetry;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Engine ===
    pub use crate::core::{
        DashboardError, Entity, EntityRepository, FieldValue, FilterCriteria, FilterValue, Page,
        Result, RuleTable, SortDirection, SortSpec, UnmatchedPolicy, ValidationError, ViewParams,
        derive_view, interpret_query, paginate,
    };

    // === Macros ===
    pub use crate::{impl_field_enum, impl_view_entity};

    // === Entities ===
    pub use crate::entities::{
        Alert, AlertSeverity, AlertStatus, AuditLogEntry, Camera, CameraType, SessionSummary, User,
    };

    // === Backend ===
    pub use crate::client::{ApiClient, CameraApiRepository, DeltaMetric, TrendRange};

    // === Chat ===
    pub use crate::chat::{
        CannedChatService, ChatService, Conversation, Message, MessageState, Role, SessionList,
    };

    // === Pages ===
    pub use crate::dashboard::{
        CameraFeed, DeltaCard, FeedStatus, PageScope, PreviewClock, ViewState, load_cards,
    };

    // === Storage and config ===
    pub use crate::config::DashboardConfig;
    pub use crate::storage::{InMemoryRepository, LocalStore};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use std::sync::Arc;
}
