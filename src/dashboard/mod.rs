//! Page-level state for the dashboard screens

pub mod analytics;
pub mod clock;
pub mod feed;
pub mod scope;
pub mod view_state;

pub use analytics::{AnalyticsSource, CardState, DeltaCard, load_cards};
pub use clock::PreviewClock;
pub use feed::{CameraControl, CameraFeed, FeedStatus};
pub use scope::PageScope;
pub use view_state::ViewState;
