//! Entity types shown by the dashboard pages

pub mod alert;
pub mod audit_log;
pub mod camera;
pub mod chat_session;
pub mod macros;
pub mod user;

pub use alert::{Alert, AlertSeverity, AlertStatus, SeverityCount, severity_summary};
pub use audit_log::{AuditCategory, AuditLogEntry, AuditStatus};
pub use camera::{Camera, CameraTabs, CameraType};
pub use chat_session::{SessionSummary, relative_day_label};
pub use user::{User, UserRole, UserStatus};
