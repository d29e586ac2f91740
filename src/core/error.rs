//! Typed error handling for the dashboard core
//!
//! Nothing in the dashboard is fatal. Errors are caught where the call is
//! made, logged, and turned into inline state (an offline badge, an error line
//! under a feed, a failed chat bubble). The types here carry enough context to
//! do that and to decide what text to show.
//!
//! # Error Categories
//!
//! - [`DashboardError::Network`]: the request never produced a response
//! - [`DashboardError::Status`]: the backend answered with a non-2xx status
//! - [`DashboardError::Decode`]: the response body did not have the expected shape
//! - [`DashboardError::Stream`]: a camera stream broke mid-flight
//! - [`ValidationError`]: user input rejected before anything was sent
//!
//! # Example
//!
//! ```rust,ignore
//! match client.activate_camera("cam-1").await {
//!     Ok(()) => feed.mark_live(),
//!     Err(e) => feed.fail(e.user_message()),
//! }
//! ```

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T, E = DashboardError> = std::result::Result<T, E>;

/// The main error type for the dashboard core
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The request could not be completed (connection refused, timeout, ...)
    #[error("Network error calling {endpoint}: {message}")]
    Network { endpoint: String, message: String },

    /// The backend answered with a non-success status
    #[error("{endpoint} returned HTTP {status}: {message}")]
    Status {
        endpoint: String,
        status: u16,
        message: String,
    },

    /// The response body could not be decoded
    #[error("Invalid response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    /// User input rejected before any request was made
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A camera stream failed after it was opened
    #[error("Stream error for camera {camera_id}: {message}")]
    Stream { camera_id: String, message: String },

    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {0}")]
    Config(String),

    /// The local key/value cache could not be read or written
    #[error("Local cache error: {0}")]
    Cache(String),

    /// The owning page scope was closed before the operation finished
    #[error("Operation cancelled")]
    Cancelled,

    /// Internal errors (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DashboardError {
    /// Get the error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            DashboardError::Network { .. } => "NETWORK_ERROR",
            DashboardError::Status { status, .. } if *status == 404 => "NOT_FOUND",
            DashboardError::Status { .. } => "HTTP_ERROR",
            DashboardError::Decode { .. } => "DECODE_ERROR",
            DashboardError::Validation(e) => e.error_code(),
            DashboardError::Stream { .. } => "STREAM_ERROR",
            DashboardError::Config(_) => "CONFIG_ERROR",
            DashboardError::Cache(_) => "CACHE_ERROR",
            DashboardError::Cancelled => "CANCELLED",
            DashboardError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Text to show inline in place of the unavailable content
    ///
    /// Backend `{ "error": ... }` messages are shown as-is; transport details
    /// are replaced with a short generic sentence.
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::Network { .. } => {
                "Unable to reach the server. Check your connection and retry.".to_string()
            }
            DashboardError::Status { message, .. } => message.clone(),
            DashboardError::Decode { .. } => "The server sent an unexpected response.".to_string(),
            DashboardError::Validation(e) => e.to_string(),
            DashboardError::Stream { .. } => {
                "Failed to load stream. Camera or video may be unavailable.".to_string()
            }
            DashboardError::Cancelled => "Cancelled.".to_string(),
            DashboardError::Config(_) | DashboardError::Cache(_) | DashboardError::Internal(_) => {
                "Something went wrong.".to_string()
            }
        }
    }
}

/// Errors related to input validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was blank
    #[error("{field} is required")]
    Required { field: String },

    /// A field had an unusable value
    #[error("Invalid {field}: {message}")]
    Invalid { field: String, message: String },
}

impl ValidationError {
    pub fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::Required { .. } => "FIELD_REQUIRED",
            ValidationError::Invalid { .. } => "FIELD_INVALID",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_shows_backend_message() {
        let err = DashboardError::Status {
            endpoint: "/cam/activate/c1".to_string(),
            status: 409,
            message: "Camera already active".to_string(),
        };
        assert_eq!(err.user_message(), "Camera already active");
        assert_eq!(err.error_code(), "HTTP_ERROR");
        assert_eq!(
            err.to_string(),
            "/cam/activate/c1 returned HTTP 409: Camera already active"
        );
    }

    #[test]
    fn test_not_found_code() {
        let err = DashboardError::Status {
            endpoint: "/chat/sessions/x/messages".to_string(),
            status: 404,
            message: "Session not found".to_string(),
        };
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_network_error_hides_transport_detail() {
        let err = DashboardError::Network {
            endpoint: "/cam/list/cameras".to_string(),
            message: "tcp connect error: Connection refused (os error 111)".to_string(),
        };
        assert!(!err.user_message().contains("os error"));
        assert_eq!(err.error_code(), "NETWORK_ERROR");
    }

    #[test]
    fn test_validation_conversion() {
        let err: DashboardError = ValidationError::required("content").into();
        assert_eq!(err.error_code(), "FIELD_REQUIRED");
        assert_eq!(err.to_string(), "content is required");
    }
}
