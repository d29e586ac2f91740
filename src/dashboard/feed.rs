//! Camera feed state for the preview tiles and the video modal

use crate::client::ApiClient;
use crate::core::error::{DashboardError, Result};
use crate::entities::Camera;
use async_trait::async_trait;

/// Overlay shown on a tile whose camera is not streaming
pub const OFFLINE_TEXT: &str = "Camera is offline";

/// Shown when activation fails without a backend message
pub const ACTIVATION_FAILED_TEXT: &str = "Failed to activate camera";

/// Camera operations a feed needs from the backend
#[async_trait]
pub trait CameraControl: Send + Sync {
    async fn activate_camera(&self, camera_id: &str) -> Result<()>;
}

#[async_trait]
impl CameraControl for ApiClient {
    async fn activate_camera(&self, camera_id: &str) -> Result<()> {
        ApiClient::activate_camera(self, camera_id).await
    }
}

/// What a feed tile is showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedStatus {
    /// Inactive camera; the tile offers an Activate action
    Offline,
    /// Activation request in flight
    Activating,
    Live,
    /// Activation or streaming failed; `reason` replaces the video
    Failed { reason: String },
}

#[derive(Debug, Clone)]
pub struct CameraFeed {
    camera: Camera,
    status: FeedStatus,
}

impl CameraFeed {
    pub fn new(camera: Camera) -> Self {
        let status = if camera.active {
            FeedStatus::Live
        } else {
            FeedStatus::Offline
        };
        Self { camera, status }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn status(&self) -> &FeedStatus {
        &self.status
    }

    /// Text drawn over the tile instead of video, if any
    pub fn overlay_text(&self) -> Option<&str> {
        match &self.status {
            FeedStatus::Offline => Some(OFFLINE_TEXT),
            FeedStatus::Failed { reason } => Some(reason.as_str()),
            FeedStatus::Activating | FeedStatus::Live => None,
        }
    }

    /// True when the Activate action should be offered
    pub fn can_activate(&self) -> bool {
        matches!(self.status, FeedStatus::Offline | FeedStatus::Failed { .. }) && !self.camera.active
    }

    /// Ask the backend to start the camera
    ///
    /// Success marks the camera active and the feed live. Failure shows the
    /// backend's `{error}` text, or a generic sentence when there is none.
    pub async fn activate(&mut self, control: &dyn CameraControl) -> Result<()> {
        if self.status == FeedStatus::Live {
            return Ok(());
        }

        self.status = FeedStatus::Activating;
        match control.activate_camera(&self.camera.id).await {
            Ok(()) => {
                tracing::info!(camera_id = %self.camera.id, "Camera activated");
                self.camera.active = true;
                self.status = FeedStatus::Live;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(camera_id = %self.camera.id, error = %e, "Camera activation failed");
                let reason = match &e {
                    DashboardError::Status { message, .. } if !message.is_empty() => message.clone(),
                    _ => ACTIVATION_FAILED_TEXT.to_string(),
                };
                self.status = FeedStatus::Failed { reason };
                Err(e)
            }
        }
    }

    /// The stream broke while playing
    pub fn stream_failed(&mut self, error: &DashboardError) {
        tracing::warn!(camera_id = %self.camera.id, error = %error, "Camera stream failed");
        let reason = match error {
            DashboardError::Stream { .. } => error.user_message(),
            _ => DashboardError::Stream {
                camera_id: self.camera.id.clone(),
                message: error.to_string(),
            }
            .user_message(),
        };
        self.status = FeedStatus::Failed { reason };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::fixtures;

    struct Reply(Option<DashboardError>);

    #[async_trait]
    impl CameraControl for std::sync::Mutex<Reply> {
        async fn activate_camera(&self, _camera_id: &str) -> Result<()> {
            let reply = self.lock().unwrap().0.take();
            match reply {
                Some(e) => Err(e),
                None => Ok(()),
            }
        }
    }

    fn offline_camera() -> Camera {
        fixtures::cameras()
            .into_iter()
            .find(|c| !c.active)
            .unwrap()
    }

    #[tokio::test]
    async fn test_activation_success() {
        let mut feed = CameraFeed::new(offline_camera());
        assert_eq!(feed.overlay_text(), Some(OFFLINE_TEXT));
        assert!(feed.can_activate());

        let control = std::sync::Mutex::new(Reply(None));
        feed.activate(&control).await.unwrap();

        assert_eq!(feed.status(), &FeedStatus::Live);
        assert!(feed.camera().active);
        assert!(feed.overlay_text().is_none());
    }

    #[tokio::test]
    async fn test_activation_failure_shows_backend_error() {
        let mut feed = CameraFeed::new(offline_camera());
        let control = std::sync::Mutex::new(Reply(Some(DashboardError::Status {
            endpoint: "/cam/activate/cam-4".to_string(),
            status: 404,
            message: "Video file missing or path invalid".to_string(),
        })));

        assert!(feed.activate(&control).await.is_err());
        assert_eq!(feed.overlay_text(), Some("Video file missing or path invalid"));
        assert!(!feed.camera().active);
        assert!(feed.can_activate());
    }

    #[tokio::test]
    async fn test_activation_network_failure_is_generic() {
        let mut feed = CameraFeed::new(offline_camera());
        let control = std::sync::Mutex::new(Reply(Some(DashboardError::Network {
            endpoint: "/cam/activate/cam-4".to_string(),
            message: "connection refused".to_string(),
        })));

        assert!(feed.activate(&control).await.is_err());
        assert_eq!(feed.overlay_text(), Some(ACTIVATION_FAILED_TEXT));
    }

    #[test]
    fn test_stream_failure_text() {
        let mut feed = CameraFeed::new(fixtures::cameras().remove(0));
        feed.stream_failed(&DashboardError::Decode {
            endpoint: "/cam/stream/cam-1".to_string(),
            message: "bad part".to_string(),
        });
        assert_eq!(
            feed.overlay_text(),
            Some("Failed to load stream. Camera or video may be unavailable.")
        );
    }
}
