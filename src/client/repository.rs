//! Repositories backed by the REST client

use crate::client::api::ApiClient;
use crate::core::error::Result;
use crate::core::repository::EntityRepository;
use crate::entities::Camera;
use async_trait::async_trait;

/// Camera list served by `GET /cam/list/cameras`
#[derive(Debug, Clone)]
pub struct CameraApiRepository {
    client: ApiClient,
}

impl CameraApiRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

#[async_trait]
impl EntityRepository<Camera> for CameraApiRepository {
    async fn list(&self) -> Result<Vec<Camera>> {
        let cameras = self.client.list_cameras().await?;
        tracing::debug!(count = cameras.len(), "Fetched cameras");
        Ok(cameras)
    }
}
