//! Small persistent key/value store for client-side state
//!
//! Plays the role of browser local storage: a handful of JSON documents kept
//! under string keys and written back to a single file after each change.

use crate::core::error::{DashboardError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// JSON document store keyed by string
#[derive(Debug, Default)]
pub struct LocalStore {
    path: Option<PathBuf>,
    entries: Map<String, Value>,
}

impl LocalStore {
    /// A store that lives only as long as the value
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open the store backed by `path`, starting empty if the file is missing
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(content) if content.trim().is_empty() => Map::new(),
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                DashboardError::Cache(format!("{} is not a JSON object: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(e) => {
                return Err(DashboardError::Cache(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "Opened local store");

        Ok(Self {
            path: Some(path),
            entries,
        })
    }

    /// Read and decode the document stored under `key`
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.entries
            .get(key)
            .map(|value| {
                serde_json::from_value(value.clone())
                    .map_err(|e| DashboardError::Cache(format!("Invalid value for '{}': {}", key, e)))
            })
            .transpose()
    }

    /// Store `value` under `key` and persist
    pub async fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)
            .map_err(|e| DashboardError::Cache(format!("Failed to encode '{}': {}", key, e)))?;
        self.entries.insert(key.to_string(), value);
        self.flush().await
    }

    /// Remove `key` and persist; returns whether it was present
    pub async fn remove(&mut self, key: &str) -> Result<bool> {
        let existed = self.entries.remove(key).is_some();
        if existed {
            self.flush().await?;
        }
        Ok(existed)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    async fn flush(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let content = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| DashboardError::Cache(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DashboardError::Cache(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        tokio::fs::write(path, content)
            .await
            .map_err(|e| DashboardError::Cache(format!("Failed to write {}: {}", path.display(), e)))
    }
}
