//! Configuration loading and management

use crate::core::interpreter::{RuleTable, UnmatchedPolicy};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding [`ApiConfig::base_url`]
pub const API_BASE_URL_ENV: &str = "VIGIL_API_BASE_URL";

/// Backend the dashboard talks to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Root URL of the backend (e.g., "http://localhost:5000")
    pub base_url: String,

    /// Timeout in seconds for a whole JSON call; for camera streams, the
    /// longest silence allowed between two chunks
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Keyword search rules per page
///
/// A missing table falls back to the built-in one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cameras: Option<RuleTable>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub alerts: Option<RuleTable>,

    /// Overrides the unmatched policy of every table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unmatched: Option<UnmatchedPolicy>,
}

impl SearchConfig {
    pub fn camera_rules(&self) -> RuleTable {
        self.apply_policy(self.cameras.clone().unwrap_or_else(RuleTable::cameras))
    }

    pub fn alert_rules(&self) -> RuleTable {
        self.apply_policy(self.alerts.clone().unwrap_or_else(RuleTable::alerts))
    }

    fn apply_policy(&self, table: RuleTable) -> RuleTable {
        match self.unmatched {
            Some(policy) => table.with_unmatched(policy),
            None => table,
        }
    }
}

/// Chat page settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// File backing the local session cache; in memory when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_path: Option<PathBuf>,

    /// Answer with canned replies instead of calling the backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offline: Option<bool>,
}

impl ChatConfig {
    /// Offline mode, off unless a config turned it on
    pub fn is_offline(&self) -> bool {
        self.offline.unwrap_or(false)
    }
}

/// Complete dashboard configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub api: ApiConfig,
    pub search: SearchConfig,
    pub chat: ChatConfig,
}

impl DashboardConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Combine several configurations, later ones taking precedence
    ///
    /// API settings are taken from the last config that changes them from the
    /// defaults; rule tables, cache paths and offline mode from the last config
    /// that sets them.
    pub fn merge(configs: Vec<DashboardConfig>) -> Self {
        let default_api = ApiConfig::default();

        configs
            .into_iter()
            .fold(Self::default(), |mut merged, config| {
                if config.api != default_api {
                    merged.api = config.api;
                }
                if config.search.cameras.is_some() {
                    merged.search.cameras = config.search.cameras;
                }
                if config.search.alerts.is_some() {
                    merged.search.alerts = config.search.alerts;
                }
                if config.search.unmatched.is_some() {
                    merged.search.unmatched = config.search.unmatched;
                }
                if config.chat.cache_path.is_some() {
                    merged.chat.cache_path = config.chat.cache_path;
                }
                if config.chat.offline.is_some() {
                    merged.chat.offline = config.chat.offline;
                }
                merged
            })
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_BASE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            tracing::debug!(base_url = %url, "Backend URL overridden from environment");
            self.api.base_url = url.trim().to_string();
        }
        self
    }

    /// Check the values serde cannot
    pub fn validate(&self) -> Result<()> {
        let url = self.api.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            anyhow::bail!("api.base_url must be an http(s) URL, got '{}'", url);
        }
        if self.api.timeout_secs == 0 {
            anyhow::bail!("api.timeout_secs must be greater than zero");
        }
        for (page, table) in [("cameras", &self.search.cameras), ("alerts", &self.search.alerts)] {
            if let Some(table) = table
                && let Some(group) = table.groups.iter().find(|g| g.triggers.is_empty())
            {
                anyhow::bail!("search.{}: group '{}' has no triggers", page, group.name);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();

        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert_eq!(config.search.camera_rules(), RuleTable::cameras());
        assert!(config.chat.cache_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_serialization() {
        let config = DashboardConfig {
            search: SearchConfig {
                unmatched: Some(UnmatchedPolicy::ShowNone),
                ..SearchConfig::default()
            },
            ..DashboardConfig::default()
        };
        let yaml = serde_yaml::to_string(&config).unwrap();

        let parsed = DashboardConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
        assert_eq!(parsed.search.alert_rules().unmatched, UnmatchedPolicy::ShowNone);
    }

    #[test]
    fn test_partial_yaml() {
        let config = DashboardConfig::from_yaml_str(
            r#"
api:
  base_url: https://vigil.example.com
chat:
  offline: true
"#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://vigil.example.com");
        assert_eq!(config.api.timeout_secs, 30);
        assert!(config.chat.is_offline());
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let err = DashboardConfig::from_yaml_str("api:\n  base_url: localhost:5000\n").unwrap_err();
        assert!(err.to_string().contains("http(s) URL"));
    }

    #[test]
    fn test_merge_later_wins() {
        let first = DashboardConfig::from_yaml_str(
            "api:\n  base_url: http://first:5000\nchat:\n  cache_path: /tmp/a.json\n",
        )
        .unwrap();
        let second = DashboardConfig::from_yaml_str("search:\n  unmatched: show_none\n").unwrap();
        let third = DashboardConfig::from_yaml_str("api:\n  base_url: http://third:5000\n").unwrap();

        let merged = DashboardConfig::merge(vec![first, second, third]);
        assert_eq!(merged.api.base_url, "http://third:5000");
        assert_eq!(merged.search.unmatched, Some(UnmatchedPolicy::ShowNone));
        assert_eq!(merged.chat.cache_path, Some(PathBuf::from("/tmp/a.json")));
    }

    #[test]
    fn test_merge_can_turn_offline_back_off() {
        let base = DashboardConfig::from_yaml_str("chat:
  offline: true
").unwrap();
        let silent = DashboardConfig::from_yaml_str("search:
  unmatched: show_all
").unwrap();
        let local = DashboardConfig::from_yaml_str("chat:
  offline: false
").unwrap();

        let merged = DashboardConfig::merge(vec![base.clone(), silent.clone()]);
        assert!(merged.chat.is_offline());

        let merged = DashboardConfig::merge(vec![base, silent, local]);
        assert!(!merged.chat.is_offline());
        assert!(!DashboardConfig::default().chat.is_offline());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [(API_BASE_URL_ENV, " http://10.0.0.5:5000 ")].into();
        let config = DashboardConfig::default()
            .with_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "http://10.0.0.5:5000");
    }
}
