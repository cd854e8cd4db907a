//! Configuration Management
//!
//! Handles persistent user preferences for azurelite. Resources themselves are
//! never written to disk.

use crate::lifecycle::SimulatedDelays;
use crate::notification::DetailLevel;
use crate::profile::UserProfile;
use crate::resource::DEFAULT_PAGE_SIZE;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Simulated latency per operation, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayConfig {
    pub provision_ms: u64,
    pub start_ms: u64,
    pub stop_ms: u64,
    pub restart_ms: u64,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self::from(SimulatedDelays::default())
    }
}

impl From<SimulatedDelays> for DelayConfig {
    fn from(delays: SimulatedDelays) -> Self {
        Self {
            provision_ms: delays.provision.as_millis() as u64,
            start_ms: delays.start.as_millis() as u64,
            stop_ms: delays.stop.as_millis() as u64,
            restart_ms: delays.restart.as_millis() as u64,
        }
    }
}

impl DelayConfig {
    pub fn to_delays(self) -> SimulatedDelays {
        SimulatedDelays {
            provision: Duration::from_millis(self.provision_ms),
            start: Duration::from_millis(self.start_ms),
            stop: Duration::from_millis(self.stop_ms),
            restart: Duration::from_millis(self.restart_ms),
        }
    }
}

/// Toast and history settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub enabled: bool,
    /// minimal, detailed, or verbose
    pub detail_level: String,
    pub toast_duration_secs: u64,
    pub max_history: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            detail_level: DetailLevel::default().as_str().to_string(),
            toast_duration_secs: 5,
            max_history: 50,
        }
    }
}

impl NotificationConfig {
    pub fn detail_level(&self) -> DetailLevel {
        DetailLevel::from_str(&self.detail_level)
    }
}

/// User configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Rows per page in the resource list
    #[serde(default)]
    pub page_size: Option<usize>,
    /// Last visited top-level view
    #[serde(default)]
    pub last_view: Option<String>,
    #[serde(default)]
    pub delays: DelayConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    /// Profile details and preferences
    #[serde(default)]
    pub profile: UserProfile,
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("azurelite").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_json(&content),
            Err(_) => Self::default(),
        }
    }

    /// Parse config text; anything unreadable falls back to defaults
    pub fn from_json(content: &str) -> Self {
        serde_json::from_str(content).unwrap_or_else(|e| {
            tracing::warn!("Ignoring invalid config file: {}", e);
            Self::default()
        })
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };

        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        Ok(())
    }

    /// Get effective page size (CLI > config > default), never zero
    pub fn effective_page_size(&self, cli: Option<usize>) -> usize {
        cli.or(self.page_size)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config = Config::from_json(r#"{ "page_size": 8, "delays": { "restart_ms": 500 } }"#);
        assert_eq!(config.page_size, Some(8));
        assert_eq!(config.delays.restart_ms, 500);
        assert_eq!(config.delays.start_ms, 2000);
        assert!(config.notifications.enabled);
        assert_eq!(config.notifications.max_history, 50);
        assert_eq!(config.profile.full_name, "Demo User");
    }

    #[test]
    fn test_corrupt_config_is_default() {
        assert_eq!(Config::from_json("{ not json"), Config::default());
    }

    #[test]
    fn test_effective_page_size() {
        let mut config = Config::default();
        assert_eq!(config.effective_page_size(None), 5);
        config.page_size = Some(10);
        assert_eq!(config.effective_page_size(None), 10);
        assert_eq!(config.effective_page_size(Some(3)), 3);
        assert_eq!(config.effective_page_size(Some(0)), 1);
    }

    #[test]
    fn test_delay_config_round_trips_default_delays() {
        let delays = DelayConfig::default().to_delays();
        assert_eq!(delays, SimulatedDelays::default());
    }

    #[test]
    fn test_detail_level() {
        let mut config = NotificationConfig::default();
        assert_eq!(config.detail_level(), DetailLevel::Detailed);
        config.detail_level = "VERBOSE".to_string();
        assert_eq!(config.detail_level(), DetailLevel::Verbose);
    }

    #[test]
    fn test_profile_survives_round_trip() {
        let mut config = Config::default();
        config.profile.full_name = "Jordan Lee".to_string();
        config.profile.push_updates = false;

        let json = serde_json::to_string(&config).unwrap();
        let loaded = Config::from_json(&json);
        assert_eq!(loaded.profile.full_name, "Jordan Lee");
        assert!(!loaded.profile.push_updates);
        assert_eq!(loaded, config);
    }
}
