//! Application configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stillness_audio::AudioSettings;
use stillness_core::{OrchestratorConfig, RingSettings, SessionSettings};

/// Application-wide configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the config format
    #[serde(default = "default_version")]
    pub version: u32,
    /// Ring physics and geometry
    #[serde(default)]
    pub ring: RingSettings,
    /// Session timing
    #[serde(default)]
    pub session: SessionSettings,
    /// Sound files and volume
    #[serde(default)]
    pub audio: AudioSettings,
    /// Catalog JSON replacing the built-in modes, ambiances and durations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,
}

fn default_version() -> u32 {
    1
}

impl AppConfig {
    /// Load configuration from disk, or defaults when no file exists yet
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            log::info!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from_path(&config_path)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to_path(&config_path)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(super::config_dir()?.join("config.json"))
    }

    /// Load configuration from a specific file path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a specific file path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("writing config {}", path.display()))?;
        Ok(())
    }

    /// Settings handed to the orchestrator
    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            ring: self.ring.clone(),
            session: self.session.clone(),
            audio: self.audio.clone(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            ring: RingSettings::default(),
            session: SessionSettings::default(),
            audio: AudioSettings::default(),
            catalog_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = AppConfig::default();
        config.ring.sensitivity = 0.6;
        config.session.fade_threshold_secs = 45;
        config.audio.volume = 0.5;
        config.catalog_path = Some(PathBuf::from("/tmp/catalog.json"));
        config.save_to_path(&path).unwrap();

        let loaded = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "session": { "fade_threshold_secs": 20 } }"#).unwrap();

        let loaded = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.session.fade_threshold_secs, 20);
        assert_eq!(loaded.ring, RingSettings::default());
        assert_eq!(loaded.audio, AudioSettings::default());
        assert!(loaded.catalog_path.is_none());
    }

    #[test]
    fn test_bad_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = AppConfig::load_from_path(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("config.json"));
    }
}
