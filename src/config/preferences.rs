//! Theme and layout preferences persisted as JSON
//!
//! Read once at boot and rewritten whenever the user changes them.
//! A missing or unreadable file yields the built-in defaults.

use anyhow::{Context, Result};
use log::{info, warn};
use std::path::{Path, PathBuf};
use stillness_core::{DeviceError, Preferences, PreferencesStore};

/// `PreferencesStore` backed by a `preferences.json` file
#[derive(Debug, Clone)]
pub struct JsonPreferences {
    path: PathBuf,
}

impl JsonPreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the per-user config directory
    pub fn in_config_dir() -> Result<Self> {
        Ok(Self::new(super::config_dir()?.join("preferences.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn try_load(&self) -> Result<Preferences> {
        if !self.path.exists() {
            return Ok(Preferences::default());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        let prefs: Preferences = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        info!("Loaded preferences from {:?}", self.path);
        Ok(prefs)
    }
}

impl PreferencesStore for JsonPreferences {
    fn load(&self) -> Preferences {
        match self.try_load() {
            Ok(prefs) => prefs,
            Err(e) => {
                warn!("Failed to load preferences, using defaults: {:#}", e);
                Preferences::default()
            }
        }
    }

    fn save(&mut self, preferences: &Preferences) -> Result<(), DeviceError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(preferences).map_err(|e| DeviceError::Failed {
            service: "preferences",
            message: e.to_string(),
        })?;
        std::fs::write(&self.path, content)?;
        info!("Saved preferences to {:?}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stillness_types::{LayoutOffsets, Theme};

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonPreferences::new(dir.path().join("preferences.json"));
        assert_eq!(store.load(), Preferences::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonPreferences::new(dir.path().join("sub").join("preferences.json"));
        let prefs = Preferences {
            theme: Theme::Dark,
            layout: Some(LayoutOffsets {
                wheel_y: 70.0,
                button_y: 90.0,
            }),
        };
        store.save(&prefs).unwrap();

        let reopened = JsonPreferences::new(store.path());
        assert_eq!(reopened.load(), prefs);
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, "[1, 2").unwrap();
        assert_eq!(JsonPreferences::new(&path).load(), Preferences::default());
    }
}
