//! Audio configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Audio configuration section of the app config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioSettings {
    /// Directory holding ambiance and chime files
    #[serde(default = "default_sounds_dir")]
    pub sounds_dir: PathBuf,

    /// Chime file name inside `sounds_dir`
    #[serde(default = "default_chime_file")]
    pub chime_file: String,

    /// Master volume level (0.0 to 1.0)
    #[serde(default = "default_volume")]
    pub volume: f32,

    /// Whether rotation ticks are audible
    #[serde(default = "default_true")]
    pub tick_enabled: bool,
}

fn default_sounds_dir() -> PathBuf {
    PathBuf::from("sounds")
}

fn default_chime_file() -> String {
    "chime.mp3".to_string()
}

fn default_volume() -> f32 {
    1.0
}

fn default_true() -> bool {
    true
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            sounds_dir: default_sounds_dir(),
            chime_file: default_chime_file(),
            volume: default_volume(),
            tick_enabled: true,
        }
    }
}

impl AudioSettings {
    /// Full path of a sound file
    pub fn resolve(&self, file: &str) -> PathBuf {
        self.sounds_dir.join(file)
    }

    /// Full path of the chime
    pub fn chime_path(&self) -> PathBuf {
        self.resolve(&self.chime_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_settings_default() {
        let settings = AudioSettings::default();
        assert!(settings.tick_enabled);
        assert!((settings.volume - 1.0).abs() < 0.001);
        assert_eq!(settings.chime_path(), PathBuf::from("sounds/chime.mp3"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: AudioSettings = serde_json::from_str(r#"{"volume": 0.5}"#).unwrap();
        assert_eq!(settings.chime_file, "chime.mp3");
        assert!((settings.volume - 0.5).abs() < 0.001);
    }
}
