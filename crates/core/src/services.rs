//! Device services consumed by the orchestrator

use stillness_audio::{AudioService, TickFeedback};
use stillness_types::Preferences;
use thiserror::Error;

/// Failures of optional device services; always logged and ignored
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),

    #[error("{service} failed: {message}")]
    Failed {
        service: &'static str,
        message: String,
    },

    #[error("preferences I/O failed")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticPattern {
    Light,
    Medium,
    Confirm,
}

impl HapticPattern {
    /// Vibration on/off sequence in milliseconds
    pub fn sequence_ms(self) -> &'static [u64] {
        match self {
            HapticPattern::Light => &[10],
            HapticPattern::Medium => &[25],
            HapticPattern::Confirm => &[15, 50, 15],
        }
    }
}

pub trait Haptics {
    fn trigger(&mut self, pattern: HapticPattern);
}

/// Keeps the display awake while a session plays
pub trait WakeLock {
    fn acquire(&mut self) -> Result<(), DeviceError>;
    fn release(&mut self) -> Result<(), DeviceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaMetadata {
    pub title: String,
    pub artist: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    None,
    Playing,
    Paused,
}

/// Media keys that can be routed back into the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaAction {
    Play,
    Pause,
}

/// System media controls (lock screen, media keys)
pub trait MediaSession {
    fn set_metadata(&mut self, metadata: &MediaMetadata) -> Result<(), DeviceError>;
    fn set_playback_state(&mut self, state: PlaybackState) -> Result<(), DeviceError>;
    fn register_actions(&mut self, actions: &[MediaAction]) -> Result<(), DeviceError>;
    fn clear_actions(&mut self) -> Result<(), DeviceError>;
}

pub trait PreferencesStore {
    /// Stored preferences, or defaults when nothing usable is stored
    fn load(&self) -> Preferences;
    fn save(&mut self, preferences: &Preferences) -> Result<(), DeviceError>;
}

/// Audio output that also provides rotation ticks
pub trait SoundOutput: AudioService + TickFeedback {}

impl<T: AudioService + TickFeedback> SoundOutput for T {}

/// Preferences kept in memory only
#[derive(Debug, Default, Clone)]
pub struct MemoryPreferences {
    pub stored: Preferences,
}

impl PreferencesStore for MemoryPreferences {
    fn load(&self) -> Preferences {
        self.stored.clone()
    }

    fn save(&mut self, preferences: &Preferences) -> Result<(), DeviceError> {
        self.stored = preferences.clone();
        Ok(())
    }
}

/// Everything the orchestrator talks to outside the core
pub struct Services {
    pub audio: Box<dyn SoundOutput>,
    pub haptics: Box<dyn Haptics>,
    pub wake_lock: Box<dyn WakeLock>,
    pub media: Box<dyn MediaSession>,
    pub preferences: Box<dyn PreferencesStore>,
}

/// Log a swallowed device failure
pub(crate) fn log_failure(what: &str, result: Result<(), DeviceError>) {
    if let Err(e) = result {
        log::warn!("{} failed: {}", what, e);
    }
}
