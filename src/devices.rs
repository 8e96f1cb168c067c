//! Desktop stand-ins for phone device services
//!
//! Desktops have no vibration motor, and screen-saver inhibition and
//! MPRIS are left to the front end, so these adapters record what the
//! session asked for and log it.

use crate::config::AppConfig;
use log::{debug, info, warn};
use stillness_audio::{LoadListener, SilentAudio};
use stillness_core::{
    DeviceError, HapticPattern, Haptics, MediaAction, MediaMetadata, MediaSession, PlaybackState,
    PreferencesStore, Services, SoundOutput, WakeLock,
};

/// Haptics that only log the requested pattern
#[derive(Debug, Default)]
pub struct LogHaptics;

impl Haptics for LogHaptics {
    fn trigger(&mut self, pattern: HapticPattern) {
        debug!("haptic {:?} {:?}", pattern, pattern.sequence_ms());
    }
}

/// Tracks whether the display should stay awake
#[derive(Debug, Default)]
pub struct DesktopWakeLock {
    held: bool,
}

impl DesktopWakeLock {
    pub fn is_held(&self) -> bool {
        self.held
    }
}

impl WakeLock for DesktopWakeLock {
    fn acquire(&mut self) -> Result<(), DeviceError> {
        if !self.held {
            self.held = true;
            debug!("wake lock acquired");
        }
        Ok(())
    }

    fn release(&mut self) -> Result<(), DeviceError> {
        if self.held {
            self.held = false;
            debug!("wake lock released");
        }
        Ok(())
    }
}

/// Media session that remembers the published state
#[derive(Debug, Default)]
pub struct DesktopMediaSession {
    metadata: Option<MediaMetadata>,
    state: Option<PlaybackState>,
    actions: Vec<MediaAction>,
}

impl DesktopMediaSession {
    pub fn metadata(&self) -> Option<&MediaMetadata> {
        self.metadata.as_ref()
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.state.unwrap_or(PlaybackState::None)
    }

    pub fn actions(&self) -> &[MediaAction] {
        &self.actions
    }
}

impl MediaSession for DesktopMediaSession {
    fn set_metadata(&mut self, metadata: &MediaMetadata) -> Result<(), DeviceError> {
        info!("Now playing: {} ({})", metadata.title, metadata.artist);
        self.metadata = Some(metadata.clone());
        Ok(())
    }

    fn set_playback_state(&mut self, state: PlaybackState) -> Result<(), DeviceError> {
        debug!("media state {:?}", state);
        self.state = Some(state);
        Ok(())
    }

    fn register_actions(&mut self, actions: &[MediaAction]) -> Result<(), DeviceError> {
        self.actions = actions.to_vec();
        Ok(())
    }

    fn clear_actions(&mut self) -> Result<(), DeviceError> {
        self.actions.clear();
        self.metadata = None;
        Ok(())
    }
}

/// Audio backend for this build.
///
/// `make_listener` is called once per backend attempt so a failed device
/// open can fall back to silence with a fresh listener.
pub fn audio_backend(
    config: &AppConfig,
    silent: bool,
    make_listener: impl Fn() -> LoadListener,
) -> Box<dyn SoundOutput> {
    if silent {
        info!("Audio disabled");
        return Box::new(SilentAudio::new(make_listener()));
    }

    #[cfg(feature = "playback")]
    {
        match stillness_audio::AmbianceChannel::spawn(&config.audio, make_listener()) {
            Ok(channel) => return Box::new(channel),
            Err(e) => warn!("Audio output unavailable, continuing silently: {}", e),
        }
    }
    #[cfg(not(feature = "playback"))]
    {
        let _ = config;
        warn!("Built without the playback feature, continuing silently");
    }

    Box::new(SilentAudio::new(make_listener()))
}

/// Assemble the desktop service set
pub fn desktop_services(
    audio: Box<dyn SoundOutput>,
    preferences: Box<dyn PreferencesStore>,
) -> Services {
    Services {
        audio,
        haptics: Box::new(LogHaptics),
        wake_lock: Box::new(DesktopWakeLock::default()),
        media: Box::new(DesktopMediaSession::default()),
        preferences,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wake_lock_is_idempotent() {
        let mut lock = DesktopWakeLock::default();
        lock.acquire().unwrap();
        lock.acquire().unwrap();
        assert!(lock.is_held());
        lock.release().unwrap();
        assert!(!lock.is_held());
        lock.release().unwrap();
    }

    #[test]
    fn test_media_session_clear() {
        let mut media = DesktopMediaSession::default();
        media
            .set_metadata(&MediaMetadata {
                title: "Sleeping Meditation".to_string(),
                artist: "Rain".to_string(),
            })
            .unwrap();
        media
            .register_actions(&[MediaAction::Play, MediaAction::Pause])
            .unwrap();
        media.set_playback_state(PlaybackState::Playing).unwrap();
        assert_eq!(media.actions().len(), 2);

        media.clear_actions().unwrap();
        assert!(media.actions().is_empty());
        assert!(media.metadata().is_none());
        assert_eq!(media.playback_state(), PlaybackState::Playing);
    }

    #[test]
    fn test_silent_backend_completes_loads() {
        use std::path::Path;
        use std::sync::mpsc;
        use stillness_audio::{AudioError, AudioService, LoadTicket};

        let (tx, rx) = mpsc::channel();
        let mut audio = audio_backend(&AppConfig::default(), true, || {
            let tx = tx.clone();
            let listener: LoadListener =
                Box::new(move |ticket: LoadTicket, outcome: Result<(), AudioError>| {
                    let _ = tx.send((ticket, outcome.is_ok()));
                });
            listener
        });
        audio.load_ambiance(Path::new("sounds/rain.mp3"), LoadTicket(3));
        assert_eq!(rx.try_recv().unwrap(), (LoadTicket(3), true));
    }
}
