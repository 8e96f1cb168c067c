//! Audio service seam consumed by the session core

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors reported by audio backends.
///
/// The session never surfaces these to the user; they are logged and the
/// session carries on without sound.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio output unavailable: {0}")]
    Unavailable(String),

    #[error("failed to open sound file {path:?}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode sound file {path:?}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("audio thread is not running")]
    Disconnected,
}

/// Identifies one ambiance load request.
///
/// Every new request gets a higher ticket; a completion carrying an older
/// ticket belongs to a superseded request and must be ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LoadTicket(pub u64);

impl LoadTicket {
    /// The ticket following this one
    pub fn next(self) -> Self {
        LoadTicket(self.0.wrapping_add(1))
    }
}

/// Receives ambiance load completions, possibly from another thread
pub type LoadListener = Box<dyn Fn(LoadTicket, Result<(), AudioError>) + Send + 'static>;

/// Ambiance channel plus chime, as seen by the session orchestrator.
///
/// All calls are fire-and-forget. `load_ambiance` completes asynchronously:
/// the backend reports the outcome for `ticket` through the listener it was
/// constructed with.
pub trait AudioService {
    /// Unlock / open the output device
    fn initialize(&mut self) {}

    /// Release the current ambiance and start loading `source`
    fn load_ambiance(&mut self, source: &Path, ticket: LoadTicket);

    /// Start the loaded ambiance at full volume
    fn start_ambiance(&mut self);

    /// Stop and release the ambiance (cancels a running fade)
    fn stop_ambiance(&mut self);

    /// Pause output without releasing the ambiance
    fn suspend(&mut self);

    /// Continue after `suspend`
    fn resume(&mut self);

    /// Ramp the ambiance volume linearly to zero over `seconds`
    fn fade_out(&mut self, seconds: u64);

    /// Preload the completion chime so it plays without delay
    fn prime_chime(&mut self);

    /// Play the completion chime
    fn play_chime(&mut self);
}

/// Short audible click used as rotation feedback
pub trait TickFeedback {
    fn tick(&mut self);
}
