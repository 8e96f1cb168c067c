//! stillness-audio: Audio playback for Stillness sessions.
//!
//! The session core talks to audio only through [`AudioService`] and
//! [`TickFeedback`]. Two backends are provided:
//! - [`SilentAudio`]: accepts every request and plays nothing
//! - `AmbianceChannel` (feature `playback`): rodio output driven from a
//!   dedicated audio thread

mod service;
mod settings;
mod silent;

#[cfg(feature = "playback")]
mod channel;
#[cfg(feature = "playback")]
mod player;

pub use service::{AudioError, AudioService, LoadListener, LoadTicket, TickFeedback};
pub use settings::AudioSettings;
pub use silent::SilentAudio;

#[cfg(feature = "playback")]
pub use channel::AmbianceChannel;
#[cfg(feature = "playback")]
pub use player::AudioPlayer;
