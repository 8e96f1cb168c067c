//! Backend that accepts every request and plays nothing

use crate::service::{AudioService, LoadListener, LoadTicket, TickFeedback};
use std::path::Path;

/// Used when no output device is wanted or available.
///
/// Loads complete immediately with success so the session flow is
/// identical to the real backend.
#[derive(Default)]
pub struct SilentAudio {
    listener: Option<LoadListener>,
}

impl SilentAudio {
    pub fn new(listener: LoadListener) -> Self {
        Self {
            listener: Some(listener),
        }
    }
}

impl AudioService for SilentAudio {
    fn load_ambiance(&mut self, source: &Path, ticket: LoadTicket) {
        log::trace!("silent load {:?} ({:?})", source, ticket);
        if let Some(listener) = &self.listener {
            listener(ticket, Ok(()));
        }
    }

    fn start_ambiance(&mut self) {
        log::trace!("silent start");
    }

    fn stop_ambiance(&mut self) {
        log::trace!("silent stop");
    }

    fn suspend(&mut self) {}

    fn resume(&mut self) {}

    fn fade_out(&mut self, seconds: u64) {
        log::trace!("silent fade over {}s", seconds);
    }

    fn prime_chime(&mut self) {}

    fn play_chime(&mut self) {
        log::debug!("chime (silent)");
    }
}

impl TickFeedback for SilentAudio {
    fn tick(&mut self) {}
}
