//! Center button: label and action derived from session state

use crate::session::{RecallPhase, SessionState};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CenterMode {
    Select,
    Ready,
    /// Recall overview: the interrupted session is waiting to continue
    Recalled,
    Playing,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CenterAction {
    Confirm,
    Play,
    Pause,
    Resume,
}

impl CenterMode {
    /// `ready` is true when all three selections are made and play is pending
    pub fn derive(state: SessionState, recall: Option<RecallPhase>, ready: bool) -> Self {
        match state {
            SessionState::Selecting if recall == Some(RecallPhase::Overview) => {
                CenterMode::Recalled
            }
            SessionState::Selecting if ready => CenterMode::Ready,
            SessionState::Playing | SessionState::Completing => CenterMode::Playing,
            SessionState::Paused => CenterMode::Paused,
            SessionState::Idle | SessionState::Selecting | SessionState::Editing => CenterMode::Select,
        }
    }

    pub fn action(self) -> CenterAction {
        match self {
            CenterMode::Select => CenterAction::Confirm,
            CenterMode::Ready => CenterAction::Play,
            CenterMode::Recalled => CenterAction::Resume,
            CenterMode::Playing => CenterAction::Pause,
            CenterMode::Paused => CenterAction::Resume,
        }
    }

    /// Button text; the countdown while a session runs
    pub fn label(self, countdown: &str) -> String {
        match self {
            CenterMode::Select => "Select".to_string(),
            CenterMode::Ready => "Play".to_string(),
            CenterMode::Recalled => "Resume".to_string(),
            CenterMode::Playing | CenterMode::Paused => countdown.to_string(),
        }
    }

    /// Glyph shown under the countdown
    pub fn icon(self) -> Option<&'static str> {
        match self {
            CenterMode::Playing => Some("pause-icon"),
            CenterMode::Paused => Some("play-icon"),
            _ => None,
        }
    }
}

/// Filters the synthetic click that follows a touch release
#[derive(Debug, Clone)]
pub struct CenterControl {
    suppress: Duration,
    last_touch_end: Option<Instant>,
}

impl CenterControl {
    pub fn new(suppress: Duration) -> Self {
        Self {
            suppress,
            last_touch_end: None,
        }
    }

    /// A touch gesture ended on the button
    pub fn touch_tap(&mut self, mode: CenterMode, now: Instant) -> CenterAction {
        self.last_touch_end = Some(now);
        mode.action()
    }

    /// A pointer click; ignored right after a touch-end
    pub fn click(&mut self, mode: CenterMode, now: Instant) -> Option<CenterAction> {
        if let Some(ended) = self.last_touch_end {
            if now.saturating_duration_since(ended) < self.suppress {
                log::trace!("center click suppressed after touch");
                return None;
            }
        }
        Some(mode.action())
    }
}
