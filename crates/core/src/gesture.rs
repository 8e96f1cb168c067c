//! Pointer gesture recognizers feeding recall and navigation

use crate::constants::{
    BACK_SWIPE_MIN_DY, BACK_SWIPE_RATIO, HOLD_CANCEL_PX, RECALL_SWIPE_MAX_DX, RECALL_SWIPE_MIN_DY,
};
use crate::session::SessionState;
use std::time::{Duration, Instant};

/// Outcome of releasing the pointer on the control zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// Plain tap, forward to the center button
    Tap,
    /// The gesture already fired a recall; the tap is swallowed
    Swallowed,
    /// Moved too far to count as a tap
    Ignored,
}

#[derive(Debug, Clone, Copy)]
struct Press {
    x: f64,
    y: f64,
    at: Instant,
    /// Whether hold and swipe may fire; an unarmed press can only tap
    armed: bool,
    cancelled: bool,
}

/// Long-press or swipe-up on the control zone triggers a recall.
///
/// At most one recall fires per physical gesture.
#[derive(Debug, Clone)]
pub struct HoldSwipeRecognizer {
    hold: Duration,
    press: Option<Press>,
    fired: bool,
}

impl HoldSwipeRecognizer {
    pub fn new(hold: Duration) -> Self {
        Self {
            hold,
            press: None,
            fired: false,
        }
    }

    pub fn pointer_down(&mut self, x: f64, y: f64, armed: bool, now: Instant) {
        self.press = Some(Press {
            x,
            y,
            at: now,
            armed,
            cancelled: false,
        });
        self.fired = false;
    }

    /// Returns true when this move completes a swipe-up recall
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        let Some(press) = self.press.as_mut() else {
            return false;
        };
        if self.fired {
            return false;
        }
        let dx = x - press.x;
        let dy = y - press.y;
        if press.armed && dy < -RECALL_SWIPE_MIN_DY && dx.abs() < RECALL_SWIPE_MAX_DX {
            self.fired = true;
            log::debug!("swipe-up recall");
            return true;
        }
        if dx.hypot(dy) > HOLD_CANCEL_PX {
            press.cancelled = true;
        }
        false
    }

    /// Long-press deadline, if armed
    pub fn deadline(&self) -> Option<Instant> {
        match self.press {
            Some(press) if press.armed && !press.cancelled && !self.fired => {
                Some(press.at + self.hold)
            }
            _ => None,
        }
    }

    /// Returns true when the long-press fires at `now`
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline() {
            Some(deadline) if now >= deadline => {
                self.fired = true;
                log::debug!("long-press recall");
                true
            }
            _ => false,
        }
    }

    pub fn pointer_up(&mut self, x: f64, y: f64) -> Release {
        let Some(press) = self.press.take() else {
            return Release::Ignored;
        };
        if std::mem::take(&mut self.fired) {
            return Release::Swallowed;
        }
        let moved = (x - press.x).hypot(y - press.y);
        if press.cancelled || moved > HOLD_CANCEL_PX {
            Release::Ignored
        } else {
            Release::Tap
        }
    }

    /// Forget any press in progress
    pub fn cancel(&mut self) {
        self.press = None;
        self.fired = false;
    }
}

/// Swipe-up outside the control zone while selecting means "back"
pub fn is_back_swipe(dx: f64, dy: f64) -> bool {
    dy <= -BACK_SWIPE_MIN_DY && dy.abs() >= BACK_SWIPE_RATIO * dx.abs()
}

/// What a tap on the header breadcrumb for a level does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAction {
    Edit(u8),
    GoTo(u8),
}

pub fn header_action(state: SessionState, level: u8) -> Option<HeaderAction> {
    match state {
        SessionState::Playing | SessionState::Paused => Some(HeaderAction::Edit(level)),
        SessionState::Selecting => Some(HeaderAction::GoTo(level)),
        _ => None,
    }
}
