//! Default tuning values and shared constants

use std::time::Duration;

/// Rotation degrees per pixel of horizontal drag
pub const SENSITIVITY: f64 = 0.4;

/// Release velocity (px/ms) multiplier for the momentum throw
pub const MOMENTUM_FACTOR: f64 = 80.0;

/// Drags shorter than this (px from the start) are treated as taps
pub const JITTER_THRESHOLD_PX: f64 = 3.0;

pub const SNAP_ANIMATION_MS: u64 = 500;
pub const CLICK_ANIMATION_MS: u64 = 400;

/// Radius of the active ring (px)
pub const BASE_RADIUS: f64 = 110.0;

/// Extra radius per expansion step (px)
pub const RING_EXPANSION: f64 = 45.0;

/// Countdown refresh interval; display latency only
pub const TICK_INTERVAL: Duration = Duration::from_millis(500);

/// Fade ending starts at the first tick with this many seconds left
pub const FADE_THRESHOLD_SECS: u64 = 30;

pub const CHIME_RESET_DELAY: Duration = Duration::from_secs(5);
pub const FADE_RESET_DELAY: Duration = Duration::from_secs(10);

pub const LONG_PRESS: Duration = Duration::from_millis(500);

/// Movement that cancels a pending long-press (px)
pub const HOLD_CANCEL_PX: f64 = 10.0;

/// Swipe-up recall: upward travel needed and sideways travel allowed (px)
pub const RECALL_SWIPE_MIN_DY: f64 = 25.0;
pub const RECALL_SWIPE_MAX_DX: f64 = 40.0;

/// Swipe-up back navigation outside the control zone
pub const BACK_SWIPE_MIN_DY: f64 = 60.0;
pub const BACK_SWIPE_RATIO: f64 = 3.0;

/// Synthetic clicks this soon after a touch-end are ignored
pub const CLICK_AFTER_TOUCH: Duration = Duration::from_millis(600);

/// Frame interval for the GUI animation timer
pub const ANIMATION_FRAME_MS: u64 = 16;
pub const ANIMATION_FRAME_INTERVAL: Duration = Duration::from_millis(ANIMATION_FRAME_MS);
