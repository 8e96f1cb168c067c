//! Tunable ring and session parameters (config file sections)

use crate::constants::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ring physics and geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingSettings {
    pub sensitivity: f64,
    pub momentum_factor: f64,
    pub jitter_threshold_px: f64,
    pub snap_animation_ms: u64,
    pub click_animation_ms: u64,
    pub base_radius: f64,
    pub expansion: f64,
}

impl Default for RingSettings {
    fn default() -> Self {
        Self {
            sensitivity: SENSITIVITY,
            momentum_factor: MOMENTUM_FACTOR,
            jitter_threshold_px: JITTER_THRESHOLD_PX,
            snap_animation_ms: SNAP_ANIMATION_MS,
            click_animation_ms: CLICK_ANIMATION_MS,
            base_radius: BASE_RADIUS,
            expansion: RING_EXPANSION,
        }
    }
}

impl RingSettings {
    pub fn snap_animation(&self) -> Duration {
        Duration::from_millis(self.snap_animation_ms)
    }

    pub fn click_animation(&self) -> Duration {
        Duration::from_millis(self.click_animation_ms)
    }
}

/// Session timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub tick_interval_ms: u64,
    pub fade_threshold_secs: u64,
    pub chime_reset_delay_ms: u64,
    pub fade_reset_delay_ms: u64,
    pub long_press_ms: u64,
    pub click_suppress_ms: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: TICK_INTERVAL.as_millis() as u64,
            fade_threshold_secs: FADE_THRESHOLD_SECS,
            chime_reset_delay_ms: CHIME_RESET_DELAY.as_millis() as u64,
            fade_reset_delay_ms: FADE_RESET_DELAY.as_millis() as u64,
            long_press_ms: LONG_PRESS.as_millis() as u64,
            click_suppress_ms: CLICK_AFTER_TOUCH.as_millis() as u64,
        }
    }
}

impl SessionSettings {
    /// Tick interval, clamped to `1..=1000` ms
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.clamp(1, 1000))
    }

    pub fn chime_reset_delay(&self) -> Duration {
        Duration::from_millis(self.chime_reset_delay_ms)
    }

    pub fn fade_reset_delay(&self) -> Duration {
        Duration::from_millis(self.fade_reset_delay_ms)
    }

    pub fn long_press(&self) -> Duration {
        Duration::from_millis(self.long_press_ms)
    }

    pub fn click_suppress(&self) -> Duration {
        Duration::from_millis(self.click_suppress_ms)
    }
}
