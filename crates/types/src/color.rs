//! Colors and theme palettes for drawing the wheel.

use crate::preferences::Theme;
use serde::{Deserialize, Serialize};

/// RGBA color with alpha channel
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: a as f64 / 255.0,
        }
    }

    /// Same color with alpha multiplied by `factor`
    pub fn faded(&self, factor: f64) -> Self {
        Self {
            a: (self.a * factor).clamp(0.0, 1.0),
            ..*self
        }
    }

    /// Apply to Cairo context
    #[cfg(feature = "gtk")]
    pub fn apply_to_cairo(&self, cr: &cairo::Context) {
        cr.set_source_rgba(self.r, self.g, self.b, self.a);
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }
}

/// Colors used to draw one theme
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub ring_track: Color,
    pub ring_track_faded: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                background: Color::from_rgba8(0xe8, 0xe8, 0xe8, 0xff),
                ring_track: Color::new(0.0, 0.0, 0.0, 0.06),
                ring_track_faded: Color::new(0.0, 0.0, 0.0, 0.025),
                text_primary: Color::from_rgba8(0x1a, 0x1a, 0x1a, 0xff),
                text_secondary: Color::from_rgba8(0x4a, 0x4a, 0x4a, 0xff),
                text_muted: Color::from_rgba8(0x88, 0x88, 0x88, 0xff),
            },
            Theme::Dark => Self {
                background: Color::from_rgba8(0x1a, 0x1a, 0x1a, 0xff),
                ring_track: Color::new(1.0, 1.0, 1.0, 0.08),
                ring_track_faded: Color::new(1.0, 1.0, 1.0, 0.03),
                text_primary: Color::from_rgba8(0xf0, 0xf0, 0xf0, 0xff),
                text_secondary: Color::from_rgba8(0xb0, 0xb0, 0xb0, 0xff),
                text_muted: Color::from_rgba8(0x70, 0x70, 0x70, 0xff),
            },
        }
    }
}
