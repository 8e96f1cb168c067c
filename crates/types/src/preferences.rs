//! User preferences persisted between runs

use serde::{Deserialize, Serialize};

/// Color theme
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Theme {
    #[serde(rename = "light")]
    #[default]
    Light,
    #[serde(rename = "dark")]
    Dark,
}

impl Theme {
    /// The other theme
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

/// Calibrated vertical placement of the wheel and the center button.
///
/// Values are percentages of the viewport height measured from the top.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LayoutOffsets {
    #[serde(default = "default_wheel_y")]
    pub wheel_y: f64,
    #[serde(default = "default_button_y")]
    pub button_y: f64,
}

fn default_wheel_y() -> f64 {
    78.0
}

fn default_button_y() -> f64 {
    92.0
}

impl Default for LayoutOffsets {
    fn default() -> Self {
        Self {
            wheel_y: default_wheel_y(),
            button_y: default_button_y(),
        }
    }
}

impl LayoutOffsets {
    /// Clamp both offsets into the visible range
    pub fn clamped(self) -> Self {
        Self {
            wheel_y: self.wheel_y.clamp(0.0, 100.0),
            button_y: self.button_y.clamp(0.0, 100.0),
        }
    }
}

/// Everything the app remembers about the user
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
    /// None until the user has calibrated the layout
    #[serde(default)]
    pub layout: Option<LayoutOffsets>,
}

impl Preferences {
    /// Layout to apply, falling back to the defaults when uncalibrated
    pub fn effective_layout(&self) -> LayoutOffsets {
        self.layout.map(LayoutOffsets::clamped).unwrap_or_default()
    }
}
