//! Screen geometry of the wheel: where things are drawn and what a point hits

use std::time::Instant;
use stillness_core::{Orchestrator, Ring, Visibility};
use stillness_types::LayoutOffsets;

/// Radius of the circular center button
pub const BUTTON_RADIUS: f64 = 44.0;
/// Pointer distance that still counts as touching an item label
pub const ITEM_HIT_RADIUS: f64 = 26.0;
/// Half the width of a ring band that accepts drags
pub const BAND_HALF_WIDTH: f64 = 30.0;
/// Height of the breadcrumb strip at the top
pub const HEADER_HEIGHT: f64 = 48.0;

/// What a pointer position lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Button,
    Header { level: u8 },
    Item { level: u8, index: usize },
    /// Inside the active ring's band but not on a label
    Band,
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelGeometry {
    pub width: f64,
    pub height: f64,
    pub wheel_x: f64,
    pub wheel_y: f64,
    pub button_x: f64,
    pub button_y: f64,
}

impl WheelGeometry {
    pub fn new(width: f64, height: f64, offsets: LayoutOffsets) -> Self {
        let offsets = offsets.clamped();
        Self {
            width,
            height,
            wheel_x: width / 2.0,
            wheel_y: height * offsets.wheel_y / 100.0,
            button_x: width / 2.0,
            button_y: height * offsets.button_y / 100.0,
        }
    }

    /// Screen point of every item on `ring` at `now`
    pub fn item_points(&self, ring: &Ring, now: Instant) -> Vec<(f64, f64)> {
        let rotation = ring.display_rotation(now);
        ring.positions()
            .iter()
            .map(|pos| {
                let radius = pos.x.hypot(pos.y);
                let angle = (pos.angle_deg + rotation).to_radians();
                (
                    self.wheel_x + angle.cos() * radius,
                    self.wheel_y + angle.sin() * radius,
                )
            })
            .collect()
    }

    /// Horizontal breadcrumb column for `x`
    pub fn header_level(&self, x: f64) -> u8 {
        let column = (x / (self.width / 3.0)).floor().clamp(0.0, 2.0);
        column as u8 + 1
    }

    pub fn hit_test(&self, app: &Orchestrator, x: f64, y: f64, now: Instant) -> Hit {
        if (x - self.button_x).hypot(y - self.button_y) <= BUTTON_RADIUS {
            return Hit::Button;
        }
        if y <= HEADER_HEIGHT {
            return Hit::Header {
                level: self.header_level(x),
            };
        }

        // Outer rings overlap inner labels least, so test them first
        let mut rings: Vec<&Ring> = app
            .wheel()
            .rings()
            .iter()
            .filter(|r| r.visibility() != Visibility::Hidden)
            .collect();
        rings.sort_by(|a, b| b.target_radius().total_cmp(&a.target_radius()));
        for ring in rings {
            let hit = self
                .item_points(ring, now)
                .into_iter()
                .position(|(px, py)| (x - px).hypot(y - py) <= ITEM_HIT_RADIUS);
            if let Some(index) = hit {
                return Hit::Item {
                    level: ring.level(),
                    index,
                };
            }
        }

        if let Some(active) = app.wheel().active_ring() {
            let distance = (x - self.wheel_x).hypot(y - self.wheel_y);
            if (distance - active.target_radius()).abs() <= BAND_HALF_WIDTH {
                return Hit::Band;
            }
        }
        Hit::Outside
    }
}
