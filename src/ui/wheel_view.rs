//! Cairo drawing of the wheel, the center button and the breadcrumb header

use super::text::{show_centered, text_size};
use crate::view::{WheelGeometry, BUTTON_RADIUS, HEADER_HEIGHT};
use cairo::Context;
use std::f64::consts::PI;
use std::time::Instant;
use stillness_core::{Orchestrator, Ring, SessionState, Visibility};
use stillness_types::{Color, Palette};

const LABEL_SIZE: f64 = 11.0;
const HEADER_SIZE: f64 = 10.0;
const BUTTON_LABEL_SIZE: f64 = 14.0;
const TRACK_WIDTH: f64 = 40.0;

pub fn draw(cr: &Context, geometry: &WheelGeometry, app: &Orchestrator, now: Instant) {
    let palette = Palette::for_theme(app.preferences().theme);

    palette.background.apply_to_cairo(cr);
    if let Err(e) = cr.paint() {
        log::warn!("Failed to paint background: {}", e);
        return;
    }

    draw_header(cr, geometry, app, &palette);

    if app.wheel().is_visible() {
        // Outermost first so inner rings paint over expanded tracks
        let mut rings: Vec<&Ring> = app
            .wheel()
            .rings()
            .iter()
            .filter(|r| r.visibility() != Visibility::Hidden)
            .collect();
        rings.sort_by(|a, b| b.target_radius().total_cmp(&a.target_radius()));
        for ring in rings {
            draw_ring(cr, geometry, ring, &palette, now);
        }
    }

    draw_button(cr, geometry, app, &palette);
}

fn draw_ring(cr: &Context, geometry: &WheelGeometry, ring: &Ring, palette: &Palette, now: Instant) {
    let active = ring.visibility() == Visibility::Active;
    let track = if active {
        palette.ring_track
    } else {
        palette.ring_track_faded
    };

    track.apply_to_cairo(cr);
    cr.set_line_width(TRACK_WIDTH);
    cr.arc(geometry.wheel_x, geometry.wheel_y, ring.target_radius(), 0.0, 2.0 * PI);
    if let Err(e) = cr.stroke() {
        log::warn!("Failed to stroke ring {}: {}", ring.level(), e);
    }

    let points = geometry.item_points(ring, now);
    for (index, (item, (x, y))) in ring.items().iter().zip(points).enumerate() {
        let highlighted = active && index == ring.highlighted();
        let selected = ring.selected() == Some(index);

        let color: Color = if highlighted {
            palette.text_primary
        } else if active {
            palette.text_secondary
        } else if selected {
            palette.text_secondary.faded(0.8)
        } else {
            palette.text_muted.faded(0.5)
        };

        if selected && !active {
            // Marker dot under the chosen item of an expanded ring
            palette.text_secondary.apply_to_cairo(cr);
            cr.arc(x, y + 11.0, 2.0, 0.0, 2.0 * PI);
            if let Err(e) = cr.fill() {
                log::warn!("Failed to draw marker: {}", e);
            }
        }

        color.apply_to_cairo(cr);
        show_centered(cr, x, y, &item.display_label(), LABEL_SIZE, highlighted);
    }
}

fn draw_button(cr: &Context, geometry: &WheelGeometry, app: &Orchestrator, palette: &Palette) {
    if app.session().state() == SessionState::Completing {
        return;
    }

    palette.ring_track.apply_to_cairo(cr);
    cr.arc(geometry.button_x, geometry.button_y, BUTTON_RADIUS, 0.0, 2.0 * PI);
    if let Err(e) = cr.fill() {
        log::warn!("Failed to draw button: {}", e);
        return;
    }

    let label = app.center_label();
    let mut size = BUTTON_LABEL_SIZE;
    while size > 8.0 && text_size(cr, &label, size, true).0 > BUTTON_RADIUS * 1.6 {
        size -= 1.0;
    }
    palette.text_primary.apply_to_cairo(cr);
    show_centered(cr, geometry.button_x, geometry.button_y, &label, size, true);
}

/// Mode / ambiance / duration chosen so far, one column each
fn draw_header(cr: &Context, geometry: &WheelGeometry, app: &Orchestrator, palette: &Palette) {
    let session = app.session();
    let column = geometry.width / 3.0;
    for level in 1..=3u8 {
        let label = session
            .selection(level)
            .or(if level == 3 { app.pending_duration() } else { None })
            .map(|item| item.display_label())
            .unwrap_or_else(|| "·".to_string());
        let current = session.state() == SessionState::Selecting && session.level() == level;
        let color = if current {
            palette.text_primary
        } else {
            palette.text_muted
        };
        color.apply_to_cairo(cr);
        let x = column * (f64::from(level) - 0.5);
        show_centered(cr, x, HEADER_HEIGHT / 2.0, &label, HEADER_SIZE, current);
    }
}
