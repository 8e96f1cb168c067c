//! Rotary ring selector: drag, momentum and snap physics

use crate::settings::RingSettings;
use std::time::{Duration, Instant};
use stillness_types::SelectableItem;

/// Per-ring presentation state derived from the wheel stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Hidden,
    Active,
    Expanded1,
    Expanded2,
}

impl Visibility {
    /// How many expansion steps out from the base radius
    fn expansion_steps(self) -> f64 {
        match self {
            Visibility::Hidden | Visibility::Active => 0.0,
            Visibility::Expanded1 => 1.0,
            Visibility::Expanded2 => 2.0,
        }
    }
}

/// Events emitted by ring operations
#[derive(Debug, Clone, PartialEq)]
pub enum RingEvent {
    HighlightChanged { index: usize, item: SelectableItem },
    /// Audible/haptic tick when the highlighted item changes
    Feedback,
    /// The selected item of an edit-tappable ring was tapped
    ActivateRequest { index: usize },
}

/// Item placement relative to the ring center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemPosition {
    pub angle_deg: f64,
    pub x: f64,
    pub y: f64,
}

/// Cubic-ish ease used for snap and click animations
pub fn ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Wrap an angle difference into `[-180, 180]`
pub fn shortest_diff(diff: f64) -> f64 {
    let wrapped = (diff + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && diff > 0.0 {
        180.0
    } else {
        wrapped
    }
}

#[derive(Debug, Clone, Copy)]
struct Tween {
    from: f64,
    to: f64,
    started: Instant,
    length: Duration,
}

impl Tween {
    fn value_at(&self, now: Instant) -> f64 {
        if self.length.is_zero() {
            return self.to;
        }
        let elapsed = now.saturating_duration_since(self.started).as_secs_f64();
        let progress = (elapsed / self.length.as_secs_f64()).min(1.0);
        self.from + (self.to - self.from) * ease_in_out(progress)
    }

    fn finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.length
    }
}

/// State captured when a drag starts, restored if the drag turns out to be jitter
#[derive(Debug, Clone, Copy)]
struct Drag {
    start_x: f64,
    start_rotation: f64,
    last_x: f64,
    last_time: Instant,
    velocity: f64,
    max_offset: f64,
    prior_rotation: f64,
    prior_tween: Option<Tween>,
    prior_highlight: usize,
}

/// One circular selector.
///
/// `rotation` is unbounded while dragging and rests on a slot angle in
/// `[0, 360)` once settled; `display_rotation` gives the animated angle at
/// a given instant.
#[derive(Debug, Clone)]
pub struct Ring {
    level: u8,
    items: Vec<SelectableItem>,
    highlighted: usize,
    selected: Option<usize>,
    rotation: f64,
    tween: Option<Tween>,
    visibility: Visibility,
    edit_tappable: bool,
    drag: Option<Drag>,
    positions: Vec<ItemPosition>,
    settings: RingSettings,
}

impl Ring {
    pub fn new(level: u8, settings: RingSettings) -> Self {
        Self {
            level,
            items: Vec::new(),
            highlighted: 0,
            selected: None,
            rotation: 0.0,
            tween: None,
            visibility: Visibility::Hidden,
            edit_tappable: false,
            drag: None,
            positions: Vec::new(),
            settings,
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn items(&self) -> &[SelectableItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn highlighted_item(&self) -> Option<&SelectableItem> {
        self.items.get(self.highlighted)
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&SelectableItem> {
        self.selected.and_then(|i| self.items.get(i))
    }

    /// Settled rotation in degrees (unbounded)
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_active(&self) -> bool {
        self.visibility == Visibility::Active
    }

    pub fn is_edit_tappable(&self) -> bool {
        self.edit_tappable
    }

    pub fn positions(&self) -> &[ItemPosition] {
        &self.positions
    }

    /// Degrees between neighbouring items; a full turn for an empty ring
    pub fn angle_per_item(&self) -> f64 {
        if self.items.is_empty() {
            360.0
        } else {
            360.0 / self.items.len() as f64
        }
    }

    /// Index nearest the top for the given rotation
    pub fn highlight_for(&self, rotation: f64) -> usize {
        let len = self.items.len();
        if len == 0 {
            return 0;
        }
        let step = (rotation.rem_euclid(360.0) / self.angle_per_item()).round() as usize % len;
        (len - step) % len
    }

    /// Rotation (mod 360) that brings `index` to the top
    pub fn slot_angle(&self, index: usize) -> f64 {
        let len = self.items.len();
        if len == 0 {
            return 0.0;
        }
        ((len - index % len) % len) as f64 * self.angle_per_item()
    }

    /// Replace the item list; rotation, highlight and selection reset
    pub fn set_items(&mut self, items: Vec<SelectableItem>) {
        if items.is_empty() {
            log::debug!("ring {}: ignoring empty item list", self.level);
            return;
        }
        self.items = items;
        self.rotation = 0.0;
        self.tween = None;
        self.drag = None;
        self.highlighted = 0;
        self.selected = None;
        self.recalc_positions();
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        if self.visibility != visibility {
            self.visibility = visibility;
            if visibility != Visibility::Active {
                self.drag = None;
            }
        }
    }

    pub fn set_edit_tappable(&mut self, tappable: bool) {
        self.edit_tappable = tappable;
    }

    /// Animated angle at `now`
    pub fn display_rotation(&self, now: Instant) -> f64 {
        match &self.tween {
            Some(tween) => tween.value_at(now),
            None => self.rotation,
        }
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.tween.is_some_and(|t| !t.finished(now))
    }

    /// Drop a finished tween so the displayed and settled angles agree
    pub fn settle(&mut self, now: Instant) {
        if self.tween.is_some_and(|t| t.finished(now)) {
            self.tween = None;
        }
    }

    pub fn begin_drag(&mut self, x: f64, now: Instant) {
        if !self.is_active() || self.items.is_empty() {
            return;
        }
        let shown = self.display_rotation(now);
        self.drag = Some(Drag {
            start_x: x,
            start_rotation: shown,
            last_x: x,
            last_time: now,
            velocity: 0.0,
            max_offset: 0.0,
            prior_rotation: self.rotation,
            prior_tween: self.tween,
            prior_highlight: self.highlighted,
        });
        self.tween = None;
        self.rotation = shown;
    }

    pub fn drag_to(&mut self, x: f64, now: Instant) -> Vec<RingEvent> {
        let Some(mut drag) = self.drag else {
            return Vec::new();
        };

        let dt_ms = now.saturating_duration_since(drag.last_time).as_secs_f64() * 1000.0;
        if dt_ms > 0.0 {
            drag.velocity = (x - drag.last_x) / dt_ms;
        }
        drag.last_x = x;
        drag.last_time = now;
        drag.max_offset = drag.max_offset.max((x - drag.start_x).abs());
        self.drag = Some(drag);

        self.rotation = drag.start_rotation + (x - drag.start_x) * self.settings.sensitivity;
        log::trace!(
            "ring {}: rotation {:.1} velocity {:.3}",
            self.level,
            self.rotation,
            drag.velocity
        );

        let index = self.highlight_for(self.rotation);
        if index != self.highlighted {
            self.highlighted = index;
            self.highlight_events(true)
        } else {
            Vec::new()
        }
    }

    pub fn end_drag(&mut self, now: Instant) -> Vec<RingEvent> {
        let Some(drag) = self.drag.take() else {
            return Vec::new();
        };

        if drag.max_offset < self.settings.jitter_threshold_px {
            self.rotation = drag.prior_rotation;
            self.tween = drag.prior_tween;
            if self.highlighted != drag.prior_highlight {
                self.highlighted = drag.prior_highlight;
                return self.highlight_events(false);
            }
            return Vec::new();
        }

        let released = self.rotation;
        let thrown = released + drag.velocity * self.settings.momentum_factor;
        let index = self.highlight_for(thrown);
        let diff = shortest_diff(self.slot_angle(index) - thrown.rem_euclid(360.0));
        self.settle_on(index, released, thrown + diff, self.settings.snap_animation(), now);

        let changed = index != self.highlighted;
        self.highlighted = index;
        self.highlight_events(changed)
    }

    /// Rotate `index` to the top, or request activation on an edit-tappable ring
    pub fn click_item(&mut self, index: usize, now: Instant) -> Vec<RingEvent> {
        if index >= self.items.len() {
            return Vec::new();
        }

        if !self.is_active() {
            if self.edit_tappable && self.selected == Some(index) {
                return vec![RingEvent::ActivateRequest { index }];
            }
            return Vec::new();
        }

        let shown = self.display_rotation(now);
        let diff = shortest_diff(self.slot_angle(index) - shown.rem_euclid(360.0));
        self.drag = None;
        self.settle_on(index, shown, shown + diff, self.settings.click_animation(), now);
        self.highlighted = index;
        self.highlight_events(true)
    }

    /// Settle exactly on the slot for `index`, animating from `from`.
    ///
    /// `target` is the unbounded angle the tween heads for; whole turns are
    /// shifted out of both ends so the settled rotation is the slot itself.
    fn settle_on(&mut self, index: usize, from: f64, target: f64, length: Duration, now: Instant) {
        let slot = self.slot_angle(index);
        let shift = ((target - slot) / 360.0).round() * 360.0;
        self.rotation = slot;
        self.tween = Some(Tween {
            from: from - shift,
            to: slot,
            started: now,
            length,
        });
    }

    /// Move the highlight without animation
    pub fn set_highlighted(&mut self, index: usize) {
        if index >= self.items.len() {
            return;
        }
        self.drag = None;
        self.tween = None;
        self.rotation = self.slot_angle(index);
        self.highlighted = index;
    }

    /// Mark the highlighted item as selected
    pub fn confirm_selection(&mut self) -> Option<&SelectableItem> {
        if self.items.is_empty() {
            return None;
        }
        self.selected = Some(self.highlighted);
        self.items.get(self.highlighted)
    }

    pub fn set_selected(&mut self, index: usize) {
        if index < self.items.len() {
            self.selected = Some(index);
        }
    }

    pub fn clear_selected(&mut self) {
        self.selected = None;
    }

    /// Index of the item with `id`
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Radius configured for the current visibility state
    pub fn target_radius(&self) -> f64 {
        self.settings.base_radius + self.settings.expansion * self.visibility.expansion_steps()
    }

    /// Lay the items out on the target radius, item 0 at the top
    pub fn recalc_positions(&mut self) {
        let radius = self.target_radius();
        let step = self.angle_per_item();
        self.positions = (0..self.items.len())
            .map(|i| {
                let angle_deg = i as f64 * step - 90.0;
                let rad = angle_deg.to_radians();
                ItemPosition {
                    angle_deg,
                    x: rad.cos() * radius,
                    y: rad.sin() * radius,
                }
            })
            .collect();
    }

    fn highlight_events(&self, feedback: bool) -> Vec<RingEvent> {
        let Some(item) = self.items.get(self.highlighted) else {
            return Vec::new();
        };
        let mut events = vec![RingEvent::HighlightChanged {
            index: self.highlighted,
            item: item.clone(),
        }];
        if feedback {
            events.push(RingEvent::Feedback);
        }
        events
    }
}
