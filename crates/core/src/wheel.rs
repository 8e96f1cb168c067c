//! Three-ring controller with progressive disclosure by stage

use crate::ring::{Ring, RingEvent, Visibility};
use crate::session::RecallPhase;
use crate::settings::RingSettings;
use std::time::Instant;
use stillness_types::SelectableItem;

pub const RING_COUNT: u8 = 3;

/// Stage where all three rings are expanded (ready to play or recall overview)
pub const STAGE_READY: u8 = 4;

/// Stage where the wheel is hidden (session running)
pub const STAGE_HIDDEN: u8 = 5;

/// Ring events tagged with the ring level
#[derive(Debug, Clone, PartialEq)]
pub enum WheelEvent {
    Highlight {
        level: u8,
        index: usize,
        item: SelectableItem,
    },
    Feedback {
        level: u8,
    },
    ActivateRequest {
        level: u8,
        index: usize,
    },
}

impl WheelEvent {
    fn from_ring(level: u8, event: RingEvent) -> Self {
        match event {
            RingEvent::HighlightChanged { index, item } => WheelEvent::Highlight { level, index, item },
            RingEvent::Feedback => WheelEvent::Feedback { level },
            RingEvent::ActivateRequest { index } => WheelEvent::ActivateRequest { level, index },
        }
    }
}

/// Visibility of ring `level` at `stage`
pub fn visibility_for(stage: u8, level: u8) -> Visibility {
    match (stage, level) {
        (1, 1) | (2, 2) | (3, 3) => Visibility::Active,
        (2, 1) | (3, 2) | (4, 2) | (4, 3) => Visibility::Expanded1,
        (3, 1) | (4, 1) => Visibility::Expanded2,
        _ => Visibility::Hidden,
    }
}

pub struct WheelController {
    rings: [Ring; RING_COUNT as usize],
    stage: u8,
    layout_pending: bool,
}

impl WheelController {
    pub fn new(settings: RingSettings) -> Self {
        let mut wheel = Self {
            rings: [
                Ring::new(1, settings.clone()),
                Ring::new(2, settings.clone()),
                Ring::new(3, settings),
            ],
            stage: 0,
            layout_pending: false,
        };
        wheel.set_stage(1, None);
        wheel
    }

    pub fn stage(&self) -> u8 {
        self.stage
    }

    pub fn ring(&self, level: u8) -> Option<&Ring> {
        self.rings.get(usize::from(level).checked_sub(1)?)
    }

    pub fn ring_mut(&mut self, level: u8) -> Option<&mut Ring> {
        self.rings.get_mut(usize::from(level).checked_sub(1)?)
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    /// The single active ring, if the stage has one
    pub fn active_ring(&self) -> Option<&Ring> {
        self.rings.iter().find(|r| r.is_active())
    }

    fn active_ring_mut(&mut self) -> Option<&mut Ring> {
        self.rings.iter_mut().find(|r| r.is_active())
    }

    pub fn set_items(&mut self, level: u8, items: Vec<SelectableItem>) {
        if let Some(ring) = self.ring_mut(level) {
            ring.set_items(items);
            self.layout_pending = true;
        }
    }

    /// Apply `stage` to every ring.
    ///
    /// A ring becoming active loses its selected marker unless a recall edit
    /// is in progress. Layout is deferred to the next `on_frame`.
    pub fn set_stage(&mut self, stage: u8, recall: Option<RecallPhase>) {
        let overview = recall == Some(RecallPhase::Overview);
        let editing = recall == Some(RecallPhase::Editing);

        for ring in self.rings.iter_mut() {
            let visibility = visibility_for(stage, ring.level());
            let becoming_active = visibility == Visibility::Active;
            if becoming_active && !editing {
                ring.clear_selected();
            }
            ring.set_visibility(visibility);
            ring.set_edit_tappable(overview && visibility != Visibility::Hidden);
        }

        if stage != self.stage {
            log::debug!("wheel stage {} -> {}", self.stage, stage);
        }
        self.stage = stage;
        self.layout_pending = true;
    }

    pub fn is_visible(&self) -> bool {
        self.stage < STAGE_HIDDEN
    }

    pub fn layout_pending(&self) -> bool {
        self.layout_pending
    }

    /// Deferred per-frame work; returns true while anything is animating
    pub fn on_frame(&mut self, now: Instant) -> bool {
        if self.layout_pending {
            for ring in self.rings.iter_mut() {
                ring.recalc_positions();
            }
            self.layout_pending = false;
        }
        let animating = self.rings.iter().any(|r| r.is_animating(now));
        for ring in self.rings.iter_mut() {
            ring.settle(now);
        }
        animating
    }

    pub fn begin_drag(&mut self, x: f64, now: Instant) {
        if let Some(ring) = self.active_ring_mut() {
            ring.begin_drag(x, now);
        }
    }

    pub fn drag_to(&mut self, x: f64, now: Instant) -> Vec<WheelEvent> {
        self.route(|ring| ring.drag_to(x, now))
    }

    pub fn end_drag(&mut self, now: Instant) -> Vec<WheelEvent> {
        self.route(|ring| ring.end_drag(now))
    }

    /// Rotate the active ring by one item (keyboard / headless control)
    pub fn step(&mut self, delta: i32, now: Instant) -> Vec<WheelEvent> {
        self.route(|ring| {
            let len = ring.len() as i64;
            if len == 0 {
                return Vec::new();
            }
            let target = (ring.highlighted() as i64 + i64::from(delta)).rem_euclid(len);
            ring.click_item(target as usize, now)
        })
    }

    pub fn click(&mut self, level: u8, index: usize, now: Instant) -> Vec<WheelEvent> {
        match self.ring_mut(level) {
            Some(ring) => ring
                .click_item(index, now)
                .into_iter()
                .map(|e| WheelEvent::from_ring(level, e))
                .collect(),
            None => Vec::new(),
        }
    }

    fn route(&mut self, op: impl FnOnce(&mut Ring) -> Vec<RingEvent>) -> Vec<WheelEvent> {
        match self.active_ring_mut() {
            Some(ring) => {
                let level = ring.level();
                op(ring)
                    .into_iter()
                    .map(|e| WheelEvent::from_ring(level, e))
                    .collect()
            }
            None => Vec::new(),
        }
    }
}
