//! Drift-free countdown driven by explicit clock instants

use std::time::{Duration, Instant};
use stillness_types::format_clock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    Tick { remaining: u64, formatted: String },
    Complete,
}

/// Countdown timer.
///
/// Remaining time is always derived from clock deltas, never from counting
/// ticks, so the tick interval only affects display latency.
#[derive(Debug, Clone, Default)]
pub struct Countdown {
    duration_secs: u64,
    remaining_secs: u64,
    anchor: Option<Instant>,
    accumulated: Duration,
    running: bool,
    completed: bool,
    generation: u64,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    /// Whole seconds left as of the last start/tick/pause
    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    /// Changes on every start, pause, resume and stop
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn start(&mut self, duration_secs: u64, now: Instant) -> u64 {
        self.duration_secs = duration_secs.max(1);
        self.remaining_secs = self.duration_secs;
        self.anchor = Some(now);
        self.accumulated = Duration::ZERO;
        self.running = true;
        self.completed = false;
        self.bump();
        log::debug!("countdown started: {}s", self.duration_secs);
        self.generation
    }

    fn elapsed(&self, now: Instant) -> Duration {
        let live = self
            .anchor
            .map(|anchor| now.saturating_duration_since(anchor))
            .unwrap_or_default();
        self.accumulated + live
    }

    fn remaining_at(&self, now: Instant) -> u64 {
        let total_ms = u128::from(self.duration_secs) * 1000;
        let left_ms = total_ms.saturating_sub(self.elapsed(now).as_millis());
        left_ms.div_ceil(1000) as u64
    }

    pub fn tick(&mut self, now: Instant) -> Vec<TimerEvent> {
        if !self.running {
            return Vec::new();
        }
        self.remaining_secs = self.remaining_at(now);
        let mut events = vec![TimerEvent::Tick {
            remaining: self.remaining_secs,
            formatted: format_clock(self.remaining_secs),
        }];
        if self.remaining_secs == 0 && !self.completed {
            self.completed = true;
            self.running = false;
            self.anchor = None;
            self.bump();
            log::debug!("countdown complete");
            events.push(TimerEvent::Complete);
        }
        events
    }

    pub fn pause(&mut self, now: Instant) {
        if !self.running {
            return;
        }
        self.accumulated = self.elapsed(now);
        self.remaining_secs = self.remaining_at(now);
        self.anchor = None;
        self.running = false;
        self.bump();
    }

    pub fn resume(&mut self, now: Instant) {
        if self.running || self.completed || self.duration_secs == 0 {
            return;
        }
        self.anchor = Some(now);
        self.running = true;
        self.bump();
    }

    /// Hard reset; pending ticks become stale and `resume` does nothing
    pub fn stop(&mut self) {
        self.duration_secs = 0;
        self.running = false;
        self.anchor = None;
        self.accumulated = Duration::ZERO;
        self.bump();
    }

    fn bump(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(base: Instant, s: f64) -> Instant {
        base + Duration::from_secs_f64(s)
    }

    #[test]
    fn test_remaining_rounds_up() {
        let t = Instant::now();
        let mut timer = Countdown::new();
        timer.start(10, t);
        let events = timer.tick(secs(t, 0.4));
        assert_eq!(
            events,
            vec![TimerEvent::Tick {
                remaining: 10,
                formatted: "0:10".to_string()
            }]
        );
        timer.tick(secs(t, 1.0));
        assert_eq!(timer.remaining_secs(), 9);
    }

    #[test]
    fn test_pause_preserves_remaining() {
        let t = Instant::now();
        let mut timer = Countdown::new();
        timer.start(60, t);
        timer.pause(secs(t, 15.0));
        assert!(!timer.is_running());
        assert_eq!(timer.remaining_secs(), 45);
        assert!(timer.tick(secs(t, 100.0)).is_empty());

        timer.resume(secs(t, 100.0));
        assert!(timer.is_running());
        timer.tick(secs(t, 100.0));
        assert_eq!(timer.remaining_secs(), 45);
        timer.tick(secs(t, 110.0));
        assert_eq!(timer.remaining_secs(), 35);
    }

    #[test]
    fn test_complete_fires_once() {
        let t = Instant::now();
        let mut timer = Countdown::new();
        timer.start(2, t);
        let events = timer.tick(secs(t, 2.5));
        assert_eq!(events.last(), Some(&TimerEvent::Complete));
        assert!(timer.tick(secs(t, 3.0)).is_empty());
        timer.resume(secs(t, 3.0));
        assert!(!timer.is_running());
    }

    #[test]
    fn test_generation_changes() {
        let t = Instant::now();
        let mut timer = Countdown::new();
        let g1 = timer.start(30, t);
        timer.pause(secs(t, 1.0));
        let g2 = timer.generation();
        timer.resume(secs(t, 2.0));
        let g3 = timer.generation();
        timer.stop();
        assert!(g1 != g2 && g2 != g3 && g3 != timer.generation());
        assert!(timer.tick(secs(t, 3.0)).is_empty());
    }

    #[test]
    fn test_zero_duration_is_clamped() {
        let t = Instant::now();
        let mut timer = Countdown::new();
        timer.start(0, t);
        assert_eq!(timer.duration_secs(), 1);
    }
}
