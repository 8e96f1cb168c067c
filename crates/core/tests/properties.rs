//! Property checks over timing, ring snapping and the session table

mod common;

use common::{Call, Harness};
use proptest::prelude::*;
use std::time::{Duration, Instant};
use stillness_core::{
    Countdown, Input, Ring, RingSettings, SelectableItem, Session, SessionEvent,
    SessionState, Visibility,
};

fn ring_with(n: usize) -> Ring {
    let mut ring = Ring::new(1, RingSettings::default());
    ring.set_items((0..n).map(|i| SelectableItem::labeled(&format!("i{}", i), "I")).collect());
    ring.set_visibility(Visibility::Active);
    ring
}

#[derive(Debug, Clone)]
enum Op {
    Begin,
    Select(u8, usize),
    Back,
    GoTo(u8),
    Pause,
    Resume,
    Edit(u8),
    EditLevel(u8),
    Complete,
    Reset,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Begin),
        (1u8..=3, 0usize..3).prop_map(|(l, i)| Op::Select(l, i)),
        Just(Op::Back),
        (0u8..=4).prop_map(Op::GoTo),
        Just(Op::Pause),
        Just(Op::Resume),
        (0u8..=4).prop_map(Op::Edit),
        (0u8..=4).prop_map(Op::EditLevel),
        Just(Op::Complete),
        Just(Op::Reset),
    ]
}

fn item_for(level: u8, index: usize) -> SelectableItem {
    match level {
        1 => SelectableItem::labeled(["relaxing", "focusing", "sleeping"][index], "Mode"),
        2 => SelectableItem::labeled(["rain", "forest", "waves"][index], "Ambiance"),
        _ => SelectableItem::minutes([1, 5, 20][index]),
    }
}

fn apply(session: &mut Session, op: &Op) -> Vec<SessionEvent> {
    match *op {
        Op::Begin => session.begin(),
        Op::Select(level, index) => session.select(level, item_for(level, index)),
        Op::Back => session.back(),
        Op::GoTo(level) => session.go_to_level(level),
        Op::Pause => session.pause(),
        Op::Resume => session.resume(),
        Op::Edit(level) => session.edit(level),
        Op::EditLevel(level) => session.edit_level(level),
        Op::Complete => session.complete(),
        Op::Reset => session.reset(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// After any drag, the settled rotation sits exactly on the highlighted slot
    #[test]
    fn prop_snap_lands_on_highlighted_slot(
        n in 1usize..24,
        moves in prop::collection::vec((-400.0f64..400.0, 1u64..80), 1..8),
    ) {
        let mut ring = ring_with(n);
        let t = Instant::now();
        let mut ms = 0;
        ring.begin_drag(0.0, t);
        for (x, dt) in &moves {
            ms += dt;
            ring.drag_to(*x, t + Duration::from_millis(ms));
        }
        ring.end_drag(t + Duration::from_millis(ms));

        let h = ring.highlighted();
        prop_assert!(h < n);
        prop_assert_eq!(ring.highlight_for(ring.rotation()), h);
        prop_assert_eq!(ring.rotation().rem_euclid(360.0), ring.slot_angle(h));
    }

    /// Every state change follows the transition table and the level stays in range
    #[test]
    fn prop_session_follows_transition_table(
        ops in prop::collection::vec(op_strategy(), 0..60),
    ) {
        let mut session = Session::new();
        for op in &ops {
            let before = session.state();
            let mut last = before;
            for event in apply(&mut session, op) {
                if let SessionEvent::StateChanged { from, to, .. } = event {
                    prop_assert_eq!(from, last);
                    prop_assert!(from.can_transition(to), "{} -> {} via {:?}", from, to, op);
                    last = to;
                }
            }
            prop_assert_eq!(session.state(), last);
            prop_assert!((1..=3).contains(&session.level()));
            if session.recall().is_some() {
                prop_assert_eq!(session.state(), SessionState::Selecting);
            }
        }
    }

    /// Pausing for any length leaves the remaining time untouched
    #[test]
    fn prop_pause_is_drift_free(
        pause_at in 1u64..60_000,
        pause_len in 0u64..3_600_000,
    ) {
        let t = Instant::now();
        let mut timer = Countdown::new();
        timer.start(60, t);
        let p = t + Duration::from_millis(pause_at);
        timer.pause(p);
        let before = timer.remaining_secs();
        timer.resume(p + Duration::from_millis(pause_len));
        prop_assert_eq!(timer.remaining_secs(), before);

        // Running time adds up to the full duration, with the pause excluded
        let end = p + Duration::from_millis(pause_len) + Duration::from_millis(60_000 - pause_at);
        timer.tick(end);
        prop_assert_eq!(timer.remaining_secs(), 0);
        prop_assert!(!timer.is_running());
    }
}

#[test]
fn test_rings_are_independent() {
    let mut h = Harness::new();
    h.choose("focusing", 0);
    let settled = h.app.ring(1).unwrap().rotation();
    h.send(Input::Step { delta: 2 }, 1000);
    assert_eq!(h.app.ring(1).unwrap().rotation(), settled);
    assert_eq!(h.app.ring(1).unwrap().selected(), h.app.ring(1).unwrap().index_of("focusing"));
    assert_eq!(h.app.ring(2).unwrap().highlighted(), 2);
    assert_eq!(h.app.ring(3).unwrap().highlighted(), 0);
    assert_eq!(h.app.ring(3).unwrap().selected(), None);
}

#[test]
fn test_sleep_mode_fades_once_without_chime() {
    let mut h = Harness::new();
    h.start("sleeping", "cricket", 1, 0);
    h.finish_load(10);

    h.advance_to(29_500);
    assert!(!h.calls().iter().any(|c| matches!(c, Call::Fade(_))));
    h.advance_to(30_000);
    assert_eq!(h.count(&Call::Fade(30)), 1);

    h.advance_to(60_000);
    assert_eq!(h.app.session().state(), SessionState::Completing);
    assert_eq!(h.calls().iter().filter(|c| matches!(c, Call::Fade(_))).count(), 1);
    assert_eq!(h.count(&Call::PlayChime), 0);
    assert_eq!(h.count(&Call::PrimeChime), 0);

    h.advance_to(69_999);
    assert_eq!(h.app.session().state(), SessionState::Completing);
    h.advance_to(70_000);
    assert_eq!(h.app.session().state(), SessionState::Selecting);
}

#[test]
fn test_sleep_mode_silence_skips_fade() {
    let mut h = Harness::new();
    h.start("sleeping", "silence", 1, 0);
    h.advance_to(60_000);
    assert_eq!(h.app.session().state(), SessionState::Completing);
    assert!(!h.calls().iter().any(|c| matches!(c, Call::Fade(_))));
    assert_eq!(h.count(&Call::PlayChime), 0);
}
