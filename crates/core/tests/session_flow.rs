//! End-to-end session scenarios driven through the orchestrator

mod common;

use common::{Call, Harness};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use stillness_core::{
    CenterMode, Countdown, HapticPattern, Input, LoadTicket, MediaAction, MediaMetadata,
    PlaybackState, RecallPhase, SessionState, Theme, TimerEvent, Visibility, STAGE_HIDDEN,
    STAGE_READY,
};

#[test]
fn test_full_selection_starts_playback() {
    let mut h = Harness::new();
    assert_eq!(h.app.session().state(), SessionState::Selecting);
    assert_eq!(h.app.wheel().stage(), 1);

    h.choose("relaxing", 0);
    assert_eq!(h.app.session().level(), 2);
    assert_eq!(h.app.ring(2).unwrap().items()[0].id, "rain");
    h.choose("rain", 0);
    h.choose("time-20", 0);

    // Duration confirmed: all rings expanded, waiting for play
    assert_eq!(h.app.wheel().stage(), STAGE_READY);
    assert_eq!(h.app.center_mode(), CenterMode::Ready);
    assert_eq!(h.app.session().state(), SessionState::Selecting);

    h.send(Input::Play, 0);
    assert_eq!(h.app.session().state(), SessionState::Playing);
    assert_eq!(h.app.wheel().stage(), STAGE_HIDDEN);
    assert!(h.app.timer().is_running());
    assert_eq!(h.app.timer().duration_secs(), 1200);
    assert_eq!(h.app.center_label(), "20:00");

    let ticket = h.app.current_ticket();
    assert!(h
        .calls()
        .contains(&Call::Load(PathBuf::from("sounds/rain.mp3"), ticket)));
    assert_eq!(h.count(&Call::Start), 0);
    assert!(h.calls().contains(&Call::WakeAcquire));
    assert!(h.calls().contains(&Call::Haptic(HapticPattern::Confirm)));
    assert!(h.calls().contains(&Call::PrimeChime));
    assert!(h.calls().contains(&Call::Metadata(MediaMetadata {
        title: "Relaxing Meditation".to_string(),
        artist: "Rain".to_string(),
    })));

    h.finish_load(40);
    assert_eq!(h.count(&Call::Start), 1);
}

#[test]
fn test_pause_resume_keeps_remaining() {
    let mut h = Harness::new();
    h.start("relaxing", "rain", 1, 0);
    h.finish_load(10);
    h.advance_to(15_000);
    assert_eq!(h.app.timer().remaining_secs(), 45);

    h.clear();
    h.send(Input::Pause, 15_000);
    assert_eq!(h.app.session().state(), SessionState::Paused);
    assert!(!h.app.timer().is_running());
    assert_eq!(h.app.timer().remaining_secs(), 45);
    assert!(h.calls().contains(&Call::Suspend));
    assert!(h.calls().contains(&Call::Playback(PlaybackState::Paused)));
    assert_eq!(h.app.center_mode(), CenterMode::Paused);

    // Long pause: nothing is lost
    h.advance_to(90_000);
    h.send(Input::Resume, 100_000);
    assert!(h.app.timer().is_running());
    assert_eq!(h.app.timer().remaining_secs(), 45);
    assert!(h.calls().contains(&Call::Resume));

    h.advance_to(100_500);
    assert_eq!(h.app.timer().remaining_secs(), 45);
    h.advance_to(101_000);
    assert_eq!(h.app.timer().remaining_secs(), 44);
}

#[test]
fn test_recall_edit_returns_to_overview() {
    let mut h = Harness::new();
    h.start("relaxing", "rain", 20, 0);
    h.finish_load(10);
    h.advance_to(60_000);
    assert_eq!(h.app.timer().remaining_secs(), 1140);

    h.clear();
    h.send(Input::Edit { level: 2 }, 60_000);
    assert!(h.calls().contains(&Call::Stop));
    assert!(!h.app.timer().is_running());
    assert_eq!(h.app.session().state(), SessionState::Selecting);
    assert_eq!(h.app.session().level(), 2);
    assert_eq!(h.app.session().mode().unwrap().id, "relaxing");
    assert_eq!(h.app.wheel().stage(), 2);

    let ring = h.app.ring(2).unwrap();
    assert!(ring.is_active());
    assert_eq!(ring.selected(), ring.index_of("rain"));
    assert_eq!(ring.highlighted(), ring.index_of("rain").unwrap());

    h.choose("forest", 61_000);
    assert_eq!(h.app.session().recall_phase(), Some(RecallPhase::Overview));
    assert_eq!(h.app.wheel().stage(), STAGE_READY);
    assert_eq!(h.app.center_mode(), CenterMode::Recalled);
    assert_eq!(h.app.center_label(), "Resume");
    assert_eq!(h.app.session().level(), 2);
    assert!(h.app.wheel().rings().iter().all(|r| r.is_edit_tappable()));

    let stale = h.app.current_ticket();
    h.clear();
    h.send(Input::CenterClick, 62_000);
    assert_eq!(h.app.session().state(), SessionState::Playing);
    assert_eq!(h.app.timer().remaining_secs(), 1140);
    assert!(h.app.current_ticket() > stale);
    assert!(h.calls().contains(&Call::Load(
        PathBuf::from("sounds/forest.mp3"),
        h.app.current_ticket()
    )));

    // A completion for the superseded request changes nothing
    h.send(
        Input::AmbianceLoaded {
            ticket: stale,
            outcome: Ok(()),
        },
        62_010,
    );
    assert_eq!(h.count(&Call::Start), 0);
    h.finish_load(62_020);
    assert_eq!(h.count(&Call::Start), 1);
}

#[test]
fn test_countdown_completes_exactly_once() {
    let t = Instant::now();
    let mut timer = Countdown::new();
    timer.start(10, t);

    let mut completes = 0;
    let mut ticks_after = 0;
    for s in 1..=15u64 {
        for event in timer.tick(t + Duration::from_secs(s)) {
            match event {
                TimerEvent::Complete => completes += 1,
                TimerEvent::Tick { .. } if completes > 0 && s > 10 => ticks_after += 1,
                TimerEvent::Tick { .. } => {}
            }
        }
    }
    assert_eq!(completes, 1);
    assert_eq!(ticks_after, 0);
}

#[test]
fn test_chime_ending_and_reset() {
    let mut h = Harness::new();
    h.start("relaxing", "rain", 1, 0);
    h.finish_load(10);
    let first_epoch = h.app.session().epoch();

    h.clear();
    h.advance_to(60_000);
    assert_eq!(h.app.session().state(), SessionState::Completing);
    assert_eq!(h.audio_calls(), vec![Call::Stop, Call::PlayChime]);
    assert!(!h.calls().iter().any(|c| matches!(c, Call::Fade(_))));

    h.advance_to(64_000);
    assert_eq!(h.app.session().state(), SessionState::Completing);
    h.advance_to(65_000);
    assert_eq!(h.app.session().state(), SessionState::Selecting);
    assert_eq!(h.app.session().epoch(), first_epoch + 1);
    assert_eq!(h.app.wheel().stage(), 1);
    assert!(h.app.session().mode().is_none());
    assert!(h.calls().contains(&Call::WakeRelease));
    assert!(h.calls().contains(&Call::ClearActions));
    assert_eq!(h.app.countdown(), "");
}

#[test]
fn test_back_from_ready_returns_to_duration() {
    let mut h = Harness::new();
    h.choose("focusing", 0);
    h.choose("piano", 0);
    h.choose("time-5", 0);
    assert_eq!(h.app.wheel().stage(), STAGE_READY);

    h.send(Input::Back, 10);
    assert_eq!(h.app.wheel().stage(), 3);
    assert!(h.app.pending_duration().is_none());
    assert!(h.app.ring(3).unwrap().is_active());
    assert_eq!(h.app.ring(3).unwrap().selected(), None);

    h.send(Input::Back, 20);
    assert_eq!(h.app.session().level(), 2);
    assert!(h.app.session().duration().is_none());
    assert!(h.app.ring(2).unwrap().is_active());
    assert_eq!(h.app.ring(2).unwrap().selected(), None);
}

#[test]
fn test_header_tap_navigates_or_edits() {
    let mut h = Harness::new();
    h.choose("relaxing", 0);
    h.choose("rain", 0);
    h.send(Input::HeaderTap { level: 1 }, 5);
    assert_eq!(h.app.session().level(), 1);
    assert!(h.app.session().ambiance().is_none());

    h.choose("relaxing", 10);
    h.choose("rain", 10);
    h.choose("time-5", 10);
    h.send(Input::Play, 10);
    h.send(Input::HeaderTap { level: 3 }, 1000);
    assert_eq!(h.app.session().state(), SessionState::Selecting);
    assert_eq!(h.app.session().recall().unwrap().entry_level, 3);

    // Entered at duration: confirming continues straight into playing
    h.choose("time-1", 2000);
    assert_eq!(h.app.session().state(), SessionState::Playing);
    assert_eq!(h.app.timer().duration_secs(), 60);
}

#[test]
fn test_long_press_recall_swallows_tap() {
    let mut h = Harness::new();
    h.start("relaxing", "rain", 5, 0);
    h.send(Input::ControlDown { x: 0.0, y: 0.0 }, 1000);
    h.advance_to(1499);
    assert_eq!(h.app.session().state(), SessionState::Playing);
    h.advance_to(1500);
    assert_eq!(h.app.session().state(), SessionState::Selecting);
    assert_eq!(h.app.session().level(), 3);

    h.send(Input::ControlUp { x: 0.0, y: 0.0 }, 1600);
    assert_eq!(h.app.ring(3).unwrap().selected(), h.app.ring(3).unwrap().index_of("time-5"));
    assert_eq!(h.app.session().state(), SessionState::Selecting);
    assert!(h.app.session().duration().is_some());
}

#[test]
fn test_swipe_up_on_control_zone_recalls() {
    let mut h = Harness::new();
    h.start("relaxing", "rain", 5, 0);
    h.send(Input::ControlDown { x: 50.0, y: 50.0 }, 100);
    h.send(Input::ControlMove { x: 52.0, y: 20.0 }, 150);
    assert_eq!(h.app.session().state(), SessionState::Selecting);
    assert_eq!(h.app.session().recall().unwrap().phase, RecallPhase::Editing);
}

#[test]
fn test_recall_from_header_drops_pending_press() {
    let mut h = Harness::new();
    h.start("relaxing", "rain", 5, 0);
    h.send(Input::ControlDown { x: 0.0, y: 0.0 }, 100);
    h.send(Input::HeaderTap { level: 2 }, 200);
    assert_eq!(h.app.session().recall_phase(), Some(RecallPhase::Editing));
    assert_eq!(h.app.next_deadline(), None);

    // Releasing the old press is not a tap on the now "Select" button
    h.send(Input::ControlUp { x: 0.0, y: 0.0 }, 300);
    assert_eq!(h.app.session().recall_phase(), Some(RecallPhase::Editing));
    assert_eq!(h.app.session().level(), 2);
}

#[test]
fn test_tap_on_control_zone_pauses_and_click_is_suppressed() {
    let mut h = Harness::new();
    h.start("relaxing", "rain", 5, 0);
    h.send(Input::ControlDown { x: 0.0, y: 0.0 }, 1000);
    h.send(Input::ControlUp { x: 1.0, y: 0.0 }, 1100);
    assert_eq!(h.app.session().state(), SessionState::Paused);

    // Synthetic click from the same touch
    h.send(Input::CenterClick, 1300);
    assert_eq!(h.app.session().state(), SessionState::Paused);
    h.send(Input::CenterClick, 2000);
    assert_eq!(h.app.session().state(), SessionState::Playing);
}

#[test]
fn test_overview_tap_reopens_ring() {
    let mut h = Harness::new();
    h.start("relaxing", "birds", 20, 0);
    h.send(Input::Edit { level: 2 }, 1000);
    h.send(Input::Back, 1100);
    assert_eq!(h.app.session().recall_phase(), Some(RecallPhase::Overview));

    let index = h.app.ring(1).unwrap().index_of("relaxing").unwrap();
    h.send(Input::ItemClick { level: 1, index }, 1200);
    assert_eq!(h.app.session().recall_phase(), Some(RecallPhase::Editing));
    assert_eq!(h.app.wheel().stage(), 1);
    let ring = h.app.ring(1).unwrap();
    assert_eq!(ring.visibility(), Visibility::Active);
    assert_eq!(ring.selected(), Some(index));
}

#[test]
fn test_recall_mode_change_reloads_ambiance_list() {
    let mut h = Harness::new();
    h.start("relaxing", "rain", 20, 0);
    h.send(Input::Edit { level: 1 }, 1000);
    h.choose("sleeping", 1100);
    assert_eq!(h.app.session().level(), 2);
    assert!(h.app.session().ambiance().is_none());
    assert!(h.app.ring(2).unwrap().index_of("cricket").is_some());

    h.choose("cricket", 1200);
    assert_eq!(h.app.session().recall_phase(), Some(RecallPhase::Overview));
    h.send(Input::Resume, 1300);
    assert_eq!(h.app.session().state(), SessionState::Playing);
    assert_eq!(h.app.ending(), stillness_core::EndingPolicy::Fade);
}

#[test]
fn test_mode_without_ambiances_offers_only_silence() {
    let mut catalog = common::test_catalog();
    catalog
        .ambiances_by_mode
        .insert("focusing".to_string(), Vec::new());
    let mut h = Harness::with_catalog(catalog);

    h.choose("relaxing", 0);
    assert!(h.app.ring(2).unwrap().index_of("rain").is_some());
    h.send(Input::Back, 100);
    assert_eq!(h.app.session().level(), 1);

    h.choose("focusing", 200);
    let ring = h.app.ring(2).unwrap();
    assert_eq!(ring.len(), 1);
    assert!(ring.index_of("rain").is_none());
    assert!(!ring.items()[0].has_file());

    h.send(Input::Confirm, 300);
    assert_eq!(h.app.session().level(), 3);
    let ambiance = h.app.session().ambiance().unwrap();
    assert_eq!(ambiance.id, "silence");
    assert!(!ambiance.has_file());
}

#[test]
fn test_media_keys_and_theme() {
    let mut h = Harness::new();
    h.start("focusing", "rain", 5, 0);
    h.send(Input::Media(MediaAction::Pause), 100);
    assert_eq!(h.app.session().state(), SessionState::Paused);
    h.send(Input::Media(MediaAction::Play), 200);
    assert_eq!(h.app.session().state(), SessionState::Playing);

    assert_eq!(h.app.preferences().theme, Theme::Light);
    h.send(Input::ToggleTheme, 300);
    assert_eq!(h.app.preferences().theme, Theme::Dark);
}

#[test]
fn test_load_completing_while_paused_starts_on_resume() {
    let mut h = Harness::new();
    h.start("relaxing", "rain", 5, 0);
    h.send(Input::Pause, 100);
    h.finish_load(200);
    assert_eq!(h.count(&Call::Start), 0);
    h.send(Input::Resume, 300);
    assert_eq!(h.count(&Call::Start), 1);
}

#[test]
fn test_failed_load_is_swallowed() {
    let mut h = Harness::new();
    h.start("relaxing", "rain", 5, 0);
    let ticket = h.app.current_ticket();
    h.send(
        Input::AmbianceLoaded {
            ticket,
            outcome: Err(stillness_core::AudioError::Disconnected),
        },
        50,
    );
    assert_eq!(h.count(&Call::Start), 0);
    assert_eq!(h.app.session().state(), SessionState::Playing);
    assert!(h.app.timer().is_running());
    assert_ne!(ticket, LoadTicket::default());
}

#[test]
fn test_silence_does_not_load() {
    let mut h = Harness::new();
    h.start("relaxing", "silence", 5, 0);
    assert!(!h.calls().iter().any(|c| matches!(c, Call::Load(..))));
    assert!(h.calls().contains(&Call::Metadata(MediaMetadata {
        title: "Relaxing Meditation".to_string(),
        artist: "Silence".to_string(),
    })));
}

#[test]
fn test_rotation_feedback_ticks() {
    let mut h = Harness::new();
    h.send(Input::Step { delta: 1 }, 0);
    assert_eq!(h.count(&Call::Tick), 1);
    assert_eq!(h.app.ring(1).unwrap().highlighted(), 1);

    h.send(Input::DragBegin { x: 0.0 }, 1000);
    h.send(Input::DragMove { x: 1.0 }, 1010);
    h.send(Input::DragEnd, 1020);
    assert_eq!(h.count(&Call::Tick), 1);
    assert_eq!(h.app.ring(1).unwrap().highlighted(), 1);
}
