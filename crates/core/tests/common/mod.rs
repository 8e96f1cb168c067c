//! Recording fakes and a time-stepping harness around the orchestrator

#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

use stillness_core::{
    AudioService, Catalog, DeviceError, HapticPattern, Haptics, Input, LoadTicket, MediaAction,
    MediaMetadata, MediaSession, MemoryPreferences, Orchestrator, OrchestratorConfig,
    PlaybackState, SelectableItem, Services, SessionState, TickFeedback, WakeLock,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Load(PathBuf, LoadTicket),
    Start,
    Stop,
    Suspend,
    Resume,
    Fade(u64),
    PrimeChime,
    PlayChime,
    Tick,
    Haptic(HapticPattern),
    WakeAcquire,
    WakeRelease,
    Metadata(MediaMetadata),
    Playback(PlaybackState),
    RegisterActions,
    ClearActions,
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

struct FakeAudio(CallLog);

impl AudioService for FakeAudio {
    fn load_ambiance(&mut self, source: &Path, ticket: LoadTicket) {
        self.0.borrow_mut().push(Call::Load(source.to_path_buf(), ticket));
    }
    fn start_ambiance(&mut self) {
        self.0.borrow_mut().push(Call::Start);
    }
    fn stop_ambiance(&mut self) {
        self.0.borrow_mut().push(Call::Stop);
    }
    fn suspend(&mut self) {
        self.0.borrow_mut().push(Call::Suspend);
    }
    fn resume(&mut self) {
        self.0.borrow_mut().push(Call::Resume);
    }
    fn fade_out(&mut self, seconds: u64) {
        self.0.borrow_mut().push(Call::Fade(seconds));
    }
    fn prime_chime(&mut self) {
        self.0.borrow_mut().push(Call::PrimeChime);
    }
    fn play_chime(&mut self) {
        self.0.borrow_mut().push(Call::PlayChime);
    }
}

impl TickFeedback for FakeAudio {
    fn tick(&mut self) {
        self.0.borrow_mut().push(Call::Tick);
    }
}

struct FakeDevice(CallLog);

impl Haptics for FakeDevice {
    fn trigger(&mut self, pattern: HapticPattern) {
        self.0.borrow_mut().push(Call::Haptic(pattern));
    }
}

impl WakeLock for FakeDevice {
    fn acquire(&mut self) -> Result<(), DeviceError> {
        self.0.borrow_mut().push(Call::WakeAcquire);
        Ok(())
    }
    fn release(&mut self) -> Result<(), DeviceError> {
        self.0.borrow_mut().push(Call::WakeRelease);
        Ok(())
    }
}

impl MediaSession for FakeDevice {
    fn set_metadata(&mut self, metadata: &MediaMetadata) -> Result<(), DeviceError> {
        self.0.borrow_mut().push(Call::Metadata(metadata.clone()));
        Ok(())
    }
    fn set_playback_state(&mut self, state: PlaybackState) -> Result<(), DeviceError> {
        self.0.borrow_mut().push(Call::Playback(state));
        Ok(())
    }
    fn register_actions(&mut self, _actions: &[MediaAction]) -> Result<(), DeviceError> {
        self.0.borrow_mut().push(Call::RegisterActions);
        Ok(())
    }
    fn clear_actions(&mut self) -> Result<(), DeviceError> {
        self.0.borrow_mut().push(Call::ClearActions);
        Ok(())
    }
}

/// Default catalog plus short durations so sessions finish quickly
pub fn test_catalog() -> Catalog {
    let mut catalog = Catalog::default();
    catalog.durations = vec![
        SelectableItem::minutes(1),
        SelectableItem::minutes(5),
        SelectableItem::minutes(20),
    ];
    catalog
}

pub struct Harness {
    pub app: Orchestrator,
    pub calls: CallLog,
    pub t0: Instant,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_catalog(test_catalog())
    }

    pub fn with_catalog(catalog: Catalog) -> Self {
        let calls: CallLog = Rc::new(RefCell::new(Vec::new()));
        let services = Services {
            audio: Box::new(FakeAudio(Rc::clone(&calls))),
            haptics: Box::new(FakeDevice(Rc::clone(&calls))),
            wake_lock: Box::new(FakeDevice(Rc::clone(&calls))),
            media: Box::new(FakeDevice(Rc::clone(&calls))),
            preferences: Box::new(MemoryPreferences::default()),
        };
        Self {
            app: Orchestrator::new(catalog, OrchestratorConfig::default(), services),
            calls,
            t0: Instant::now(),
        }
    }

    pub fn at(&self, ms: u64) -> Instant {
        self.t0 + Duration::from_millis(ms)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Calls excluding haptics and ticks
    pub fn audio_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| {
                matches!(
                    c,
                    Call::Load(..)
                        | Call::Start
                        | Call::Stop
                        | Call::Suspend
                        | Call::Resume
                        | Call::Fade(_)
                        | Call::PrimeChime
                        | Call::PlayChime
                )
            })
            .collect()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.borrow().iter().filter(|c| *c == call).count()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn send(&mut self, input: Input, ms: u64) {
        let now = self.at(ms);
        self.app.handle(input, now);
    }

    /// Rotate the current ring to `id` and confirm it
    pub fn choose(&mut self, id: &str, ms: u64) {
        let level = self.app.session().level();
        let index = self
            .app
            .ring(level)
            .and_then(|ring| ring.index_of(id))
            .unwrap_or_else(|| panic!("{} not on ring {}", id, level));
        self.send(Input::ItemClick { level, index }, ms);
        self.send(Input::Confirm, ms);
    }

    /// Select all three levels and press play at `ms`
    pub fn start(&mut self, mode: &str, ambiance: &str, minutes: u32, ms: u64) {
        self.choose(mode, ms);
        self.choose(ambiance, ms);
        self.choose(&format!("time-{}", minutes), ms);
        self.send(Input::Play, ms);
        assert_eq!(self.app.session().state(), SessionState::Playing);
    }

    /// Report the current ambiance load as finished
    pub fn finish_load(&mut self, ms: u64) {
        let ticket = self.app.current_ticket();
        self.send(
            Input::AmbianceLoaded {
                ticket,
                outcome: Ok(()),
            },
            ms,
        );
    }

    /// Run every deadline up to and including `ms`
    pub fn advance_to(&mut self, ms: u64) {
        let target = self.at(ms);
        while let Some(deadline) = self.app.next_deadline() {
            if deadline > target {
                break;
            }
            self.app.poll(deadline);
        }
    }
}
