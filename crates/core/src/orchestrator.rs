//! Wires ring events, session transitions, the countdown and services together

use crate::center::{CenterAction, CenterControl, CenterMode};
use crate::gesture::{header_action, is_back_swipe, HeaderAction, HoldSwipeRecognizer, Release};
use crate::ring::Ring;
use crate::scheduler::{Scheduler, Task};
use crate::services::{
    log_failure, HapticPattern, MediaAction, MediaMetadata, PlaybackState, Services,
};
use crate::session::{EndingPolicy, RecallContext, RecallPhase, Session, SessionEvent, SessionState};
use crate::settings::{RingSettings, SessionSettings};
use crate::timer::{Countdown, TimerEvent};
use crate::wheel::{WheelController, WheelEvent, STAGE_HIDDEN, STAGE_READY};
use std::path::PathBuf;
use std::time::Instant;
use stillness_audio::{AudioError, AudioSettings, LoadTicket};
use stillness_types::{format_clock, minutes_to_seconds, Catalog, Preferences, SelectableItem};

/// Tuning handed to the orchestrator at construction
#[derive(Debug, Clone, Default)]
pub struct OrchestratorConfig {
    pub ring: RingSettings,
    pub session: SessionSettings,
    pub audio: AudioSettings,
}

/// Everything that can happen to a running app
#[derive(Debug)]
pub enum Input {
    DragBegin { x: f64 },
    DragMove { x: f64 },
    DragEnd,
    ItemClick { level: u8, index: usize },
    /// Rotate the active ring by whole items
    Step { delta: i32 },
    /// Pointer click on the center button
    CenterClick,
    ControlDown { x: f64, y: f64 },
    ControlMove { x: f64, y: f64 },
    ControlUp { x: f64, y: f64 },
    HeaderTap { level: u8 },
    /// Completed swipe outside the control zone
    Swipe { dx: f64, dy: f64 },
    Confirm,
    Play,
    Pause,
    Resume,
    Back,
    Edit { level: u8 },
    Media(MediaAction),
    ToggleTheme,
    AmbianceLoaded {
        ticket: LoadTicket,
        outcome: Result<(), AudioError>,
    },
}

/// Owns one session and everything driving it
pub struct Orchestrator {
    catalog: Catalog,
    config: OrchestratorConfig,
    session: Session,
    timer: Countdown,
    wheel: WheelController,
    center: CenterControl,
    hold: HoldSwipeRecognizer,
    scheduler: Scheduler,
    services: Services,
    preferences: Preferences,

    /// Duration confirmed at level 3, waiting for play
    pending_duration: Option<SelectableItem>,
    ending: EndingPolicy,
    fade_started: bool,
    countdown: String,
    recall_remaining: Option<u64>,

    load_ticket: LoadTicket,
    ambiance_ready: bool,
    ambiance_started: bool,
    /// Mode whose ambiances ring 2 currently shows
    ambiance_list_mode: Option<String>,
    shown: Option<(u8, Option<RecallPhase>)>,
}

impl Orchestrator {
    pub fn new(catalog: Catalog, config: OrchestratorConfig, mut services: Services) -> Self {
        let preferences = services.preferences.load();
        services.audio.initialize();

        let mut wheel = WheelController::new(config.ring.clone());
        wheel.set_items(1, catalog.modes.clone());
        wheel.set_items(3, catalog.durations.clone());

        let mut orchestrator = Self {
            center: CenterControl::new(config.session.click_suppress()),
            hold: HoldSwipeRecognizer::new(config.session.long_press()),
            catalog,
            config,
            session: Session::new(),
            timer: Countdown::new(),
            wheel,
            scheduler: Scheduler::new(),
            services,
            preferences,
            pending_duration: None,
            ending: EndingPolicy::Chime,
            fade_started: false,
            countdown: String::new(),
            recall_remaining: None,
            load_ticket: LoadTicket::default(),
            ambiance_ready: false,
            ambiance_started: false,
            ambiance_list_mode: None,
            shown: None,
        };
        let events = orchestrator.session.begin();
        orchestrator.apply(events, Instant::now());
        orchestrator
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn timer(&self) -> &Countdown {
        &self.timer
    }

    pub fn wheel(&self) -> &WheelController {
        &self.wheel
    }

    pub fn ring(&self, level: u8) -> Option<&Ring> {
        self.wheel.ring(level)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn ending(&self) -> EndingPolicy {
        self.ending
    }

    /// Countdown text of the running session
    pub fn countdown(&self) -> &str {
        &self.countdown
    }

    pub fn pending_duration(&self) -> Option<&SelectableItem> {
        self.pending_duration.as_ref()
    }

    pub fn current_ticket(&self) -> LoadTicket {
        self.load_ticket
    }

    pub fn center_mode(&self) -> CenterMode {
        CenterMode::derive(
            self.session.state(),
            self.session.recall_phase(),
            self.pending_duration.is_some(),
        )
    }

    pub fn center_label(&self) -> String {
        self.center_mode().label(&self.countdown)
    }

    /// Stage the wheel should show for the current session state
    pub fn derived_stage(&self) -> u8 {
        match self.session.state() {
            SessionState::Selecting => {
                if self.session.recall_phase() == Some(RecallPhase::Overview)
                    || self.pending_duration.is_some()
                {
                    STAGE_READY
                } else {
                    self.session.level()
                }
            }
            SessionState::Playing | SessionState::Paused | SessionState::Completing => STAGE_HIDDEN,
            SessionState::Editing => self.session.level(),
            SessionState::Idle => 1,
        }
    }

    /// Earliest instant at which `poll` has work
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.scheduler.next_deadline(), self.hold.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Deferred layout and animation settling; true while animating
    pub fn on_frame(&mut self, now: Instant) -> bool {
        self.wheel.on_frame(now)
    }

    /// Run due timer ticks, resets and long-press deadlines
    pub fn poll(&mut self, now: Instant) {
        if self.hold.poll(now) {
            self.edit(3, now);
        }
        for task in self.scheduler.take_due(now) {
            match task {
                Task::TimerTick { generation } => self.on_timer_tick(generation, now),
                Task::Reset { epoch } => self.on_reset(epoch, now),
            }
        }
    }

    pub fn handle(&mut self, input: Input, now: Instant) {
        log::trace!("input {:?}", input);
        match input {
            Input::DragBegin { x } => self.wheel.begin_drag(x, now),
            Input::DragMove { x } => {
                let events = self.wheel.drag_to(x, now);
                self.on_wheel(events, now);
            }
            Input::DragEnd => {
                let events = self.wheel.end_drag(now);
                self.on_wheel(events, now);
            }
            Input::ItemClick { level, index } => {
                let events = self.wheel.click(level, index, now);
                self.on_wheel(events, now);
            }
            Input::Step { delta } => {
                let events = self.wheel.step(delta, now);
                self.on_wheel(events, now);
            }
            Input::CenterClick => {
                if let Some(action) = self.center.click(self.center_mode(), now) {
                    self.dispatch(action, now);
                }
            }
            Input::ControlDown { x, y } => {
                let arm = self.session_running();
                self.hold.pointer_down(x, y, arm, now);
            }
            Input::ControlMove { x, y } => {
                if self.hold.pointer_move(x, y) && self.session_running() {
                    self.edit(3, now);
                }
            }
            Input::ControlUp { x, y } => {
                if self.hold.pointer_up(x, y) == Release::Tap {
                    let action = self.center.touch_tap(self.center_mode(), now);
                    self.dispatch(action, now);
                }
            }
            Input::HeaderTap { level } => self.header_tap(level, now),
            Input::Swipe { dx, dy } => {
                if self.session.state() == SessionState::Selecting && is_back_swipe(dx, dy) {
                    self.back(now);
                }
            }
            Input::Confirm => self.confirm(now),
            Input::Play => self.play(now),
            Input::Pause => self.pause(now),
            Input::Resume => self.resume(now),
            Input::Back => self.back(now),
            Input::Edit { level } => self.edit(level, now),
            Input::Media(MediaAction::Play) => self.resume(now),
            Input::Media(MediaAction::Pause) => self.pause(now),
            Input::ToggleTheme => self.toggle_theme(),
            Input::AmbianceLoaded { ticket, outcome } => self.on_ambiance_loaded(ticket, outcome),
        }
    }

    fn session_running(&self) -> bool {
        matches!(
            self.session.state(),
            SessionState::Playing | SessionState::Paused
        )
    }

    fn dispatch(&mut self, action: CenterAction, now: Instant) {
        log::debug!("center action {:?}", action);
        match action {
            CenterAction::Confirm => self.confirm(now),
            CenterAction::Play => self.play(now),
            CenterAction::Pause => self.pause(now),
            CenterAction::Resume => self.resume(now),
        }
    }

    fn confirm(&mut self, now: Instant) {
        if self.session.state() != SessionState::Selecting
            || self.session.recall_phase() == Some(RecallPhase::Overview)
            || self.pending_duration.is_some()
        {
            log::debug!("confirm ignored in {}", self.session.state());
            return;
        }
        let level = self.session.level();
        let Some(item) = self
            .wheel
            .ring_mut(level)
            .and_then(|ring| ring.confirm_selection().cloned())
        else {
            return;
        };
        self.services.haptics.trigger(HapticPattern::Light);

        if level == 3 && self.session.recall().is_none() {
            log::debug!("duration {} confirmed, ready to play", item.id);
            self.pending_duration = Some(item);
            self.sync_stage();
            return;
        }
        let events = self.session.select(level, item);
        self.apply(events, now);
    }

    fn play(&mut self, now: Instant) {
        if self.session.recall_phase() == Some(RecallPhase::Overview) {
            let events = self.session.resume();
            self.apply(events, now);
        } else if let Some(item) = self.pending_duration.take() {
            let events = self.session.select(3, item);
            self.apply(events, now);
        } else {
            log::debug!("play ignored in {}", self.session.state());
        }
    }

    fn pause(&mut self, now: Instant) {
        let events = self.session.pause();
        self.apply(events, now);
    }

    fn resume(&mut self, now: Instant) {
        let events = self.session.resume();
        self.apply(events, now);
    }

    fn back(&mut self, now: Instant) {
        if self.session.state() == SessionState::Selecting && self.pending_duration.take().is_some()
        {
            if let Some(ring) = self.wheel.ring_mut(3) {
                ring.clear_selected();
            }
            self.sync_stage();
            return;
        }
        let events = self.session.back();
        self.apply(events, now);
    }

    fn edit(&mut self, level: u8, now: Instant) {
        let events = self.session.edit(level);
        self.apply(events, now);
    }

    fn header_tap(&mut self, level: u8, now: Instant) {
        match header_action(self.session.state(), level) {
            Some(HeaderAction::Edit(level)) => self.edit(level, now),
            Some(HeaderAction::GoTo(level)) => {
                if self.pending_duration.is_some() {
                    self.back(now);
                    if level == 3 {
                        return;
                    }
                }
                let events = self.session.go_to_level(level);
                self.apply(events, now);
            }
            None => {}
        }
    }

    fn toggle_theme(&mut self) {
        self.preferences.theme = self.preferences.theme.toggled();
        log::info!("Theme set to {:?}", self.preferences.theme);
        log_failure(
            "saving preferences",
            self.services.preferences.save(&self.preferences),
        );
    }

    fn on_wheel(&mut self, events: Vec<WheelEvent>, now: Instant) {
        for event in events {
            match event {
                WheelEvent::Highlight { level, index, item } => {
                    log::trace!("ring {} highlights {} ({})", level, index, item.id);
                }
                WheelEvent::Feedback { .. } => {
                    self.services.audio.tick();
                    self.services.haptics.trigger(HapticPattern::Light);
                }
                WheelEvent::ActivateRequest { level, .. } => {
                    let events = self.session.edit_level(level);
                    self.apply(events, now);
                }
            }
        }
    }

    fn apply(&mut self, events: Vec<SessionEvent>, now: Instant) {
        for event in events {
            match event {
                SessionEvent::StateChanged { from, to, recall } => {
                    self.on_state_changed(from, to, recall, now)
                }
                SessionEvent::LevelChanged { level } => self.on_level_changed(level),
                SessionEvent::RecallOverview => self.show_selections(),
            }
        }
        self.sync_stage();
    }

    fn on_state_changed(
        &mut self,
        from: SessionState,
        to: SessionState,
        recall: Option<RecallContext>,
        now: Instant,
    ) {
        match (from, to) {
            (SessionState::Selecting, SessionState::Playing) => match recall {
                Some(context) => self.leave_recall(&context, now),
                None => self.start_session(now),
            },
            (SessionState::Playing, SessionState::Paused) => {
                self.timer.pause(now);
                self.services.audio.suspend();
                self.services.haptics.trigger(HapticPattern::Medium);
                log_failure(
                    "media state",
                    self.services.media.set_playback_state(PlaybackState::Paused),
                );
            }
            (SessionState::Paused, SessionState::Playing) => {
                self.timer.resume(now);
                self.services.audio.resume();
                if self.ambiance_ready && !self.ambiance_started {
                    self.start_ambiance();
                }
                log_failure(
                    "media state",
                    self.services.media.set_playback_state(PlaybackState::Playing),
                );
                self.schedule_tick(now);
            }
            (_, SessionState::Editing) => self.enter_recall(now),
            (SessionState::Playing, SessionState::Completing) => self.finish(now),
            _ => {}
        }
    }

    fn on_level_changed(&mut self, level: u8) {
        if level == 2 {
            self.refresh_ambiances();
        }
        if self.session.recall_phase() == Some(RecallPhase::Editing) {
            // Show the existing choice on the re-opened ring
            let selected = self.session.selection(level).map(|item| item.id.clone());
            if let (Some(id), Some(ring)) = (selected, self.wheel.ring_mut(level)) {
                if let Some(index) = ring.index_of(&id) {
                    ring.set_highlighted(index);
                    ring.set_selected(index);
                }
            }
        }
    }

    /// Mark every ring with the session's choice for its level
    fn show_selections(&mut self) {
        for level in 1..=3u8 {
            let selected = self.session.selection(level).map(|item| item.id.clone());
            if let Some(ring) = self.wheel.ring_mut(level) {
                match selected.and_then(|id| ring.index_of(&id)) {
                    Some(index) => ring.set_selected(index),
                    None => ring.clear_selected(),
                }
            }
        }
    }

    fn refresh_ambiances(&mut self) {
        let Some(mode_id) = self.session.mode().map(|m| m.id.clone()) else {
            return;
        };
        if self.ambiance_list_mode.as_deref() == Some(mode_id.as_str()) {
            return;
        }
        let mut items = self.catalog.ambiances_for(&mode_id).to_vec();
        if items.is_empty() {
            // A stale list from the previous mode must not stay selectable
            log::warn!("No ambiances for mode {}, offering silence", mode_id);
            items.push(SelectableItem::ambiance("silence", "Silence", None));
        }
        self.wheel.set_items(2, items);
        self.ambiance_list_mode = Some(mode_id);
    }

    fn sync_stage(&mut self) {
        let stage = self.derived_stage();
        let recall = self.session.recall_phase();
        if self.shown != Some((stage, recall)) {
            self.wheel.set_stage(stage, recall);
            self.shown = Some((stage, recall));
        }
    }

    fn playing_items(&self) -> (String, Option<SelectableItem>, u64) {
        let mode = self
            .session
            .mode()
            .map(|m| m.display_label())
            .unwrap_or_default();
        let ambiance = self.session.ambiance().cloned();
        let seconds = self
            .session
            .duration()
            .and_then(|d| d.value)
            .map(minutes_to_seconds)
            .unwrap_or(0);
        (mode, ambiance, seconds)
    }

    fn start_session(&mut self, now: Instant) {
        self.pending_duration = None;
        self.services.haptics.trigger(HapticPattern::Confirm);
        log_failure("wake lock", self.services.wake_lock.acquire());
        self.choose_ending();
        self.publish_media();
        log_failure(
            "media actions",
            self.services
                .media
                .register_actions(&[MediaAction::Play, MediaAction::Pause]),
        );

        let (mode, ambiance, seconds) = self.playing_items();
        log::info!(
            "Playing {} / {} for {}",
            mode,
            ambiance.as_ref().map(|a| a.id.as_str()).unwrap_or("-"),
            format_clock(seconds)
        );
        self.request_ambiance();
        self.start_countdown(seconds, now);
    }

    fn choose_ending(&mut self) {
        let mode_id = self.session.mode().map(|m| m.id.as_str()).unwrap_or_default();
        self.ending = EndingPolicy::for_mode(mode_id, &self.catalog.sleep_mode_id);
        if self.ending == EndingPolicy::Chime {
            self.services.audio.prime_chime();
        }
    }

    fn publish_media(&mut self) {
        let (mode, ambiance, _) = self.playing_items();
        let artist = match ambiance {
            Some(item) if item.has_file() => item.display_label(),
            _ => "Silence".to_string(),
        };
        let metadata = MediaMetadata {
            title: format!("{} Meditation", mode),
            artist,
        };
        log_failure("media metadata", self.services.media.set_metadata(&metadata));
        log_failure(
            "media state",
            self.services.media.set_playback_state(PlaybackState::Playing),
        );
    }

    fn start_countdown(&mut self, seconds: u64, now: Instant) {
        self.timer.start(seconds, now);
        self.countdown = format_clock(self.timer.remaining_secs());
        self.fade_started = false;
        self.schedule_tick(now);
    }

    fn schedule_tick(&mut self, now: Instant) {
        let generation = self.timer.generation();
        self.scheduler.cancel(|task| matches!(task, Task::TimerTick { .. }));
        self.scheduler.schedule(
            now + self.config.session.tick_interval(),
            Task::TimerTick { generation },
        );
    }

    /// Release the current ambiance and load the session's one, if it has a file
    fn request_ambiance(&mut self) {
        self.services.audio.stop_ambiance();
        self.load_ticket = self.load_ticket.next();
        self.ambiance_ready = false;
        self.ambiance_started = false;

        let file = self
            .session
            .ambiance()
            .filter(|a| a.has_file())
            .and_then(|a| a.file.clone());
        if let Some(file) = file {
            let path: PathBuf = self.config.audio.resolve(&file);
            log::debug!("loading ambiance {:?} ({:?})", path, self.load_ticket);
            self.services.audio.load_ambiance(&path, self.load_ticket);
        }
    }

    fn on_ambiance_loaded(&mut self, ticket: LoadTicket, outcome: Result<(), AudioError>) {
        if ticket != self.load_ticket {
            log::debug!("ignoring stale ambiance load {:?}", ticket);
            return;
        }
        if let Err(e) = outcome {
            log::warn!("Ambiance unavailable: {}", e);
            return;
        }
        self.ambiance_ready = true;
        if self.session.state() == SessionState::Playing {
            self.start_ambiance();
        }
    }

    fn start_ambiance(&mut self) {
        self.services.audio.start_ambiance();
        self.ambiance_started = true;
    }

    fn enter_recall(&mut self, now: Instant) {
        self.hold.cancel();
        self.timer.pause(now);
        self.recall_remaining = Some(self.timer.remaining_secs());
        self.timer.stop();
        self.scheduler.cancel(|task| matches!(task, Task::TimerTick { .. }));

        self.services.audio.stop_ambiance();
        self.load_ticket = self.load_ticket.next();
        self.ambiance_ready = false;
        self.ambiance_started = false;
        log_failure(
            "media state",
            self.services.media.set_playback_state(PlaybackState::Paused),
        );
        log::debug!("recall entered with {:?}s left", self.recall_remaining);
    }

    fn leave_recall(&mut self, context: &RecallContext, now: Instant) {
        let (_, _, full) = self.playing_items();
        let duration_changed = context.original_duration.as_ref().map(|d| &d.id)
            != self.session.duration().map(|d| &d.id);
        let remaining = self.recall_remaining.take();
        let seconds = match remaining {
            Some(left) if !duration_changed && left > 0 => left,
            _ => full,
        };

        self.services.audio.resume();
        self.choose_ending();
        self.publish_media();
        self.request_ambiance();
        self.start_countdown(seconds, now);
        log::info!("Session resumed with {}", format_clock(seconds));
    }

    fn on_timer_tick(&mut self, generation: u64, now: Instant) {
        if generation != self.timer.generation() {
            log::trace!("stale timer tick {}", generation);
            return;
        }
        for event in self.timer.tick(now) {
            match event {
                TimerEvent::Tick {
                    remaining,
                    formatted,
                } => {
                    self.countdown = formatted;
                    self.maybe_fade(remaining);
                }
                TimerEvent::Complete => {
                    let events = self.session.complete();
                    self.apply(events, now);
                }
            }
        }
        if self.timer.is_running() {
            self.schedule_tick(now);
        }
    }

    fn maybe_fade(&mut self, remaining: u64) {
        if self.ending != EndingPolicy::Fade
            || self.fade_started
            || remaining > self.config.session.fade_threshold_secs
        {
            return;
        }
        self.fade_started = true;
        let has_file = self.session.ambiance().is_some_and(|a| a.has_file());
        if has_file && remaining > 0 {
            log::debug!("fading ambiance over {}s", remaining);
            self.services.audio.fade_out(remaining);
        }
    }

    fn finish(&mut self, now: Instant) {
        let delay = match self.ending {
            EndingPolicy::Chime => {
                self.services.audio.stop_ambiance();
                self.services.audio.play_chime();
                self.config.session.chime_reset_delay()
            }
            EndingPolicy::Fade => self.config.session.fade_reset_delay(),
        };
        log::info!("Session complete ({:?} ending)", self.ending);
        self.scheduler.schedule(
            now + delay,
            Task::Reset {
                epoch: self.session.epoch(),
            },
        );
    }

    fn on_reset(&mut self, epoch: u64, now: Instant) {
        if epoch != self.session.epoch() || self.session.state() != SessionState::Completing {
            log::debug!("ignoring stale reset for session {}", epoch);
            return;
        }
        self.services.audio.stop_ambiance();
        self.load_ticket = self.load_ticket.next();
        self.ambiance_ready = false;
        self.ambiance_started = false;
        log_failure("wake lock", self.services.wake_lock.release());
        log_failure("media actions", self.services.media.clear_actions());
        log_failure(
            "media state",
            self.services.media.set_playback_state(PlaybackState::None),
        );
        self.countdown.clear();
        self.hold.cancel();
        self.pending_duration = None;
        self.recall_remaining = None;
        for level in 1..=3u8 {
            if let Some(ring) = self.wheel.ring_mut(level) {
                ring.clear_selected();
            }
        }

        let mut events = self.session.reset();
        events.extend(self.session.begin());
        self.apply(events, now);
    }
}
