//! Session lifecycle state machine

use std::fmt;
use stillness_types::SelectableItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Selecting,
    Playing,
    Paused,
    Editing,
    Completing,
}

impl SessionState {
    pub const ALL: [SessionState; 6] = [
        SessionState::Idle,
        SessionState::Selecting,
        SessionState::Playing,
        SessionState::Paused,
        SessionState::Editing,
        SessionState::Completing,
    ];

    /// Whether `self -> to` is in the transition table
    pub fn can_transition(self, to: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, to),
            (Idle, Selecting)
                | (Selecting, Playing)
                | (Playing, Paused)
                | (Playing, Editing)
                | (Playing, Completing)
                | (Paused, Playing)
                | (Paused, Editing)
                | (Editing, Selecting)
                | (Completing, Idle)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Selecting => "selecting",
            SessionState::Playing => "playing",
            SessionState::Paused => "paused",
            SessionState::Editing => "editing",
            SessionState::Completing => "completing",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecallPhase {
    /// A ring is open for changing one setting
    Editing,
    /// All rings shown; play resumes the session
    Overview,
}

/// A settings recall started from a running session
#[derive(Debug, Clone, PartialEq)]
pub struct RecallContext {
    pub entry_level: u8,
    pub phase: RecallPhase,
    pub original_ambiance: Option<SelectableItem>,
    pub original_duration: Option<SelectableItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    StateChanged {
        from: SessionState,
        to: SessionState,
        recall: Option<RecallContext>,
    },
    LevelChanged {
        level: u8,
    },
    RecallOverview,
}

/// How a finished session ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndingPolicy {
    /// Stop the ambiance, play the chime
    Chime,
    /// Fade the ambiance out over the last seconds, no chime
    Fade,
}

impl EndingPolicy {
    pub fn for_mode(mode_id: &str, sleep_mode_id: &str) -> Self {
        if mode_id == sleep_mode_id {
            EndingPolicy::Fade
        } else {
            EndingPolicy::Chime
        }
    }
}

/// Authoritative session state.
///
/// Every mutation goes through the methods below; rejected calls log a
/// warning and return no events.
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: SessionState,
    level: u8,
    mode: Option<SelectableItem>,
    ambiance: Option<SelectableItem>,
    duration: Option<SelectableItem>,
    recall: Option<RecallContext>,
    epoch: u64,
}

impl Session {
    pub fn new() -> Self {
        Self {
            level: 1,
            ..Default::default()
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn mode(&self) -> Option<&SelectableItem> {
        self.mode.as_ref()
    }

    pub fn ambiance(&self) -> Option<&SelectableItem> {
        self.ambiance.as_ref()
    }

    pub fn duration(&self) -> Option<&SelectableItem> {
        self.duration.as_ref()
    }

    pub fn recall(&self) -> Option<&RecallContext> {
        self.recall.as_ref()
    }

    pub fn recall_phase(&self) -> Option<RecallPhase> {
        self.recall.as_ref().map(|r| r.phase)
    }

    /// Incremented by every `begin`; identifies one session run
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Selection for `level`
    pub fn selection(&self, level: u8) -> Option<&SelectableItem> {
        match level {
            1 => self.mode.as_ref(),
            2 => self.ambiance.as_ref(),
            3 => self.duration.as_ref(),
            _ => None,
        }
    }

    pub fn selection_complete(&self) -> bool {
        self.mode.is_some() && self.ambiance.is_some() && self.duration.is_some()
    }

    pub fn begin(&mut self) -> Vec<SessionEvent> {
        let Some(changed) = self.transition(SessionState::Idle, SessionState::Selecting) else {
            return Vec::new();
        };
        self.epoch += 1;
        self.level = 1;
        self.mode = None;
        self.ambiance = None;
        self.duration = None;
        self.recall = None;
        log::info!("Session {} started", self.epoch);
        vec![changed, SessionEvent::LevelChanged { level: 1 }]
    }

    /// Confirm `item` for the current level
    pub fn select(&mut self, level: u8, item: SelectableItem) -> Vec<SessionEvent> {
        if self.state != SessionState::Selecting || level != self.level {
            log::warn!(
                "select(level {}) rejected in {} at level {}",
                level,
                self.state,
                self.level
            );
            return Vec::new();
        }
        if self.recall_phase() == Some(RecallPhase::Overview) {
            log::warn!("select rejected at recall overview");
            return Vec::new();
        }

        let mode_changed = level == 1 && self.mode.as_ref().map(|m| &m.id) != Some(&item.id);
        match level {
            1 => self.mode = Some(item),
            2 => self.ambiance = Some(item),
            3 => self.duration = Some(item),
            _ => {
                log::warn!("select rejected for unknown level {}", level);
                return Vec::new();
            }
        }

        if let Some(entry_level) = self.recall.as_ref().map(|r| r.entry_level) {
            if level == 1 && mode_changed {
                // Ambiance lists are per mode
                self.ambiance = None;
                self.level = 2;
                return vec![SessionEvent::LevelChanged { level: 2 }];
            }
            if level == 3 && entry_level == 3 {
                return self.enter_playing_from(SessionState::Selecting);
            }
            if let Some(recall) = self.recall.as_mut() {
                recall.phase = RecallPhase::Overview;
            }
            log::debug!("recall overview after editing level {}", level);
            return vec![SessionEvent::RecallOverview];
        }

        if level < 3 {
            self.level = level + 1;
            vec![SessionEvent::LevelChanged { level: self.level }]
        } else {
            self.enter_playing_from(SessionState::Selecting)
        }
    }

    /// Step back one level, or from a recall edit to the overview
    pub fn back(&mut self) -> Vec<SessionEvent> {
        if self.state != SessionState::Selecting {
            log::warn!("back rejected in {}", self.state);
            return Vec::new();
        }
        match self.recall.as_mut() {
            Some(recall) if recall.phase == RecallPhase::Editing => {
                recall.phase = RecallPhase::Overview;
                return vec![SessionEvent::RecallOverview];
            }
            Some(_) => {
                log::debug!("back ignored at recall overview");
                return Vec::new();
            }
            None => {}
        }
        if self.level <= 1 {
            return Vec::new();
        }
        self.clear_from(self.level);
        self.level -= 1;
        vec![SessionEvent::LevelChanged { level: self.level }]
    }

    /// Jump back to a strictly lower level
    pub fn go_to_level(&mut self, target: u8) -> Vec<SessionEvent> {
        if self.state != SessionState::Selecting {
            log::warn!("go_to_level({}) rejected in {}", target, self.state);
            return Vec::new();
        }
        if self.recall.is_some() {
            return self.edit_level(target);
        }
        if target == 0 || target >= self.level {
            log::warn!("go_to_level({}) rejected at level {}", target, self.level);
            return Vec::new();
        }
        self.clear_from(target + 1);
        self.level = target;
        vec![SessionEvent::LevelChanged { level: target }]
    }

    pub fn pause(&mut self) -> Vec<SessionEvent> {
        self.transition(SessionState::Playing, SessionState::Paused)
            .into_iter()
            .collect()
    }

    /// Paused -> playing, or leave the recall overview into playing
    pub fn resume(&mut self) -> Vec<SessionEvent> {
        if self.state == SessionState::Selecting && self.recall_phase() == Some(RecallPhase::Overview)
        {
            return self.enter_playing_from(SessionState::Selecting);
        }
        self.transition(SessionState::Paused, SessionState::Playing)
            .into_iter()
            .collect()
    }

    /// Start a settings recall at `target_level`, keeping selections
    pub fn edit(&mut self, target_level: u8) -> Vec<SessionEvent> {
        let from = self.state;
        if !(1..=3).contains(&target_level)
            || !matches!(from, SessionState::Playing | SessionState::Paused)
        {
            log::warn!("edit({}) rejected in {}", target_level, from);
            return Vec::new();
        }

        let recall = RecallContext {
            entry_level: target_level,
            phase: RecallPhase::Editing,
            original_ambiance: self.ambiance.clone(),
            original_duration: self.duration.clone(),
        };
        let entered = self.transition(from, SessionState::Editing);
        let selecting = self.transition(SessionState::Editing, SessionState::Selecting);
        if entered.is_none() || selecting.is_none() {
            return Vec::new();
        }
        self.level = target_level;
        self.recall = Some(recall.clone());
        log::debug!("recall started at level {}", target_level);

        vec![
            SessionEvent::StateChanged {
                from,
                to: SessionState::Editing,
                recall: Some(recall.clone()),
            },
            SessionEvent::StateChanged {
                from: SessionState::Editing,
                to: SessionState::Selecting,
                recall: Some(recall),
            },
            SessionEvent::LevelChanged { level: target_level },
        ]
    }

    /// Re-open `level` from the recall overview
    pub fn edit_level(&mut self, level: u8) -> Vec<SessionEvent> {
        if self.state != SessionState::Selecting || !(1..=3).contains(&level) {
            log::warn!("edit_level({}) rejected in {}", level, self.state);
            return Vec::new();
        }
        let Some(recall) = self.recall.as_mut() else {
            log::warn!("edit_level({}) rejected outside recall", level);
            return Vec::new();
        };
        recall.phase = RecallPhase::Editing;
        self.level = level;
        vec![SessionEvent::LevelChanged { level }]
    }

    /// Countdown finished
    pub fn complete(&mut self) -> Vec<SessionEvent> {
        self.transition(SessionState::Playing, SessionState::Completing)
            .into_iter()
            .collect()
    }

    pub fn reset(&mut self) -> Vec<SessionEvent> {
        let Some(changed) = self.transition(SessionState::Completing, SessionState::Idle) else {
            return Vec::new();
        };
        log::info!("Session {} ended", self.epoch);
        self.level = 1;
        self.mode = None;
        self.ambiance = None;
        self.duration = None;
        self.recall = None;
        vec![changed]
    }

    fn enter_playing_from(&mut self, from: SessionState) -> Vec<SessionEvent> {
        let recall = self.recall.take();
        match self.transition(from, SessionState::Playing) {
            Some(SessionEvent::StateChanged { from, to, .. }) => {
                vec![SessionEvent::StateChanged { from, to, recall }]
            }
            _ => {
                self.recall = recall;
                Vec::new()
            }
        }
    }

    /// Move `expected -> to` if the table allows it and the state matches
    fn transition(&mut self, expected: SessionState, to: SessionState) -> Option<SessionEvent> {
        if self.state != expected || !self.state.can_transition(to) {
            log::warn!("Invalid session transition {} -> {}", self.state, to);
            return None;
        }
        let from = self.state;
        self.state = to;
        log::debug!("session {} -> {}", from, to);
        Some(SessionEvent::StateChanged {
            from,
            to,
            recall: None,
        })
    }

    fn clear_from(&mut self, level: u8) {
        if level <= 1 {
            self.mode = None;
        }
        if level <= 2 {
            self.ambiance = None;
        }
        if level <= 3 {
            self.duration = None;
        }
    }
}
