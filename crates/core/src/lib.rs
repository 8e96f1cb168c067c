//! stillness-core: Selection wheel and session engine for Stillness.
//!
//! This crate holds everything between raw pointer input and the audio /
//! device services: ring physics, the three-ring wheel, the countdown, the
//! session state machine and the orchestrator that wires them together.
//! It is single-threaded and takes time as explicit `Instant`s.

pub mod constants;
mod center;
mod gesture;
mod orchestrator;
mod ring;
mod scheduler;
mod services;
mod session;
mod settings;
mod timer;
mod wheel;

pub use center::{CenterAction, CenterControl, CenterMode};
pub use gesture::{header_action, is_back_swipe, HeaderAction, HoldSwipeRecognizer, Release};
pub use orchestrator::{Input, Orchestrator, OrchestratorConfig};
pub use ring::{ease_in_out, shortest_diff, ItemPosition, Ring, RingEvent, Visibility};
pub use scheduler::{Scheduler, Task};
pub use services::{
    DeviceError, HapticPattern, Haptics, MediaAction, MediaMetadata, MediaSession,
    MemoryPreferences, PlaybackState, PreferencesStore, Services, SoundOutput, WakeLock,
};
pub use session::{
    EndingPolicy, RecallContext, RecallPhase, Session, SessionEvent, SessionState,
};
pub use settings::{RingSettings, SessionSettings};
pub use timer::{Countdown, TimerEvent};
pub use wheel::{visibility_for, WheelController, WheelEvent, RING_COUNT, STAGE_HIDDEN, STAGE_READY};

// Re-export the data and audio types used in public signatures
pub use stillness_audio::{AudioError, AudioService, AudioSettings, LoadTicket, TickFeedback};
pub use stillness_types::{Catalog, Preferences, SelectableItem, Theme};
