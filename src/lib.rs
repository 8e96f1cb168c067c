//! Stillness: a meditation timer driven by a three-ring selection wheel
//!
//! This library hosts the application layer around `stillness-core`:
//! - Configuration, preferences and catalog files
//! - Desktop adapters for the device services the session uses
//! - A headless tokio runner reading commands from stdin
//! - Wheel geometry and, with the `gtk` feature, a GTK4 window

pub mod config;
pub mod devices;
pub mod runtime;
pub mod view;

#[cfg(feature = "gtk")]
pub mod ui;

// Re-export commonly used types
pub use config::{load_catalog, AppConfig, JsonPreferences};
pub use runtime::{run_headless, HeadlessOptions, SessionScript};
