//! stillness-types: Shared data types for the Stillness meditation timer.
//!
//! This crate contains pure data types (catalog items, preferences, colors,
//! countdown formatting) shared across all Stillness crates. These types have
//! no audio or GTK dependencies, making them suitable as a foundation layer.

pub mod catalog;
pub mod color;
pub mod item;
pub mod preferences;
pub mod timer;

// Re-export commonly used types at the crate root for convenience
pub use catalog::{Catalog, DEFAULT_SLEEP_MODE_ID};
pub use color::{Color, Palette};
pub use item::SelectableItem;
pub use preferences::{LayoutOffsets, Preferences, Theme};
pub use timer::{format_clock, minutes_to_seconds};
