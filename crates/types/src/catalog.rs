//! Static session catalogs: modes, ambiances per mode, durations
//!
//! The catalog is read-only input to the wheel. The built-in catalog can be
//! replaced by a JSON file with the same shape.

use crate::item::SelectableItem;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mode that ends with a volume fade instead of a chime
pub const DEFAULT_SLEEP_MODE_ID: &str = "sleeping";

/// Shortest duration offered, in minutes
pub const MIN_DURATION_MINUTES: u32 = 5;
/// Longest duration offered, in minutes
pub const MAX_DURATION_MINUTES: u32 = 120;
/// Spacing between offered durations, in minutes
pub const DURATION_STEP_MINUTES: u32 = 5;

/// Full set of items the three rings choose from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Ring 1 items
    pub modes: Vec<SelectableItem>,
    /// Ring 2 items, keyed by mode id
    pub ambiances_by_mode: BTreeMap<String, Vec<SelectableItem>>,
    /// Ring 3 items
    #[serde(default = "default_durations")]
    pub durations: Vec<SelectableItem>,
    /// Mode id whose sessions fade out instead of chiming
    #[serde(default = "default_sleep_mode_id")]
    pub sleep_mode_id: String,
}

fn default_durations() -> Vec<SelectableItem> {
    (MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES)
        .step_by(DURATION_STEP_MINUTES as usize)
        .map(SelectableItem::minutes)
        .collect()
}

fn default_sleep_mode_id() -> String {
    DEFAULT_SLEEP_MODE_ID.to_string()
}

impl Default for Catalog {
    fn default() -> Self {
        let mut ambiances_by_mode = BTreeMap::new();

        // Relaxing: nature sounds, chime ending
        ambiances_by_mode.insert(
            "relaxing".to_string(),
            vec![
                SelectableItem::ambiance("rain", "Rain", Some("rain.mp3")),
                SelectableItem::ambiance("forest", "Forest", Some("forest.mp3")),
                SelectableItem::ambiance("birds", "Birds", Some("birds.mp3")),
                SelectableItem::ambiance("river", "River", Some("river.mp3")),
                SelectableItem::ambiance("waves", "Waves", Some("sea-wave.mp3")),
                SelectableItem::ambiance("chimes", "Chimes", Some("wind-chimes.mp3")),
                SelectableItem::ambiance("silence", "Silence", None),
            ],
        );
        // Focusing: steady textures for concentration
        ambiances_by_mode.insert(
            "focusing".to_string(),
            vec![
                SelectableItem::ambiance("rain", "Rain", Some("rain.mp3")),
                SelectableItem::ambiance("binaural", "Binaural", Some("beach-waves-binaural.mp3")),
                SelectableItem::ambiance("texture", "Texture", Some("uplifting-pad-texture.mp3")),
                SelectableItem::ambiance("handpan", "Handpan", Some("handpan-dream.mp3")),
                SelectableItem::ambiance("piano", "Piano", Some("soft-peaceful-piano.mp3")),
                SelectableItem::ambiance("forest", "Forest", Some("forest.mp3")),
            ],
        );
        // Sleeping: monotonous drones, fade ending
        ambiances_by_mode.insert(
            "sleeping".to_string(),
            vec![
                SelectableItem::ambiance("rain", "Rain", Some("rain.mp3")),
                SelectableItem::ambiance("cricket", "Cricket", Some("cricket.mp3")),
                SelectableItem::ambiance("fireplace", "Fireplace", Some("fireplace.mp3")),
                SelectableItem::ambiance("storm", "Storm", Some("thunderstorm.mp3")),
                SelectableItem::ambiance("delta", "Delta", Some("binaural-beats-delta.mp3")),
                SelectableItem::ambiance("silence", "Silence", None),
            ],
        );

        Self {
            modes: vec![
                SelectableItem::labeled("relaxing", "Relaxing"),
                SelectableItem::labeled("focusing", "Focusing"),
                SelectableItem::labeled("sleeping", "Sleeping"),
            ],
            ambiances_by_mode,
            durations: default_durations(),
            sleep_mode_id: default_sleep_mode_id(),
        }
    }
}

impl Catalog {
    /// Parse a catalog from JSON text
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        let catalog: Catalog = serde_json::from_str(text)?;
        if catalog.modes.is_empty() {
            log::warn!("Catalog defines no modes; the mode ring will show a single empty slot");
        }
        Ok(catalog)
    }

    /// Ambiances offered for `mode_id` (empty for unknown modes)
    pub fn ambiances_for(&self, mode_id: &str) -> &[SelectableItem] {
        self.ambiances_by_mode
            .get(mode_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Look up a mode by id
    pub fn mode(&self, mode_id: &str) -> Option<&SelectableItem> {
        self.modes.iter().find(|m| m.id == mode_id)
    }

    /// Look up an ambiance of a mode by id
    pub fn ambiance(&self, mode_id: &str, ambiance_id: &str) -> Option<&SelectableItem> {
        self.ambiances_for(mode_id).iter().find(|a| a.id == ambiance_id)
    }

    /// Look up a duration item by its minute value
    pub fn duration(&self, minutes: u32) -> Option<&SelectableItem> {
        self.durations.iter().find(|d| d.value == Some(minutes))
    }

    /// Whether `mode_id` uses the fade ending
    pub fn is_sleep_mode(&self, mode_id: &str) -> bool {
        self.sleep_mode_id == mode_id
    }
}
