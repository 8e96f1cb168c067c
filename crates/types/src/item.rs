//! Selectable catalog items shown on the wheel rings

use serde::{Deserialize, Serialize};

/// One entry on a ring: a mode, an ambiance or a duration.
///
/// Items are immutable once built; catalogs hand out clones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectableItem {
    /// Stable identifier (e.g. "sleeping", "rain", "time-20")
    pub id: String,
    /// Human-readable label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Numeric value for duration items (minutes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u32>,
    /// Unit for numeric items (defaults to "min" when displayed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Sound file for ambiance items (None = silence)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl SelectableItem {
    /// Create a labelled item without a value or file
    pub fn labeled(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: Some(label.to_string()),
            value: None,
            unit: None,
            file: None,
        }
    }

    /// Create an ambiance item backed by a sound file
    pub fn ambiance(id: &str, label: &str, file: Option<&str>) -> Self {
        Self {
            file: file.map(str::to_string),
            ..Self::labeled(id, label)
        }
    }

    /// Create a duration item of `minutes`
    pub fn minutes(minutes: u32) -> Self {
        Self {
            id: format!("time-{}", minutes),
            label: None,
            value: Some(minutes),
            unit: Some("min".to_string()),
            file: None,
        }
    }

    /// Text shown on the ring and in the header breadcrumb
    pub fn display_label(&self) -> String {
        if let Some(ref label) = self.label {
            return label.clone();
        }
        match self.value {
            Some(value) => format!("{} {}", value, self.unit.as_deref().unwrap_or("min")),
            None => self.id.clone(),
        }
    }

    /// Whether this item has an audio file to play
    pub fn has_file(&self) -> bool {
        self.file.as_deref().is_some_and(|f| !f.is_empty())
    }
}
