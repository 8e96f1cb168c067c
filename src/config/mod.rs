//! Configuration management

mod catalog;
mod preferences;
mod settings;

pub use catalog::load_catalog;
pub use preferences::JsonPreferences;
pub use settings::AppConfig;

use anyhow::Result;
use std::path::PathBuf;

/// Per-user configuration directory
pub fn config_dir() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("com", "github.stillness", "stillness")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    Ok(dirs.config_dir().to_path_buf())
}
