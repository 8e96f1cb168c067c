//! Catalog file loading

use anyhow::{Context, Result};
use std::path::Path;
use stillness_core::Catalog;

/// Catalog from `path`, or the built-in one when no path is configured
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    let Some(path) = path else {
        return Ok(Catalog::default());
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading catalog {}", path.display()))?;
    let catalog = Catalog::from_json(&content)
        .with_context(|| format!("parsing catalog {}", path.display()))?;
    log::info!(
        "Loaded catalog from {} ({} modes, {} durations)",
        path.display(),
        catalog.modes.len(),
        catalog.durations.len()
    );
    Ok(catalog)
}
