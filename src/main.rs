use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;
use stillness::{load_catalog, run_headless, AppConfig, HeadlessOptions, SessionScript};
use stillness_core::Catalog;

/// Stillness - a meditation timer with a three-ring selection wheel
#[derive(Parser, Debug, Clone)]
#[command(name = "stillness")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Debug verbosity level (0=quiet, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "0")]
    debug: u8,

    /// Config file to use instead of the per-user one
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Run without a window, reading commands from stdin
    #[arg(long = "headless")]
    headless: bool,

    /// Never open an audio device
    #[arg(short = 'm', long = "mute")]
    mute: bool,

    /// Play a session unattended in this mode (implies --headless)
    #[arg(long = "mode", value_name = "ID")]
    mode: Option<String>,

    /// Ambiance for --mode (defaults to the mode's first)
    #[arg(long = "ambiance", value_name = "ID", requires = "mode")]
    ambiance: Option<String>,

    /// Minutes for --mode
    #[arg(long = "duration", value_name = "MIN", default_value = "10")]
    duration: u32,

    /// List modes, ambiances and durations, then exit
    #[arg(short = 'l', long = "list")]
    list: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Level 0 (default): warn only
    // Level 1: info
    // Level 2: debug
    // Level 3+: trace
    let log_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Allow RUST_LOG to override CLI setting
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    info!("Starting Stillness v{}", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load().unwrap_or_else(|e| {
            warn!("Failed to load config, using defaults: {:#}", e);
            AppConfig::default()
        }),
    };
    let catalog = load_catalog(config.catalog_path.as_deref()).context("Failed to load catalog")?;

    if cli.list {
        print_catalog(&catalog);
        return Ok(());
    }

    let script = cli.mode.clone().map(|mode| SessionScript {
        mode,
        ambiance: cli.ambiance.clone(),
        minutes: cli.duration,
    });

    #[cfg(feature = "gtk")]
    if !cli.headless && script.is_none() {
        return stillness::ui::run(config, catalog, cli.mute);
    }
    #[cfg(not(feature = "gtk"))]
    if !cli.headless && script.is_none() {
        info!("Built without the gtk feature, running headless");
    }

    let options = HeadlessOptions {
        script,
        mute: cli.mute,
        ephemeral: false,
    };
    run_headless(config, catalog, options)
}

/// Print the catalog to stdout
fn print_catalog(catalog: &Catalog) {
    println!("Modes:");
    for mode in &catalog.modes {
        let ending = if catalog.is_sleep_mode(&mode.id) {
            "fade"
        } else {
            "chime"
        };
        println!("  {} - {} ({} ending)", mode.id, mode.display_label(), ending);
        for ambiance in catalog.ambiances_for(&mode.id) {
            let file = ambiance.file.as_deref().unwrap_or("no sound");
            println!("      {} - {} [{}]", ambiance.id, ambiance.display_label(), file);
        }
    }
    println!();
    let minutes: Vec<String> = catalog
        .durations
        .iter()
        .filter_map(|d| d.value.map(|v| v.to_string()))
        .collect();
    println!("Durations (min): {}", minutes.join(", "));
}
