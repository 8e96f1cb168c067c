//! Headless runner: drives the orchestrator from stdin on a tokio runtime

mod commands;

pub use commands::{describe, Command, ParseCommandError, HELP};

use crate::config::{AppConfig, JsonPreferences};
use crate::devices::{audio_backend, desktop_services};
use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use std::time::{Duration, Instant};
use stillness_audio::{AudioError, LoadListener, LoadTicket};
use stillness_core::{Catalog, Input, MemoryPreferences, Orchestrator, PreferencesStore};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Longest sleep when nothing is scheduled
const IDLE_WAIT: Duration = Duration::from_secs(3600);

/// A session to play without user interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionScript {
    pub mode: String,
    /// First ambiance of the mode when unset
    pub ambiance: Option<String>,
    pub minutes: u32,
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessOptions {
    pub script: Option<SessionScript>,
    /// Never open an audio device
    pub mute: bool,
    /// Keep preferences in memory instead of preferences.json
    pub ephemeral: bool,
}

type LoadResult = (LoadTicket, Result<(), AudioError>);

/// Listener factory that forwards audio load completions into `tx`
pub fn forward_loads(tx: UnboundedSender<LoadResult>) -> impl Fn() -> LoadListener {
    move || {
        let tx = tx.clone();
        let listener: LoadListener =
            Box::new(move |ticket: LoadTicket, outcome: Result<(), AudioError>| {
                if tx.send((ticket, outcome)).is_err() {
                    debug!("load completion {:?} after runner exit", ticket);
                }
            });
        listener
    }
}

/// Build the orchestrator with desktop services
pub fn build_app(
    config: &AppConfig,
    catalog: Catalog,
    options: &HeadlessOptions,
    make_listener: impl Fn() -> LoadListener,
) -> Result<Orchestrator> {
    let preferences: Box<dyn PreferencesStore> = if options.ephemeral {
        Box::new(MemoryPreferences::default())
    } else {
        Box::new(JsonPreferences::in_config_dir()?)
    };
    let audio = audio_backend(config, options.mute, make_listener);
    let services = desktop_services(audio, preferences);
    Ok(Orchestrator::new(catalog, config.orchestrator_config(), services))
}

/// Select every level of `script` and press play
pub fn start_scripted(app: &mut Orchestrator, script: &SessionScript, now: Instant) -> Result<()> {
    let mode = app
        .catalog()
        .mode(&script.mode)
        .ok_or_else(|| anyhow!("unknown mode '{}'", script.mode))?
        .id
        .clone();
    let ambiance = match &script.ambiance {
        Some(id) => app
            .catalog()
            .ambiance(&mode, id)
            .ok_or_else(|| anyhow!("mode '{}' has no ambiance '{}'", mode, id))?
            .id
            .clone(),
        None => app
            .catalog()
            .ambiances_for(&mode)
            .first()
            .ok_or_else(|| anyhow!("mode '{}' has no ambiances", mode))?
            .id
            .clone(),
    };
    let duration = app
        .catalog()
        .duration(script.minutes)
        .ok_or_else(|| anyhow!("no {} minute duration in the catalog", script.minutes))?
        .id
        .clone();

    for (level, id) in [(1u8, &mode), (2, &ambiance), (3, &duration)] {
        let index = app
            .ring(level)
            .and_then(|ring| ring.index_of(id))
            .with_context(|| format!("'{}' is not on ring {}", id, level))?;
        app.handle(Input::ItemClick { level, index }, now);
        app.handle(Input::Confirm, now);
    }
    app.handle(Input::Play, now);
    info!("Playing {} / {} for {} min", mode, ambiance, script.minutes);
    Ok(())
}

/// Run headless until `quit`, end of input, or the end of a scripted session
pub fn run_headless(config: AppConfig, catalog: Catalog, options: HeadlessOptions) -> Result<()> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    rt.block_on(async move {
        let (tx, rx) = unbounded_channel();
        let mut app = build_app(&config, catalog, &options, forward_loads(tx))?;
        run_loop(&mut app, rx, options.script.as_ref()).await
    })
}

async fn run_loop(
    app: &mut Orchestrator,
    mut loads: UnboundedReceiver<LoadResult>,
    script: Option<&SessionScript>,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = script.is_none();
    let mut last_status = String::new();

    let scripted_epoch = match script {
        Some(script) => {
            start_scripted(app, script, Instant::now())?;
            Some(app.session().epoch())
        }
        None => {
            println!("{}", HELP);
            None
        }
    };

    loop {
        app.poll(Instant::now());

        let status = describe(app);
        if status != last_status {
            println!("{}", status);
            last_status = status;
        }

        if scripted_epoch.is_some_and(|epoch| app.session().epoch() != epoch) {
            info!("Scripted session finished");
            return Ok(());
        }

        let wake = app
            .next_deadline()
            .unwrap_or_else(|| Instant::now() + IDLE_WAIT);

        tokio::select! {
            _ = tokio::time::sleep_until(tokio::time::Instant::from_std(wake)) => {}
            Some((ticket, outcome)) = loads.recv() => {
                app.handle(Input::AmbianceLoaded { ticket, outcome }, Instant::now());
            }
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => match line.parse::<Command>() {
                    Ok(Command::Quit) => return Ok(()),
                    Ok(Command::Help) => println!("{}", HELP),
                    Ok(Command::Status) => println!("{}", describe(app)),
                    Ok(command) => {
                        if let Some(input) = command.input() {
                            app.handle(input, Instant::now());
                        }
                    }
                    Err(e) => println!("{}", e),
                },
                Ok(None) => {
                    info!("stdin closed");
                    return Ok(());
                }
                Err(e) => {
                    warn!("Failed to read stdin: {}", e);
                    stdin_open = false;
                }
            },
        }
    }
}
