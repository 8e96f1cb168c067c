//! GTK4 window hosting the wheel

use super::wheel_view;
use crate::config::{AppConfig, JsonPreferences};
use crate::devices::{audio_backend, desktop_services};
use crate::view::{Hit, WheelGeometry};
use anyhow::Result;
use gtk4::gdk::Key;
use gtk4::glib;
use gtk4::prelude::*;
use gtk4::{Application, ApplicationWindow, DrawingArea, EventControllerKey, GestureDrag};
use log::{info, warn};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::mpsc;
use std::time::Instant;
use stillness_audio::{AudioError, LoadListener, LoadTicket};
use stillness_core::constants::ANIMATION_FRAME_INTERVAL;
use stillness_core::{Catalog, Input, MemoryPreferences, Orchestrator, PreferencesStore};

const APP_ID: &str = "com.github.stillness";

/// Which zone a pointer gesture started in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grab {
    None,
    Control,
    Ring,
    Other,
}

/// Pointer travel below which a drag is treated as a tap
const TAP_SLOP: f64 = 6.0;

pub fn run(config: AppConfig, catalog: Catalog, mute: bool) -> Result<()> {
    let app = Application::builder().application_id(APP_ID).build();
    let state = Rc::new(RefCell::new(Some((config, catalog))));

    app.connect_activate(move |app| {
        let Some((config, catalog)) = state.borrow_mut().take() else {
            // Second activation: just present what we have
            if let Some(window) = app.active_window() {
                window.present();
            }
            return;
        };
        build_ui(app, config, catalog, mute);
    });

    // Arguments were already parsed by clap
    app.run_with_args(&["stillness"]);
    Ok(())
}

fn build_ui(app: &Application, config: AppConfig, catalog: Catalog, mute: bool) {
    let (load_tx, load_rx) = mpsc::channel::<(LoadTicket, Result<(), AudioError>)>();
    let make_listener = move || {
        let tx = load_tx.clone();
        let listener: LoadListener =
            Box::new(move |ticket: LoadTicket, outcome: Result<(), AudioError>| {
                let _ = tx.send((ticket, outcome));
            });
        listener
    };

    let preferences: Box<dyn PreferencesStore> = match JsonPreferences::in_config_dir() {
        Ok(store) => Box::new(store),
        Err(e) => {
            warn!("Preferences will not be saved: {:#}", e);
            Box::new(MemoryPreferences::default())
        }
    };
    let audio = audio_backend(&config, mute, make_listener);
    let services = desktop_services(audio, preferences);
    let orchestrator = Rc::new(RefCell::new(Orchestrator::new(
        catalog,
        config.orchestrator_config(),
        services,
    )));

    let area = DrawingArea::new();
    area.set_hexpand(true);
    area.set_vexpand(true);
    area.set_focusable(true);

    let geometry = Rc::new(Cell::new(WheelGeometry::new(
        400.0,
        800.0,
        orchestrator.borrow().preferences().effective_layout(),
    )));

    {
        let orchestrator = orchestrator.clone();
        let geometry = geometry.clone();
        area.set_draw_func(move |_, cr, width, height| {
            let app = orchestrator.borrow();
            let g = WheelGeometry::new(
                f64::from(width),
                f64::from(height),
                app.preferences().effective_layout(),
            );
            geometry.set(g);
            wheel_view::draw(cr, &g, &app, Instant::now());
        });
    }

    attach_pointer(&area, &orchestrator, &geometry);
    attach_keys(&area, &orchestrator);

    // Frame loop: audio completions, due timers, animations
    {
        let orchestrator = orchestrator.clone();
        let area = area.clone();
        glib::timeout_add_local(ANIMATION_FRAME_INTERVAL, move || {
            let now = Instant::now();
            let mut app = orchestrator.borrow_mut();
            while let Ok((ticket, outcome)) = load_rx.try_recv() {
                app.handle(Input::AmbianceLoaded { ticket, outcome }, now);
            }
            app.poll(now);
            app.on_frame(now);
            drop(app);
            area.queue_draw();
            glib::ControlFlow::Continue
        });
    }

    let window = ApplicationWindow::builder()
        .application(app)
        .title("Stillness")
        .default_width(400)
        .default_height(800)
        .child(&area)
        .build();
    window.present();
    area.grab_focus();
    info!("Window ready");
}

fn attach_pointer(
    area: &DrawingArea,
    orchestrator: &Rc<RefCell<Orchestrator>>,
    geometry: &Rc<Cell<WheelGeometry>>,
) {
    let drag = GestureDrag::new();
    drag.set_button(0);

    let grab = Rc::new(Cell::new(Grab::None));
    let start = Rc::new(Cell::new((0.0f64, 0.0f64)));

    {
        let orchestrator = orchestrator.clone();
        let geometry = geometry.clone();
        let grab = grab.clone();
        let start = start.clone();
        drag.connect_drag_begin(move |_, x, y| {
            let now = Instant::now();
            let mut app = orchestrator.borrow_mut();
            start.set((x, y));
            let hit = geometry.get().hit_test(&app, x, y, now);
            let zone = match hit {
                Hit::Button => {
                    app.handle(Input::ControlDown { x, y }, now);
                    Grab::Control
                }
                Hit::Band | Hit::Item { .. } => {
                    app.handle(Input::DragBegin { x }, now);
                    Grab::Ring
                }
                Hit::Header { .. } | Hit::Outside => Grab::Other,
            };
            grab.set(zone);
        });
    }

    {
        let orchestrator = orchestrator.clone();
        let grab = grab.clone();
        let start = start.clone();
        drag.connect_drag_update(move |_, dx, dy| {
            let (sx, sy) = start.get();
            let input = match grab.get() {
                Grab::Control => Input::ControlMove {
                    x: sx + dx,
                    y: sy + dy,
                },
                Grab::Ring => Input::DragMove { x: sx + dx },
                Grab::None | Grab::Other => return,
            };
            orchestrator.borrow_mut().handle(input, Instant::now());
        });
    }

    {
        let orchestrator = orchestrator.clone();
        let geometry = geometry.clone();
        drag.connect_drag_end(move |_, dx, dy| {
            let now = Instant::now();
            let (sx, sy) = start.get();
            let tapped = dx.hypot(dy) < TAP_SLOP;
            let mut app = orchestrator.borrow_mut();
            match grab.replace(Grab::None) {
                Grab::Control => app.handle(
                    Input::ControlUp {
                        x: sx + dx,
                        y: sy + dy,
                    },
                    now,
                ),
                Grab::Ring => {
                    app.handle(Input::DragEnd, now);
                    if tapped {
                        if let Hit::Item { level, index } = geometry.get().hit_test(&app, sx, sy, now)
                        {
                            app.handle(Input::ItemClick { level, index }, now);
                        }
                    }
                }
                Grab::Other => {
                    if !tapped {
                        app.handle(Input::Swipe { dx, dy }, now);
                    } else if let Hit::Header { level } = geometry.get().hit_test(&app, sx, sy, now)
                    {
                        app.handle(Input::HeaderTap { level }, now);
                    }
                }
                Grab::None => {}
            }
        });
    }

    area.add_controller(drag);
}

fn attach_keys(area: &DrawingArea, orchestrator: &Rc<RefCell<Orchestrator>>) {
    let keys = EventControllerKey::new();
    let orchestrator = orchestrator.clone();
    keys.connect_key_pressed(move |_, key, _, _| {
        let input = match key {
            Key::Left => Input::Step { delta: -1 },
            Key::Right => Input::Step { delta: 1 },
            Key::Return | Key::KP_Enter | Key::space => Input::CenterClick,
            Key::Escape | Key::BackSpace => Input::Back,
            Key::t => Input::ToggleTheme,
            Key::_1 => Input::HeaderTap { level: 1 },
            Key::_2 => Input::HeaderTap { level: 2 },
            Key::_3 => Input::HeaderTap { level: 3 },
            _ => return glib::Propagation::Proceed,
        };
        orchestrator.borrow_mut().handle(input, Instant::now());
        glib::Propagation::Stop
    });
    area.add_controller(keys);
}
