//! Circuit Racer entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, KeyboardEvent};

    use circuit_racer::platform::KeyState;
    use circuit_racer::sim::{GameEvent, GameState, Track};
    use circuit_racer::{FrameLoop, HudView, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        frame_loop: FrameLoop,
        keys: KeyState,
        /// Last text written to each slot, to skip redundant DOM writes
        last_hud: Option<HudView>,
    }

    impl Game {
        fn new(settings: Settings) -> Self {
            let mut state = GameState::new(
                Track::circuit(),
                settings.vehicle.clone(),
                settings.rules.clone(),
            );
            if settings.skip_menu {
                state.start();
            }
            Self {
                state,
                settings,
                frame_loop: FrameLoop::new(),
                keys: KeyState::new(),
                last_hud: None,
            }
        }

        /// Run simulation ticks for this frame
        fn update(&mut self, time: f64) {
            let input = self.keys.take_input();
            self.frame_loop.frame(time, &mut self.state, input);

            for event in self.state.drain_events() {
                log_event(&event);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self, document: &Document) {
            let view = HudView::from_state(&self.state, &self.settings);
            if self.last_hud.as_ref() == Some(&view) {
                return;
            }

            set_text(document, "hud-speed", &view.speed);
            set_text(document, "hud-time", &view.time);
            set_text(document, "hud-checkpoints", &view.checkpoints);
            set_text(document, "hud-laps", &view.laps.join("\n"));

            if let Some(el) = document.get_element_by_id("hud-status") {
                match &view.status {
                    Some(text) => {
                        el.set_text_content(Some(text));
                        let _ = el.set_attribute("class", "");
                    }
                    None => {
                        let _ = el.set_attribute("class", "hidden");
                    }
                }
            }

            self.last_hud = Some(view);
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn log_event(event: &GameEvent) {
        match event {
            GameEvent::SessionStarted => log::info!("Session started"),
            GameEvent::Paused => log::info!("Paused"),
            GameEvent::Resumed => log::info!("Resumed"),
            GameEvent::CheckpointPassed { index, passed, total } => {
                log::info!("Checkpoint {} ({}/{})", index, passed, total)
            }
            GameEvent::LapCompleted(lap) => {
                log::info!("Lap {} completed in {:.2}s", lap.lap, lap.seconds)
            }
            GameEvent::VehicleReset(reason) => log::info!("Vehicle reset ({:?})", reason),
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Circuit Racer starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let settings = Settings::load();
        let game = Rc::new(RefCell::new(Game::new(settings)));
        log::info!(
            "Track '{}' ready: {} checkpoints, {:.0} units per lap",
            game.borrow().state.track.name,
            game.borrow().state.session.total_checkpoints(),
            game.borrow().state.track.length()
        );

        setup_input_handlers(game.clone());
        setup_auto_pause(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Circuit Racer running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().keys.key_down(&event.key()) {
                    // Keep arrow keys from scrolling the page
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().keys.key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        use circuit_racer::sim::GamePhase;

        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    g.keys.release_all();
                    if g.settings.pause_on_blur && g.state.phase == GamePhase::Racing {
                        g.keys.request_pause();
                        log::info!("Auto-paused (tab hidden)");
                    }
                } else {
                    // rAF stopped while hidden; don't feed the gap to the accumulator
                    g.frame_loop.resync();
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.keys.release_all();
                if g.settings.pause_on_blur && g.state.phase == GamePhase::Racing {
                    g.keys.request_pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Circuit Racer (native) starting...");
    log::info!("Native mode runs the autopilot headless - build for wasm32 to drive yourself");

    // `--realtime` paces frames to the wall clock instead of simulating flat out
    let (flags, positional): (Vec<String>, Vec<String>) =
        std::env::args().skip(1).partition(|a| a.starts_with("--"));
    let realtime = flags.iter().any(|f| f == "--realtime");
    for flag in flags.iter().filter(|f| *f != "--realtime") {
        log::warn!("Ignoring unknown flag {}", flag);
    }

    let mut args = positional.into_iter();
    let settings = match args.next() {
        Some(path) => match circuit_racer::Settings::load_from_path(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path);
                settings
            }
            Err(e) => {
                log::warn!("{} - using default settings", e);
                circuit_racer::Settings::default()
            }
        },
        None => circuit_racer::Settings::default(),
    };
    let seconds = args
        .next()
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|s| *s > 0.0)
        .unwrap_or(90.0);

    let laps = if realtime {
        log::info!("Running {:.0}s in real time", seconds);
        let mut frames = circuit_racer::platform::RealtimeFrames::new(
            60.0,
            Some(std::time::Duration::from_secs_f64(seconds)),
        );
        headless::run(&settings, &mut frames)
    } else {
        let mut frames = circuit_racer::platform::FixedFrames::at_rate(60.0, seconds);
        headless::run(&settings, &mut frames)
    };

    println!("\nLap times ({:.0}s simulated):", seconds);
    if laps.is_empty() {
        println!("  no laps completed");
    }
    for line in laps {
        println!("  {}", line);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use circuit_racer::hud::format_lap;
    use circuit_racer::platform::FrameSource;
    use circuit_racer::sim::{GameEvent, GameState, TickInput, Track};
    use circuit_racer::{FrameLoop, Settings};

    /// Drive the stock circuit on autopilot until `frames` runs out
    pub fn run<S: FrameSource>(settings: &Settings, frames: &mut S) -> Vec<String> {
        let mut state = GameState::new(
            Track::circuit(),
            settings.vehicle.clone(),
            settings.rules.clone(),
        );
        let mut frame_loop = FrameLoop::new();
        let mut started = false;

        frame_loop.run(
            frames,
            &mut state,
            |_| TickInput {
                start: !std::mem::replace(&mut started, true),
                autopilot: true,
                ..Default::default()
            },
            |state, _| {
                for event in state.drain_events() {
                    match event {
                        GameEvent::LapCompleted(lap) => {
                            log::info!("Lap {} completed in {:.2}s", lap.lap, lap.seconds)
                        }
                        GameEvent::CheckpointPassed { index, passed, total } => {
                            log::debug!("Checkpoint {} ({}/{})", index, passed, total)
                        }
                        other => log::info!("{:?}", other),
                    }
                }
            },
        );

        let best = state.session.best_lap().map(|l| l.lap);
        state
            .session
            .laps
            .iter()
            .map(|lap| format_lap(lap, best == Some(lap.lap)))
            .collect()
    }
}
