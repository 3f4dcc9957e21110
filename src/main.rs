//! Flappy entry point
//!
//! Native: headless demo that runs autopilot sessions and prints results.
//! Web: thin shell that feeds DOM input and animation frames into the core
//! and mirrors the game state into the page.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{KeyboardEvent, MouseEvent, TouchEvent};

    use flappy::consts::SIM_DT;
    use flappy::persistence::LocalStore;
    use flappy::sim::{AssetReport, Game, GameEvent, InputEvent, Scene, SceneKind, TickInput, tick};
    use flappy::{FrameClock, GameConfig};

    /// Browser-side state around the core game
    struct Shell {
        game: Game,
        clock: FrameClock,
        input: TickInput,
        last_time: f64,
    }

    impl Shell {
        fn new(seed: u64) -> Result<Self, flappy::ConfigError> {
            let game = Game::new(GameConfig::default(), Box::new(LocalStore::new()), seed)?;
            Ok(Self {
                game,
                clock: FrameClock::new(),
                input: TickInput::default(),
                last_time: 0.0,
            })
        }

        /// Space, click and tap all mean "the obvious thing" for the scene
        fn primary(&mut self) {
            if let Some(event) = self.game.scene().primary_action() {
                self.input.push(event);
            }
        }

        /// Run the fixed ticks owed for this frame
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            self.last_time = time;

            let steps = self.clock.advance(dt);
            for _ in 0..steps {
                // Buffered input lands on the first tick only
                let input = self.input.take_one_shots();
                for event in tick(&mut self.game, &input, SIM_DT) {
                    self.on_event(&event);
                }
            }
        }

        fn on_event(&mut self, event: &GameEvent) {
            match event {
                GameEvent::SceneChanged { to, .. } => {
                    log::info!("Scene: {:?}", to);
                    if *to == SceneKind::Playing {
                        self.clock.reset();
                    }
                }
                GameEvent::NewRecord { best } => log::info!("New record: {}", best),
                GameEvent::Hit { contact } => log::info!("Hit {:?}", contact),
                // Sound cues belong to the page; nothing else to do here
                GameEvent::Flapped | GameEvent::Scored { .. } => {}
            }
        }

        /// Mirror scene state into the DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let kind = self.game.scene_kind();

            let show = |id: &str, visible: bool| {
                if let Some(el) = document.get_element_by_id(id) {
                    let _ = el.class_list().toggle_with_force("hidden", !visible);
                }
            };
            show("menu", kind == SceneKind::Menu);
            show("hud", kind == SceneKind::Playing);
            show("game-over", kind == SceneKind::Over);

            let snapshot = self.game.snapshot();
            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&snapshot.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("best") {
                let best = snapshot.best.unwrap_or(0);
                el.set_text_content(Some(&best.to_string()));
            }
            if let Scene::Over { outcome, .. } = self.game.scene() {
                show("new-record", outcome.new_record);
            } else {
                show("new-record", false);
            }

            // Renderers read the full snapshot off the canvas element
            if let Some(el) = document.get_element_by_id("canvas") {
                if let Ok(json) = serde_json::to_string(&snapshot) {
                    let _ = el.set_attribute("data-snapshot", &json);
                }
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Flappy starting...");

        let seed = js_sys::Date::now() as u64;
        let shell = match Shell::new(seed) {
            Ok(shell) => Rc::new(RefCell::new(shell)),
            Err(e) => {
                log::error!("Bad game config: {}", e);
                return;
            }
        };
        log::info!("Game initialized with seed: {}", seed);

        // The page preloads its own art and sound; the core has nothing to wait on
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            if let Some(loading) = document.get_element_by_id("loading") {
                let _ = loading.class_list().add_1("hidden");
            }
        }
        shell
            .borrow_mut()
            .input
            .push(InputEvent::AssetsReady(AssetReport::default()));

        setup_input_handlers(shell.clone());
        request_animation_frame(shell);

        log::info!("Flappy running!");
    }

    fn setup_input_handlers(shell: Rc<RefCell<Shell>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        {
            let shell = shell.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut s = shell.borrow_mut();
                match event.key().as_str() {
                    " " | "Enter" => {
                        event.prevent_default();
                        s.primary();
                    }
                    "Escape" => s.input.push(InputEvent::Menu),
                    "a" | "A" => {
                        s.input.autopilot = !s.input.autopilot;
                        log::info!("Autopilot: {}", s.input.autopilot);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse click
        {
            let shell = shell.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                shell.borrow_mut().primary();
            });
            let _ = window
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                shell.borrow_mut().primary();
            });
            let _ = window
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(shell: Rc<RefCell<Shell>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(shell, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(shell: Rc<RefCell<Shell>>, time: f64) {
        {
            let mut s = shell.borrow_mut();
            s.update(time);
            s.update_hud();
        }

        request_animation_frame(shell);
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
    log::info!("Flappy (native) starting...");
    log::info!("Native mode is a headless autopilot demo - serve the wasm build to play");

    if let Err(e) = native::run() {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::{Path, PathBuf};

    use anyhow::{Context, Result};

    use flappy::consts::SIM_DT;
    use flappy::persistence::FileStore;
    use flappy::sim::{AssetReport, Game, GameEvent, InputEvent, Scene, SceneKind, TickInput, tick};
    use flappy::{FrameClock, GameConfig};

    /// Demo sessions to play before exiting
    const SESSIONS: u32 = 3;
    /// Give up on a session after this many simulated seconds
    const SESSION_LIMIT_SECS: u32 = 120;
    /// Pretend display refresh; ticks are still fixed at SIM_DT
    const FRAME_DT: f32 = 1.0 / 30.0;

    /// Usage: flappy [config.json]
    ///
    /// `FLAPPY_SAVE` overrides the best-score file, `FLAPPY_SEED` the RNG seed.
    pub fn run() -> Result<()> {
        let config = match std::env::args().nth(1) {
            Some(path) => load_config(Path::new(&path))?,
            None => GameConfig::default(),
        };
        let save_path: PathBuf = std::env::var_os("FLAPPY_SAVE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("flappy-save.json"));
        let seed = std::env::var("FLAPPY_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1);

        let mut game = Game::new(config, Box::new(FileStore::new(&save_path)), seed)
            .context("invalid game config")?;
        log::info!("Best score file: {}", save_path.display());

        let mut clock = FrameClock::new();
        let mut input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        input.push(InputEvent::AssetsReady(AssetReport::default()));

        let mut finished = 0;
        let mut frames_in_session = 0u32;
        let frame_limit = SESSION_LIMIT_SECS * 30;

        while finished < SESSIONS {
            match game.scene_kind() {
                SceneKind::Menu => input.push(InputEvent::Start),
                SceneKind::Over => input.push(InputEvent::Restart),
                _ => {}
            }

            for _ in 0..clock.advance(FRAME_DT) {
                let tick_input = input.take_one_shots();
                for event in tick(&mut game, &tick_input, SIM_DT) {
                    match event {
                        GameEvent::Scored { score } => log::debug!("Score {}", score),
                        GameEvent::SceneChanged { to: SceneKind::Over, .. } => {
                            finished += 1;
                            frames_in_session = 0;
                            report(&game, finished);
                        }
                        _ => {}
                    }
                }
            }

            frames_in_session += 1;
            if frames_in_session > frame_limit {
                let score = game.scene().session().map_or(0, |s| s.score);
                println!(
                    "Session {} still alive after {}s with score {}, stopping",
                    finished + 1,
                    SESSION_LIMIT_SECS,
                    score
                );
                break;
            }
        }

        Ok(())
    }

    /// Read and parse a JSON config file
    fn load_config(path: &Path) -> Result<GameConfig> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = GameConfig::from_json(&json)
            .with_context(|| format!("failed to load config {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn report(game: &Game, session: u32) {
        if let Scene::Over { outcome, .. } = game.scene() {
            let record = if outcome.new_record { "  NEW RECORD!" } else { "" };
            println!(
                "Session {}: score {} (best {}){}",
                session, outcome.score, outcome.best, record
            );
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_load_config_reads_partial_json() {
            let path = std::env::temp_dir().join(format!("flappy-config-{}.json", std::process::id()));
            std::fs::write(&path, r#"{ "pipes": { "gap_height": 130 } }"#).unwrap();
            let config = load_config(&path).unwrap();
            assert_eq!(config.pipes.gap_height, 130.0);
            assert_eq!(config.width, GameConfig::default().width);
            let _ = std::fs::remove_file(&path);
        }

        #[test]
        fn test_load_config_errors_name_the_file() {
            let path = std::env::temp_dir().join("flappy-config-does-not-exist.json");
            let err = load_config(&path).unwrap_err();
            assert!(format!("{:#}", err).contains("flappy-config-does-not-exist.json"));

            let bad = std::env::temp_dir().join(format!("flappy-config-bad-{}.json", std::process::id()));
            std::fs::write(&bad, "{ nope").unwrap();
            let err = load_config(&bad).unwrap_err();
            assert!(err.downcast_ref::<flappy::ConfigError>().is_some());
            let _ = std::fs::remove_file(&bad);
        }
    }
}
