//! Fixed timestep simulation tick
//!
//! Core game loop that advances the scene machine deterministically. Input
//! is buffered by the shell between frames and applied at the start of the
//! next tick, never mid-tick.

use super::collision::{ArcadeOverlap, OverlapProbe};
use super::state::{GameEvent, Scene, SceneKind, Snapshot};
use super::autopilot;
use crate::config::{ConfigError, GameConfig};
use crate::consts::SIM_DT;
use crate::persistence::ScoreStore;

/// What the shell's asset loader managed to load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetReport {
    pub loaded: u32,
    /// Keys of assets that failed; the game runs without them
    pub failed: Vec<String>,
}

/// A discrete player or shell intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Flap,
    Start,
    Restart,
    Menu,
    AssetsReady(AssetReport),
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Flap impulse (click/tap/space while playing)
    pub flap: bool,
    /// Leave the menu
    pub start: bool,
    /// Play again from the game-over screen
    pub restart: bool,
    /// Back to the menu from the game-over screen
    pub menu: bool,
    /// Loader finished
    pub assets: Option<AssetReport>,
    /// Idle/demo mode - the autopilot flaps
    pub autopilot: bool,
}

impl TickInput {
    /// Buffer an event. Repeats within one frame collapse into one.
    pub fn push(&mut self, event: InputEvent) {
        match event {
            InputEvent::Flap => self.flap = true,
            InputEvent::Start => self.start = true,
            InputEvent::Restart => self.restart = true,
            InputEvent::Menu => self.menu = true,
            InputEvent::AssetsReady(report) => self.assets = Some(report),
        }
    }

    /// Hand the buffered one-shot inputs to a tick, leaving modes in place
    pub fn take_one_shots(&mut self) -> TickInput {
        let taken = TickInput {
            flap: self.flap,
            start: self.start,
            restart: self.restart,
            menu: self.menu,
            assets: self.assets.take(),
            autopilot: self.autopilot,
        };
        self.flap = false;
        self.start = false;
        self.restart = false;
        self.menu = false;
        taken
    }
}

/// The scene machine plus everything it needs from outside
pub struct Game {
    config: GameConfig,
    scene: Scene,
    store: Box<dyn ScoreStore>,
    probe: Box<dyn OverlapProbe>,
    base_seed: u64,
    sessions_started: u64,
    /// Ticks since boot
    pub time_ticks: u64,
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("scene", &self.scene.kind())
            .field("base_seed", &self.base_seed)
            .field("sessions_started", &self.sessions_started)
            .field("time_ticks", &self.time_ticks)
            .finish()
    }
}

impl Game {
    /// Create a game in the Booting scene. The config is validated against
    /// the fixed timestep.
    pub fn new(config: GameConfig, store: Box<dyn ScoreStore>, seed: u64) -> Result<Self, ConfigError> {
        config.validate(SIM_DT)?;
        Ok(Self {
            config,
            scene: Scene::Booting,
            store,
            probe: Box::new(ArcadeOverlap),
            base_seed: seed,
            sessions_started: 0,
            time_ticks: 0,
        })
    }

    /// Swap in a host-supplied overlap test
    pub fn with_probe(mut self, probe: Box<dyn OverlapProbe>) -> Self {
        self.probe = probe;
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_kind(&self) -> SceneKind {
        self.scene.kind()
    }

    pub fn store(&self) -> &dyn ScoreStore {
        &*self.store
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::of(&self.scene)
    }

    fn next_seed(&mut self) -> u64 {
        let seed = self.base_seed.wrapping_add(self.sessions_started);
        self.sessions_started += 1;
        seed
    }

    /// Run a transition and report a scene change if one happened
    fn transition(&mut self, events: &mut Vec<GameEvent>, f: impl FnOnce(Scene, &mut Self) -> Scene) {
        let from = self.scene.kind();
        let scene = std::mem::replace(&mut self.scene, Scene::Booting);
        self.scene = f(scene, self);
        let to = self.scene.kind();
        if from != to {
            log::info!("Scene {:?} -> {:?}", from, to);
            events.push(GameEvent::SceneChanged { from, to });
        }
    }
}

/// Advance the game by one fixed timestep.
///
/// Within a tick: physics, then collision, then scoring, then scene
/// transitions. Returns the feedback events for the presentation layer.
///
/// `dt` must stay below `GameConfig::max_safe_dt`, or pairs can drift past
/// the scoring window unscored. Shells pass `SIM_DT`.
pub fn tick(game: &mut Game, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    debug_assert!(
        dt < game.config.max_safe_dt(),
        "tick dt {} would let pipes skip the scoring window (max {})",
        dt,
        game.config.max_safe_dt()
    );
    let mut events = Vec::new();
    game.time_ticks += 1;

    match &mut game.scene {
        Scene::Booting => {
            if let Some(report) = &input.assets {
                for key in &report.failed {
                    log::warn!("Asset failed to load, continuing without it: {}", key);
                }
                log::info!("Assets ready ({} loaded, {} failed)", report.loaded, report.failed.len());
                game.transition(&mut events, |scene, g| scene.assets_ready(&*g.store));
            }
        }

        Scene::Menu { backdrop, .. } => {
            backdrop.advance(&game.config, dt);
            if input.start {
                game.transition(&mut events, |scene, g| {
                    let seed = g.next_seed();
                    scene.start(&g.config, seed)
                });
            }
        }

        Scene::Playing(session) => {
            let flap = input.flap || (input.autopilot && autopilot::wants_flap(session, &game.config));
            let game_over = session.step(&game.config, flap, dt, &*game.probe, &mut events);
            if game_over {
                game.transition(&mut events, |scene, g| scene.finish(&mut *g.store));
                if let Scene::Over { outcome, .. } = &game.scene {
                    if outcome.new_record {
                        events.push(GameEvent::NewRecord { best: outcome.best });
                    }
                }
            }
        }

        Scene::Over { .. } => {
            if input.restart {
                game.transition(&mut events, |scene, g| {
                    let seed = g.next_seed();
                    scene.restart(&g.config, seed)
                });
            } else if input.menu {
                game.transition(&mut events, |scene, g| scene.return_to_menu(&*g.store));
            }
        }
    }

    events
}
