//! Play session and scene state
//!
//! `Scene` is the whole state machine: exactly one variant is live and it owns
//! everything that scene needs. Transitions consume the scene and hand back
//! the next one; an input that does not apply to the current scene returns it
//! unchanged.

use serde::{Deserialize, Serialize};

use super::backdrop::Backdrop;
use super::bird::Bird;
use super::collision::{Contact, OverlapProbe, detect_contact};
use super::pipes::{PipeField, PipePair};
use super::timer::Delay;
use crate::config::GameConfig;
use crate::highscores::{ScoreOutcome, load_best, record_session};
use crate::persistence::ScoreStore;

/// Feedback for the presentation layer (sound, effects, HUD)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Flapped,
    Scored { score: u32 },
    Hit { contact: Contact },
    SceneChanged { from: SceneKind, to: SceneKind },
    NewRecord { best: u32 },
}

/// Discriminant of `Scene`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneKind {
    Booting,
    Menu,
    Playing,
    Over,
}

/// One run from first frame to game over
#[derive(Debug, Clone)]
pub struct Session {
    /// Seed the obstacle RNG was started from
    pub seed: u64,
    pub bird: Bird,
    pub pipes: PipeField,
    pub backdrop: Backdrop,
    pub score: u32,
    /// Ticks since the session started
    pub time_ticks: u64,
    /// Pending switch to the game-over scene, armed on termination
    game_over_timer: Option<Delay>,
}

impl Session {
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        log::info!("Session started with seed {}", seed);
        Self {
            seed,
            bird: Bird::new(config),
            pipes: PipeField::new(config, seed),
            backdrop: Backdrop::default(),
            score: 0,
            time_ticks: 0,
            game_over_timer: None,
        }
    }

    /// Restore the fresh-session state for `seed`, dropping any pending
    /// game-over switch.
    pub fn reset(&mut self, config: &GameConfig, seed: u64) {
        self.seed = seed;
        self.bird.reset(config);
        self.pipes.reset(config, seed);
        self.backdrop = Backdrop::default();
        self.score = 0;
        self.time_ticks = 0;
        self.game_over_timer = None;
    }

    pub fn is_terminated(&self) -> bool {
        !self.bird.alive
    }

    /// Game-over switch armed and not yet consumed or cancelled
    pub fn game_over_pending(&self) -> bool {
        self.game_over_timer.as_ref().is_some_and(Delay::is_pending)
    }

    pub fn cancel_game_over(&mut self) {
        if let Some(timer) = self.game_over_timer.as_mut() {
            timer.cancel();
        }
    }

    /// End the run. Guarded by the alive flag, so only the first call in a
    /// session does anything; returns whether this call terminated.
    pub fn terminate(
        &mut self,
        config: &GameConfig,
        contact: Contact,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        if !self.bird.alive {
            return false;
        }

        log::info!("Hit {:?}, final score {}", contact, self.score);
        self.bird.die();
        self.pipes.pause_spawning();
        self.backdrop.stop();
        self.game_over_timer = Some(Delay::new(config.game_over_delay));
        events.push(GameEvent::Hit { contact });
        true
    }

    /// Advance one tick: physics, then collision, then scoring, then the
    /// game-over timer. Returns true on the tick the timer elapses.
    pub fn step(
        &mut self,
        config: &GameConfig,
        flap: bool,
        dt: f32,
        probe: &dyn OverlapProbe,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        self.time_ticks += 1;

        if flap && self.bird.flap(config) {
            events.push(GameEvent::Flapped);
        }
        self.bird.integrate(config, dt);
        self.pipes.advance(config, dt);
        self.backdrop.advance(config, dt);

        if let Some(contact) = detect_contact(&self.bird, &self.pipes, config, probe) {
            self.terminate(config, contact, events);
        }

        if self.bird.alive {
            let passed = self
                .pipes
                .check_scoring(self.bird.pos.x, config.pipes.scoring_window);
            for _ in 0..passed {
                self.score += 1;
                events.push(GameEvent::Scored { score: self.score });
            }
        }

        self.game_over_timer
            .as_mut()
            .is_some_and(|timer| timer.advance(dt))
    }
}

/// The scene state machine
#[derive(Debug, Clone)]
pub enum Scene {
    /// Waiting for the shell to finish loading assets
    Booting,
    /// Title screen, showing the stored best score
    Menu { best: u32, backdrop: Backdrop },
    Playing(Box<Session>),
    /// Results screen; keeps the finished session for drawing behind it
    Over {
        session: Box<Session>,
        outcome: ScoreOutcome,
    },
}

impl Scene {
    pub fn kind(&self) -> SceneKind {
        match self {
            Scene::Booting => SceneKind::Booting,
            Scene::Menu { .. } => SceneKind::Menu,
            Scene::Playing(_) => SceneKind::Playing,
            Scene::Over { .. } => SceneKind::Over,
        }
    }

    /// What a tap, click or Space press means in this scene
    pub fn primary_action(&self) -> Option<super::tick::InputEvent> {
        use super::tick::InputEvent;
        match self {
            Scene::Booting => None,
            Scene::Menu { .. } => Some(InputEvent::Start),
            Scene::Playing(_) => Some(InputEvent::Flap),
            Scene::Over { .. } => Some(InputEvent::Restart),
        }
    }

    /// Booting -> Menu
    pub fn assets_ready(self, store: &dyn ScoreStore) -> Scene {
        match self {
            Scene::Booting => Scene::Menu {
                best: load_best(store),
                backdrop: Backdrop::default(),
            },
            other => other,
        }
    }

    /// Menu -> Playing
    pub fn start(self, config: &GameConfig, seed: u64) -> Scene {
        match self {
            Scene::Menu { .. } => Scene::Playing(Box::new(Session::new(config, seed))),
            other => other,
        }
    }

    /// Playing -> Over, once the session has terminated. Records the best
    /// score exactly once.
    pub fn finish(self, store: &mut dyn ScoreStore) -> Scene {
        match self {
            Scene::Playing(session) if session.is_terminated() => {
                let outcome = record_session(store, session.score);
                Scene::Over { session, outcome }
            }
            other => other,
        }
    }

    /// Over -> Playing, reusing the finished session's storage
    pub fn restart(self, config: &GameConfig, seed: u64) -> Scene {
        match self {
            Scene::Over { mut session, .. } => {
                session.reset(config, seed);
                log::info!("Session restarted with seed {}", seed);
                Scene::Playing(session)
            }
            other => other,
        }
    }

    /// Over -> Menu
    pub fn return_to_menu(self, store: &dyn ScoreStore) -> Scene {
        match self {
            Scene::Over { .. } => Scene::Menu {
                best: load_best(store),
                backdrop: Backdrop::default(),
            },
            other => other,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            Scene::Playing(session) | Scene::Over { session, .. } => Some(&**session),
            _ => None,
        }
    }
}

/// Serializable view of the current scene for a renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub scene: SceneKind,
    pub score: u32,
    /// Stored best (menu) or post-session best (game over)
    pub best: Option<u32>,
    pub new_record: bool,
    pub bird: Option<Bird>,
    pub pipes: Vec<PipePair>,
    pub backdrop: Option<Backdrop>,
}

impl Snapshot {
    pub fn of(scene: &Scene) -> Self {
        let mut snapshot = Self {
            scene: scene.kind(),
            score: 0,
            best: None,
            new_record: false,
            bird: None,
            pipes: Vec::new(),
            backdrop: None,
        };

        if let Some(session) = scene.session() {
            snapshot.score = session.score;
            snapshot.bird = Some(session.bird.clone());
            snapshot.pipes = session.pipes.pairs().to_vec();
            snapshot.backdrop = Some(session.backdrop.clone());
        }

        match scene {
            Scene::Menu { best, backdrop } => {
                snapshot.best = Some(*best);
                snapshot.backdrop = Some(backdrop.clone());
            }
            Scene::Over { outcome, .. } => {
                snapshot.best = Some(outcome.best);
                snapshot.new_record = outcome.new_record;
            }
            _ => {}
        }

        snapshot
    }
}
