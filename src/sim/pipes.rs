//! Obstacle pipeline: spawn, drift, recycle, score
//!
//! Scoring uses a manual proximity rule instead of a trigger collider: a pair
//! scores on the first tick its x lands in `(bird_x - window, bird_x]`. The
//! window has to be wider than one tick of drift or a pair can jump straight
//! over it; `GameConfig::validate` enforces that.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Hitbox, Region};
use super::timer::RepeatingTimer;
use crate::config::GameConfig;

/// Which half of a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipePiece {
    /// Hangs down from the ceiling, ends at the top of the gap
    Top,
    /// Rises from below, starts at the bottom of the gap
    Bottom,
}

/// Two pieces sharing an x, separated by the configured gap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipePair {
    pub id: u32,
    /// Center x of both pieces
    pub x: f32,
    pub gap_center: f32,
    /// Flipped once, the tick the pair passes the bird
    pub scored: bool,
}

impl PipePair {
    /// Bottom edge of the top piece
    pub fn top_edge(&self, config: &GameConfig) -> f32 {
        self.gap_center - config.pipes.half_gap()
    }

    /// Top edge of the bottom piece
    pub fn bottom_edge(&self, config: &GameConfig) -> f32 {
        self.gap_center + config.pipes.half_gap()
    }

    pub fn bounds(&self, piece: PipePiece, config: &GameConfig) -> Aabb {
        let size = config.pipes.piece_size;
        let half_w = size.x / 2.0;
        match piece {
            PipePiece::Top => {
                let bottom = self.top_edge(config);
                Aabb::new(
                    Vec2::new(self.x - half_w, bottom - size.y),
                    Vec2::new(self.x + half_w, bottom),
                )
            }
            PipePiece::Bottom => {
                let top = self.bottom_edge(config);
                Aabb::new(
                    Vec2::new(self.x - half_w, top),
                    Vec2::new(self.x + half_w, top + size.y),
                )
            }
        }
    }

    fn hitbox(&self, piece: PipePiece, config: &GameConfig) -> Hitbox {
        Hitbox {
            region: Region::Pipe {
                pair_id: self.id,
                piece,
            },
            bounds: self.bounds(piece, config),
        }
    }
}

/// The active set of pipe pairs plus the spawn timer feeding it
#[derive(Debug, Clone)]
pub struct PipeField {
    /// Active pairs, oldest (leftmost) first
    pairs: Vec<PipePair>,
    spawn_timer: RepeatingTimer,
    rng: Pcg32,
    next_id: u32,
}

impl PipeField {
    /// New pipeline with its opening pair already on screen
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        let mut field = Self::empty(config, seed);
        field.spawn(config);
        field
    }

    /// New pipeline without the opening pair
    pub fn empty(config: &GameConfig, seed: u64) -> Self {
        Self {
            pairs: Vec::new(),
            spawn_timer: RepeatingTimer::new(config.pipes.spawn_interval),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    pub fn pairs(&self) -> &[PipePair] {
        &self.pairs
    }

    pub fn spawn_timer(&self) -> &RepeatingTimer {
        &self.spawn_timer
    }

    /// Insert a pair at an explicit position, returning its id
    pub fn push_pair(&mut self, x: f32, gap_center: f32) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.pairs.push(PipePair {
            id,
            x,
            gap_center,
            scored: false,
        });
        id
    }

    /// Spawn one pair at the right edge with a random gap center
    pub fn spawn(&mut self, config: &GameConfig) -> u32 {
        let pipes = &config.pipes;
        let gap_center = self.rng.random_range(pipes.min_gap_y..=pipes.max_gap_y);
        let x = config.spawn_x();
        let id = self.push_pair(x, gap_center);
        log::debug!("Spawned pipe pair {} at x={} gap={:.1}", id, x, gap_center);
        id
    }

    /// Run the spawn timer, drift every pair, and drop the ones off screen.
    ///
    /// Returns the number of pairs spawned this tick.
    pub fn advance(&mut self, config: &GameConfig, dt: f32) -> u32 {
        let spawned = self.spawn_timer.advance(dt);
        for _ in 0..spawned {
            self.spawn(config);
        }

        let dx = config.pipes.drift_speed * dt;
        for pair in &mut self.pairs {
            pair.x += dx;
        }

        let threshold = config.pipes.offscreen_x;
        self.pairs.retain(|pair| pair.x >= threshold);

        spawned
    }

    /// Mark pairs that just crossed `bird_x`; returns how many scored
    pub fn check_scoring(&mut self, bird_x: f32, window: f32) -> u32 {
        let mut scored = 0;
        for pair in &mut self.pairs {
            if !pair.scored && pair.x <= bird_x && pair.x > bird_x - window {
                pair.scored = true;
                scored += 1;
                log::debug!("Pipe pair {} passed at x={:.1}", pair.id, pair.x);
            }
        }
        scored
    }

    /// Hitboxes of every active piece
    pub fn hitboxes<'a>(&'a self, config: &'a GameConfig) -> impl Iterator<Item = Hitbox> + 'a {
        self.pairs.iter().flat_map(move |pair| {
            [
                pair.hitbox(PipePiece::Top, config),
                pair.hitbox(PipePiece::Bottom, config),
            ]
        })
    }

    /// First pair whose right edge has not yet cleared `left`
    pub fn next_ahead(&self, left: f32, config: &GameConfig) -> Option<&PipePair> {
        let half_w = config.pipes.piece_size.x / 2.0;
        self.pairs.iter().find(|pair| pair.x + half_w >= left)
    }

    /// Stop creating pairs; existing ones keep drifting
    pub fn pause_spawning(&mut self) {
        self.spawn_timer.pause();
    }

    pub fn resume_spawning(&mut self) {
        self.spawn_timer.resume();
    }

    /// Clear everything and start a fresh spawn cycle from `seed`
    pub fn reset(&mut self, config: &GameConfig, seed: u64) {
        *self = Self::new(config, seed);
    }
}
