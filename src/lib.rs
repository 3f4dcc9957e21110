//! Flappy - a single-screen reflex game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacles, collisions, scenes)
//! - `config`: Data-driven game tuning
//! - `persistence`: Best-score storage backends
//! - `highscores`: Best-score read/maximize/write protocol

pub mod config;
pub mod highscores;
pub mod persistence;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use highscores::{BEST_SCORE_KEY, ScoreOutcome};
pub use persistence::{MemoryStore, ScoreStore, StoreError};

/// Game timing constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest real frame delta a shell feeds into the accumulator (seconds)
    pub const MAX_FRAME_DELTA: f32 = 0.1;
}

/// Fixed-timestep accumulator shared by the native and browser shells.
///
/// Real frame time goes in, a whole number of `SIM_DT` ticks comes out.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { accumulator: 0.0 }
    }

    /// Add a frame's real duration and return how many fixed ticks to run
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        use consts::*;

        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DELTA);

        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        // Drop whatever the substep cap left behind
        if steps == MAX_SUBSTEPS {
            self.accumulator = 0.0;
        }
        steps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consts::*;

    #[test]
    fn test_frame_clock_steps() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(SIM_DT * 0.5), 0);
        assert_eq!(clock.advance(SIM_DT * 0.6), 1);
        assert_eq!(clock.advance(SIM_DT * 3.0), 3);
    }

    #[test]
    fn test_frame_clock_clamps_long_frames() {
        let mut clock = FrameClock::new();
        // A 5 second stall never turns into hundreds of ticks
        let steps = clock.advance(5.0);
        assert!(steps <= MAX_SUBSTEPS);
        assert!(steps >= 5);
    }
}
