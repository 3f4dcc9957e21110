//! Game tuning constants
//!
//! Every number the simulation consumes lives here and is passed explicitly
//! into the game; nothing reads ambient globals. Loadable from JSON with
//! per-field defaults.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Problems with a loaded or hand-built configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{name} must be positive (got {value})")]
    NotPositive { name: &'static str, value: f32 },
    #[error("gap bounds inverted: min {min} > max {max}")]
    GapBoundsInverted { min: f32, max: f32 },
    #[error("gap bounds [{min}, {max}] leave the play area (height {height})")]
    GapBoundsOutside { min: f32, max: f32, height: f32 },
    #[error("pipes must drift leftward (drift speed {0} >= 0)")]
    DriftNotLeftward(f32),
    #[error("tilt bounds inverted: up {up} > down {down}")]
    TiltBoundsInverted { up: f32, down: f32 },
    #[error(
        "scoring window {window} is too narrow: pipes move {per_tick} per tick, pairs could be skipped"
    )]
    ScoringWindowUnsafe { per_tick: f32, window: f32 },
}

/// World physics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Velocity retained (and reversed) when the bird hits a world bound
    pub world_bounce: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 700.0,
            world_bounce: 0.1,
        }
    }
}

/// The player-controlled bird
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BirdConfig {
    pub start: Vec2,
    /// Vertical velocity set (not added) on flap
    pub flap_impulse: f32,
    /// Tilt while rising (radians)
    pub tilt_up: f32,
    /// Maximum nose-down tilt (radians)
    pub tilt_down: f32,
    /// Nose-down tilt added per tick while falling
    pub tilt_step: f32,
    /// Collision body size
    pub hitbox: Vec2,
}

impl Default for BirdConfig {
    fn default() -> Self {
        Self {
            start: Vec2::new(50.0, 250.0),
            flap_impulse: -350.0,
            tilt_up: -0.5,
            tilt_down: 0.5,
            tilt_step: 0.05,
            // 34x24 sprite shrunk by 8 on each axis
            hitbox: Vec2::new(26.0, 16.0),
        }
    }
}

/// Obstacle pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipeConfig {
    /// Horizontal velocity (negative = leftward)
    pub drift_speed: f32,
    /// Seconds between spawns
    pub spawn_interval: f32,
    /// Spawn distance past the right edge
    pub spawn_offset: f32,
    /// Vertical clearance between the two pieces
    pub gap_height: f32,
    /// Lowest gap-center y
    pub min_gap_y: f32,
    /// Highest gap-center y
    pub max_gap_y: f32,
    /// Size of one piece
    pub piece_size: Vec2,
    /// Pairs with x below this are removed
    pub offscreen_x: f32,
    /// Trailing distance behind the bird in which a crossing scores.
    /// Must exceed |drift_speed| * dt, see `GameConfig::validate`.
    pub scoring_window: f32,
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            drift_speed: -200.0,
            spawn_interval: 2.0,
            spawn_offset: 50.0,
            gap_height: 150.0,
            min_gap_y: 120.0,
            max_gap_y: 392.0,
            piece_size: Vec2::new(52.0, 320.0),
            offscreen_x: -50.0,
            scoring_window: 50.0,
        }
    }
}

impl PipeConfig {
    #[inline]
    pub fn half_gap(&self) -> f32 {
        self.gap_height / 2.0
    }
}

/// Ground band and parallax scrolling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackdropConfig {
    /// Height of the solid ground band at the bottom of the play area
    pub ground_height: f32,
    /// Sky scroll speed (units/s)
    pub sky_speed: f32,
    /// Ground scroll speed (units/s)
    pub ground_speed: f32,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            ground_height: 112.0,
            sky_speed: 30.0,
            ground_speed: 120.0,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Play area width
    pub width: f32,
    /// Play area height
    pub height: f32,
    pub physics: PhysicsConfig,
    pub bird: BirdConfig,
    pub pipes: PipeConfig,
    pub backdrop: BackdropConfig,
    /// Seconds between the fatal hit and the game-over screen
    pub game_over_delay: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 288.0,
            height: 512.0,
            physics: PhysicsConfig::default(),
            bird: BirdConfig::default(),
            pipes: PipeConfig::default(),
            backdrop: BackdropConfig::default(),
            game_over_delay: 1.0,
        }
    }
}

impl GameConfig {
    /// Parse a JSON config; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Y coordinate of the top of the ground band
    #[inline]
    pub fn ground_top(&self) -> f32 {
        self.height - self.backdrop.ground_height
    }

    /// X coordinate where new pipe pairs appear
    #[inline]
    pub fn spawn_x(&self) -> f32 {
        self.width + self.pipes.spawn_offset
    }

    /// Exclusive upper bound on tick length; at or above it a drifting pair can
    /// jump over the scoring window
    pub fn max_safe_dt(&self) -> f32 {
        self.pipes.scoring_window / self.pipes.drift_speed.abs()
    }

    /// Check the config for values the simulation cannot run with.
    ///
    /// `dt` is the tick duration the config will be driven at.
    pub fn validate(&self, dt: f32) -> Result<(), ConfigError> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("gap_height", self.pipes.gap_height),
            ("spawn_interval", self.pipes.spawn_interval),
            ("scoring_window", self.pipes.scoring_window),
            ("piece_size.x", self.pipes.piece_size.x),
            ("piece_size.y", self.pipes.piece_size.y),
            ("hitbox.x", self.bird.hitbox.x),
            ("hitbox.y", self.bird.hitbox.y),
            ("dt", dt),
        ];
        for (name, value) in positive {
            if value <= 0.0 {
                return Err(ConfigError::NotPositive { name, value });
            }
        }

        let pipes = &self.pipes;
        if pipes.min_gap_y > pipes.max_gap_y {
            return Err(ConfigError::GapBoundsInverted {
                min: pipes.min_gap_y,
                max: pipes.max_gap_y,
            });
        }
        if pipes.min_gap_y < 0.0 || pipes.max_gap_y > self.height {
            return Err(ConfigError::GapBoundsOutside {
                min: pipes.min_gap_y,
                max: pipes.max_gap_y,
                height: self.height,
            });
        }
        if pipes.drift_speed >= 0.0 {
            return Err(ConfigError::DriftNotLeftward(pipes.drift_speed));
        }
        if self.bird.tilt_up > self.bird.tilt_down {
            return Err(ConfigError::TiltBoundsInverted {
                up: self.bird.tilt_up,
                down: self.bird.tilt_down,
            });
        }

        // The proximity scoring rule only sees a pair if some tick lands inside
        // the window, so per-tick travel must stay strictly below its width.
        let per_tick = pipes.drift_speed.abs() * dt;
        if per_tick >= pipes.scoring_window {
            return Err(ConfigError::ScoringWindowUnsafe {
                per_tick,
                window: pipes.scoring_window,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate(SIM_DT).is_ok());
        assert_eq!(config.ground_top(), 400.0);
        assert_eq!(config.spawn_x(), 338.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "physics": { "gravity": 900 } }"#).unwrap();
        assert_eq!(config.physics.gravity, 900.0);
        assert_eq!(config.physics.world_bounce, 0.1);
        assert_eq!(config.pipes, PipeConfig::default());
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = GameConfig::default();
        config.pipes.gap_height = 130.0;
        let json = config.to_json().unwrap();
        assert_eq!(GameConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            GameConfig::from_json("{ nope"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_unsafe_scoring_window_rejected() {
        let mut config = GameConfig::default();
        // 200 units/s at 1/60s is 3.33 per tick; a 3 unit window can be skipped
        config.pipes.scoring_window = 3.0;
        assert!(matches!(
            config.validate(SIM_DT),
            Err(ConfigError::ScoringWindowUnsafe { .. })
        ));

        // Default window is safe at 60 Hz but not at a 4 Hz tick
        let config = GameConfig::default();
        assert!(config.validate(0.25).is_err());
        assert!((config.max_safe_dt() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_bad_bounds_rejected() {
        let mut config = GameConfig::default();
        config.pipes.min_gap_y = 400.0;
        config.pipes.max_gap_y = 100.0;
        assert!(matches!(
            config.validate(SIM_DT),
            Err(ConfigError::GapBoundsInverted { .. })
        ));

        let mut config = GameConfig::default();
        config.pipes.drift_speed = 10.0;
        assert!(matches!(
            config.validate(SIM_DT),
            Err(ConfigError::DriftNotLeftward(_))
        ));

        let mut config = GameConfig::default();
        config.bird.tilt_up = 1.0;
        assert!(matches!(
            config.validate(SIM_DT),
            Err(ConfigError::TiltBoundsInverted { .. })
        ));

        let mut config = GameConfig::default();
        config.width = 0.0;
        assert!(matches!(
            config.validate(SIM_DT),
            Err(ConfigError::NotPositive { name: "width", .. })
        ));
    }
}
