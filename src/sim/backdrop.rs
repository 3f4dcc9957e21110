//! Parallax sky and ground scroll offsets

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backdrop {
    /// Sky texture offset, wrapped to the play-area width
    pub sky_offset: f32,
    /// Ground texture offset, wrapped to the play-area width
    pub ground_offset: f32,
    pub moving: bool,
}

impl Default for Backdrop {
    fn default() -> Self {
        Self {
            sky_offset: 0.0,
            ground_offset: 0.0,
            moving: true,
        }
    }
}

impl Backdrop {
    pub fn advance(&mut self, config: &GameConfig, dt: f32) {
        if !self.moving {
            return;
        }
        let wrap = config.width;
        self.sky_offset = (self.sky_offset + config.backdrop.sky_speed * dt).rem_euclid(wrap);
        self.ground_offset =
            (self.ground_offset + config.backdrop.ground_speed * dt).rem_euclid(wrap);
    }

    pub fn stop(&mut self) {
        self.moving = false;
    }

    pub fn resume(&mut self) {
        self.moving = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrolls_and_wraps() {
        let config = GameConfig::default();
        let mut backdrop = Backdrop::default();
        backdrop.advance(&config, 1.0);
        assert_eq!(backdrop.sky_offset, 30.0);
        assert_eq!(backdrop.ground_offset, 120.0);
        backdrop.advance(&config, 2.0);
        assert!(backdrop.ground_offset < config.width);
    }

    #[test]
    fn test_stopped_backdrop_holds() {
        let config = GameConfig::default();
        let mut backdrop = Backdrop::default();
        backdrop.advance(&config, 0.5);
        backdrop.stop();
        let held = backdrop.clone();
        backdrop.advance(&config, 0.5);
        assert_eq!(backdrop, held);
        backdrop.resume();
        backdrop.advance(&config, 0.5);
        assert_ne!(backdrop, held);
    }
}
