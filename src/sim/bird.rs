//! The player-controlled bird
//!
//! Only `y` moves; `x` stays at the configured start column for the whole
//! session.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::config::GameConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    pub pos: Vec2,
    /// Vertical velocity (positive = down)
    pub vel_y: f32,
    /// Visual tilt in radians, within [tilt_up, tilt_down]
    pub tilt: f32,
    pub alive: bool,
    /// Wing-flap animation running
    pub animating: bool,
}

impl Bird {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            pos: config.bird.start,
            vel_y: 0.0,
            tilt: 0.0,
            alive: true,
            animating: true,
        }
    }

    /// Set (not add) the flap impulse. Returns false when ignored.
    pub fn flap(&mut self, config: &GameConfig) -> bool {
        if !self.alive {
            return false;
        }
        self.vel_y = config.bird.flap_impulse;
        true
    }

    /// Integrate gravity and motion for one tick, then derive tilt
    pub fn integrate(&mut self, config: &GameConfig, dt: f32) {
        if !self.alive {
            return;
        }

        self.vel_y += config.physics.gravity * dt;
        self.pos.y += self.vel_y * dt;
        self.clamp_to_world(config);
        self.update_tilt(config);
    }

    /// Keep the body inside the play area, bouncing off the edge it hit
    fn clamp_to_world(&mut self, config: &GameConfig) {
        let half_h = config.bird.hitbox.y / 2.0;
        let top = half_h;
        let bottom = config.height - half_h;

        if self.pos.y < top {
            self.pos.y = top;
            if self.vel_y < 0.0 {
                self.vel_y = -self.vel_y * config.physics.world_bounce;
            }
        } else if self.pos.y > bottom {
            self.pos.y = bottom;
            if self.vel_y > 0.0 {
                self.vel_y = -self.vel_y * config.physics.world_bounce;
            }
        }
    }

    fn update_tilt(&mut self, config: &GameConfig) {
        let bird = &config.bird;
        if self.vel_y < 0.0 {
            // Snap nose-up while rising
            self.tilt = bird.tilt_up;
        } else {
            self.tilt = (self.tilt + bird.tilt_step).min(bird.tilt_down);
        }
    }

    /// Termination: freeze velocity, tilt and animation where they are
    pub fn die(&mut self) {
        self.alive = false;
        self.animating = false;
    }

    /// Back to the start-of-session state
    pub fn reset(&mut self, config: &GameConfig) {
        *self = Self::new(config);
    }

    pub fn hitbox(&self, config: &GameConfig) -> Aabb {
        Aabb::from_center(self.pos, config.bird.hitbox)
    }
}
