//! Idle/demo controller
//!
//! Flaps whenever the bird is falling and has sunk below the usable middle of
//! the next gap. Good enough to clear ordinary layouts; gaps drawn right
//! against the ground can be narrower than one flap arc and still kill it.

use super::state::Session;
use crate::config::GameConfig;

/// How far below the target line the bird may sink before flapping
pub const FLAP_MARGIN: f32 = 30.0;

/// Height the controller steers toward
pub fn target_y(session: &Session, config: &GameConfig) -> f32 {
    let bird_left = session.bird.pos.x - config.bird.hitbox.x / 2.0;
    match session.pipes.next_ahead(bird_left, config) {
        Some(pair) => {
            // The ground can cover the lower end of a deep gap
            let top = pair.top_edge(config);
            let bottom = pair.bottom_edge(config).min(config.ground_top());
            (top + bottom) / 2.0
        }
        None => config.height / 2.0,
    }
}

pub fn wants_flap(session: &Session, config: &GameConfig) -> bool {
    let bird = &session.bird;
    bird.alive && bird.vel_y >= 0.0 && bird.pos.y > target_y(session, config) + FLAP_MARGIN
}
