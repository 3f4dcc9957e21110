//! Collision regions and the overlap primitive
//!
//! The simulation only decides *what* to test and how to respond; the
//! geometric overlap test itself sits behind `OverlapProbe` so a host engine
//! can supply its own. `ArcadeOverlap` is the built-in axis-aligned version.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bird::Bird;
use super::pipes::{PipeField, PipePiece};
use crate::config::GameConfig;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Strict intersection; touching edges do not count
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Named collision region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    Bird,
    Ground,
    Pipe { pair_id: u32, piece: PipePiece },
}

/// A region with its current bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    pub region: Region,
    pub bounds: Aabb,
}

/// Geometric overlap test supplied by the host
pub trait OverlapProbe {
    fn overlaps(&self, a: &Hitbox, b: &Hitbox) -> bool;
}

/// Arcade-style AABB overlap
#[derive(Debug, Clone, Copy, Default)]
pub struct ArcadeOverlap;

impl OverlapProbe for ArcadeOverlap {
    fn overlaps(&self, a: &Hitbox, b: &Hitbox) -> bool {
        a.bounds.intersects(&b.bounds)
    }
}

/// What the bird ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Contact {
    Ground,
    Pipe { pair_id: u32, piece: PipePiece },
}

/// The solid band along the bottom of the play area
pub fn ground_hitbox(config: &GameConfig) -> Hitbox {
    Hitbox {
        region: Region::Ground,
        bounds: Aabb::new(
            Vec2::new(0.0, config.ground_top()),
            Vec2::new(config.width, config.height),
        ),
    }
}

/// First contact of the bird with the ground or any pipe piece.
///
/// Every region is tested; the ground wins a tie so a simultaneous
/// multi-contact still yields one answer. Dead birds never collide.
pub fn detect_contact(
    bird: &Bird,
    pipes: &PipeField,
    config: &GameConfig,
    probe: &dyn OverlapProbe,
) -> Option<Contact> {
    if !bird.alive {
        return None;
    }

    let bird_box = Hitbox {
        region: Region::Bird,
        bounds: bird.hitbox(config),
    };

    if probe.overlaps(&bird_box, &ground_hitbox(config)) {
        return Some(Contact::Ground);
    }

    pipes
        .hitboxes(config)
        .find(|piece| probe.overlaps(&bird_box, piece))
        .and_then(|piece| match piece.region {
            Region::Pipe { pair_id, piece } => Some(Contact::Pipe { pair_id, piece }),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_intersection() {
        let a = Aabb::from_center(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0));
        let b = Aabb::from_center(Vec2::new(1.5, 0.0), Vec2::new(2.0, 2.0));
        let touching = Aabb::from_center(Vec2::new(2.0, 0.0), Vec2::new(2.0, 2.0));
        let far = Aabb::from_center(Vec2::new(5.0, 5.0), Vec2::new(2.0, 2.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&touching));
        assert!(!a.intersects(&far));
    }

    #[test]
    fn test_bird_on_ground_contacts() {
        let config = GameConfig::default();
        let mut bird = Bird::new(&config);
        let pipes = PipeField::empty(&config, 1);

        assert_eq!(detect_contact(&bird, &pipes, &config, &ArcadeOverlap), None);

        bird.pos.y = config.ground_top();
        assert_eq!(
            detect_contact(&bird, &pipes, &config, &ArcadeOverlap),
            Some(Contact::Ground)
        );
    }

    #[test]
    fn test_bird_in_gap_is_clear() {
        let config = GameConfig::default();
        let bird = Bird::new(&config);
        let mut pipes = PipeField::empty(&config, 1);
        // Pair straddling the bird with the gap centered on it
        pipes.push_pair(bird.pos.x, bird.pos.y);
        assert_eq!(detect_contact(&bird, &pipes, &config, &ArcadeOverlap), None);
    }

    #[test]
    fn test_bird_hits_top_piece() {
        let config = GameConfig::default();
        let bird = Bird::new(&config);
        let mut pipes = PipeField::empty(&config, 1);
        // Gap well below the bird, so the top piece covers it
        let id = pipes.push_pair(bird.pos.x, bird.pos.y + 120.0);
        assert_eq!(
            detect_contact(&bird, &pipes, &config, &ArcadeOverlap),
            Some(Contact::Pipe {
                pair_id: id,
                piece: PipePiece::Top
            })
        );
    }

    #[test]
    fn test_dead_bird_never_collides() {
        let config = GameConfig::default();
        let mut bird = Bird::new(&config);
        bird.pos.y = config.ground_top();
        bird.die();
        let pipes = PipeField::empty(&config, 1);
        assert_eq!(detect_contact(&bird, &pipes, &config, &ArcadeOverlap), None);
    }

    #[test]
    fn test_custom_probe_is_consulted() {
        struct Never;
        impl OverlapProbe for Never {
            fn overlaps(&self, _a: &Hitbox, _b: &Hitbox) -> bool {
                false
            }
        }

        let config = GameConfig::default();
        let mut bird = Bird::new(&config);
        bird.pos.y = config.ground_top();
        let pipes = PipeField::empty(&config, 1);
        assert_eq!(detect_contact(&bird, &pipes, &config, &Never), None);
    }
}
