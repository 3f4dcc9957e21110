//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (pairs oldest first)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod backdrop;
pub mod bird;
pub mod collision;
pub mod pipes;
pub mod state;
pub mod tick;
pub mod timer;

pub use backdrop::Backdrop;
pub use bird::Bird;
pub use collision::{Aabb, ArcadeOverlap, Contact, Hitbox, OverlapProbe, Region, detect_contact};
pub use pipes::{PipeField, PipePair, PipePiece};
pub use state::{GameEvent, Scene, SceneKind, Session, Snapshot};
pub use tick::{AssetReport, Game, InputEvent, TickInput, tick};
pub use timer::{Delay, RepeatingTimer};
