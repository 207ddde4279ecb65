//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick only
//! - Seeded RNG only, drawn in generation order
//! - Stable iteration order (segments by position, everything else by ID)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod generate;
pub mod state;
pub mod tick;
pub mod window;

pub use collision::{Collision, Shape, circles_overlap, overlaps, rects_overlap, segment_at};
pub use generate::{ensure_generated, seed_world};
pub use state::{
    ActivePowerUp, Decoration, DecorationKind, GameEvent, Locomotion, Obstacle, ObstacleKind,
    Player, PowerUp, PowerUpKind, Segment, World,
};
pub use tick::{TickInput, tick};
pub use window::{retention_boundary, retire, segments_ahead, viewpoint};
