//! World state and core simulation types
//!
//! Everything a run needs to continue deterministically lives in `World`.
//! Positions are world-fixed: x runs along the scroll axis, y across it
//! (downward height for Ridge, lateral offset for Trail).

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Collision, Shape};
use super::generate;
use crate::consts::*;
use crate::settings::{Layout, Settings};

/// What the player's feet are doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locomotion {
    /// Standing or running on a surface
    #[default]
    Grounded,
    /// Stepped up onto a higher surface this tick
    Climbing,
    /// Moving upward after a jump or under jetpack thrust
    Jumping,
    /// Airborne and descending
    Falling,
}

impl Locomotion {
    /// Vertical velocity is held at zero by terrain contact
    pub fn is_supported(&self) -> bool {
        matches!(self, Locomotion::Grounded | Locomotion::Climbing)
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Forces upward motion for its duration
    Jetpack,
    /// Speeds up climbing
    Pickaxe,
}

impl PowerUpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::Jetpack => "jetpack",
            PowerUpKind::Pickaxe => "pickaxe",
        }
    }
}

/// A power-up the player is carrying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePowerUp {
    pub kind: PowerUpKind,
    /// Tick at which the effect ends
    pub expires_at: u64,
}

/// The player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Centre position
    pub pos: Vec2,
    pub vel: Vec2,
    /// x: extent along the scroll axis, y: lateral/vertical extent
    pub size: Vec2,
    /// Hop height above the path (Trail only)
    pub altitude: f32,
    pub altitude_vel: f32,
    pub locomotion: Locomotion,
    pub power_up: Option<ActivePowerUp>,
}

impl Player {
    /// Player at the documented start coordinates for these settings
    pub fn spawn(settings: &Settings) -> Self {
        let y = match settings.layout {
            Layout::Ridge => settings.start_level - settings.player_size.y / 2.0,
            Layout::Trail => settings.viewport_span / 2.0,
        };
        Self {
            pos: Vec2::new(settings.player_anchor, y),
            vel: Vec2::new(settings.start_speed, 0.0),
            size: settings.player_size,
            altitude: 0.0,
            altitude_vel: 0.0,
            locomotion: Locomotion::Grounded,
            power_up: None,
        }
    }

    #[inline]
    pub fn half(&self) -> Vec2 {
        self.size / 2.0
    }

    /// Bottom edge (Ridge)
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y / 2.0
    }

    /// Trailing edge along the scroll axis
    #[inline]
    pub fn back(&self) -> f32 {
        self.pos.x - self.size.x / 2.0
    }

    /// Leading edge along the scroll axis
    #[inline]
    pub fn front(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }

    pub fn has_power_up(&self, kind: PowerUpKind) -> bool {
        self.power_up.is_some_and(|p| p.kind == kind)
    }

    /// Collision shape: a box on the Ridge, a small circle on the Trail
    pub fn hitbox(&self, layout: Layout) -> Shape {
        match layout {
            Layout::Ridge => Shape::Rect {
                center: self.pos,
                half: self.half(),
            },
            Layout::Trail => Shape::Circle {
                center: self.pos,
                radius: self.size.y / 3.0,
            },
        }
    }
}

/// A span of terrain
///
/// Ridge: `level` is the surface height. Trail: `level` is the left edge of a
/// path `width` wide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: u32,
    /// Position of the trailing edge along the scroll axis
    pub start: f32,
    pub length: f32,
    pub level: f32,
    pub width: f32,
}

impl Segment {
    /// Leading edge along the scroll axis
    #[inline]
    pub fn end(&self) -> f32 {
        self.start + self.length
    }

    /// Whether scroll position `x` lies in this segment
    #[inline]
    pub fn contains(&self, x: f32) -> bool {
        x >= self.start && x < self.end()
    }

    /// Whether the lateral interval `[lo, hi]` lies on the path (Trail)
    #[inline]
    pub fn holds_lateral(&self, lo: f32, hi: f32) -> bool {
        lo >= self.level && hi <= self.level + self.width
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Boulder, collides as a circle
    Rock,
    /// Collides as a tall box
    Tree,
    /// Collides as a wide box
    Bear,
}

impl ObstacleKind {
    /// Bounding size (x along the scroll axis, y across it)
    pub fn size(&self) -> Vec2 {
        match self {
            ObstacleKind::Rock => Vec2::splat(40.0),
            ObstacleKind::Tree => Vec2::new(30.0, 50.0),
            ObstacleKind::Bear => Vec2::new(50.0, 36.0),
        }
    }

    /// Collision shape centred at `center`
    pub fn shape(&self, center: Vec2) -> Shape {
        match self {
            ObstacleKind::Rock => Shape::Circle {
                center,
                radius: self.size().x / 2.0,
            },
            ObstacleKind::Tree | ObstacleKind::Bear => Shape::Rect {
                center,
                half: self.size() / 2.0,
            },
        }
    }
}

/// An obstacle entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Centre position
    pub pos: Vec2,
}

impl Obstacle {
    pub fn shape(&self) -> Shape {
        self.kind.shape(self.pos)
    }

    /// Trailing edge along the scroll axis
    pub fn back(&self) -> f32 {
        self.pos.x - self.kind.size().x / 2.0
    }

    pub fn front(&self) -> f32 {
        self.pos.x + self.kind.size().x / 2.0
    }
}

/// A collectible power-up waiting on the course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
}

impl PowerUp {
    pub fn shape(&self) -> Shape {
        Shape::Circle {
            center: self.pos,
            radius: POWERUP_RADIUS,
        }
    }
}

/// Scenery types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecorationKind {
    Pine,
    Cloud,
}

/// Non-colliding scenery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decoration {
    pub id: u32,
    pub kind: DecorationKind,
    pub pos: Vec2,
    pub size: Vec2,
    /// Movement per tick
    pub drift: Vec2,
}

/// Things that happened during the last tick, for renderers and audio
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    /// Touched down after being airborne (dust puff)
    Landed,
    PowerUpCollected(PowerUpKind),
    PowerUpExpired(PowerUpKind),
    Crashed(Collision),
}

/// Complete world state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// Tuning this run was started with
    pub settings: Settings,
    /// Run seed for reproducibility
    pub seed: u64,
    /// Generation RNG (advanced only by the generation policy)
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub score: u64,
    /// Current forward speed
    pub speed: f32,
    /// Width given to newly generated Trail segments
    pub path_width: f32,
    pub player: Player,
    /// Terrain, ordered by ascending `start`
    pub segments: Vec<Segment>,
    /// Obstacles, in generation order
    pub obstacles: Vec<Obstacle>,
    pub power_ups: Vec<PowerUp>,
    pub decorations: Vec<Decoration>,
    /// Set once the player has crashed; the world no longer steps
    pub crash: Option<Collision>,
    /// Events from the most recent tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Player x when the run began (distance scoring)
    start_x: f32,
    /// Next entity ID
    next_id: u32,
}

impl World {
    /// Create a world with the given settings and seed, with terrain generated
    ///
    /// Settings are used as given. Call `Settings::validate` first (as
    /// `Session::new` does) to guarantee every gap and step is traversable.
    pub fn new(settings: Settings, seed: u64) -> Self {
        let player = Player::spawn(&settings);
        let mut world = Self {
            speed: settings.start_speed,
            path_width: settings.path_width,
            start_x: player.pos.x,
            player,
            settings,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            score: 0,
            segments: Vec::new(),
            obstacles: Vec::new(),
            power_ups: Vec::new(),
            decorations: Vec::new(),
            crash: None,
            events: Vec::new(),
            next_id: 1,
        };
        generate::seed_world(&mut world);
        generate::ensure_generated(&mut world);
        world
    }

    /// Throw away the current run and start over with a new seed
    pub fn reset(&mut self, seed: u64) {
        let settings = self.settings.clone();
        *self = Self::new(settings, seed);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Distance travelled since the run began
    pub fn distance(&self) -> f32 {
        self.player.pos.x - self.start_x
    }

    pub fn is_crashed(&self) -> bool {
        self.crash.is_some()
    }

    /// Total live entities (terrain, obstacles, power-ups, scenery)
    pub fn live_entities(&self) -> usize {
        self.segments.len() + self.obstacles.len() + self.power_ups.len() + self.decorations.len()
    }
}
