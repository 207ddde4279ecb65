//! Mountain Runner - an endless runner over procedurally generated terrain
//!
//! Core modules:
//! - `sim`: Deterministic simulation (generation, windowing, physics, collisions)
//! - `session`: Idle / Running / GameOver state machine and input routing
//! - `settings`: Data-driven tuning per terrain layout
//! - `highscores`: Best score tracking
//! - `persistence`: High score storage slots (file, LocalStorage, memory)

pub mod error;
pub mod highscores;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{SettingsError, StoreError};
pub use highscores::HighScore;
pub use session::{InputEvent, Key, Session, SessionPhase, Snapshot};
pub use settings::{Layout, ScoreRule, Settings};

/// Game configuration constants
pub mod consts {
    /// Simulation ticks per second (one tick per display frame)
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Playfield dimensions (800x600 canvas)
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 600.0;

    /// Player physics (units per tick, units per tick²)
    pub const GRAVITY: f32 = 0.5;
    pub const JUMP_FORCE: f32 = 10.0;
    pub const PLAYER_WIDTH: f32 = 30.0;
    pub const PLAYER_HEIGHT: f32 = 50.0;

    /// Collectible pickup radius
    pub const POWERUP_RADIUS: f32 = 12.0;
    /// Default power-up lifetime (5 seconds)
    pub const POWERUP_TICKS: u32 = 5 * TICKS_PER_SECOND;

    /// Tolerance used when comparing positions after clamping
    pub const EPSILON: f32 = 1e-3;
}

/// Uniform draw in `[lo, hi)`; returns `lo` when the range is empty
#[inline]
pub fn roll<R: rand::Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi <= lo {
        return lo;
    }
    lo + rng.random::<f32>() * (hi - lo)
}

/// Bernoulli draw that tolerates probabilities outside [0, 1]
#[inline]
pub fn chance<R: rand::Rng + ?Sized>(rng: &mut R, probability: f32) -> bool {
    rng.random::<f32>() < probability
}
