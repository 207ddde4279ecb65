//! World tuning
//!
//! One `Settings` value drives generation, physics, scoring and difficulty.
//! Presets exist for both terrain layouts; JSON files may override any field.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;
use crate::sim::{ObstacleKind, PowerUpKind};

/// Terrain layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Layout {
    /// Side view: segments are surfaces at a height, the player runs and jumps
    #[default]
    Ridge,
    /// Top view: segments are a winding path, the player steers laterally
    Trail,
}

impl Layout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Ridge => "Ridge",
            Layout::Trail => "Trail",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ridge" | "climb" | "climber" => Some(Layout::Ridge),
            "trail" | "path" => Some(Layout::Trail),
            _ => None,
        }
    }
}

/// How the running score is derived
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScoreRule {
    /// One point per tick survived
    Ticks,
    /// One point per `unit` of distance travelled along the scroll axis
    Distance { unit: f32 },
}

/// Complete world tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub layout: Layout,

    // === Viewport / window ===
    /// Viewport extent along the scroll axis
    pub viewport_length: f32,
    /// Viewport extent across the scroll axis (height for Ridge, width for Trail)
    pub viewport_span: f32,
    /// Player's distance ahead of the viewpoint
    pub player_anchor: f32,
    /// Generated terrain must reach this far past the viewpoint
    pub lookahead: f32,
    /// Minimum segments starting at or after the viewpoint
    pub min_segments_ahead: usize,
    /// Content further than this behind the viewpoint is retired
    pub retention: f32,

    // === Player ===
    /// x: extent along the scroll axis, y: lateral/vertical extent
    pub player_size: Vec2,
    pub gravity: f32,
    pub jump_force: f32,
    pub start_speed: f32,
    pub max_speed: f32,
    /// Speed gained every tick
    pub speed_increment: f32,
    /// Fraction of run speed kept while climbing a step
    pub climb_speed_factor: f32,

    // === Terrain ===
    pub segment_length: f32,
    /// Length of the hand-placed first segment
    pub seed_length: f32,
    /// Level of the first segment
    pub start_level: f32,
    /// Ridge surface bounds (y grows downward)
    pub min_level: f32,
    pub max_level: f32,
    /// Largest level change between consecutive segments
    pub max_step: f32,
    pub gap_chance: f32,
    pub min_gap: f32,
    pub max_gap: f32,
    /// Trail path width at the start of a run
    pub path_width: f32,
    pub min_path_width: f32,
    /// Path width lost per score point
    pub path_shrink: f32,
    /// Trail keeps this much space to either side of the path
    pub path_margin: f32,

    // === Content ===
    pub obstacle_chance: f32,
    pub obstacle_kinds: Vec<ObstacleKind>,
    pub powerup_chance: f32,
    pub powerup_kinds: Vec<PowerUpKind>,
    /// Active duration of a collected power-up
    pub powerup_ticks: u32,
    /// Upward speed forced by the jetpack
    pub jetpack_lift: f32,
    /// Climb speed multiplier while holding the pickaxe
    pub pickaxe_climb_boost: f32,
    pub pine_chance: f32,
    pub cloud_chance: f32,

    // === Scoring ===
    pub score_rule: ScoreRule,
}

impl Default for Settings {
    fn default() -> Self {
        Self::ridge()
    }
}

impl Settings {
    /// Preset for a layout
    pub fn for_layout(layout: Layout) -> Self {
        match layout {
            Layout::Ridge => Self::ridge(),
            Layout::Trail => Self::trail(),
        }
    }

    fn ridge() -> Self {
        Self {
            layout: Layout::Ridge,

            viewport_length: VIEWPORT_WIDTH,
            viewport_span: VIEWPORT_HEIGHT,
            player_anchor: VIEWPORT_WIDTH / 4.0,
            lookahead: VIEWPORT_WIDTH,
            min_segments_ahead: 4,
            retention: VIEWPORT_WIDTH,

            player_size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            gravity: GRAVITY,
            jump_force: JUMP_FORCE,
            start_speed: 4.0,
            max_speed: 8.0,
            speed_increment: 0.001,
            climb_speed_factor: 0.6,

            segment_length: 80.0,
            seed_length: VIEWPORT_WIDTH / 2.0,
            start_level: 500.0,
            min_level: 300.0,
            max_level: 560.0,
            max_step: 30.0,
            gap_chance: 0.08,
            min_gap: 30.0,
            max_gap: 90.0,
            path_width: 0.0,
            min_path_width: 0.0,
            path_shrink: 0.0,
            path_margin: 0.0,

            obstacle_chance: 0.1,
            obstacle_kinds: vec![ObstacleKind::Rock, ObstacleKind::Tree, ObstacleKind::Bear],
            powerup_chance: 0.03,
            powerup_kinds: vec![PowerUpKind::Jetpack, PowerUpKind::Pickaxe],
            powerup_ticks: POWERUP_TICKS,
            jetpack_lift: 4.0,
            pickaxe_climb_boost: 1.6,
            pine_chance: 0.05,
            cloud_chance: 0.01,

            score_rule: ScoreRule::Distance { unit: 10.0 },
        }
    }

    fn trail() -> Self {
        let path_width = 200.0;
        Self {
            layout: Layout::Trail,

            // Scrolls bottom-to-top: canvas height is the scroll axis
            viewport_length: VIEWPORT_HEIGHT,
            viewport_span: VIEWPORT_WIDTH,
            player_anchor: 50.0,
            lookahead: VIEWPORT_HEIGHT,
            min_segments_ahead: 10,
            retention: VIEWPORT_HEIGHT,

            player_size: Vec2::new(PLAYER_HEIGHT, PLAYER_WIDTH),
            gravity: GRAVITY,
            jump_force: JUMP_FORCE,
            start_speed: 2.0,
            max_speed: 6.0,
            speed_increment: 0.0001,
            climb_speed_factor: 1.0,

            segment_length: 100.0,
            seed_length: 100.0,
            start_level: (VIEWPORT_WIDTH - path_width) / 2.0,
            min_level: 0.0,
            max_level: 0.0,
            max_step: 50.0,
            gap_chance: 0.0,
            min_gap: 0.0,
            max_gap: 0.0,
            path_width,
            min_path_width: 100.0,
            path_shrink: 0.1,
            path_margin: 50.0,

            obstacle_chance: 0.03,
            obstacle_kinds: vec![ObstacleKind::Rock],
            powerup_chance: 0.02,
            powerup_kinds: vec![PowerUpKind::Jetpack],
            powerup_ticks: POWERUP_TICKS,
            jetpack_lift: 2.0,
            pickaxe_climb_boost: 1.0,
            pine_chance: 0.05,
            cloud_chance: 0.01,

            score_rule: ScoreRule::Ticks,
        }
    }

    /// Valid level interval for a new segment of the given width
    pub fn level_range(&self, width: f32) -> (f32, f32) {
        match self.layout {
            Layout::Ridge => (self.min_level, self.max_level),
            Layout::Trail => (
                self.path_margin,
                (self.viewport_span - width - self.path_margin).max(self.path_margin),
            ),
        }
    }

    /// Peak height of a jump from rest
    pub fn jump_apex(&self) -> f32 {
        self.jump_force * self.jump_force / (2.0 * self.gravity)
    }

    /// Ticks spent in the air by a jump from level ground
    pub fn jump_ticks(&self) -> f32 {
        2.0 * self.jump_force / self.gravity
    }

    /// Distance covered along the scroll axis by a jump at start speed
    pub fn jump_reach(&self) -> f32 {
        self.start_speed * self.jump_ticks()
    }

    /// Check the settings describe a traversable world
    pub fn validate(&self) -> Result<(), SettingsError> {
        let probabilities = [
            ("gap_chance", self.gap_chance),
            ("obstacle_chance", self.obstacle_chance),
            ("powerup_chance", self.powerup_chance),
            ("pine_chance", self.pine_chance),
            ("cloud_chance", self.cloud_chance),
        ];
        for (field, p) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(SettingsError::invalid(field, format!("{p} is not in [0, 1]")));
            }
        }

        if self.gravity <= 0.0 {
            return Err(SettingsError::invalid("gravity", "must be positive"));
        }
        if self.segment_length <= 0.0 || self.seed_length <= 0.0 {
            return Err(SettingsError::invalid("segment_length", "segments need a positive length"));
        }
        if self.start_speed <= 0.0 || self.max_speed < self.start_speed {
            return Err(SettingsError::invalid(
                "max_speed",
                format!("speeds must satisfy 0 < {} <= {}", self.start_speed, self.max_speed),
            ));
        }
        if self.max_step < 0.0 {
            return Err(SettingsError::invalid("max_step", "must not be negative"));
        }
        if self.lookahead <= 0.0 {
            return Err(SettingsError::invalid("lookahead", "must be positive"));
        }
        if let ScoreRule::Distance { unit } = self.score_rule {
            if unit <= 0.0 {
                return Err(SettingsError::invalid("score_rule", "distance unit must be positive"));
            }
        }
        if self.obstacle_chance > 0.0 && self.obstacle_kinds.is_empty() {
            return Err(SettingsError::invalid(
                "obstacle_kinds",
                "obstacles enabled but no kinds listed",
            ));
        }
        if self.powerup_chance > 0.0 && self.powerup_kinds.is_empty() {
            return Err(SettingsError::invalid(
                "powerup_kinds",
                "power-ups enabled but no kinds listed",
            ));
        }

        match self.layout {
            Layout::Ridge => {
                if self.min_level > self.max_level {
                    return Err(SettingsError::invalid("min_level", "must not exceed max_level"));
                }
                if self.max_level >= self.viewport_span {
                    return Err(SettingsError::invalid(
                        "max_level",
                        "surface must lie above the playfield bottom",
                    ));
                }
                if self.min_level < self.player_size.y {
                    return Err(SettingsError::invalid(
                        "min_level",
                        "no head room above the highest surface",
                    ));
                }
                if self.max_step > self.jump_apex() {
                    return Err(SettingsError::invalid(
                        "max_step",
                        format!("{} exceeds jump apex {}", self.max_step, self.jump_apex()),
                    ));
                }
                if self.gap_chance > 0.0 {
                    if self.min_gap > self.max_gap || self.min_gap < 0.0 {
                        return Err(SettingsError::invalid("min_gap", "gap range is empty"));
                    }
                    if self.max_gap > self.jump_reach() {
                        return Err(SettingsError::invalid(
                            "max_gap",
                            format!("{} exceeds jump reach {}", self.max_gap, self.jump_reach()),
                        ));
                    }
                }
            }
            Layout::Trail => {
                if self.min_path_width <= self.player_size.y {
                    return Err(SettingsError::invalid(
                        "min_path_width",
                        "path narrower than the player",
                    ));
                }
                if self.path_width < self.min_path_width {
                    return Err(SettingsError::invalid("path_width", "starts below min_path_width"));
                }
                if self.path_width + 2.0 * self.path_margin > self.viewport_span {
                    return Err(SettingsError::invalid(
                        "path_width",
                        "path and margins exceed the playfield",
                    ));
                }
                if self.gap_chance > 0.0 {
                    return Err(SettingsError::invalid("gap_chance", "trail paths are contiguous"));
                }
            }
        }

        let (lo, hi) = self.level_range(self.path_width);
        if self.start_level < lo || self.start_level > hi {
            return Err(SettingsError::invalid(
                "start_level",
                format!("{} is outside [{lo}, {hi}]", self.start_level),
            ));
        }

        Ok(())
    }

    /// Parse and validate settings from JSON (missing fields take Ridge defaults)
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!(
            "Loaded {} settings from {}",
            settings.layout.as_str(),
            path.display()
        );
        Ok(settings)
    }
}
