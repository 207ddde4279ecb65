//! Run lifecycle
//!
//! Owns the world, routes input into tick intent, and moves between
//! Idle, Running and GameOver. Rendering reads a borrowed `Snapshot`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::TICKS_PER_SECOND;
use crate::error::SettingsError;
use crate::highscores::HighScore;
use crate::persistence::ScoreSlot;
use crate::settings::{Layout, Settings};
use crate::sim::{
    self, Collision, Decoration, GameEvent, Obstacle, Player, PowerUp, Segment, TickInput, World,
};

/// Minimum ticks between high score writes while a run keeps beating it
const SAVE_INTERVAL_TICKS: u64 = TICKS_PER_SECOND as u64;

/// Session phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Title screen, waiting for a start
    #[default]
    Idle,
    Running,
    GameOver,
}

/// Keys the session reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Enter,
    Other,
}

/// Platform input, already translated out of DOM/window events
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer position on the lateral axis, world units
    PointerMove(f32),
    /// Click or tap
    PrimaryAction,
    Key(Key),
}

pub struct Session {
    world: World,
    phase: SessionPhase,
    high_score: HighScore,
    /// Best raised since the last write to the slot
    unsaved: bool,
    last_save_tick: u64,
    slot: Box<dyn ScoreSlot>,
    base_seed: u64,
    runs: u64,
    pending: TickInput,
}

impl Session {
    /// New session in Idle; the high score is read from `slot`
    ///
    /// Settings are validated first, so every generated course is traversable.
    pub fn new(
        settings: Settings,
        slot: Box<dyn ScoreSlot>,
        seed: u64,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;
        let high_score = HighScore::load(slot.as_ref());
        Ok(Self {
            world: World::new(settings, seed),
            phase: SessionPhase::Idle,
            high_score,
            unsaved: false,
            last_save_tick: 0,
            slot,
            base_seed: seed,
            runs: 0,
            pending: TickInput::default(),
        })
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Direct world access for tools and scripted scenarios
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn high_score(&self) -> HighScore {
        self.high_score
    }

    /// Number of runs started so far
    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// Let the autopilot play (attract mode and the headless runner)
    pub fn set_autopilot(&mut self, enabled: bool) {
        self.pending.autopilot = enabled;
    }

    /// Route one input event
    pub fn handle(&mut self, event: InputEvent) {
        match (event, self.phase) {
            (InputEvent::PointerMove(lateral), SessionPhase::Running) => {
                self.pending.target_lateral = Some(lateral);
            }
            (InputEvent::PointerMove(_), _) => {}
            (InputEvent::PrimaryAction | InputEvent::Key(Key::Space), SessionPhase::Running) => {
                self.pending.jump = true;
            }
            (
                InputEvent::PrimaryAction | InputEvent::Key(Key::Space | Key::Enter),
                SessionPhase::Idle | SessionPhase::GameOver,
            ) => {
                self.start();
            }
            (InputEvent::Key(_), _) => {}
        }
    }

    /// Start a run with the next seed in sequence
    pub fn start(&mut self) -> bool {
        let seed = self.base_seed.wrapping_add(self.runs);
        self.start_with_seed(seed)
    }

    /// Start a run with an explicit seed; ignored while a run is in progress
    pub fn start_with_seed(&mut self, seed: u64) -> bool {
        if self.phase == SessionPhase::Running {
            return false;
        }
        self.world.reset(seed);
        self.runs += 1;
        self.last_save_tick = 0;
        self.phase = SessionPhase::Running;
        let autopilot = self.pending.autopilot;
        self.pending = TickInput {
            autopilot,
            ..Default::default()
        };
        log::info!(
            "Run {} started ({} layout, seed {seed})",
            self.runs,
            self.world.settings.layout.as_str()
        );
        true
    }

    /// Advance one display frame
    pub fn frame(&mut self) {
        if self.phase != SessionPhase::Running {
            return;
        }

        sim::tick(&mut self.world, &self.pending);
        // A jump is a one-shot; pointer target and autopilot persist
        self.pending.jump = false;

        if self.high_score.record(self.world.score) {
            self.unsaved = true;
        }
        if self.world.time_ticks - self.last_save_tick >= SAVE_INTERVAL_TICKS {
            self.save_high_score();
        }

        if let Some(collision) = self.world.crash {
            self.phase = SessionPhase::GameOver;
            self.save_high_score();
            log::info!(
                "Game over after {} ticks: {:?}, score {} (best {})",
                self.world.time_ticks,
                collision,
                self.world.score,
                self.high_score.best()
            );
        }
    }

    /// Write the high score if it was raised since the last write
    pub fn save_high_score(&mut self) {
        if !self.unsaved {
            return;
        }
        self.high_score.persist(self.slot.as_mut());
        self.unsaved = false;
        self.last_save_tick = self.world.time_ticks;
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        let world = &self.world;
        Snapshot {
            phase: self.phase,
            layout: world.settings.layout,
            player: &world.player,
            segments: &world.segments,
            obstacles: &world.obstacles,
            power_ups: &world.power_ups,
            decorations: &world.decorations,
            events: &world.events,
            score: world.score,
            high_score: self.high_score.best(),
            viewpoint: sim::viewpoint(world),
            crash: world.crash,
        }
    }
}

/// Read-only view of one frame for a renderer
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub phase: SessionPhase,
    pub layout: Layout,
    pub player: &'a Player,
    pub segments: &'a [Segment],
    pub obstacles: &'a [Obstacle],
    pub power_ups: &'a [PowerUp],
    pub decorations: &'a [Decoration],
    pub events: &'a [GameEvent],
    pub score: u64,
    pub high_score: u64,
    /// World x at the trailing edge of the view
    pub viewpoint: f32,
    pub crash: Option<Collision>,
}

impl Snapshot<'_> {
    /// World position to camera-relative position
    #[inline]
    pub fn to_view(&self, pos: Vec2) -> Vec2 {
        Vec2::new(pos.x - self.viewpoint, pos.y)
    }
}
