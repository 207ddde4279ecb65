//! Best score tracking
//!
//! A single number, read from a storage slot when a session starts and
//! written back whenever a run beats it.

use serde::{Deserialize, Serialize};

use crate::persistence::ScoreSlot;

/// Best score seen across runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    best: u64,
}

impl HighScore {
    pub fn new(best: u64) -> Self {
        Self { best }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Check if a score would raise the high score
    pub fn beats(&self, score: u64) -> bool {
        score > self.best
    }

    /// Raise the high score if `score` beats it
    /// Returns true when the high score changed
    pub fn record(&mut self, score: u64) -> bool {
        if !self.beats(score) {
            return false;
        }
        self.best = score;
        true
    }

    /// Read the high score from a slot; absent or unreadable counts as zero
    pub fn load(slot: &dyn ScoreSlot) -> Self {
        match slot.load() {
            Ok(Some(best)) => {
                log::info!("Loaded high score {best}");
                Self::new(best)
            }
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read high score, starting fresh: {e}");
                Self::default()
            }
        }
    }

    /// Write the high score to a slot; failures are logged, not fatal
    pub fn persist(&self, slot: &mut dyn ScoreSlot) {
        if let Err(e) = slot.save(self.best) {
            log::warn!("Could not save high score {}: {e}", self.best);
        }
    }
}
