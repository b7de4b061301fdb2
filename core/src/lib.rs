//! Rules engine for a tile-swapping puzzle.
//!
//! A round starts from a [`Board`] of N×N tiles (N between 4 and 6) and the
//! player swaps neighbouring tiles until every row satisfies the rule of the
//! round's [`Mode`]. [`PlayEngine`] owns one round; [`Session`] ties rounds to
//! the persisted leaderboards and puzzle-pack progress.

use serde::{Deserialize, Serialize};

pub use board::*;
pub use catalog::*;
pub use completion::*;
pub use engine::*;
pub use error::*;
pub use event::*;
pub use generator::*;
pub use powerup::*;
pub use puzzle::*;
pub use session::*;
pub use store::*;
pub use tile::*;
pub use timer::*;
pub use types::*;

mod board;
mod catalog;
pub mod completion;
mod engine;
mod error;
mod event;
mod generator;
mod powerup;
mod puzzle;
mod session;
mod store;
mod tile;
mod timer;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundConfig {
    pub mode: Mode,
    pub size: BoardSize,
    /// Seconds on the clock when the round opens.
    pub time_limit: u32,
    /// Ceiling for power-ups that add time.
    pub max_time: u32,
    /// Swap budget, only set for fixed puzzles.
    pub max_moves: Option<u32>,
    pub powerups: PowerUpPolicy,
}

impl RoundConfig {
    pub fn new(mode: Mode, size: BoardSize) -> Self {
        Self {
            mode,
            size,
            time_limit: DEFAULT_TIME_LIMIT,
            max_time: MAX_TIME,
            max_moves: None,
            powerups: PowerUpPolicy::FREE_PLAY,
        }
    }

    pub fn for_puzzle(puzzle: &PuzzleDefinition) -> Self {
        Self {
            mode: Mode::Classic,
            size: puzzle.size,
            time_limit: puzzle.time_limit,
            max_time: MAX_TIME.max(puzzle.time_limit),
            max_moves: Some(puzzle.max_moves),
            powerups: PowerUpPolicy::DISABLED,
        }
    }

    pub fn with_time_limit(mut self, time_limit: u32) -> Self {
        self.time_limit = time_limit;
        self.max_time = self.max_time.max(time_limit);
        self
    }

    pub fn with_powerups(mut self, powerups: PowerUpPolicy) -> Self {
        self.powerups = powerups;
        self
    }
}

/// Outcome of pressing a tile.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PressOutcome {
    NoChange,
    Selected,
    Deselected,
    Swapped,
    Won,
    Lost,
}
