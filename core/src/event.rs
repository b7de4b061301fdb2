use serde::{Deserialize, Serialize};

use crate::*;

/// Things that happened in a round, in the order they happened.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEvent {
    Selected(TileIndex),
    Deselected,
    Swapped(TileIndex, TileIndex),
    RowCompleted(Coord),
    PowerUpAwarded(PowerUp),
    PowerUpApplied(PowerUp),
    Paused,
    Resumed,
    Won { moves: u32, time_remaining: u32 },
    Lost(LossReason),
}

/// Haptics, sound, and anything else that reacts to a round without feeding
/// back into it.
pub trait Feedback {
    fn notify(&mut self, event: &RoundEvent);
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SilentFeedback;

impl Feedback for SilentFeedback {
    fn notify(&mut self, _event: &RoundEvent) {}
}

/// Keeps every event, handy for replays and tests.
impl Feedback for Vec<RoundEvent> {
    fn notify(&mut self, event: &RoundEvent) {
        self.push(*event);
    }
}
