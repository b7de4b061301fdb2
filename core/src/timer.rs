use serde::{Deserialize, Serialize};

/// Time budget of a free-play round, in seconds.
pub const DEFAULT_TIME_LIMIT: u32 = 180;

/// Ceiling the countdown can be raised to by power-ups.
pub const MAX_TIME: u32 = 300;

/// Countdown in whole seconds, advanced by host ticks.
///
/// The countdown does not know whether the round is running; the engine only
/// forwards ticks while playing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: u32,
    max: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Round not playing, the tick was dropped.
    Suppressed,
    Running(u32),
    Expired,
}

impl Countdown {
    pub fn new(limit: u32, max: u32) -> Self {
        let max = max.max(limit);
        Self {
            remaining: limit,
            max,
        }
    }

    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    pub const fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    pub fn tick(&mut self) -> TickOutcome {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            TickOutcome::Expired
        } else {
            TickOutcome::Running(self.remaining)
        }
    }

    /// Adds up to `seconds`, capped at the maximum; returns what was added.
    pub fn extend(&mut self, seconds: u32) -> u32 {
        let next = self.remaining.saturating_add(seconds).min(self.max);
        let added = next - self.remaining;
        self.remaining = next;
        added
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_LIMIT, MAX_TIME)
    }
}
