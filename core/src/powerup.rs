use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Seconds added by Freeze-Time.
pub const FREEZE_TIME_SECONDS: u32 = 15;

/// Misplaced tiles Auto-Complete will relocate.
pub const AUTO_COMPLETE_TILES: u32 = 2;

/// Identifier of a single power-up token within a round.
pub type PowerUpId = u32;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    FreezeTime,
    TeleportSwap,
    AutoComplete,
    FreeMove,
    RowHint,
}

impl PowerUpKind {
    pub const ALL: [Self; 5] = [
        Self::FreezeTime,
        Self::TeleportSwap,
        Self::AutoComplete,
        Self::FreeMove,
        Self::RowHint,
    ];

    pub const fn rarity(self) -> Rarity {
        match self {
            Self::FreeMove | Self::RowHint => Rarity::Common,
            Self::FreezeTime | Self::TeleportSwap => Rarity::Rare,
            Self::AutoComplete => Rarity::Epic,
        }
    }

    pub const fn magnitude(self) -> u32 {
        match self {
            Self::FreezeTime => FREEZE_TIME_SECONDS,
            Self::AutoComplete => AUTO_COMPLETE_TILES,
            Self::TeleportSwap | Self::FreeMove | Self::RowHint => 1,
        }
    }

    /// The override this kind arms for the next swap, if it acts that way.
    pub const fn arms(self) -> Option<Override> {
        match self {
            Self::TeleportSwap => Some(Override::IgnoreAdjacency),
            Self::FreeMove => Some(Override::FreeMove),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
}

/// Immutable single-use token.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: PowerUpId,
    pub kind: PowerUpKind,
    pub rarity: Rarity,
    pub magnitude: u32,
}

/// One-shot relaxation of the swap rules, consumed by the next accepted swap.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Override {
    IgnoreAdjacency,
    FreeMove,
}

/// When a round hands out power-ups.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUpPolicy {
    pub award_on_row_complete: bool,
    /// `Some(n)` awards a power-up on an accepted swap with probability `1/n`.
    pub move_award_chance: Option<u32>,
}

impl PowerUpPolicy {
    pub const FREE_PLAY: Self = Self {
        award_on_row_complete: true,
        move_award_chance: Some(7),
    };

    pub const DISABLED: Self = Self {
        award_on_row_complete: false,
        move_award_chance: None,
    };
}

impl Default for PowerUpPolicy {
    fn default() -> Self {
        Self::FREE_PLAY
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PowerUpOutcome {
    /// Token consumed, nothing was eligible.
    NoEffect,
    TimeAdded(u32),
    Armed(Override),
    HintShown(Coord),
    TilesPlaced(u32),
    Won,
}

/// Draws power-ups for a round and hands out their ids.
#[derive(Clone, Debug)]
pub struct PowerUpDispenser {
    rng: SmallRng,
    next_id: PowerUpId,
}

impl PowerUpDispenser {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            next_id: 0,
        }
    }

    /// A kind drawn uniformly from the catalog.
    pub fn draw(&mut self) -> PowerUp {
        let kind = PowerUpKind::ALL[self.rng.random_range(0..PowerUpKind::ALL.len())];
        self.issue(kind)
    }

    pub fn issue(&mut self, kind: PowerUpKind) -> PowerUp {
        let id = self.next_id;
        self.next_id += 1;
        PowerUp {
            id,
            kind,
            rarity: kind.rarity(),
            magnitude: kind.magnitude(),
        }
    }

    /// True with probability `1/chance`.
    pub fn roll(&mut self, chance: u32) -> bool {
        chance > 0 && self.rng.random_range(0..chance) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_ids_are_unique() {
        let mut dispenser = PowerUpDispenser::new(1);
        let ids: Vec<_> = (0..10).map(|_| dispenser.draw().id).collect();
        assert_eq!(ids, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn draws_cover_the_whole_catalog() {
        let mut dispenser = PowerUpDispenser::new(5);
        let drawn: Vec<_> = (0..200).map(|_| dispenser.draw().kind).collect();
        for kind in PowerUpKind::ALL {
            assert!(drawn.contains(&kind), "{kind:?} never drawn");
        }
    }

    #[test]
    fn issued_tokens_carry_catalog_values() {
        let token = PowerUpDispenser::new(0).issue(PowerUpKind::FreezeTime);
        assert_eq!(token.magnitude, FREEZE_TIME_SECONDS);
        assert_eq!(token.rarity, Rarity::Rare);
    }

    #[test]
    fn zero_chance_never_awards() {
        let mut dispenser = PowerUpDispenser::new(0);
        assert!((0..50).all(|_| !dispenser.roll(0)));
        assert!((0..50).all(|_| dispenser.roll(1)));
    }
}
