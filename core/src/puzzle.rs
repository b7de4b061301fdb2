//! Fixed puzzles, grouped into packs that unlock in order.
//!
//! Each puzzle is written down as a chain of adjacent swaps applied to the
//! solved board. Undoing the chain in reverse solves it, so the chain length is
//! the puzzle's exact move budget.

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::*;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleDefinition {
    pub name: String,
    pub size: BoardSize,
    pub max_moves: u32,
    pub time_limit: u32,
    /// Row-major placement, a permutation of `1..=size²`.
    pub start_board: Vec<u8>,
}

impl PuzzleDefinition {
    pub fn new(
        name: impl Into<String>,
        size: BoardSize,
        max_moves: u32,
        time_limit: u32,
        start_board: Vec<u8>,
    ) -> Result<Self> {
        let puzzle = Self {
            name: name.into(),
            size,
            max_moves,
            time_limit,
            start_board,
        };
        puzzle.validate()?;
        Ok(puzzle)
    }

    /// Applies `swaps` to the solved board; the budget is the number of swaps.
    pub fn from_swaps(
        name: impl Into<String>,
        size: BoardSize,
        time_limit: u32,
        swaps: &[(TileIndex, TileIndex)],
    ) -> Result<Self> {
        let mut start_board: Vec<u8> = (1..=size.tile_count() as u8).collect();
        for &(a, b) in swaps {
            if !size.is_adjacent(a, b) {
                return Err(GameError::InvalidPuzzle);
            }
            start_board.swap(a, b);
        }
        Self::new(name, size, swaps.len() as u32, time_limit, start_board)
    }

    pub fn validate(&self) -> Result<()> {
        let total = self.size.tile_count();
        if self.start_board.len() != total {
            return Err(GameError::InvalidPuzzle);
        }
        let mut seen = vec![false; total];
        for &number in &self.start_board {
            let slot = usize::from(number)
                .checked_sub(1)
                .filter(|&slot| slot < total)
                .ok_or(GameError::InvalidPuzzle)?;
            if core::mem::replace(&mut seen[slot], true) {
                return Err(GameError::InvalidPuzzle);
            }
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pack {
    Beginner,
    Intermediate,
    Advanced,
}

impl Pack {
    pub const ALL: [Self; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    pub const fn size(self) -> BoardSize {
        match self {
            Self::Beginner => BoardSize::FOUR,
            Self::Intermediate => BoardSize::FIVE,
            Self::Advanced => BoardSize::SIX,
        }
    }

    /// The pack that has to be completed before this one opens.
    pub const fn prerequisite(self) -> Option<Self> {
        match self {
            Self::Beginner => None,
            Self::Intermediate => Some(Self::Beginner),
            Self::Advanced => Some(Self::Intermediate),
        }
    }

    pub fn puzzles(self) -> &'static [PuzzleDefinition] {
        match self {
            Self::Beginner => &BEGINNER,
            Self::Intermediate => &INTERMEDIATE,
            Self::Advanced => &ADVANCED,
        }
    }

    pub fn puzzle(self, index: usize) -> Result<&'static PuzzleDefinition> {
        self.puzzles().get(index).ok_or(GameError::UnknownPuzzle)
    }
}

impl fmt::Display for Pack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Pack {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|pack| pack.name() == s)
            .ok_or(GameError::InvalidBucketKey)
    }
}

/// Position of a fixed puzzle within its pack.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PuzzleRef {
    pub pack: Pack,
    pub index: usize,
}

impl PuzzleRef {
    pub const fn new(pack: Pack, index: usize) -> Self {
        Self { pack, index }
    }

    pub fn definition(self) -> Result<&'static PuzzleDefinition> {
        self.pack.puzzle(self.index)
    }
}

struct PuzzleSpec {
    name: &'static str,
    time_limit: u32,
    swaps: &'static [(TileIndex, TileIndex)],
}

const BEGINNER_SPECS: &[PuzzleSpec] = &[
    PuzzleSpec {
        name: "First Steps",
        time_limit: 60,
        swaps: &[(0, 1)],
    },
    PuzzleSpec {
        name: "Corner Turn",
        time_limit: 60,
        swaps: &[(14, 15), (11, 15)],
    },
    PuzzleSpec {
        name: "Three Cycle",
        time_limit: 75,
        swaps: &[(0, 1), (1, 2)],
    },
    PuzzleSpec {
        name: "Column Drift",
        time_limit: 90,
        swaps: &[(0, 4), (4, 8), (8, 12)],
    },
    PuzzleSpec {
        name: "Center Loop",
        time_limit: 90,
        swaps: &[(5, 6), (6, 10), (10, 9)],
    },
];

const INTERMEDIATE_SPECS: &[PuzzleSpec] = &[
    PuzzleSpec {
        name: "Long Row",
        time_limit: 90,
        swaps: &[(0, 1), (1, 2), (2, 3), (3, 4)],
    },
    PuzzleSpec {
        name: "Stairway",
        time_limit: 90,
        swaps: &[(0, 1), (1, 6), (6, 7), (7, 12)],
    },
    PuzzleSpec {
        name: "Twin Swaps",
        time_limit: 75,
        swaps: &[(3, 4), (20, 21), (12, 17)],
    },
    PuzzleSpec {
        name: "Ring Road",
        time_limit: 120,
        swaps: &[(6, 7), (7, 8), (8, 13), (13, 18), (18, 17)],
    },
    PuzzleSpec {
        name: "Last Row",
        time_limit: 120,
        swaps: &[(20, 21), (21, 22), (22, 23), (23, 24), (19, 24)],
    },
];

const ADVANCED_SPECS: &[PuzzleSpec] = &[
    PuzzleSpec {
        name: "Diagonal",
        time_limit: 120,
        swaps: &[(0, 1), (1, 7), (7, 8), (8, 14), (14, 15), (15, 21)],
    },
    PuzzleSpec {
        name: "Spiral",
        time_limit: 150,
        swaps: &[
            (14, 15),
            (15, 21),
            (21, 20),
            (20, 19),
            (19, 13),
            (13, 7),
            (7, 8),
        ],
    },
    PuzzleSpec {
        name: "Edges",
        time_limit: 120,
        swaps: &[(0, 6), (6, 12), (5, 11), (11, 17), (30, 31), (34, 35)],
    },
    PuzzleSpec {
        name: "Snake",
        time_limit: 150,
        swaps: &[
            (24, 25),
            (25, 26),
            (26, 27),
            (27, 33),
            (33, 32),
            (32, 31),
            (31, 30),
        ],
    },
    PuzzleSpec {
        name: "Finale",
        time_limit: 180,
        swaps: &[
            (0, 1),
            (1, 2),
            (2, 8),
            (8, 9),
            (9, 15),
            (15, 16),
            (16, 22),
            (22, 23),
        ],
    },
];

static BEGINNER: LazyLock<Vec<PuzzleDefinition>> =
    LazyLock::new(|| build_pack(Pack::Beginner, BEGINNER_SPECS));
static INTERMEDIATE: LazyLock<Vec<PuzzleDefinition>> =
    LazyLock::new(|| build_pack(Pack::Intermediate, INTERMEDIATE_SPECS));
static ADVANCED: LazyLock<Vec<PuzzleDefinition>> =
    LazyLock::new(|| build_pack(Pack::Advanced, ADVANCED_SPECS));

fn build_pack(pack: Pack, specs: &[PuzzleSpec]) -> Vec<PuzzleDefinition> {
    specs
        .iter()
        .filter_map(|spec| {
            match PuzzleDefinition::from_swaps(spec.name, pack.size(), spec.time_limit, spec.swaps)
            {
                Ok(puzzle) => Some(puzzle),
                Err(err) => {
                    log::error!("Dropping puzzle {:?} from {} pack: {}", spec.name, pack, err);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_pack_builds_all_of_its_puzzles() {
        assert_eq!(Pack::Beginner.puzzles().len(), BEGINNER_SPECS.len());
        assert_eq!(Pack::Intermediate.puzzles().len(), INTERMEDIATE_SPECS.len());
        assert_eq!(Pack::Advanced.puzzles().len(), ADVANCED_SPECS.len());
    }

    #[test]
    fn no_puzzle_starts_solved() {
        for pack in Pack::ALL {
            for puzzle in pack.puzzles() {
                assert_eq!(puzzle.size, pack.size());
                let solved: Vec<u8> = (1..=pack.size().tile_count() as u8).collect();
                assert_ne!(puzzle.start_board, solved, "{}", puzzle.name);
            }
        }
    }

    #[test]
    fn first_puzzle_is_one_adjacent_inversion() {
        let puzzle = Pack::Beginner.puzzle(0).unwrap();
        assert_eq!(puzzle.start_board[..4], [2, 1, 3, 4]);
        assert_eq!(puzzle.max_moves, 1);
    }

    #[test]
    fn from_swaps_rejects_non_adjacent_pairs() {
        let err = PuzzleDefinition::from_swaps("bad", BoardSize::FOUR, 60, &[(3, 4)]);
        assert_eq!(err, Err(GameError::InvalidPuzzle));
    }

    #[test]
    fn validate_rejects_out_of_range_numbers() {
        let mut start: Vec<u8> = (1..=16).collect();
        start[15] = 17;
        let puzzle = PuzzleDefinition::new("bad", BoardSize::FOUR, 1, 60, start);
        assert_eq!(puzzle, Err(GameError::InvalidPuzzle));
    }

    #[test]
    fn unknown_index_is_an_error() {
        assert_eq!(Pack::Advanced.puzzle(99), Err(GameError::UnknownPuzzle));
    }
}
