use crate::*;
pub use fixed::*;
pub use random::*;

mod fixed;
mod random;

pub trait BoardGenerator {
    fn generate(self, mode: Mode, size: BoardSize) -> Result<Board>;
}

/// Builds the opening board of a round.
///
/// With a puzzle definition the placement is exactly its start board, otherwise
/// a seeded shuffle. Never fails: any generation error is logged and replaced by
/// the solved board for `mode` and `size`, which the round treats as already won.
pub fn generate(
    mode: Mode,
    size: BoardSize,
    puzzle: Option<&PuzzleDefinition>,
    seed: u64,
) -> Board {
    let generated = match puzzle {
        Some(puzzle) => FixedBoardGenerator::new(puzzle).generate(mode, size),
        None => RandomBoardGenerator::new(seed).generate(mode, size),
    };
    match generated {
        Ok(board) => board,
        Err(err) => {
            log::error!(
                "Board generation failed for {} {}, falling back to solved board: {}",
                mode,
                size,
                err
            );
            Board::solved(mode, size)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_puzzle_falls_back_to_solved_board() {
        let puzzle = Pack::Beginner.puzzle(0).unwrap();
        let board = generate(Mode::Pattern, BoardSize::FOUR, Some(puzzle), 0);
        assert_eq!(board, Board::solved(Mode::Pattern, BoardSize::FOUR));
    }

    #[test]
    fn same_seed_gives_same_board() {
        let a = generate(Mode::Color, BoardSize::FIVE, None, 99);
        let b = generate(Mode::Color, BoardSize::FIVE, None, 99);
        assert_eq!(a, b);
    }
}
