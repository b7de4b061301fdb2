use super::*;

/// Places tiles exactly as a puzzle definition lists them.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedBoardGenerator<'a> {
    puzzle: &'a PuzzleDefinition,
}

impl<'a> FixedBoardGenerator<'a> {
    pub fn new(puzzle: &'a PuzzleDefinition) -> Self {
        Self { puzzle }
    }
}

impl BoardGenerator for FixedBoardGenerator<'_> {
    fn generate(self, mode: Mode, size: BoardSize) -> Result<Board> {
        if mode != Mode::Classic || size != self.puzzle.size {
            return Err(GameError::InvalidPuzzle);
        }
        self.puzzle.validate()?;
        Board::from_numbers(size, &self.puzzle.start_board)
    }
}
