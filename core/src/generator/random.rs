use super::*;

/// Uniform shuffle of the solved tiles.
///
/// Adjacent swaps generate every permutation, so any shuffle is solvable and
/// there is no parity check. The only thing rejected is a board that is already
/// complete, which is re-rolled up to `MAX_ATTEMPTS` times.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomBoardGenerator {
    seed: u64,
}

impl RandomBoardGenerator {
    pub const MAX_ATTEMPTS: u8 = 10;

    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(self, mode: Mode, size: BoardSize) -> Result<Board> {
        use rand::prelude::*;

        let home = board::home_tiles(mode, size);
        let mut rng = SmallRng::seed_from_u64(self.seed);

        let mut attempt = 0;
        loop {
            attempt += 1;
            let mut tiles = home.clone();
            // Fisher-Yates
            for i in (1..tiles.len()).rev() {
                let j = rng.random_range(0..=i);
                tiles.swap(i, j);
            }
            let board = Board::from_tiles(size, tiles)?;

            if !completion::board_complete(&board, mode) {
                log::trace!("Shuffled {} {} board on attempt {}", mode, size, attempt);
                return Ok(board);
            }
            if attempt >= Self::MAX_ATTEMPTS {
                log::warn!(
                    "Shuffle kept producing solved {} boards after {} attempts, using it anyway",
                    mode,
                    attempt
                );
                return Ok(board);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_board_is_a_permutation() {
        let board = RandomBoardGenerator::new(7)
            .generate(Mode::Classic, BoardSize::SIX)
            .unwrap();
        let mut numbers = board.numbers();
        numbers.sort_unstable();
        assert_eq!(numbers, (1..=36).collect::<Vec<u8>>());
        assert!(!completion::board_complete(&board, Mode::Classic));
    }

    #[test]
    fn color_tiles_keep_their_target_through_shuffle() {
        let board = RandomBoardGenerator::new(3)
            .generate(Mode::Color, BoardSize::FOUR)
            .unwrap();
        let palette = colors(4);
        for color in &palette {
            let count = board
                .tiles()
                .filter(|tile| tile.target_color() == Some(*color))
                .count();
            assert_eq!(count, 4);
        }
    }
}
