//! Row and board completion predicates. All of them are pure.

use crate::*;

/// Whether `row` satisfies the completion rule of `mode`.
///
/// Tiles whose payload belongs to a different mode never complete a row.
pub fn row_complete(board: &Board, row: Coord, mode: Mode) -> bool {
    let size = board.size();
    if row >= size.edge() {
        return false;
    }
    let tiles = board.row(row);

    match mode {
        Mode::Classic => tiles.iter().zip(size.row_indices(row)).all(|(tile, index)| {
            tile.number()
                .is_some_and(|number| usize::from(number) == index + 1)
        }),
        Mode::Color => {
            let Some(first) = tiles.iter().next().and_then(Tile::target_color) else {
                return false;
            };
            tiles
                .iter()
                .all(|tile| tile.target_color() == Some(first))
        }
        Mode::Pattern => {
            let mut seen = 0u8;
            for tile in tiles.iter() {
                let Some(pattern) = tile.pattern() else {
                    return false;
                };
                if seen & pattern.bit() != 0 {
                    return false;
                }
                seen |= pattern.bit();
            }
            seen == pattern_mask(size)
        }
    }
}

/// Whether every row of the board is complete under `mode`.
pub fn board_complete(board: &Board, mode: Mode) -> bool {
    (0..board.size().edge()).all(|row| row_complete(board, row, mode))
}

/// Rows currently complete, in ascending order.
pub fn completed_rows(board: &Board, mode: Mode) -> impl Iterator<Item = Coord> + '_ {
    (0..board.size().edge()).filter(move |&row| row_complete(board, row, mode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use PatternKind::*;

    fn pattern_board(first_row: [PatternKind; 4]) -> Board {
        let mut tiles: Vec<Tile> = Board::solved(Mode::Pattern, BoardSize::FOUR)
            .tiles()
            .copied()
            .collect();
        for (tile, pattern) in tiles.iter_mut().zip(first_row) {
            *tile = Tile::new(
                tile.id(),
                TilePayload::Pattern {
                    pattern,
                    target_row: 0,
                    target_col: 0,
                },
            );
        }
        Board::from_tiles(BoardSize::FOUR, tiles).unwrap()
    }

    #[test]
    fn pattern_row_with_each_symbol_once_is_complete() {
        let board = pattern_board([Dots, Stripes, Waves, Grid]);
        assert!(row_complete(&board, 0, Mode::Pattern));

        let shuffled = pattern_board([Grid, Waves, Dots, Stripes]);
        assert!(row_complete(&shuffled, 0, Mode::Pattern));
    }

    #[test]
    fn pattern_row_with_duplicate_is_incomplete() {
        let board = pattern_board([Dots, Dots, Waves, Grid]);
        assert!(!row_complete(&board, 0, Mode::Pattern));
    }

    #[test]
    fn pattern_row_with_foreign_symbol_is_incomplete() {
        let board = pattern_board([Dots, Stripes, Waves, Checks]);
        assert!(!row_complete(&board, 0, Mode::Pattern));
    }

    #[test]
    fn classic_rows_track_sequence() {
        let board = Board::solved(Mode::Classic, BoardSize::FOUR)
            .swapped(0, 1)
            .unwrap();
        assert!(!row_complete(&board, 0, Mode::Classic));
        assert!(row_complete(&board, 1, Mode::Classic));
        assert!(!board_complete(&board, Mode::Classic));
        assert_eq!(completed_rows(&board, Mode::Classic).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn color_row_only_needs_a_shared_target() {
        let board = Board::solved(Mode::Color, BoardSize::FOUR);
        // exchanging two whole rows keeps every row uniform
        let mut swapped = board.clone();
        for col in 0..4 {
            swapped = swapped.swapped(col, 4 + col).unwrap();
        }
        assert!(board_complete(&swapped, Mode::Color));

        let mixed = board.swapped(3, 4).unwrap();
        assert!(!row_complete(&mixed, 0, Mode::Color));
        assert!(row_complete(&mixed, 2, Mode::Color));
    }

    #[test]
    fn mode_mismatch_never_completes() {
        let board = Board::solved(Mode::Classic, BoardSize::FOUR);
        assert!(!board_complete(&board, Mode::Pattern));
        assert!(!row_complete(&board, 4, Mode::Classic));
    }
}
