use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::*;

/// Tiles of a round laid out row-major.
///
/// Every tile's `current_index` matches its position; the only ways to move
/// tiles are [`Board::swapped`] and the constructors, which all re-sync it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    size: BoardSize,
    tiles: Array2<Tile>,
}

impl Board {
    /// Lays `tiles` out in the given order.
    pub fn from_tiles(size: BoardSize, tiles: Vec<Tile>) -> Result<Self> {
        let edge = usize::from(size.edge());
        if tiles.len() != size.tile_count() {
            return Err(GameError::InvalidSize);
        }
        let mut tiles =
            Array2::from_shape_vec((edge, edge), tiles).map_err(|_| GameError::InvalidSize)?;
        for (index, tile) in tiles.iter_mut().enumerate() {
            tile.place_at(index);
        }
        Ok(Self { size, tiles })
    }

    /// Classic board whose placement reads `numbers` row-major.
    pub fn from_numbers(size: BoardSize, numbers: &[u8]) -> Result<Self> {
        let home = home_tiles(Mode::Classic, size);
        let mut seen = vec![false; size.tile_count()];
        let mut placed = Vec::with_capacity(home.len());
        for &number in numbers {
            let slot = usize::from(number)
                .checked_sub(1)
                .filter(|&slot| slot < home.len())
                .ok_or(GameError::InvalidPuzzle)?;
            if core::mem::replace(&mut seen[slot], true) {
                return Err(GameError::InvalidPuzzle);
            }
            placed.push(home[slot]);
        }
        Self::from_tiles(size, placed).map_err(|_| GameError::InvalidPuzzle)
    }

    /// The already-solved arrangement for `mode`.
    pub fn solved(mode: Mode, size: BoardSize) -> Self {
        let edge = usize::from(size.edge());
        let home = home_tiles(mode, size);
        let tiles = Array2::from_shape_fn((edge, edge), |(row, col)| {
            let mut tile = home[row * edge + col];
            tile.place_at(row * edge + col);
            tile
        });
        Self { size, tiles }
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    pub fn mode(&self) -> Mode {
        self.tiles
            .iter()
            .next()
            .map_or(Mode::Classic, |tile| tile.payload().mode())
    }

    pub fn tile(&self, index: TileIndex) -> Option<&Tile> {
        let index = self.size.validate_index(index).ok()?;
        Some(&self.tiles[self.size.coords_of(index).to_nd_index()])
    }

    /// All tiles in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub fn row(&self, row: Coord) -> ArrayView1<'_, Tile> {
        self.tiles.row(row.into())
    }

    pub fn is_locked(&self, index: TileIndex) -> bool {
        self.tile(index).is_some_and(Tile::is_locked)
    }

    /// Numbers in placement order, empty for non-classic boards.
    pub fn numbers(&self) -> Vec<u8> {
        self.tiles.iter().filter_map(Tile::number).collect()
    }

    /// A copy of this board with the tiles at `a` and `b` exchanged.
    pub fn swapped(&self, a: TileIndex, b: TileIndex) -> Result<Self> {
        let a_coords = self.size.coords_of(self.size.validate_index(a)?);
        let b_coords = self.size.coords_of(self.size.validate_index(b)?);
        let mut next = self.clone();
        next.tiles.swap(a_coords.to_nd_index(), b_coords.to_nd_index());
        next.tiles[a_coords.to_nd_index()].place_at(a);
        next.tiles[b_coords.to_nd_index()].place_at(b);
        Ok(next)
    }

    pub(crate) fn lock_row(&mut self, row: Coord) {
        for tile in self.tiles.row_mut(row.into()) {
            tile.lock();
        }
    }
}

/// Tiles of `mode` in their solved order, before any placement is applied.
pub(crate) fn home_tiles(mode: Mode, size: BoardSize) -> Vec<Tile> {
    let edge = size.edge();
    match mode {
        Mode::Classic => colors(size.tile_count())
            .into_iter()
            .enumerate()
            .map(|(i, color)| {
                Tile::new(
                    i as TileId,
                    TilePayload::Number {
                        number: (i + 1) as u8,
                        color,
                    },
                )
            })
            .collect(),
        Mode::Color => {
            let palette = colors(edge.into());
            (0..size.tile_count())
                .map(|i| {
                    let color = palette[i / usize::from(edge)];
                    Tile::new(
                        i as TileId,
                        TilePayload::Color {
                            color,
                            target_color: color,
                        },
                    )
                })
                .collect()
        }
        Mode::Pattern => {
            let catalog = patterns(size);
            let mut tiles = Vec::with_capacity(size.tile_count());
            for target_row in 0..edge {
                for (target_col, pattern) in catalog.iter().enumerate() {
                    tiles.push(Tile::new(
                        tiles.len() as TileId,
                        TilePayload::Pattern {
                            pattern: pattern.kind,
                            target_row,
                            target_col: target_col as Coord,
                        },
                    ));
                }
            }
            tiles
        }
    }
}
