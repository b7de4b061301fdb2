use core::fmt;
use core::ops::Range;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::*;

/// Single coordinate axis used for rows, columns, and the board edge.
pub type Coord = u8;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// Position in the flat row-major tile sequence, `row * edge + col`.
pub type TileIndex = usize;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

/// Completion rule a round is played under.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Rows read `1..=N` left to right, top to bottom.
    Classic,
    /// Every tile in a row shares one target color.
    Color,
    /// Every row holds each pattern of the catalog exactly once.
    Pattern,
}

impl Mode {
    pub const ALL: [Self; 3] = [Self::Classic, Self::Color, Self::Pattern];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Color => "color",
            Self::Pattern => "pattern",
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self::Classic
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or(GameError::InvalidBucketKey)
    }
}

/// Edge length of a square board, always within `MIN..=MAX`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct BoardSize(Coord);

impl BoardSize {
    pub const MIN: Coord = 4;
    pub const MAX: Coord = 6;

    pub const FOUR: Self = Self(4);
    pub const FIVE: Self = Self(5);
    pub const SIX: Self = Self(6);

    pub const ALL: [Self; 3] = [Self::FOUR, Self::FIVE, Self::SIX];

    /// Builds a size, clamping out-of-range edges into `MIN..=MAX`.
    pub fn new(edge: Coord) -> Self {
        Self(edge.clamp(Self::MIN, Self::MAX))
    }

    pub fn try_new(edge: Coord) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&edge) {
            Ok(Self(edge))
        } else {
            Err(GameError::InvalidSize)
        }
    }

    pub const fn edge(self) -> Coord {
        self.0
    }

    pub const fn tile_count(self) -> usize {
        (self.0 as usize) * (self.0 as usize)
    }

    pub fn validate_index(self, index: TileIndex) -> Result<TileIndex> {
        if index < self.tile_count() {
            Ok(index)
        } else {
            Err(GameError::InvalidIndex)
        }
    }

    /// Callers must pass an in-range index.
    pub fn coords_of(self, index: TileIndex) -> Coord2 {
        let edge = usize::from(self.0);
        ((index / edge) as Coord, (index % edge) as Coord)
    }

    pub fn index_of(self, (row, col): Coord2) -> TileIndex {
        usize::from(row) * usize::from(self.0) + usize::from(col)
    }

    /// Flat indices covered by `row`.
    pub fn row_indices(self, row: Coord) -> Range<TileIndex> {
        let start = self.index_of((row, 0));
        start..start + usize::from(self.0)
    }

    pub fn iter_neighbors(self, index: TileIndex) -> NeighborIter {
        NeighborIter::new(self.coords_of(index), (self.0, self.0))
    }

    /// Orthogonal neighbors only, Manhattan distance of exactly one.
    pub fn is_adjacent(self, a: TileIndex, b: TileIndex) -> bool {
        if a >= self.tile_count() || b >= self.tile_count() {
            return false;
        }
        let target = self.coords_of(b);
        self.iter_neighbors(a).any(|coords| coords == target)
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        Self::FOUR
    }
}

impl TryFrom<u8> for BoardSize {
    type Error = GameError;

    fn try_from(edge: u8) -> Result<Self> {
        Self::try_new(edge)
    }
}

impl From<BoardSize> for u8 {
    fn from(size: BoardSize) -> Self {
        size.0
    }
}

impl fmt::Display for BoardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{0}x{0}", self.0)
    }
}

impl FromStr for BoardSize {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let (rows, cols) = s.split_once('x').ok_or(GameError::InvalidSize)?;
        let rows: Coord = rows.parse().map_err(|_| GameError::InvalidSize)?;
        let cols: Coord = cols.parse().map_err(|_| GameError::InvalidSize)?;
        if rows != cols {
            return Err(GameError::InvalidSize);
        }
        Self::try_new(rows)
    }
}

const DISPLACEMENTS: [(isize, isize); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (isize, isize), bounds: Coord2) -> Option<Coord2> {
    let (row, col) = coords;
    let (d_row, d_col) = delta;
    let (max_row, max_col) = bounds;

    let next_row = row.checked_add_signed(d_row.try_into().ok()?)?;
    if next_row >= max_row {
        return None;
    }

    let next_col = col.checked_add_signed(d_col.try_into().ok()?)?;
    if next_col >= max_col {
        return None;
    }

    Some((next_row, next_col))
}

/// Iterates the orthogonal neighbors of a cell that fall inside the board.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    index: u8,
}

impl NeighborIter {
    fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= DISPLACEMENTS.len() {
                return None;
            }

            let next_item =
                apply_delta(self.center, DISPLACEMENTS[self.index as usize], self.bounds);
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}
