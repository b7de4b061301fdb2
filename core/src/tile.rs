use serde::{Deserialize, Serialize};

use crate::*;

/// Stable identity of a tile for the lifetime of a round.
pub type TileId = u16;

/// What a tile shows, and what "correct" means for it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TilePayload {
    Number { number: u8, color: Rgb },
    Color { color: Rgb, target_color: Rgb },
    Pattern {
        pattern: PatternKind,
        target_row: Coord,
        target_col: Coord,
    },
}

impl TilePayload {
    pub const fn mode(&self) -> Mode {
        match self {
            Self::Number { .. } => Mode::Classic,
            Self::Color { .. } => Mode::Color,
            Self::Pattern { .. } => Mode::Pattern,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    id: TileId,
    payload: TilePayload,
    current_index: TileIndex,
    locked: bool,
}

impl Tile {
    pub(crate) const fn new(id: TileId, payload: TilePayload) -> Self {
        Self {
            id,
            payload,
            current_index: 0,
            locked: false,
        }
    }

    pub const fn id(&self) -> TileId {
        self.id
    }

    pub const fn payload(&self) -> &TilePayload {
        &self.payload
    }

    pub const fn current_index(&self) -> TileIndex {
        self.current_index
    }

    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    pub const fn number(&self) -> Option<u8> {
        match self.payload {
            TilePayload::Number { number, .. } => Some(number),
            _ => None,
        }
    }

    pub const fn target_color(&self) -> Option<Rgb> {
        match self.payload {
            TilePayload::Color { target_color, .. } => Some(target_color),
            _ => None,
        }
    }

    pub const fn pattern(&self) -> Option<PatternKind> {
        match self.payload {
            TilePayload::Pattern { pattern, .. } => Some(pattern),
            _ => None,
        }
    }

    /// Whether this tile belongs at `index`.
    ///
    /// Color tiles belong anywhere in the row whose palette entry matches their
    /// target color; `palette` is only consulted for them.
    pub fn fits_at(&self, index: TileIndex, size: BoardSize, palette: &[Rgb]) -> bool {
        let (row, col) = size.coords_of(index);
        match self.payload {
            TilePayload::Number { number, .. } => usize::from(number) == index + 1,
            TilePayload::Color { target_color, .. } => {
                palette.get(usize::from(row)) == Some(&target_color)
            }
            TilePayload::Pattern {
                target_row,
                target_col,
                ..
            } => (target_row, target_col) == (row, col),
        }
    }

    pub fn is_home(&self, size: BoardSize, palette: &[Rgb]) -> bool {
        self.fits_at(self.current_index, size, palette)
    }

    pub(crate) fn place_at(&mut self, index: TileIndex) {
        self.current_index = index;
    }

    pub(crate) fn lock(&mut self) {
        self.locked = true;
    }
}
