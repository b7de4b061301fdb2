//! Static resources tiles draw from: a color palette and a set of patterns.
//!
//! Both lists are order-stable. Color and pattern rounds index them by
//! position, so entry `i` of `colors(size)` is the target of row `i` and entry
//! `i` of `patterns(size)` is the target of column `i`.

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

/// Largest palette the catalog hands out, one color per tile on a 6x6 board.
pub const MAX_COLORS: usize = 36;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `hue` in degrees, `saturation` and `lightness` in `0.0..=1.0`.
    fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let sector = hue / 60.0;
        let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
        let (r, g, b) = match sector as u8 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = lightness - chroma / 2.0;
        let channel = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self::new(channel(r), channel(g), channel(b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Returns `count` visually distinct colors, hues spread evenly around the wheel.
///
/// Callers keep `count` at or below [`MAX_COLORS`]; larger requests still
/// produce distinct hues but they get hard to tell apart.
pub fn colors(count: usize) -> Vec<Rgb> {
    if count > MAX_COLORS {
        log::warn!(
            "Palette of {} colors requested, catalog is tuned for {}",
            count,
            MAX_COLORS
        );
    }
    (0..count)
        .map(|i| {
            let hue = 360.0 * i as f32 / count as f32;
            // alternate lightness so neighbouring hues on big boards stay apart
            let lightness = if count > 12 && i % 2 == 1 { 0.62 } else { 0.48 };
            Rgb::from_hsl(hue, 0.72, lightness)
        })
        .collect()
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    Dots,
    Stripes,
    Waves,
    Grid,
    Zigzag,
    Checks,
}

impl PatternKind {
    pub const ALL: [Self; 6] = [
        Self::Dots,
        Self::Stripes,
        Self::Waves,
        Self::Grid,
        Self::Zigzag,
        Self::Checks,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Dots => "dots",
            Self::Stripes => "stripes",
            Self::Waves => "waves",
            Self::Grid => "grid",
            Self::Zigzag => "zigzag",
            Self::Checks => "checks",
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            Self::Dots => '●',
            Self::Stripes => '≡',
            Self::Waves => '∿',
            Self::Grid => '▦',
            Self::Zigzag => 'ʌ',
            Self::Checks => '▚',
        }
    }

    pub const fn color(self) -> Rgb {
        match self {
            Self::Dots => Rgb::new(0xe6, 0x4a, 0x4a),
            Self::Stripes => Rgb::new(0x3f, 0x8c, 0xe0),
            Self::Waves => Rgb::new(0x2f, 0xb3, 0x7a),
            Self::Grid => Rgb::new(0xf2, 0xb1, 0x34),
            Self::Zigzag => Rgb::new(0x9b, 0x59, 0xd0),
            Self::Checks => Rgb::new(0x5a, 0x5f, 0x6b),
        }
    }

    /// One bit per kind, used to test rows for "each exactly once".
    pub(crate) const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A pattern as shown to the player.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Pattern {
    pub kind: PatternKind,
    pub symbol: char,
    pub name: &'static str,
    pub color: Rgb,
}

impl From<PatternKind> for Pattern {
    fn from(kind: PatternKind) -> Self {
        Self {
            kind,
            symbol: kind.symbol(),
            name: kind.name(),
            color: kind.color(),
        }
    }
}

/// The first `size.edge()` patterns of the catalog.
pub fn patterns(size: BoardSize) -> Vec<Pattern> {
    PatternKind::ALL
        .iter()
        .take(size.edge().into())
        .map(|&kind| Pattern::from(kind))
        .collect()
}

/// Bit set of every pattern kind a row must contain on a board of `size`.
pub(crate) fn pattern_mask(size: BoardSize) -> u8 {
    patterns(size)
        .iter()
        .fold(0, |mask, pattern| mask | pattern.kind.bit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashbrown::HashSet;

    #[test]
    fn full_palette_is_distinct() {
        let palette = colors(MAX_COLORS);
        assert_eq!(palette.len(), MAX_COLORS);
        let unique: HashSet<_> = palette.iter().collect();
        assert_eq!(unique.len(), MAX_COLORS);
    }

    #[test]
    fn palette_prefix_is_stable() {
        assert_eq!(colors(4), colors(4));
        assert_eq!(colors(4)[0], Rgb::from_hsl(0.0, 0.72, 0.48));
    }

    #[test]
    fn patterns_follow_board_edge() {
        let names: Vec<_> = patterns(BoardSize::FOUR).iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["dots", "stripes", "waves", "grid"]);
        assert_eq!(patterns(BoardSize::SIX).len(), 6);
    }

    #[test]
    fn rgb_displays_as_hex() {
        assert_eq!(Rgb::new(255, 8, 0).to_string(), "#ff0800");
    }
}
