//! Terminal cell types.
//!
//! A `Cell` is one character position in the grid: a glyph table index, a
//! foreground/background palette index pair, SGR attribute flags, and a
//! width class. Cells are 8 bytes and `Copy` — the grid is a flat array
//! of them with no heap data per cell.

use bitflags::bitflags;

use crate::glyph::GlyphId;

bitflags! {
    /// Per-cell SGR attribute flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CellAttr: u8 {
        /// SGR 1 — rendered by brightening the foreground.
        const BOLD      = 1 << 0;
        /// SGR 4 — rendered by forcing the glyph's bottom row to fg.
        const UNDERLINE = 1 << 1;
        /// SGR 5 — rendered by brightening the background.
        const BLINK     = 1 << 2;
        /// SGR 7 — fg/bg swapped at draw time.
        const REVERSE   = 1 << 3;
    }
}

impl Default for CellAttr {
    fn default() -> Self {
        Self::empty()
    }
}

/// How many columns a cell occupies, and which half of a wide pair it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidthClass {
    /// Single-column cell.
    #[default]
    Half,
    /// Left cell of a two-column pair; owns the glyph.
    Wide,
    /// Right cell of a two-column pair; shares the left cell's glyph.
    NextToWide,
}

/// One character position in the terminal grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Index into the glyph table.
    pub glyph: GlyphId,
    /// Foreground palette index.
    pub fg: u8,
    /// Background palette index.
    pub bg: u8,
    /// SGR attribute flags.
    pub attr: CellAttr,
    /// Half, wide, or the spacer half of a wide pair.
    pub width: WidthClass,
}

const _: () = assert!(size_of::<Cell>() <= 8);

impl Default for Cell {
    fn default() -> Self {
        Self {
            glyph: GlyphId::SPACE,
            fg: crate::color::DEFAULT_FG,
            bg: crate::color::DEFAULT_BG,
            attr: CellAttr::empty(),
            width: WidthClass::Half,
        }
    }
}

impl Cell {
    /// An erased cell: space with the given background, default foreground,
    /// no attributes (xterm-style BCE).
    pub fn erased(bg: u8) -> Self {
        Self { bg, ..Self::default() }
    }

    /// Returns `true` if this cell renders as a blank default cell.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
