//! Glyph table: code point → monochrome bitmap lookup.
//!
//! The table owns every glyph bitmap for one fixed cell size. Cells store
//! a `GlyphId` (a slot index) rather than a code point, so the rasteriser
//! resolves bitmaps with a plain array index and cells never dangle into
//! font storage. Slot 0 is always the blank space glyph, which keeps
//! `Cell::default()` independent of any particular font.
//!
//! Font parsing/storage is the embedder's problem; the table is filled
//! once at startup via [`GlyphTable::insert`] and read-only afterwards.

use unicode_width::UnicodeWidthChar;

use crate::cell::WidthClass;

/// Substitute for missing single-width glyphs: REPLACEMENT CHARACTER.
pub const SUBSTITUTE_HALF: char = '\u{fffd}';
/// Substitute for missing double-width glyphs: GETA MARK.
pub const SUBSTITUTE_WIDE: char = '\u{3013}';

/// Glyphs exist for the UCS2 plane only; code points past it substitute.
const UCS2_CHARS: usize = 0x10000;

/// Sentinel in the code point index for "no glyph stored".
const NO_GLYPH: u16 = u16::MAX;

/// Index of a glyph slot in a [`GlyphTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphId(pub u16);

impl GlyphId {
    /// The blank space glyph, present in every table at slot 0.
    pub const SPACE: Self = Self(0);
}

/// A monochrome glyph bitmap.
///
/// One `u32` mask per pixel row, most significant used bit = leftmost
/// pixel. Half glyphs span `cell_width` bits, wide glyphs
/// `2 * cell_width`.
#[derive(Debug, Clone)]
pub struct Glyph {
    /// Row masks, `cell_height` entries.
    rows: Box<[u32]>,
    /// Pixel width of the bitmap (`cell_width` or twice that).
    width_px: u16,
    /// Whether this glyph occupies two cells.
    wide: bool,
}

impl Glyph {
    /// Whether this glyph occupies two cells.
    pub fn is_wide(&self) -> bool {
        self.wide
    }

    /// Test the pixel at `(row, x)` where `x` counts from the glyph's
    /// left edge across its full width (wide glyphs: both halves).
    pub fn pixel(&self, row: usize, x: usize) -> bool {
        let width = usize::from(self.width_px);
        if row >= self.rows.len() || x >= width {
            return false;
        }
        (self.rows[row] >> (width - 1 - x)) & 1 != 0
    }
}

/// Immutable code point → glyph lookup for one fixed cell size.
#[derive(Debug, Clone)]
pub struct GlyphTable {
    /// Cell width in pixels (half glyph width).
    cell_width: usize,
    /// Cell height in pixels.
    cell_height: usize,
    /// Glyph bitmap storage; `GlyphId` indexes this.
    glyphs: Vec<Glyph>,
    /// Code point → slot, `NO_GLYPH` where the font has none.
    index: Vec<u16>,
    /// Slot substituted for missing half-width glyphs.
    half_fallback: GlyphId,
    /// Slot substituted for missing double-width glyphs.
    wide_fallback: GlyphId,
}

impl GlyphTable {
    /// Create an empty table for the given cell size.
    ///
    /// Seeds slot 0 with the blank space glyph and slots 1–2 with
    /// built-in outline-box substitution bitmaps; a font that carries
    /// U+FFFD / U+3013 replaces those via [`insert`](Self::insert).
    pub fn new(cell_width: usize, cell_height: usize) -> Self {
        debug_assert!(
            cell_width >= 1 && cell_width <= 16 && cell_height >= 1,
            "unsupported cell size {cell_width}x{cell_height}"
        );

        let space = Glyph {
            rows: vec![0; cell_height].into_boxed_slice(),
            width_px: cell_width as u16,
            wide: false,
        };
        let half_box = outline_box(cell_width, cell_height, false);
        let wide_box = outline_box(cell_width * 2, cell_height, true);

        let mut table = Self {
            cell_width,
            cell_height,
            glyphs: vec![space, half_box, wide_box],
            index: vec![NO_GLYPH; UCS2_CHARS],
            half_fallback: GlyphId(1),
            wide_fallback: GlyphId(2),
        };
        table.index[usize::from(b' ')] = GlyphId::SPACE.0;
        table
    }

    /// Cell width in pixels.
    pub fn cell_width(&self) -> usize {
        self.cell_width
    }

    /// Cell height in pixels.
    pub fn cell_height(&self) -> usize {
        self.cell_height
    }

    /// Store a glyph bitmap for `cp`.
    ///
    /// `rows` must hold `cell_height` masks. The glyph's width class is
    /// derived from the code point's East Asian Width. Inserting U+0020,
    /// U+FFFD, or U+3013 replaces the built-in blank/substitute bitmaps.
    pub fn insert(&mut self, cp: char, rows: &[u32]) {
        debug_assert_eq!(rows.len(), self.cell_height, "glyph height mismatch for {cp:?}");
        let code = cp as usize;
        if code >= UCS2_CHARS {
            return;
        }

        let wide = UnicodeWidthChar::width(cp) == Some(2);
        let width_px = (if wide { self.cell_width * 2 } else { self.cell_width }) as u16;
        let glyph = Glyph {
            rows: rows.to_vec().into_boxed_slice(),
            width_px,
            wide,
        };

        let slot = if cp == ' ' {
            // Keep the slot 0 == space invariant.
            self.glyphs[0] = glyph;
            GlyphId::SPACE
        } else {
            let slot = match self.index[code] {
                NO_GLYPH => {
                    if self.glyphs.len() >= usize::from(NO_GLYPH) {
                        log::warn!("glyph table full, dropping glyph for {cp:?}");
                        return;
                    }
                    self.glyphs.push(glyph);
                    GlyphId((self.glyphs.len() - 1) as u16)
                }
                existing => {
                    self.glyphs[usize::from(existing)] = glyph;
                    GlyphId(existing)
                }
            };
            self.index[code] = slot.0;
            slot
        };

        if cp == SUBSTITUTE_HALF {
            self.half_fallback = slot;
        } else if cp == SUBSTITUTE_WIDE {
            self.wide_fallback = slot;
        }
    }

    /// Look up the glyph for a code point.
    ///
    /// Missing glyphs and code points past U+FFFF substitute: GETA MARK
    /// for double-width code points, REPLACEMENT CHARACTER otherwise.
    pub fn lookup(&self, cp: char) -> (GlyphId, WidthClass) {
        let wide = UnicodeWidthChar::width(cp) == Some(2);
        let slot = self
            .index
            .get(cp as usize)
            .copied()
            .filter(|&slot| slot != NO_GLYPH)
            .map_or_else(
                || if wide { self.wide_fallback } else { self.half_fallback },
                GlyphId,
            );

        // Trust the stored glyph's own width over the code point's EAW
        // so cell occupancy always matches what gets drawn.
        let class = if self.glyphs[usize::from(slot.0)].wide {
            WidthClass::Wide
        } else {
            WidthClass::Half
        };
        (slot, class)
    }

    /// Resolve a glyph id to its bitmap.
    pub fn glyph(&self, id: GlyphId) -> &Glyph {
        self.glyphs
            .get(usize::from(id.0))
            .unwrap_or(&self.glyphs[usize::from(GlyphId::SPACE.0)])
    }
}

/// A hollow rectangle bitmap used as the built-in substitution glyph.
fn outline_box(width: usize, height: usize, wide: bool) -> Glyph {
    let full = if width >= 32 { u32::MAX } else { (1u32 << width) - 1 };
    let sides = (1u32 << (width - 1)) | 1;
    let rows: Vec<u32> = (0..height)
        .map(|row| if row == 0 || row == height - 1 { full } else { sides })
        .collect();
    Glyph {
        rows: rows.into_boxed_slice(),
        width_px: width as u16,
        wide,
    }
}
