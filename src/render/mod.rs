//! Cell → pixel rasterisation.
//!
//! Translates dirty grid lines into pixels in a [`PixelSink`]'s linear
//! buffer. The sink is the seam to the display back end (a KMS dumb
//! buffer in production, [`MemorySink`] in tests); the rasteriser writes
//! the buffer and commits one scanline strip per drawn line.

use crate::cell::{CellAttr, WidthClass};
use crate::color::{
    ACTIVE_CURSOR_COLOR, BRIGHT_OFFSET, DEFAULT_BG, PASSIVE_CURSOR_COLOR,
};
use crate::term::{Term, TermMode};

/// A linear pixel buffer the rasteriser draws into.
///
/// Pixel format is little-endian 0x00RRGGBB packed into `bytes_per_pixel`
/// bytes (4 supported). `commit` publishes a drawn rectangle; the core
/// never reads the buffer back.
pub trait PixelSink {
    /// Display width in pixels.
    fn width(&self) -> usize;
    /// Display height in pixels.
    fn height(&self) -> usize;
    /// Bytes per buffer row.
    fn stride(&self) -> usize;
    /// Bytes per pixel.
    fn bytes_per_pixel(&self) -> usize;
    /// The writable linear buffer, `stride * height` bytes.
    fn buffer_mut(&mut self) -> &mut [u8];
    /// Publish the rectangle `[x1, x2) × [y1, y2)` to the display.
    fn commit(&mut self, x1: usize, y1: usize, x2: usize, y2: usize);
}

/// Draw every dirty line, plus the cursor's line, into the sink.
///
/// The cursor's line stays dirty after drawing so the cursor cell is
/// repainted on the next refresh too — that is what erases a stale
/// cursor image after the cursor moves away.
pub fn refresh<S: PixelSink>(term: &mut Term, sink: &mut S, focused: bool) {
    let cursor_line = term.grid().cursor().line();
    term.grid_mut().dirty_mut().mark(cursor_line);

    for line in 0..term.grid().lines() {
        if term.grid().dirty().is_dirty(line) {
            draw_line(term, sink, line, focused);
            if line != cursor_line {
                term.grid_mut().dirty_mut().clear(line);
            }
        }
    }
}

/// Rasterise one grid line into the sink and commit its scanline strip.
pub fn draw_line<S: PixelSink>(term: &Term, sink: &mut S, line: usize, focused: bool) {
    let glyphs = term.glyphs();
    let cell_width = glyphs.cell_width();
    let cell_height = glyphs.cell_height();
    let cols = term.grid().cols();
    let stride = sink.stride();
    let bpp = sink.bytes_per_pixel();
    let width = sink.width();
    let height = sink.height();

    let cursor = cursor_span(term, line);

    for col in 0..cols {
        let cell = term.grid()[line][col];

        let (mut fg, mut bg) = (cell.fg, cell.bg);
        if cell.attr.contains(CellAttr::REVERSE) {
            std::mem::swap(&mut fg, &mut bg);
        }
        if cell.attr.contains(CellAttr::BOLD) && fg < 8 {
            fg += BRIGHT_OFFSET;
        }
        if cell.attr.contains(CellAttr::BLINK) && bg < 8 {
            bg += BRIGHT_OFFSET;
        }
        if cursor.is_some_and(|(start, end)| col >= start && col <= end) {
            fg = DEFAULT_BG;
            bg = if focused { ACTIVE_CURSOR_COLOR } else { PASSIVE_CURSOR_COLOR };
        }
        let fg_pixel = term.palette().color(fg).pack().to_le_bytes();
        let bg_pixel = term.palette().color(bg).pack().to_le_bytes();

        let glyph = glyphs.glyph(cell.glyph);
        // The right half of a wide pair reads the right half of the bitmap.
        let x_offset = if cell.width == WidthClass::NextToWide { cell_width } else { 0 };
        let underline = cell.attr.contains(CellAttr::UNDERLINE);

        let buffer = sink.buffer_mut();
        for glyph_y in 0..cell_height {
            let pixel_y = line * cell_height + glyph_y;
            if pixel_y >= height {
                break;
            }
            let force_fg = underline && glyph_y == cell_height - 1;
            for glyph_x in 0..cell_width {
                let pixel_x = col * cell_width + glyph_x;
                if pixel_x >= width {
                    break;
                }
                let lit = force_fg || glyph.pixel(glyph_y, glyph_x + x_offset);
                let pixel = if lit { &fg_pixel } else { &bg_pixel };
                let offset = pixel_y * stride + pixel_x * bpp;
                let count = bpp.min(pixel.len());
                buffer[offset..offset + count].copy_from_slice(&pixel[..count]);
            }
        }
    }

    sink.commit(
        0,
        (line * cell_height).min(height),
        (cols * cell_width).min(width),
        ((line + 1) * cell_height).min(height),
    );
}

/// The inclusive column span the cursor covers on `line`, if visible.
///
/// A cursor on either half of a wide pair covers both cells.
fn cursor_span(term: &Term, line: usize) -> Option<(usize, usize)> {
    if !term.mode().contains(TermMode::SHOW_CURSOR) {
        return None;
    }
    let grid = term.grid();
    if grid.cursor().line() != line {
        return None;
    }

    let col = grid.cursor().col().min(grid.cols() - 1);
    match grid[line][col].width {
        WidthClass::Wide => Some((col, col + 1)),
        WidthClass::NextToWide => Some((col.saturating_sub(1), col)),
        WidthClass::Half => Some((col, col)),
    }
}

/// In-memory [`PixelSink`] for tests and headless use.
///
/// Records every committed rectangle and exposes pixel readback.
#[derive(Debug)]
pub struct MemorySink {
    width: usize,
    height: usize,
    buffer: Vec<u8>,
    commits: Vec<(usize, usize, usize, usize)>,
}

impl MemorySink {
    const BPP: usize = 4;

    /// Create a zeroed sink of the given pixel size.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            buffer: vec![0; width * height * Self::BPP],
            commits: Vec::new(),
        }
    }

    /// Read back the packed 0x00RRGGBB pixel at `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        let offset = y * self.width * Self::BPP + x * Self::BPP;
        u32::from_le_bytes([
            self.buffer[offset],
            self.buffer[offset + 1],
            self.buffer[offset + 2],
            self.buffer[offset + 3],
        ])
    }

    /// The rectangles committed so far, in order.
    pub fn commits(&self) -> &[(usize, usize, usize, usize)] {
        &self.commits
    }

    /// Forget recorded commits.
    pub fn clear_commits(&mut self) {
        self.commits.clear();
    }
}

impl PixelSink for MemorySink {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn stride(&self) -> usize {
        self.width * Self::BPP
    }

    fn bytes_per_pixel(&self) -> usize {
        Self::BPP
    }

    fn buffer_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    fn commit(&mut self, x1: usize, y1: usize, x2: usize, y2: usize) {
        self.commits.push((x1, y1, x2, y2));
    }
}
