//! Grid editing operations.
//!
//! Character writes, erase operations, and the insert/delete shifts the
//! escape dispatch calls. Every mutation marks the affected lines dirty.

use crate::cell::{Cell, WidthClass};
use crate::glyph::GlyphId;

use super::Grid;

/// Erase extent for display and line erase operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraseMode {
    /// From the cursor to the end (of display or line).
    Below,
    /// From the start (of display or line) through the cursor.
    Above,
    /// The entire display or line.
    All,
}

impl Grid {
    /// Write a glyph at the cursor position and advance.
    ///
    /// `class` must be `Half` or `Wide`; wide glyphs write a cell pair
    /// (the right cell is `NextToWide` and shares the glyph id). With
    /// `wrap` set, writes that do not fit move to column 0 of the next
    /// line first, scrolling if the cursor sits on the region's bottom;
    /// advancing past the last column leaves the cursor in the pending
    /// wrap state (`col == cols`). With `wrap` clear, the write lands on
    /// the last column(s) and the cursor stays there.
    pub fn put(&mut self, glyph: GlyphId, class: WidthClass, wrap: bool) {
        debug_assert!(class != WidthClass::NextToWide, "put() takes Half or Wide");
        let width = if class == WidthClass::Wide { 2 } else { 1 };
        let cols = self.cols;
        if width > cols {
            return;
        }

        let mut col = self.cursor.col();
        if col + width > cols {
            if wrap {
                self.linefeed();
                col = 0;
            } else {
                col = cols - width;
            }
            self.cursor.set_col(col);
        }
        let line = self.cursor.line();

        // Keep wide pairs atomic: writing over either half dissolves the pair.
        self.dissolve_pair_straddling(line, col);
        self.dissolve_pair_straddling(line, col + width);

        let template = self.cursor.template;
        let cell = Cell {
            glyph,
            fg: template.fg,
            bg: template.bg,
            attr: template.attr,
            width: class,
        };
        self.rows[line][col] = cell;
        if width == 2 {
            self.rows[line][col + 1] = Cell { width: WidthClass::NextToWide, ..cell };
        }
        self.dirty.mark(line);

        let next = col + width;
        // next == cols is the pending wrap state; without auto-wrap the
        // cursor parks on the last column and overwrites it.
        self.cursor.set_col(if wrap { next } else { next.min(cols - 1) });
    }

    /// ICH: insert `count` blank cells at the cursor, shifting the rest of
    /// the line right. Cells shifted past the right edge are lost.
    pub fn insert_blank(&mut self, count: usize) {
        let line = self.cursor.line();
        let col = self.cursor.col();
        let cols = self.cols;
        if col >= cols {
            return;
        }

        // A pair straddling the insertion point would be torn apart.
        self.dissolve_pair_straddling(line, col);
        let count = count.max(1).min(cols - col);
        let template = self.erase_template();
        let cells = self.rows[line].as_mut_slice();
        for i in (col + count..cols).rev() {
            cells.swap(i, i - count);
        }
        cells[col..col + count].fill(template);

        self.trim_split_pair_at_edge(line);
        self.dirty.mark(line);
    }

    /// DCH: delete `count` cells at the cursor, shifting the rest of the
    /// line left. Vacated cells at the right edge become blank.
    pub fn delete_chars(&mut self, count: usize) {
        let line = self.cursor.line();
        let col = self.cursor.col();
        let cols = self.cols;
        if col >= cols {
            return;
        }

        let count = count.max(1).min(cols - col);
        // Pairs straddling either edge of the deleted span lose one half.
        self.dissolve_pair_straddling(line, col);
        self.dissolve_pair_straddling(line, col + count);
        let template = self.erase_template();
        let cells = self.rows[line].as_mut_slice();
        for i in col..cols - count {
            cells.swap(i, i + count);
        }
        cells[cols - count..cols].fill(template);
        self.dirty.mark(line);
    }

    /// ECH: erase `count` cells starting at the cursor without shifting.
    pub fn erase_chars(&mut self, count: usize) {
        let line = self.cursor.line();
        let col = self.cursor.col();
        let cols = self.cols;
        if col >= cols {
            return;
        }

        let end = (col + count.max(1)).min(cols);
        self.dissolve_pair_straddling(line, col);
        self.dissolve_pair_straddling(line, end);
        let template = self.erase_template();
        self.rows[line].reset_range(col, end, template);
        self.dirty.mark(line);
    }

    /// EL: erase part or all of the cursor's line.
    pub fn erase_line(&mut self, mode: EraseMode) {
        let line = self.cursor.line();
        let col = self.cursor.col().min(self.cols - 1);
        let template = self.erase_template();

        match mode {
            EraseMode::Below => {
                self.dissolve_pair_straddling(line, col);
                self.rows[line].reset_range(col, self.cols, template);
            }
            EraseMode::Above => {
                self.dissolve_pair_straddling(line, col + 1);
                self.rows[line].reset_range(0, col + 1, template);
            }
            EraseMode::All => self.rows[line].reset(template),
        }
        self.dirty.mark(line);
    }

    /// ED: erase part or all of the display.
    pub fn erase_display(&mut self, mode: EraseMode) {
        let template = self.erase_template();
        match mode {
            EraseMode::Below => {
                self.erase_line(EraseMode::Below);
                let below = self.cursor.line() + 1;
                for line in below..self.lines {
                    self.rows[line].reset(template);
                }
                self.dirty.mark_range(below, self.lines);
            }
            EraseMode::Above => {
                self.erase_line(EraseMode::Above);
                let above = self.cursor.line();
                for line in 0..above {
                    self.rows[line].reset(template);
                }
                self.dirty.mark_range(0, above);
            }
            EraseMode::All => {
                for row in &mut self.rows {
                    row.reset(template);
                }
                self.dirty.mark_all();
            }
        }
    }

    /// Dissolve a wide pair split by the boundary between `boundary - 1`
    /// and `boundary`, blanking both halves.
    ///
    /// Writes, shifts, and erases that separate a pair's cells call this
    /// for each affected boundary; pairs falling entirely on one side are
    /// untouched, so no operation ever leaves half a pair behind.
    pub(super) fn dissolve_pair_straddling(&mut self, line: usize, boundary: usize) {
        if boundary == 0 || boundary >= self.cols {
            return;
        }
        if self.rows[line][boundary].width == WidthClass::NextToWide
            && self.rows[line][boundary - 1].width == WidthClass::Wide
        {
            blank_half(&mut self.rows[line][boundary - 1]);
            blank_half(&mut self.rows[line][boundary]);
        }
    }

    /// After a rightward shift, a wide cell may end up on the last column
    /// with its partner pushed off the edge; blank it.
    fn trim_split_pair_at_edge(&mut self, line: usize) {
        let last = self.cols - 1;
        if self.rows[line][last].width == WidthClass::Wide {
            blank_half(&mut self.rows[line][last]);
        }
    }
}

/// Turn one half of a dissolved wide pair into a blank half cell.
fn blank_half(cell: &mut Cell) {
    cell.glyph = GlyphId::SPACE;
    cell.width = WidthClass::Half;
}
