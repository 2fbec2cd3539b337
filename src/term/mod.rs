//! Terminal state machine.
//!
//! `Term` owns the grid, mode flags, palette, charset state, glyph table,
//! and the reply queue. The escape dispatch (`vte::Perform`) lives in the
//! `performer` submodule; the methods here are the operations it calls.

pub mod charset;
pub mod mode;
mod performer;

pub use charset::{CharsetIndex, CharsetState, StandardCharset};
pub use mode::TermMode;

use unicode_width::UnicodeWidthChar;

use crate::color::Palette;
use crate::glyph::GlyphTable;
use crate::grid::{Cursor, Grid, TabClearMode};

/// DECSC/DECRC snapshot.
#[derive(Debug, Clone, Copy)]
struct SavedState {
    /// Cursor position and attribute template.
    cursor: Cursor,
    /// Mode flags at save time.
    mode: TermMode,
}

/// The terminal state machine.
///
/// All mutation flows through `vte::Perform` dispatch (driven by the
/// emulator's `parse`) or through the small driver surface (`resize`,
/// reply draining). Replies the terminal wants to send to the child are
/// queued rather than written, keeping the core free of I/O.
#[derive(Debug)]
pub struct Term {
    /// The cell grid.
    grid: Grid,
    /// Terminal mode flags.
    mode: TermMode,
    /// 256-entry color palette.
    palette: Palette,
    /// Character set translation state.
    charset: CharsetState,
    /// Code point → bitmap lookup.
    glyphs: GlyphTable,
    /// DECSC snapshot, if any.
    saved: Option<SavedState>,
    /// Bytes queued for the child pty (DSR, DA, GWREPT replies).
    reply: Vec<u8>,
    /// Window title (OSC 0/2); exposed to the driver, unused by the core.
    title: String,
    /// Display width in pixels (for GWREPT).
    px_width: usize,
    /// Display height in pixels (for GWREPT).
    px_height: usize,
}

impl Term {
    /// Create a terminal sized to a display of `px_width` × `px_height`
    /// pixels, with one cell per glyph-table cell size.
    pub fn new(glyphs: GlyphTable, px_width: usize, px_height: usize) -> Self {
        let cols = (px_width / glyphs.cell_width()).max(1);
        let lines = (px_height / glyphs.cell_height()).max(1);
        Self {
            grid: Grid::new(lines, cols),
            mode: TermMode::default(),
            palette: Palette::default(),
            charset: CharsetState::default(),
            glyphs,
            saved: None,
            reply: Vec::new(),
            title: String::new(),
            px_width,
            px_height,
        }
    }

    /// Reference to the grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable reference to the grid.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Current mode flags.
    pub fn mode(&self) -> TermMode {
        self.mode
    }

    /// Reference to the palette.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Reference to the glyph table.
    pub fn glyphs(&self) -> &GlyphTable {
        &self.glyphs
    }

    /// Window title (last OSC 0/2).
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Take the bytes queued for the child pty.
    pub fn take_reply(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.reply)
    }

    /// Whether reply bytes are waiting.
    pub fn has_reply(&self) -> bool {
        !self.reply.is_empty()
    }

    /// Resize to a new display pixel size; the grid geometry follows.
    pub fn resize(&mut self, px_width: usize, px_height: usize) {
        self.px_width = px_width;
        self.px_height = px_height;
        let cols = (px_width / self.glyphs.cell_width()).max(1);
        let lines = (px_height / self.glyphs.cell_height()).max(1);
        self.grid.resize(lines, cols);
    }

    /// Write a printable character at the cursor.
    ///
    /// Translates through the active charset, resolves the glyph and its
    /// width class, and writes via the grid (which handles wrapping and
    /// wide pairs). Zero-width characters are dropped — combining mark
    /// composition is out of scope.
    pub(crate) fn put_char(&mut self, ch: char) {
        let ch = self.charset.translate(ch);
        if UnicodeWidthChar::width(ch).unwrap_or(0) == 0 {
            return;
        }
        let (glyph, class) = self.glyphs.lookup(ch);
        let wrap = self.mode.contains(TermMode::LINE_WRAP);
        self.grid.put(glyph, class, wrap);
    }

    /// CUP/HVP: absolute cursor addressing, remapped and clamped to the
    /// scroll region under origin mode.
    pub(crate) fn goto(&mut self, line: usize, col: usize) {
        if self.mode.contains(TermMode::ORIGIN) {
            let region = self.grid.scroll_region();
            let line = (region.start + line).min(region.end - 1);
            self.grid.move_to(line, col);
        } else {
            self.grid.move_to(line, col);
        }
    }

    /// VPA: absolute line addressing with origin remapping.
    pub(crate) fn goto_line(&mut self, line: usize) {
        if self.mode.contains(TermMode::ORIGIN) {
            let region = self.grid.scroll_region();
            self.grid.move_to_line((region.start + line).min(region.end - 1));
        } else {
            self.grid.move_to_line(line);
        }
    }

    /// BS: one column left; from pending wrap, snap onto the last column.
    pub(crate) fn backspace(&mut self) {
        let col = self.grid.cursor().col();
        let cols = self.grid.cols();
        if col >= cols {
            self.grid.cursor_mut().set_col(cols - 1);
        } else if col > 0 {
            self.grid.cursor_mut().set_col(col - 1);
        } else {
            // Already at column 0.
        }
    }

    /// DECSC: snapshot cursor, attributes, and mode.
    pub(crate) fn save_state(&mut self) {
        self.saved = Some(SavedState { cursor: *self.grid.cursor(), mode: self.mode });
    }

    /// DECRC: restore the snapshot, clamped to the current grid. With no
    /// prior DECSC the cursor homes with default attributes.
    pub(crate) fn restore_state(&mut self) {
        match self.saved {
            Some(saved) => {
                let line = saved.cursor.line().min(self.grid.lines() - 1);
                let col = saved.cursor.col().min(self.grid.cols() - 1);
                *self.grid.cursor_mut() = saved.cursor;
                self.grid.cursor_mut().set_line(line);
                self.grid.cursor_mut().set_col(col);
                self.mode = saved.mode;
            }
            None => *self.grid.cursor_mut() = Cursor::new(),
        }
        let line = self.grid.cursor().line();
        self.grid.dirty_mut().mark(line);
    }

    /// DECSET/DECRST dispatch by private parameter number.
    pub(crate) fn set_private_mode(&mut self, param: u16, enable: bool) {
        let flag = match param {
            6 => TermMode::ORIGIN,
            7 => TermMode::LINE_WRAP,
            25 => TermMode::SHOW_CURSOR,
            _ => {
                log::debug!("unhandled private mode ?{param} {}", if enable { "h" } else { "l" });
                return;
            }
        };
        self.mode.set(flag, enable);

        if flag == TermMode::ORIGIN {
            // Origin mode changes re-home the cursor.
            self.goto(0, 0);
        } else if flag == TermMode::SHOW_CURSOR {
            // Visibility changes must repaint the cursor cell.
            let line = self.grid.cursor().line();
            self.grid.dirty_mut().mark(line);
        } else {
            // LINE_WRAP needs no side effect.
        }
    }

    /// TBC dispatch by parameter.
    pub(crate) fn clear_tabs(&mut self, param: u16) {
        match param {
            0 => self.grid.clear_tab_stop(TabClearMode::Current),
            3 => self.grid.clear_tab_stop(TabClearMode::All),
            _ => log::debug!("unhandled TBC parameter {param}"),
        }
    }

    /// DSR: device status reports.
    pub(crate) fn device_status(&mut self, arg: u16) {
        match arg {
            // Operating status: OK.
            5 => self.reply.extend_from_slice(b"\x1b[0n"),
            // Cursor position report, 1-based.
            6 => {
                let line = self.grid.cursor().line() + 1;
                let col = self.grid.cursor().col().min(self.grid.cols() - 1) + 1;
                self.reply.extend_from_slice(format!("\x1b[{line};{col}R").as_bytes());
            }
            _ => log::debug!("unhandled DSR {arg}"),
        }
    }

    /// DA1/DECID: identify as a VT102-class terminal.
    pub(crate) fn identify_terminal(&mut self) {
        self.reply.extend_from_slice(b"\x1b[?6c");
    }

    /// OSC 0/2: store the window title.
    pub(crate) fn set_title(&mut self, title: &str) {
        self.title.clear();
        self.title.push_str(title);
    }

    /// GWREPT (OSC 8900): report cell and pixel geometry to the child.
    pub(crate) fn report_geometry(&mut self) {
        let reply = format!(
            "\x1b]8900;{};{};{};{}\x1b\\",
            self.grid.cols(),
            self.grid.lines(),
            self.px_width,
            self.px_height,
        );
        self.reply.extend_from_slice(reply.as_bytes());
    }

    /// Mutable palette access for OSC 4/104 dispatch.
    pub(crate) fn palette_mut(&mut self) -> &mut Palette {
        &mut self.palette
    }

    /// Charset state access for dispatch.
    pub(crate) fn charset_mut(&mut self) -> &mut CharsetState {
        &mut self.charset
    }

    /// RIS: reset to initial state.
    ///
    /// Clears the screen, homes the cursor, restores default modes,
    /// charsets, tab stops, scroll region, and palette. The grid
    /// allocation is reused.
    pub(crate) fn reset(&mut self) {
        self.mode = TermMode::default();
        self.charset = CharsetState::default();
        self.palette.reset_all();
        self.saved = None;
        self.title.clear();
        *self.grid.cursor_mut() = Cursor::new();
        self.grid.set_scroll_region(1, None);
        self.grid.reset_tab_stops();
        self.grid.erase_display(crate::grid::EraseMode::All);
    }
}
