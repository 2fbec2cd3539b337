//! Driver glue: the byte-stream surface the tty front end talks to.
//!
//! `Emulator` couples a [`Term`] with a `vte::Parser`. The driver feeds
//! child-pty output to [`parse`](Emulator::parse) in arrival order,
//! forwards [`drain_reply`](Emulator::drain_reply) bytes back to the pty,
//! and calls [`refresh`](Emulator::refresh) to flush dirty lines into the
//! display. Both the UTF-8 decoder and the escape parser keep their state
//! inside `vte::Parser` between calls, so byte streams may be split at
//! any boundary.

use crate::glyph::GlyphTable;
use crate::render::{self, PixelSink};
use crate::term::Term;

/// A terminal emulator bound to a fixed-size pixel display.
pub struct Emulator {
    /// Terminal state: grid, modes, palette, charsets, reply queue.
    term: Term,
    /// Escape/UTF-8 state machine; carries partial sequences across feeds.
    parser: vte::Parser,
    /// Whether this console owns the display (cursor color selection).
    focused: bool,
}

impl Emulator {
    /// Create an emulator for a `px_width` × `px_height` display.
    ///
    /// The grid geometry is `px_width / cell_width` columns by
    /// `px_height / cell_height` lines, at least 1×1.
    pub fn new(glyphs: GlyphTable, px_width: usize, px_height: usize) -> Self {
        Self {
            term: Term::new(glyphs, px_width, px_height),
            parser: vte::Parser::new(),
            focused: true,
        }
    }

    /// Feed bytes read from the child pty, in arrival order.
    pub fn parse(&mut self, bytes: &[u8]) {
        self.parser.advance(&mut self.term, bytes);
    }

    /// Take the bytes queued for the child (DSR/DA/GWREPT replies).
    pub fn drain_reply(&mut self) -> Vec<u8> {
        self.term.take_reply()
    }

    /// Whether reply bytes are waiting for the child.
    pub fn has_reply(&self) -> bool {
        self.term.has_reply()
    }

    /// Flush dirty lines (and the cursor's line) to the sink.
    pub fn refresh<S: PixelSink>(&mut self, sink: &mut S) {
        render::refresh(&mut self.term, sink, self.focused);
    }

    /// Mark the whole screen dirty — the next refresh repaints everything.
    ///
    /// The driver calls this when it reacquires the virtual console.
    pub fn redraw(&mut self) {
        self.term.grid_mut().dirty_mut().mark_all();
    }

    /// Set whether this console owns the display; the cursor repaints in
    /// its active or passive color on the next refresh.
    pub fn set_focused(&mut self, focused: bool) {
        if self.focused != focused {
            self.focused = focused;
            let line = self.term.grid().cursor().line();
            self.term.grid_mut().dirty_mut().mark(line);
        }
    }

    /// Resize to a new display pixel size (no reflow).
    pub fn resize(&mut self, px_width: usize, px_height: usize) {
        self.term.resize(px_width, px_height);
    }

    /// The terminal state, for inspection by the driver.
    pub fn term(&self) -> &Term {
        &self.term
    }
}

#[cfg(test)]
mod tests {
    use crate::cell::{CellAttr, WidthClass};
    use crate::color::{ACTIVE_CURSOR_COLOR, DEFAULT_BG, PASSIVE_CURSOR_COLOR};
    use crate::glyph::{GlyphId, GlyphTable};
    use crate::render::MemorySink;
    use crate::term::TermMode;

    use super::Emulator;

    /// An 8x16 test font with printable ASCII and a few wide glyphs.
    ///
    /// Every half glyph gets a distinctive solid top row; 'A' and 'X'
    /// additionally light their second row for pixel-level checks.
    fn test_font() -> GlyphTable {
        let mut font = GlyphTable::new(8, 16);
        for code in 0x21..=0x7e_u8 {
            let mut rows = [0u32; 16];
            rows[0] = 0xff;
            font.insert(code as char, &rows);
        }
        let mut wide_rows = [0u32; 16];
        wide_rows[0] = 0xffff;
        font.insert('あ', &wide_rows);
        font.insert('漢', &wide_rows);
        font
    }

    /// 80x24 cells on a 640x384 display.
    fn emulator() -> Emulator {
        Emulator::new(test_font(), 640, 384)
    }

    fn glyph(ch: char) -> GlyphId {
        let (id, _) = test_font().lookup(ch);
        id
    }

    #[test]
    fn plain_text_lands_in_first_cell() {
        let mut emulator = emulator();
        emulator.parse(b"A");
        let term = emulator.term();
        assert_eq!(term.grid()[0][0].glyph, glyph('A'));
        assert_eq!(term.grid().cursor().col(), 1);
        assert_eq!(term.grid().cursor().line(), 0);
        assert!(term.grid().dirty().is_dirty(0));
    }

    #[test]
    fn clear_screen_then_text() {
        let mut emulator = emulator();
        emulator.parse(b"junk junk junk");
        emulator.parse(b"\x1b[H\x1b[2JOK");
        let term = emulator.term();
        assert_eq!(term.grid()[0][0].glyph, glyph('O'));
        assert_eq!(term.grid()[0][1].glyph, glyph('K'));
        assert_eq!(term.grid().cursor().col(), 2);
        for col in 2..80 {
            assert!(term.grid()[0][col].is_empty());
        }
    }

    #[test]
    fn sgr_color_and_bold() {
        let mut emulator = emulator();
        emulator.parse(b"\x1b[31;1mX");
        let cell = emulator.term().grid()[0][0];
        assert_eq!(cell.fg, 1);
        assert!(cell.attr.contains(CellAttr::BOLD));
    }

    #[test]
    fn sgr_bright_and_256_color() {
        let mut emulator = emulator();
        emulator.parse(b"\x1b[91;48;5;123mX");
        let cell = emulator.term().grid()[0][0];
        assert_eq!(cell.fg, 9);
        assert_eq!(cell.bg, 123);
    }

    #[test]
    fn sgr_colon_form_256_color() {
        let mut emulator = emulator();
        emulator.parse(b"\x1b[38:5:42mX");
        assert_eq!(emulator.term().grid()[0][0].fg, 42);
    }

    #[test]
    fn sgr_truecolor_is_consumed_without_effect() {
        let mut emulator = emulator();
        emulator.parse(b"\x1b[38;2;10;20;30;41mX");
        let cell = emulator.term().grid()[0][0];
        // Truecolor dropped; the following 41 still applies.
        assert_eq!(cell.fg, crate::color::DEFAULT_FG);
        assert_eq!(cell.bg, 1);
    }

    #[test]
    fn sgr_zero_restores_defaults() {
        let mut emulator = emulator();
        emulator.parse(b"\x1b[31;44;1;4;5;7m\x1b[0mX");
        let cell = emulator.term().grid()[0][0];
        assert_eq!(cell.fg, crate::color::DEFAULT_FG);
        assert_eq!(cell.bg, crate::color::DEFAULT_BG);
        assert!(cell.attr.is_empty());
    }

    #[test]
    fn cursor_position_is_one_based() {
        let mut emulator = emulator();
        emulator.parse(b"\x1b[5;10H*");
        let term = emulator.term();
        assert_eq!(term.grid()[4][9].glyph, glyph('*'));
        assert_eq!(term.grid().cursor().line(), 4);
        assert_eq!(term.grid().cursor().col(), 10);
    }

    #[test]
    fn cursor_position_respects_origin_mode() {
        let mut emulator = emulator();
        // Region lines 3..=21 (1-based), origin mode on.
        emulator.parse(b"\x1b[3;21r\x1b[?6h\x1b[5;10H*");
        let term = emulator.term();
        assert_eq!(term.grid()[6][9].glyph, glyph('*'));
    }

    #[test]
    fn autowrap_off_overwrites_last_column() {
        let mut emulator = emulator();
        emulator.parse(b"\x1b[?7l");
        emulator.parse(&[b'A'; 85]);
        let term = emulator.term();
        assert!(!term.mode().contains(TermMode::LINE_WRAP));
        for col in 0..80 {
            assert_eq!(term.grid()[0][col].glyph, glyph('A'));
        }
        assert_eq!(term.grid().cursor().col(), 79);
        assert_eq!(term.grid().cursor().line(), 0);
        assert!(term.grid()[1][0].is_empty());
    }

    #[test]
    fn autowrap_pending_then_wrap() {
        let mut emulator = emulator();
        emulator.parse(&[b'A'; 80]);
        assert_eq!(emulator.term().grid().cursor().col(), 80);
        assert_eq!(emulator.term().grid().cursor().line(), 0);

        emulator.parse(b"B");
        let term = emulator.term();
        assert_eq!(term.grid()[1][0].glyph, glyph('B'));
        assert_eq!(term.grid().cursor().line(), 1);
        assert_eq!(term.grid().cursor().col(), 1);
    }

    #[test]
    fn wrap_at_bottom_scrolls() {
        let mut emulator = emulator();
        emulator.parse(b"\x1b[24;1Hbottom");
        emulator.parse(&[b'x'; 80 - 6]);
        // The line is full; one more printable wraps and scrolls.
        emulator.parse(b"y");
        let term = emulator.term();
        assert_eq!(term.grid().cursor().line(), 23);
        assert_eq!(term.grid()[23][0].glyph, glyph('y'));
        assert_eq!(term.grid()[22][0].glyph, glyph('b'));
    }

    #[test]
    fn osc_4_redefines_palette_entry() {
        let mut emulator = emulator();
        emulator.parse(b"\x1b]4;1;rgb:ff/00/00\x1b\\");
        assert_eq!(emulator.term().palette().color(1).pack(), 0x00ff_0000);
    }

    #[test]
    fn osc_4_bel_terminated() {
        let mut emulator = emulator();
        emulator.parse(b"\x1b]4;2;rgb:00/ff/00\x07");
        assert_eq!(emulator.term().palette().color(2).pack(), 0x0000_ff00);
    }

    #[test]
    fn osc_104_restores_palette() {
        let mut emulator = emulator();
        let original = emulator.term().palette().color(1);
        emulator.parse(b"\x1b]4;1;rgb:12/34/56\x1b\\");
        emulator.parse(b"\x1b]104;1\x1b\\");
        assert_eq!(emulator.term().palette().color(1), original);
    }

    #[test]
    fn osc_title_is_stored() {
        let mut emulator = emulator();
        emulator.parse(b"\x1b]2;hello;world\x07");
        assert_eq!(emulator.term().title(), "hello;world");
    }

    #[test]
    fn utf8_wide_char_occupies_pair() {
        let mut emulator = emulator();
        // U+3042 HIRAGANA LETTER A.
        emulator.parse("\u{3042}".as_bytes());
        let term = emulator.term();
        assert_eq!(term.grid()[0][0].width, WidthClass::Wide);
        assert_eq!(term.grid()[0][1].width, WidthClass::NextToWide);
        assert_eq!(term.grid()[0][0].glyph, term.grid()[0][1].glyph);
        assert_eq!(term.grid().cursor().col(), 2);
    }

    #[test]
    fn wide_char_at_last_column_wraps_first() {
        let mut emulator = emulator();
        emulator.parse(&[b'A'; 79]);
        assert_eq!(emulator.term().grid().cursor().col(), 79);
        emulator.parse("\u{3042}".as_bytes());
        let term = emulator.term();
        assert_eq!(term.grid()[1][0].width, WidthClass::Wide);
        assert_eq!(term.grid()[1][1].width, WidthClass::NextToWide);
        assert_eq!(term.grid().cursor().line(), 1);
        assert_eq!(term.grid().cursor().col(), 2);
    }

    #[test]
    fn split_feeds_match_single_feed() {
        let stream: &[u8] =
            b"\x1b[2J\x1b[3;4HAB\xe3\x81\x82\x1b[31;1mC\x1b[5;10H\x1b[K\x1b]4;7;rgb:aa/bb/cc\x1b\\D";

        let mut whole = emulator();
        whole.parse(stream);

        // Split at every byte position, including inside the UTF-8
        // sequence, the CSI sequences, and the OSC string.
        for split in 1..stream.len() {
            let mut halves = emulator();
            halves.parse(&stream[..split]);
            halves.parse(&stream[split..]);

            for line in 0..24 {
                for col in 0..80 {
                    assert_eq!(
                        whole.term().grid()[line][col],
                        halves.term().grid()[line][col],
                        "cell ({line},{col}) differs for split at {split}"
                    );
                }
            }
            assert_eq!(
                whole.term().grid().cursor().col(),
                halves.term().grid().cursor().col(),
                "cursor col differs for split at {split}"
            );
            assert_eq!(
                whole.term().palette().color(7),
                halves.term().palette().color(7),
                "palette differs for split at {split}"
            );
        }
    }

    #[test]
    fn invalid_utf8_yields_replacement() {
        let mut emulator = emulator();
        emulator.parse(b"\xff");
        let term = emulator.term();
        // The replacement glyph is the half substitution bitmap.
        let (expected, _) = test_font().lookup('\u{fffd}');
        assert_eq!(term.grid()[0][0].glyph, expected);
        assert_eq!(term.grid().cursor().col(), 1);
    }

    #[test]
    fn decsc_decrc_round_trip() {
        let mut emulator = emulator();
        emulator.parse(b"\x1b[10;20H\x1b[33;1m\x1b7");
        emulator.parse(b"\x1b[H\x1b[0m");
        emulator.parse(b"\x1b8");
        let term = emulator.term();
        assert_eq!(term.grid().cursor().line(), 9);
        assert_eq!(term.grid().cursor().col(), 19);
        assert_eq!(term.grid().cursor().template.fg, 3);
        assert!(term.grid().cursor().template.attr.contains(CellAttr::BOLD));
    }

    #[test]
    fn dsr_reply_reports_position() {
        let mut emulator = emulator();
        emulator.parse(b"\x1b[5;10H\x1b[6n");
        assert!(emulator.has_reply());
        assert_eq!(emulator.drain_reply(), b"\x1b[5;10R");
        assert!(!emulator.has_reply());
    }

    #[test]
    fn da1_reply() {
        let mut emulator = emulator();
        emulator.parse(b"\x1b[c");
        assert_eq!(emulator.drain_reply(), b"\x1b[?6c");
    }

    #[test]
    fn gwrept_reply_carries_geometry() {
        let mut emulator = emulator();
        emulator.parse(b"\x1b]8900;0\x1b\\");
        assert_eq!(emulator.drain_reply(), b"\x1b]8900;80;24;640;384\x1b\\");
    }

    #[test]
    fn scroll_region_with_linefeeds() {
        let mut emulator = emulator();
        // Region lines 1..=3; fill lines 1-3 with a, b, c.
        emulator.parse(b"\x1b[1;3r\x1b[1;1Ha\r\nb\r\nc");
        // One more linefeed at the region bottom scrolls inside it.
        emulator.parse(b"\r\n");
        let term = emulator.term();
        assert_eq!(term.grid()[0][0].glyph, glyph('b'));
        assert_eq!(term.grid()[1][0].glyph, glyph('c'));
        assert!(term.grid()[2][0].is_empty());
        // Lines outside the region never move.
        assert!(term.grid()[3][0].is_empty());
    }

    #[test]
    fn line_drawing_charset_via_designator() {
        let mut font = test_font();
        font.insert('─', &[0x3c; 16]);
        let mut emulator = Emulator::new(font, 640, 384);

        emulator.parse(b"\x1b(0q\x1b(Bq");
        let term = emulator.term();
        let (box_glyph, _) = term.glyphs().lookup('─');
        let (plain_q, _) = term.glyphs().lookup('q');
        assert_eq!(term.grid()[0][0].glyph, box_glyph);
        assert_eq!(term.grid()[0][1].glyph, plain_q);
    }

    #[test]
    fn shift_out_shift_in_select_g1_g0() {
        let mut emulator = emulator();
        emulator.parse(b"\x1b)0\x0eq\x0fq");
        let term = emulator.term();
        let (plain_q, _) = term.glyphs().lookup('q');
        // G1 is line drawing; 'q' maps to U+2500 which the font lacks,
        // so the half substitution glyph lands in the cell.
        let (substitute, _) = term.glyphs().lookup('\u{2500}');
        assert_eq!(term.grid()[0][0].glyph, substitute);
        assert_eq!(term.grid()[0][1].glyph, plain_q);
    }

    #[test]
    fn sixel_dcs_is_discarded() {
        let mut emulator = emulator();
        emulator.parse(b"\x1bPq#0;2;0;0;0#0!10~-\x1b\\A");
        let term = emulator.term();
        // Nothing from the sixel payload reached the grid.
        assert_eq!(term.grid()[0][0].glyph, glyph('A'));
        assert_eq!(term.grid().cursor().col(), 1);
    }

    #[test]
    fn unknown_csi_is_ignored() {
        let mut emulator = emulator();
        emulator.parse(b"\x1b[?1049h\x1b[99;99;99y\x1b[5WA");
        let term = emulator.term();
        assert_eq!(term.grid()[0][0].glyph, glyph('A'));
    }

    #[test]
    fn ris_resets_everything() {
        let mut emulator = emulator();
        emulator.parse(b"\x1b[31;1mX\x1b[5;10H\x1b[2;20r\x1b[?7l\x1b]4;1;rgb:01/02/03\x1b\\");
        emulator.parse(b"\x1bc");
        let term = emulator.term();
        assert!(term.grid()[0][0].is_empty());
        assert_eq!(term.grid().cursor().line(), 0);
        assert_eq!(term.grid().cursor().col(), 0);
        assert_eq!(term.mode(), TermMode::default());
        assert_eq!(term.grid().scroll_region(), 0..24);
        assert_eq!(
            term.palette().color(1),
            crate::color::Palette::default().color(1)
        );
    }

    #[test]
    fn cursor_invariant_holds_under_garbage() {
        // Pseudo-random byte soup: the cursor must stay in range and the
        // emulator must not panic.
        let mut emulator = emulator();
        let mut state = 0x2545_f491_4f6c_dd1d_u64;
        let mut bytes = Vec::with_capacity(4096);
        for _ in 0..4096 {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            bytes.push((state & 0xff) as u8);
        }
        for chunk in bytes.chunks(17) {
            emulator.parse(chunk);
            let grid = emulator.term().grid();
            assert!(grid.cursor().line() < grid.lines());
            assert!(grid.cursor().col() <= grid.cols());
        }
    }

    #[test]
    fn wide_pairs_stay_adjacent_under_edits() {
        let mut emulator = emulator();
        emulator.parse("あい漢字".as_bytes());
        emulator.parse(b"\x1b[1;2H\x1b[2@"); // Insert inside the first pair.
        emulator.parse(b"\x1b[1;4H\x1b[3P"); // Delete crossing a pair.
        emulator.parse(b"\x1b[1;6H\x1b[2X"); // Erase over a pair boundary.

        let grid = emulator.term().grid();
        for line in 0..grid.lines() {
            for col in 0..grid.cols() {
                if grid[line][col].width == WidthClass::Wide {
                    assert!(col + 1 < grid.cols(), "wide cell at right edge");
                    assert_eq!(
                        grid[line][col + 1].width,
                        WidthClass::NextToWide,
                        "pair split at ({line},{col})"
                    );
                    assert_eq!(grid[line][col].glyph, grid[line][col + 1].glyph);
                }
                if grid[line][col].width == WidthClass::NextToWide {
                    assert!(col > 0);
                    assert_eq!(grid[line][col - 1].width, WidthClass::Wide);
                }
            }
        }
    }

    #[test]
    fn refresh_draws_glyph_pixels() {
        let mut emulator = emulator();
        let mut sink = MemorySink::new(640, 384);
        emulator.parse(b"\x1b[?25l"); // No cursor overlay over the cell.
        emulator.parse(b"A");
        emulator.refresh(&mut sink);

        let fg = emulator.term().palette().color(crate::color::DEFAULT_FG).pack();
        let bg = emulator.term().palette().color(DEFAULT_BG).pack();
        // 'A' has a solid top row in the test font: all 8 top pixels fg.
        for x in 0..8 {
            assert_eq!(sink.pixel(x, 0), fg, "pixel ({x},0)");
        }
        // Second row of 'A' is clear: bg.
        assert_eq!(sink.pixel(0, 1), bg);
        // Neighboring cell is background.
        assert_eq!(sink.pixel(8, 0), bg);
    }

    #[test]
    fn refresh_commits_dirty_line_strips() {
        let mut emulator = emulator();
        let mut sink = MemorySink::new(640, 384);
        emulator.refresh(&mut sink); // Initial full paint.
        sink.clear_commits();

        emulator.parse(b"\x1b[10;1HZ");
        emulator.refresh(&mut sink);
        // Cursor line (9) is the only dirty line; strip is rows 144..160.
        assert!(sink.commits().contains(&(0, 144, 640, 160)));
        // The cursor keeps its own line dirty for the next refresh.
        assert!(emulator.term().grid().dirty().is_dirty(9));
    }

    #[test]
    fn bold_renders_bright_foreground() {
        let mut emulator = emulator();
        let mut sink = MemorySink::new(640, 384);
        emulator.parse(b"\x1b[?25l\x1b[31;1mX");
        emulator.refresh(&mut sink);
        // Bright red = palette 9.
        let bright = emulator.term().palette().color(9).pack();
        assert_eq!(sink.pixel(0, 0), bright);
    }

    #[test]
    fn reverse_swaps_colors_before_brightening() {
        let mut emulator = emulator();
        let mut sink = MemorySink::new(640, 384);
        emulator.parse(b"\x1b[?25l\x1b[31;7mX");
        emulator.refresh(&mut sink);
        // Reversed: glyph pixels take the bg color (black), field is red.
        let red = emulator.term().palette().color(1).pack();
        let black = emulator.term().palette().color(0).pack();
        assert_eq!(sink.pixel(0, 0), black); // Top row is glyph (now bg color).
        assert_eq!(sink.pixel(0, 1), red); // Field below is fg color.
    }

    #[test]
    fn underline_forces_bottom_row() {
        let mut emulator = emulator();
        let mut sink = MemorySink::new(640, 384);
        emulator.parse(b"\x1b[?25l\x1b[4mX");
        emulator.refresh(&mut sink);
        let fg = emulator.term().palette().color(crate::color::DEFAULT_FG).pack();
        for x in 0..8 {
            assert_eq!(sink.pixel(x, 15), fg, "underline pixel ({x},15)");
        }
    }

    #[test]
    fn cursor_overlay_uses_active_and_passive_colors() {
        let mut emulator = emulator();
        let mut sink = MemorySink::new(640, 384);
        emulator.refresh(&mut sink);
        // Cursor at (0,0): body painted in the active cursor color.
        let active = emulator.term().palette().color(ACTIVE_CURSOR_COLOR).pack();
        assert_eq!(sink.pixel(0, 1), active);

        emulator.set_focused(false);
        emulator.refresh(&mut sink);
        let passive = emulator.term().palette().color(PASSIVE_CURSOR_COLOR).pack();
        assert_eq!(sink.pixel(0, 1), passive);
    }

    #[test]
    fn hidden_cursor_draws_no_overlay() {
        let mut emulator = emulator();
        let mut sink = MemorySink::new(640, 384);
        emulator.parse(b"\x1b[?25l");
        emulator.refresh(&mut sink);
        let bg = emulator.term().palette().color(DEFAULT_BG).pack();
        assert_eq!(sink.pixel(0, 1), bg);
    }

    #[test]
    fn cursor_moving_away_repaints_old_line() {
        let mut emulator = emulator();
        let mut sink = MemorySink::new(640, 384);
        emulator.refresh(&mut sink);
        let active = emulator.term().palette().color(ACTIVE_CURSOR_COLOR).pack();
        assert_eq!(sink.pixel(0, 1), active);

        // Move the cursor to line 5; the old line repaints without it.
        emulator.parse(b"\x1b[6;1H");
        emulator.refresh(&mut sink);
        let bg = emulator.term().palette().color(DEFAULT_BG).pack();
        assert_eq!(sink.pixel(0, 1), bg);
        assert_eq!(sink.pixel(0, 5 * 16 + 1), active);
    }

    #[test]
    fn cursor_on_wide_pair_covers_both_cells() {
        let mut emulator = emulator();
        let mut sink = MemorySink::new(640, 384);
        emulator.parse("\u{3042}".as_bytes());
        emulator.parse(b"\x1b[1;1H"); // Cursor back onto the wide cell.
        emulator.refresh(&mut sink);
        let active = emulator.term().palette().color(ACTIVE_CURSOR_COLOR).pack();
        // Second row (glyph clear) of both halves shows the cursor color.
        assert_eq!(sink.pixel(0, 1), active);
        assert_eq!(sink.pixel(8, 1), active);
        assert_eq!(sink.pixel(16, 1), emulator.term().palette().color(DEFAULT_BG).pack());
    }

    #[test]
    fn redraw_marks_everything() {
        let mut emulator = emulator();
        let mut sink = MemorySink::new(640, 384);
        emulator.refresh(&mut sink);
        sink.clear_commits();

        emulator.redraw();
        emulator.refresh(&mut sink);
        assert_eq!(sink.commits().len(), 24);
    }

    #[test]
    fn resize_adjusts_grid() {
        let mut emulator = emulator();
        emulator.parse(b"hello");
        emulator.resize(320, 192);
        {
            let term = emulator.term();
            assert_eq!(term.grid().cols(), 40);
            assert_eq!(term.grid().lines(), 12);
            assert_eq!(term.grid()[0][0].glyph, glyph('h'));
        }
        // GWREPT reflects the new pixel size.
        emulator.parse(b"\x1b]8900;0\x07");
        assert_eq!(emulator.drain_reply(), b"\x1b]8900;40;12;320;192\x1b\\");
    }

    #[test]
    fn tabs_and_backspace() {
        let mut emulator = emulator();
        emulator.parse(b"\tA\x08B");
        let term = emulator.term();
        assert_eq!(term.grid()[0][8].glyph, glyph('B'));
        assert_eq!(term.grid().cursor().col(), 9);
    }

    #[test]
    fn tab_stop_set_and_clear() {
        let mut emulator = emulator();
        // HTS at column 5 (0-based 4), then tab to it from column 0.
        emulator.parse(b"\x1b[1;5H\x1bH\x1b[1;1H\t");
        assert_eq!(emulator.term().grid().cursor().col(), 4);
        // TBC 3 clears all stops; tab then runs to the end of the line.
        emulator.parse(b"\x1b[3g\x1b[1;1H\t");
        assert_eq!(emulator.term().grid().cursor().col(), 79);
    }
}
