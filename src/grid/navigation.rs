//! Cursor movement and navigation operations.
//!
//! CUU/CUD/CUF/CUB/CUP/CHA/VPA/CR/LF/RI/NEL/HT/CHT/CBT and tab stop
//! management. All movement is clamped to grid bounds; relative vertical
//! motion additionally clamps to the scroll region when the cursor starts
//! inside it. Explicit motion always leaves the pending-wrap state.

use super::Grid;

/// Tab clear extent for TBC (Tabulation Clear).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabClearMode {
    /// Clear the tab stop at the cursor column.
    Current,
    /// Clear all tab stops.
    All,
}

impl Grid {
    /// CUU: move cursor up `count` lines, clamped to the top of the
    /// scroll region (if inside it) or line 0.
    pub fn move_up(&mut self, count: usize) {
        let line = self.cursor.line();
        let top = if self.scroll_region.contains(&line) {
            self.scroll_region.start
        } else {
            0
        };
        self.cursor.set_line(line.saturating_sub(count).max(top));
        self.leave_pending_wrap();
    }

    /// CUD: move cursor down `count` lines, clamped to the bottom of the
    /// scroll region (if inside it) or the last line.
    pub fn move_down(&mut self, count: usize) {
        let line = self.cursor.line();
        let bottom = if self.scroll_region.contains(&line) {
            self.scroll_region.end - 1
        } else {
            self.lines - 1
        };
        self.cursor.set_line((line + count).min(bottom));
        self.leave_pending_wrap();
    }

    /// CUF: move cursor right `count` columns, clamped to the last column.
    pub fn move_forward(&mut self, count: usize) {
        let col = self.cursor.col().min(self.cols - 1);
        self.cursor.set_col((col + count).min(self.cols - 1));
    }

    /// CUB: move cursor left `count` columns, clamped to column 0.
    ///
    /// From the pending-wrap state the cursor first snaps back onto the
    /// last column.
    pub fn move_backward(&mut self, count: usize) {
        let col = self.cursor.col().min(self.cols - 1);
        self.cursor.set_col(col.saturating_sub(count));
    }

    /// CUP/HVP: set the cursor to absolute `(line, col)`, clamped.
    pub fn move_to(&mut self, line: usize, col: usize) {
        self.cursor.set_line(line.min(self.lines - 1));
        self.cursor.set_col(col.min(self.cols - 1));
    }

    /// CHA: set the cursor column, clamped to the last column.
    pub fn move_to_column(&mut self, col: usize) {
        self.cursor.set_col(col.min(self.cols - 1));
    }

    /// VPA: set the cursor line, clamped to the last line.
    pub fn move_to_line(&mut self, line: usize) {
        self.cursor.set_line(line.min(self.lines - 1));
        self.leave_pending_wrap();
    }

    /// CR: move cursor to column 0.
    pub fn carriage_return(&mut self) {
        self.cursor.set_col(0);
    }

    /// LF: move cursor down one line; at the bottom of the scroll region
    /// the region's content scrolls up instead.
    pub fn linefeed(&mut self) {
        let line = self.cursor.line();
        if line + 1 == self.scroll_region.end {
            self.scroll_up(1);
        } else if line + 1 < self.lines {
            self.cursor.set_line(line + 1);
        } else {
            // Below the scroll region on the last line: stay put.
        }
    }

    /// RI: move cursor up one line; at the top of the scroll region the
    /// region's content scrolls down instead.
    pub fn reverse_index(&mut self) {
        let line = self.cursor.line();
        if line == self.scroll_region.start {
            self.scroll_down(1);
        } else if line > 0 {
            self.cursor.set_line(line - 1);
        } else {
            // Above the scroll region on line 0: stay put.
        }
    }

    /// NEL: carriage return followed by linefeed.
    pub fn next_line(&mut self) {
        self.carriage_return();
        self.linefeed();
    }

    /// HT: advance to the next tab stop, or the last column.
    pub fn tab(&mut self) {
        let col = self.cursor.col().min(self.cols - 1);
        for candidate in col + 1..self.cols {
            if self.tab_stops[candidate] {
                self.cursor.set_col(candidate);
                return;
            }
        }
        self.cursor.set_col(self.cols - 1);
    }

    /// CBT: move back to the previous tab stop, or column 0.
    pub fn tab_backward(&mut self) {
        let col = self.cursor.col().min(self.cols - 1);
        for candidate in (0..col).rev() {
            if self.tab_stops[candidate] {
                self.cursor.set_col(candidate);
                return;
            }
        }
        self.cursor.set_col(0);
    }

    /// HTS: set a tab stop at the cursor column.
    pub fn set_tab_stop(&mut self) {
        let col = self.cursor.col();
        if col < self.cols {
            self.tab_stops[col] = true;
        }
    }

    /// TBC: clear the cursor column's tab stop, or all of them.
    pub fn clear_tab_stop(&mut self, mode: TabClearMode) {
        match mode {
            TabClearMode::Current => {
                let col = self.cursor.col();
                if col < self.cols {
                    self.tab_stops[col] = false;
                }
            }
            TabClearMode::All => self.tab_stops.fill(false),
        }
    }

    /// Snap a pending-wrap cursor back onto the last column.
    fn leave_pending_wrap(&mut self) {
        if self.cursor.col() >= self.cols {
            self.cursor.set_col(self.cols - 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::cell::WidthClass;
    use crate::glyph::GlyphId;
    use crate::grid::Grid;

    use super::TabClearMode;

    #[test]
    fn move_up_and_clamp() {
        let mut grid = Grid::new(24, 80);
        grid.cursor_mut().set_line(5);
        grid.move_up(3);
        assert_eq!(grid.cursor().line(), 2);
        grid.move_up(100);
        assert_eq!(grid.cursor().line(), 0);
    }

    #[test]
    fn move_down_and_clamp() {
        let mut grid = Grid::new(24, 80);
        grid.move_down(3);
        assert_eq!(grid.cursor().line(), 3);
        grid.move_down(100);
        assert_eq!(grid.cursor().line(), 23);
    }

    #[test]
    fn vertical_moves_respect_scroll_region() {
        let mut grid = Grid::new(24, 80);
        grid.set_scroll_region(5, Some(15));
        grid.cursor_mut().set_line(10);
        grid.move_up(100);
        assert_eq!(grid.cursor().line(), 4); // region top (0-based).
        grid.cursor_mut().set_line(10);
        grid.move_down(100);
        assert_eq!(grid.cursor().line(), 14); // region bottom.
    }

    #[test]
    fn vertical_moves_outside_region_use_screen_bounds() {
        let mut grid = Grid::new(24, 80);
        grid.set_scroll_region(5, Some(15));
        grid.cursor_mut().set_line(20);
        grid.move_down(100);
        assert_eq!(grid.cursor().line(), 23);
    }

    #[test]
    fn horizontal_moves_clamp() {
        let mut grid = Grid::new(24, 80);
        grid.move_forward(100);
        assert_eq!(grid.cursor().col(), 79);
        grid.move_backward(5);
        assert_eq!(grid.cursor().col(), 74);
        grid.move_backward(100);
        assert_eq!(grid.cursor().col(), 0);
    }

    #[test]
    fn backward_from_pending_wrap_snaps_to_last_column() {
        let mut grid = Grid::new(24, 5);
        for _ in 0..5 {
            grid.put(GlyphId(b'A' as u16), WidthClass::Half, true);
        }
        assert_eq!(grid.cursor().col(), 5);
        grid.move_backward(1);
        assert_eq!(grid.cursor().col(), 3);
    }

    #[test]
    fn linefeed_at_region_bottom_scrolls() {
        let mut grid = Grid::new(3, 10);
        grid.put(GlyphId(b'A' as u16), WidthClass::Half, true);
        grid.cursor_mut().set_line(2);
        grid.linefeed();
        assert_eq!(grid.cursor().line(), 2);
        // Line 0 content scrolled off.
        assert!(grid[0][0].is_empty());
    }

    #[test]
    fn linefeed_below_region_on_last_line_stays() {
        let mut grid = Grid::new(24, 80);
        grid.set_scroll_region(1, Some(10));
        grid.cursor_mut().set_line(23);
        grid.linefeed();
        assert_eq!(grid.cursor().line(), 23);
    }

    #[test]
    fn reverse_index_at_region_top_scrolls_down() {
        let mut grid = Grid::new(3, 10);
        grid.put(GlyphId(b'B' as u16), WidthClass::Half, true);
        grid.cursor_mut().set_col(0);
        grid.reverse_index();
        assert_eq!(grid.cursor().line(), 0);
        assert!(grid[0][0].is_empty());
        assert_eq!(grid[1][0].glyph, GlyphId(b'B' as u16));
    }

    #[test]
    fn tab_stops_every_eight_by_default() {
        let mut grid = Grid::new(24, 80);
        grid.cursor_mut().set_col(1);
        grid.tab();
        assert_eq!(grid.cursor().col(), 8);
        grid.tab();
        assert_eq!(grid.cursor().col(), 16);
    }

    #[test]
    fn tab_past_last_stop_goes_to_line_end() {
        let mut grid = Grid::new(24, 80);
        grid.cursor_mut().set_col(77);
        grid.tab();
        assert_eq!(grid.cursor().col(), 79);
    }

    #[test]
    fn tab_backward_to_previous_stop() {
        let mut grid = Grid::new(24, 80);
        grid.cursor_mut().set_col(10);
        grid.tab_backward();
        assert_eq!(grid.cursor().col(), 8);
        grid.tab_backward();
        assert_eq!(grid.cursor().col(), 0);
    }

    #[test]
    fn set_and_clear_tab_stops() {
        let mut grid = Grid::new(24, 80);
        grid.cursor_mut().set_col(5);
        grid.set_tab_stop();
        assert!(grid.tab_stops()[5]);

        grid.clear_tab_stop(TabClearMode::Current);
        assert!(!grid.tab_stops()[5]);

        grid.clear_tab_stop(TabClearMode::All);
        assert!(!grid.tab_stops().iter().any(|&stop| stop));
        // With no stops, HT runs to the end of the line.
        grid.cursor_mut().set_col(0);
        grid.tab();
        assert_eq!(grid.cursor().col(), 79);
    }
}
