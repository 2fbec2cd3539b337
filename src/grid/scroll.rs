//! Scroll region management and scroll operations.
//!
//! DECSTBM, SU/SD, and IL/DL. All operations rotate existing row
//! allocations rather than reallocating, fill vacated rows with the BCE
//! background, and mark the affected lines dirty.

use std::ops::Range;

use super::Grid;

impl Grid {
    /// DECSTBM: set the scroll region.
    ///
    /// Parameters are 1-based; `bottom` defaults to the screen height.
    /// A region of fewer than 2 lines is rejected. Stored as a 0-based
    /// half-open range.
    pub fn set_scroll_region(&mut self, top: usize, bottom: Option<usize>) {
        let top = top.max(1) - 1;
        let bottom = bottom.map_or(self.lines, |b| b.min(self.lines));

        if top + 1 >= bottom {
            log::debug!("rejecting degenerate scroll region {top}..{bottom}");
            return;
        }
        self.scroll_region = top..bottom;
    }

    /// SU: scroll the region's content up `count` lines. Vacated rows at
    /// the bottom take the BCE background.
    pub fn scroll_up(&mut self, count: usize) {
        let range = self.scroll_region.clone();
        self.scroll_range_up(range, count);
    }

    /// SD: scroll the region's content down `count` lines. Vacated rows
    /// at the top take the BCE background.
    pub fn scroll_down(&mut self, count: usize) {
        let range = self.scroll_region.clone();
        self.scroll_range_down(range, count);
    }

    /// IL: insert `count` blank lines at the cursor, pushing lines below
    /// it down within the scroll region. No-op outside the region.
    pub fn insert_lines(&mut self, count: usize) {
        let line = self.cursor.line();
        if !self.scroll_region.contains(&line) {
            return;
        }
        let range = line..self.scroll_region.end;
        self.scroll_range_down(range, count);
    }

    /// DL: delete `count` lines at the cursor, pulling lines below it up
    /// within the scroll region. No-op outside the region.
    pub fn delete_lines(&mut self, count: usize) {
        let line = self.cursor.line();
        if !self.scroll_region.contains(&line) {
            return;
        }
        let range = line..self.scroll_region.end;
        self.scroll_range_up(range, count);
    }

    /// Rotate a row range up by `count`, resetting the vacated bottom rows.
    fn scroll_range_up(&mut self, range: Range<usize>, count: usize) {
        let len = range.end - range.start;
        if len == 0 {
            return;
        }
        let count = count.max(1).min(len);
        let template = self.erase_template();

        self.rows[range.start..range.end].rotate_left(count);
        for line in range.end - count..range.end {
            self.rows[line].reset(template);
        }
        self.dirty.mark_range(range.start, range.end);
    }

    /// Rotate a row range down by `count`, resetting the vacated top rows.
    fn scroll_range_down(&mut self, range: Range<usize>, count: usize) {
        let len = range.end - range.start;
        if len == 0 {
            return;
        }
        let count = count.max(1).min(len);
        let template = self.erase_template();

        self.rows[range.start..range.end].rotate_right(count);
        for line in range.start..range.start + count {
            self.rows[line].reset(template);
        }
        self.dirty.mark_range(range.start, range.end);
    }
}
