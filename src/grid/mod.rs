//! Terminal grid: 2D cell storage with cursor, scroll region, tab stops,
//! and dirty tracking.
//!
//! The `Grid` is the central data structure for terminal emulation. The
//! cell matrix, dirty flags, and tab stops are allocated once at creation
//! and only `resize` ever reallocates them. Editing, navigation, and
//! scrolling operations live in submodules.

pub mod cursor;
pub mod dirty;
pub mod editing;
pub mod navigation;
pub mod row;
pub mod scroll;

use std::ops::{Index, IndexMut, Range};

use crate::cell::Cell;

pub use cursor::Cursor;
pub use dirty::DirtyTracker;
pub use editing::EraseMode;
pub use navigation::TabClearMode;
pub use row::Row;

/// Hardware tab stop interval.
const TABSTOP: usize = 8;

/// The 2D terminal cell grid.
#[derive(Debug, Clone)]
pub struct Grid {
    /// Visible rows, index 0 = top of screen.
    rows: Vec<Row>,
    /// Number of columns.
    cols: usize,
    /// Number of lines.
    lines: usize,
    /// Current cursor position and template.
    cursor: Cursor,
    /// Tab stop at each column (true = stop).
    tab_stops: Vec<bool>,
    /// DECSTBM scroll region: top (inclusive) .. bottom (exclusive).
    scroll_region: Range<usize>,
    /// Tracks which rows changed since they were last drawn.
    dirty: DirtyTracker,
}

impl Grid {
    /// Create a new grid with the given dimensions.
    ///
    /// All cells default, cursor at (0, 0), tab stops every 8 columns,
    /// scroll region spanning the whole screen.
    pub fn new(lines: usize, cols: usize) -> Self {
        debug_assert!(lines >= 1 && cols >= 1, "grid dimensions must be >= 1 (got {lines}x{cols})");
        Self {
            rows: (0..lines).map(|_| Row::new(cols)).collect(),
            cols,
            lines,
            cursor: Cursor::new(),
            tab_stops: Self::init_tab_stops(cols),
            scroll_region: 0..lines,
            dirty: DirtyTracker::new(lines),
        }
    }

    /// Number of lines.
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Immutable reference to the cursor.
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Mutable reference to the cursor.
    pub fn cursor_mut(&mut self) -> &mut Cursor {
        &mut self.cursor
    }

    /// The scroll region as a half-open line range.
    pub fn scroll_region(&self) -> Range<usize> {
        self.scroll_region.clone()
    }

    /// Immutable reference to the dirty tracker.
    pub fn dirty(&self) -> &DirtyTracker {
        &self.dirty
    }

    /// Mutable reference to the dirty tracker.
    pub fn dirty_mut(&mut self) -> &mut DirtyTracker {
        &mut self.dirty
    }

    /// Immutable reference to tab stops.
    #[cfg(test)]
    pub(crate) fn tab_stops(&self) -> &[bool] {
        &self.tab_stops
    }

    /// The erase fill cell: space with the current background, default
    /// foreground, no attributes.
    pub(crate) fn erase_template(&self) -> Cell {
        Cell::erased(self.cursor.template.bg)
    }

    /// Resize to new dimensions without reflow.
    ///
    /// Rows are truncated or padded with default cells, the cursor is
    /// clamped, the scroll region resets to the full screen, tab stops
    /// re-initialize, and everything is marked dirty.
    pub fn resize(&mut self, lines: usize, cols: usize) {
        debug_assert!(lines >= 1 && cols >= 1);
        if lines == self.lines && cols == self.cols {
            return;
        }

        for row in &mut self.rows {
            row.resize(cols, Cell::default());
        }
        self.rows.resize_with(lines, || Row::new(cols));

        self.cols = cols;
        self.lines = lines;
        self.scroll_region = 0..lines;
        self.tab_stops = Self::init_tab_stops(cols);
        self.cursor.set_line(self.cursor.line().min(lines - 1));
        self.cursor.set_col(self.cursor.col().min(cols - 1));
        self.dirty.resize(lines);
    }

    /// Restore the default tab stops (RIS).
    pub(crate) fn reset_tab_stops(&mut self) {
        self.tab_stops = Self::init_tab_stops(self.cols);
    }

    /// Initialize tab stops every `TABSTOP` columns.
    fn init_tab_stops(cols: usize) -> Vec<bool> {
        (0..cols).map(|col| col % TABSTOP == 0).collect()
    }
}

impl Index<usize> for Grid {
    type Output = Row;

    fn index(&self, line: usize) -> &Row {
        &self.rows[line]
    }
}

impl IndexMut<usize> for Grid {
    fn index_mut(&mut self, line: usize) -> &mut Row {
        &mut self.rows[line]
    }
}
