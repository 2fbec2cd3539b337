//! Terminal emulation core for a framebuffer console.
//!
//! This crate is the engine of a KMS/DRM virtual-console terminal: it
//! interprets the byte stream a child shell writes (VT100/VT220/xterm
//! subset, incremental UTF-8), maintains a palette-indexed cell grid with
//! per-line dirty tracking, and rasterises dirty lines into an abstract
//! pixel sink. The display back end (dumb-buffer ownership, mode
//! setting), the pty/tty front end (fork/exec, signals, `select`), and
//! font storage all live outside; the core performs no I/O and never
//! fails on input — malformed bytes are replaced or discarded.

#![deny(unsafe_code)]

pub mod cell;
pub mod color;
pub mod emulator;
pub mod glyph;
pub mod grid;
pub mod render;
pub mod term;

pub use cell::{Cell, CellAttr, WidthClass};
pub use color::{Palette, Rgb};
pub use emulator::Emulator;
pub use glyph::{Glyph, GlyphId, GlyphTable};
pub use grid::{Cursor, DirtyTracker, EraseMode, Grid, Row, TabClearMode};
pub use render::{MemorySink, PixelSink};
pub use term::{CharsetIndex, CharsetState, StandardCharset, Term, TermMode};
