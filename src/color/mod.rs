//! Color types and the 256-entry palette.

pub mod palette;

pub use palette::{
    ACTIVE_CURSOR_COLOR, BRIGHT_OFFSET, DEFAULT_BG, DEFAULT_FG, PASSIVE_CURSOR_COLOR, Palette, Rgb,
};
