//! 256-entry color palette for terminal emulation.
//!
//! Indices 0–15 default to the Linux console (VGA) colors; 16–231 and
//! 232–255 are the xterm 6×6×6 cube and grayscale ramp, whose channel
//! levels are fixed by the xterm-256 definition. Cells store palette
//! indices; the rasteriser resolves them to `Rgb` at draw time, so OSC 4
//! redefinition retroactively recolors the screen.

/// Default foreground palette index (gray).
pub const DEFAULT_FG: u8 = 7;
/// Default background palette index (black).
pub const DEFAULT_BG: u8 = 0;
/// Cursor background while the console owns the display (green).
pub const ACTIVE_CURSOR_COLOR: u8 = 2;
/// Cursor background while another VT owns the display (red).
pub const PASSIVE_CURSOR_COLOR: u8 = 1;
/// Added to fg (BOLD) or bg (BLINK) indices below 8 to brighten them.
pub const BRIGHT_OFFSET: u8 = 8;

/// A 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pack as 0x00RRGGBB for a 32-bpp framebuffer.
    pub fn pack(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }

    /// Parse an X11 color spec of the form `rgb:R/G/B` with 1–4 hex
    /// digits per channel, scaled to 8 bits. Returns `None` on anything
    /// else (named colors are not supported).
    pub fn parse_spec(spec: &str) -> Option<Self> {
        let spec = spec.strip_prefix("rgb:")?;
        let mut channels = spec.split('/');
        let r = parse_channel(channels.next()?)?;
        let g = parse_channel(channels.next()?)?;
        let b = parse_channel(channels.next()?)?;
        if channels.next().is_some() {
            return None;
        }
        Some(Self { r, g, b })
    }
}

/// Scale a 1–4 hex digit channel value to 8 bits.
fn parse_channel(text: &str) -> Option<u8> {
    let digits = text.len();
    if digits == 0 || digits > 4 {
        return None;
    }
    let value = u16::from_str_radix(text, 16).ok()?;
    // Scale e.g. 0xf -> 0xff, 0xfff -> 0xff.
    let max = (1u32 << (4 * digits)) - 1;
    Some((u32::from(value) * 255 / max) as u8)
}

/// Linux console (VGA) colors for indices 0–15.
const ANSI_COLORS: [Rgb; 16] = [
    Rgb::new(0x00, 0x00, 0x00), // 0  black
    Rgb::new(0xaa, 0x00, 0x00), // 1  red
    Rgb::new(0x00, 0xaa, 0x00), // 2  green
    Rgb::new(0xaa, 0x55, 0x00), // 3  brown
    Rgb::new(0x00, 0x00, 0xaa), // 4  blue
    Rgb::new(0xaa, 0x00, 0xaa), // 5  magenta
    Rgb::new(0x00, 0xaa, 0xaa), // 6  cyan
    Rgb::new(0xaa, 0xaa, 0xaa), // 7  gray
    Rgb::new(0x55, 0x55, 0x55), // 8  dark gray
    Rgb::new(0xff, 0x55, 0x55), // 9  bright red
    Rgb::new(0x55, 0xff, 0x55), // 10 bright green
    Rgb::new(0xff, 0xff, 0x55), // 11 yellow
    Rgb::new(0x55, 0x55, 0xff), // 12 bright blue
    Rgb::new(0xff, 0x55, 0xff), // 13 bright magenta
    Rgb::new(0x55, 0xff, 0xff), // 14 bright cyan
    Rgb::new(0xff, 0xff, 0xff), // 15 white
];

/// 256-entry indexed color palette.
///
/// Keeps a factory-default copy so OSC 104 and RIS can restore entries
/// redefined by OSC 4.
#[derive(Debug, Clone)]
pub struct Palette {
    /// Live palette entries.
    colors: [Rgb; 256],
    /// Factory defaults for reset operations.
    defaults: [Rgb; 256],
}

impl Default for Palette {
    fn default() -> Self {
        let colors = build_default_palette();
        Self { colors, defaults: colors }
    }
}

impl Palette {
    /// Resolve a palette index to an `Rgb` value.
    pub fn color(&self, index: u8) -> Rgb {
        self.colors[usize::from(index)]
    }

    /// Redefine an indexed color (OSC 4). Indices past 255 are ignored.
    pub fn set_color(&mut self, index: usize, color: Rgb) {
        if let Some(slot) = self.colors.get_mut(index) {
            *slot = color;
        }
    }

    /// Reset an indexed color to its default (OSC 104 with an index).
    pub fn reset_color(&mut self, index: usize) {
        if index < 256 {
            self.colors[index] = self.defaults[index];
        }
    }

    /// Reset every entry to its default (OSC 104 without an index, RIS).
    pub fn reset_all(&mut self) {
        self.colors = self.defaults;
    }
}

/// Build the default palette: console colors plus the xterm-256 tail.
fn build_default_palette() -> [Rgb; 256] {
    let mut colors = [Rgb::new(0, 0, 0); 256];
    colors[..16].copy_from_slice(&ANSI_COLORS);

    // 16–231: the xterm 6×6×6 color cube.
    for index in 16..232 {
        let offset = index - 16;
        colors[index] = Rgb::new(
            cube_channel(offset / 36),
            cube_channel(offset / 6 % 6),
            cube_channel(offset % 6),
        );
    }

    // 232–255: the xterm 24-step grayscale ramp.
    for (step, slot) in colors[232..].iter_mut().enumerate() {
        let level = (10 * step + 8) as u8;
        *slot = Rgb::new(level, level, level);
    }

    colors
}

/// Map a cube coordinate 0–5 to its xterm channel level.
fn cube_channel(coordinate: usize) -> u8 {
    if coordinate == 0 { 0 } else { (40 * coordinate + 55) as u8 }
}
