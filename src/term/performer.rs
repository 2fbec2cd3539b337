//! Escape sequence dispatch.
//!
//! `Term` implements `vte::Perform`; `vte::Parser` handles the byte-level
//! state machine and incremental UTF-8 decode, and calls back here with
//! complete control functions. Everything semantic — parameter defaults,
//! SGR, private modes, OSC payloads, charset designators — is decided in
//! this module. Unknown sequences are logged at debug level and dropped;
//! nothing here can fail.

use log::debug;
use vte::{Params, Perform};

use crate::cell::CellAttr;
use crate::color::{DEFAULT_BG, DEFAULT_FG, Rgb};
use crate::grid::EraseMode;

use super::{CharsetIndex, StandardCharset, Term};

impl Perform for Term {
    fn print(&mut self, ch: char) {
        self.put_char(ch);
    }

    fn execute(&mut self, byte: u8) {
        match byte {
            0x08 => self.backspace(),
            0x09 => self.grid_mut().tab(),
            // LF, VT, and FF all line feed.
            0x0a..=0x0c => self.grid_mut().linefeed(),
            0x0d => self.grid_mut().carriage_return(),
            // SO/SI switch GL between G1 and G0.
            0x0e => self.charset_mut().set_active(CharsetIndex::G1),
            0x0f => self.charset_mut().set_active(CharsetIndex::G0),
            // BEL has nowhere to ring on a framebuffer.
            0x07 => {}
            _ => debug!("unhandled control byte {byte:#04x}"),
        }
    }

    fn csi_dispatch(&mut self, params: &Params, intermediates: &[u8], ignore: bool, action: char) {
        if ignore {
            debug!("discarding overlong CSI {action:?}");
            return;
        }

        let mut iter = params.iter();
        let mut next_param_or = |default: u16| {
            iter.next()
                .map(|param| param[0])
                .filter(|&param| param != 0)
                .unwrap_or(default)
        };

        match (action, intermediates) {
            ('A', []) => self.grid_mut().move_up(next_param_or(1) as usize),
            ('B' | 'e', []) => self.grid_mut().move_down(next_param_or(1) as usize),
            ('C' | 'a', []) => self.grid_mut().move_forward(next_param_or(1) as usize),
            ('D', []) => self.grid_mut().move_backward(next_param_or(1) as usize),
            ('E', []) => {
                let count = next_param_or(1) as usize;
                self.grid_mut().move_down(count);
                self.grid_mut().carriage_return();
            }
            ('F', []) => {
                let count = next_param_or(1) as usize;
                self.grid_mut().move_up(count);
                self.grid_mut().carriage_return();
            }
            ('G' | '`', []) => {
                let col = next_param_or(1) as usize;
                self.grid_mut().move_to_column(col - 1);
            }
            ('H' | 'f', []) => {
                let line = next_param_or(1) as usize;
                let col = next_param_or(1) as usize;
                self.goto(line - 1, col - 1);
            }
            ('d', []) => {
                let line = next_param_or(1) as usize;
                self.goto_line(line - 1);
            }
            ('I', []) => {
                for _ in 0..next_param_or(1) {
                    self.grid_mut().tab();
                }
            }
            ('Z', []) => {
                for _ in 0..next_param_or(1) {
                    self.grid_mut().tab_backward();
                }
            }
            ('J', []) => {
                let mode = match next_param_or(0) {
                    0 => EraseMode::Below,
                    1 => EraseMode::Above,
                    2 => EraseMode::All,
                    other => {
                        debug!("unhandled ED parameter {other}");
                        return;
                    }
                };
                self.grid_mut().erase_display(mode);
            }
            ('K', []) => {
                let mode = match next_param_or(0) {
                    0 => EraseMode::Below,
                    1 => EraseMode::Above,
                    2 => EraseMode::All,
                    other => {
                        debug!("unhandled EL parameter {other}");
                        return;
                    }
                };
                self.grid_mut().erase_line(mode);
            }
            ('@', []) => self.grid_mut().insert_blank(next_param_or(1) as usize),
            ('P', []) => self.grid_mut().delete_chars(next_param_or(1) as usize),
            ('X', []) => self.grid_mut().erase_chars(next_param_or(1) as usize),
            ('L', []) => self.grid_mut().insert_lines(next_param_or(1) as usize),
            ('M', []) => self.grid_mut().delete_lines(next_param_or(1) as usize),
            ('S', []) => self.grid_mut().scroll_up(next_param_or(1) as usize),
            ('T', []) => self.grid_mut().scroll_down(next_param_or(1) as usize),
            ('r', []) => {
                let top = next_param_or(1) as usize;
                let bottom = iter
                    .next()
                    .map(|param| param[0] as usize)
                    .filter(|&param| param != 0);
                self.grid_mut().set_scroll_region(top, bottom);
                self.goto(0, 0);
            }
            ('g', []) => self.clear_tabs(next_param_or(0)),
            ('h', [b'?']) => {
                for param in iter {
                    self.set_private_mode(param[0], true);
                }
            }
            ('l', [b'?']) => {
                for param in iter {
                    self.set_private_mode(param[0], false);
                }
            }
            // ANSI SM/RM (IRM and friends) are not supported.
            ('h' | 'l', []) => debug!("unhandled ANSI mode {}", next_param_or(0)),
            ('m', []) => self.sgr(params),
            ('n', []) => self.device_status(next_param_or(0)),
            ('c', []) => self.identify_terminal(),
            _ => debug!("unhandled CSI {action:?} intermediates {intermediates:?}"),
        }
    }

    fn esc_dispatch(&mut self, intermediates: &[u8], ignore: bool, byte: u8) {
        if ignore {
            return;
        }

        // Charset designation: ESC ( c, ESC ) c, ESC * c, ESC + c.
        if let [intermediate] = intermediates {
            if let Some(index) = CharsetIndex::from_intermediate(*intermediate) {
                match StandardCharset::from_designator(byte) {
                    Some(charset) => self.charset_mut().set_charset(index, charset),
                    None => debug!("unhandled charset designator {:?}", byte as char),
                }
                return;
            }
        }

        match (byte, intermediates) {
            (b'7', []) => self.save_state(),
            (b'8', []) => self.restore_state(),
            (b'D', []) => self.grid_mut().linefeed(),
            (b'E', []) => self.grid_mut().next_line(),
            (b'M', []) => self.grid_mut().reverse_index(),
            (b'H', []) => self.grid_mut().set_tab_stop(),
            (b'N', []) => self.charset_mut().set_single_shift(CharsetIndex::G2),
            (b'O', []) => self.charset_mut().set_single_shift(CharsetIndex::G3),
            (b'Z', []) => self.identify_terminal(),
            (b'c', []) => self.reset(),
            // String terminator for OSC/DCS; the parser already unwound.
            (b'\\', []) => {}
            _ => debug!("unhandled ESC {:?} intermediates {intermediates:?}", byte as char),
        }
    }

    fn osc_dispatch(&mut self, params: &[&[u8]], _bell_terminated: bool) {
        match params {
            // OSC 0/2: window title (OSC 1 is the icon name; same store).
            [b"0" | b"1" | b"2", rest @ ..] => {
                let title = rest
                    .iter()
                    .map(|part| String::from_utf8_lossy(part))
                    .collect::<Vec<_>>()
                    .join(";");
                self.set_title(&title);
            }
            // OSC 4: redefine palette entries from (index, color spec) pairs.
            [b"4", entries @ ..] => {
                for pair in entries.chunks(2) {
                    let [index, spec] = pair else {
                        debug!("OSC 4 with dangling parameter");
                        break;
                    };
                    let Some(index) = parse_number(index) else { continue };
                    match std::str::from_utf8(spec).ok().and_then(Rgb::parse_spec) {
                        Some(color) => self.palette_mut().set_color(index, color),
                        None => debug!("unparseable OSC 4 color spec"),
                    }
                }
            }
            // OSC 104: reset palette entries (all of them without params).
            [b"104"] => self.palette_mut().reset_all(),
            [b"104", indices @ ..] => {
                for index in indices {
                    if let Some(index) = parse_number(index) {
                        self.palette_mut().reset_color(index);
                    }
                }
            }
            // OSC 8900: glyph width report — reply with geometry.
            [b"8900", ..] => self.report_geometry(),
            _ => debug!("unhandled OSC {:?}", params.first().map(|p| String::from_utf8_lossy(p))),
        }
    }

    fn hook(&mut self, _params: &Params, _intermediates: &[u8], _ignore: bool, action: char) {
        // DCS strings (sixel `q`, DRCS soft fonts `{`) are accepted and
        // discarded; `put` swallows the payload until the terminator.
        debug!("discarding DCS string {action:?}");
    }

    fn put(&mut self, _byte: u8) {}

    fn unhook(&mut self) {}
}

impl Term {
    /// SGR: apply select-graphic-rendition parameters to the template.
    ///
    /// Handles the classic attribute set, 8/16-color selects, and 256
    /// color via `38;5;n` / `48;5;n` in both semicolon and colon forms.
    /// Truecolor parameters are consumed and dropped. Palette indices
    /// wrap modulo 256.
    fn sgr(&mut self, params: &Params) {
        if params.is_empty() {
            self.sgr_reset();
            return;
        }

        let mut iter = params.iter();
        while let Some(param) = iter.next() {
            match param {
                [0] => self.sgr_reset(),
                [1] => self.template_mut().attr.insert(CellAttr::BOLD),
                [4] => self.template_mut().attr.insert(CellAttr::UNDERLINE),
                [5] => self.template_mut().attr.insert(CellAttr::BLINK),
                [7] => self.template_mut().attr.insert(CellAttr::REVERSE),
                [22] => self.template_mut().attr.remove(CellAttr::BOLD),
                [24] => self.template_mut().attr.remove(CellAttr::UNDERLINE),
                [25] => self.template_mut().attr.remove(CellAttr::BLINK),
                [27] => self.template_mut().attr.remove(CellAttr::REVERSE),
                [param @ 30..=37] => self.template_mut().fg = (param - 30) as u8,
                [38] => {
                    if let Some(index) = parse_indexed_color(&mut iter) {
                        self.template_mut().fg = index;
                    }
                }
                [38, rest @ ..] => {
                    if let Some(index) = indexed_color_from_subparams(rest) {
                        self.template_mut().fg = index;
                    }
                }
                [39] => self.template_mut().fg = DEFAULT_FG,
                [param @ 40..=47] => self.template_mut().bg = (param - 40) as u8,
                [48] => {
                    if let Some(index) = parse_indexed_color(&mut iter) {
                        self.template_mut().bg = index;
                    }
                }
                [48, rest @ ..] => {
                    if let Some(index) = indexed_color_from_subparams(rest) {
                        self.template_mut().bg = index;
                    }
                }
                [49] => self.template_mut().bg = DEFAULT_BG,
                [param @ 90..=97] => self.template_mut().fg = (param - 90 + 8) as u8,
                [param @ 100..=107] => self.template_mut().bg = (param - 100 + 8) as u8,
                _ => debug!("unhandled SGR parameter {param:?}"),
            }
        }
    }

    /// SGR 0: default color pair, no attributes.
    fn sgr_reset(&mut self) {
        let template = self.template_mut();
        template.fg = DEFAULT_FG;
        template.bg = DEFAULT_BG;
        template.attr = CellAttr::empty();
    }

    /// The cursor's attribute template.
    fn template_mut(&mut self) -> &mut crate::cell::Cell {
        &mut self.grid_mut().cursor_mut().template
    }
}

/// Parse the tail of a semicolon-form `38;5;n` / `38;2;r;g;b` color.
///
/// Returns the palette index for the `5;n` form. The truecolor `2` form
/// consumes its three channels and yields nothing (out of scope), as do
/// malformed tails; later parameters still apply either way.
fn parse_indexed_color(iter: &mut vte::ParamsIter<'_>) -> Option<u8> {
    match iter.next()? {
        [5] => Some(iter.next()?[0] as u8),
        [2] => {
            // Truecolor is out of scope; swallow r, g, b.
            for _ in 0..3 {
                iter.next()?;
            }
            None
        }
        other => {
            debug!("unhandled color kind {other:?} in SGR 38/48");
            None
        }
    }
}

/// Parse the colon form `38:5:n` / `38:2:r:g:b`, already grouped by vte.
fn indexed_color_from_subparams(subparams: &[u16]) -> Option<u8> {
    match subparams {
        [5, index, ..] => Some(*index as u8),
        _ => None,
    }
}

/// Parse a decimal number from OSC parameter bytes.
fn parse_number(bytes: &[u8]) -> Option<usize> {
    std::str::from_utf8(bytes).ok()?.parse().ok()
}
