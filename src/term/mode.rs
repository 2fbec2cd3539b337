//! Terminal mode flags (DECSET/DECRST).

use bitflags::bitflags;

bitflags! {
    /// Bitflags for terminal mode state.
    ///
    /// Toggled by DECSET (`CSI ? n h`) and DECRST (`CSI ? n l`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TermMode: u8 {
        /// DECTCEM (?25) — cursor visible.
        const SHOW_CURSOR = 1;
        /// DECOM (?6) — cursor addressing relative to the scroll region.
        const ORIGIN      = 1 << 1;
        /// DECAWM (?7) — auto-wrap at end of line.
        const LINE_WRAP   = 1 << 2;
    }
}

impl Default for TermMode {
    fn default() -> Self {
        Self::SHOW_CURSOR | Self::LINE_WRAP
    }
}
