//! Theme: dark canvas, elevated overlay, single accent.

use ratatui::style::Color;

pub mod colors {
    use super::*;
    /// Main canvas.
    pub const BG: Color = Color::Rgb(0x18, 0x1c, 0x22);
    /// Status bar and palette overlay.
    pub const ELEVATED: Color = Color::Rgb(0x16, 0x1a, 0x1f);
    pub const BORDER: Color = Color::Rgb(0x2d, 0x34, 0x3e);
    /// Prompt, active-row bar.
    pub const ACCENT: Color = Color::Rgb(0x6b, 0xbc, 0xff);
    /// Active row background.
    pub const ACCENT_GLOW: Color = Color::Rgb(0x1e, 0x2d, 0x3d);
    pub const TEXT: Color = Color::Rgb(0xf2, 0xf4, 0xf8);
    pub const TEXT_DIM: Color = Color::Rgb(0xbc, 0xc5, 0xd0);
    /// Hints, headings, placeholder.
    pub const MUTED: Color = Color::Rgb(0x94, 0x9e, 0xad);
    /// Disabled rows.
    pub const DISABLED: Color = Color::Rgb(0x5a, 0x62, 0x6e);
}

pub const STATUS_HEIGHT: u16 = 1;
/// Inner horizontal margin (chars each side).
pub const MARGIN_X: u16 = 1;
pub const PALETTE_MAX_WIDTH: u16 = 72;
pub const PALETTE_MAX_HEIGHT: u16 = 18;
pub const SPINNER: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
