//! Keybindings. Palette open: Up/Down (Ctrl+P/Ctrl+N, Tab/Shift+Tab) move,
//! Enter confirms, Esc cancels, Backspace and Ctrl+U edit the query, printable
//! characters extend it. Palette closed: Ctrl+K or `/` opens, `q` / Ctrl+C quit.
//! Anything else maps to `None` and is left to the host.

use crate::actions::Action;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

pub const TICK_RATE: Duration = Duration::from_millis(80);

pub fn key_to_action(event: &KeyEvent, palette_open: bool) -> Option<Action> {
    // Accept Press and Repeat (hold key); ignore Release so we don't double-handle.
    if event.kind == KeyEventKind::Release {
        return None;
    }
    let (code, mods) = (event.code, event.modifiers);
    let ctrl = mods.contains(KeyModifiers::CONTROL);

    if !palette_open {
        return match code {
            KeyCode::Char('k') if ctrl => Some(Action::PaletteShow),
            KeyCode::Char('/') if mods.is_empty() => Some(Action::PaletteShow),
            KeyCode::Char('c') if ctrl => Some(Action::Quit),
            KeyCode::Char('q') if mods.is_empty() => Some(Action::Quit),
            _ => None,
        };
    }

    match code {
        KeyCode::Esc => Some(Action::PaletteHide),
        KeyCode::Enter => Some(Action::PaletteSelect),
        KeyCode::Up | KeyCode::BackTab => Some(Action::PaletteUp),
        KeyCode::Down | KeyCode::Tab => Some(Action::PaletteDown),
        KeyCode::Char('p') if ctrl => Some(Action::PaletteUp),
        KeyCode::Char('n') if ctrl => Some(Action::PaletteDown),
        KeyCode::Char('u') if ctrl => Some(Action::ClearQuery),
        KeyCode::Char('c') if ctrl => Some(Action::PaletteHide),
        KeyCode::Backspace => Some(Action::Backspace),
        // Allow Alt for accented chars; only block Ctrl/Cmd.
        KeyCode::Char(c) if !ctrl && !mods.contains(KeyModifiers::SUPER) => Some(Action::Char(c)),
        _ => None,
    }
}
