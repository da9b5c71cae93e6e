//! TUI widgets: executed history, query input, status, command palette.

mod history;
mod input;
mod palette;
mod status;

pub use history::render as render_history;
pub use palette::render as render_palette;
pub use status::render as render_status;
