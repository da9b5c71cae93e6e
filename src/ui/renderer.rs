//! Single-panel render: executed history, status, optional palette overlay.

use ratatui::Frame;

use crate::app::App;
use crate::ui::layout;
use crate::ui::theme::SPINNER;
use crate::ui::widgets::{render_history, render_palette, render_status};

pub fn render(f: &mut Frame, app: &App, tick: usize) {
    let area = f.area();
    let regions = layout::compute(area);

    let spinner_char = SPINNER[tick % SPINNER.len()];

    render_history(f, &app.executed, regions.main);
    render_status(
        f,
        regions.status,
        app.palette.is_open(),
        app.is_ranking(),
        spinner_char,
    );

    if app.palette.is_open() {
        let palette_area = layout::palette_overlay_rect(regions.main);
        render_palette(f, &app.palette, &app.config, palette_area);
    }
}
