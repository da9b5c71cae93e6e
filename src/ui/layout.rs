//! Main area + status bar, and the floating palette rect.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use super::theme::{MARGIN_X, PALETTE_MAX_HEIGHT, PALETTE_MAX_WIDTH, STATUS_HEIGHT};

#[derive(Clone, Debug)]
pub struct LayoutRegions {
    pub main: Rect,
    pub status: Rect,
}

pub fn compute(area: Rect) -> LayoutRegions {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(STATUS_HEIGHT)])
        .split(area);
    let main = Rect {
        x: area.x + MARGIN_X,
        y: chunks[0].y,
        width: area.width.saturating_sub(2 * MARGIN_X),
        height: chunks[0].height,
    };
    LayoutRegions {
        main,
        status: chunks[1],
    }
}

/// Horizontally centred, a sixth of the way down, clamped to the area.
pub fn palette_overlay_rect(area: Rect) -> Rect {
    let width = area.width.saturating_sub(4).min(PALETTE_MAX_WIDTH);
    let height = area.height.saturating_sub(2).min(PALETTE_MAX_HEIGHT);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let top_gap = (area.height / 6).min(area.height.saturating_sub(height));
    Rect {
        x,
        y: area.y + top_gap,
        width,
        height,
    }
}
