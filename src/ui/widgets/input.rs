//! Query line: prompt, typed text or placeholder, and the cursor.

use ratatui::{
    layout::Position,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::ui::theme::colors;

const PROMPT: &str = " › ";

pub fn render(f: &mut Frame, query: &str, placeholder: &str, area: ratatui::prelude::Rect) {
    let prompt = Span::styled(
        PROMPT,
        Style::default().fg(colors::ACCENT).add_modifier(Modifier::BOLD),
    );
    let body = if query.is_empty() {
        Span::styled(placeholder, Style::default().fg(colors::MUTED))
    } else {
        Span::styled(query, Style::default().fg(colors::TEXT))
    };
    f.render_widget(Paragraph::new(Line::from(vec![prompt, body])), area);

    let prompt_width = PROMPT.chars().count() as u16;
    let cursor_x = area.x + prompt_width + query.chars().count() as u16;
    let x = cursor_x.min(area.x + area.width.saturating_sub(1));
    f.set_cursor_position(Position { x, y: area.y });
}
