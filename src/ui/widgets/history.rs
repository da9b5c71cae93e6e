//! Executed-commands panel: append-only, newest at the bottom.

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::ui::theme::colors;

pub fn render(f: &mut Frame, executed: &[String], area: ratatui::prelude::Rect) {
    let block = Block::default()
        .title(" Executed ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(colors::BORDER))
        .style(Style::default().bg(colors::BG));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if executed.is_empty() {
        let hint = Span::styled(
            " Press Ctrl+K to open the command palette.",
            Style::default().fg(colors::MUTED),
        );
        f.render_widget(Paragraph::new(hint), inner);
        return;
    }

    let height = inner.height as usize;
    let skip = executed.len().saturating_sub(height);
    let lines: Vec<Line> = executed
        .iter()
        .enumerate()
        .skip(skip)
        .map(|(i, label)| {
            Line::from(vec![
                Span::styled(
                    format!(" {:>3} ", i + 1),
                    Style::default().fg(colors::ACCENT).add_modifier(Modifier::BOLD),
                ),
                Span::styled(label.as_str(), Style::default().fg(colors::TEXT)),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}
