//! Command palette overlay: query line, section headings, accent bar on the
//! active row, dimmed disabled rows, right-aligned shortcut hints.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::config::PaletteConfig;
use crate::controller::Palette;
use crate::state::Command;
use crate::ui::theme::colors;

const ACTIVE_BAR: &str = "▎ ";
const INACTIVE_BAR: &str = "  ";

pub fn render(f: &mut Frame, palette: &Palette, config: &PaletteConfig, area: Rect) {
    let (Some(visible), Some(catalogue)) = (palette.visible(), palette.catalogue()) else {
        return;
    };
    f.render_widget(Clear, area);
    let block = Block::default()
        .title("  Commands  ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(colors::BORDER))
        .style(Style::default().bg(colors::ELEVATED));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);
    super::input::render(f, palette.query(), &config.placeholder_text, chunks[0]);

    let list_block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(colors::BORDER));
    let list_area = list_block.inner(chunks[1]);
    f.render_widget(list_block, chunks[1]);

    if visible.is_empty() {
        let para = Paragraph::new(Span::styled(
            config.empty_state_text.as_str(),
            Style::default().fg(colors::MUTED),
        ))
        .alignment(Alignment::Center);
        f.render_widget(para, list_area);
        return;
    }

    let width = list_area.width as usize;
    let active = palette.active_index();
    let mut lines: Vec<Line> = Vec::with_capacity(visible.len() + visible.sections().len());
    let mut active_line = 0;
    for section in visible.sections() {
        if let Some(heading) = section.heading {
            lines.push(Line::from(Span::styled(
                format!(" {}", heading.label(catalogue)),
                Style::default().fg(colors::MUTED).add_modifier(Modifier::BOLD),
            )));
        }
        for pos in section.range.clone() {
            let Some(cmd) = visible.get(pos).and_then(|i| catalogue.command(i)) else {
                continue;
            };
            let selected = active == Some(pos);
            if selected {
                active_line = lines.len();
            }
            lines.push(row(cmd, selected, config.show_shortcut_hints, width));
        }
    }

    let height = list_area.height as usize;
    let offset = (active_line + 1).saturating_sub(height);
    let lines: Vec<Line> = lines.into_iter().skip(offset).take(height).collect();
    f.render_widget(Paragraph::new(lines), list_area);
}

fn row(cmd: &Command, selected: bool, show_hint: bool, width: usize) -> Line<'_> {
    let label_style = if cmd.disabled {
        Style::default().fg(colors::DISABLED)
    } else if selected {
        Style::default().fg(colors::TEXT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(colors::TEXT_DIM)
    };
    let desc_style = Style::default().fg(if cmd.disabled {
        colors::DISABLED
    } else if selected {
        colors::TEXT_DIM
    } else {
        colors::MUTED
    });

    let mut spans = vec![
        Span::styled(
            if selected { ACTIVE_BAR } else { INACTIVE_BAR },
            Style::default().fg(colors::ACCENT),
        ),
        Span::styled(cmd.label.as_str(), label_style),
    ];
    let mut used = INACTIVE_BAR.chars().count() + cmd.label.chars().count();
    if let Some(desc) = cmd.description.as_deref() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(desc, desc_style));
        used += 2 + desc.chars().count();
    }
    if let Some(hint) = cmd.shortcut_hint().filter(|_| show_hint) {
        let hint_len = hint.chars().count() + 1;
        if used + hint_len < width {
            spans.push(Span::raw(" ".repeat(width - used - hint_len)));
            spans.push(Span::styled(hint, Style::default().fg(colors::MUTED)));
            spans.push(Span::raw(" "));
        }
    }

    let line = Line::from(spans);
    if selected {
        line.style(Style::default().bg(colors::ACCENT_GLOW))
    } else {
        line
    }
}
