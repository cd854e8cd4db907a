//! Command Box
//!
//! `:` prompt with ghost-text completion and a suggestion list.

use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

const MAX_SUGGESTIONS: usize = 8;

/// Input line: typed text in white, the rest of the preview in gray.
fn input_line(app: &App) -> Line<'_> {
    let mut spans = vec![
        Span::styled(":", Style::default().fg(Color::Cyan)),
        Span::styled(app.command_text.as_str(), Style::default().fg(Color::White)),
    ];
    if let Some(rest) = app
        .command_preview
        .as_deref()
        .and_then(|preview| preview.strip_prefix(app.command_text.as_str()))
    {
        spans.push(Span::styled(rest, Style::default().fg(Color::DarkGray)));
    }
    Line::from(spans)
}

pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(MAX_SUGGESTIONS as u16 + 5),
        ])
        .split(f.area());

    let command_area = chunks[1];
    f.render_widget(Clear, command_area);

    let inner_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(command_area);

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Command ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
    f.render_widget(
        Paragraph::new(input_line(app)).block(input_block),
        inner_chunks[0],
    );

    let suggestions_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " ↑/↓ select  Tab complete  Enter run  Esc cancel ",
            Style::default().fg(Color::DarkGray),
        ));

    let suggestions: Vec<ListItem> = app
        .command_suggestions
        .iter()
        .enumerate()
        .take(MAX_SUGGESTIONS)
        .map(|(i, cmd)| {
            let style = if i == app.command_suggestion_selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Span::styled(format!("  {}", cmd), style))
        })
        .collect();

    f.render_widget(
        List::new(suggestions).block(suggestions_block),
        inner_chunks[1],
    );
}
