//! Header Component
//!
//! Displays the view tabs, fleet totals, and key hints.

use crate::app::{App, View};
use crate::VERSION;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const TABS: [(char, &str, View); 5] = [
    ('1', "Dashboard", View::Dashboard),
    ('2', "Resources", View::Resources),
    ('3', "Catalog", View::Catalog),
    ('c', "Create", View::Create),
    ('p', "Profile", View::Profile),
];

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" azurelite v{} ", VERSION),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    // Row 1: View tabs and totals
    let active = match app.view {
        View::Detail(_) => View::Resources,
        ref view => view.clone(),
    };
    let mut tabs: Vec<Span> = TABS
        .iter()
        .map(|(key, label, view)| {
            let style = if *view == active {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Span::styled(format!(" {}:{} ", key, label), style)
        })
        .collect();
    tabs.insert(0, Span::raw(" "));
    tabs.push(Span::styled(
        format!("   Resources: {}", app.directory.len()),
        Style::default().fg(Color::White),
    ));
    let in_flight = app.operations.in_flight_count();
    if in_flight > 0 {
        tabs.push(Span::styled(
            format!("  Operations: {}", in_flight),
            Style::default().fg(Color::Yellow),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(tabs)), rows[0]);

    // Row 2: Help hint
    let help_line = Line::from(vec![
        Span::styled(
            " ?:help  ::cmd  n:notifications  q:quit",
            Style::default().fg(Color::DarkGray),
        ),
        if app.readonly {
            Span::styled(
                "  [READ-ONLY]",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::raw("")
        },
    ]);
    f.render_widget(Paragraph::new(help_line), rows[1]);
}
