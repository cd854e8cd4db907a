//! Dashboard
//!
//! Fleet health at a glance: one card per status category, the healthy share,
//! and the most recently created resources.

use super::{category_color, status_span, truncate_string};
use crate::app::App;
use crate::lifecycle::Category;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph},
    Frame,
};

const RECENT_COUNT: usize = 5;

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Category cards
            Constraint::Length(3), // Healthy gauge
            Constraint::Min(3),    // Recent resources
        ])
        .split(area);

    render_cards(f, app, chunks[0]);
    render_health(f, app, chunks[1]);
    render_recent(f, app, chunks[2]);
}

fn render_cards(f: &mut Frame, app: &App, area: Rect) {
    let summary = app.directory.summary();
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 5); 5])
        .split(area);

    for (category, card) in Category::ALL.iter().zip(cards.iter()) {
        let color = category_color(*category);
        let count = summary.get(category).copied().unwrap_or(0);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(Span::styled(
                format!(" {} ", category.as_str()),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
            .title_alignment(Alignment::Center);

        let body = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                count.to_string(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(body, *card);
    }
}

fn render_health(f: &mut Frame, app: &App, area: Rect) {
    let total = app.directory.len();
    let healthy = app
        .directory
        .summary()
        .get(&Category::Healthy)
        .copied()
        .unwrap_or(0);
    let percent = if total == 0 {
        0
    } else {
        (healthy * 100 / total) as u16
    };

    let in_flight = app.operations.in_flight_count();
    let label = if in_flight > 0 {
        format!("{}/{} running | {} operations in progress", healthy, total, in_flight)
    } else {
        format!("{}/{} running", healthy, total)
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(Span::styled(" Health ", Style::default().fg(Color::Cyan))),
        )
        .gauge_style(Style::default().fg(Color::Green))
        .percent(percent)
        .label(Span::styled(label, Style::default().fg(Color::White)));
    f.render_widget(gauge, area);
}

fn render_recent(f: &mut Frame, app: &App, area: Rect) {
    let mut recent: Vec<_> = app.directory.resources().iter().collect();
    recent.sort_by_key(|r| std::cmp::Reverse(r.created_at()));

    let items: Vec<ListItem> = recent
        .into_iter()
        .take(RECENT_COUNT)
        .map(|resource| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!(" {:<34}", truncate_string(&resource.name, 32)),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!("{:<20}", truncate_string(&resource.resource_type, 18)),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{}  ", resource.created_at().format("%Y-%m-%d")),
                    Style::default().fg(Color::DarkGray),
                ),
                status_span(&resource.status),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(
                " Recently Created ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(list, area);
}
