//! Service Catalog
//!
//! Searchable list of offerings with the highlighted one described below.

use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Search
            Constraint::Min(4),    // Offerings
            Constraint::Length(5), // Description
        ])
        .split(area);

    let search_style = if app.catalog_search_active {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let search = if app.catalog_search_active {
        format!("/{}_", app.catalog_search)
    } else if app.catalog_search.is_empty() {
        "/ to search services".to_string()
    } else {
        format!("/{}", app.catalog_search)
    };
    f.render_widget(Paragraph::new(Span::styled(search, search_style)), chunks[0]);

    let results = app.catalog_results();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" Service Catalog[{}] ", results.len()),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    if results.is_empty() {
        let msg = Paragraph::new(format!("No services match \"{}\"", app.catalog_search.trim()))
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(msg, chunks[1]);
        return;
    }

    let header = Row::new([" SERVICE", " TAGS", " ACTION"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    }));

    let rows: Vec<Row> = results
        .iter()
        .map(|service| {
            Row::new(vec![
                Cell::from(format!(" {}", service.service_name)),
                Cell::from(format!(" {}", service.tags.join(", ")))
                    .style(Style::default().fg(Color::DarkGray)),
                Cell::from(format!(" {}", service.action_text))
                    .style(Style::default().fg(Color::Green)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(30),
        Constraint::Percentage(50),
        Constraint::Percentage(20),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

    let selected = app.catalog_selected.min(results.len() - 1);
    let mut state = TableState::default();
    state.select(Some(selected));
    f.render_stateful_widget(table, chunks[1], &mut state);

    let service = results[selected];
    let description = Paragraph::new(vec![
        Line::from(Span::styled(
            service.service_name.as_str(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(service.description.as_str()),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(description, chunks[2]);
}
