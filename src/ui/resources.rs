//! Resource List
//!
//! One page of the filtered directory as a table, with the search bar above
//! and the page indicator in the title.

use super::{status_span, truncate_string};
use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let show_filter = app.filter_active || !app.directory.search().is_empty();

    if show_filter {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(area);

        render_filter_bar(f, app, chunks[0]);
        render_table(f, app, chunks[1]);
    } else {
        render_table(f, app, area);
    }
}

fn render_filter_bar(f: &mut Frame, app: &App, area: Rect) {
    let cursor_style = if app.filter_active {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let filter_display = if app.filter_active {
        format!("/{}_", app.directory.search())
    } else {
        format!("/{}", app.directory.search())
    };

    let paragraph = Paragraph::new(Line::from(vec![Span::styled(filter_display, cursor_style)]));
    f.render_widget(paragraph, area);
}

fn render_table(f: &mut Frame, app: &App, area: Rect) {
    let directory = &app.directory;
    let count = directory.filtered_count();

    let title = if directory.search().is_empty() {
        format!(
            " Resources[{}] pg.{}/{} ",
            count,
            directory.current_page(),
            directory.total_pages()
        )
    } else {
        format!(
            " Resources[{}/{}] pg.{}/{} ",
            count,
            directory.len(),
            directory.current_page(),
            directory.total_pages()
        )
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let items = directory.current_page_items();
    if items.is_empty() {
        let message = if directory.is_empty() {
            "No resources yet. Press c to create one."
        } else {
            "No resources match the current search."
        };
        let msg = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(msg, inner_area);
        return;
    }

    let header_cells = [" NAME", " TYPE", " REGION", " STATUS", " ID"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = items
        .iter()
        .map(|resource| {
            Row::new(vec![
                Cell::from(format!(" {}", truncate_string(&resource.name, 32))),
                Cell::from(format!(" {}", truncate_string(&resource.resource_type, 20))),
                Cell::from(format!(" {}", resource.region)),
                Cell::from(Line::from(vec![Span::raw(" "), status_span(&resource.status)])),
                Cell::from(format!(" {}", resource.id))
                    .style(Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(30),
        Constraint::Percentage(20),
        Constraint::Percentage(15),
        Constraint::Percentage(15),
        Constraint::Percentage(20),
    ];

    let table = Table::new(rows, widths).header(header).row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = TableState::default();
    state.select(Some(app.list_selected.min(items.len() - 1)));

    f.render_stateful_widget(table, inner_area, &mut state);
}
