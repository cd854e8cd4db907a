//! Notifications Panel UI
//!
//! History of lifecycle operations, newest first.

use super::{centered_rect, truncate_string};
use crate::app::App;
use crate::notification::NotificationStatus;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame,
};

fn status_color(status: &NotificationStatus) -> Color {
    match status {
        NotificationStatus::InProgress => Color::Yellow,
        NotificationStatus::Success => Color::Green,
        NotificationStatus::Error(_) => Color::Red,
        NotificationStatus::Cancelled => Color::Cyan,
    }
}

pub fn render(f: &mut Frame, app: &App) {
    let popup_area = centered_rect(80, 70, f.area());
    f.render_widget(Clear, popup_area);

    let in_progress = app.notification_manager.in_progress_count();
    let title = if in_progress > 0 {
        format!(" Notifications [{} in progress] ", in_progress)
    } else {
        " Notifications ".to_string()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let help = Line::from(vec![
        Span::styled("j/k", Style::default().fg(Color::Yellow)),
        Span::raw(": navigate  "),
        Span::styled("c", Style::default().fg(Color::Yellow)),
        Span::raw(": clear all  "),
        Span::styled("n/Esc", Style::default().fg(Color::Yellow)),
        Span::raw(": close"),
    ]);
    f.render_widget(Paragraph::new(help).alignment(Alignment::Center), chunks[1]);

    if !app.notification_manager.has_notifications() {
        let msg = Paragraph::new("No notifications yet")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(msg, chunks[0]);
        return;
    }

    let header = Row::new(
        [" ", " ACTION", " RESOURCE", " TYPE", " DURATION", " AGO"]
            .iter()
            .map(|h| {
                Cell::from(*h).style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
            }),
    );

    let rows = app.notification_manager.notifications.iter().map(|notif| {
        let color = status_color(&notif.status);
        let resource = match &notif.status {
            NotificationStatus::Error(err) => format!("{} ({})", notif.resource_name, err),
            _ => notif.resource_name.clone(),
        };
        Row::new(vec![
            Cell::from(format!(" {}", notif.status.icon())).style(Style::default().fg(color)),
            Cell::from(format!(" {}", notif.operation_type.display_name())),
            Cell::from(format!(" {}", truncate_string(&resource, 40))),
            Cell::from(format!(" {}", notif.resource_type))
                .style(Style::default().fg(Color::DarkGray)),
            Cell::from(format!(" {}", notif.duration_display())),
            Cell::from(format!(" {}", format_time_ago(notif.created_at.elapsed()))),
        ])
    });

    let widths = [
        Constraint::Length(3),
        Constraint::Length(10),
        Constraint::Min(20),
        Constraint::Length(20),
        Constraint::Length(10),
        Constraint::Length(9),
    ];

    let table = Table::new(rows, widths).header(header).row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = TableState::default();
    state.select(Some(app.notifications_selected));
    f.render_stateful_widget(table, chunks[0], &mut state);
}

fn format_time_ago(elapsed: std::time::Duration) -> String {
    let secs = elapsed.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else {
        format!("{}h", secs / 3600)
    }
}
