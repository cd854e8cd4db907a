//! Resource Detail
//!
//! Overview of one resource, its action buttons, and its description. A
//! second tab shows sample monitoring charts.

use super::status_span;
use crate::app::{App, DetailTab};
use crate::lifecycle::{enabled_actions, Action};
use crate::resource::metrics::{format_rate, UsageSeries};
use crate::resource::{Metrics, Resource};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Sparkline, Wrap},
    Frame,
};

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let Some(resource) = app.detail_resource() else {
        let msg = Paragraph::new("Resource not found")
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center);
        f.render_widget(msg, area);
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            format!(" {} ", resource.name),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Status
            Constraint::Length(1), // Actions
            Constraint::Length(1), // Tabs
            Constraint::Min(4),    // Panel
        ])
        .split(inner);

    let mut status_line = vec![
        Span::styled(" Status: ", Style::default().fg(Color::DarkGray)),
        status_span(&resource.status),
    ];
    if let Some(kind) = app.operations.in_flight_kind(&resource.id) {
        status_line.push(Span::styled(
            format!("  ({} in progress)", kind.as_str()),
            Style::default().fg(Color::Yellow),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(status_line)), chunks[0]);

    let busy = app.operations.is_in_flight(&resource.id);
    let mut buttons = vec![Span::styled(" Actions:", Style::default().fg(Color::DarkGray))];
    for (action, enabled) in enabled_actions(&resource.status) {
        let usable = !app.readonly && enabled && (action == Action::Delete || !busy);
        let style = match (usable, action) {
            (false, _) => Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT),
            (true, Action::Delete) => Style::default().fg(Color::Red),
            (true, _) => Style::default().fg(Color::White),
        };
        buttons.push(Span::styled(
            format!(" [{}]{} ", action.shortcut(), action.display_name()),
            style,
        ));
    }
    buttons.push(Span::styled(" [e]Settings", Style::default().fg(Color::White)));
    f.render_widget(Paragraph::new(Line::from(buttons)), chunks[1]);

    let tabs: Vec<Span> = [(DetailTab::Overview, "Overview"), (DetailTab::Monitoring, "Monitoring")]
        .into_iter()
        .map(|(tab, label)| {
            let style = if app.detail_tab == tab {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Span::styled(format!(" {} ", label), style)
        })
        .collect();
    let mut tab_line = vec![Span::raw(" ")];
    tab_line.extend(tabs);
    tab_line.push(Span::styled("  (Tab to switch)", Style::default().fg(Color::DarkGray)));
    f.render_widget(Paragraph::new(Line::from(tab_line)), chunks[2]);

    match app.detail_tab {
        DetailTab::Overview => render_overview(f, resource, chunks[3]),
        DetailTab::Monitoring => render_monitoring(f, resource, chunks[3]),
    }
}

fn render_overview(f: &mut Frame, resource: &Resource, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(2)])
        .split(area);

    let overview: Vec<Line> = resource
        .overview()
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!(" {:<18}", label), Style::default().fg(Color::DarkGray)),
                Span::styled(value, Style::default().fg(Color::White)),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(overview), chunks[0]);

    let description = Paragraph::new(resource.effective_description())
        .style(Style::default().fg(Color::Gray))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(Span::styled(" Description ", Style::default().fg(Color::DarkGray))),
        );
    f.render_widget(description, chunks[1]);
}

fn usage_sparkline(series: &UsageSeries, color: Color) -> Sparkline<'static> {
    Sparkline::default()
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(Span::styled(
                    format!(
                        " {}  latest {}  peak {} ",
                        series.label,
                        series.latest(),
                        series.peak()
                    ),
                    Style::default().fg(color),
                )),
        )
        .data(series.values.clone())
        .max(100)
        .style(Style::default().fg(color))
}

fn render_monitoring(f: &mut Frame, resource: &Resource, area: Rect) {
    let Some(metrics) = Metrics::for_status(&resource.status) else {
        let msg = Paragraph::new(format!(
            "No metrics while the resource is {}",
            resource.status.label()
        ))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
        f.render_widget(msg, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Percentage(30), // CPU
            Constraint::Percentage(30), // Memory
            Constraint::Min(6),         // Network
        ])
        .split(area);

    let range = Paragraph::new(Span::styled(
        format!(" Sample window {}", metrics.time_range()),
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(range, chunks[0]);

    f.render_widget(usage_sparkline(&metrics.cpu, Color::Magenta), chunks[1]);
    f.render_widget(usage_sparkline(&metrics.memory, Color::Green), chunks[2]);

    let received_style = Style::default().fg(Color::Magenta);
    let sent_style = Style::default().fg(Color::Green);
    let mut chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(Line::from(vec![
                    Span::styled(" Network I/O (MB/s)  ", Style::default().fg(Color::White)),
                    Span::styled("received ", received_style),
                    Span::styled("sent ", sent_style),
                ])),
        )
        .bar_width(3)
        .bar_gap(0)
        .group_gap(2);
    for point in &metrics.network {
        let bars = [
            Bar::default()
                .value(point.received)
                .text_value(format_rate(point.received))
                .style(received_style),
            Bar::default()
                .value(point.sent)
                .text_value(format_rate(point.sent))
                .style(sent_style),
        ];
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(point.time))
                .bars(&bars),
        );
    }
    f.render_widget(chart, chunks[3]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::lifecycle::SimulatedBackend;
    use crate::resource::{sample_resources, Directory};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn screen_for(id: &str, tab: DetailTab) -> String {
        let directory = Directory::new(sample_resources().unwrap(), 5).unwrap();
        let mut app = App::new(
            Config::default(),
            directory,
            Arc::new(SimulatedBackend::default()),
            false,
        );
        app.open_detail(Some(id));
        app.detail_tab = tab;

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                render(f, &app, area);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_monitoring_tab_for_running_resource() {
        let screen = screen_for("vm-001", DetailTab::Monitoring);
        assert!(screen.contains("CPU Usage (%)  latest 35  peak 35"));
        assert!(screen.contains("Network I/O (MB/s)"));
        assert!(!screen.contains("Operating System"));
    }

    #[test]
    fn test_monitoring_tab_for_stopped_resource() {
        let screen = screen_for("vm-dev-test", DetailTab::Monitoring);
        assert!(screen.contains("No metrics while the resource is Stopped"));
    }

    #[test]
    fn test_overview_tab() {
        let screen = screen_for("vm-001", DetailTab::Overview);
        assert!(screen.contains("Operating System"));
        assert!(!screen.contains("Network I/O"));
    }
}
