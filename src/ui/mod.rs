//! Terminal User Interface rendering module
//!
//! This module handles all UI rendering for azurelite using the ratatui
//! framework. Every view reads the canonical status classification from
//! [`crate::lifecycle`], so a status looks the same wherever it appears.
//!
//! # Architecture
//!
//! - [`splash`] - Startup splash screen
//! - `header` - Header bar with view tabs and fleet totals
//! - `dashboard` - Status summary and recent resources
//! - `resources` - Paginated, searchable resource table
//! - `detail` - Overview, monitoring, and actions of one resource
//! - `create` - Create-resource form
//! - `catalog` - Searchable service catalog
//! - `profile` - Profile details and preferences
//! - `settings` - Settings form overlay
//! - `help` - Help overlay showing keybindings
//! - `dialog` - Confirmation dialogs for destructive operations
//! - `command_box` - Command mode input (`:` key)
//! - `notifications` - Notification history panel

mod catalog;
mod command_box;
mod create;
mod dashboard;
mod detail;
mod dialog;
mod header;
mod help;
mod notifications;
mod profile;
mod resources;
mod settings;
pub mod splash;

use crate::app::{App, Mode, View};
use crate::lifecycle::{Category, Status};
use crate::notification::NotificationStatus;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn render(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Min(1),    // Current view
            Constraint::Length(1), // Footer/crumb
        ])
        .split(f.area());

    header::render(f, app, chunks[0]);

    match app.view {
        View::Dashboard => dashboard::render(f, app, chunks[1]),
        View::Resources => resources::render(f, app, chunks[1]),
        View::Detail(_) => detail::render(f, app, chunks[1]),
        View::Create => create::render(f, app, chunks[1]),
        View::Catalog => catalog::render(f, app, chunks[1]),
        View::Profile => profile::render(f, app, chunks[1]),
    }

    render_crumb(f, app, chunks[2]);

    // Overlays
    match app.mode {
        Mode::Help => help::render(f, app),
        Mode::Confirm | Mode::Warning => dialog::render(f, app),
        Mode::Command => command_box::render(f, app),
        Mode::Notifications => notifications::render(f, app),
        Mode::Settings => settings::render(f, app),
        Mode::Normal => {},
    }
}

/// Color for a status category
pub(crate) fn category_color(category: Category) -> Color {
    match category {
        Category::Healthy => Color::Green,
        Category::Stopped => Color::Gray,
        Category::InProgress => Color::Yellow,
        Category::Attention => Color::Red,
        Category::Unknown => Color::Magenta,
    }
}

pub(crate) fn status_style(category: Category) -> Style {
    Style::default().fg(category_color(category))
}

/// Status label with its category color; transitional states get a marker
pub(crate) fn status_span(status: &Status) -> Span<'static> {
    let display = status.display();
    let text = if status.is_transitional() {
        format!("{} ↻", display.label)
    } else {
        display.label
    };
    Span::styled(text, status_style(display.category))
}

/// Truncate string for display (Unicode-safe)
pub(crate) fn truncate_string(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count > max_len {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}

pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn view_hint(app: &App) -> &'static str {
    match app.view {
        View::Dashboard => "Enter:resources  c:create  3:catalog",
        View::Resources if app.filter_active => "Type to filter | Enter: apply | Esc: clear",
        View::Resources => "Enter:details  /:filter  [/]:page  s:start S:stop r:restart x:delete",
        View::Detail(_) => "s:start S:stop r:restart x:delete  e:settings  Tab:panel  Esc:back",
        View::Create => "Tab/↑↓:field  ←/→:choose  Space:toggle  Enter:submit  Esc:cancel",
        View::Catalog if app.catalog_search_active => "Type to search | Enter/Esc: done",
        View::Catalog => "/:search  Enter:create  Esc:back",
        View::Profile => "Tab/↑↓:field  ←/→/Space:change  Enter:save section  Esc:back",
    }
}

fn render_crumb(f: &mut Frame, app: &App, area: Rect) {
    let crumb_display = app.get_breadcrumb().join(" > ");

    // Check for toast notification
    let toast = app.notification_manager.current_toast();
    let toast_text =
        toast.map(|notif| notif.toast_message(app.notification_manager.detail_level));

    // Build notification indicator
    let notification_indicator = {
        let in_progress = app.notification_manager.in_progress_count();
        if in_progress > 0 {
            format!(" [↻{}]", in_progress)
        } else if app.notification_manager.has_notifications() {
            " [n]".to_string()
        } else {
            String::new()
        }
    };

    let status_text = if let Some(err) = &app.error_message {
        format!("Error: {}", err)
    } else if let Some(ref toast) = toast_text {
        toast.clone()
    } else {
        view_hint(app).to_string()
    };

    let style = if app.error_message.is_some() {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else if let Some(notif) = toast {
        match &notif.status {
            NotificationStatus::Success => Style::default().fg(Color::Green),
            NotificationStatus::Error(_) => Style::default().fg(Color::Red),
            NotificationStatus::InProgress => Style::default().fg(Color::Yellow),
            NotificationStatus::Cancelled => Style::default().fg(Color::Cyan),
        }
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let indicator_style = if app.notification_manager.in_progress_count() > 0 {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let crumb = Line::from(vec![
        Span::styled(
            format!("<{}>", crumb_display),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        Span::raw(" "),
        Span::styled(status_text, style),
        Span::styled(notification_indicator, indicator_style),
    ]);

    f.render_widget(Paragraph::new(crumb), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("Kubernetes Worker Node 1", 10), "Kuberne...");
    }

    #[test]
    fn test_status_span_marks_transitional() {
        let span = status_span(&Status::Provisioning);
        assert_eq!(span.content, "Provisioning ↻");
        assert_eq!(span.style.fg, Some(Color::Yellow));

        let span = status_span(&Status::parse("banana"));
        assert_eq!(span.content, "Banana");
        assert_eq!(span.style.fg, Some(Color::Magenta));
    }
}
