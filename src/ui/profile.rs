//! Profile Page
//!
//! Profile details on the left, preferences on the right. Each side saves on
//! its own with Enter.

use crate::app::{App, ProfileField};
use crate::profile::profile_field;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn label_style(focused: bool) -> Style {
    if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn section(title: &str, active: bool) -> Block<'static> {
    let color = if active { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
}

fn checkbox(on: bool) -> &'static str {
    if on {
        "[x]"
    } else {
        "[ ]"
    }
}

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let state = &app.profile_form;
    let profile = &app.config.profile;

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    // Profile details
    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!(" {} ", profile.initials()),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", profile.full_name),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
    ];

    let text_fields = [
        (
            ProfileField::FullName,
            "Full name",
            &state.details.full_name,
            profile_field::FULL_NAME,
        ),
        (ProfileField::Bio, "Bio", &state.details.bio, profile_field::BIO),
    ];
    for (field, label, value, key) in text_fields {
        let focused = state.focused == field;
        let cursor = if focused { "_" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(format!(" {:<11}", label), label_style(focused)),
            Span::styled(format!("{}{}", value, cursor), Style::default().fg(Color::White)),
        ]));
        if let Some(message) = state.errors.for_field(key) {
            lines.push(Line::from(Span::styled(
                format!(" {:<11}{}", "", message),
                Style::default().fg(Color::Red),
            )));
        }
    }
    lines.push(Line::from(vec![
        Span::styled(format!(" {:<11}", "Email"), label_style(false)),
        Span::styled(profile.email.as_str(), Style::default().fg(Color::Gray)),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Enter: save profile",
        Style::default().fg(Color::DarkGray),
    )));

    let details_active = state.focused.is_text();
    let details = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(section("Profile", details_active));
    f.render_widget(details, columns[0]);

    // Preferences
    let prefs = &state.preferences;
    let rows = [
        (ProfileField::Theme, "Theme", format!("< {} >", prefs.theme.as_str())),
        (
            ProfileField::EmailMarketing,
            "Marketing emails",
            checkbox(prefs.email_marketing).to_string(),
        ),
        (
            ProfileField::EmailActivity,
            "Activity emails",
            checkbox(prefs.email_activity).to_string(),
        ),
        (
            ProfileField::PushUpdates,
            "Push updates",
            checkbox(prefs.push_updates).to_string(),
        ),
    ];

    let mut lines = vec![Line::from("")];
    for (field, label, value) in rows {
        let focused = state.focused == field;
        let marker = if focused { " > " } else { "   " };
        lines.push(Line::from(vec![
            Span::styled(marker, label_style(focused)),
            Span::styled(format!("{:<18}", label), label_style(focused)),
            Span::styled(value, Style::default().fg(Color::White)),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " ←/→ or Space: change  Enter: save preferences",
        Style::default().fg(Color::DarkGray),
    )));

    let preferences = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(section("Preferences", !details_active));
    f.render_widget(preferences, columns[1]);
}
