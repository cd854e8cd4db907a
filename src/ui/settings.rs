//! Settings Overlay
//!
//! Edits name, tags, and description of the resource on the detail page.

use super::centered_rect;
use crate::app::{App, SettingsField};
use crate::resource::form::settings_field;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame, app: &App) {
    let Some(state) = &app.settings else {
        return;
    };

    let popup_area = centered_rect(60, 50, f.area());
    f.render_widget(Clear, popup_area);

    let fields = [
        (SettingsField::Name, "Name", &state.form.name, settings_field::NAME),
        (SettingsField::Tags, "Tags", &state.form.tags, settings_field::TAGS),
        (
            SettingsField::Description,
            "Description",
            &state.form.description,
            settings_field::DESCRIPTION,
        ),
    ];

    let mut lines = vec![Line::from("")];
    for (field, label, value, key) in fields {
        let focused = state.focused == field;
        let label_style = if focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let cursor = if focused { "_" } else { "" };

        lines.push(Line::from(vec![
            Span::styled(format!(" {:<13}", label), label_style),
            Span::styled(format!("{}{}", value, cursor), Style::default().fg(Color::White)),
        ]));
        if let Some(message) = state.errors.for_field(key) {
            lines.push(Line::from(Span::styled(
                format!(" {:<13}{}", "", message),
                Style::default().fg(Color::Red),
            )));
        }
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        " Tags use key=value, key2=value2",
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(Span::styled(
        " Tab: next field | Enter: save | Esc: cancel",
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Resource Settings ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(block);
    f.render_widget(paragraph, popup_area);
}
