//! Help Overlay
//!
//! Shows keyboard shortcuts and help information.

use super::centered_rect;
use crate::app::App;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Views",
        &[
            ("1 / 2 / 3", "Dashboard / Resources / Catalog"),
            ("c", "Create a virtual machine"),
            ("p", "Profile and preferences"),
            ("Enter", "Open the selected resource or service"),
            ("Esc/b", "Back to the resource list"),
        ],
    ),
    (
        "Resource list",
        &[
            ("j/k, ↑/↓", "Move up/down"),
            ("gg / G", "First / last row of the page"),
            ("[ / ]", "Previous / next page"),
            ("/", "Search name, type, and region"),
        ],
    ),
    (
        "Actions",
        &[
            ("s", "Start"),
            ("S", "Stop"),
            ("r", "Restart"),
            ("x / Del", "Delete (asks for confirmation)"),
            ("e", "Edit settings (detail page)"),
            ("Tab", "Overview / monitoring (detail page)"),
        ],
    ),
    (
        "General",
        &[
            (":", "Command mode (detail <id>, page <n>, ...)"),
            ("n", "Notification history"),
            ("?/Esc", "Close help"),
            ("q", "Quit application"),
        ],
    ),
];

pub fn render(f: &mut Frame, _app: &App) {
    let popup_area = centered_rect(70, 80, f.area());
    f.render_widget(Clear, popup_area);

    let mut help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for (title, keys) in SECTIONS {
        help_text.push(Line::from(Span::styled(
            *title,
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for (key, description) in keys.iter() {
            let key_style = if key.starts_with('x') {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::Yellow)
            };
            help_text.push(Line::from(vec![
                Span::styled(format!("  {:<12}", key), key_style),
                Span::raw(*description),
            ]));
        }
        help_text.push(Line::from(""));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Help ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left);

    f.render_widget(paragraph, popup_area);
}
