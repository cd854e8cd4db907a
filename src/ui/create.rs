//! Create Resource Form
//!
//! One row per field; validation errors render under the row they belong to.

use crate::app::{App, CreateField};
use crate::resource::catalog::get_catalog;
use crate::resource::form::create_field;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn field_label(field: CreateField) -> &'static str {
    match field {
        CreateField::Name => "Resource name",
        CreateField::Region => "Region",
        CreateField::OsImage => "OS image",
        CreateField::VmSize => "VM size",
        CreateField::Storage => "Storage (GB)",
        CreateField::PublicIp => "Public IP",
        CreateField::Submit => "",
    }
}

fn error_key(field: CreateField) -> Option<&'static str> {
    match field {
        CreateField::Name => Some(create_field::NAME),
        CreateField::Region => Some(create_field::REGION),
        CreateField::OsImage => Some(create_field::OS_IMAGE),
        CreateField::VmSize => Some(create_field::VM_SIZE),
        CreateField::Storage => Some(create_field::STORAGE),
        CreateField::PublicIp => Some(create_field::PUBLIC_IP),
        CreateField::Submit => None,
    }
}

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let state = &app.create_form;
    let catalog = get_catalog();

    let choice = |idx: Option<usize>, options: Vec<&str>| -> String {
        match idx.and_then(|i| options.get(i)) {
            Some(value) => format!("< {} >", value),
            None => "< select >".to_string(),
        }
    };

    let mut lines = vec![Line::from("")];
    for field in CreateField::ALL {
        let focused = state.focused == field;

        if field == CreateField::Submit {
            lines.push(Line::from(""));
            let style = if focused {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Green)
            };
            lines.push(Line::from(vec![
                Span::raw("   "),
                Span::styled(" Create Resource ", style),
            ]));
            continue;
        }

        let value = match field {
            CreateField::Name if focused => format!("{}_", state.name),
            CreateField::Name => state.name.clone(),
            CreateField::Region => {
                choice(state.region, catalog.regions.iter().map(String::as_str).collect())
            },
            CreateField::OsImage => {
                choice(state.os_image, catalog.os_images.iter().map(String::as_str).collect())
            },
            CreateField::VmSize => choice(
                state.vm_size,
                catalog.vm_sizes.iter().map(|s| s.name.as_str()).collect(),
            ),
            CreateField::Storage if focused => format!("{}_", state.storage),
            CreateField::Storage => state.storage.clone(),
            CreateField::PublicIp => {
                if state.public_ip { "[x] enabled" } else { "[ ] disabled" }.to_string()
            },
            CreateField::Submit => String::new(),
        };

        let marker = if focused { " > " } else { "   " };
        let label_style = if focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        lines.push(Line::from(vec![
            Span::styled(marker, label_style),
            Span::styled(format!("{:<16}", field_label(field)), label_style),
            Span::styled(value, Style::default().fg(Color::White)),
        ]));

        if let Some(message) = error_key(field).and_then(|key| state.errors.for_field(key)) {
            lines.push(Line::from(Span::styled(
                format!("   {:<16}{}", "", message),
                Style::default().fg(Color::Red),
            )));
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Create Virtual Machine ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    f.render_widget(Paragraph::new(lines).block(block), area);
}
