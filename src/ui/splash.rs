//! Splash Screen
//!
//! Shown while configuration and the resource inventory load.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

const LOGO: [&str; 5] = [
    "   __ _ _____   _ _ __ ___| (_) |_ ___ ",
    "  / _` |_  / | | | '__/ _ \\ | | __/ _ \\",
    " | (_| |/ /| |_| | | |  __/ | | ||  __/",
    "  \\__,_/___|\\__,_|_|  \\___|_|_|\\__\\___|",
    "",
];

pub struct SplashState {
    message: String,
    completed_steps: usize,
    total_steps: usize,
}

impl SplashState {
    pub fn new(total_steps: usize) -> Self {
        Self {
            message: "Starting...".to_string(),
            completed_steps: 0,
            total_steps: total_steps.max(1),
        }
    }

    pub fn set_message(&mut self, message: &str) {
        self.message = message.to_string();
    }

    pub fn complete_step(&mut self) {
        self.completed_steps = (self.completed_steps + 1).min(self.total_steps);
    }

    fn percent(&self) -> u16 {
        (self.completed_steps * 100 / self.total_steps) as u16
    }
}

pub fn render(f: &mut Frame, state: &SplashState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Length(10),
            Constraint::Percentage(35),
        ])
        .split(f.area());

    let center = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(chunks[1])[1];

    let mut logo: Vec<Line> = LOGO
        .iter()
        .map(|row| Line::from(Span::styled(*row, Style::default().fg(Color::Cyan))))
        .collect();
    logo.push(Line::from(Span::styled(
        "Simulated cloud resource console",
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )));

    let logo_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = logo_block.inner(center);
    f.render_widget(logo_block, center);

    let inner_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    f.render_widget(
        Paragraph::new(logo).alignment(Alignment::Center),
        inner_chunks[0],
    );

    let progress = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan))
        .percent(state.percent())
        .label(Span::styled(
            state.message.as_str(),
            Style::default().fg(Color::White),
        ));
    f.render_widget(progress, inner_chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_is_capped() {
        let mut state = SplashState::new(2);
        assert_eq!(state.percent(), 0);
        state.complete_step();
        assert_eq!(state.percent(), 50);
        state.complete_step();
        state.complete_step();
        assert_eq!(state.percent(), 100);
    }

    #[test]
    fn test_zero_steps_does_not_divide_by_zero() {
        let state = SplashState::new(0);
        assert_eq!(state.percent(), 0);
    }
}
