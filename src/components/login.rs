// ABOUTME: Sign-in screen shown until a token is stored

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
};

use super::help::centered_rect;
use crate::app::AppState;

pub struct LoginComponent;

impl LoginComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let popup_area = centered_rect(50, 50, area);
        let login = &state.login;

        let field = |label: &'static str, value: String, focused: bool| {
            let style = if focused {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let cursor = if focused { "_" } else { "" };
            vec![
                Line::from(Span::styled(label, style)),
                Line::from(format!("  {value}{cursor}")),
            ]
        };

        let mut lines = Vec::new();
        lines.extend(field("Username", login.username.clone(), !login.password_focused));
        lines.extend(field(
            "Password",
            "•".repeat(login.password.chars().count()),
            login.password_focused,
        ));
        lines.push(Line::from(""));
        if login.submitting {
            lines.push(Line::from(Span::styled(
                "Signing in...",
                Style::default().fg(Color::Cyan),
            )));
        }
        if let Some(error) = &login.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        }
        lines.push(Line::from(Span::styled(
            "Tab switch · Enter sign in · Esc quit",
            Style::default().fg(Color::DarkGray),
        )));

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .title(" dockdeck - Sign in ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(paragraph, popup_area);
    }
}

impl Default for LoginComponent {
    fn default() -> Self {
        Self::new()
    }
}
