// ABOUTME: Modal for create/rename forms with inline validation and server errors

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::help::centered_rect;
use crate::app::{AppState, FormKind, FormState};

pub struct FormModalComponent;

impl FormModalComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let Some(form) = &state.form else {
            return;
        };
        let popup_area = centered_rect(60, 70, area);
        frame.render_widget(Clear, popup_area);

        let mut lines = Vec::new();
        for (index, field) in form.fields.iter().enumerate() {
            let focused = index == form.focused;
            let label_style = if focused {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let value = if field.secret {
                "•".repeat(field.value.chars().count())
            } else {
                field.value.clone()
            };
            let cursor = if focused { "_" } else { "" };
            lines.push(Line::from(Span::styled(field.label, label_style)));
            lines.push(Line::from(format!("  {value}{cursor}")));
        }

        lines.push(Line::from(""));
        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
        }
        if form.submitting {
            lines.push(Line::from(Span::styled(
                "Submitting...",
                Style::default().fg(Color::Cyan),
            )));
        }
        lines.push(Line::from(Span::styled(
            footer(form, state),
            Style::default().fg(Color::DarkGray),
        )));

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(format!(" {} ", form.title()))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, popup_area);
    }
}

fn footer(form: &FormState, state: &AppState) -> String {
    let mut text = "Tab next · Enter submit · Esc cancel".to_string();
    if form.kind == FormKind::NewRoute {
        if let Some(picked) = form.picked.and_then(|i| state.hosted_containers.get(i)) {
            text.push_str(&format!(" · Ctrl+P pick ({})", picked.label()));
        } else {
            text.push_str(" · Ctrl+P pick container");
        }
    }
    text
}

impl Default for FormModalComponent {
    fn default() -> Self {
        Self::new()
    }
}
