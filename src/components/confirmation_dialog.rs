// ABOUTME: Yes/No dialog guarding destructive actions

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::help::centered_rect;
use crate::app::AppState;

pub struct ConfirmationDialogComponent;

impl ConfirmationDialogComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let Some(dialog) = &state.confirmation_dialog else {
            return;
        };
        let popup_area = centered_rect(50, 25, area);
        frame.render_widget(Clear, popup_area);

        let selected = Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let idle = Style::default().fg(Color::White);
        let (yes, no) = if dialog.selected_option {
            (selected, idle)
        } else {
            (idle, selected)
        };

        let text = vec![
            Line::from(dialog.message.clone()),
            Line::from(""),
            Line::from(vec![
                Span::styled(" Yes ", yes),
                Span::raw("   "),
                Span::styled(" No ", no),
            ]),
        ];

        let paragraph = Paragraph::new(text)
            .block(
                Block::default()
                    .title(format!(" {} ", dialog.title))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }
}

impl Default for ConfirmationDialogComponent {
    fn default() -> Self {
        Self::new()
    }
}
