// ABOUTME: Scrollable read-only overlay for inspect output, pod logs and describe text

use ratatui::{
    prelude::*,
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::help::centered_rect;
use crate::app::AppState;

pub struct DetailOverlayComponent;

impl DetailOverlayComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let Some(detail) = &state.detail else {
            return;
        };
        let popup_area = centered_rect(80, 80, area);
        frame.render_widget(Clear, popup_area);

        let paragraph = Paragraph::new(detail.body.as_str())
            .block(
                Block::default()
                    .title(format!(" {} - j/k scroll, Esc close ", detail.title))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .scroll((detail.scroll, 0));
        frame.render_widget(paragraph, popup_area);
    }
}

impl Default for DetailOverlayComponent {
    fn default() -> Self {
        Self::new()
    }
}
