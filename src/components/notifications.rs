// ABOUTME: Stack of toast notifications in the top-right corner

use ratatui::{
    prelude::*,
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::{AppState, NotificationType};

const TOAST_WIDTH: u16 = 48;
const TOAST_HEIGHT: u16 = 3;
const MAX_VISIBLE: usize = 4;

pub struct NotificationsComponent;

impl NotificationsComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let width = TOAST_WIDTH.min(area.width);
        let x = area.x + area.width - width;

        for (slot, notification) in state
            .notifications
            .iter()
            .rev()
            .take(MAX_VISIBLE)
            .enumerate()
        {
            let y = area.y + 1 + slot as u16 * TOAST_HEIGHT;
            if y + TOAST_HEIGHT > area.y + area.height {
                break;
            }
            let toast = Rect::new(x, y, width, TOAST_HEIGHT);
            let (color, icon) = match notification.notification_type {
                NotificationType::Success => (Color::Green, "✓"),
                NotificationType::Error => (Color::Red, "✗"),
                NotificationType::Info => (Color::Cyan, "ℹ"),
                NotificationType::Warning => (Color::Yellow, "!"),
            };
            frame.render_widget(Clear, toast);
            let paragraph = Paragraph::new(format!("{icon} {}", notification.message))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(color)),
                )
                .style(Style::default().fg(color))
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, toast);
        }
    }
}

impl Default for NotificationsComponent {
    fn default() -> Self {
        Self::new()
    }
}
