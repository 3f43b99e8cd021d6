// ABOUTME: Full-screen modal hosting the active exec session's emulator
// The viewport geometry here also decides the size sent to the backend on resize

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::AppState;
use crate::terminal::ConnectionState;

/// Outer rectangle of the modal on a screen of the given size.
pub fn modal_area(screen: Rect) -> Rect {
    super::help::centered_rect(96, 94, screen)
}

/// Cells available to the remote shell: the modal minus borders and the status line.
pub fn viewport(screen: Rect) -> Rect {
    let inner = Block::default().borders(Borders::ALL).inner(modal_area(screen));
    Rect {
        height: inner.height.saturating_sub(1),
        ..inner
    }
}

pub struct TerminalModalComponent;

impl TerminalModalComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, screen: Rect, state: &AppState) {
        let area = modal_area(screen);
        frame.render_widget(Clear, area);

        let Some(session) = state.multiplexer.active() else {
            let paragraph = Paragraph::new("No active session")
                .block(
                    Block::default()
                        .title("Terminal")
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Red)),
                )
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, area);
            return;
        };

        let (border, hint) = match session.state() {
            ConnectionState::Connecting => (Color::Yellow, "Ctrl+Q leave"),
            ConnectionState::Connected => (Color::Green, "Ctrl+Q leave · Shift+PgUp/PgDn scroll"),
            ConnectionState::Disconnected => (Color::Red, "r reconnect · Esc/q leave"),
        };

        let block = Block::default()
            .title(format!(" {} ", session.target().title()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);

        frame.render_widget(Paragraph::new(session.emulator().to_text()), chunks[0]);

        let mut status = format!("● {} │ {}", session.state().label(), hint);
        let offset = session.emulator().scroll_offset();
        if offset > 0 {
            status.push_str(&format!(" │ scrollback -{offset}"));
        }
        let status_line = Paragraph::new(status)
            .style(Style::default().fg(border).add_modifier(Modifier::BOLD));
        frame.render_widget(status_line, chunks[1]);
    }
}

impl Default for TerminalModalComponent {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_fits_inside_modal() {
        let screen = Rect::new(0, 0, 120, 40);
        let modal = modal_area(screen);
        let view = viewport(screen);
        assert!(view.width < modal.width);
        assert_eq!(view.height, modal.height - 3);
    }
}
