// ABOUTME: Help overlay component displaying keyboard shortcuts and commands

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem},
};

pub struct HelpComponent;

impl HelpComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(60, 80, area);

        frame.render_widget(Clear, popup_area);

        let heading = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
        let help_items = vec![
            ListItem::new("Navigation:").style(heading),
            ListItem::new("  Tab/S-Tab  Next / previous section"),
            ListItem::new("  j/↓ k/↑    Move down / up"),
            ListItem::new("  h/← l/→    Previous / next page"),
            ListItem::new("  z          Cycle page size"),
            ListItem::new("  /          Search by name or category"),
            ListItem::new("  r          Refresh"),
            ListItem::new(""),
            ListItem::new("Row Actions:").style(heading),
            ListItem::new("  s x R      Start / stop / restart container"),
            ListItem::new("  d          Delete"),
            ListItem::new("  i          Inspect"),
            ListItem::new("  L D        Pod logs / describe"),
            ListItem::new("  e          Open shell in container or pod"),
            ListItem::new("  Enter      Open cluster, shell or inspect"),
            ListItem::new("  n          Create new"),
            ListItem::new("  m          Rename container"),
            ListItem::new("  P          Prune unused"),
            ListItem::new("  S          Deploy load balancer"),
            ListItem::new(""),
            ListItem::new("Context:").style(heading),
            ListItem::new("  H          Next Docker host"),
            ListItem::new("  N          Next namespace"),
            ListItem::new("  Esc        Close cluster"),
            ListItem::new("  b          Toggle sidebar"),
            ListItem::new(""),
            ListItem::new("Terminal:").style(heading),
            ListItem::new("  Ctrl+Q     Leave the shell"),
            ListItem::new("  S-PgUp/Dn  Scroll back"),
            ListItem::new("  r          Reconnect after disconnect"),
            ListItem::new(""),
            ListItem::new("General:").style(heading),
            ListItem::new("  ?          Toggle this help"),
            ListItem::new("  q          Quit application"),
            ListItem::new("  Ctrl+C     Force quit"),
        ];

        let help_list = List::new(help_items).block(
            Block::default()
                .title("Help - Press ? or Esc to close")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

        frame.render_widget(help_list, popup_area);
    }
}

impl Default for HelpComponent {
    fn default() -> Self {
        Self::new()
    }
}

/// A rectangle of the given percentage size centered in `r`.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
