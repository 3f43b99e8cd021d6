// ABOUTME: Resource table component: the visible page of rows, search line and pagination bar

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use crate::app::AppState;
use crate::table::{pagination_bar, PageButton, RowStatus};

#[derive(Default)]
pub struct ResourceTableComponent {
    table_state: TableState,
}

impl ResourceTableComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // Table
                Constraint::Length(1), // Pagination
            ])
            .split(area);

        self.render_table(frame, chunks[0], state);
        render_pagination(frame, chunks[1], state);
    }

    fn render_table(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let kind = state.current_kind();
        let columns = kind.columns();
        let rows = state.visible_rows();

        let header = Row::new(columns.iter().map(|c| Cell::from(*c)))
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

        let body: Vec<Row> = rows
            .iter()
            .map(|row| {
                let status = status_color(row.status);
                Row::new(row.cells.iter().enumerate().map(|(i, cell)| {
                    let style = if columns.get(i).is_some_and(|c| is_status_column(c)) {
                        Style::default().fg(status)
                    } else {
                        Style::default()
                    };
                    Cell::from(cell.clone()).style(style)
                }))
            })
            .collect();

        let widths = vec![Constraint::Ratio(1, columns.len().max(1) as u32); columns.len()];
        let title = table_title(state);
        let border = if state.search_mode {
            Color::Yellow
        } else {
            Color::Cyan
        };

        if rows.is_empty() {
            let message = if state.loading {
                "Loading..."
            } else if state.list.query().is_empty() {
                "Nothing to show"
            } else {
                "No matches"
            };
            let empty = Paragraph::new(message)
                .block(
                    Block::default()
                        .title(title)
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(border)),
                )
                .style(Style::default().fg(Color::Gray))
                .alignment(Alignment::Center);
            frame.render_widget(empty, area);
            return;
        }

        let table = Table::new(body, widths)
            .header(header)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border)),
            )
            .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
            .highlight_symbol("▶ ");

        self.table_state.select(Some(state.selected_row));
        frame.render_stateful_widget(table, area, &mut self.table_state);
    }
}

fn table_title(state: &AppState) -> String {
    let kind = state.current_kind();
    let mut title = format!(" {} ", kind.label());
    if kind.is_namespaced() && state.open_cluster.is_some() {
        title.push_str(&format!("[{}] ", state.namespace_filter));
    }
    if state.search_mode || !state.list.query().is_empty() {
        let cursor = if state.search_mode { "_" } else { "" };
        title.push_str(&format!("/ {}{} ", state.list.query(), cursor));
    }
    if state.loading {
        title.push_str("⟳ ");
    }
    title
}

fn render_pagination(frame: &mut Frame, area: Rect, state: &AppState) {
    let list = &state.list;
    let mut spans = Vec::new();
    for button in pagination_bar(list.current_page(), list.total_pages()) {
        let style = match button {
            PageButton::Page { current: true, .. } => Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            PageButton::Prev { enabled: false } | PageButton::Next { enabled: false } => {
                Style::default().fg(Color::DarkGray)
            }
            _ => Style::default().fg(Color::White),
        };
        spans.push(Span::styled(format!(" {} ", button.label()), style));
    }
    spans.push(Span::styled(
        format!(
            "  {} items · {} per page",
            list.filtered_count(),
            list.page_size()
        ),
        Style::default().fg(Color::Gray),
    ));
    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}

fn is_status_column(name: &str) -> bool {
    matches!(name, "State" | "Status")
}

fn status_color(status: RowStatus) -> Color {
    match status {
        RowStatus::Good => Color::Green,
        RowStatus::Warning => Color::Yellow,
        RowStatus::Bad => Color::Red,
        RowStatus::Neutral => Color::White,
    }
}
