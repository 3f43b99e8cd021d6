// ABOUTME: Sidebar listing the resource sections, grouped Docker / Admin / Cluster

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::app::AppState;
use crate::models::ResourceKind;

#[derive(Default)]
pub struct SidebarComponent {
    list_state: ListState,
}

impl SidebarComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let sections = state.sidebar_items();
        let mut items = Vec::new();
        let mut selected = None;
        let mut group = "";

        for (index, kind) in sections.iter().enumerate() {
            let heading = group_of(*kind);
            if heading != group {
                group = heading;
                items.push(
                    ListItem::new(heading)
                        .style(Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)),
                );
            }
            if index == state.sidebar_index {
                selected = Some(items.len());
            }
            items.push(ListItem::new(format!("  {}", kind.label())));
        }
        self.list_state.select(selected);

        let list = List::new(items)
            .block(
                Block::default()
                    .title("Resources")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan))
                    .title_style(Style::default().fg(Color::Yellow)),
            )
            .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(list, area, &mut self.list_state);
    }
}

fn group_of(kind: ResourceKind) -> &'static str {
    if ResourceKind::DOCKER.contains(&kind) {
        "Docker"
    } else if ResourceKind::ADMIN.contains(&kind) {
        "Admin"
    } else {
        "Cluster"
    }
}
