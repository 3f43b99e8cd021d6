// ABOUTME: Main layout component: sidebar, stats header, resource table and bottom menu bar
// Overlays (form, detail, help, dialog, toasts) are drawn last, in priority order

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{block::Title, Block, Borders, Paragraph},
};

use super::{
    ConfirmationDialogComponent, DetailOverlayComponent, FormModalComponent, HelpComponent,
    LoginComponent, NotificationsComponent, ResourceTableComponent, SidebarComponent,
    TerminalModalComponent,
};
use crate::app::{AppState, View};
use crate::models::{ClusterInfo, ResourceKind};

const SIDEBAR_WIDTH: u16 = 22;

pub struct LayoutComponent {
    sidebar: SidebarComponent,
    table: ResourceTableComponent,
    terminal: TerminalModalComponent,
    form: FormModalComponent,
    detail: DetailOverlayComponent,
    login: LoginComponent,
    help: HelpComponent,
    confirmation_dialog: ConfirmationDialogComponent,
    notifications: NotificationsComponent,
}

impl LayoutComponent {
    pub fn new() -> Self {
        Self {
            sidebar: SidebarComponent::new(),
            table: ResourceTableComponent::new(),
            terminal: TerminalModalComponent::new(),
            form: FormModalComponent::new(),
            detail: DetailOverlayComponent::new(),
            login: LoginComponent::new(),
            help: HelpComponent::new(),
            confirmation_dialog: ConfirmationDialogComponent::new(),
            notifications: NotificationsComponent::new(),
        }
    }

    pub fn render(&mut self, frame: &mut Frame, state: &AppState) {
        let screen = frame.size();

        if state.current_view == View::Login {
            self.login.render(frame, screen, state);
            self.notifications.render(frame, screen, state);
            return;
        }

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Stats header
                Constraint::Min(0),    // Sidebar + table
                Constraint::Length(3), // Bottom menu bar
            ])
            .split(screen);

        render_header(frame, main_chunks[0], state);

        let sidebar_width = if state.client.sidebar_collapsed {
            0
        } else {
            SIDEBAR_WIDTH
        };
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(sidebar_width), Constraint::Min(0)])
            .split(main_chunks[1]);

        if sidebar_width > 0 {
            self.sidebar.render(frame, content_chunks[0], state);
        }
        self.table.render(frame, content_chunks[1], state);
        self.render_menu_bar(frame, main_chunks[2], state);

        if state.current_view == View::Terminal {
            self.terminal.render(frame, screen, state);
        }
        if state.detail.is_some() {
            self.detail.render(frame, screen, state);
        }
        if state.form.is_some() {
            self.form.render(frame, screen, state);
        }
        if state.help_visible {
            self.help.render(frame, screen);
        }
        if state.confirmation_dialog.is_some() {
            self.confirmation_dialog.render(frame, screen, state);
        }
        self.notifications.render(frame, screen, state);
    }

    fn render_menu_bar(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let menu_text = if state.search_mode {
            "Type to filter · [Enter] keep · [Esc] clear".to_string()
        } else {
            menu_for(state.current_kind(), state.open_cluster.is_some())
        };

        let menu = Paragraph::new(menu_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center);

        frame.render_widget(menu, area);
    }
}

impl Default for LayoutComponent {
    fn default() -> Self {
        Self::new()
    }
}

fn menu_for(kind: ResourceKind, cluster_open: bool) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if kind.supports_lifecycle() {
        parts.extend(["[s]tart", "[x]stop", "[R]estart"]);
    }
    if kind.supports_exec() {
        parts.push("[e]xec");
    }
    if kind == ResourceKind::Clusters {
        parts.push("[Enter]open");
    }
    if kind == ResourceKind::Pods {
        parts.extend(["[L]ogs", "[D]escribe"]);
    }
    if kind == ResourceKind::LbRoutes {
        parts.push("[S]etup LB");
    }
    if kind.supports_delete() {
        parts.push("[d]elete");
    }
    parts.extend(["[n]ew", "[/]search", "[r]efresh", "[H]ost"]);
    if cluster_open {
        parts.extend(["[N]amespace", "[Esc]close cluster"]);
    }
    parts.extend(["[?]help", "[q]uit"]);
    parts.join(" ")
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let label = Style::default().fg(Color::Gray);
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    let host = state
        .active_host()
        .map_or_else(|| format!("#{}", state.client.active_host_id), |h| h.name.clone());
    let stats = &state.stats;

    let mut spans = vec![
        Span::styled("Host ", label),
        Span::styled(host, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::styled("  Containers ", label),
        Span::styled(
            format!("{}/{}", stats.running_containers, stats.total_containers),
            value,
        ),
        Span::styled("  Images ", label),
        Span::styled(stats.images.to_string(), value),
        Span::styled("  Volumes ", label),
        Span::styled(stats.volumes.to_string(), value),
        Span::styled("  Networks ", label),
        Span::styled(stats.networks.to_string(), value),
    ];

    if let Some(cluster) = &state.open_cluster {
        let info = state.cluster_info.clone().unwrap_or_default();
        spans.push(Span::styled("  │ Cluster ", label));
        spans.push(Span::styled(
            cluster.name.clone(),
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!(
                " {} · {} nodes · {} pods · {} ns",
                ClusterInfo::counter(&info.version),
                ClusterInfo::counter(&info.node_count),
                ClusterInfo::counter(&info.pod_count),
                ClusterInfo::counter(&info.ns_count),
            ),
            label,
        ));
    }

    if state.current_kind() == ResourceKind::LbRoutes {
        let (text, color) = match &state.traefik {
            Some(status) if status.running => (format!("  │ Traefik up on {}", status.host_name), Color::Green),
            Some(_) => ("  │ Traefik not running".to_string(), Color::Red),
            None => ("  │ Traefik unknown".to_string(), Color::DarkGray),
        };
        spans.push(Span::styled(text, Style::default().fg(color)));
    }

    let user = state
        .current_user()
        .map(|u| format!(" {} ", u.username))
        .unwrap_or_default();
    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(" dockdeck ")
            .title(Title::from(user).alignment(Alignment::Right))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(header, area);
}
