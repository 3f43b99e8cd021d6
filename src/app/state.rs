// ABOUTME: Application state and view switching for the dashboard, terminal and login views
// Key handling mutates AppState and queues AsyncActions; App turns those into spawned tasks

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::forms::{FormKind, FormState, FormSubmission};
use super::notification::Notification;
use crate::api::fanout::{containers_across_hosts, dashboard_stats};
use crate::api::{ApiClient, ApiError, PruneTarget, RequestContext};
use crate::components::terminal_modal;
use crate::config::{AppConfig, ClientState, ClientStore};
use crate::models::{
    AuthResponse, ClusterInfo, DashboardStats, Host, HostedContainer, NamespaceFilter,
    ResourceKind, TraefikStatus, User,
};
use crate::table::{
    load_rows, run_row_action, ActionOutcome, ListTarget, ResourceListState, ResourceRow,
    RowAction, DEFAULT_PAGE_SIZE,
};
use crate::terminal::{
    ExecChannel, ExecConnector, ExecTarget, SessionError, SessionEvent, SessionMultiplexer,
    TerminalSize,
};

const DEFAULT_SCROLLBACK: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Dashboard,
    Terminal,
}

#[derive(Debug, Clone, Default)]
pub struct LoginState {
    pub username: String,
    pub password: String,
    pub password_focused: bool,
    pub error: Option<String>,
    pub submitting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenCluster {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone)]
pub enum ConfirmAction {
    Row { row: ResourceRow, action: RowAction },
    Prune(PruneTarget),
    SetupLoadBalancer,
}

#[derive(Debug, Clone)]
pub struct ConfirmationDialog {
    pub title: String,
    pub message: String,
    pub confirm_action: ConfirmAction,
    pub selected_option: bool, // true = Yes, false = No
}

/// Read-only text shown over the table: inspect output, pod logs, describe.
#[derive(Debug, Clone)]
pub struct DetailView {
    pub title: String,
    pub body: String,
    pub scroll: u16,
}

#[derive(Debug, Clone)]
pub enum AsyncAction {
    Login { username: String, password: String },
    LoadList,
    LoadHosts,
    LoadStats,
    LoadClusterMeta,
    LoadTraefikStatus,
    LoadHostedContainers,
    RunRowAction { row: ResourceRow, action: RowAction },
    Prune(PruneTarget),
    SetupLoadBalancer,
    SubmitForm(FormSubmission),
    OpenTerminal(ExecTarget),
    PersistClientState,
}

pub struct AppState {
    pub current_view: View,
    pub should_quit: bool,
    pub help_visible: bool,
    /// Persisted keys: active host, token, cached user, sidebar flag
    pub client: ClientState,
    pub login: LoginState,
    pub hosts: Vec<Host>,
    pub stats: DashboardStats,
    pub open_cluster: Option<OpenCluster>,
    pub cluster_info: Option<ClusterInfo>,
    pub namespaces: Vec<String>,
    pub namespace_filter: NamespaceFilter,
    pub traefik: Option<TraefikStatus>,
    pub hosted_containers: Vec<HostedContainer>,
    pub sidebar_index: usize,
    pub list: ResourceListState<ResourceRow>,
    pub list_target: ListTarget,
    /// Target whose rows are currently in `list`
    pub loaded_target: Option<ListTarget>,
    pub loading: bool,
    pub selected_row: usize,
    pub search_mode: bool,
    pub notifications: Vec<Notification>,
    pub confirmation_dialog: Option<ConfirmationDialog>,
    pub form: Option<FormState>,
    pub detail: Option<DetailView>,
    pub pending_actions: VecDeque<AsyncAction>,
    pub multiplexer: SessionMultiplexer,
    pub terminal_size: TerminalSize,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ClientState::default(), DEFAULT_PAGE_SIZE, DEFAULT_SCROLLBACK)
    }
}

impl AppState {
    pub fn new(client: ClientState, page_size: usize, scrollback: usize) -> Self {
        let host_id = client.active_host_id;
        let current_view = if client.is_logged_in() {
            View::Dashboard
        } else {
            View::Login
        };
        Self {
            current_view,
            should_quit: false,
            help_visible: false,
            client,
            login: LoginState::default(),
            hosts: Vec::new(),
            stats: DashboardStats::default(),
            open_cluster: None,
            cluster_info: None,
            namespaces: Vec::new(),
            namespace_filter: NamespaceFilter::All,
            traefik: None,
            hosted_containers: Vec::new(),
            sidebar_index: 0,
            list: ResourceListState::new(ResourceKind::Containers).with_page_size(page_size),
            list_target: ListTarget::docker(ResourceKind::Containers, host_id),
            loaded_target: None,
            loading: false,
            selected_row: 0,
            search_mode: false,
            notifications: Vec::new(),
            confirmation_dialog: None,
            form: None,
            detail: None,
            pending_actions: VecDeque::new(),
            multiplexer: SessionMultiplexer::new(scrollback),
            terminal_size: TerminalSize::default(),
        }
    }

    pub fn ctx(&self) -> RequestContext {
        self.client.context()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.client.user.as_ref()
    }

    pub fn is_admin(&self) -> bool {
        self.current_user().is_some_and(User::is_admin)
    }

    /// Users whose every role is a view role may not create or delete anything.
    pub fn is_view_only(&self) -> bool {
        self.current_user().is_some_and(User::is_view_only)
    }

    pub fn active_host(&self) -> Option<&Host> {
        self.hosts.iter().find(|h| h.id == self.client.active_host_id)
    }

    pub fn queue(&mut self, action: AsyncAction) {
        self.pending_actions.push_back(action);
    }

    // --- sidebar and table target ---

    pub fn sidebar_items(&self) -> Vec<ResourceKind> {
        let mut items: Vec<ResourceKind> = ResourceKind::DOCKER.to_vec();
        let admin = self.is_admin();
        items.extend(
            ResourceKind::ADMIN
                .iter()
                .copied()
                .filter(|kind| admin || *kind == ResourceKind::Clusters),
        );
        if self.open_cluster.is_some() {
            items.extend(ResourceKind::CLUSTER);
        }
        items
    }

    pub fn current_kind(&self) -> ResourceKind {
        self.list_target.kind
    }

    pub fn next_section(&mut self) {
        let items = self.sidebar_items();
        if items.is_empty() {
            return;
        }
        self.sidebar_index = (self.sidebar_index + 1) % items.len();
        self.select_kind(items[self.sidebar_index]);
    }

    pub fn previous_section(&mut self) {
        let items = self.sidebar_items();
        if items.is_empty() {
            return;
        }
        self.sidebar_index = self.sidebar_index.checked_sub(1).unwrap_or(items.len() - 1);
        self.select_kind(items[self.sidebar_index]);
    }

    pub fn select_kind(&mut self, kind: ResourceKind) {
        if let Some(index) = self.sidebar_items().iter().position(|k| *k == kind) {
            self.sidebar_index = index;
        }
        let page_size = self.list.page_size();
        self.list = ResourceListState::new(kind).with_page_size(page_size);
        self.list.namespace_filter = self.namespace_filter.clone();
        self.list_target = self.target_for(kind);
        self.loaded_target = None;
        self.selected_row = 0;
        self.search_mode = false;
        self.queue(AsyncAction::LoadList);
        if kind == ResourceKind::LbRoutes {
            self.queue(AsyncAction::LoadTraefikStatus);
        }
    }

    fn target_for(&self, kind: ResourceKind) -> ListTarget {
        let host_id = self.client.active_host_id;
        match &self.open_cluster {
            Some(cluster) if kind.is_k8s() => {
                ListTarget::cluster(kind, host_id, cluster.id, self.namespace_filter.clone())
            }
            _ => ListTarget::docker(kind, host_id),
        }
    }

    pub fn refresh(&mut self) {
        self.queue(AsyncAction::LoadList);
        self.queue(AsyncAction::LoadStats);
        if self.open_cluster.is_some() {
            self.queue(AsyncAction::LoadClusterMeta);
        }
    }

    pub fn cycle_namespace(&mut self) {
        if !self.current_kind().is_namespaced() {
            return;
        }
        let next = match &self.namespace_filter {
            NamespaceFilter::All => self.namespaces.first().cloned(),
            NamespaceFilter::Named(current) => self
                .namespaces
                .iter()
                .position(|ns| ns == current)
                .and_then(|i| self.namespaces.get(i + 1).cloned()),
        };
        self.namespace_filter = next.map_or(NamespaceFilter::All, NamespaceFilter::Named);
        info!("Namespace filter: {}", self.namespace_filter);
        self.select_kind(self.current_kind());
    }

    pub fn open_cluster(&mut self, id: i64, name: String) {
        info!("Opening cluster {} ({})", name, id);
        self.open_cluster = Some(OpenCluster { id, name });
        self.cluster_info = None;
        self.namespaces.clear();
        self.namespace_filter = NamespaceFilter::All;
        self.queue(AsyncAction::LoadClusterMeta);
        self.select_kind(ResourceKind::Pods);
    }

    pub fn close_cluster(&mut self) {
        if self.open_cluster.take().is_some() {
            self.cluster_info = None;
            self.namespaces.clear();
            self.namespace_filter = NamespaceFilter::All;
            self.select_kind(ResourceKind::Clusters);
        }
    }

    // --- hosts and persisted flags ---

    pub fn switch_host(&mut self, host_id: i64) {
        if host_id == self.client.active_host_id {
            return;
        }
        info!("Switching active host to {}", host_id);
        self.client.active_host_id = host_id;
        self.stats = DashboardStats::default();
        self.queue(AsyncAction::PersistClientState);
        let name = self
            .active_host()
            .map_or_else(|| format!("host {host_id}"), |h| h.name.clone());
        self.add_notification(Notification::info(format!("Switched to {name}")));
        self.select_kind(self.current_kind());
        self.queue(AsyncAction::LoadStats);
    }

    pub fn next_host(&mut self) {
        if self.hosts.is_empty() {
            return;
        }
        let next = self
            .hosts
            .iter()
            .position(|h| h.id == self.client.active_host_id)
            .map_or(0, |i| (i + 1) % self.hosts.len());
        self.switch_host(self.hosts[next].id);
    }

    pub fn toggle_sidebar(&mut self) {
        self.client.sidebar_collapsed = !self.client.sidebar_collapsed;
        self.queue(AsyncAction::PersistClientState);
    }

    // --- table navigation ---

    pub fn visible_rows(&self) -> Vec<&ResourceRow> {
        self.list.visible()
    }

    pub fn selected_item(&self) -> Option<ResourceRow> {
        self.list.visible().get(self.selected_row).map(|row| (*row).clone())
    }

    pub fn select_next_row(&mut self) {
        let count = self.list.visible().len();
        if count > 0 {
            self.selected_row = (self.selected_row + 1).min(count - 1);
        }
    }

    pub fn select_previous_row(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
    }

    pub fn next_page(&mut self) {
        self.list.next_page();
        self.selected_row = 0;
    }

    pub fn previous_page(&mut self) {
        self.list.prev_page();
        self.selected_row = 0;
    }

    pub fn cycle_page_size(&mut self) {
        self.list.cycle_page_size();
        self.selected_row = 0;
    }

    pub fn enter_search(&mut self) {
        self.search_mode = true;
    }

    pub fn search_input(&mut self, ch: char) {
        let mut query = self.list.query().to_string();
        query.push(ch);
        self.list.set_search(&query);
        self.selected_row = 0;
    }

    pub fn search_backspace(&mut self) {
        let mut query = self.list.query().to_string();
        query.pop();
        self.list.set_search(&query);
        self.selected_row = 0;
    }

    pub fn exit_search(&mut self, clear: bool) {
        self.search_mode = false;
        if clear {
            self.list.set_search("");
        }
    }

    // --- row actions ---

    fn refuse_view_only(&mut self, what: &str) -> bool {
        if self.is_view_only() {
            self.add_notification(Notification::error(format!(
                "View-only users cannot {what}"
            )));
            return true;
        }
        false
    }

    pub fn request_row_action(&mut self, action: RowAction) {
        let kind = self.current_kind();
        if !RowAction::available(kind).contains(&action) {
            return;
        }
        let Some(row) = self.selected_item() else {
            return;
        };
        if action.is_mutating() && self.refuse_view_only(&action.label().to_lowercase()) {
            return;
        }
        if action == RowAction::Delete {
            self.confirmation_dialog = Some(ConfirmationDialog {
                title: format!("Delete {}", kind.label()),
                message: format!("Are you sure you want to delete '{}'?", row.name),
                confirm_action: ConfirmAction::Row { row, action },
                selected_option: false,
            });
            return;
        }
        self.queue(AsyncAction::RunRowAction { row, action });
    }

    pub fn request_prune(&mut self) {
        let target = match self.current_kind() {
            ResourceKind::Containers => PruneTarget::Containers,
            ResourceKind::Images => PruneTarget::Images,
            ResourceKind::Volumes => PruneTarget::Volumes,
            ResourceKind::Networks => PruneTarget::Networks,
            _ => return,
        };
        if self.refuse_view_only("prune") {
            return;
        }
        self.confirmation_dialog = Some(ConfirmationDialog {
            title: "Prune".to_string(),
            message: format!(
                "Remove all unused {}?",
                self.current_kind().label().to_lowercase()
            ),
            confirm_action: ConfirmAction::Prune(target),
            selected_option: false,
        });
    }

    pub fn request_lb_setup(&mut self) {
        if self.current_kind() != ResourceKind::LbRoutes || self.refuse_view_only("set up the load balancer") {
            return;
        }
        self.confirmation_dialog = Some(ConfirmationDialog {
            title: "Load Balancer".to_string(),
            message: "Deploy the Traefik proxy on the active host?".to_string(),
            confirm_action: ConfirmAction::SetupLoadBalancer,
            selected_option: false,
        });
    }

    pub fn confirm_dialog(&mut self) {
        let Some(dialog) = self.confirmation_dialog.take() else {
            return;
        };
        if !dialog.selected_option {
            return;
        }
        match dialog.confirm_action {
            ConfirmAction::Row { row, action } => {
                self.queue(AsyncAction::RunRowAction { row, action });
            }
            ConfirmAction::Prune(target) => self.queue(AsyncAction::Prune(target)),
            ConfirmAction::SetupLoadBalancer => self.queue(AsyncAction::SetupLoadBalancer),
        }
    }

    /// Enter on a row: open a cluster, start a shell, or inspect.
    pub fn activate_row(&mut self) {
        let Some(row) = self.selected_item() else {
            return;
        };
        let kind = self.current_kind();
        if kind == ResourceKind::Clusters {
            match row.key.parse() {
                Ok(id) => self.open_cluster(id, row.name),
                Err(_) => warn!("Cluster row has a non-numeric id: {}", row.key),
            }
        } else if kind.supports_exec() {
            self.open_terminal_for(&row);
        } else if RowAction::available(kind).contains(&RowAction::Inspect) {
            self.queue(AsyncAction::RunRowAction {
                row,
                action: RowAction::Inspect,
            });
        }
    }

    pub fn open_terminal_for_selected(&mut self) {
        if let Some(row) = self.selected_item() {
            self.open_terminal_for(&row);
        }
    }

    fn open_terminal_for(&mut self, row: &ResourceRow) {
        let target = match self.current_kind() {
            ResourceKind::Containers => ExecTarget::Container {
                id: row.key.clone(),
                name: row.name.clone(),
            },
            ResourceKind::Pods => {
                let Some(cluster) = &self.open_cluster else {
                    return;
                };
                ExecTarget::Pod {
                    cluster_id: cluster.id,
                    pod: row.name.clone(),
                    namespace: row.namespace.clone().unwrap_or_else(|| "default".to_string()),
                    container: None,
                }
            }
            _ => return,
        };
        self.queue(AsyncAction::OpenTerminal(target));
    }

    // --- forms ---

    pub fn open_create_form(&mut self) {
        let Some(kind) = FormKind::for_resource(self.current_kind()) else {
            return;
        };
        if self.refuse_view_only("create resources") {
            return;
        }
        if kind == FormKind::NewRoute {
            self.queue(AsyncAction::LoadHostedContainers);
        }
        self.form = Some(FormState::new(kind));
    }

    pub fn open_rename_form(&mut self) {
        if self.current_kind() != ResourceKind::Containers || self.refuse_view_only("rename containers") {
            return;
        }
        if let Some(row) = self.selected_item() {
            let mut form = FormState::new(FormKind::RenameContainer { id: row.key });
            form.set_value("New name", &row.name);
            self.form = Some(form);
        }
    }

    /// Fills the route form's container from the cross-host list, cycling on each call.
    pub fn pick_route_container(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        if form.kind != FormKind::NewRoute || self.hosted_containers.is_empty() {
            return;
        }
        let next = form
            .picked
            .map_or(0, |i| (i + 1) % self.hosted_containers.len());
        let choice = &self.hosted_containers[next];
        form.picked = Some(next);
        form.picked_host = Some(choice.host_id);
        form.set_value("Container", &choice.container.display_name());
    }

    pub fn submit_form(&mut self) {
        let host_id = self.client.active_host_id;
        let cluster_id = self.open_cluster.as_ref().map(|c| c.id);
        let Some(form) = self.form.as_mut() else {
            return;
        };
        if form.submitting {
            return;
        }
        match form.submission(form.picked_host.unwrap_or(host_id), cluster_id) {
            Ok(submission) => {
                form.submitting = true;
                form.error = None;
                self.queue(AsyncAction::SubmitForm(submission));
            }
            Err(e) => form.error = Some(e.to_string()),
        }
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
    }

    // --- login ---

    pub fn submit_login(&mut self) {
        if self.login.submitting {
            return;
        }
        let username = self.login.username.trim().to_string();
        if username.is_empty() || self.login.password.is_empty() {
            self.login.error = Some("Username and password are required".to_string());
            return;
        }
        self.login.submitting = true;
        self.login.error = None;
        let password = self.login.password.clone();
        self.queue(AsyncAction::Login { username, password });
    }

    pub fn complete_login(&mut self, auth: AuthResponse) {
        info!("Logged in as {}", auth.user.username);
        self.client.auth_token = Some(auth.token);
        self.client.user = Some(auth.user);
        self.login = LoginState::default();
        self.current_view = View::Dashboard;
        self.queue(AsyncAction::PersistClientState);
        self.queue(AsyncAction::LoadHosts);
        self.queue(AsyncAction::LoadStats);
        self.select_kind(ResourceKind::Containers);
    }

    /// Drops credentials and returns to the login form.
    pub fn sign_out(&mut self, reason: Option<&str>) {
        info!("Signing out");
        self.multiplexer.close();
        self.client.clear_auth();
        self.confirmation_dialog = None;
        self.form = None;
        self.detail = None;
        self.help_visible = false;
        self.pending_actions.clear();
        self.reset_loaded_data();
        self.current_view = View::Login;
        self.queue(AsyncAction::PersistClientState);
        if let Some(reason) = reason {
            self.login.error = Some(reason.to_string());
        }
    }

    /// Forgets everything fetched for the signed-in user; the next login reloads it.
    fn reset_loaded_data(&mut self) {
        self.hosts.clear();
        self.stats = DashboardStats::default();
        self.open_cluster = None;
        self.cluster_info = None;
        self.namespaces.clear();
        self.namespace_filter = NamespaceFilter::All;
        self.traefik = None;
        self.hosted_containers.clear();
        self.sidebar_index = 0;
        let page_size = self.list.page_size();
        self.list = ResourceListState::new(ResourceKind::Containers).with_page_size(page_size);
        self.list_target = ListTarget::docker(ResourceKind::Containers, self.client.active_host_id);
        self.loaded_target = None;
        self.loading = false;
        self.selected_row = 0;
        self.search_mode = false;
    }

    // --- terminal ---

    pub fn leave_terminal(&mut self) {
        self.multiplexer.close();
        self.current_view = View::Dashboard;
    }

    pub fn reconnect_terminal(&mut self) {
        if let Some(target) = self.multiplexer.reconnect_target() {
            self.queue(AsyncAction::OpenTerminal(target));
        }
    }

    pub fn terminal_input(&mut self, data: &str) {
        if let Err(e) = self.multiplexer.send_input(data) {
            debug!("Terminal input dropped: {}", e);
        }
    }

    /// Recomputes the exec viewport for a new screen size and forwards it to the session.
    pub fn on_screen_resize(&mut self, cols: u16, rows: u16) {
        let viewport = terminal_modal::viewport(Rect::new(0, 0, cols, rows));
        self.terminal_size = TerminalSize::new(viewport.width, viewport.height);
        self.multiplexer.resize(self.terminal_size);
    }

    // --- overlays and notifications ---

    pub fn toggle_help(&mut self) {
        self.help_visible = !self.help_visible;
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    pub fn scroll_detail(&mut self, down: bool) {
        if let Some(detail) = self.detail.as_mut() {
            detail.scroll = if down {
                detail.scroll.saturating_add(1)
            } else {
                detail.scroll.saturating_sub(1)
            };
        }
    }

    pub fn add_notification(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    pub fn expire_notifications(&mut self, now: Instant) {
        self.notifications.retain(|n| !n.is_expired_at(now));
    }

    pub fn quit(&mut self) {
        self.multiplexer.close();
        self.should_quit = true;
    }

    /// Surfaces an API failure; an expired token sends the user back to login.
    fn report(&mut self, error: &ApiError) {
        if error.is_unauthorized() {
            self.sign_out(Some(&error.to_string()));
        } else {
            warn!("Request failed: {}", error);
            self.add_notification(Notification::error(error.to_string()));
        }
    }

    fn apply_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Connected { title } => {
                self.add_notification(Notification::success(format!("Connected to {title}")));
            }
            SessionEvent::Disconnected { title, reason } => {
                self.add_notification(Notification::warning(format!("{title}: {reason}")));
            }
        }
    }

    /// Applies the outcome of a background task.
    pub fn apply(&mut self, result: TaskResult) {
        if !self.client.is_logged_in()
            && !matches!(result, TaskResult::LoggedIn(_) | TaskResult::Connected { .. })
        {
            debug!("Discarding a result that arrived after sign-out");
            return;
        }
        match result {
            TaskResult::LoggedIn(Ok(auth)) => self.complete_login(auth),
            TaskResult::LoggedIn(Err(e)) => {
                warn!("Login failed: {}", e);
                self.login.submitting = false;
                self.login.error = Some(e.to_string());
            }
            TaskResult::ListLoaded { target, result } => {
                if target != self.list_target {
                    debug!("Discarding stale {} rows", target.kind.label());
                    return;
                }
                self.loading = false;
                match result {
                    Ok(rows) => {
                        if self.loaded_target.as_ref() == Some(&target) {
                            self.list.refresh_items(rows);
                        } else {
                            self.list.set_items(rows);
                            self.loaded_target = Some(target);
                        }
                        let count = self.list.visible().len();
                        self.selected_row = self.selected_row.min(count.saturating_sub(1));
                    }
                    Err(e) => self.report(&e),
                }
            }
            TaskResult::Hosts(Ok(hosts)) => self.hosts = hosts,
            TaskResult::Hosts(Err(e)) => self.report(&e),
            TaskResult::Stats { host_id, stats } => {
                if host_id == self.client.active_host_id {
                    self.stats = stats;
                }
            }
            TaskResult::ClusterMeta {
                cluster_id,
                namespaces,
                info,
            } => {
                if self.open_cluster.as_ref().map(|c| c.id) != Some(cluster_id) {
                    return;
                }
                match namespaces {
                    Ok(namespaces) => self.namespaces = namespaces,
                    Err(e) => self.report(&e),
                }
                match info {
                    Ok(info) => self.cluster_info = Some(info),
                    Err(e) => warn!("Cluster info unavailable: {}", e),
                }
            }
            TaskResult::Traefik(Ok(status)) => self.traefik = Some(status),
            TaskResult::Traefik(Err(e)) => {
                warn!("Load balancer status unavailable: {}", e);
                self.traefik = None;
            }
            TaskResult::HostedContainers(containers) => self.hosted_containers = containers,
            TaskResult::RowAction(Ok(ActionOutcome::Changed(message)))
            | TaskResult::Mutation(Ok(message)) => {
                self.add_notification(Notification::success(message));
                self.queue(AsyncAction::LoadList);
                self.queue(AsyncAction::LoadStats);
                if self.current_kind() == ResourceKind::LbRoutes {
                    self.queue(AsyncAction::LoadTraefikStatus);
                }
            }
            TaskResult::RowAction(Ok(ActionOutcome::Detail { title, body })) => {
                self.detail = Some(DetailView {
                    title,
                    body,
                    scroll: 0,
                });
            }
            TaskResult::RowAction(Err(e)) | TaskResult::Mutation(Err(e)) => self.report(&e),
            TaskResult::FormSubmitted(Ok(message)) => {
                self.form = None;
                self.add_notification(Notification::success(message));
                self.queue(AsyncAction::LoadList);
                self.queue(AsyncAction::LoadStats);
            }
            TaskResult::FormSubmitted(Err(e)) => {
                if e.is_unauthorized() {
                    self.report(&e);
                } else if let Some(form) = self.form.as_mut() {
                    form.submitting = false;
                    form.error = Some(e.to_string());
                }
            }
            TaskResult::Connected { session_id, result } => {
                if let Some(event) = self.multiplexer.attach(session_id, result) {
                    self.apply_session_event(event);
                }
            }
        }
    }

    pub fn pump_terminal(&mut self) {
        for event in self.multiplexer.pump() {
            self.apply_session_event(event);
        }
    }
}

/// Outcome of a spawned task, delivered back over the results channel.
pub enum TaskResult {
    LoggedIn(Result<AuthResponse, ApiError>),
    ListLoaded {
        target: ListTarget,
        result: Result<Vec<ResourceRow>, ApiError>,
    },
    Hosts(Result<Vec<Host>, ApiError>),
    Stats {
        host_id: i64,
        stats: DashboardStats,
    },
    ClusterMeta {
        cluster_id: i64,
        namespaces: Result<Vec<String>, ApiError>,
        info: Result<ClusterInfo, ApiError>,
    },
    Traefik(Result<TraefikStatus, ApiError>),
    HostedContainers(Vec<HostedContainer>),
    RowAction(Result<ActionOutcome, ApiError>),
    Mutation(Result<String, ApiError>),
    FormSubmitted(Result<String, ApiError>),
    Connected {
        session_id: u64,
        result: Result<ExecChannel, SessionError>,
    },
}

pub struct App {
    pub state: AppState,
    client: ApiClient,
    connector: Arc<dyn ExecConnector>,
    store: Arc<dyn ClientStore>,
    config: AppConfig,
    results_tx: mpsc::UnboundedSender<TaskResult>,
    results_rx: mpsc::UnboundedReceiver<TaskResult>,
    in_flight: usize,
    last_refresh: Instant,
}

impl App {
    pub fn new(
        config: AppConfig,
        client: ApiClient,
        connector: Arc<dyn ExecConnector>,
        store: Arc<dyn ClientStore>,
    ) -> Self {
        let state = AppState::new(store.load(), config.ui.page_size, config.terminal.scrollback);
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        Self {
            state,
            client,
            connector,
            store,
            config,
            results_tx,
            results_rx,
            in_flight: 0,
            last_refresh: Instant::now(),
        }
    }

    /// Queues the first loads for a signed-in user.
    pub fn init(&mut self) {
        if self.state.client.is_logged_in() {
            info!(
                "Restoring session on host {}",
                self.state.client.active_host_id
            );
            self.state.current_view = View::Dashboard;
            self.state.queue(AsyncAction::LoadHosts);
            self.state.queue(AsyncAction::LoadStats);
            self.state.select_kind(ResourceKind::Containers);
        } else {
            self.state.current_view = View::Login;
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Starts queued work, applies finished work and keeps the terminal pumped.
    pub fn tick(&mut self) {
        self.dispatch_pending();
        while let Ok(result) = self.results_rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            self.state.apply(result);
        }
        self.dispatch_pending();
        self.state.pump_terminal();
        self.state.expire_notifications(Instant::now());
        self.auto_refresh();
    }

    /// Runs until every queued and in-flight task has been applied.
    pub async fn settle(&mut self) {
        loop {
            self.dispatch_pending();
            if self.in_flight == 0 {
                break;
            }
            let Some(result) = self.results_rx.recv().await else {
                break;
            };
            self.in_flight -= 1;
            self.state.apply(result);
        }
        self.state.pump_terminal();
    }

    fn auto_refresh(&mut self) {
        let Some(interval) = self.config.refresh_interval() else {
            return;
        };
        if self.last_refresh.elapsed() < interval {
            return;
        }
        self.last_refresh = Instant::now();
        let idle = self.state.current_view == View::Dashboard
            && self.state.form.is_none()
            && self.state.confirmation_dialog.is_none()
            && !self.state.loading;
        if idle && self.state.client.is_logged_in() {
            debug!("Auto-refreshing {}", self.state.current_kind().label());
            self.state.queue(AsyncAction::LoadList);
            self.state.queue(AsyncAction::LoadStats);
        }
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = TaskResult> + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.results_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(task.await);
        });
    }

    fn dispatch_pending(&mut self) {
        while let Some(action) = self.state.pending_actions.pop_front() {
            self.dispatch(action);
        }
    }

    fn dispatch(&mut self, action: AsyncAction) {
        let client = self.client.clone();
        let ctx = self.state.ctx();
        match action {
            AsyncAction::Login { username, password } => {
                self.spawn(async move {
                    TaskResult::LoggedIn(client.login(&ctx, &username, &password).await)
                });
            }
            AsyncAction::LoadList => {
                self.state.loading = true;
                let target = self.state.list_target.clone();
                self.spawn(async move {
                    let result = load_rows(&client, &ctx, &target).await;
                    TaskResult::ListLoaded { target, result }
                });
            }
            AsyncAction::LoadHosts => {
                self.spawn(async move { TaskResult::Hosts(client.list_hosts(&ctx).await) });
            }
            AsyncAction::LoadStats => {
                self.spawn(async move {
                    TaskResult::Stats {
                        host_id: ctx.host_id,
                        stats: dashboard_stats(&client, &ctx).await,
                    }
                });
            }
            AsyncAction::LoadClusterMeta => {
                let Some(cluster_id) = self.state.open_cluster.as_ref().map(|c| c.id) else {
                    return;
                };
                self.spawn(async move {
                    let (namespaces, info) = futures_util::join!(
                        client.list_namespaces(&ctx, cluster_id),
                        client.cluster_info(&ctx, cluster_id)
                    );
                    TaskResult::ClusterMeta {
                        cluster_id,
                        namespaces,
                        info,
                    }
                });
            }
            AsyncAction::LoadTraefikStatus => {
                self.spawn(async move { TaskResult::Traefik(client.traefik_status(&ctx).await) });
            }
            AsyncAction::LoadHostedContainers => {
                let hosts = self.state.hosts.clone();
                self.spawn(async move {
                    TaskResult::HostedContainers(containers_across_hosts(&client, &ctx, &hosts).await)
                });
            }
            AsyncAction::RunRowAction { row, action } => {
                let target = self.state.list_target.clone();
                self.spawn(async move {
                    TaskResult::RowAction(run_row_action(&client, &ctx, &target, &row, action).await)
                });
            }
            AsyncAction::Prune(target) => {
                self.spawn(async move {
                    TaskResult::Mutation(
                        client
                            .prune(&ctx, target)
                            .await
                            .map(|()| "Prune completed".to_string()),
                    )
                });
            }
            AsyncAction::SetupLoadBalancer => {
                self.spawn(async move {
                    TaskResult::Mutation(
                        client
                            .setup_load_balancer(&ctx)
                            .await
                            .map(|()| "Load balancer deployed".to_string()),
                    )
                });
            }
            AsyncAction::SubmitForm(submission) => {
                self.spawn(async move { TaskResult::FormSubmitted(submission.submit(&client, &ctx).await) });
            }
            AsyncAction::OpenTerminal(target) => self.open_terminal(target, ctx),
            AsyncAction::PersistClientState => {
                if let Err(e) = self.store.save(&self.state.client) {
                    warn!("Failed to persist client state: {:#}", e);
                }
            }
        }
    }

    fn open_terminal(&mut self, target: ExecTarget, ctx: RequestContext) {
        let url = target.url(
            &self.config.server.base_url,
            &self.config.terminal.default_shell,
            &ctx,
        );
        let session_id = self.state.multiplexer.begin(target, self.state.terminal_size);
        self.state.current_view = View::Terminal;
        match url {
            Ok(url) => {
                let connector = Arc::clone(&self.connector);
                self.spawn(async move {
                    TaskResult::Connected {
                        session_id,
                        result: connector.connect(&url, &ctx).await,
                    }
                });
            }
            Err(e) => {
                if let Some(event) = self.state.multiplexer.attach(session_id, Err(e)) {
                    self.state.apply_session_event(event);
                }
            }
        }
    }
}
