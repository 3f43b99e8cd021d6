// ABOUTME: Event handling system for keyboard input and app actions
// Keys are mapped to AppEvents per view, then applied to AppState by process_event

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::state::{AppState, View};
use crate::table::RowAction;
use crate::terminal::{encode_key, is_leave_key};

const SCROLL_STEP: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    ToggleHelp,
    Refresh,
    NextSection,
    PreviousSection,
    NextRow,
    PreviousRow,
    NextPage,
    PreviousPage,
    CyclePageSize,
    NextHost,
    CycleNamespace,
    ToggleSidebar,
    CloseCluster,
    ActivateRow,
    RowAction(RowAction),
    OpenTerminal,
    OpenCreateForm,
    OpenRenameForm,
    Prune,
    SetupLoadBalancer,
    // Search
    StartSearch,
    SearchInputChar(char),
    SearchBackspace,
    SearchAccept,
    SearchCancel,
    // Forms
    FormInputChar(char),
    FormBackspace,
    FormNextField,
    FormPrevField,
    FormSubmit,
    FormCancel,
    FormPickContainer,
    // Login
    LoginInputChar(char),
    LoginBackspace,
    LoginToggleField,
    LoginSubmit,
    // Detail overlay
    DetailScroll { down: bool },
    DetailClose,
    // Exec terminal
    TerminalInput(String),
    TerminalScroll { up: bool },
    TerminalReconnect,
    LeaveTerminal,
    // Confirmation dialog events
    ConfirmationToggle,
    ConfirmationConfirm,
    ConfirmationCancel,
}

pub struct EventHandler;

impl EventHandler {
    pub fn handle_key_event(key_event: KeyEvent, state: &mut AppState) -> Option<AppEvent> {
        if key_event.code == KeyCode::Char('c')
            && key_event.modifiers.contains(KeyModifiers::CONTROL)
            && state.current_view != View::Terminal
        {
            return Some(AppEvent::Quit);
        }

        // Confirmation dialog has the highest priority
        if state.confirmation_dialog.is_some() {
            return match key_event.code {
                KeyCode::Left | KeyCode::Right | KeyCode::Tab => Some(AppEvent::ConfirmationToggle),
                KeyCode::Char('y') => {
                    if let Some(dialog) = state.confirmation_dialog.as_mut() {
                        dialog.selected_option = true;
                    }
                    Some(AppEvent::ConfirmationConfirm)
                }
                KeyCode::Enter => Some(AppEvent::ConfirmationConfirm),
                KeyCode::Esc | KeyCode::Char('n') => Some(AppEvent::ConfirmationCancel),
                _ => None,
            };
        }

        if state.form.is_some() {
            return Self::handle_form_keys(key_event);
        }

        if state.detail.is_some() {
            return match key_event.code {
                KeyCode::Esc | KeyCode::Char('q') => Some(AppEvent::DetailClose),
                KeyCode::Char('j') | KeyCode::Down => Some(AppEvent::DetailScroll { down: true }),
                KeyCode::Char('k') | KeyCode::Up => Some(AppEvent::DetailScroll { down: false }),
                _ => None,
            };
        }

        if state.help_visible {
            return match key_event.code {
                KeyCode::Char('?') | KeyCode::Esc => Some(AppEvent::ToggleHelp),
                _ => None,
            };
        }

        match state.current_view {
            View::Login => Self::handle_login_keys(key_event),
            View::Terminal => Self::handle_terminal_keys(key_event, state),
            View::Dashboard if state.search_mode => Self::handle_search_keys(key_event),
            View::Dashboard => Self::handle_dashboard_keys(key_event, state),
        }
    }

    fn handle_dashboard_keys(key_event: KeyEvent, state: &AppState) -> Option<AppEvent> {
        match key_event.code {
            KeyCode::Char('q') => Some(AppEvent::Quit),
            KeyCode::Char('?') => Some(AppEvent::ToggleHelp),
            KeyCode::Tab => Some(AppEvent::NextSection),
            KeyCode::BackTab => Some(AppEvent::PreviousSection),
            KeyCode::Char('j') | KeyCode::Down => Some(AppEvent::NextRow),
            KeyCode::Char('k') | KeyCode::Up => Some(AppEvent::PreviousRow),
            KeyCode::Char('l') | KeyCode::Right => Some(AppEvent::NextPage),
            KeyCode::Char('h') | KeyCode::Left => Some(AppEvent::PreviousPage),
            KeyCode::Char('z') => Some(AppEvent::CyclePageSize),
            KeyCode::Char('/') => Some(AppEvent::StartSearch),
            KeyCode::Char('r') => Some(AppEvent::Refresh),
            KeyCode::Char('s') => Some(AppEvent::RowAction(RowAction::Start)),
            KeyCode::Char('x') => Some(AppEvent::RowAction(RowAction::Stop)),
            KeyCode::Char('R') => Some(AppEvent::RowAction(RowAction::Restart)),
            KeyCode::Char('d') => Some(AppEvent::RowAction(RowAction::Delete)),
            KeyCode::Char('i') => Some(AppEvent::RowAction(RowAction::Inspect)),
            KeyCode::Char('L') => Some(AppEvent::RowAction(RowAction::Logs)),
            KeyCode::Char('D') => Some(AppEvent::RowAction(RowAction::Describe)),
            KeyCode::Char('e') => Some(AppEvent::OpenTerminal),
            KeyCode::Enter => Some(AppEvent::ActivateRow),
            KeyCode::Char('n') => Some(AppEvent::OpenCreateForm),
            KeyCode::Char('m') => Some(AppEvent::OpenRenameForm),
            KeyCode::Char('H') => Some(AppEvent::NextHost),
            KeyCode::Char('N') => Some(AppEvent::CycleNamespace),
            KeyCode::Char('b') => Some(AppEvent::ToggleSidebar),
            KeyCode::Char('P') => Some(AppEvent::Prune),
            KeyCode::Char('S') => Some(AppEvent::SetupLoadBalancer),
            KeyCode::Esc if state.open_cluster.is_some() => Some(AppEvent::CloseCluster),
            _ => None,
        }
    }

    fn handle_search_keys(key_event: KeyEvent) -> Option<AppEvent> {
        match key_event.code {
            KeyCode::Esc => Some(AppEvent::SearchCancel),
            KeyCode::Enter => Some(AppEvent::SearchAccept),
            KeyCode::Backspace => Some(AppEvent::SearchBackspace),
            KeyCode::Char(ch) => Some(AppEvent::SearchInputChar(ch)),
            _ => None,
        }
    }

    fn handle_form_keys(key_event: KeyEvent) -> Option<AppEvent> {
        match key_event.code {
            KeyCode::Char('p') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(AppEvent::FormPickContainer)
            }
            KeyCode::Esc => Some(AppEvent::FormCancel),
            KeyCode::Enter => Some(AppEvent::FormSubmit),
            KeyCode::Tab | KeyCode::Down => Some(AppEvent::FormNextField),
            KeyCode::BackTab | KeyCode::Up => Some(AppEvent::FormPrevField),
            KeyCode::Backspace => Some(AppEvent::FormBackspace),
            KeyCode::Char(ch) => Some(AppEvent::FormInputChar(ch)),
            _ => None,
        }
    }

    fn handle_login_keys(key_event: KeyEvent) -> Option<AppEvent> {
        match key_event.code {
            KeyCode::Esc => Some(AppEvent::Quit),
            KeyCode::Enter => Some(AppEvent::LoginSubmit),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                Some(AppEvent::LoginToggleField)
            }
            KeyCode::Backspace => Some(AppEvent::LoginBackspace),
            KeyCode::Char(ch) => Some(AppEvent::LoginInputChar(ch)),
            _ => None,
        }
    }

    fn handle_terminal_keys(key_event: KeyEvent, state: &AppState) -> Option<AppEvent> {
        if is_leave_key(&key_event) {
            return Some(AppEvent::LeaveTerminal);
        }
        if key_event.modifiers.contains(KeyModifiers::SHIFT) {
            match key_event.code {
                KeyCode::PageUp => return Some(AppEvent::TerminalScroll { up: true }),
                KeyCode::PageDown => return Some(AppEvent::TerminalScroll { up: false }),
                _ => {}
            }
        }

        let connected = state
            .multiplexer
            .active()
            .is_some_and(|session| session.is_connected());
        if connected {
            return encode_key(&key_event).map(AppEvent::TerminalInput);
        }

        match key_event.code {
            KeyCode::Char('r') => Some(AppEvent::TerminalReconnect),
            KeyCode::Esc | KeyCode::Char('q') => Some(AppEvent::LeaveTerminal),
            _ => None,
        }
    }

    /// Pasted text goes to whatever currently takes typing. Only the exec shell
    /// receives it verbatim; text fields get it without control characters.
    pub fn handle_paste(text: &str, state: &AppState) -> Vec<AppEvent> {
        if state.confirmation_dialog.is_some() || state.detail.is_some() || state.help_visible {
            return Vec::new();
        }
        let printable = text.chars().filter(|ch| !ch.is_control());
        if state.form.is_some() {
            return printable.map(AppEvent::FormInputChar).collect();
        }
        match state.current_view {
            View::Terminal => {
                let connected = state
                    .multiplexer
                    .active()
                    .is_some_and(|session| session.is_connected());
                if connected {
                    vec![AppEvent::TerminalInput(text.to_string())]
                } else {
                    Vec::new()
                }
            }
            View::Login => printable.map(AppEvent::LoginInputChar).collect(),
            View::Dashboard if state.search_mode => printable.map(AppEvent::SearchInputChar).collect(),
            View::Dashboard => Vec::new(),
        }
    }

    pub fn process_event(event: AppEvent, state: &mut AppState) {
        match event {
            AppEvent::Quit => state.quit(),
            AppEvent::ToggleHelp => state.toggle_help(),
            AppEvent::Refresh => state.refresh(),
            AppEvent::NextSection => state.next_section(),
            AppEvent::PreviousSection => state.previous_section(),
            AppEvent::NextRow => state.select_next_row(),
            AppEvent::PreviousRow => state.select_previous_row(),
            AppEvent::NextPage => state.next_page(),
            AppEvent::PreviousPage => state.previous_page(),
            AppEvent::CyclePageSize => state.cycle_page_size(),
            AppEvent::NextHost => state.next_host(),
            AppEvent::CycleNamespace => state.cycle_namespace(),
            AppEvent::ToggleSidebar => state.toggle_sidebar(),
            AppEvent::CloseCluster => state.close_cluster(),
            AppEvent::ActivateRow => state.activate_row(),
            AppEvent::RowAction(action) => state.request_row_action(action),
            AppEvent::OpenTerminal => state.open_terminal_for_selected(),
            AppEvent::OpenCreateForm => state.open_create_form(),
            AppEvent::OpenRenameForm => state.open_rename_form(),
            AppEvent::Prune => state.request_prune(),
            AppEvent::SetupLoadBalancer => state.request_lb_setup(),
            AppEvent::StartSearch => state.enter_search(),
            AppEvent::SearchInputChar(ch) => state.search_input(ch),
            AppEvent::SearchBackspace => state.search_backspace(),
            AppEvent::SearchAccept => state.exit_search(false),
            AppEvent::SearchCancel => state.exit_search(true),
            AppEvent::FormInputChar(ch) => {
                if let Some(form) = state.form.as_mut() {
                    form.input_char(ch);
                }
            }
            AppEvent::FormBackspace => {
                if let Some(form) = state.form.as_mut() {
                    form.backspace();
                }
            }
            AppEvent::FormNextField => {
                if let Some(form) = state.form.as_mut() {
                    form.next_field();
                }
            }
            AppEvent::FormPrevField => {
                if let Some(form) = state.form.as_mut() {
                    form.prev_field();
                }
            }
            AppEvent::FormSubmit => state.submit_form(),
            AppEvent::FormCancel => state.cancel_form(),
            AppEvent::FormPickContainer => state.pick_route_container(),
            AppEvent::LoginInputChar(ch) => {
                let login = &mut state.login;
                if login.password_focused {
                    login.password.push(ch);
                } else {
                    login.username.push(ch);
                }
                login.error = None;
            }
            AppEvent::LoginBackspace => {
                let login = &mut state.login;
                if login.password_focused {
                    login.password.pop();
                } else {
                    login.username.pop();
                }
            }
            AppEvent::LoginToggleField => {
                state.login.password_focused = !state.login.password_focused;
            }
            AppEvent::LoginSubmit => state.submit_login(),
            AppEvent::DetailScroll { down } => state.scroll_detail(down),
            AppEvent::DetailClose => state.close_detail(),
            AppEvent::TerminalInput(data) => state.terminal_input(&data),
            AppEvent::TerminalScroll { up } => {
                if let Some(session) = state.multiplexer.active_mut() {
                    let emulator = session.emulator_mut();
                    if up {
                        emulator.scroll_up(SCROLL_STEP);
                    } else {
                        emulator.scroll_down(SCROLL_STEP);
                    }
                }
            }
            AppEvent::TerminalReconnect => state.reconnect_terminal(),
            AppEvent::LeaveTerminal => state.leave_terminal(),
            AppEvent::ConfirmationToggle => {
                if let Some(dialog) = state.confirmation_dialog.as_mut() {
                    dialog.selected_option = !dialog.selected_option;
                }
            }
            AppEvent::ConfirmationConfirm => state.confirm_dialog(),
            AppEvent::ConfirmationCancel => state.confirmation_dialog = None,
        }
    }
}
