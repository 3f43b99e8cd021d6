// ABOUTME: Unit tests for event handling to ensure keyboard inputs map to correct app actions

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use dockdeck::app::{AppEvent, AppState, EventHandler, FormKind, FormState, View};
use dockdeck::config::ClientState;
use dockdeck::models::User;
use dockdeck::table::RowAction;
use pretty_assertions::assert_eq;

fn create_key_event(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn create_key_event_with_modifiers(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent::new(code, modifiers)
}

fn dashboard_state() -> AppState {
    let client = ClientState {
        auth_token: Some("tok".to_string()),
        user: Some(User {
            id: 1,
            username: "alice".to_string(),
            role: "admin".to_string(),
            created_at: String::new(),
        }),
        ..ClientState::default()
    };
    let state = AppState::new(client, 20, 100);
    assert_eq!(state.current_view, View::Dashboard);
    state
}

fn press(state: &mut AppState, code: KeyCode) -> Option<AppEvent> {
    EventHandler::handle_key_event(create_key_event(code), state)
}

#[test]
fn test_quit_key_events() {
    let mut state = dashboard_state();

    assert_eq!(press(&mut state, KeyCode::Char('q')), Some(AppEvent::Quit));
    let ctrl_c = EventHandler::handle_key_event(
        create_key_event_with_modifiers(KeyCode::Char('c'), KeyModifiers::CONTROL),
        &mut state,
    );
    assert_eq!(ctrl_c, Some(AppEvent::Quit));
}

#[test]
fn test_navigation_key_events() {
    let mut state = dashboard_state();

    assert_eq!(press(&mut state, KeyCode::Char('j')), Some(AppEvent::NextRow));
    assert_eq!(press(&mut state, KeyCode::Down), Some(AppEvent::NextRow));
    assert_eq!(press(&mut state, KeyCode::Char('k')), Some(AppEvent::PreviousRow));
    assert_eq!(press(&mut state, KeyCode::Char('l')), Some(AppEvent::NextPage));
    assert_eq!(press(&mut state, KeyCode::Left), Some(AppEvent::PreviousPage));
    assert_eq!(press(&mut state, KeyCode::Tab), Some(AppEvent::NextSection));
    assert_eq!(press(&mut state, KeyCode::BackTab), Some(AppEvent::PreviousSection));
    assert_eq!(press(&mut state, KeyCode::Char('z')), Some(AppEvent::CyclePageSize));
}

#[test]
fn test_row_action_key_events() {
    let mut state = dashboard_state();

    assert_eq!(
        press(&mut state, KeyCode::Char('s')),
        Some(AppEvent::RowAction(RowAction::Start))
    );
    assert_eq!(
        press(&mut state, KeyCode::Char('x')),
        Some(AppEvent::RowAction(RowAction::Stop))
    );
    assert_eq!(
        press(&mut state, KeyCode::Char('d')),
        Some(AppEvent::RowAction(RowAction::Delete))
    );
    assert_eq!(press(&mut state, KeyCode::Char('e')), Some(AppEvent::OpenTerminal));
    assert_eq!(press(&mut state, KeyCode::Enter), Some(AppEvent::ActivateRow));
}

#[test]
fn test_search_mode_captures_letters() {
    let mut state = dashboard_state();

    let event = press(&mut state, KeyCode::Char('/')).unwrap();
    EventHandler::process_event(event, &mut state);
    assert!(state.search_mode);

    // 'q' is text while searching, not quit
    assert_eq!(
        press(&mut state, KeyCode::Char('q')),
        Some(AppEvent::SearchInputChar('q'))
    );
    assert_eq!(press(&mut state, KeyCode::Esc), Some(AppEvent::SearchCancel));
}

#[test]
fn test_search_cancel_clears_query() {
    let mut state = dashboard_state();
    state.enter_search();
    for ch in "web".chars() {
        EventHandler::process_event(AppEvent::SearchInputChar(ch), &mut state);
    }
    assert_eq!(state.list.query(), "web");

    EventHandler::process_event(AppEvent::SearchCancel, &mut state);
    assert!(!state.search_mode);
    assert_eq!(state.list.query(), "");
}

#[test]
fn test_confirmation_dialog_has_priority() {
    let mut state = dashboard_state();
    state.confirmation_dialog = Some(dockdeck::app::state::ConfirmationDialog {
        title: "Prune".to_string(),
        message: "Remove all unused containers?".to_string(),
        confirm_action: dockdeck::app::ConfirmAction::SetupLoadBalancer,
        selected_option: false,
    });

    assert_eq!(press(&mut state, KeyCode::Char('q')), None);
    assert_eq!(press(&mut state, KeyCode::Left), Some(AppEvent::ConfirmationToggle));
    assert_eq!(press(&mut state, KeyCode::Esc), Some(AppEvent::ConfirmationCancel));

    EventHandler::process_event(AppEvent::ConfirmationToggle, &mut state);
    EventHandler::process_event(AppEvent::ConfirmationConfirm, &mut state);
    assert!(state.confirmation_dialog.is_none());
    assert_eq!(state.pending_actions.len(), 1);
}

#[test]
fn test_form_keys_edit_fields() {
    let mut state = dashboard_state();
    state.form = Some(FormState::new(FormKind::PullImage));

    for ch in "redis".chars() {
        let event = press(&mut state, KeyCode::Char(ch)).unwrap();
        EventHandler::process_event(event, &mut state);
    }
    let event = press(&mut state, KeyCode::Backspace).unwrap();
    EventHandler::process_event(event, &mut state);

    assert_eq!(state.form.as_ref().unwrap().fields[0].value, "redi");
    assert_eq!(press(&mut state, KeyCode::Esc), Some(AppEvent::FormCancel));
}

#[test]
fn test_empty_form_submission_stays_open_with_error() {
    let mut state = dashboard_state();
    state.form = Some(FormState::new(FormKind::PullImage));

    EventHandler::process_event(AppEvent::FormSubmit, &mut state);

    let form = state.form.as_ref().unwrap();
    assert_eq!(form.error.as_deref(), Some("Image is required"));
    assert!(!form.submitting);
}

#[test]
fn test_login_keys_fill_fields() {
    let mut state = AppState::default();
    assert_eq!(state.current_view, View::Login);

    for ch in "bob".chars() {
        let event = press(&mut state, KeyCode::Char(ch)).unwrap();
        EventHandler::process_event(event, &mut state);
    }
    let event = press(&mut state, KeyCode::Tab).unwrap();
    EventHandler::process_event(event, &mut state);
    for ch in "pw".chars() {
        let event = press(&mut state, KeyCode::Char(ch)).unwrap();
        EventHandler::process_event(event, &mut state);
    }

    assert_eq!(state.login.username, "bob");
    assert_eq!(state.login.password, "pw");

    EventHandler::process_event(AppEvent::LoginSubmit, &mut state);
    assert!(state.login.submitting);
    assert_eq!(state.pending_actions.len(), 1);
}

#[test]
fn test_login_requires_both_fields() {
    let mut state = AppState::default();
    state.login.username = "bob".to_string();

    EventHandler::process_event(AppEvent::LoginSubmit, &mut state);

    assert!(!state.login.submitting);
    assert!(state.login.error.is_some());
    assert!(state.pending_actions.is_empty());
}

#[test]
fn test_terminal_view_without_session_offers_leave() {
    let mut state = dashboard_state();
    state.current_view = View::Terminal;

    let leave = EventHandler::handle_key_event(
        create_key_event_with_modifiers(KeyCode::Char('q'), KeyModifiers::CONTROL),
        &mut state,
    );
    assert_eq!(leave, Some(AppEvent::LeaveTerminal));
    assert_eq!(press(&mut state, KeyCode::Char('r')), Some(AppEvent::TerminalReconnect));
    assert_eq!(press(&mut state, KeyCode::Esc), Some(AppEvent::LeaveTerminal));
}

#[test]
fn test_sidebar_hides_admin_sections_for_regular_users() {
    let mut state = dashboard_state();
    let admin_sections = state.sidebar_items();

    state.client.user.as_mut().unwrap().role = "user_docker".to_string();
    let user_sections = state.sidebar_items();

    assert!(admin_sections.contains(&dockdeck::models::ResourceKind::Users));
    assert!(!user_sections.contains(&dockdeck::models::ResourceKind::Users));
    assert!(user_sections.contains(&dockdeck::models::ResourceKind::Clusters));
}

#[test]
fn test_opening_cluster_adds_cluster_sections() {
    let mut state = dashboard_state();
    state.open_cluster(4, "prod".to_string());

    assert_eq!(state.current_kind(), dockdeck::models::ResourceKind::Pods);
    assert!(state
        .sidebar_items()
        .contains(&dockdeck::models::ResourceKind::Deployments));
    assert_eq!(state.list_target.cluster_id, Some(4));

    assert_eq!(press(&mut state, KeyCode::Esc), Some(AppEvent::CloseCluster));
    EventHandler::process_event(AppEvent::CloseCluster, &mut state);
    assert!(state.open_cluster.is_none());
    assert_eq!(state.current_kind(), dockdeck::models::ResourceKind::Clusters);
}

#[test]
fn test_paste_goes_to_the_focused_text_field() {
    let mut state = dashboard_state();

    // Nothing takes text on the plain dashboard
    assert!(EventHandler::handle_paste("web", &state).is_empty());

    state.enter_search();
    for event in EventHandler::handle_paste("we\nb", &state) {
        EventHandler::process_event(event, &mut state);
    }
    assert_eq!(state.list.query(), "web");
    assert!(state.search_mode);

    EventHandler::process_event(AppEvent::SearchCancel, &mut state);
    state.form = Some(FormState::new(FormKind::PullImage));
    for event in EventHandler::handle_paste("redis:7", &state) {
        EventHandler::process_event(event, &mut state);
    }
    assert_eq!(state.form.as_ref().unwrap().fields[0].value, "redis:7");
    assert_eq!(state.list.query(), "");
}

#[test]
fn test_paste_is_dropped_by_a_closed_terminal() {
    let mut state = dashboard_state();
    state.current_view = View::Terminal;

    assert!(EventHandler::handle_paste("ls -la\r", &state).is_empty());
}

#[test]
fn test_paste_fills_login_field() {
    let mut state = AppState::default();

    for event in EventHandler::handle_paste("bob\n", &state) {
        EventHandler::process_event(event, &mut state);
    }

    assert_eq!(state.login.username, "bob");
    assert!(state.login.password.is_empty());
}
