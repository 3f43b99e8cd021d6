// ABOUTME: Test UI display components including menu bar, table, help and login screens

mod common;

use common::{containers_json, harness, logged_in};
use dockdeck::app::View;
use dockdeck::components::LayoutComponent;
use dockdeck::config::ClientState;
use dockdeck::terminal::CLOSED_INDICATOR;
use ratatui::{backend::TestBackend, Terminal};

fn render(state: &dockdeck::app::AppState) -> String {
    let backend = TestBackend::new(120, 40);
    let mut terminal = Terminal::new(backend).unwrap();
    let mut layout = LayoutComponent::new();

    terminal
        .draw(|frame| {
            layout.render(frame, state);
        })
        .unwrap();

    let buffer = terminal.backend().buffer();
    buffer.content().iter().map(|cell| cell.symbol()).collect()
}

fn printable(content: &str) -> String {
    content
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .collect()
}

#[tokio::test]
async fn test_bottom_menu_bar_shows_container_actions() {
    let mut h = harness(logged_in("admin"));
    h.transport
        .route("GET", "containers", 200, &containers_json(&["web-1"]));
    h.app.init();
    h.app.settle().await;

    let content = render(&h.app.state);

    assert!(
        content.contains("[d]elete"),
        "Bottom menu bar should contain '[d]elete' but content was: {}",
        printable(&content)
    );
    assert!(content.contains("[e]xec"), "Should contain '[e]xec'");
    assert!(content.contains("[?]help"), "Should contain '[?]help'");
    assert!(content.contains("[q]uit"), "Should contain '[q]uit'");
}

#[tokio::test]
async fn test_table_shows_loaded_rows_and_header() {
    let mut h = harness(logged_in("admin"));
    h.transport
        .route("GET", "containers", 200, &containers_json(&["web-1", "db-1"]));
    h.app.init();
    h.app.settle().await;

    let content = render(&h.app.state);

    assert!(content.contains("web-1"), "Table should list web-1");
    assert!(content.contains("db-1"), "Table should list db-1");
    assert!(content.contains("Containers"), "Sidebar should list Containers");
}

#[tokio::test]
async fn test_help_screen_lists_row_actions() {
    let mut h = harness(logged_in("admin"));
    h.app.init();
    h.app.settle().await;
    h.app.state.help_visible = true;

    let content = render(&h.app.state);

    assert!(
        content.contains("Row Actions:"),
        "Help screen should contain 'Row Actions:' but content was: {}",
        printable(&content)
    );
}

#[test]
fn test_login_screen_when_signed_out() {
    let state = dockdeck::app::AppState::new(ClientState::default(), 20, 100);
    assert_eq!(state.current_view, View::Login);

    let content = render(&state);

    assert!(content.contains("Sign in"), "Login title should be visible");
    assert!(content.contains("Username"));
    assert!(!content.contains("[q]uit"), "Dashboard menu must stay hidden");
}

#[tokio::test]
async fn test_terminal_modal_shows_closed_indicator() {
    let mut h = harness(logged_in("admin"));
    h.transport
        .route("GET", "containers", 200, &containers_json(&["web-1"]));
    h.app.init();
    h.app.settle().await;
    h.app.state.on_screen_resize(120, 40);
    h.app.state.open_terminal_for_selected();
    h.app.settle().await;

    h.app.state.multiplexer.disconnect();
    let content = render(&h.app.state);

    assert_eq!(h.app.state.current_view, View::Terminal);
    assert!(content.contains("Container: web-1"));
    assert!(
        content.contains(CLOSED_INDICATOR),
        "Terminal modal should show the closed marker but content was: {}",
        printable(&content)
    );
}
