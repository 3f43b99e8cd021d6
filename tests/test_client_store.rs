// ABOUTME: Persisted client keys: file round trip, sidebar flag, host switching and login

mod common;

use common::{harness, logged_in, user};
use dockdeck::app::View;
use dockdeck::config::{ClientState, ClientStore, FileStore};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn test_file_store_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileStore::in_dir(temp_dir.path().join("nested"));
    let state = ClientState {
        active_host_id: 4,
        sidebar_collapsed: true,
        auth_token: Some("abc".to_string()),
        user: Some(user("admin")),
    };

    store.save(&state).unwrap();

    assert!(store.path().exists());
    assert_eq!(store.load(), state);
}

#[tokio::test]
async fn test_sidebar_toggle_is_persisted() {
    let mut h = harness(logged_in("admin"));
    h.app.init();
    h.app.settle().await;

    h.app.state.toggle_sidebar();
    h.app.settle().await;

    assert!(h.store.load().sidebar_collapsed);
}

#[tokio::test]
async fn test_host_switch_updates_header_and_store() {
    let mut h = harness(logged_in("admin"));
    h.app.init();
    h.app.settle().await;
    let sent_before = h.transport.requests().len();

    h.app.state.switch_host(2);
    h.app.settle().await;

    assert_eq!(h.store.load().active_host_id, 2);
    let after = h.transport.requests();
    let fresh = &after[sent_before..];
    assert!(!fresh.is_empty());
    assert!(fresh
        .iter()
        .all(|r| r.header("X-Docker-Host-ID") == Some("2")));
    assert!(fresh
        .iter()
        .all(|r| r.header("Authorization") == Some("Bearer token-123")));
}

#[tokio::test]
async fn test_login_stores_token_and_opens_dashboard() {
    let mut h = harness(ClientState::default());
    h.transport.route(
        "POST",
        "auth/login",
        200,
        r#"{"token":"fresh","user":{"id":9,"username":"bob","role":"user_docker"}}"#,
    );
    h.app.init();
    h.app.settle().await;
    assert_eq!(h.app.state.current_view, View::Login);

    h.app.state.login.username = "bob".to_string();
    h.app.state.login.password = "secret".to_string();
    h.app.state.submit_login();
    h.app.settle().await;

    assert_eq!(h.app.state.current_view, View::Dashboard);
    let persisted = h.store.load();
    assert_eq!(persisted.auth_token.as_deref(), Some("fresh"));
    assert_eq!(persisted.user.map(|u| u.username), Some("bob".to_string()));

    let login = h
        .transport
        .requests()
        .into_iter()
        .find(|r| r.path == "auth/login")
        .unwrap();
    assert_eq!(login.header("Authorization"), None);
    assert!(h
        .transport
        .requests()
        .iter()
        .filter(|r| r.path == "containers")
        .all(|r| r.header("Authorization") == Some("Bearer fresh")));
}

#[tokio::test]
async fn test_rejected_login_stays_on_form() {
    let mut h = harness(ClientState::default());
    h.transport
        .route("POST", "auth/login", 401, "invalid credentials");
    h.app.init();

    h.app.state.login.username = "bob".to_string();
    h.app.state.login.password = "wrong".to_string();
    h.app.state.submit_login();
    h.app.settle().await;

    assert_eq!(h.app.state.current_view, View::Login);
    assert!(!h.app.state.login.submitting);
    assert_eq!(h.app.state.login.error.as_deref(), Some("invalid credentials"));
    assert!(h.store.load().auth_token.is_none());
}
