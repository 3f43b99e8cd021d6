// ABOUTME: Row actions through the app loop: confirmation, failures, role checks and reloads

mod common;

use common::{containers_json, harness, logged_in};
use dockdeck::app::{NotificationType, View};
use dockdeck::models::ResourceKind;
use dockdeck::table::RowAction;

const TWO_CONTAINERS: &str = r#"[
    {"id":"7","name":"/web-1","image":"nginx","state":"running","status":"Up 2 hours"},
    {"id":"8","name":"/db-1","image":"postgres","state":"exited","status":"Exited (0)"}
]"#;

#[tokio::test]
async fn test_failed_delete_keeps_rows_and_shows_server_message() {
    let mut h = harness(logged_in("admin"));
    h.transport.route("GET", "containers", 200, TWO_CONTAINERS);
    h.transport
        .route("DELETE", "containers/7/remove", 500, "in use");
    h.app.init();
    h.app.settle().await;
    assert_eq!(h.app.state.list.items().len(), 2);

    h.app.state.request_row_action(RowAction::Delete);
    let dialog = h.app.state.confirmation_dialog.as_mut().expect("delete asks first");
    assert!(dialog.message.contains("web-1"));
    dialog.selected_option = true;
    h.app.state.confirm_dialog();
    h.app.settle().await;

    assert_eq!(h.transport.calls_to("DELETE", "containers/7/remove"), 1);
    assert_eq!(h.app.state.list.items().len(), 2);
    let last = h.app.state.notifications.last().expect("error notification");
    assert_eq!(last.notification_type, NotificationType::Error);
    assert_eq!(last.message, "in use");
}

#[tokio::test]
async fn test_declined_confirmation_sends_nothing() {
    let mut h = harness(logged_in("admin"));
    h.transport.route("GET", "containers", 200, TWO_CONTAINERS);
    h.app.init();
    h.app.settle().await;

    h.app.state.request_row_action(RowAction::Delete);
    h.app.state.confirm_dialog();
    h.app.settle().await;

    assert!(h.app.state.confirmation_dialog.is_none());
    assert_eq!(h.transport.calls_to("DELETE", "containers/7/remove"), 0);
}

#[tokio::test]
async fn test_successful_stop_reloads_the_table() {
    let mut h = harness(logged_in("admin"));
    h.transport.route("GET", "containers", 200, TWO_CONTAINERS);
    h.app.init();
    h.app.settle().await;
    let loads_before = h.transport.calls_to("GET", "containers");

    h.app.state.request_row_action(RowAction::Stop);
    h.app.settle().await;

    assert_eq!(h.transport.calls_to("POST", "containers/7/stop"), 1);
    assert!(h.transport.calls_to("GET", "containers") > loads_before);
    let last = h.app.state.notifications.last().unwrap();
    assert_eq!(last.notification_type, NotificationType::Success);
    assert_eq!(last.message, "web-1 stopped");
}

#[tokio::test]
async fn test_view_only_user_is_refused_before_any_request() {
    let mut h = harness(logged_in("user_k8s_view,user_cicd_view"));
    h.transport.route("GET", "containers", 200, TWO_CONTAINERS);
    h.app.init();
    h.app.settle().await;

    h.app.state.request_row_action(RowAction::Delete);
    h.app.state.open_create_form();
    h.app.state.request_prune();
    h.app.settle().await;

    assert!(h.app.state.confirmation_dialog.is_none());
    assert!(h.app.state.form.is_none());
    assert_eq!(h.transport.calls_to("DELETE", "containers/7/remove"), 0);
    assert!(h
        .app
        .state
        .notifications
        .iter()
        .all(|n| n.notification_type == NotificationType::Error));
    assert_eq!(h.app.state.notifications.len(), 3);
}

#[tokio::test]
async fn test_inspect_opens_detail_overlay() {
    let mut h = harness(logged_in("admin"));
    h.transport.route("GET", "containers", 200, TWO_CONTAINERS);
    h.transport
        .route("GET", "containers/7/inspect", 200, r#"{"Id":"7","State":{"Running":true}}"#);
    h.app.init();
    h.app.settle().await;

    h.app.state.request_row_action(RowAction::Inspect);
    h.app.settle().await;

    let detail = h.app.state.detail.as_ref().expect("detail overlay");
    assert_eq!(detail.title, "Inspect web-1");
    assert!(detail.body.contains("Running"));
}

#[tokio::test]
async fn test_expired_token_returns_to_login() {
    let mut h = harness(logged_in("admin"));
    h.transport.route("GET", "containers", 401, "");
    h.app.init();
    h.app.settle().await;

    assert_eq!(h.app.state.current_view, View::Login);
    assert!(!h.app.state.client.is_logged_in());
    assert!(h.app.state.login.error.is_some());
    let persisted = dockdeck::config::ClientStore::load(h.store.as_ref());
    assert!(persisted.auth_token.is_none());
}

#[tokio::test]
async fn test_stale_list_result_is_discarded() {
    let mut h = harness(logged_in("admin"));
    h.transport
        .route("GET", "containers", 200, &containers_json(&["web-1", "web-2"]));
    h.transport.route(
        "GET",
        "images",
        200,
        r#"[{"id":"sha256:abc","repository":"nginx","tag":"latest","size":1000}]"#,
    );
    h.app.init();
    // Container load goes out, then the user switches to images before it lands
    h.app.tick();
    h.app.state.select_kind(ResourceKind::Images);
    h.app.settle().await;

    assert_eq!(h.app.state.current_kind(), ResourceKind::Images);
    let names: Vec<&str> = h
        .app
        .state
        .list
        .items()
        .iter()
        .map(|row| row.name.as_str())
        .collect();
    assert_eq!(names, vec!["nginx"]);
}

#[tokio::test]
async fn test_reload_keeps_search_query() {
    let mut h = harness(logged_in("admin"));
    h.transport
        .route("GET", "containers", 200, &containers_json(&["web-1", "db-1", "web-2"]));
    h.app.init();
    h.app.settle().await;

    for ch in "web".chars() {
        h.app.state.search_input(ch);
    }
    assert_eq!(h.app.state.list.filtered_count(), 2);

    h.app.state.refresh();
    h.app.settle().await;

    assert_eq!(h.app.state.list.query(), "web");
    assert_eq!(h.app.state.list.filtered_count(), 2);
}

#[tokio::test]
async fn test_sign_out_forgets_previous_users_cluster_and_rows() {
    let mut h = harness(logged_in("admin"));
    h.transport.route("GET", "containers", 200, TWO_CONTAINERS);
    h.transport
        .route("GET", "hosts", 200, r#"[{"id":1,"name":"local"}]"#);
    h.app.init();
    h.app.settle().await;
    h.app.state.open_cluster(9, "prod-cluster".to_string());
    h.app.settle().await;
    assert!(h.app.state.sidebar_items().contains(&ResourceKind::Pods));
    assert_eq!(h.app.state.hosts.len(), 1);

    h.transport.route("GET", "containers", 401, "");
    h.app.state.select_kind(ResourceKind::Containers);
    h.app.settle().await;

    let state = &h.app.state;
    assert_eq!(state.current_view, View::Login);
    assert!(state.open_cluster.is_none());
    assert!(state.namespaces.is_empty());
    assert!(state.hosts.is_empty());
    assert!(state.list.items().is_empty());
    assert_eq!(state.current_kind(), ResourceKind::Containers);
    assert!(!state.sidebar_items().contains(&ResourceKind::Pods));
}
