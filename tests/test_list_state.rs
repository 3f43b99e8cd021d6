// ABOUTME: Search and paging behaviour of the resource table state over real row values

use dockdeck::models::ResourceKind;
use dockdeck::table::{pagination_bar, PageButton, ResourceListState, ResourceRow};
use pretty_assertions::assert_eq;

fn pods(names: &[(&str, &str)]) -> Vec<ResourceRow> {
    names
        .iter()
        .map(|(name, ns)| ResourceRow::new(*name, *name).category(*ns))
        .collect()
}

fn names(rows: Vec<&ResourceRow>) -> Vec<String> {
    rows.into_iter().map(|row| row.name.clone()).collect()
}

#[test]
fn test_query_filters_by_name_and_keeps_order() {
    let mut state = ResourceListState::new(ResourceKind::Pods);
    state.set_items(pods(&[("web-1", "default"), ("db-1", "prod"), ("web-2", "prod")]));

    state.set_search("web");
    assert_eq!(names(state.filtered()), vec!["web-1", "web-2"]);

    state.set_search("WEB-1");
    assert_eq!(names(state.filtered()), vec!["web-1"]);

    state.set_search("prod");
    assert_eq!(names(state.filtered()), vec!["db-1", "web-2"]);
}

#[test]
fn test_search_then_clear_restores_everything() {
    let mut state = ResourceListState::new(ResourceKind::Pods);
    state.set_items(pods(&[("web-1", "default"), ("db-1", "prod")]));

    state.set_search("nothing-matches");
    assert_eq!(state.filtered_count(), 0);
    assert_eq!(state.total_pages(), 1);
    assert_eq!(state.current_page(), 1);

    state.set_search("");
    assert_eq!(state.filtered_count(), 2);
}

#[test]
fn test_forty_five_items_make_three_pages() {
    let rows: Vec<ResourceRow> = (0..45)
        .map(|i| ResourceRow::new(i.to_string(), format!("pod-{i:02}")))
        .collect();
    let mut state = ResourceListState::new(ResourceKind::Pods).with_page_size(20);
    state.set_items(rows);

    assert_eq!(state.total_pages(), 3);
    state.set_page(5);
    assert_eq!(state.current_page(), 3);
    assert_eq!(state.visible().len(), 5);
    assert_eq!(state.visible()[0].name, "pod-40");

    state.set_page(0);
    assert_eq!(state.current_page(), 1);
    assert_eq!(state.visible().len(), 20);
}

#[test]
fn test_narrowing_search_pulls_page_back_into_range() {
    let mut rows: Vec<ResourceRow> = (0..40)
        .map(|i| ResourceRow::new(i.to_string(), format!("api-{i}")))
        .collect();
    rows.push(ResourceRow::new("x", "worker"));
    let mut state = ResourceListState::new(ResourceKind::Containers).with_page_size(10);
    state.set_items(rows);
    state.set_page(4);

    state.set_search("worker");

    assert_eq!(state.current_page(), 1);
    assert_eq!(names(state.visible()), vec!["worker"]);
}

#[test]
fn test_pagination_bar_for_last_page() {
    let buttons = pagination_bar(3, 3);

    assert_eq!(buttons.first(), Some(&PageButton::Prev { enabled: true }));
    assert_eq!(buttons.last(), Some(&PageButton::Next { enabled: false }));
    assert!(buttons.contains(&PageButton::Page {
        number: 3,
        current: true
    }));
    assert!(!buttons.contains(&PageButton::Gap));
}
