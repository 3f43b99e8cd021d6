// ABOUTME: Search and pagination state for one resource table
// The visible slice is a pure function of (items, query, page, page size)

use crate::models::{NamespaceFilter, ResourceKind};

pub const PAGE_SIZES: [usize; 4] = [10, 20, 50, 100];
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// What a table row can be searched by: its name and one category column
/// (namespace for Kubernetes objects, image, driver or role for the rest).
pub trait Searchable {
    fn primary_name(&self) -> &str;
    fn category(&self) -> &str;

    fn matches(&self, needle_lower: &str) -> bool {
        needle_lower.is_empty()
            || self.primary_name().to_lowercase().contains(needle_lower)
            || self.category().to_lowercase().contains(needle_lower)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceListState<T> {
    pub kind: ResourceKind,
    pub namespace_filter: NamespaceFilter,
    query: String,
    current_page: usize,
    page_size: usize,
    items: Vec<T>,
}

impl<T: Searchable> ResourceListState<T> {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            namespace_filter: NamespaceFilter::All,
            query: String::new(),
            current_page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            items: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Replaces the working set and resets search and paging.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.query.clear();
        self.current_page = 1;
    }

    /// Reload of the same list: keeps the query, pulls the page back into range.
    pub fn refresh_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.clamp_page();
    }

    pub fn set_search(&mut self, query: &str) {
        self.query = query.to_string();
        self.clamp_page();
    }

    pub fn set_page(&mut self, page: usize) {
        self.current_page = page;
        self.clamp_page();
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.clamp_page();
    }

    pub fn next_page(&mut self) {
        self.set_page(self.current_page + 1);
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.current_page.saturating_sub(1));
    }

    /// Steps through the page size choices, wrapping around.
    pub fn cycle_page_size(&mut self) {
        let next = PAGE_SIZES
            .iter()
            .position(|size| *size == self.page_size)
            .map_or(DEFAULT_PAGE_SIZE, |index| {
                PAGE_SIZES[(index + 1) % PAGE_SIZES.len()]
            });
        self.set_page_size(next);
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn filtered(&self) -> Vec<&T> {
        let needle = self.query.to_lowercase();
        self.items.iter().filter(|item| item.matches(&needle)).collect()
    }

    pub fn filtered_count(&self) -> usize {
        let needle = self.query.to_lowercase();
        self.items.iter().filter(|item| item.matches(&needle)).count()
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered_count(), self.page_size)
    }

    pub fn visible(&self) -> Vec<&T> {
        let start = (self.current_page - 1) * self.page_size;
        self.filtered()
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect()
    }

    fn clamp_page(&mut self) {
        self.current_page = self.current_page.clamp(1, self.total_pages());
    }
}

pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}
