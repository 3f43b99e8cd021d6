// ABOUTME: Resource tables: list state, pagination, row model and the loader that fills them

pub mod list_state;
pub mod loader;
pub mod pagination;
pub mod row;

pub use list_state::{ResourceListState, Searchable, DEFAULT_PAGE_SIZE, PAGE_SIZES};
pub use loader::{load_rows, run_row_action, ActionOutcome, ListTarget, RowAction};
pub use pagination::{pagination_bar, PageButton};
pub use row::{k8s_row, ResourceRow, RowStatus, TableRow};
