// ABOUTME: UI components for the TUI interface: sidebar, resource table, terminal modal and overlays

pub mod confirmation_dialog;
pub mod detail_overlay;
pub mod form_modal;
pub mod help;
pub mod layout;
pub mod login;
pub mod notifications;
pub mod resource_table;
pub mod sidebar;
pub mod terminal_modal;

pub use confirmation_dialog::ConfirmationDialogComponent;
pub use detail_overlay::DetailOverlayComponent;
pub use form_modal::FormModalComponent;
pub use help::HelpComponent;
pub use layout::LayoutComponent;
pub use login::LoginComponent;
pub use notifications::NotificationsComponent;
pub use resource_table::ResourceTableComponent;
pub use sidebar::SidebarComponent;
pub use terminal_modal::TerminalModalComponent;
