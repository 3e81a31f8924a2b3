//! Desktop user interface.
//!
//! Panels and windows read the [`crate::app::workspace::Workspace`] and return
//! [`crate::app::workspace::WorkspaceMessage`]s; only the app shell in
//! [`app`] dispatches them. Floating windows implement
//! [`window_focus::FocusableWindow`] so the shell can raise them on request.

pub mod app;
pub mod dialogs;
pub mod editor_panel;
pub mod file_tree_panel;
pub mod help_window;
pub mod log_window;
pub mod menu;
pub mod search_window;
pub mod window_focus;

pub use app::{DocEditApp, ThemeChoice};
pub use window_focus::{FocusableWindow, WindowFocusManager};
