//! The docedit window.
//!
//! `DocEditApp` is split across several files:
//! - initialization: creation from the eframe context and the store backend
//! - theme: Catppuccin themes and the matching editor colours
//! - event_handling: running workspace effects and draining store events
//! - keyboard_input: global shortcuts
//! - window_management: which floating window has focus
//! - rendering: menu bar, status bar, side and central panels
//! - window_rendering: floating windows and dialogs

use super::file_tree_panel::FileTreePanel;
use super::help_window::HelpWindow;
use super::log_window::LogWindow;
use super::search_window::SearchWindow;
use super::window_focus::WindowFocusManager;
use crate::app::config::AppConfig;
use crate::app::notifications::NotificationManager;
use crate::app::tasks::StoreTaskRunner;
use crate::app::workspace::Workspace;
use eframe::egui;

mod event_handling;
mod initialization;
mod keyboard_input;
mod rendering;
mod theme;
mod window_management;
mod window_rendering;

#[derive(serde::Deserialize, serde::Serialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ThemeChoice {
    #[default]
    Latte,
    Frappe,
    Macchiato,
    Mocha,
}

impl std::fmt::Display for ThemeChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeChoice::Latte => write!(f, "Latte"),
            ThemeChoice::Frappe => write!(f, "Frappe"),
            ThemeChoice::Macchiato => write!(f, "Macchiato"),
            ThemeChoice::Mocha => write!(f, "Mocha"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedWindow {
    Help,
    Log,
    Search,
}

#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct DocEditApp {
    pub theme: ThemeChoice,
    /// Reopen the search window on the next start
    pub search_window_open: bool,

    #[serde(skip)]
    pub workspace: Workspace,
    #[serde(skip)]
    runner: Option<StoreTaskRunner>,
    #[serde(skip)]
    pub config: AppConfig,
    #[serde(skip)]
    pub notification_manager: NotificationManager,
    #[serde(skip)]
    pub help_window: HelpWindow,
    #[serde(skip)]
    pub log_window: LogWindow,
    #[serde(skip)]
    pub search_window: SearchWindow,
    #[serde(skip)]
    file_tree_panel: FileTreePanel,
    #[serde(skip)]
    window_focus_manager: WindowFocusManager,
    #[serde(skip)]
    currently_focused_window: Option<FocusedWindow>,
    #[serde(skip)]
    window_focus_order: Vec<FocusedWindow>,
}

impl Default for DocEditApp {
    fn default() -> Self {
        Self {
            theme: ThemeChoice::default(),
            search_window_open: false,
            workspace: Workspace::new(),
            runner: None,
            config: AppConfig::default(),
            notification_manager: NotificationManager::new(),
            help_window: HelpWindow::new(),
            log_window: LogWindow::default(),
            search_window: SearchWindow::new(),
            file_tree_panel: FileTreePanel::new(),
            window_focus_manager: WindowFocusManager::new(),
            currently_focused_window: None,
            window_focus_order: Vec::new(),
        }
    }
}

impl eframe::App for DocEditApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.search_window_open = self.search_window.open;
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let frame_start = std::time::Instant::now();

        self.process_store_events();
        self.handle_keyboard_input(ctx);

        self.render_top_menu_bar(ctx);
        self.render_status_bar(ctx);
        self.render_file_tree_panel(ctx);
        self.render_central_panel(ctx);

        self.handle_dialogs(ctx);
        self.handle_search_window(ctx);
        self.handle_help_window(ctx);
        self.handle_log_window(ctx);
        self.handle_notification_details_window(ctx);
        self.update_window_tracking();

        let frame_duration = frame_start.elapsed();
        if frame_duration.as_millis() > 50 {
            tracing::debug!("Slow frame: {:?}", frame_duration);
        }
    }
}
