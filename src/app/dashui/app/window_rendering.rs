//! Floating windows and confirmation dialogs

use super::{DocEditApp, FocusedWindow};
use crate::app::dashui::dialogs;
use crate::app::dashui::search_window::SearchWindow;
use crate::app::notifications::error_window::NotificationDetailsWindow;
use eframe::egui;

impl DocEditApp {
    pub(super) fn handle_dialogs(&mut self, ctx: &egui::Context) {
        if let Some(message) = dialogs::show_close_confirmation(ctx, &self.workspace) {
            self.dispatch(message);
        }
        if let Some(message) = dialogs::show_delete_confirmation(ctx, &self.workspace) {
            self.dispatch(message);
        }
    }

    pub(super) fn handle_search_window(&mut self, ctx: &egui::Context) {
        if !self.search_window.open {
            return;
        }
        if self.currently_focused_window.is_none() {
            self.set_focused_window(FocusedWindow::Search);
        }
        let bring_to_front = self
            .window_focus_manager
            .should_bring_to_front(SearchWindow::WINDOW_ID);
        if bring_to_front {
            self.window_focus_manager
                .clear_bring_to_front(SearchWindow::WINDOW_ID);
        }

        let messages = self
            .search_window
            .show(ctx, &self.workspace.search, bring_to_front);
        self.dispatch_all(messages);
    }

    pub(super) fn handle_help_window(&mut self, ctx: &egui::Context) {
        self.window_focus_manager
            .show_window(&mut self.help_window, ctx, ());
    }

    pub(super) fn handle_log_window(&mut self, ctx: &egui::Context) {
        if self.log_window.open && self.currently_focused_window.is_none() {
            self.set_focused_window(FocusedWindow::Log);
        }
        // Drains the tail even while closed
        let bring_to_front = self.window_focus_manager.should_bring_to_front("log_window");
        self.log_window.show(ctx, bring_to_front);
        if bring_to_front {
            self.window_focus_manager.clear_bring_to_front("log_window");
        }
    }

    pub(super) fn handle_notification_details_window(&mut self, ctx: &egui::Context) {
        NotificationDetailsWindow::show(&mut self.notification_manager, ctx);
    }
}
