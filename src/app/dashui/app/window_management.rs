//! Floating window focus tracking

use super::{DocEditApp, FocusedWindow};
use crate::app::dashui::search_window::SearchWindow;
use crate::app::dashui::window_focus::FocusableWindow;
use tracing::debug;

impl DocEditApp {
    /// Open a floating window and raise it above the others.
    pub(super) fn focus_window(&mut self, window: FocusedWindow) {
        let window_id = match window {
            FocusedWindow::Help => {
                self.help_window.open = true;
                self.help_window.window_id()
            }
            FocusedWindow::Log => {
                self.log_window.open = true;
                self.log_window.window_id()
            }
            FocusedWindow::Search => {
                let folder = self.workspace.tree.working_folder().to_string();
                self.search_window.open_in(&folder);
                SearchWindow::WINDOW_ID
            }
        };
        self.window_focus_manager.request_focus(window_id);
        self.set_focused_window(window);
    }

    pub(super) fn set_focused_window(&mut self, window: FocusedWindow) {
        if self.currently_focused_window == Some(window) {
            return;
        }
        if let Some(previous) = self.currently_focused_window {
            self.window_focus_order.retain(|w| *w != previous);
            self.window_focus_order.push(previous);
        }
        self.window_focus_order.retain(|w| *w != window);
        self.currently_focused_window = Some(window);
    }

    fn is_window_open(&self, window: FocusedWindow) -> bool {
        match window {
            FocusedWindow::Help => self.help_window.open,
            FocusedWindow::Log => self.log_window.open,
            FocusedWindow::Search => self.search_window.open,
        }
    }

    /// Close the focused window and hand focus to the one opened before it.
    /// Returns `false` when no floating window was open.
    pub(super) fn close_focused_window(&mut self) -> bool {
        let Some(window) = self.currently_focused_window else {
            return false;
        };
        match window {
            FocusedWindow::Help => self.help_window.open = false,
            FocusedWindow::Log => self.log_window.open = false,
            FocusedWindow::Search => self.search_window.open = false,
        }
        self.window_focus_order.retain(|w| *w != window);
        self.currently_focused_window = self.window_focus_order.pop();
        debug!(
            "Closed window: {:?}, new focus: {:?}",
            window, self.currently_focused_window
        );
        true
    }

    /// Forget windows the user closed with their title bar button.
    pub(super) fn update_window_tracking(&mut self) {
        let open: Vec<FocusedWindow> = self
            .window_focus_order
            .iter()
            .copied()
            .filter(|w| self.is_window_open(*w))
            .collect();
        self.window_focus_order = open;

        if let Some(current) = self.currently_focused_window {
            if !self.is_window_open(current) {
                self.currently_focused_window = self.window_focus_order.pop();
            }
        }
    }
}
