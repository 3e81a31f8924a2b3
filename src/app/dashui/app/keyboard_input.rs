//! Global keyboard shortcuts

use super::{DocEditApp, FocusedWindow};
use crate::app::dashui::dialogs;
use crate::app::workspace::WorkspaceMessage;
use eframe::egui::{self, Key, KeyboardShortcut, Modifiers};
use tracing::debug;

const SAVE: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::S);
const CLOSE_TAB: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::W);
const NEW_FILE: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::N);
const SEARCH: KeyboardShortcut =
    KeyboardShortcut::new(Modifiers::COMMAND.plus(Modifiers::SHIFT), Key::F);
const REFRESH: KeyboardShortcut = KeyboardShortcut::new(Modifiers::NONE, Key::F5);
const HELP: KeyboardShortcut = KeyboardShortcut::new(Modifiers::NONE, Key::F1);
const ESCAPE: KeyboardShortcut = KeyboardShortcut::new(Modifiers::NONE, Key::Escape);

impl DocEditApp {
    pub(super) fn handle_keyboard_input(&mut self, ctx: &egui::Context) {
        let consume = |shortcut: &KeyboardShortcut| ctx.input_mut(|i| i.consume_shortcut(shortcut));

        if consume(&ESCAPE) {
            self.handle_escape();
            return;
        }
        // Everything else waits until the confirmation is answered
        if dialogs::any_open(&self.workspace) {
            return;
        }

        if consume(&SAVE) {
            debug!("Save shortcut");
            self.dispatch(WorkspaceMessage::SaveActive);
        }
        if consume(&CLOSE_TAB) {
            if let Some(active) = self.workspace.tabs.active().map(str::to_string) {
                self.dispatch(WorkspaceMessage::CloseTab(active));
            }
        }
        if consume(&SEARCH) {
            self.focus_window(FocusedWindow::Search);
        }
        if consume(&NEW_FILE) {
            self.file_tree_panel.focus_new_entry();
        }
        if consume(&REFRESH) {
            self.dispatch(WorkspaceMessage::Refresh);
        }
        if consume(&HELP) {
            self.focus_window(FocusedWindow::Help);
        }
    }

    /// Escape answers an open confirmation with Cancel, otherwise closes the
    /// focused floating window.
    fn handle_escape(&mut self) {
        if let Some(cancel) = dialogs::cancel_message(&self.workspace) {
            self.dispatch(cancel);
        } else {
            self.close_focused_window();
        }
    }
}
