//! Menu bar, status bar, side and central panels

use super::{DocEditApp, FocusedWindow};
use crate::app::dashui::editor_panel::EditorPanel;
use crate::app::dashui::menu::{self, MenuAction, MenuStatus};
use crate::app::workspace::WorkspaceMessage;
use eframe::egui;

impl DocEditApp {
    pub(super) fn render_top_menu_bar(&mut self, ctx: &egui::Context) {
        let status = MenuStatus {
            working_folder: self.workspace.tree.working_folder().to_string(),
            active_file: self.workspace.tabs.active().map(str::to_string),
            dirty_count: self.workspace.tabs.dirty_count(),
        };

        let mut menu_action = MenuAction::None;
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                menu_action =
                    menu::build_menu(ui, ctx, &mut self.theme, &mut self.log_window.open, &status);
            });
        });

        match menu_action {
            MenuAction::ThemeChanged => {
                tracing::info!("Theme changed to {}", self.theme);
            }
            MenuAction::NewFile | MenuAction::NewFolder => {
                self.file_tree_panel.focus_new_entry();
            }
            MenuAction::Save => self.dispatch(WorkspaceMessage::SaveActive),
            MenuAction::CloseTab => {
                if let Some(active) = status.active_file {
                    self.dispatch(WorkspaceMessage::CloseTab(active));
                }
            }
            MenuAction::Search => self.focus_window(FocusedWindow::Search),
            MenuAction::Refresh => self.dispatch(WorkspaceMessage::Refresh),
            MenuAction::Help => self.focus_window(FocusedWindow::Help),
            MenuAction::Quit => {
                tracing::info!("Quit requested from the menu");
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
            MenuAction::None => {}
        }
    }

    pub(super) fn render_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if !self.workspace.session_ready() {
                        ui.spinner();
                        ui.weak("Restoring session…");
                    } else {
                        ui.weak(self.workspace.status());
                    }

                    self.notification_manager.render_status_bar_indicator(ui);

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.weak(&self.config.store_url);
                        if cfg!(debug_assertions) {
                            ui.label(
                                egui::RichText::new(format!(
                                    "Debug Build - {}@{}",
                                    env!("GIT_BRANCH"),
                                    env!("GIT_COMMIT")
                                ))
                                .small()
                                .color(egui::Color32::from_rgb(255, 165, 0)),
                            );
                        }
                    });
                });
            });
    }

    pub(super) fn render_file_tree_panel(&mut self, ctx: &egui::Context) {
        let messages = egui::SidePanel::left("file_tree_panel")
            .resizable(true)
            .default_width(260.0)
            .min_width(180.0)
            .show(ctx, |ui| self.file_tree_panel.show(ui, &self.workspace))
            .inner;
        self.dispatch_all(messages);
    }

    pub(super) fn render_central_panel(&mut self, ctx: &egui::Context) {
        let code_theme = self.theme.code_theme();
        let messages = egui::CentralPanel::default()
            .show(ctx, |ui| EditorPanel::show(ui, &mut self.workspace, code_theme))
            .inner;
        self.dispatch_all(messages);
    }
}
