//! Side panel listing the working folder.
//!
//! The panel never mutates the workspace; every click becomes a
//! [`WorkspaceMessage`] returned to the app, which dispatches it.

use crate::app::paths;
use crate::app::workspace::{FolderStatus, TreeEntry, Workspace, WorkspaceMessage};
use eframe::egui;
use egui::{Color32, RichText};

const INDENT: f32 = 14.0;

#[derive(Default)]
pub struct FileTreePanel {
    new_entry_name: String,
    /// Path being renamed and the name typed so far
    renaming: Option<(String, String)>,
    rename_needs_focus: bool,
    new_entry_needs_focus: bool,
}

impl FileTreePanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move keyboard focus to the new entry field on the next frame.
    pub fn focus_new_entry(&mut self) {
        self.new_entry_needs_focus = true;
    }

    pub fn show(&mut self, ui: &mut egui::Ui, workspace: &Workspace) -> Vec<WorkspaceMessage> {
        let mut messages = Vec::new();
        let folder = workspace.tree.working_folder().to_string();

        self.navigation_bar(ui, &folder, &mut messages);
        ui.separator();
        self.new_entry_bar(ui, workspace, &folder, &mut messages);

        if let Some(error) = workspace.tree.inline_error() {
            ui.add_space(4.0);
            ui.label(RichText::new(error).color(Color32::from_rgb(220, 50, 50)));
        }
        ui.separator();

        egui::ScrollArea::vertical()
            .id_salt("file_tree_scroll")
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                self.folder_contents(ui, workspace, &folder, 0, &mut messages);
            });

        messages
    }

    fn navigation_bar(&self, ui: &mut egui::Ui, folder: &str, messages: &mut Vec<WorkspaceMessage>) {
        ui.horizontal_wrapped(|ui| {
            if ui
                .add_enabled(!folder.is_empty(), egui::Button::new("⬆"))
                .on_hover_text("Parent folder")
                .clicked()
            {
                messages.push(WorkspaceMessage::NavigateUp);
            }
            if ui.button("⟳").on_hover_text("Refresh (F5)").clicked() {
                messages.push(WorkspaceMessage::Refresh);
            }
            ui.separator();

            let crumbs = paths::breadcrumbs(folder);
            let last = crumbs.len().saturating_sub(1);
            for (index, (label, path)) in crumbs.into_iter().enumerate() {
                if index > 0 {
                    ui.label("/");
                }
                if index == last {
                    ui.label(RichText::new(label).strong());
                } else if ui.link(label).clicked() {
                    messages.push(WorkspaceMessage::NavigateTo(path));
                }
            }
        });
    }

    fn new_entry_bar(
        &mut self,
        ui: &mut egui::Ui,
        workspace: &Workspace,
        folder: &str,
        messages: &mut Vec<WorkspaceMessage>,
    ) {
        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.new_entry_name)
                    .hint_text("new name, e.g. notes/todo.txt")
                    .desired_width(ui.available_width() - 90.0),
            );
            if self.new_entry_needs_focus {
                response.request_focus();
                self.new_entry_needs_focus = false;
            }
            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            let file_clicked = ui.button("📄").on_hover_text("Create file").clicked();
            let folder_clicked = ui.button("📁").on_hover_text("Create folder").clicked();

            if submitted || file_clicked || folder_clicked {
                let name = self.new_entry_name.trim().to_string();
                // Keep the text when it will be rejected so it can be corrected
                if workspace.tree.validate_new_entry(folder, &name).is_ok() {
                    self.new_entry_name.clear();
                }
                messages.push(WorkspaceMessage::CreateEntry {
                    name,
                    is_folder: folder_clicked,
                });
            }
        });
    }

    fn folder_contents(
        &mut self,
        ui: &mut egui::Ui,
        workspace: &Workspace,
        folder: &str,
        depth: usize,
        messages: &mut Vec<WorkspaceMessage>,
    ) {
        match workspace.tree.status(folder) {
            FolderStatus::Unloaded | FolderStatus::Loading => {
                ui.horizontal(|ui| {
                    ui.add_space(depth as f32 * INDENT);
                    ui.spinner();
                    ui.weak("Loading…");
                });
            }
            FolderStatus::Error(message) => {
                ui.horizontal(|ui| {
                    ui.add_space(depth as f32 * INDENT);
                    ui.colored_label(Color32::from_rgb(220, 50, 50), message);
                });
            }
            FolderStatus::Loaded(entries) if entries.is_empty() && depth == 0 => {
                ui.weak("This folder is empty");
            }
            FolderStatus::Loaded(entries) => {
                for entry in entries {
                    self.entry_row(ui, workspace, entry, depth, messages);
                    if entry.is_folder && workspace.tree.is_expanded(&entry.path) {
                        self.folder_contents(ui, workspace, &entry.path, depth + 1, messages);
                    }
                }
            }
        }
    }

    fn entry_row(
        &mut self,
        ui: &mut egui::Ui,
        workspace: &Workspace,
        entry: &TreeEntry,
        depth: usize,
        messages: &mut Vec<WorkspaceMessage>,
    ) {
        ui.horizontal(|ui| {
            ui.add_space(depth as f32 * INDENT);

            if entry.is_folder {
                let arrow = if workspace.tree.is_expanded(&entry.path) {
                    "▼"
                } else {
                    "▶"
                };
                if ui.small_button(arrow).clicked() {
                    messages.push(WorkspaceMessage::ToggleFolder(entry.path.clone()));
                }
            } else {
                ui.add_space(ui.spacing().icon_width);
            }

            if self.is_renaming(&entry.path) {
                self.rename_field(ui, messages);
                return;
            }

            let response = if entry.is_folder {
                let response = ui.selectable_label(false, format!("📁 {}", entry.name));
                if response.clicked() {
                    messages.push(WorkspaceMessage::NavigateTo(entry.path.clone()));
                }
                response
            } else {
                let active = workspace.tabs.active() == Some(entry.path.as_str());
                let mut label = format!("📄 {}", entry.name);
                if workspace.tabs.is_dirty(&entry.path) {
                    label.push_str(" ●");
                }
                let response = ui.selectable_label(active, label);
                if response.clicked() {
                    messages.push(WorkspaceMessage::OpenFile(entry.path.clone()));
                }
                response
            };

            response.context_menu(|ui| {
                if !entry.is_folder && ui.button("Open").clicked() {
                    messages.push(WorkspaceMessage::OpenFile(entry.path.clone()));
                    ui.close();
                }
                if ui.button("Rename…").clicked() {
                    self.renaming = Some((entry.path.clone(), entry.name.clone()));
                    self.rename_needs_focus = true;
                    ui.close();
                }
                if ui.button("Delete…").clicked() {
                    messages.push(WorkspaceMessage::RequestDelete(entry.path.clone()));
                    ui.close();
                }
            });
        });
    }

    fn is_renaming(&self, path: &str) -> bool {
        self.renaming.as_ref().is_some_and(|(p, _)| p == path)
    }

    fn rename_field(&mut self, ui: &mut egui::Ui, messages: &mut Vec<WorkspaceMessage>) {
        let Some((path, name)) = self.renaming.as_mut() else {
            return;
        };
        let response = ui.add(egui::TextEdit::singleline(name).desired_width(160.0));
        if self.rename_needs_focus {
            response.request_focus();
            self.rename_needs_focus = false;
        }

        if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.renaming = None;
        } else if response.lost_focus() {
            // Enter commits; clicking elsewhere abandons the edit
            if ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                messages.push(WorkspaceMessage::Rename {
                    path: path.clone(),
                    new_name: name.trim().to_string(),
                });
            }
            self.renaming = None;
        }
    }
}
