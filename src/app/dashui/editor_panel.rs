use crate::app::syntax::syntax_for_path;
use crate::app::workspace::{EditorPhase, Workspace, WorkspaceMessage};
use eframe::egui;
use egui::{Color32, RichText};
use egui_code_editor::{CodeEditor, ColorTheme};

const FONT_SIZE: f32 = 14.0;

/// Tab strip and editor for the active file.
pub struct EditorPanel;

impl EditorPanel {
    pub fn show(
        ui: &mut egui::Ui,
        workspace: &mut Workspace,
        code_theme: ColorTheme,
    ) -> Vec<WorkspaceMessage> {
        let mut messages = Vec::new();

        if workspace.tabs.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(60.0);
                ui.label("Open a file from the tree, or create one with Ctrl+N");
            });
            return messages;
        }

        Self::tab_bar(ui, workspace, &mut messages);
        ui.separator();

        let Some(active) = workspace.tabs.active().map(str::to_string) else {
            return messages;
        };
        let dirty = workspace.tabs.is_dirty(&active);
        Self::footer(ui, workspace, &active, dirty, &mut messages);

        let phase = workspace.editor.get(&active).map(|buffer| buffer.phase().clone());
        match phase {
            Some(EditorPhase::Editing) => {
                if let Some(text) = workspace.editor.editable_text_mut(&active) {
                    let rows = (ui.available_height() / (FONT_SIZE * 1.4)).max(10.0) as usize;
                    let output = CodeEditor::default()
                        .id_source(format!("editor::{}", active))
                        .with_rows(rows)
                        .with_fontsize(FONT_SIZE)
                        .with_theme(code_theme)
                        .with_syntax(syntax_for_path(&active))
                        .with_numlines(true)
                        .show(ui, text);
                    if output.response.changed() {
                        messages.push(WorkspaceMessage::BufferEdited(active));
                    }
                }
            }
            Some(EditorPhase::LoadFailed(error)) => {
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    ui.colored_label(
                        Color32::from_rgb(220, 50, 50),
                        format!("Could not load {}", active),
                    );
                    ui.label(error);
                    if ui.button("Retry").clicked() {
                        messages.push(WorkspaceMessage::RetryLoad(active.clone()));
                    }
                });
            }
            Some(EditorPhase::Loading) | None => {
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    ui.spinner();
                    ui.weak(format!("Loading {}…", active));
                });
            }
        }

        messages
    }

    fn tab_bar(ui: &mut egui::Ui, workspace: &Workspace, messages: &mut Vec<WorkspaceMessage>) {
        egui::ScrollArea::horizontal()
            .id_salt("editor_tabs")
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    for file in workspace.tabs.files() {
                        let is_active = workspace.tabs.active() == Some(file.path.as_str());
                        let label = if file.dirty {
                            format!("● {}", file.name())
                        } else {
                            file.name().to_string()
                        };

                        ui.group(|ui| {
                            ui.spacing_mut().item_spacing.x = 4.0;
                            if ui
                                .selectable_label(is_active, label)
                                .on_hover_text(&file.path)
                                .clicked()
                            {
                                messages.push(WorkspaceMessage::FocusTab(file.path.clone()));
                            }
                            if ui.small_button("✕").on_hover_text("Close").clicked() {
                                messages.push(WorkspaceMessage::CloseTab(file.path.clone()));
                            }
                        });
                    }
                });
            });
    }

    fn footer(
        ui: &mut egui::Ui,
        workspace: &Workspace,
        active: &str,
        dirty: bool,
        messages: &mut Vec<WorkspaceMessage>,
    ) {
        egui::TopBottomPanel::bottom("editor_footer")
            .show_separator_line(true)
            .show_inside(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.monospace(active);
                    if let Some(buffer) = workspace.editor.get(active) {
                        if buffer.is_editing() {
                            ui.separator();
                            ui.weak(format!("{} lines", buffer.line_count()));
                        }
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui
                            .add_enabled(dirty, egui::Button::new("Save"))
                            .on_hover_text("Ctrl+S")
                            .clicked()
                        {
                            messages.push(WorkspaceMessage::Save(active.to_string()));
                        }
                        if dirty {
                            ui.label(
                                RichText::new("Modified").color(Color32::from_rgb(255, 190, 70)),
                            );
                        }
                    });
                });
            });
    }
}
