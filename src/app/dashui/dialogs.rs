//! Confirmation dialogs for closing a modified tab and deleting an entry.

use crate::app::paths;
use crate::app::workspace::{CloseDecision, Workspace, WorkspaceMessage};
use eframe::egui;
use egui::{Color32, RichText};

fn dialog(title: &str) -> egui::Window<'static> {
    egui::Window::new(title.to_string())
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .order(egui::Order::Foreground)
}

/// True when a confirmation is on screen and owns Enter/Escape.
pub fn any_open(workspace: &Workspace) -> bool {
    workspace.tabs.pending_close().is_some() || workspace.pending_delete().is_some()
}

/// Message for Escape while a dialog is open.
pub fn cancel_message(workspace: &Workspace) -> Option<WorkspaceMessage> {
    if workspace.tabs.pending_close().is_some() {
        Some(WorkspaceMessage::ResolveClose(CloseDecision::Cancel))
    } else if workspace.pending_delete().is_some() {
        Some(WorkspaceMessage::CancelDelete)
    } else {
        None
    }
}

pub fn show_close_confirmation(ctx: &egui::Context, workspace: &Workspace) -> Option<WorkspaceMessage> {
    let pending = workspace.tabs.pending_close()?;
    let mut decision = None;

    dialog("Unsaved Changes").show(ctx, |ui| {
        ui.label(format!(
            "{} has unsaved changes.",
            paths::file_name(&pending.path)
        ));
        ui.label("Save them before closing?");
        ui.add_space(10.0);
        ui.horizontal(|ui| {
            if ui.button("Save").clicked() {
                decision = Some(CloseDecision::Save);
            }
            if ui.button("Don't Save").clicked() {
                decision = Some(CloseDecision::Discard);
            }
            if ui.button("Cancel").clicked() {
                decision = Some(CloseDecision::Cancel);
            }
        });
    });

    decision.map(WorkspaceMessage::ResolveClose)
}

pub fn show_delete_confirmation(ctx: &egui::Context, workspace: &Workspace) -> Option<WorkspaceMessage> {
    let path = workspace.pending_delete()?;
    let is_folder = workspace
        .tree
        .known_entry(path)
        .is_some_and(|entry| entry.is_folder);
    let open_inside = workspace
        .tabs
        .paths()
        .iter()
        .filter(|open| paths::is_within(open, path))
        .count();
    let mut message = None;

    dialog("Confirm Delete").show(ctx, |ui| {
        ui.label(format!(
            "Delete {} '{}'?",
            if is_folder { "folder" } else { "file" },
            path
        ));
        if is_folder {
            ui.label("Everything inside it is deleted as well.");
        }
        if open_inside > 0 {
            ui.label(
                RichText::new(format!(
                    "{} open tab(s) will be closed without saving.",
                    open_inside
                ))
                .color(Color32::from_rgb(255, 150, 0)),
            );
        }
        ui.add_space(10.0);
        ui.horizontal(|ui| {
            if ui
                .button(RichText::new("Delete").color(Color32::from_rgb(220, 50, 50)))
                .clicked()
            {
                message = Some(WorkspaceMessage::ConfirmDelete);
            }
            if ui.button("Cancel").clicked() {
                message = Some(WorkspaceMessage::CancelDelete);
            }
        });
    });

    message
}
