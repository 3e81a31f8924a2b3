use crate::app::dashui::app::ThemeChoice;
use eframe::egui;
use egui::{Color32, RichText};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MenuAction {
    None,
    ThemeChanged,
    NewFile,
    NewFolder,
    Save,
    CloseTab,
    Search,
    Refresh,
    Help,
    Quit,
}

/// What the menu bar shows about the editor on the right-hand side.
#[derive(Debug, Clone, Default)]
pub struct MenuStatus {
    pub working_folder: String,
    pub active_file: Option<String>,
    pub dirty_count: usize,
}

pub fn build_menu(
    ui: &mut egui::Ui,
    ctx: &egui::Context,
    theme: &mut ThemeChoice,
    log_window_open: &mut bool,
    status: &MenuStatus,
) -> MenuAction {
    let mut menu_action = MenuAction::None;
    let original_theme = *theme;
    let has_active = status.active_file.is_some();

    ui.menu_button("File", |ui| {
        if ui.button("New File").clicked() {
            menu_action = MenuAction::NewFile;
        }
        if ui.button("New Folder").clicked() {
            menu_action = MenuAction::NewFolder;
        }
        ui.separator();
        if ui
            .add_enabled(has_active, egui::Button::new("Save").shortcut_text("Ctrl+S"))
            .clicked()
        {
            menu_action = MenuAction::Save;
        }
        if ui
            .add_enabled(has_active, egui::Button::new("Close Tab").shortcut_text("Ctrl+W"))
            .clicked()
        {
            menu_action = MenuAction::CloseTab;
        }
        ui.separator();
        if ui.button("Quit").clicked() {
            menu_action = MenuAction::Quit;
        }
    });

    ui.menu_button("View", |ui| {
        if ui
            .add(egui::Button::new("Search in Files").shortcut_text("Ctrl+Shift+F"))
            .clicked()
        {
            menu_action = MenuAction::Search;
        }
        if ui
            .add(egui::Button::new("Refresh Tree").shortcut_text("F5"))
            .clicked()
        {
            menu_action = MenuAction::Refresh;
        }
        ui.separator();
        if ui.add(egui::Button::new("Help").shortcut_text("F1")).clicked() {
            menu_action = MenuAction::Help;
        }
    });

    ui.menu_button(RichText::new("🎨").size(18.0), |ui| {
        for choice in ThemeChoice::ALL {
            if ui
                .selectable_label(*theme == choice, choice.to_string())
                .clicked()
            {
                *theme = choice;
            }
        }
    });

    if ui.button(RichText::new("📜").size(16.0)).clicked() {
        *log_window_open = !*log_window_open;
        tracing::debug!("Log viewer toggled: {}", log_window_open);
    }

    ui.add_space(16.0);
    show_editor_status(ui, status);

    if original_theme != *theme {
        theme.apply(ctx);
        if menu_action == MenuAction::None {
            menu_action = MenuAction::ThemeChanged;
        }
    }
    menu_action
}

fn show_editor_status(ui: &mut egui::Ui, status: &MenuStatus) {
    ui.horizontal(|ui| {
        ui.label("Folder:");
        let folder = if status.working_folder.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", status.working_folder)
        };
        ui.label(
            RichText::new(folder)
                .color(Color32::from_rgb(180, 140, 220))
                .strong(),
        );

        if let Some(active) = &status.active_file {
            ui.separator();
            ui.label(RichText::new(active).color(Color32::from_rgb(100, 170, 255)));
        }

        if status.dirty_count > 0 {
            ui.separator();
            let text = if status.dirty_count == 1 {
                "1 unsaved file".to_string()
            } else {
                format!("{} unsaved files", status.dirty_count)
            };
            ui.label(RichText::new(text).color(Color32::from_rgb(255, 190, 70)));
        }
    });
}
