use super::window_focus::{FocusableWindow, SimpleShowParams, WindowFocusManager};
use eframe::egui;
use egui::{Context, RichText, Ui};

const SHORTCUTS: &[(&str, &str)] = &[
    ("Ctrl+S", "Save the active file"),
    ("Ctrl+W", "Close the active tab"),
    ("Ctrl+Shift+F", "Search in files"),
    ("Ctrl+N", "New file in the working folder"),
    ("F5", "Refresh the file tree"),
    ("F1", "Show this help"),
    ("Escape", "Close the focused window or dialog"),
];

#[derive(Default)]
pub struct HelpWindow {
    pub open: bool,
}

impl HelpWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, ctx: &Context, bring_to_front: bool) {
        if !self.open {
            return;
        }

        let available = ctx.available_rect().size();
        let window = egui::Window::new("Help")
            .open(&mut self.open)
            .fixed_size([available.x.min(520.0), available.y.min(420.0)])
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .resizable(false)
            .collapsible(false);

        WindowFocusManager::apply_focus_order(window, bring_to_front).show(ctx, Self::ui_content);
    }

    fn ui_content(ui: &mut Ui) {
        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.heading("Keyboard Shortcuts");
            ui.add_space(5.0);
            egui::Grid::new("help_shortcuts")
                .num_columns(2)
                .spacing([16.0, 4.0])
                .show(ui, |ui| {
                    for (keys, action) in SHORTCUTS {
                        ui.label(RichText::new(*keys).strong().monospace());
                        ui.label(*action);
                        ui.end_row();
                    }
                });

            ui.add_space(15.0);
            ui.heading("Files");
            ui.add_space(5.0);
            ui.label("Click a folder name to make it the working folder; use the arrow to expand it in place.");
            ui.label("Right-click an entry to rename or delete it. Names may contain '/' to create nested paths.");
            ui.label("A dot on a tab means it has unsaved changes. Closing it asks whether to save.");

            ui.add_space(15.0);
            ui.heading("Search");
            ui.add_space(5.0);
            ui.label("Plain mode matches text literally, regex mode takes a regular expression.");
            ui.label("Click a file in the results to open it.");
            ui.add_space(10.0);
        });
    }
}

impl FocusableWindow for HelpWindow {
    type ShowParams = SimpleShowParams;

    fn window_id(&self) -> &'static str {
        "help_window"
    }

    fn window_title(&self) -> String {
        "Help".to_string()
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn show_with_focus(&mut self, ctx: &egui::Context, _params: (), bring_to_front: bool) {
        HelpWindow::show(self, ctx, bring_to_front);
    }
}
