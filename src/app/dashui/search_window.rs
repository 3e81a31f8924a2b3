use super::window_focus::WindowFocusManager;
use crate::app::search::{SearchMatch, SearchMode, SearchRequest};
use crate::app::workspace::{SearchState, WorkspaceMessage};
use eframe::egui;
use egui::{Color32, RichText};

/// Lines shown per file before the rest is folded away
const MAX_LINES_PER_FILE: usize = 50;

#[derive(Default)]
pub struct SearchWindow {
    pub open: bool,
    query: String,
    mode: SearchMode,
    case_sensitive: bool,
    folder: String,
    focus_query: bool,
}

impl SearchWindow {
    pub const WINDOW_ID: &'static str = "search_window";

    pub fn new() -> Self {
        Self::default()
    }

    /// Open the window scoped to `working_folder` and focus the query field.
    pub fn open_in(&mut self, working_folder: &str) {
        if !self.open {
            self.folder = working_folder.to_string();
        }
        self.open = true;
        self.focus_query = true;
    }

    fn request(&self) -> SearchRequest {
        SearchRequest {
            query: self.query.clone(),
            search_mode: self.mode,
            case_sensitive: self.case_sensitive,
            search_folder: self.folder.trim().to_string(),
        }
    }

    pub fn show(
        &mut self,
        ctx: &egui::Context,
        state: &SearchState,
        bring_to_front: bool,
    ) -> Vec<WorkspaceMessage> {
        let mut messages = Vec::new();
        if !self.open {
            return messages;
        }

        let mut open = self.open;
        let window = egui::Window::new("Search in Files")
            .id(egui::Id::new(Self::WINDOW_ID))
            .open(&mut open)
            .default_size([560.0, 480.0])
            .resizable(true)
            .collapsible(false);

        WindowFocusManager::apply_focus_order(window, bring_to_front).show(ctx, |ui| {
            self.form(ui, state, &mut messages);
            ui.separator();
            Self::results(ui, state, &mut messages);
        });
        self.open = open;

        messages
    }

    fn form(&mut self, ui: &mut egui::Ui, state: &SearchState, messages: &mut Vec<WorkspaceMessage>) {
        let mut submit = false;

        egui::Grid::new("search_form")
            .num_columns(2)
            .spacing([8.0, 6.0])
            .show(ui, |ui| {
                ui.label("Find:");
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.query)
                        .hint_text("text or pattern")
                        .desired_width(f32::INFINITY),
                );
                if self.focus_query {
                    response.request_focus();
                    self.focus_query = false;
                }
                submit |= response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                ui.end_row();

                ui.label("In folder:");
                ui.add(
                    egui::TextEdit::singleline(&mut self.folder)
                        .hint_text("(root)")
                        .desired_width(f32::INFINITY),
                );
                ui.end_row();
            });

        ui.horizontal(|ui| {
            egui::ComboBox::from_id_salt("search_mode")
                .selected_text(self.mode.to_string())
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.mode, SearchMode::Plain, SearchMode::Plain.to_string());
                    ui.selectable_value(&mut self.mode, SearchMode::Regex, SearchMode::Regex.to_string());
                });
            ui.checkbox(&mut self.case_sensitive, "Match case");

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Clear").clicked() {
                    messages.push(WorkspaceMessage::ClearSearch);
                }
                submit |= ui
                    .add_enabled(!state.in_flight, egui::Button::new("Search"))
                    .clicked();
            });
        });

        if submit && !state.in_flight {
            messages.push(WorkspaceMessage::Search(self.request()));
        }
    }

    fn results(ui: &mut egui::Ui, state: &SearchState, messages: &mut Vec<WorkspaceMessage>) {
        if state.in_flight {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Searching…");
            });
        }
        if let Some(error) = &state.error {
            ui.colored_label(Color32::from_rgb(220, 50, 50), error);
        }
        let Some(results) = &state.results else {
            return;
        };
        if let Some(summary) = state.summary() {
            ui.label(RichText::new(summary).strong());
        }

        egui::ScrollArea::vertical()
            .id_salt("search_results")
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                for result in results {
                    ui.horizontal(|ui| {
                        if ui.link(RichText::new(&result.file_path).strong()).clicked() {
                            messages.push(WorkspaceMessage::OpenFile(result.file_path.clone()));
                        }
                        let count = result.matches.len();
                        ui.weak(if count == 1 {
                            "(1 match)".to_string()
                        } else {
                            format!("({} matches)", count)
                        });
                    });

                    for search_match in result.matches.iter().take(MAX_LINES_PER_FILE) {
                        if Self::match_line(ui, search_match).clicked() {
                            messages.push(WorkspaceMessage::OpenFile(result.file_path.clone()));
                        }
                    }
                    if result.matches.len() > MAX_LINES_PER_FILE {
                        ui.weak(format!(
                            "    … {} more",
                            result.matches.len() - MAX_LINES_PER_FILE
                        ));
                    }
                    ui.add_space(6.0);
                }
            });
    }

    fn match_line(ui: &mut egui::Ui, search_match: &SearchMatch) -> egui::Response {
        let (before, matched, after) = search_match.segments();
        let highlight = ui.visuals().selection.bg_fill;

        let mut job = egui::text::LayoutJob::default();
        let font = egui::FontId::monospace(12.0);
        let text_color = ui.visuals().text_color();
        let plain = egui::TextFormat::simple(font.clone(), text_color);
        job.append(
            &format!("{:>5}  ", search_match.line_number),
            0.0,
            egui::TextFormat::simple(font.clone(), ui.visuals().weak_text_color()),
        );
        job.append(before.trim_start(), 0.0, plain.clone());
        job.append(
            &matched,
            0.0,
            egui::TextFormat {
                background: highlight,
                ..plain.clone()
            },
        );
        job.append(&after, 0.0, plain);

        ui.add(egui::Label::new(job).sense(egui::Sense::click()).truncate())
    }
}
