#![warn(clippy::all, rust_2018_idioms)]

use super::window_focus::{FocusableWindow, SimpleShowParams, WindowFocusManager};
use crate::app::config;
use eframe::egui;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const MAX_LOG_LINES: usize = 1000;
const UPDATE_INTERVAL_MS: u64 = 100;

/// Severity, ordered from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ];

    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ERROR" => Some(LogLevel::Error),
            "WARN" | "WARNING" => Some(LogLevel::Warn),
            "INFO" => Some(LogLevel::Info),
            "DEBUG" => Some(LogLevel::Debug),
            "TRACE" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    /// Whether a line at this level passes a filter set to `filter`.
    fn passes(self, filter: LogLevel) -> bool {
        self <= filter
    }

    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }

    fn color(self) -> egui::Color32 {
        match self {
            LogLevel::Error => egui::Color32::from_rgb(255, 100, 100),
            LogLevel::Warn => egui::Color32::from_rgb(255, 200, 100),
            LogLevel::Info => egui::Color32::from_rgb(100, 200, 255),
            LogLevel::Debug => egui::Color32::from_rgb(150, 150, 150),
            LogLevel::Trace => egui::Color32::from_rgb(120, 120, 120),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    pub timestamp: String,
    pub level: LogLevel,
    pub target: String,
    pub message: String,
}

impl LogLine {
    fn matches_query(&self, query_lower: &str) -> bool {
        query_lower.is_empty()
            || self.message.to_lowercase().contains(query_lower)
            || self.target.to_lowercase().contains(query_lower)
    }
}

/// Parse a line written by the file subscriber:
/// `2026-01-01T10:00:00.000000Z  INFO docedit::app::tasks: Saved notes/a.txt`.
/// Lines that don't follow the format (continuations, panics) come back as
/// INFO with the whole text as the message.
pub fn parse_log_line(line: &str) -> Option<LogLine> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut parts = trimmed.split_whitespace();
    let structured = match (parts.next(), parts.next()) {
        (Some(timestamp), Some(level)) => LogLevel::parse(level).map(|level| (timestamp, level)),
        _ => None,
    };

    let Some((timestamp, level)) = structured else {
        return Some(LogLine {
            timestamp: String::new(),
            level: LogLevel::Info,
            target: String::new(),
            message: trimmed.to_string(),
        });
    };

    let rest = parts.collect::<Vec<_>>().join(" ");
    let (target, message) = match rest.split_once(": ") {
        Some((target, message)) if !target.contains(' ') => {
            (target.to_string(), message.to_string())
        }
        _ => (String::new(), rest),
    };

    Some(LogLine {
        timestamp: timestamp.to_string(),
        level,
        target,
        message,
    })
}

/// Follow `path` from `position`, returning the new lines and the position to resume from.
fn read_new_lines(path: &Path, mut position: u64) -> (Vec<LogLine>, u64) {
    let Ok(file) = File::open(path) else {
        return (Vec::new(), position);
    };
    if let Ok(metadata) = file.metadata() {
        // Truncated or rotated
        if metadata.len() < position {
            position = 0;
        }
    }

    let mut reader = BufReader::new(file);
    if reader.seek(SeekFrom::Start(position)).is_err() {
        return (Vec::new(), position);
    }

    let mut lines = Vec::new();
    let mut line = String::new();
    while let Ok(read) = reader.read_line(&mut line) {
        if read == 0 || !line.ends_with('\n') {
            // Partial line: reread it next time
            break;
        }
        position += read as u64;
        lines.extend(parse_log_line(&line));
        line.clear();
    }
    (lines, position)
}

pub struct LogWindow {
    pub open: bool,
    log_path: PathBuf,
    lines: VecDeque<LogLine>,
    receiver: Receiver<Vec<LogLine>>,
    stop: Arc<AtomicBool>,
    watcher_thread: Option<thread::JoinHandle<()>>,
    auto_scroll: bool,
    search_query: String,
    filter_level: LogLevel,
}

impl Default for LogWindow {
    fn default() -> Self {
        Self::new(config::log_file_path().unwrap_or_else(|| PathBuf::from("docedit.log")))
    }
}

impl LogWindow {
    pub fn new(log_path: PathBuf) -> Self {
        let (sender, receiver) = channel();
        let stop = Arc::new(AtomicBool::new(false));
        let watcher_thread = Self::start_watcher(log_path.clone(), sender, stop.clone());

        Self {
            open: false,
            log_path,
            lines: VecDeque::with_capacity(MAX_LOG_LINES),
            receiver,
            stop,
            watcher_thread,
            auto_scroll: true,
            search_query: String::new(),
            filter_level: LogLevel::Info,
        }
    }

    fn start_watcher(
        log_path: PathBuf,
        sender: Sender<Vec<LogLine>>,
        stop: Arc<AtomicBool>,
    ) -> Option<thread::JoinHandle<()>> {
        let spawned = thread::Builder::new()
            .name("docedit-log-watcher".to_string())
            .spawn(move || {
                let mut position = 0u64;
                while !stop.load(Ordering::Relaxed) {
                    let (lines, next) = read_new_lines(&log_path, position);
                    position = next;
                    if !lines.is_empty() && sender.send(lines).is_err() {
                        break;
                    }
                    thread::sleep(Duration::from_millis(UPDATE_INTERVAL_MS));
                }
            });

        match spawned {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!("Log viewer could not start its file watcher: {}", e);
                None
            }
        }
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    fn drain_new_lines(&mut self) {
        while let Ok(batch) = self.receiver.try_recv() {
            self.lines.extend(batch);
        }
        while self.lines.len() > MAX_LOG_LINES {
            self.lines.pop_front();
        }
    }

    pub fn show(&mut self, ctx: &egui::Context, bring_to_front: bool) {
        // Keep the buffer current even while hidden
        self.drain_new_lines();
        if !self.open {
            return;
        }

        let screen_rect = ctx.screen_rect();
        let max_width = screen_rect.width() * 0.9;
        let max_height = screen_rect.height() * 0.9;

        let mut open = self.open;
        let window = egui::Window::new("Log Viewer")
            .open(&mut open)
            .default_size([800.0_f32.min(max_width), 400.0_f32.min(max_height)])
            .max_size([max_width, max_height])
            .constrain(true)
            .resizable(true);

        WindowFocusManager::apply_focus_order(window, bring_to_front).show(ctx, |ui| {
            self.toolbar(ui);
            ui.separator();
            self.log_lines(ui);
        });
        self.open = open;

        ctx.request_repaint_after(Duration::from_millis(UPDATE_INTERVAL_MS));
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Log file:");
            ui.monospace(self.log_path.display().to_string());
            ui.separator();
            ui.checkbox(&mut self.auto_scroll, "Auto-scroll");
            ui.separator();

            egui::ComboBox::from_label("Level")
                .selected_text(self.filter_level.as_str())
                .show_ui(ui, |ui| {
                    for level in LogLevel::ALL {
                        ui.selectable_value(&mut self.filter_level, level, level.as_str());
                    }
                });
            ui.separator();

            ui.label("Search:");
            ui.text_edit_singleline(&mut self.search_query);
            if ui.button("Clear").clicked() {
                self.lines.clear();
            }
        });
    }

    fn log_lines(&self, ui: &mut egui::Ui) {
        let query = self.search_query.to_lowercase();
        egui::ScrollArea::both()
            .auto_shrink([false; 2])
            .stick_to_bottom(self.auto_scroll)
            .show(ui, |ui| {
                ui.style_mut().wrap_mode = Some(egui::TextWrapMode::Extend);
                ui.style_mut().text_styles.insert(
                    egui::TextStyle::Monospace,
                    egui::FontId::new(10.0, egui::FontFamily::Monospace),
                );

                let mut shown = 0;
                for line in self
                    .lines
                    .iter()
                    .filter(|line| line.level.passes(self.filter_level))
                    .filter(|line| line.matches_query(&query))
                {
                    shown += 1;
                    ui.horizontal(|ui| {
                        if !line.timestamp.is_empty() {
                            ui.monospace(&line.timestamp);
                        }
                        ui.colored_label(line.level.color(), line.level.as_str());
                        if !line.target.is_empty() {
                            ui.weak(&line.target);
                        }
                        ui.monospace(&line.message);
                    });
                }

                if shown < self.lines.len() {
                    ui.separator();
                    ui.label(format!(
                        "Showing {} of {} lines (level {})",
                        shown,
                        self.lines.len(),
                        self.filter_level.as_str()
                    ));
                }
            });
    }
}

impl FocusableWindow for LogWindow {
    type ShowParams = SimpleShowParams;

    fn window_id(&self) -> &'static str {
        "log_window"
    }

    fn window_title(&self) -> String {
        "Log Viewer".to_string()
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn show_with_focus(&mut self, ctx: &egui::Context, _params: (), bring_to_front: bool) {
        LogWindow::show(self, ctx, bring_to_front);
    }
}

impl Drop for LogWindow {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.watcher_thread.take() {
            let _ = handle.join();
        }
    }
}
