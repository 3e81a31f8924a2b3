//! Theme management

use super::{DocEditApp, ThemeChoice};
use eframe::egui;
use egui_code_editor::ColorTheme;

impl ThemeChoice {
    pub const ALL: [ThemeChoice; 4] = [
        ThemeChoice::Latte,
        ThemeChoice::Frappe,
        ThemeChoice::Macchiato,
        ThemeChoice::Mocha,
    ];

    /// Install the Catppuccin flavour on the context.
    pub fn apply(self, ctx: &egui::Context) {
        match self {
            ThemeChoice::Latte => catppuccin_egui::set_theme(ctx, catppuccin_egui::LATTE),
            ThemeChoice::Frappe => catppuccin_egui::set_theme(ctx, catppuccin_egui::FRAPPE),
            ThemeChoice::Macchiato => catppuccin_egui::set_theme(ctx, catppuccin_egui::MACCHIATO),
            ThemeChoice::Mocha => catppuccin_egui::set_theme(ctx, catppuccin_egui::MOCHA),
        }

        // Squarer window corners
        let mut style = (*ctx.style()).clone();
        style.visuals.window_corner_radius = egui::CornerRadius::same(2);
        ctx.set_style(style);
    }

    /// Latte is the only light flavour.
    pub fn is_light(self) -> bool {
        self == ThemeChoice::Latte
    }

    pub fn code_theme(self) -> ColorTheme {
        if self.is_light() {
            ColorTheme::GITHUB_LIGHT
        } else {
            ColorTheme::GITHUB_DARK
        }
    }
}

impl DocEditApp {
    pub(super) fn apply_theme(&self, ctx: &egui::Context) {
        self.theme.apply(ctx);
    }
}
