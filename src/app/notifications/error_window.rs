use super::{Notification, NotificationManager, NotificationType};
use egui::{Context, RichText, ScrollArea};

pub struct NotificationDetailsWindow;

impl NotificationDetailsWindow {
    pub fn show(manager: &mut NotificationManager, ctx: &Context) {
        if !manager.show_details_window {
            return;
        }

        let mut open = manager.show_details_window;
        let selected = manager
            .selected_notification_id
            .clone()
            .and_then(|id| manager.get_notification(&id).cloned());

        match selected {
            Some(notification) => {
                egui::Window::new(format!(
                    "{} {}",
                    notification.get_icon(),
                    notification.title
                ))
                .id(egui::Id::new("notification_details"))
                .open(&mut open)
                .collapsible(false)
                .resizable(true)
                .min_width(420.0)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    Self::show_notification_details(ui, &notification, manager);
                });
            }
            // Dismissed or expired while selected
            None => open = false,
        }

        manager.show_details_window = manager.show_details_window && open;
        if !manager.show_details_window {
            manager.selected_notification_id = None;
        }
    }

    fn show_notification_details(
        ui: &mut egui::Ui,
        notification: &Notification,
        manager: &mut NotificationManager,
    ) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Source:").strong());
            ui.label(&notification.source);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Copy to Clipboard").clicked() {
                    ui.ctx().copy_text(Self::create_clipboard_summary(notification));
                }
            });
        });
        ui.horizontal(|ui| {
            ui.label(RichText::new("Time:").strong());
            ui.label(format!("{}s ago", notification.created_at.elapsed().as_secs()));
        });

        ui.separator();

        let heading = match notification.notification_type {
            NotificationType::Error => "Error",
            NotificationType::Warning => "Warning",
            NotificationType::Info => "Information",
            NotificationType::Success => "Success",
        };
        ui.group(|ui| {
            ui.label(
                RichText::new(heading)
                    .color(notification.get_color())
                    .strong(),
            );
            ScrollArea::vertical().max_height(240.0).show(ui, |ui| {
                ui.label(&notification.message);
            });
        });

        ui.add_space(10.0);
        ui.horizontal(|ui| {
            if ui.button("Close").clicked() {
                manager.show_details_window = false;
                manager.selected_notification_id = None;
            }
            if ui.button("Dismiss").clicked() {
                manager.dismiss_notification(&notification.id);
            }
        });
    }

    fn create_clipboard_summary(notification: &Notification) -> String {
        format!(
            "{} {}\nSource: {}\nType: {:?}\n\n{}\n",
            notification.get_icon(),
            notification.title,
            notification.source,
            notification.notification_type,
            notification.message
        )
    }
}
