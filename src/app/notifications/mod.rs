use egui::Color32;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::app::workspace::{NoticeLevel, UserNotice};

pub mod error_window;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    Error,
    Warning,
    Info,
    Success,
}

impl From<NoticeLevel> for NotificationType {
    fn from(level: NoticeLevel) -> Self {
        match level {
            NoticeLevel::Error => NotificationType::Error,
            NoticeLevel::Warning => NotificationType::Warning,
            NoticeLevel::Info => NotificationType::Info,
            NoticeLevel::Success => NotificationType::Success,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub created_at: Instant,
    pub expires_at: Option<Instant>,
    pub source: String, // e.g. "Document Store", "Session"
}

impl Notification {
    pub fn new(
        notification_type: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        let created_at = Instant::now();
        // Errors stay until dismissed
        let lifetime = match notification_type {
            NotificationType::Error => None,
            NotificationType::Warning => Some(Duration::from_secs(30)),
            NotificationType::Info => Some(Duration::from_secs(10)),
            NotificationType::Success => Some(Duration::from_secs(5)),
        };
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            message: message.into(),
            notification_type,
            created_at,
            expires_at: lifetime.map(|d| created_at + d),
            source: source.into(),
        }
    }

    pub fn from_notice(notice: &UserNotice) -> Self {
        Self::new(
            notice.level.into(),
            notice.title.clone(),
            notice.message.clone(),
            "Document Store",
        )
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|expires_at| Instant::now() > expires_at)
    }

    pub fn get_color(&self) -> Color32 {
        match self.notification_type {
            NotificationType::Error => Color32::from_rgb(220, 50, 50),
            NotificationType::Warning => Color32::from_rgb(255, 150, 0),
            NotificationType::Info => Color32::from_rgb(70, 130, 200),
            NotificationType::Success => Color32::from_rgb(40, 180, 40),
        }
    }

    pub fn get_icon(&self) -> &'static str {
        match self.notification_type {
            NotificationType::Error => "✗",
            NotificationType::Warning => "⚠",
            NotificationType::Info => "ℹ",
            NotificationType::Success => "✓",
        }
    }
}

#[derive(Default)]
pub struct NotificationManager {
    notifications: HashMap<String, Notification>,
    pub show_details_window: bool,
    pub selected_notification_id: Option<String>,
}

impl NotificationManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_notification(&mut self, notification: Notification) -> String {
        let id = notification.id.clone();
        self.notifications.insert(id.clone(), notification);
        id
    }

    /// Record a notice from the workspace. Blocking notices open the details
    /// window straight away.
    pub fn notify(&mut self, notice: &UserNotice) {
        let id = self.add_notification(Notification::from_notice(notice));
        if notice.blocking {
            self.show_notification_details(id);
        }
    }

    pub fn dismiss_notification(&mut self, id: &str) {
        self.notifications.remove(id);
        if self.selected_notification_id.as_deref() == Some(id) {
            self.selected_notification_id = None;
            self.show_details_window = false;
        }
    }

    pub fn clear_expired(&mut self) {
        let selected = self.selected_notification_id.clone();
        // The one on screen stays until its window is closed
        self.notifications.retain(|id, notification| {
            !notification.is_expired() || selected.as_deref() == Some(id.as_str())
        });
    }

    pub fn get_active_notifications(&self) -> Vec<&Notification> {
        let mut notifications: Vec<&Notification> = self.notifications.values().collect();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        notifications
    }

    pub fn get_notification(&self, id: &str) -> Option<&Notification> {
        self.notifications.get(id)
    }

    fn count(&self, notification_type: NotificationType) -> usize {
        self.notifications
            .values()
            .filter(|n| n.notification_type == notification_type)
            .count()
    }

    pub fn get_error_count(&self) -> usize {
        self.count(NotificationType::Error)
    }

    pub fn get_warning_count(&self) -> usize {
        self.count(NotificationType::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.get_error_count() > 0
    }

    pub fn show_notification_details(&mut self, notification_id: String) {
        self.selected_notification_id = Some(notification_id);
        self.show_details_window = true;
    }

    /// Newest info or success message, for the status bar.
    pub fn latest_message(&self) -> Option<&Notification> {
        self.get_active_notifications().into_iter().find(|n| {
            matches!(
                n.notification_type,
                NotificationType::Info | NotificationType::Success
            )
        })
    }

    fn show_first(&mut self, notification_type: NotificationType) {
        let first = self
            .get_active_notifications()
            .into_iter()
            .find(|n| n.notification_type == notification_type)
            .map(|n| n.id.clone());
        if let Some(id) = first {
            self.show_notification_details(id);
        }
    }

    pub fn render_status_bar_indicator(&mut self, ui: &mut egui::Ui) {
        self.clear_expired();

        if let Some((icon, color, message)) = self
            .latest_message()
            .map(|n| (n.get_icon(), n.get_color(), n.message.clone()))
        {
            ui.separator();
            ui.colored_label(color, format!("{} {}", icon, message));
        }

        let error_count = self.get_error_count();
        let warning_count = self.get_warning_count();
        if error_count == 0 && warning_count == 0 {
            return;
        }
        ui.separator();

        if error_count > 0 {
            let error_text = if error_count == 1 {
                "1 error".to_string()
            } else {
                format!("{} errors", error_count)
            };
            if ui
                .colored_label(Color32::from_rgb(220, 50, 50), format!("✗ {}", error_text))
                .clicked()
            {
                self.show_first(NotificationType::Error);
            }
        }

        if warning_count > 0 {
            let warning_text = if warning_count == 1 {
                "1 warning".to_string()
            } else {
                format!("{} warnings", warning_count)
            };
            if ui
                .colored_label(
                    Color32::from_rgb(255, 150, 0),
                    format!("⚠ {}", warning_text),
                )
                .clicked()
            {
                self.show_first(NotificationType::Warning);
            }
        }
    }
}
