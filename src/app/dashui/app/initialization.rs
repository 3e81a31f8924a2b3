//! App creation

use super::DocEditApp;
use crate::app::config::AppConfig;
use crate::app::store::DocumentStore;
use crate::app::tasks::StoreTaskRunner;
use crate::app::workspace::{NoticeLevel, UserNotice, Workspace, WorkspaceMessage};
use std::sync::Arc;
use tracing::{error, info};

impl DocEditApp {
    /// Create the app, restoring UI preferences and starting the session load.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        let mut app: DocEditApp = if let Some(storage) = cc.storage {
            eframe::get_value(storage, eframe::APP_KEY).unwrap_or_default()
        } else {
            Self::default()
        };

        app.apply_theme(&cc.egui_ctx);
        app.search_window.open = app.search_window_open;
        app.workspace = Workspace::new().with_new_file_content(config.new_file_content.clone());
        app.config = config;

        match StoreTaskRunner::new(store) {
            Ok(mut runner) => {
                runner.set_repaint_context(cc.egui_ctx.clone());
                app.runner = Some(runner);
                info!("Document store runner started");
            }
            Err(e) => {
                error!("Failed to start the document store runner: {:#}", e);
                app.notification_manager.notify(&UserNotice {
                    level: NoticeLevel::Error,
                    title: "Document store unavailable".to_string(),
                    message: format!("{:#}", e),
                    blocking: true,
                });
            }
        }

        app.dispatch(WorkspaceMessage::Startup);
        app
    }
}
