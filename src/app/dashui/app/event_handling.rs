//! Running workspace effects and feeding store completions back in

use super::DocEditApp;
use crate::app::workspace::{Effect, StoreRequest, WorkspaceMessage};

impl DocEditApp {
    /// Apply a UI message to the workspace and carry out what it asks for.
    pub(super) fn dispatch(&mut self, message: WorkspaceMessage) {
        let effects = self.workspace.dispatch(message);
        self.run_effects(effects);
    }

    pub(super) fn dispatch_all(&mut self, messages: Vec<WorkspaceMessage>) {
        for message in messages {
            self.dispatch(message);
        }
    }

    /// Drain store completions that arrived since the last frame.
    pub(super) fn process_store_events(&mut self) {
        let events = match &self.runner {
            Some(runner) => runner.poll(),
            None => return,
        };
        for event in events {
            let effects = self.workspace.apply_event(event);
            self.run_effects(effects);
        }
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Store(request) => self.execute_request(request),
                Effect::Notify(notice) => {
                    tracing::info!("{}: {}", notice.title, notice.message);
                    self.notification_manager.notify(&notice);
                }
            }
        }
    }

    fn execute_request(&self, request: StoreRequest) {
        match &self.runner {
            Some(runner) => runner.execute(request),
            None => tracing::warn!("No document store runner, dropping request"),
        }
    }
}
