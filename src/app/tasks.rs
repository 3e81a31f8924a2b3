//! Background execution of store requests.
//!
//! egui owns the main thread, so store calls run on a dedicated tokio runtime.
//! Each request becomes a task whose [`StoreEvent`] is sent back over a std
//! channel; the UI drains that channel at the start of every frame.
//!
//! Session writes bypass the event channel. They feed a single writer task
//! through a `watch` channel: writes are applied one at a time in the order
//! they were issued, and a burst collapses to the newest snapshot.

use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::runtime::Runtime;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::app::store::DocumentStore;
use crate::app::workspace::{Session, StoreEvent, StoreRequest};

pub struct StoreTaskRunner {
    runtime: Runtime,
    store: Arc<dyn DocumentStore>,
    sender: mpsc::Sender<StoreEvent>,
    receiver: mpsc::Receiver<StoreEvent>,
    session_tx: watch::Sender<Option<Session>>,
    repaint: Option<egui::Context>,
}

impl StoreTaskRunner {
    pub fn new(store: Arc<dyn DocumentStore>) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("docedit-store")
            .enable_all()
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create tokio runtime: {}", e))?;

        let (sender, receiver) = mpsc::channel();
        let (session_tx, session_rx) = watch::channel(None);
        runtime.spawn(write_sessions(Arc::clone(&store), session_rx));

        Ok(Self {
            runtime,
            store,
            sender,
            receiver,
            session_tx,
            repaint: None,
        })
    }

    /// Wake the UI whenever a request completes.
    pub fn set_repaint_context(&mut self, ctx: egui::Context) {
        self.repaint = Some(ctx);
    }

    pub fn execute(&self, request: StoreRequest) {
        trace_debug!("Executing store request: {}", describe(&request));
        if let StoreRequest::PersistSession(session) = request {
            // Only fails once the writer task is gone, i.e. during shutdown
            if self.session_tx.send(Some(session)).is_err() {
                warn!("Session writer stopped, snapshot dropped");
            }
            return;
        }

        let store = Arc::clone(&self.store);
        let sender = self.sender.clone();
        let repaint = self.repaint.clone();
        self.runtime.spawn(async move {
            let Some(event) = run_request(store.as_ref(), request).await else {
                return;
            };
            if sender.send(event).is_err() {
                debug!("UI gone, dropping store event");
            }
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        });
    }

    /// Every event that completed since the last call.
    pub fn poll(&self) -> Vec<StoreEvent> {
        self.receiver.try_iter().collect()
    }

    /// Block until the next event arrives or `timeout` elapses.
    pub fn wait_event(&self, timeout: Duration) -> Option<StoreEvent> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Block until `count` events arrived or `timeout` elapsed.
    pub fn wait_events(&self, count: usize, timeout: Duration) -> Vec<StoreEvent> {
        let deadline = Instant::now() + timeout;
        let mut events = Vec::new();
        while events.len() < count {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.receiver.recv_timeout(remaining) {
                Ok(event) => events.push(event),
                Err(_) => break,
            }
        }
        events
    }
}

async fn write_sessions(
    store: Arc<dyn DocumentStore>,
    mut snapshots: watch::Receiver<Option<Session>>,
) {
    while snapshots.changed().await.is_ok() {
        let snapshot = snapshots.borrow_and_update().clone();
        let Some(session) = snapshot else {
            continue;
        };
        match store.save_session(&session).await {
            Ok(()) => debug!(
                "Session saved: {} open, active '{}', folder '{}'",
                session.opened_files.len(),
                session.last_active_file,
                session.working_folder
            ),
            Err(e) => trace_warn!("Failed to save session: {}", e),
        }
    }
    debug!("Session writer finished");
}

async fn run_request(store: &dyn DocumentStore, request: StoreRequest) -> Option<StoreEvent> {
    let event = match request {
        StoreRequest::LoadSession => StoreEvent::SessionLoaded(store.load_session().await),
        StoreRequest::ListFolder(folder) => {
            let result = store.list(&folder).await;
            StoreEvent::FolderListed { folder, result }
        }
        StoreRequest::LoadDocument(path) => {
            let result = store.get(&path).await;
            StoreEvent::DocumentLoaded { path, result }
        }
        StoreRequest::SaveDocument {
            path,
            content,
            revision,
        } => {
            let result = store.update(&path, &content).await;
            StoreEvent::DocumentSaved {
                path,
                revision,
                result,
            }
        }
        StoreRequest::CreateDocument {
            path,
            content,
            is_folder,
        } => {
            let result = store.create(&path, &content, is_folder).await;
            StoreEvent::Created {
                path,
                is_folder,
                result,
            }
        }
        StoreRequest::DeleteDocument(path) => {
            let result = store.delete(&path).await;
            StoreEvent::Deleted { path, result }
        }
        StoreRequest::RenameDocument { old_path, new_path } => {
            let result = store.rename(&old_path, &new_path).await;
            StoreEvent::Renamed {
                old_path,
                new_path,
                result,
            }
        }
        StoreRequest::Search(request) => {
            let result = store.search(&request).await;
            StoreEvent::SearchCompleted { request, result }
        }
        StoreRequest::PersistSession(session) => {
            // Normally routed to the session writer by `execute`
            if let Err(e) = store.save_session(&session).await {
                trace_warn!("Failed to save session: {}", e);
            }
            return None;
        }
    };
    Some(event)
}

fn describe(request: &StoreRequest) -> String {
    match request {
        StoreRequest::LoadSession => "load session".to_string(),
        StoreRequest::PersistSession(_) => "persist session".to_string(),
        StoreRequest::ListFolder(folder) => format!("list '{}'", folder),
        StoreRequest::LoadDocument(path) => format!("get '{}'", path),
        StoreRequest::SaveDocument { path, content, .. } => {
            format!("update '{}' ({} bytes)", path, content.len())
        }
        StoreRequest::CreateDocument {
            path, is_folder, ..
        } => format!("create {} '{}'", if *is_folder { "folder" } else { "file" }, path),
        StoreRequest::DeleteDocument(path) => format!("delete '{}'", path),
        StoreRequest::RenameDocument { old_path, new_path } => {
            format!("rename '{}' -> '{}'", old_path, new_path)
        }
        StoreRequest::Search(request) => format!("search '{}'", request.query),
    }
}
