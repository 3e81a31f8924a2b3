//! End-to-end workspace tests
//!
//! These tests drive [`Workspace`] the way the app shell does: messages go
//! through `dispatch`, store requests run on a real [`StoreTaskRunner`] against
//! an in-memory store, and completions are fed back through `apply_event`.

use async_trait::async_trait;
use docedit::app::search::{SearchMode, SearchRequest, SearchResult};
use docedit::app::store::{
    Document, DocumentMetadata, DocumentStore, MemoryStore, StoreError, StoreResult,
};
use docedit::app::tasks::StoreTaskRunner;
use docedit::app::workspace::{
    CloseDecision, Effect, NoticeLevel, Session, StoreEvent, StoreRequest, UserNotice,
    Workspace, WorkspaceMessage,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// MemoryStore that counts writes and can be told to fail them.
struct CountingStore {
    inner: MemoryStore,
    updates: AtomicUsize,
    fail_updates: AtomicBool,
}

impl CountingStore {
    fn new(inner: MemoryStore) -> Arc<Self> {
        Arc::new(Self {
            inner,
            updates: AtomicUsize::new(0),
            fail_updates: AtomicBool::new(false),
        })
    }

    fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for CountingStore {
    async fn list(&self, parent: &str) -> StoreResult<Vec<DocumentMetadata>> {
        self.inner.list(parent).await
    }

    async fn get(&self, path: &str) -> StoreResult<Document> {
        self.inner.get(path).await
    }

    async fn create(&self, path: &str, content: &str, is_folder: bool) -> StoreResult<Document> {
        self.inner.create(path, content, is_folder).await
    }

    async fn update(&self, path: &str, content: &str) -> StoreResult<Document> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(StoreError::Transport("connection refused".to_string()));
        }
        self.inner.update(path, content).await
    }

    async fn delete(&self, path: &str) -> StoreResult<()> {
        self.inner.delete(path).await
    }

    async fn rename(&self, old_path: &str, new_path: &str) -> StoreResult<DocumentMetadata> {
        self.inner.rename(old_path, new_path).await
    }

    async fn search(&self, request: &SearchRequest) -> StoreResult<Vec<SearchResult>> {
        self.inner.search(request).await
    }

    async fn load_session(&self) -> StoreResult<Option<Session>> {
        self.inner.load_session().await
    }

    async fn save_session(&self, session: &Session) -> StoreResult<()> {
        self.inner.save_session(session).await
    }
}

/// A workspace wired to a runner, plus every notice it raised.
struct Harness {
    ws: Workspace,
    runner: StoreTaskRunner,
    store: Arc<CountingStore>,
    notices: Vec<UserNotice>,
}

impl Harness {
    fn new(store: Arc<CountingStore>) -> Self {
        let runner = StoreTaskRunner::new(store.clone()).expect("runner");
        Self {
            ws: Workspace::new(),
            runner,
            store,
            notices: Vec::new(),
        }
    }

    fn with_files(files: &[(&str, &str)]) -> Self {
        Self::new(CountingStore::new(MemoryStore::with_files(
            files.iter().copied(),
        )))
    }

    fn send(&mut self, message: WorkspaceMessage) {
        let effects = self.ws.dispatch(message);
        self.settle(effects);
    }

    /// Run effects until no store request is outstanding.
    fn settle(&mut self, effects: Vec<Effect>) {
        let mut pending = effects;
        while !pending.is_empty() {
            let mut outstanding = 0;
            for effect in pending.drain(..) {
                match effect {
                    Effect::Store(StoreRequest::PersistSession(session)) => {
                        self.runner.execute(StoreRequest::PersistSession(session));
                    }
                    Effect::Store(request) => {
                        outstanding += 1;
                        self.runner.execute(request);
                    }
                    Effect::Notify(notice) => self.notices.push(notice),
                }
            }
            let events = self
                .runner
                .wait_events(outstanding, Duration::from_secs(5));
            assert_eq!(events.len(), outstanding, "store requests timed out");
            for event in events {
                pending.extend(self.ws.apply_event(event));
            }
        }
    }

    /// Type into an open, loaded buffer the way the editor widget does.
    fn type_into(&mut self, path: &str, text: &str) {
        self.ws
            .editor
            .editable_text_mut(path)
            .expect("buffer is editable")
            .push_str(text);
        self.send(WorkspaceMessage::BufferEdited(path.to_string()));
    }

    /// Session writes are fire-and-forget; poll until the expected one lands.
    fn wait_for_session(&self, expected: &Session) {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if self.store.inner.stored_session().as_ref() == Some(expected) {
                return;
            }
            if Instant::now() > deadline {
                panic!(
                    "session never became {:?}, last was {:?}",
                    expected,
                    self.store.inner.stored_session()
                );
            }
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    fn text(&self, path: &str) -> String {
        self.ws
            .editor
            .get(path)
            .map(|buffer| buffer.text().to_string())
            .unwrap_or_default()
    }
}

fn seed_session(store: &CountingStore, session: Session) {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime")
        .block_on(store.inner.save_session(&session))
        .expect("seed session");
}

fn open(path: &str) -> WorkspaceMessage {
    WorkspaceMessage::OpenFile(path.to_string())
}

fn close(path: &str) -> WorkspaceMessage {
    WorkspaceMessage::CloseTab(path.to_string())
}

fn session(files: &[&str], active: &str, folder: &str) -> Session {
    Session::new(
        files.iter().map(|f| f.to_string()).collect(),
        active,
        folder,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_open_twice_keeps_one_tab() {
        let mut h = Harness::with_files(&[("a.txt", "alpha")]);
        h.send(open("a.txt"));
        h.send(open("a.txt"));

        assert_eq!(h.ws.tabs.paths(), vec!["a.txt".to_string()]);
        assert_eq!(h.ws.tabs.active(), Some("a.txt"));
        assert_eq!(h.text("a.txt"), "alpha");
    }

    #[test]
    fn test_reopen_focuses_existing_tab() {
        let mut h = Harness::with_files(&[("a.txt", "alpha"), ("b.txt", "beta")]);
        h.send(open("a.txt"));
        h.send(open("b.txt"));
        h.send(open("a.txt"));

        assert_eq!(h.ws.tabs.len(), 2);
        assert_eq!(h.ws.tabs.active(), Some("a.txt"));
    }

    #[test]
    fn test_close_active_selects_last_tab() {
        let mut h = Harness::with_files(&[("a.txt", "1"), ("b.txt", "2"), ("c.txt", "3")]);
        h.send(open("a.txt"));
        h.send(open("b.txt"));
        h.send(open("c.txt"));
        h.send(WorkspaceMessage::FocusTab("a.txt".to_string()));

        h.send(close("a.txt"));
        assert_eq!(h.ws.tabs.paths(), vec!["b.txt".to_string(), "c.txt".to_string()]);
        assert_eq!(h.ws.tabs.active(), Some("c.txt"));

        h.send(close("c.txt"));
        assert_eq!(h.ws.tabs.active(), Some("b.txt"));

        h.send(close("b.txt"));
        assert!(h.ws.tabs.is_empty());
        assert_eq!(h.ws.tabs.active(), None);
        assert!(h.ws.editor.is_empty());
        h.wait_for_session(&session(&[], "", ""));
    }

    #[test]
    fn test_close_inactive_keeps_active() {
        let mut h = Harness::with_files(&[("a.txt", "1"), ("b.txt", "2")]);
        h.send(open("a.txt"));
        h.send(open("b.txt"));
        h.send(close("a.txt"));

        assert_eq!(h.ws.tabs.paths(), vec!["b.txt".to_string()]);
        assert_eq!(h.ws.tabs.active(), Some("b.txt"));
    }

    #[test]
    fn test_dirty_close_waits_and_cancel_changes_nothing() {
        let mut h = Harness::with_files(&[("a.txt", "alpha")]);
        h.send(open("a.txt"));
        h.type_into("a.txt", " beta");
        assert!(h.ws.tabs.is_dirty("a.txt"));

        h.send(close("a.txt"));
        assert_eq!(
            h.ws.tabs.pending_close().map(|p| p.path.as_str()),
            Some("a.txt")
        );
        assert!(h.ws.tabs.contains("a.txt"));

        h.send(WorkspaceMessage::ResolveClose(CloseDecision::Cancel));
        assert!(h.ws.tabs.pending_close().is_none());
        assert!(h.ws.tabs.contains("a.txt"));
        assert!(h.ws.tabs.is_dirty("a.txt"));
        assert_eq!(h.text("a.txt"), "alpha beta");
        assert_eq!(h.store.updates(), 0);
    }

    #[test]
    fn test_new_note_discard_issues_no_write() {
        let mut h = Harness::with_files(&[]);
        h.send(WorkspaceMessage::CreateEntry {
            name: "notes/todo.txt".to_string(),
            is_folder: false,
        });
        assert!(h.store.inner.exists("notes/todo.txt"));

        h.send(open("notes/todo.txt"));
        h.type_into("notes/todo.txt", "buy milk");
        assert!(h.ws.tabs.is_dirty("notes/todo.txt"));

        h.send(close("notes/todo.txt"));
        assert!(h.ws.tabs.pending_close().is_some());
        h.send(WorkspaceMessage::ResolveClose(CloseDecision::Discard));

        assert!(!h.ws.tabs.contains("notes/todo.txt"));
        assert_eq!(h.store.updates(), 0);
        assert_eq!(h.store.inner.content("notes/todo.txt").as_deref(), Some(""));
        h.wait_for_session(&session(&[], "", ""));
    }

    #[test]
    fn test_new_note_save_issues_one_write_then_closes() {
        let mut h = Harness::with_files(&[]);
        h.send(WorkspaceMessage::CreateEntry {
            name: "notes/todo.txt".to_string(),
            is_folder: false,
        });
        h.send(open("notes/todo.txt"));
        h.type_into("notes/todo.txt", "buy milk");

        h.send(close("notes/todo.txt"));
        h.send(WorkspaceMessage::ResolveClose(CloseDecision::Save));

        assert_eq!(h.store.updates(), 1);
        assert_eq!(
            h.store.inner.content("notes/todo.txt").as_deref(),
            Some("buy milk")
        );
        assert!(!h.ws.tabs.contains("notes/todo.txt"));
        h.wait_for_session(&session(&[], "", ""));
    }

    #[test]
    fn test_failed_save_on_close_keeps_tab() {
        let mut h = Harness::with_files(&[("a.txt", "alpha")]);
        h.send(open("a.txt"));
        h.type_into("a.txt", "!");
        h.store.fail_updates.store(true, Ordering::SeqCst);

        h.send(close("a.txt"));
        h.send(WorkspaceMessage::ResolveClose(CloseDecision::Save));

        assert_eq!(h.store.updates(), 1);
        assert!(h.ws.tabs.contains("a.txt"));
        assert!(h.ws.tabs.is_dirty("a.txt"));
        assert_eq!(h.store.inner.content("a.txt").as_deref(), Some("alpha"));
        let notice = h.notices.last().expect("failure notice");
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(notice.message.contains("connection refused"));
    }

    #[test]
    fn test_save_clears_dirty() {
        let mut h = Harness::with_files(&[("a.txt", "alpha")]);
        h.send(open("a.txt"));
        h.type_into("a.txt", "!");
        h.send(WorkspaceMessage::SaveActive);

        assert!(!h.ws.tabs.is_dirty("a.txt"));
        assert_eq!(h.store.inner.content("a.txt").as_deref(), Some("alpha!"));
        assert_eq!(h.ws.status(), "Saved a.txt");
    }

    #[test]
    fn test_edits_before_load_do_not_dirty() {
        let mut ws = Workspace::new();
        let effects = ws.dispatch(open("a.txt"));
        assert!(effects
            .iter()
            .any(|e| matches!(e, Effect::Store(StoreRequest::LoadDocument(p)) if p == "a.txt")));

        // The load has not completed; the editor must refuse the edit
        assert!(ws.editor.editable_text_mut("a.txt").is_none());
        ws.dispatch(WorkspaceMessage::BufferEdited("a.txt".to_string()));
        assert!(!ws.tabs.is_dirty("a.txt"));
        assert!(ws.dispatch(WorkspaceMessage::SaveActive).is_empty());
    }

    #[test]
    fn test_rename_inactive_and_active_files() {
        let mut h = Harness::with_files(&[("a.txt", "alpha"), ("b.txt", "beta")]);
        h.send(open("a.txt"));
        h.send(open("b.txt"));

        h.send(WorkspaceMessage::Rename {
            path: "a.txt".to_string(),
            new_name: "c.txt".to_string(),
        });
        assert_eq!(h.ws.tabs.paths(), vec!["c.txt".to_string(), "b.txt".to_string()]);
        assert_eq!(h.ws.tabs.active(), Some("b.txt"));
        assert_eq!(h.text("c.txt"), "alpha");

        h.send(WorkspaceMessage::Rename {
            path: "b.txt".to_string(),
            new_name: "d.txt".to_string(),
        });
        assert_eq!(h.ws.tabs.paths(), vec!["c.txt".to_string(), "d.txt".to_string()]);
        assert_eq!(h.ws.tabs.active(), Some("d.txt"));
        assert_eq!(h.text("d.txt"), "beta");
        assert!(h.store.inner.exists("d.txt"));
        assert!(!h.store.inner.exists("b.txt"));

        h.wait_for_session(&session(&["c.txt", "d.txt"], "d.txt", ""));
    }

    #[test]
    fn test_folder_rename_repoints_tabs_and_working_folder() {
        let mut h = Harness::with_files(&[("docs/a.md", "a"), ("docs/deep/b.md", "b")]);
        h.send(WorkspaceMessage::NavigateTo("docs/deep".to_string()));
        h.send(open("docs/a.md"));
        h.send(open("docs/deep/b.md"));

        h.send(WorkspaceMessage::Rename {
            path: "docs".to_string(),
            new_name: "papers".to_string(),
        });

        assert_eq!(
            h.ws.tabs.paths(),
            vec!["papers/a.md".to_string(), "papers/deep/b.md".to_string()]
        );
        assert_eq!(h.ws.tabs.active(), Some("papers/deep/b.md"));
        assert_eq!(h.ws.tree.working_folder(), "papers/deep");
        assert_eq!(h.text("papers/deep/b.md"), "b");
        h.wait_for_session(&session(
            &["papers/a.md", "papers/deep/b.md"],
            "papers/deep/b.md",
            "papers/deep",
        ));
    }

    #[test]
    fn test_rename_conflict_reports_store_message() {
        let mut h = Harness::with_files(&[("a.txt", "alpha"), ("b.txt", "beta")]);
        h.send(open("a.txt"));

        // The root listing was never loaded, so only the store can catch this
        h.send(WorkspaceMessage::Rename {
            path: "a.txt".to_string(),
            new_name: "b.txt".to_string(),
        });

        assert_eq!(h.ws.tree.inline_error(), Some("'b.txt' already exists"));
        let notice = h.notices.last().expect("conflict notice");
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(notice.message, "'b.txt' already exists");
        assert_eq!(h.ws.tabs.paths(), vec!["a.txt".to_string()]);
        assert_eq!(h.store.inner.content("b.txt").as_deref(), Some("beta"));
    }

    #[test]
    fn test_rename_into_loaded_sibling_is_caught_locally() {
        let mut h = Harness::with_files(&[("a.txt", "alpha"), ("b.txt", "beta")]);
        h.send(WorkspaceMessage::Startup);

        let effects = h.ws.dispatch(WorkspaceMessage::Rename {
            path: "a.txt".to_string(),
            new_name: "b.txt".to_string(),
        });
        assert!(effects.is_empty());
        assert_eq!(h.ws.tree.inline_error(), Some("'b.txt' already exists"));
    }

    #[test]
    fn test_rename_expanded_folder_stays_expanded() {
        let mut h = Harness::with_files(&[("notes/a.txt", "a"), ("b.txt", "b")]);
        h.send(WorkspaceMessage::Startup);
        h.send(WorkspaceMessage::ToggleFolder("notes".to_string()));
        assert!(h.ws.tree.is_expanded("notes"));

        h.send(WorkspaceMessage::Rename {
            path: "notes".to_string(),
            new_name: "journal".to_string(),
        });

        assert!(h.ws.tree.is_expanded("journal"));
        assert!(!h.ws.tree.is_expanded("notes"));
        let listed: Vec<String> = h
            .ws
            .tree
            .children("journal")
            .expect("renamed folder listed")
            .iter()
            .map(|entry| entry.path.clone())
            .collect();
        assert_eq!(listed, vec!["journal/a.txt".to_string()]);
    }

    #[test]
    fn test_late_load_keeps_typed_text() {
        let mut h = Harness::with_files(&[("a.txt", "alpha")]);
        h.send(open("a.txt"));
        h.type_into("a.txt", " beta");

        let effects = h.ws.apply_event(StoreEvent::DocumentLoaded {
            path: "a.txt".to_string(),
            result: Ok(Document {
                file_path: "a.txt".to_string(),
                content: "alpha".to_string(),
                is_folder: false,
            }),
        });
        assert!(effects.is_empty());
        assert_eq!(h.text("a.txt"), "alpha beta");
        assert!(h.ws.tabs.is_dirty("a.txt"));

        h.send(WorkspaceMessage::SaveActive);
        assert_eq!(h.store.inner.content("a.txt").as_deref(), Some("alpha beta"));
        assert!(!h.ws.tabs.is_dirty("a.txt"));
    }

    #[test]
    fn test_delete_closes_tabs_without_confirmation() {
        let mut h = Harness::with_files(&[("notes/a.txt", "a"), ("notes/b.txt", "b"), ("c.txt", "c")]);
        h.send(open("notes/a.txt"));
        h.send(open("c.txt"));
        h.send(open("notes/b.txt"));
        h.type_into("notes/b.txt", " edited");

        h.send(WorkspaceMessage::RequestDelete("notes".to_string()));
        assert_eq!(h.ws.pending_delete(), Some("notes"));
        assert!(h.store.inner.exists("notes"));

        h.send(WorkspaceMessage::ConfirmDelete);
        assert!(!h.store.inner.exists("notes/a.txt"));
        assert_eq!(h.ws.tabs.paths(), vec!["c.txt".to_string()]);
        assert_eq!(h.ws.tabs.active(), Some("c.txt"));
        assert!(h.ws.tabs.pending_close().is_none());
        h.wait_for_session(&session(&["c.txt"], "c.txt", ""));
    }

    #[test]
    fn test_cancel_delete_keeps_everything() {
        let mut h = Harness::with_files(&[("a.txt", "a")]);
        h.send(WorkspaceMessage::RequestDelete("a.txt".to_string()));
        h.send(WorkspaceMessage::CancelDelete);
        assert_eq!(h.ws.pending_delete(), None);
        assert!(h.store.inner.exists("a.txt"));
    }

    #[test]
    fn test_delete_working_folder_steps_out() {
        let mut h = Harness::with_files(&[("a/b/c.txt", "c")]);
        h.send(WorkspaceMessage::NavigateTo("a/b".to_string()));
        h.send(WorkspaceMessage::RequestDelete("a/b".to_string()));
        h.send(WorkspaceMessage::ConfirmDelete);

        assert_eq!(h.ws.tree.working_folder(), "a");
        h.wait_for_session(&session(&[], "", "a"));
    }

    #[test]
    fn test_session_round_trip() {
        let store = CountingStore::new(MemoryStore::with_files([
            ("a.txt", "alpha"),
            ("b.txt", "beta"),
            ("f/c.txt", "gamma"),
        ]));

        {
            let mut h = Harness::new(store.clone());
            h.send(WorkspaceMessage::Startup);
            h.send(open("a.txt"));
            h.send(open("b.txt"));
            h.send(WorkspaceMessage::NavigateTo("f".to_string()));
            h.wait_for_session(&session(&["a.txt", "b.txt"], "b.txt", "f"));
        }

        let mut restored = Harness::new(store);
        restored.send(WorkspaceMessage::Startup);
        assert!(restored.ws.session_ready());
        assert_eq!(
            restored.ws.tabs.paths(),
            vec!["a.txt".to_string(), "b.txt".to_string()]
        );
        assert_eq!(restored.ws.tabs.active(), Some("b.txt"));
        assert_eq!(restored.ws.tree.working_folder(), "f");
        assert_eq!(restored.text("a.txt"), "alpha");
        assert_eq!(restored.text("b.txt"), "beta");
        assert_eq!(restored.ws.tabs.dirty_count(), 0);
        let listed: Vec<String> = restored
            .ws
            .tree
            .children("f")
            .expect("working folder listed")
            .iter()
            .map(|entry| entry.path.clone())
            .collect();
        assert_eq!(listed, vec!["f/c.txt".to_string()]);
    }

    #[test]
    fn test_open_during_session_load_is_ignored() {
        let store = CountingStore::new(MemoryStore::with_files([
            ("a.txt", "1"),
            ("b.txt", "2"),
            ("x.txt", "3"),
        ]));
        seed_session(&store, session(&["a.txt", "b.txt"], "b.txt", ""));
        let mut h = Harness::new(store);

        let startup = h.ws.dispatch(WorkspaceMessage::Startup);
        assert!(h.ws.dispatch(open("x.txt")).is_empty());
        h.settle(startup);

        assert_eq!(h.ws.tabs.paths(), vec!["a.txt".to_string(), "b.txt".to_string()]);
        assert_eq!(h.ws.tabs.active(), Some("b.txt"));
        assert_eq!(h.ws.editor.len(), 2);
        assert_eq!(
            h.store.inner.stored_session(),
            Some(session(&["a.txt", "b.txt"], "b.txt", ""))
        );

        h.send(open("x.txt"));
        assert_eq!(h.ws.tabs.active(), Some("x.txt"));
        assert_eq!(h.text("x.txt"), "3");
        h.wait_for_session(&session(&["a.txt", "b.txt", "x.txt"], "x.txt", ""));
    }

    #[test]
    fn test_restore_falls_back_to_first_file() {
        let store = CountingStore::new(MemoryStore::with_files([("a.txt", "1"), ("b.txt", "2")]));
        seed_session(&store, session(&["a.txt", "b.txt"], "zzz.txt", ""));

        let mut h = Harness::new(store);
        h.send(WorkspaceMessage::Startup);
        assert_eq!(h.ws.tabs.active(), Some("a.txt"));
    }

    #[test]
    fn test_restore_drops_duplicates_and_missing_files() {
        let store = CountingStore::new(MemoryStore::with_files([("a.txt", "1"), ("b.txt", "2")]));
        seed_session(
            &store,
            session(&["a.txt", "gone.txt", "a.txt", "b.txt"], "b.txt", ""),
        );

        let mut h = Harness::new(store);
        h.send(WorkspaceMessage::Startup);
        assert_eq!(h.ws.tabs.paths(), vec!["a.txt".to_string(), "b.txt".to_string()]);
        assert_eq!(h.ws.tabs.active(), Some("b.txt"));
        assert_eq!(h.ws.editor.len(), 2);
    }

    #[test]
    fn test_missing_working_folder_falls_back_to_root() {
        let store = CountingStore::new(MemoryStore::with_files([("a.txt", "1")]));
        seed_session(&store, session(&["a.txt"], "a.txt", "gone"));

        let mut h = Harness::new(store);
        h.send(WorkspaceMessage::Startup);

        assert_eq!(h.ws.tree.working_folder(), "");
        assert!(h.ws.tree.children("").is_some());
        assert!(h
            .notices
            .iter()
            .any(|n| n.level == NoticeLevel::Warning && n.message.contains("gone")));
        h.wait_for_session(&session(&["a.txt"], "a.txt", ""));
    }

    #[test]
    fn test_startup_without_session_lists_root_sorted() {
        let mut h = Harness::with_files(&[("b.txt", ""), ("A.txt", ""), ("zeta/x", ""), ("Alpha/y", "")]);
        h.send(WorkspaceMessage::Startup);

        assert!(h.ws.tabs.is_empty());
        let names: Vec<&str> = h
            .ws
            .tree
            .children("")
            .expect("root listed")
            .iter()
            .map(|entry| entry.name.as_str())
            .collect();
        assert_eq!(names, vec!["Alpha", "zeta", "A.txt", "b.txt"]);
    }

    #[test]
    fn test_create_refreshes_listing() {
        let mut h = Harness::with_files(&[("a.txt", "")]);
        h.send(WorkspaceMessage::Startup);
        h.send(WorkspaceMessage::CreateEntry {
            name: "drafts".to_string(),
            is_folder: true,
        });

        let root = h.ws.tree.children("").expect("root listed");
        assert!(root.iter().any(|e| e.path == "drafts" && e.is_folder));
        assert!(h.ws.tree.inline_error().is_none());
    }

    #[test]
    fn test_create_existing_name_shows_inline_error() {
        let mut h = Harness::with_files(&[("a.txt", "")]);
        h.send(WorkspaceMessage::Startup);
        h.send(WorkspaceMessage::CreateEntry {
            name: "a.txt".to_string(),
            is_folder: false,
        });
        assert_eq!(h.ws.tree.inline_error(), Some("'a.txt' already exists"));
    }

    #[test]
    fn test_todo_search_reports_lines_and_offsets() {
        let mut h = Harness::with_files(&[
            ("notes/todo.txt", "TODO: milk\nnothing here\nlater todo"),
            ("readme.md", "no markers"),
            ("src/main.rs", "// ToDo fix"),
        ]);
        h.send(WorkspaceMessage::Search(SearchRequest {
            query: "TODO".to_string(),
            search_mode: SearchMode::Plain,
            case_sensitive: false,
            search_folder: String::new(),
        }));

        assert!(!h.ws.search.in_flight);
        assert!(h.ws.search.error.is_none());
        let results = h.ws.search.results.clone().expect("results");
        let files: Vec<&str> = results.iter().map(|r| r.file_path.as_str()).collect();
        assert_eq!(files, vec!["notes/todo.txt", "src/main.rs"]);

        let todo: Vec<(usize, usize, usize)> = results[0]
            .matches
            .iter()
            .map(|m| (m.line_number, m.match_start, m.match_end))
            .collect();
        assert_eq!(todo, vec![(1, 0, 4), (3, 6, 10)]);
        assert_eq!(
            (results[1].matches[0].match_start, results[1].matches[0].match_end),
            (3, 7)
        );
    }

    #[test]
    fn test_search_in_missing_folder_sets_error() {
        let mut h = Harness::with_files(&[("a.txt", "TODO")]);
        h.send(WorkspaceMessage::Search(SearchRequest {
            query: "TODO".to_string(),
            search_mode: SearchMode::Plain,
            case_sensitive: false,
            search_folder: "nowhere".to_string(),
        }));
        assert!(h.ws.search.results.is_none());
        assert!(h.ws.search.error.is_some());
    }

    #[test]
    fn test_open_missing_file_shows_load_error() {
        let mut h = Harness::with_files(&[]);
        h.send(open("ghost.txt"));
        assert!(h.ws.tabs.contains("ghost.txt"));
        let buffer = h.ws.editor.get("ghost.txt").expect("buffer");
        assert!(!buffer.is_editing());

        let effects = h.ws.dispatch(WorkspaceMessage::RetryLoad("ghost.txt".to_string()));
        assert_eq!(
            effects,
            vec![Effect::Store(StoreRequest::LoadDocument("ghost.txt".to_string()))]
        );
    }
}
