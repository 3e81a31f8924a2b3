//! Open-tabs controller.
//!
//! Owns the ordered list of open files, the active pointer and the pending
//! close confirmation. Every transition is a plain method with no I/O; the
//! caller turns the outcome into store requests.

use super::session::Session;
use crate::app::paths;

/// One open tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenFile {
    pub path: String,
    /// Content differs from what was last loaded or saved
    pub dirty: bool,
    /// Logical time of the last open, focus or edit
    touched: u64,
}

impl OpenFile {
    pub fn name(&self) -> &str {
        paths::file_name(&self.path)
    }
}

/// A close confirmation that is waiting for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingClose {
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseDecision {
    Save,
    Discard,
    Cancel,
}

/// Result of asking to close a tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseRequest {
    /// The tab was clean and is gone
    Closed,
    /// The tab is dirty; a [`PendingClose`] now waits for a decision
    ConfirmationRequired,
    NotOpen,
}

/// Result of answering a close confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseResolution {
    /// The buffer must be saved; the tab stays until the save succeeds
    SaveRequested(String),
    /// The tab was removed without saving
    Discarded(String),
    Cancelled,
    NothingPending,
}

/// How a rename affected an open tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameOutcome {
    /// The tab now carries the new path
    Moved,
    /// The new path was also open; the renamed tab was more recent and replaced it
    ReplacedExisting,
    /// The new path was also open and more recent; the renamed tab was dropped
    KeptExisting,
}

#[derive(Debug, Clone, Default)]
pub struct OpenTabs {
    files: Vec<OpenFile>,
    active: Option<String>,
    pending_close: Option<PendingClose>,
    clock: u64,
}

impl OpenTabs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[OpenFile] {
        &self.files
    }

    pub fn paths(&self) -> Vec<String> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn pending_close(&self) -> Option<&PendingClose> {
        self.pending_close.as_ref()
    }

    pub fn get(&self, path: &str) -> Option<&OpenFile> {
        self.files.iter().find(|f| f.path == path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn is_dirty(&self, path: &str) -> bool {
        self.get(path).is_some_and(|f| f.dirty)
    }

    pub fn dirty_count(&self) -> usize {
        self.files.iter().filter(|f| f.dirty).count()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn position(&self, path: &str) -> Option<usize> {
        self.files.iter().position(|f| f.path == path)
    }

    fn touch(&mut self, index: usize) {
        let now = self.tick();
        self.files[index].touched = now;
    }

    /// Open `path` as a clean tab, or refocus it when already open.
    ///
    /// Returns `true` when a new tab was added.
    pub fn open_file(&mut self, path: &str) -> bool {
        let added = match self.position(path) {
            Some(index) => {
                self.touch(index);
                false
            }
            None => {
                let touched = self.tick();
                self.files.push(OpenFile {
                    path: path.to_string(),
                    dirty: false,
                    touched,
                });
                true
            }
        };
        self.active = Some(path.to_string());
        added
    }

    /// Make an open tab active. Returns `false` when `path` is not open.
    pub fn focus(&mut self, path: &str) -> bool {
        match self.position(path) {
            Some(index) => {
                self.touch(index);
                self.active = Some(path.to_string());
                true
            }
            None => false,
        }
    }

    pub fn close_tab(&mut self, path: &str) -> CloseRequest {
        match self.get(path) {
            None => CloseRequest::NotOpen,
            Some(file) if file.dirty => {
                self.pending_close = Some(PendingClose {
                    path: path.to_string(),
                });
                CloseRequest::ConfirmationRequired
            }
            Some(_) => {
                self.remove(path);
                CloseRequest::Closed
            }
        }
    }

    pub fn confirm_close(&mut self, decision: CloseDecision) -> CloseResolution {
        let Some(pending) = self.pending_close.take() else {
            return CloseResolution::NothingPending;
        };
        match decision {
            CloseDecision::Save => CloseResolution::SaveRequested(pending.path),
            CloseDecision::Discard => {
                self.remove(&pending.path);
                CloseResolution::Discarded(pending.path)
            }
            CloseDecision::Cancel => CloseResolution::Cancelled,
        }
    }

    /// Drop a tab unconditionally.
    ///
    /// When the active tab goes, the last remaining tab becomes active.
    pub fn remove(&mut self, path: &str) -> bool {
        let Some(index) = self.position(path) else {
            return false;
        };
        self.files.remove(index);
        if self
            .pending_close
            .as_ref()
            .is_some_and(|pending| pending.path == path)
        {
            self.pending_close = None;
        }
        if self.active.as_deref() == Some(path) {
            self.active = self.files.last().map(|f| f.path.clone());
        }
        true
    }

    /// Remove the tab for `path` and every tab inside it when `path` is a folder.
    pub fn remove_under(&mut self, path: &str) -> Vec<String> {
        let doomed: Vec<String> = self
            .files
            .iter()
            .filter(|f| paths::is_within(&f.path, path))
            .map(|f| f.path.clone())
            .collect();
        for file in &doomed {
            self.remove(file);
        }
        doomed
    }

    /// Flag a tab as edited. Returns `true` when the flag changed.
    pub fn mark_dirty(&mut self, path: &str) -> bool {
        let Some(index) = self.position(path) else {
            return false;
        };
        self.touch(index);
        let file = &mut self.files[index];
        let changed = !file.dirty;
        file.dirty = true;
        changed
    }

    pub fn clear_dirty(&mut self, path: &str) -> bool {
        match self.files.iter_mut().find(|f| f.path == path) {
            Some(file) => {
                let changed = file.dirty;
                file.dirty = false;
                changed
            }
            None => false,
        }
    }

    /// Re-point the tab for `old` to `new`.
    ///
    /// If `new` is open too, the more recently touched of the two survives
    /// under `new`. Returns `None` when `old` is not open.
    pub fn rename_open_file(&mut self, old: &str, new: &str) -> Option<RenameOutcome> {
        if old == new {
            return self.position(old).map(|_| RenameOutcome::Moved);
        }
        let old_index = self.position(old)?;

        let outcome = match self.position(new) {
            None => {
                self.files[old_index].path = new.to_string();
                RenameOutcome::Moved
            }
            Some(new_index) => {
                if self.files[old_index].touched >= self.files[new_index].touched {
                    self.files[old_index].path = new.to_string();
                    self.files.remove(new_index);
                    RenameOutcome::ReplacedExisting
                } else {
                    self.files.remove(old_index);
                    RenameOutcome::KeptExisting
                }
            }
        };

        if self.active.as_deref() == Some(old) {
            self.active = Some(new.to_string());
        }
        if let Some(pending) = self.pending_close.as_mut() {
            if pending.path == old {
                pending.path = new.to_string();
            }
        }
        Some(outcome)
    }

    /// Re-point every tab at or under `old_folder` to live under `new_folder`.
    pub fn rebase_folder(
        &mut self,
        old_folder: &str,
        new_folder: &str,
    ) -> Vec<(String, String, RenameOutcome)> {
        let moves: Vec<(String, String)> = self
            .files
            .iter()
            .filter_map(|f| {
                paths::rebase(&f.path, old_folder, new_folder).map(|new| (f.path.clone(), new))
            })
            .collect();

        moves
            .into_iter()
            .filter_map(|(old, new)| {
                self.rename_open_file(&old, &new)
                    .map(|outcome| (old, new, outcome))
            })
            .collect()
    }

    pub fn snapshot(&self, working_folder: &str) -> Session {
        Session {
            opened_files: self.paths(),
            last_active_file: self.active.clone().unwrap_or_default(),
            working_folder: working_folder.to_string(),
        }
    }

    /// Replace all tabs with the ones in `session`. Restored tabs are clean.
    pub fn restore(&mut self, session: &Session) {
        let session = session.clone().sanitized();
        self.files.clear();
        self.pending_close = None;
        for path in &session.opened_files {
            let touched = self.tick();
            self.files.push(OpenFile {
                path: path.clone(),
                dirty: false,
                touched,
            });
        }
        self.active = session.active_file().map(str::to_string);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tabs_with(paths: &[&str]) -> OpenTabs {
        let mut tabs = OpenTabs::new();
        for path in paths {
            tabs.open_file(path);
        }
        tabs
    }

    #[test]
    fn test_reopen_only_refocuses() {
        let mut tabs = tabs_with(&["a", "b"]);
        assert!(!tabs.open_file("a"));
        assert_eq!(tabs.paths(), vec!["a", "b"]);
        assert_eq!(tabs.active(), Some("a"));
    }

    #[test]
    fn test_close_active_selects_last_remaining() {
        let mut tabs = tabs_with(&["a", "b", "c"]);
        tabs.focus("b");
        assert_eq!(tabs.close_tab("b"), CloseRequest::Closed);
        assert_eq!(tabs.active(), Some("c"));

        tabs.close_tab("c");
        assert_eq!(tabs.active(), Some("a"));
        tabs.close_tab("a");
        assert_eq!(tabs.active(), None);
        assert!(tabs.is_empty());
    }

    #[test]
    fn test_close_inactive_keeps_active() {
        let mut tabs = tabs_with(&["a", "b"]);
        tabs.close_tab("a");
        assert_eq!(tabs.active(), Some("b"));
    }

    #[test]
    fn test_dirty_close_needs_decision() {
        let mut tabs = tabs_with(&["a"]);
        tabs.mark_dirty("a");
        assert_eq!(tabs.close_tab("a"), CloseRequest::ConfirmationRequired);
        assert!(tabs.contains("a"));
        assert_eq!(tabs.pending_close().map(|p| p.path.as_str()), Some("a"));

        assert_eq!(tabs.confirm_close(CloseDecision::Cancel), CloseResolution::Cancelled);
        assert!(tabs.contains("a"));
        assert!(tabs.is_dirty("a"));
        assert!(tabs.pending_close().is_none());

        tabs.close_tab("a");
        assert_eq!(
            tabs.confirm_close(CloseDecision::Discard),
            CloseResolution::Discarded("a".to_string())
        );
        assert!(!tabs.contains("a"));
    }

    #[test]
    fn test_save_decision_keeps_tab_until_saved() {
        let mut tabs = tabs_with(&["a"]);
        tabs.mark_dirty("a");
        tabs.close_tab("a");
        assert_eq!(
            tabs.confirm_close(CloseDecision::Save),
            CloseResolution::SaveRequested("a".to_string())
        );
        assert!(tabs.contains("a"));
        assert_eq!(tabs.confirm_close(CloseDecision::Save), CloseResolution::NothingPending);
    }

    #[test]
    fn test_rename_active_and_inactive() {
        let mut tabs = tabs_with(&["a", "b"]);
        assert_eq!(tabs.rename_open_file("b", "b2"), Some(RenameOutcome::Moved));
        assert_eq!(tabs.active(), Some("b2"));

        assert_eq!(tabs.rename_open_file("a", "a2"), Some(RenameOutcome::Moved));
        assert_eq!(tabs.active(), Some("b2"));
        assert_eq!(tabs.paths(), vec!["a2", "b2"]);
        assert_eq!(tabs.rename_open_file("zzz", "y"), None);
    }

    #[test]
    fn test_rename_onto_open_file_keeps_most_recent() {
        let mut tabs = tabs_with(&["a", "b"]);
        tabs.mark_dirty("a");
        // "a" was touched last, so it survives under the new name
        assert_eq!(
            tabs.rename_open_file("a", "b"),
            Some(RenameOutcome::ReplacedExisting)
        );
        assert_eq!(tabs.paths(), vec!["b"]);
        assert!(tabs.is_dirty("b"));

        let mut tabs = tabs_with(&["a", "b"]);
        tabs.mark_dirty("b");
        assert_eq!(tabs.rename_open_file("a", "b"), Some(RenameOutcome::KeptExisting));
        assert_eq!(tabs.paths(), vec!["b"]);
        assert!(tabs.is_dirty("b"));
    }

    #[test]
    fn test_rebase_folder() {
        let mut tabs = tabs_with(&["notes/a.txt", "notes/deep/b.txt", "notes2/c.txt"]);
        let moved = tabs.rebase_folder("notes", "archive");
        assert_eq!(moved.len(), 2);
        assert_eq!(
            tabs.paths(),
            vec!["archive/a.txt", "archive/deep/b.txt", "notes2/c.txt"]
        );
        assert_eq!(tabs.active(), Some("notes2/c.txt"));
    }

    #[test]
    fn test_remove_under_folder() {
        let mut tabs = tabs_with(&["notes/a.txt", "other.txt", "notes/b.txt"]);
        tabs.mark_dirty("notes/a.txt");
        let removed = tabs.remove_under("notes");
        assert_eq!(removed, vec!["notes/a.txt", "notes/b.txt"]);
        assert_eq!(tabs.paths(), vec!["other.txt"]);
        assert_eq!(tabs.active(), Some("other.txt"));
    }

    #[test]
    fn test_snapshot_and_restore() {
        let mut tabs = tabs_with(&["a", "b"]);
        tabs.focus("a");
        let session = tabs.snapshot("f");
        assert_eq!(session, Session::new(vec!["a".into(), "b".into()], "a", "f"));

        let mut restored = OpenTabs::new();
        restored.restore(&Session::new(vec!["a".into(), "b".into()], "b", "f"));
        assert_eq!(restored.paths(), vec!["a", "b"]);
        assert_eq!(restored.active(), Some("b"));
        assert_eq!(restored.dirty_count(), 0);
    }
}
