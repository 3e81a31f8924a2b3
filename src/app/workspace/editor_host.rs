//! Editor buffers, one per open tab.
//!
//! A buffer starts in [`EditorPhase::Loading`] and only becomes editable once
//! the store content has replaced its text. Edits made before that point are
//! impossible because the widget is never handed the text, so a freshly
//! loaded file can never be flagged dirty by its own load.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorPhase {
    Loading,
    Editing,
    LoadFailed(String),
}

#[derive(Debug, Clone)]
pub struct EditorBuffer {
    pub path: String,
    text: String,
    phase: EditorPhase,
    /// Bumped on every accepted edit
    revision: u64,
}

impl EditorBuffer {
    fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            text: String::new(),
            phase: EditorPhase::Loading,
            revision: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn phase(&self) -> &EditorPhase {
        &self.phase
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_editing(&self) -> bool {
        self.phase == EditorPhase::Editing
    }

    pub fn line_count(&self) -> usize {
        self.text.lines().count().max(1)
    }
}

#[derive(Debug, Clone, Default)]
pub struct EditorHost {
    buffers: HashMap<String, EditorBuffer>,
}

impl EditorHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer for `path`. Returns `true` when one was created and
    /// its content must be loaded.
    pub fn open(&mut self, path: &str) -> bool {
        if self.buffers.contains_key(path) {
            return false;
        }
        self.buffers
            .insert(path.to_string(), EditorBuffer::new(path));
        true
    }

    pub fn close(&mut self, path: &str) -> bool {
        self.buffers.remove(path).is_some()
    }

    pub fn get(&self, path: &str) -> Option<&EditorBuffer> {
        self.buffers.get(path)
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Put a buffer back into `Loading` for another attempt.
    pub fn retry(&mut self, path: &str) -> bool {
        match self.buffers.get_mut(path) {
            Some(buffer) if matches!(buffer.phase, EditorPhase::LoadFailed(_)) => {
                buffer.phase = EditorPhase::Loading;
                true
            }
            _ => false,
        }
    }

    /// Replace the text with loaded content and switch to `Editing`.
    ///
    /// A buffer that already holds user edits keeps them; the load is dropped
    /// and `false` is returned.
    pub fn loaded(&mut self, path: &str, content: String) -> bool {
        match self.buffers.get_mut(path) {
            Some(buffer) if buffer.is_editing() && buffer.revision > 0 => false,
            Some(buffer) => {
                buffer.text = content;
                buffer.phase = EditorPhase::Editing;
                buffer.revision = 0;
                true
            }
            None => false,
        }
    }

    /// Mark the load as failed. A buffer that already holds user edits is
    /// left alone.
    pub fn load_failed(&mut self, path: &str, message: String) {
        match self.buffers.get_mut(path) {
            Some(buffer) if buffer.is_editing() && buffer.revision > 0 => {}
            Some(buffer) => buffer.phase = EditorPhase::LoadFailed(message),
            None => {}
        }
    }

    /// Text the editor widget may mutate. `None` unless the buffer is in `Editing`.
    pub fn editable_text_mut(&mut self, path: &str) -> Option<&mut String> {
        self.buffers
            .get_mut(path)
            .filter(|buffer| buffer.is_editing())
            .map(|buffer| &mut buffer.text)
    }

    /// Record that the widget changed the text. Ignored outside `Editing`.
    pub fn record_edit(&mut self, path: &str) -> bool {
        match self.buffers.get_mut(path) {
            Some(buffer) if buffer.is_editing() => {
                buffer.revision += 1;
                true
            }
            _ => false,
        }
    }

    /// Replace the whole text as an edit. Ignored outside `Editing`.
    pub fn replace_text(&mut self, path: &str, text: String) -> bool {
        match self.editable_text_mut(path) {
            Some(current) => {
                *current = text;
                self.record_edit(path)
            }
            None => false,
        }
    }

    /// Drop every buffer whose path fails `keep` and return the dropped paths.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) -> Vec<String> {
        let dropped: Vec<String> = self
            .buffers
            .keys()
            .filter(|path| !keep(path))
            .cloned()
            .collect();
        for path in &dropped {
            self.buffers.remove(path);
        }
        dropped
    }

    /// Move a buffer to a new path, overwriting any buffer already there.
    pub fn rename(&mut self, old: &str, new: &str) {
        if let Some(mut buffer) = self.buffers.remove(old) {
            buffer.path = new.to_string();
            self.buffers.insert(new.to_string(), buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_editable_while_loading() {
        let mut host = EditorHost::new();
        assert!(host.open("a.txt"));
        assert!(!host.open("a.txt"));
        assert!(host.editable_text_mut("a.txt").is_none());
        assert!(!host.record_edit("a.txt"));
        assert!(!host.replace_text("a.txt", "typed early".to_string()));

        host.loaded("a.txt", "hello".to_string());
        let buffer = host.get("a.txt").unwrap();
        assert_eq!(buffer.text(), "hello");
        assert_eq!(buffer.revision(), 0);
        assert!(buffer.is_editing());
    }

    #[test]
    fn test_edits_bump_revision() {
        let mut host = EditorHost::new();
        host.open("a.txt");
        host.loaded("a.txt", String::new());
        host.editable_text_mut("a.txt").unwrap().push_str("x");
        assert!(host.record_edit("a.txt"));
        assert!(host.replace_text("a.txt", "y".to_string()));
        assert_eq!(host.get("a.txt").unwrap().revision(), 2);
        assert_eq!(host.get("a.txt").unwrap().text(), "y");
    }

    #[test]
    fn test_load_failure_and_retry() {
        let mut host = EditorHost::new();
        host.open("a.txt");
        host.load_failed("a.txt", "gone".to_string());
        assert_eq!(
            host.get("a.txt").unwrap().phase(),
            &EditorPhase::LoadFailed("gone".to_string())
        );
        assert!(host.retry("a.txt"));
        assert!(!host.retry("a.txt"));
        assert_eq!(host.get("a.txt").unwrap().phase(), &EditorPhase::Loading);
    }

    #[test]
    fn test_late_load_keeps_user_edits() {
        let mut host = EditorHost::new();
        host.open("a.txt");
        assert!(host.loaded("a.txt", "v1".to_string()));
        // Untouched buffers take the newer answer
        assert!(host.loaded("a.txt", "v2".to_string()));
        assert!(host.replace_text("a.txt", "typed".to_string()));

        assert!(!host.loaded("a.txt", "v1".to_string()));
        host.load_failed("a.txt", "timed out".to_string());
        let buffer = host.get("a.txt").unwrap();
        assert_eq!(buffer.text(), "typed");
        assert_eq!(buffer.revision(), 1);
        assert!(buffer.is_editing());
    }

    #[test]
    fn test_retain_drops_unlisted_buffers() {
        let mut host = EditorHost::new();
        host.open("a.txt");
        host.open("x.txt");
        assert_eq!(host.retain(|path| path == "a.txt"), vec!["x.txt".to_string()]);
        assert_eq!(host.len(), 1);
        assert!(host.get("a.txt").is_some());
    }

    #[test]
    fn test_rename_moves_buffer() {
        let mut host = EditorHost::new();
        host.open("a.txt");
        host.loaded("a.txt", "body".to_string());
        host.rename("a.txt", "b.txt");
        assert!(host.get("a.txt").is_none());
        let moved = host.get("b.txt").unwrap();
        assert_eq!(moved.path, "b.txt");
        assert_eq!(moved.text(), "body");
    }
}
