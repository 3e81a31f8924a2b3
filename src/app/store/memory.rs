//! In-process document store.
//!
//! Holds the whole tree in a map keyed by path and answers every
//! [`DocumentStore`] call the way the HTTP store does, including its error
//! codes. Used by the test suite and by the `memory` backend for working
//! without a server.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

use super::{Document, DocumentMetadata, DocumentStore, ErrorCode, StoreError, StoreResult};
use crate::app::paths;
use crate::app::search::{find_matches, SearchRequest, SearchResult};
use crate::app::workspace::session::Session;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    File(String),
    Folder,
}

#[derive(Debug, Default)]
struct Inner {
    nodes: BTreeMap<String, Node>,
    session: Option<Session>,
}

impl Inner {
    fn is_folder(&self, path: &str) -> bool {
        path.is_empty() || matches!(self.nodes.get(path), Some(Node::Folder))
    }

    fn ensure_ancestors(&mut self, path: &str) {
        let mut folder = paths::parent(path);
        while !folder.is_empty() {
            self.nodes.entry(folder.clone()).or_insert(Node::Folder);
            folder = paths::parent(&folder);
        }
    }

    fn subtree_keys(&self, path: &str) -> Vec<String> {
        self.nodes
            .keys()
            .filter(|key| paths::is_within(key, path))
            .cloned()
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from `(path, content)` pairs. Folders are created as needed.
    pub fn with_files<'a>(files: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.lock();
            for (path, content) in files {
                let path = paths::normalize(path);
                inner.ensure_ancestors(&path);
                inner.nodes.insert(path, Node::File(content.to_string()));
            }
        }
        store
    }

    /// Add an empty folder.
    pub fn add_folder(&self, path: &str) {
        let path = paths::normalize(path);
        let mut inner = self.lock();
        inner.ensure_ancestors(&path);
        inner.nodes.insert(path, Node::Folder);
    }

    /// Current content of a file, if it exists.
    pub fn content(&self, path: &str) -> Option<String> {
        match self.lock().nodes.get(&paths::normalize(path)) {
            Some(Node::File(content)) => Some(content.clone()),
            _ => None,
        }
    }

    pub fn exists(&self, path: &str) -> bool {
        self.lock().nodes.contains_key(&paths::normalize(path))
    }

    /// The session as last written, bypassing the existence filter of `load_session`.
    pub fn stored_session(&self) -> Option<Session> {
        self.lock().session.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock only means another test thread panicked mid-call
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list(&self, parent: &str) -> StoreResult<Vec<DocumentMetadata>> {
        let parent = paths::normalize(parent);
        let inner = self.lock();
        if !inner.is_folder(&parent) {
            return Err(StoreError::not_found(
                ErrorCode::FolderNotFound,
                format!("folder '{}' does not exist", parent),
            ));
        }
        Ok(inner
            .nodes
            .iter()
            .filter(|(path, _)| !path.is_empty() && paths::parent(path) == parent)
            .map(|(path, node)| DocumentMetadata {
                file_path: paths::file_name(path).to_string(),
                is_folder: matches!(node, Node::Folder),
            })
            .collect())
    }

    async fn get(&self, path: &str) -> StoreResult<Document> {
        let path = paths::normalize(path);
        match self.lock().nodes.get(&path) {
            Some(Node::File(content)) => Ok(Document {
                file_path: path.clone(),
                content: content.clone(),
                is_folder: false,
            }),
            Some(Node::Folder) => Err(StoreError::Rejected {
                status: 400,
                code: None,
                message: format!("'{}' is a folder", path),
            }),
            None => Err(StoreError::NotFound {
                code: None,
                message: format!("'{}' does not exist", path),
            }),
        }
    }

    async fn create(&self, path: &str, content: &str, is_folder: bool) -> StoreResult<Document> {
        let path = paths::normalize(path);
        if path.is_empty() {
            return Err(StoreError::Validation("filePath is required".to_string()));
        }
        let mut inner = self.lock();
        if inner.nodes.contains_key(&path) {
            return Err(StoreError::file_exists(&path));
        }
        inner.ensure_ancestors(&path);
        let node = if is_folder {
            Node::Folder
        } else {
            Node::File(content.to_string())
        };
        inner.nodes.insert(path.clone(), node);
        Ok(Document {
            file_path: path,
            content: if is_folder { String::new() } else { content.to_string() },
            is_folder,
        })
    }

    async fn update(&self, path: &str, content: &str) -> StoreResult<Document> {
        let path = paths::normalize(path);
        let mut inner = self.lock();
        if matches!(inner.nodes.get(&path), Some(Node::Folder)) {
            return Err(StoreError::Rejected {
                status: 400,
                code: None,
                message: format!("'{}' is a folder", path),
            });
        }
        inner.ensure_ancestors(&path);
        inner
            .nodes
            .insert(path.clone(), Node::File(content.to_string()));
        Ok(Document {
            file_path: path,
            content: content.to_string(),
            is_folder: false,
        })
    }

    async fn delete(&self, path: &str) -> StoreResult<()> {
        let path = paths::normalize(path);
        let mut inner = self.lock();
        if path.is_empty() || !inner.nodes.contains_key(&path) {
            return Err(StoreError::NotFound {
                code: None,
                message: format!("'{}' does not exist", path),
            });
        }
        for key in inner.subtree_keys(&path) {
            inner.nodes.remove(&key);
        }
        Ok(())
    }

    async fn rename(&self, old_path: &str, new_path: &str) -> StoreResult<DocumentMetadata> {
        let old_path = paths::normalize(old_path);
        let new_path = paths::normalize(new_path);
        let mut inner = self.lock();
        let is_folder = match inner.nodes.get(&old_path) {
            Some(node) => matches!(node, Node::Folder),
            None => {
                return Err(StoreError::NotFound {
                    code: None,
                    message: format!("'{}' does not exist", old_path),
                })
            }
        };
        if new_path.is_empty() {
            return Err(StoreError::Validation("new path is required".to_string()));
        }
        if inner.nodes.contains_key(&new_path) {
            return Err(StoreError::file_exists(&new_path));
        }
        if paths::is_within(&new_path, &old_path) {
            return Err(StoreError::Validation(format!(
                "cannot move '{}' inside itself",
                old_path
            )));
        }

        inner.ensure_ancestors(&new_path);
        for key in inner.subtree_keys(&old_path) {
            if let (Some(node), Some(target)) = (
                inner.nodes.remove(&key),
                paths::rebase(&key, &old_path, &new_path),
            ) {
                inner.nodes.insert(target, node);
            }
        }
        Ok(DocumentMetadata {
            file_path: new_path,
            is_folder,
        })
    }

    async fn search(&self, request: &SearchRequest) -> StoreResult<Vec<SearchResult>> {
        request.validate().map_err(StoreError::Validation)?;
        let folder = paths::normalize(&request.search_folder);
        let inner = self.lock();
        if !inner.is_folder(&folder) {
            return Err(StoreError::not_found(
                ErrorCode::FolderNotFound,
                format!("folder '{}' does not exist", folder),
            ));
        }

        let mut results = Vec::new();
        for (path, node) in inner.nodes.iter() {
            let Node::File(content) = node else {
                continue;
            };
            if !paths::is_within(path, &folder) {
                continue;
            }
            let matches = find_matches(content, request).map_err(StoreError::Validation)?;
            if !matches.is_empty() {
                results.push(SearchResult {
                    file_path: path.clone(),
                    matches,
                });
            }
        }
        Ok(results)
    }

    async fn load_session(&self) -> StoreResult<Option<Session>> {
        let inner = self.lock();
        // Files deleted since the session was written are dropped
        Ok(inner.session.clone().map(|mut session| {
            session
                .opened_files
                .retain(|path| matches!(inner.nodes.get(path), Some(Node::File(_))));
            session
        }))
    }

    async fn save_session(&self, session: &Session) -> StoreResult<()> {
        self.lock().session = Some(session.clone());
        Ok(())
    }
}
