//! Document store client.
//!
//! The store is a remote service holding a tree of text documents and the
//! editor session. Everything the application knows about it goes through the
//! [`DocumentStore`] trait so the UI state machine can run against the HTTP
//! client in production and against [`MemoryStore`] in tests or offline use.
//!
//! # Contract
//!
//! | Operation | HTTP |
//! |---|---|
//! | [`DocumentStore::list`] | `GET /documents?parent=<path>` |
//! | [`DocumentStore::get`] | `GET /documents/<path>` |
//! | [`DocumentStore::create`] | `POST /documents` |
//! | [`DocumentStore::update`] | `PUT /documents/<path>` |
//! | [`DocumentStore::delete`] | `DELETE /documents/<path>` |
//! | [`DocumentStore::rename`] | `POST /documents/rename` |
//! | [`DocumentStore::search`] | `POST /documents/search` |
//! | [`DocumentStore::load_session`] | `GET /session` |
//! | [`DocumentStore::save_session`] | `POST /session` |

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::app::search::{SearchRequest, SearchResult};
use crate::app::workspace::session::Session;

pub mod error;
pub mod http;
pub mod memory;

pub use error::{ErrorCode, StoreError};
pub use http::HttpDocumentStore;
pub use memory::MemoryStore;

/// A tree entry as returned by a folder listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub file_path: String,
    #[serde(default)]
    pub is_folder: bool,
}

impl DocumentMetadata {
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            file_path: path.into(),
            is_folder: false,
        }
    }

    pub fn folder(path: impl Into<String>) -> Self {
        Self {
            file_path: path.into(),
            is_folder: true,
        }
    }

    pub fn name(&self) -> &str {
        crate::app::paths::file_name(&self.file_path)
    }
}

/// A document with its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub file_path: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub is_folder: bool,
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Immediate children of `parent`; the empty string lists the root.
    async fn list(&self, parent: &str) -> StoreResult<Vec<DocumentMetadata>>;

    async fn get(&self, path: &str) -> StoreResult<Document>;

    /// Create a document or folder. Fails with a conflict when `path` exists.
    async fn create(&self, path: &str, content: &str, is_folder: bool) -> StoreResult<Document>;

    async fn update(&self, path: &str, content: &str) -> StoreResult<Document>;

    async fn delete(&self, path: &str) -> StoreResult<()>;

    /// Move a document or folder. Fails with `file_exists` when `new_path` is taken.
    async fn rename(&self, old_path: &str, new_path: &str) -> StoreResult<DocumentMetadata>;

    async fn search(&self, request: &SearchRequest) -> StoreResult<Vec<SearchResult>>;

    /// The persisted session, or `None` when nothing was ever saved.
    async fn load_session(&self) -> StoreResult<Option<Session>>;

    async fn save_session(&self, session: &Session) -> StoreResult<()>;
}

/// Rename request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameRequest {
    pub old_path: String,
    pub new_path: String,
}
