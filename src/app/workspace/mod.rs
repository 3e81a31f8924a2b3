//! Workspace state and message dispatch.
//!
//! [`Workspace`] owns every piece of UI state that matters: the file tree, the
//! open tabs, the editor buffers, the search panel and the pending delete
//! confirmation. The UI never mutates it directly. It sends a
//! [`WorkspaceMessage`] through [`Workspace::dispatch`], and completions of
//! store calls come back through [`Workspace::apply_event`]. Both return the
//! [`Effect`]s the shell has to carry out, so the whole state machine runs in
//! tests without a window or a network.

use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::app::paths;
use crate::app::search::{self, SearchRequest, SearchResult};
use crate::app::store::{Document, DocumentMetadata, StoreError, StoreResult};

pub mod editor_host;
pub mod file_tree;
pub mod session;
pub mod tabs;

pub use editor_host::{EditorBuffer, EditorHost, EditorPhase};
pub use file_tree::{FileTree, FolderStatus, TreeEntry};
pub use session::Session;
pub use tabs::{CloseDecision, CloseRequest, CloseResolution, OpenFile, OpenTabs, PendingClose};

/// User intent, as sent by the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkspaceMessage {
    /// Load the persisted session and the initial listing
    Startup,
    OpenFile(String),
    FocusTab(String),
    CloseTab(String),
    ResolveClose(CloseDecision),
    /// The editor widget changed the buffer of this path
    BufferEdited(String),
    Save(String),
    SaveActive,
    RetryLoad(String),
    NavigateTo(String),
    NavigateUp,
    ToggleFolder(String),
    Refresh,
    /// Create a file or folder; the name is relative to the working folder
    CreateEntry { name: String, is_folder: bool },
    RequestDelete(String),
    ConfirmDelete,
    CancelDelete,
    Rename { path: String, new_name: String },
    Search(SearchRequest),
    ClearSearch,
}

impl WorkspaceMessage {
    /// Tab and navigation changes that would overwrite the stored session if
    /// accepted while it is still being fetched.
    fn waits_for_session(&self) -> bool {
        matches!(
            self,
            Self::OpenFile(_)
                | Self::FocusTab(_)
                | Self::CloseTab(_)
                | Self::ResolveClose(_)
                | Self::NavigateTo(_)
                | Self::NavigateUp
        )
    }
}

/// Completion of a store request.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    SessionLoaded(StoreResult<Option<Session>>),
    FolderListed {
        folder: String,
        result: StoreResult<Vec<DocumentMetadata>>,
    },
    DocumentLoaded {
        path: String,
        result: StoreResult<Document>,
    },
    DocumentSaved {
        path: String,
        revision: u64,
        result: StoreResult<Document>,
    },
    Created {
        path: String,
        is_folder: bool,
        result: StoreResult<Document>,
    },
    Deleted {
        path: String,
        result: StoreResult<()>,
    },
    Renamed {
        old_path: String,
        new_path: String,
        result: StoreResult<DocumentMetadata>,
    },
    SearchCompleted {
        request: SearchRequest,
        result: StoreResult<Vec<SearchResult>>,
    },
}

/// A call the shell must make against the store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreRequest {
    LoadSession,
    PersistSession(Session),
    ListFolder(String),
    LoadDocument(String),
    SaveDocument {
        path: String,
        content: String,
        revision: u64,
    },
    CreateDocument {
        path: String,
        content: String,
        is_folder: bool,
    },
    DeleteDocument(String),
    RenameDocument {
        old_path: String,
        new_path: String,
    },
    Search(SearchRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Something the user should be told about.
#[derive(Debug, Clone, PartialEq)]
pub struct UserNotice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
    /// Open the details window right away instead of only listing the notice
    pub blocking: bool,
}

impl UserNotice {
    pub fn failure(title: impl Into<String>, error: &StoreError) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            message: error.user_message(),
            blocking: true,
        }
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            title: title.into(),
            message: message.into(),
            blocking: false,
        }
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.into(),
            message: message.into(),
            blocking: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Store(StoreRequest),
    Notify(UserNotice),
}

/// Search panel state.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub last_request: Option<SearchRequest>,
    pub results: Option<Vec<SearchResult>>,
    pub error: Option<String>,
    pub in_flight: bool,
}

impl SearchState {
    pub fn summary(&self) -> Option<String> {
        self.results.as_deref().map(search::summary)
    }
}

#[derive(Debug, Default)]
pub struct Workspace {
    pub tree: FileTree,
    pub tabs: OpenTabs,
    pub editor: EditorHost,
    pub search: SearchState,
    pending_delete: Option<String>,
    /// Tabs to close once their in-flight save succeeds
    close_after_save: HashMap<String, u64>,
    new_file_content: String,
    status: String,
    session_ready: bool,
    /// Startup asked for the session and the answer has not arrived yet
    session_pending: bool,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial content for files created from the tree.
    pub fn with_new_file_content(mut self, content: impl Into<String>) -> Self {
        self.new_file_content = content.into();
        self
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// `true` once the startup session load has completed.
    pub fn session_ready(&self) -> bool {
        self.session_ready
    }

    pub fn snapshot(&self) -> Session {
        self.tabs.snapshot(self.tree.working_folder())
    }

    fn persist(&self) -> Effect {
        Effect::Store(StoreRequest::PersistSession(self.snapshot()))
    }

    pub fn dispatch(&mut self, message: WorkspaceMessage) -> Vec<Effect> {
        debug!("Workspace message: {:?}", message);
        if self.session_pending && message.waits_for_session() {
            debug!("Ignoring {:?} until the session is restored", message);
            return Vec::new();
        }
        match message {
            WorkspaceMessage::Startup => {
                self.session_pending = true;
                vec![Effect::Store(StoreRequest::LoadSession)]
            }
            WorkspaceMessage::OpenFile(path) => self.open_file(&path),
            WorkspaceMessage::FocusTab(path) => {
                if self.tabs.active() != Some(path.as_str()) && self.tabs.focus(&path) {
                    vec![self.persist()]
                } else {
                    Vec::new()
                }
            }
            WorkspaceMessage::CloseTab(path) => match self.tabs.close_tab(&path) {
                CloseRequest::Closed => {
                    self.editor.close(&path);
                    vec![self.persist()]
                }
                CloseRequest::ConfirmationRequired | CloseRequest::NotOpen => Vec::new(),
            },
            WorkspaceMessage::ResolveClose(decision) => self.resolve_close(decision),
            WorkspaceMessage::BufferEdited(path) => {
                if self.editor.record_edit(&path) {
                    self.tabs.mark_dirty(&path);
                }
                Vec::new()
            }
            WorkspaceMessage::Save(path) => self.save(&path).into_iter().collect(),
            WorkspaceMessage::SaveActive => match self.tabs.active().map(str::to_string) {
                Some(path) => self.save(&path).into_iter().collect(),
                None => Vec::new(),
            },
            WorkspaceMessage::RetryLoad(path) => {
                if self.editor.retry(&path) {
                    vec![Effect::Store(StoreRequest::LoadDocument(path))]
                } else {
                    Vec::new()
                }
            }
            WorkspaceMessage::NavigateTo(folder) => self.navigate(&folder),
            WorkspaceMessage::NavigateUp => {
                let parent = paths::parent(self.tree.working_folder());
                self.navigate(&parent)
            }
            WorkspaceMessage::ToggleFolder(folder) => {
                if self.tree.is_expanded(&folder) {
                    self.tree.collapse(&folder);
                    Vec::new()
                } else if self.tree.expand(&folder) {
                    vec![Effect::Store(StoreRequest::ListFolder(folder))]
                } else {
                    Vec::new()
                }
            }
            WorkspaceMessage::Refresh => {
                self.tree.invalidate_all();
                self.tree.clear_inline_error();
                self.reload_visible()
            }
            WorkspaceMessage::CreateEntry { name, is_folder } => {
                self.create_entry(&name, is_folder)
            }
            WorkspaceMessage::RequestDelete(path) => {
                self.pending_delete = Some(paths::normalize(&path)).filter(|p| !p.is_empty());
                Vec::new()
            }
            WorkspaceMessage::ConfirmDelete => match self.pending_delete.take() {
                Some(path) => vec![Effect::Store(StoreRequest::DeleteDocument(path))],
                None => Vec::new(),
            },
            WorkspaceMessage::CancelDelete => {
                self.pending_delete = None;
                Vec::new()
            }
            WorkspaceMessage::Rename { path, new_name } => self.rename(&path, &new_name),
            WorkspaceMessage::Search(request) => self.start_search(request),
            WorkspaceMessage::ClearSearch => {
                self.search = SearchState::default();
                Vec::new()
            }
        }
    }

    pub fn apply_event(&mut self, event: StoreEvent) -> Vec<Effect> {
        match event {
            StoreEvent::SessionLoaded(result) => self.session_loaded(result),
            StoreEvent::FolderListed { folder, result } => self.folder_listed(folder, result),
            StoreEvent::DocumentLoaded { path, result } => {
                match result {
                    Ok(document) => {
                        if !self.editor.loaded(&path, document.content) {
                            debug!("Dropped load of {}: closed or already edited", path);
                        }
                    }
                    Err(e) => {
                        warn!("Failed to load {}: {}", path, e);
                        self.editor.load_failed(&path, e.user_message());
                    }
                }
                Vec::new()
            }
            StoreEvent::DocumentSaved {
                path,
                revision,
                result,
            } => self.document_saved(path, revision, result),
            StoreEvent::Created {
                path,
                is_folder,
                result,
            } => self.created(path, is_folder, result),
            StoreEvent::Deleted { path, result } => self.deleted(path, result),
            StoreEvent::Renamed {
                old_path,
                new_path,
                result,
            } => self.renamed(old_path, new_path, result),
            StoreEvent::SearchCompleted { request, result } => {
                self.search.in_flight = false;
                self.search.last_request = Some(request);
                match result {
                    Ok(results) => {
                        self.search.error = None;
                        self.search.results = Some(results);
                    }
                    Err(e) => {
                        self.search.results = None;
                        self.search.error = Some(e.user_message());
                    }
                }
                Vec::new()
            }
        }
    }

    fn open_file(&mut self, path: &str) -> Vec<Effect> {
        let path = paths::normalize(path);
        if path.is_empty() {
            return Vec::new();
        }
        let mut effects = Vec::new();
        self.tabs.open_file(&path);
        if self.editor.open(&path) {
            effects.push(Effect::Store(StoreRequest::LoadDocument(path)));
        }
        effects.push(self.persist());
        effects
    }

    fn resolve_close(&mut self, decision: CloseDecision) -> Vec<Effect> {
        match self.tabs.confirm_close(decision) {
            CloseResolution::SaveRequested(path) => match self.save(&path) {
                Some(effect) => {
                    if let Some(buffer) = self.editor.get(&path) {
                        self.close_after_save.insert(path, buffer.revision());
                    }
                    vec![effect]
                }
                // Nothing loaded means nothing to save
                None => {
                    if self.tabs.is_dirty(&path) {
                        warn!("Closing dirty tab {} without saving: buffer not editable", path);
                    }
                    self.tabs.remove(&path);
                    self.editor.close(&path);
                    vec![self.persist()]
                }
            },
            CloseResolution::Discarded(path) => {
                self.editor.close(&path);
                vec![self.persist()]
            }
            CloseResolution::Cancelled | CloseResolution::NothingPending => Vec::new(),
        }
    }

    fn save(&mut self, path: &str) -> Option<Effect> {
        let buffer = self.editor.get(path).filter(|b| b.is_editing())?;
        self.status = format!("Saving {}...", path);
        Some(Effect::Store(StoreRequest::SaveDocument {
            path: path.to_string(),
            content: buffer.text().to_string(),
            revision: buffer.revision(),
        }))
    }

    fn document_saved(
        &mut self,
        path: String,
        revision: u64,
        result: StoreResult<Document>,
    ) -> Vec<Effect> {
        let close_pending = self.close_after_save.remove(&path).is_some();
        match result {
            Ok(_) => {
                info!("Saved {}", path);
                self.status = format!("Saved {}", path);
                // Edits made while the save was in flight keep the tab dirty
                let unchanged = self
                    .editor
                    .get(&path)
                    .is_some_and(|buffer| buffer.revision() == revision);
                if unchanged {
                    self.tabs.clear_dirty(&path);
                }
                if close_pending && unchanged {
                    self.tabs.remove(&path);
                    self.editor.close(&path);
                    return vec![self.persist()];
                }
                Vec::new()
            }
            Err(e) => {
                warn!("Failed to save {}: {}", path, e);
                self.status = format!("Save failed: {}", path);
                vec![Effect::Notify(UserNotice::failure(
                    format!("Could not save {}", path),
                    &e,
                ))]
            }
        }
    }

    fn navigate(&mut self, folder: &str) -> Vec<Effect> {
        let folder = paths::normalize(folder);
        if !self.tree.set_working_folder(&folder) {
            return Vec::new();
        }
        let mut effects = Vec::new();
        if self.tree.begin_load(&folder) {
            effects.push(Effect::Store(StoreRequest::ListFolder(folder)));
        }
        effects.push(self.persist());
        effects
    }

    fn reload_visible(&mut self) -> Vec<Effect> {
        self.tree
            .visible_folders()
            .into_iter()
            .filter(|folder| self.tree.begin_load(folder))
            .map(|folder| Effect::Store(StoreRequest::ListFolder(folder)))
            .collect()
    }

    /// Invalidate a folder and fetch it again if it is on screen.
    fn refresh_folder(&mut self, folder: &str) -> Vec<Effect> {
        self.tree.invalidate(folder);
        if self.tree.visible_folders().iter().any(|f| f == folder) && self.tree.begin_load(folder)
        {
            vec![Effect::Store(StoreRequest::ListFolder(folder.to_string()))]
        } else {
            Vec::new()
        }
    }

    /// Refresh every folder from `path`'s parent up to the root.
    fn refresh_ancestors(&mut self, path: &str) -> Vec<Effect> {
        let mut effects = Vec::new();
        let mut folder = paths::parent(path);
        loop {
            effects.extend(self.refresh_folder(&folder));
            if folder.is_empty() {
                break;
            }
            folder = paths::parent(&folder);
        }
        effects
    }

    fn session_loaded(&mut self, result: StoreResult<Option<Session>>) -> Vec<Effect> {
        self.session_ready = true;
        self.session_pending = false;
        let mut effects = Vec::new();
        let session = match result {
            Ok(Some(session)) => session.sanitized(),
            Ok(None) => {
                info!("No stored session, starting at root");
                Session::default()
            }
            Err(e) if e.is_not_found() => {
                info!("Stored session points at a missing folder: {}", e);
                Session::default()
            }
            Err(e) => {
                warn!("Failed to load session: {}", e);
                effects.push(Effect::Notify(UserNotice::warning(
                    "Session not restored",
                    e.user_message(),
                )));
                Session::default()
            }
        };

        info!(
            "Restoring {} open file(s) in folder '{}'",
            session.opened_files.len(),
            session.working_folder
        );
        self.tabs.restore(&session);
        for orphan in self.editor.retain(|path| self.tabs.contains(path)) {
            debug!("Closed buffer {} not in the restored session", orphan);
        }
        self.close_after_save
            .retain(|path, _| self.tabs.contains(path));
        for path in &session.opened_files {
            if self.editor.open(path) {
                effects.push(Effect::Store(StoreRequest::LoadDocument(path.clone())));
            }
        }
        self.tree.set_working_folder(&session.working_folder);
        let folder = self.tree.working_folder().to_string();
        if self.tree.begin_load(&folder) {
            effects.push(Effect::Store(StoreRequest::ListFolder(folder)));
        }
        effects
    }

    fn folder_listed(
        &mut self,
        folder: String,
        result: StoreResult<Vec<DocumentMetadata>>,
    ) -> Vec<Effect> {
        match result {
            Ok(entries) => {
                debug!("Listed '{}': {} entries", folder, entries.len());
                self.tree.finish_load(&folder, entries);
                Vec::new()
            }
            Err(e) if e.is_not_found() && !folder.is_empty() && folder == self.tree.working_folder() => {
                warn!("Working folder '{}' is gone, falling back to root", folder);
                self.tree.fail_load(&folder, e.user_message());
                let mut effects = self.navigate("");
                effects.push(Effect::Notify(UserNotice::warning(
                    "Folder not found",
                    format!("'{}' no longer exists. Showing the root folder.", folder),
                )));
                effects
            }
            Err(e) => {
                warn!("Failed to list '{}': {}", folder, e);
                self.tree.fail_load(&folder, e.user_message());
                Vec::new()
            }
        }
    }

    fn create_entry(&mut self, name: &str, is_folder: bool) -> Vec<Effect> {
        let folder = self.tree.working_folder().to_string();
        match self.tree.validate_new_entry(&folder, name) {
            Ok(path) => {
                self.tree.clear_inline_error();
                let content = if is_folder {
                    String::new()
                } else {
                    self.new_file_content.clone()
                };
                vec![Effect::Store(StoreRequest::CreateDocument {
                    path,
                    content,
                    is_folder,
                })]
            }
            Err(message) => {
                self.tree.set_inline_error(message);
                Vec::new()
            }
        }
    }

    fn created(&mut self, path: String, is_folder: bool, result: StoreResult<Document>) -> Vec<Effect> {
        match result {
            Ok(_) => {
                info!("Created {} '{}'", if is_folder { "folder" } else { "file" }, path);
                self.status = format!("Created {}", path);
                self.tree.invalidate(&path);
                self.refresh_ancestors(&path)
            }
            Err(e) if e.is_conflict() => {
                self.tree.set_inline_error(e.user_message());
                Vec::new()
            }
            Err(e) => {
                warn!("Failed to create {}: {}", path, e);
                vec![Effect::Notify(UserNotice::failure(
                    format!("Could not create {}", path),
                    &e,
                ))]
            }
        }
    }

    fn deleted(&mut self, path: String, result: StoreResult<()>) -> Vec<Effect> {
        if let Err(e) = result {
            warn!("Failed to delete {}: {}", path, e);
            return vec![Effect::Notify(UserNotice::failure(
                format!("Could not delete {}", path),
                &e,
            ))];
        }

        info!("Deleted '{}'", path);
        self.status = format!("Deleted {}", path);
        self.tree.remove_entry(&path);

        let mut touched_session = false;
        for closed in self.tabs.remove_under(&path) {
            self.editor.close(&closed);
            self.close_after_save.remove(&closed);
            touched_session = true;
        }

        let mut effects = Vec::new();
        if paths::is_within(self.tree.working_folder(), &path) {
            // The folder being shown is gone; step out of it
            self.tree.set_working_folder(&paths::parent(&path));
            touched_session = true;
        }
        effects.extend(self.refresh_folder(&paths::parent(&path)));
        if touched_session {
            effects.push(self.persist());
        }
        effects
    }

    fn rename(&mut self, path: &str, new_name: &str) -> Vec<Effect> {
        let path = paths::normalize(path);
        match self.tree.validate_rename(&path, new_name) {
            Ok(new_path) if new_path == path => {
                self.tree.clear_inline_error();
                Vec::new()
            }
            Ok(new_path) => {
                self.tree.clear_inline_error();
                vec![Effect::Store(StoreRequest::RenameDocument {
                    old_path: path,
                    new_path,
                })]
            }
            Err(message) => {
                self.tree.set_inline_error(message);
                Vec::new()
            }
        }
    }

    fn renamed(
        &mut self,
        old_path: String,
        new_path: String,
        result: StoreResult<DocumentMetadata>,
    ) -> Vec<Effect> {
        if let Err(e) = result {
            if e.is_conflict() {
                self.tree.set_inline_error(e.user_message());
                return vec![Effect::Notify(UserNotice::warning(
                    "Rename failed",
                    e.user_message(),
                ))];
            }
            warn!("Failed to rename {} to {}: {}", old_path, new_path, e);
            return vec![Effect::Notify(UserNotice::failure(
                format!("Could not rename {}", old_path),
                &e,
            ))];
        }

        info!("Renamed '{}' to '{}'", old_path, new_path);
        self.status = format!("Renamed {} to {}", old_path, new_path);

        let mut touched_session = false;
        for (old, new, outcome) in self.tabs.rebase_folder(&old_path, &new_path) {
            match outcome {
                tabs::RenameOutcome::Moved | tabs::RenameOutcome::ReplacedExisting => {
                    self.editor.rename(&old, &new)
                }
                tabs::RenameOutcome::KeptExisting => {
                    self.editor.close(&old);
                }
            }
            if let Some(revision) = self.close_after_save.remove(&old) {
                self.close_after_save.insert(new, revision);
            }
            touched_session = true;
        }

        self.tree.rebase_expanded(&old_path, &new_path);
        self.tree.invalidate_under(&old_path);
        if let Some(folder) = paths::rebase(self.tree.working_folder(), &old_path, &new_path) {
            self.tree.set_working_folder(&folder);
            touched_session = true;
        }

        let mut effects = self.refresh_ancestors(&old_path);
        if paths::parent(&old_path) != paths::parent(&new_path) {
            effects.extend(self.refresh_ancestors(&new_path));
        }
        effects.extend(self.reload_visible());
        if touched_session {
            effects.push(self.persist());
        }
        effects
    }

    fn start_search(&mut self, mut request: SearchRequest) -> Vec<Effect> {
        request.search_folder = paths::normalize(&request.search_folder);
        if let Err(message) = request.validate() {
            self.search.error = Some(message);
            self.search.results = None;
            return Vec::new();
        }
        self.search.error = None;
        self.search.in_flight = true;
        self.search.last_request = Some(request.clone());
        vec![Effect::Store(StoreRequest::Search(request))]
    }
}
