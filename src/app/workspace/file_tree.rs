//! File tree state: the working folder, per-folder listings and expansion.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use crate::app::paths;
use crate::app::store::DocumentMetadata;

/// One child shown in the tree, resolved to its full path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub path: String,
    pub name: String,
    pub is_folder: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FolderStatus {
    #[default]
    Unloaded,
    Loading,
    Loaded(Vec<TreeEntry>),
    Error(String),
}

static UNLOADED: FolderStatus = FolderStatus::Unloaded;

#[derive(Debug, Clone, Default)]
pub struct FileTree {
    working_folder: String,
    folders: HashMap<String, FolderStatus>,
    expanded: BTreeSet<String>,
    /// Last validation or conflict message, shown under the tree
    inline_error: Option<String>,
}

/// Resolve a listing entry to a full path. Stores answer with either the
/// bare child name or the full path.
pub fn resolve_child(folder: &str, entry_path: &str) -> String {
    let entry_path = paths::normalize(entry_path);
    if folder.is_empty() || paths::is_within(&entry_path, folder) && entry_path != folder {
        entry_path
    } else {
        paths::join(folder, &entry_path)
    }
}

/// Folders first, then case-insensitive by name.
pub fn sort_entries(entries: &mut [TreeEntry]) {
    entries.sort_by(|a, b| match (a.is_folder, b.is_folder) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a
            .name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name)),
    });
}

impl FileTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn working_folder(&self) -> &str {
        &self.working_folder
    }

    /// Returns `true` when the working folder changed.
    pub fn set_working_folder(&mut self, folder: &str) -> bool {
        let folder = paths::normalize(folder);
        if folder == self.working_folder {
            return false;
        }
        self.working_folder = folder;
        self.inline_error = None;
        true
    }

    pub fn status(&self, folder: &str) -> &FolderStatus {
        self.folders.get(folder).unwrap_or(&UNLOADED)
    }

    pub fn children(&self, folder: &str) -> Option<&[TreeEntry]> {
        match self.folders.get(folder) {
            Some(FolderStatus::Loaded(children)) => Some(children),
            _ => None,
        }
    }

    /// Mark `folder` as loading if it has nothing cached.
    ///
    /// Returns `true` when the caller should fetch the listing.
    pub fn begin_load(&mut self, folder: &str) -> bool {
        match self.status(folder) {
            FolderStatus::Loading | FolderStatus::Loaded(_) => false,
            FolderStatus::Unloaded | FolderStatus::Error(_) => {
                self.folders
                    .insert(folder.to_string(), FolderStatus::Loading);
                true
            }
        }
    }

    pub fn finish_load(&mut self, folder: &str, entries: Vec<DocumentMetadata>) {
        let mut children: Vec<TreeEntry> = entries
            .into_iter()
            .map(|entry| {
                let path = resolve_child(folder, &entry.file_path);
                TreeEntry {
                    name: paths::file_name(&path).to_string(),
                    path,
                    is_folder: entry.is_folder,
                }
            })
            .filter(|entry| !entry.name.is_empty())
            .collect();
        sort_entries(&mut children);
        self.folders
            .insert(folder.to_string(), FolderStatus::Loaded(children));
    }

    pub fn fail_load(&mut self, folder: &str, message: String) {
        self.folders
            .insert(folder.to_string(), FolderStatus::Error(message));
    }

    /// Forget the cached listing of `folder`.
    pub fn invalidate(&mut self, folder: &str) {
        self.folders.remove(folder);
    }

    /// Forget `path` and every listing beneath it.
    pub fn invalidate_under(&mut self, path: &str) {
        self.folders.retain(|folder, _| !paths::is_within(folder, path));
        self.expanded.retain(|folder| !paths::is_within(folder, path));
    }

    /// Forget every listing.
    pub fn invalidate_all(&mut self) {
        self.folders.clear();
    }

    /// Drop `path` from its parent's cached listing.
    pub fn remove_entry(&mut self, path: &str) {
        let parent = paths::parent(path);
        if let Some(FolderStatus::Loaded(children)) = self.folders.get_mut(&parent) {
            children.retain(|entry| entry.path != path);
        }
        self.invalidate_under(path);
    }

    /// Carry expansion state over to a renamed folder.
    pub fn rebase_expanded(&mut self, old_folder: &str, new_folder: &str) {
        let moved: Vec<String> = self
            .expanded
            .iter()
            .filter_map(|folder| paths::rebase(folder, old_folder, new_folder))
            .collect();
        self.expanded
            .retain(|folder| !paths::is_within(folder, old_folder));
        self.expanded.extend(moved);
    }

    pub fn is_expanded(&self, folder: &str) -> bool {
        self.expanded.contains(folder)
    }

    /// Returns `true` when the folder's listing should be fetched.
    pub fn expand(&mut self, folder: &str) -> bool {
        self.expanded.insert(folder.to_string());
        self.begin_load(folder)
    }

    pub fn collapse(&mut self, folder: &str) {
        self.expanded.remove(folder);
    }

    /// Folders whose listing is on screen: the working folder and every
    /// expanded folder beneath it.
    pub fn visible_folders(&self) -> Vec<String> {
        let mut folders = vec![self.working_folder.clone()];
        folders.extend(
            self.expanded
                .iter()
                .filter(|folder| {
                    *folder != &self.working_folder
                        && paths::is_within(folder, &self.working_folder)
                })
                .cloned(),
        );
        folders
    }

    /// Whether `path` is listed in a cached listing of its parent.
    pub fn known_entry(&self, path: &str) -> Option<&TreeEntry> {
        self.children(&paths::parent(path))?
            .iter()
            .find(|entry| entry.path == path)
    }

    /// Validate a name typed for a new entry in `folder` and return the full path.
    pub fn validate_new_entry(&self, folder: &str, name: &str) -> Result<String, String> {
        let relative = paths::validate_relative_name(name)?;
        let path = paths::join(folder, &relative);
        self.check_free(&path)?;
        Ok(path)
    }

    /// Validate the new name for `path` and return the new full path.
    pub fn validate_rename(&self, path: &str, new_name: &str) -> Result<String, String> {
        let relative = paths::validate_relative_name(new_name)?;
        let new_path = paths::join(&paths::parent(path), &relative);
        if new_path == path {
            return Ok(new_path);
        }
        if paths::is_within(&new_path, path) {
            return Err(format!("Cannot move '{}' inside itself", path));
        }
        self.check_free(&new_path)?;
        Ok(new_path)
    }

    fn check_free(&self, path: &str) -> Result<(), String> {
        // Every loaded ancestor on the way must be a folder
        let mut ancestor = paths::parent(path);
        while !ancestor.is_empty() {
            if self.known_entry(&ancestor).is_some_and(|e| !e.is_folder) {
                return Err(format!("'{}' is a file", ancestor));
            }
            ancestor = paths::parent(&ancestor);
        }
        if self.known_entry(path).is_some() {
            return Err(format!("'{}' already exists", path));
        }
        Ok(())
    }

    pub fn inline_error(&self) -> Option<&str> {
        self.inline_error.as_deref()
    }

    pub fn set_inline_error(&mut self, message: impl Into<String>) {
        self.inline_error = Some(message.into());
    }

    pub fn clear_inline_error(&mut self) {
        self.inline_error = None;
    }
}
