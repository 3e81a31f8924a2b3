//! Persisted editor session.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::app::paths;

/// Snapshot of the open files, the active file and the working folder.
///
/// Every field defaults when absent so partially written sessions still load.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Session {
    pub opened_files: Vec<String>,
    pub last_active_file: String,
    pub working_folder: String,
}

impl Session {
    pub fn new(
        opened_files: Vec<String>,
        last_active_file: impl Into<String>,
        working_folder: impl Into<String>,
    ) -> Self {
        Self {
            opened_files,
            last_active_file: last_active_file.into(),
            working_folder: working_folder.into(),
        }
    }

    /// Clean up a session read from the store.
    ///
    /// Empty and duplicate paths are dropped (first occurrence wins, order is
    /// kept). An active file that is not in the open list falls back to the
    /// first open file, or to nothing.
    pub fn sanitized(self) -> Self {
        let mut seen = HashSet::new();
        let opened_files: Vec<String> = self
            .opened_files
            .iter()
            .map(|path| paths::normalize(path))
            .filter(|path| !path.is_empty() && seen.insert(path.clone()))
            .collect();

        let wanted = paths::normalize(&self.last_active_file);
        let last_active_file = if opened_files.contains(&wanted) {
            wanted
        } else {
            opened_files.first().cloned().unwrap_or_default()
        };

        Self {
            opened_files,
            last_active_file,
            working_folder: paths::normalize(&self.working_folder),
        }
    }

    pub fn active_file(&self) -> Option<&str> {
        if self.last_active_file.is_empty() {
            None
        } else {
            Some(&self.last_active_file)
        }
    }
}
