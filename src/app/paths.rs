//! Slash-delimited document path helpers.
//!
//! Store paths are relative, use `/` as the separator and never carry a leading
//! or trailing slash. The root folder is the empty string.

/// Trim surrounding slashes and collapse repeated separators.
pub fn normalize(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Join a folder and a relative name. Joining onto the root yields the name itself.
pub fn join(folder: &str, name: &str) -> String {
    let folder = normalize(folder);
    let name = normalize(name);
    if folder.is_empty() {
        name
    } else if name.is_empty() {
        folder
    } else {
        format!("{}/{}", folder, name)
    }
}

/// Parent folder of a path; the parent of a top-level entry is the root.
pub fn parent(path: &str) -> String {
    let path = normalize(path);
    match path.rsplit_once('/') {
        Some((parent, _)) => parent.to_string(),
        None => String::new(),
    }
}

/// Last segment of a path.
pub fn file_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Whether `path` is `folder` itself or lies somewhere beneath it.
/// Every path is within the root.
pub fn is_within(path: &str, folder: &str) -> bool {
    if folder.is_empty() {
        return true;
    }
    path == folder
        || path
            .strip_prefix(folder)
            .map(|rest| rest.starts_with('/'))
            .unwrap_or(false)
}

/// Re-point `path` from under `old_prefix` to under `new_prefix`.
///
/// Returns `None` when `path` is not `old_prefix` or one of its descendants.
pub fn rebase(path: &str, old_prefix: &str, new_prefix: &str) -> Option<String> {
    if old_prefix.is_empty() || !is_within(path, old_prefix) {
        return None;
    }
    let rest = &path[old_prefix.len()..];
    Some(format!("{}{}", new_prefix, rest))
}

/// Breadcrumb trail for a folder: `[("Root", ""), ("a", "a"), ("b", "a/b")]`.
pub fn breadcrumbs(folder: &str) -> Vec<(String, String)> {
    let mut crumbs = vec![("Root".to_string(), String::new())];
    let mut current = String::new();
    for segment in normalize(folder).split('/').filter(|s| !s.is_empty()) {
        current = join(&current, segment);
        crumbs.push((segment.to_string(), current.clone()));
    }
    crumbs
}

/// Reject names that would escape or corrupt the tree.
///
/// Nested names such as `notes/todo.txt` are allowed; empty, `.` and `..`
/// segments are not.
pub fn validate_relative_name(name: &str) -> Result<String, String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name cannot be empty".to_string());
    }
    let trimmed = trimmed.trim_matches('/');
    if trimmed.is_empty() {
        return Err("Name cannot be empty".to_string());
    }
    for segment in trimmed.split('/') {
        match segment {
            "" => return Err(format!("'{}' contains an empty path segment", name)),
            "." | ".." => return Err(format!("'{}' may not contain '{}'", name, segment)),
            _ => {}
        }
    }
    Ok(trimmed.to_string())
}
