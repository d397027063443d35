//! Naming and path utilities
//!
//! Pure string functions shared by the resolver, the arena and the shell.
//! Nothing here touches the tree.

use crate::error::FsError;
use crate::types::{HOME_TOKEN, SEPARATOR};

/// Where a path starts resolving from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathAnchor {
    Root,
    Home,
    Cwd,
}

/// Split a path into its non-empty components, in order.
///
/// Repeated separators collapse: `"a//b/"` yields `["a", "b"]`.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split(SEPARATOR).filter(|c| !c.is_empty()).collect()
}

/// Strip a leading home shorthand.
///
/// Returns the remainder when `path` is `~` or starts with `~/`. A name that
/// merely begins with `~` (such as `~backup`) is not the shorthand.
pub fn strip_home(path: &str) -> Option<&str> {
    let rest = path.strip_prefix(HOME_TOKEN)?;
    if rest.is_empty() || rest.starts_with(SEPARATOR) {
        Some(rest)
    } else {
        None
    }
}

/// Classify a path by its anchor and return the part left to walk.
pub fn anchor(path: &str) -> (PathAnchor, &str) {
    if let Some(rest) = path.strip_prefix(SEPARATOR) {
        (PathAnchor::Root, rest)
    } else if let Some(rest) = strip_home(path) {
        (PathAnchor::Home, rest)
    } else {
        (PathAnchor::Cwd, path)
    }
}

/// Separate a file's full name into base name and extension.
///
/// The extension is whatever follows the last `.`, unless that dot is the
/// first character (`.bashrc` has no extension) or the last one (`notes.`
/// keeps its trailing dot in the name).
pub fn split_extension(full_name: &str) -> (&str, Option<&str>) {
    match full_name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < full_name.len() => {
            (&full_name[..idx], Some(&full_name[idx + 1..]))
        }
        _ => (full_name, None),
    }
}

/// Join a base name and an optional extension into a full name.
pub fn join_extension(name: &str, extension: Option<&str>) -> String {
    match extension {
        Some(ext) => format!("{}.{}", name, ext),
        None => name.to_string(),
    }
}

/// Join components into an absolute path. No components means the root.
pub fn join_absolute<S: AsRef<str>>(components: &[S]) -> String {
    let mut out = String::new();
    for component in components {
        out.push(SEPARATOR);
        out.push_str(component.as_ref());
    }
    if out.is_empty() {
        out.push(SEPARATOR);
    }
    out
}

/// Check that `name` can be used as a node's full name.
pub fn validate_name(name: &str) -> Result<(), FsError> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(SEPARATOR)
        || name.contains('\0')
    {
        return Err(FsError::InvalidName(name.to_string()));
    }
    Ok(())
}
