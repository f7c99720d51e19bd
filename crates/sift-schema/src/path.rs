//! Dot-path utilities for absolute field paths.
//!
//! Every path computation in the schema model goes through these functions, so
//! path composition stays deterministic: an absolute path is always the
//! parent's absolute path joined to the relative name with a single separator.

/// Separator between components of an absolute field path.
pub const SEPARATOR: char = '.';

/// Splits an absolute path into its components.
pub fn split(absolute_path: &str) -> Vec<String> {
    absolute_path.split(SEPARATOR).map(str::to_string).collect()
}

/// Composes an absolute path from a parent path and a relative name.
///
/// When the parent is the root (no path of its own), the relative name is the
/// absolute path.
pub fn compose(parent: Option<&str>, relative_name: &str) -> String {
    match parent {
        Some(parent) => format!("{parent}{SEPARATOR}{relative_name}"),
        None => relative_name.to_string(),
    }
}

/// An absolute path split into its parent path and final component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelativizedPath {
    /// Absolute path of the parent, or `None` when the field sits at the root.
    pub parent: Option<String>,
    /// The final path component: the field's relative name.
    pub relative: String,
}

/// Splits an absolute path at its last separator.
///
/// Everything before the last separator is the parent path, which must resolve
/// to an existing composite for the path to be valid; paths without a
/// separator sit directly under the root.
pub fn relativize(absolute_path: &str) -> RelativizedPath {
    match absolute_path.rsplit_once(SEPARATOR) {
        Some((parent, relative)) => RelativizedPath {
            parent: Some(parent.to_string()),
            relative: relative.to_string(),
        },
        None => RelativizedPath {
            parent: None,
            relative: absolute_path.to_string(),
        },
    }
}
