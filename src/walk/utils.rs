//! Path helpers shared by the walkers

use std::fs::{self, DirEntry, FileType};
use std::io;
use std::path::Path;

use glob::Pattern;
use tracing::warn;

/// List a directory as `(entry, file type)` pairs.
///
/// Entries whose metadata cannot be read are logged and left out; only a
/// failure to open the directory itself is returned.
pub fn list_dir(path: &Path) -> io::Result<Vec<(DirEntry, FileType)>> {
    let mut listed = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read directory entry");
                continue;
            }
        };
        match entry.file_type() {
            Ok(file_type) => listed.push((entry, file_type)),
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "cannot stat entry");
            }
        }
    }
    Ok(listed)
}

/// Get the name of a path, defaulting to "." for root-like paths.
pub fn entry_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| ".".to_string())
}

/// Split a relative path into its segments.
pub fn segments(relative: &Path) -> Vec<String> {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect()
}

/// Render a relative path with `/` separators regardless of platform.
pub fn display_relative(relative: &Path) -> String {
    segments(relative).join("/")
}

/// Lower-cased extension without the dot, if any.
///
/// Dotfiles such as `.DS_Store` have no extension.
pub fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .filter(|e| !e.is_empty())
}

/// Match a name against an exact name or glob pattern.
pub fn name_matches(pattern: &str, name: &str) -> bool {
    name == pattern || glob_match(pattern, name)
}

/// Match a glob pattern against a name.
pub fn glob_match(pattern: &str, name: &str) -> bool {
    Pattern::new(pattern)
        .map(|p| p.matches(name))
        .unwrap_or(false)
}
