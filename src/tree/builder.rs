//! TreeBuilder - lists each level, filters, sorts directories first

use std::fs::DirEntry;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::walk::utils::{entry_name, list_dir};
use crate::walk::{FilterConfig, PathFilter};

use super::node::TreeNode;

/// Builds a [`TreeNode`] for a directory.
///
/// Unlike [`crate::walk::SourceWalk`], entries are filtered after each
/// directory is listed, and empty directories are kept.
pub struct TreeBuilder<'a> {
    paths: PathFilter<'a>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(config: &'a FilterConfig) -> Self {
        Self {
            paths: PathFilter::new(config),
        }
    }

    pub fn build(&self, root: &Path) -> TreeNode {
        TreeNode::Dir {
            name: entry_name(root),
            path: PathBuf::new(),
            children: self.build_children(root, Path::new("")),
        }
    }

    fn build_children(&self, path: &Path, relative: &Path) -> Vec<TreeNode> {
        let entries = match list_dir(path) {
            Ok(e) => e,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot list directory, showing it empty");
                return Vec::new();
            }
        };

        let mut entries: Vec<(DirEntry, bool)> = entries
            .into_iter()
            .filter_map(|(entry, file_type)| {
                // Symlinks and special files are not shown
                if file_type.is_dir() {
                    Some((entry, true))
                } else if file_type.is_file() {
                    Some((entry, false))
                } else {
                    None
                }
            })
            .filter(|(entry, is_dir)| {
                let excluded = self
                    .paths
                    .excludes_tree_entry(&relative.join(entry.file_name()), *is_dir);
                if excluded {
                    debug!(path = %entry.path().display(), "excluded from tree");
                }
                !excluded
            })
            .collect();

        entries.sort_by_cached_key(|(entry, is_dir)| {
            (!*is_dir, entry.file_name().to_string_lossy().to_lowercase())
        });

        entries
            .into_iter()
            .map(|(entry, is_dir)| {
                let name = entry.file_name().to_string_lossy().to_string();
                let child_relative = relative.join(&name);
                if is_dir {
                    let children = self.build_children(&entry.path(), &child_relative);
                    TreeNode::Dir {
                        name,
                        path: child_relative,
                        children,
                    }
                } else {
                    TreeNode::File {
                        name,
                        path: child_relative,
                    }
                }
            })
            .collect()
    }
}
