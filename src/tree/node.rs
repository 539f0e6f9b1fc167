//! In-memory tree used for rendering and JSON output

use std::path::PathBuf;

use serde::Serialize;

/// A node of the rendered tree. `path` is relative to the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    File {
        name: String,
        path: PathBuf,
    },
    Dir {
        name: String,
        path: PathBuf,
        children: Vec<TreeNode>,
    },
}

impl TreeNode {
    pub fn name(&self) -> &str {
        match self {
            TreeNode::File { name, .. } => name,
            TreeNode::Dir { name, .. } => name,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, TreeNode::Dir { .. })
    }

    pub fn children(&self) -> &[TreeNode] {
        match self {
            TreeNode::File { .. } => &[],
            TreeNode::Dir { children, .. } => children,
        }
    }

    /// Count directories and files below this node (the node itself excluded).
    pub fn counts(&self) -> (usize, usize) {
        self.children()
            .iter()
            .fold((0, 0), |(dirs, files), child| match child {
                TreeNode::File { .. } => (dirs, files + 1),
                TreeNode::Dir { .. } => {
                    let (d, f) = child.counts();
                    (dirs + d + 1, files + f)
                }
            })
    }
}
