//! Tree formatter producing box-drawing lines

use std::io::{self, Write};

use crate::tree::TreeNode;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE_PREFIX: &str = "│   ";
const BLANK_PREFIX: &str = "    ";

/// Formatter for rendered tree output.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeFormatter;

impl TreeFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Render the tree as lines, root name first.
    pub fn render(&self, root: &TreeNode) -> Vec<String> {
        let mut lines = vec![root.name().to_string()];
        self.render_children(root.children(), "", &mut lines);
        lines
    }

    /// Write the rendered lines joined by newlines, without a trailing newline.
    pub fn write<W: Write>(&self, root: &TreeNode, out: &mut W) -> io::Result<()> {
        out.write_all(self.render(root).join("\n").as_bytes())?;
        out.flush()
    }

    fn render_children(&self, children: &[TreeNode], prefix: &str, lines: &mut Vec<String>) {
        for (i, child) in children.iter().enumerate() {
            let is_last = i == children.len() - 1;
            let connector = if is_last { LAST_BRANCH } else { BRANCH };
            lines.push(format!("{}{}{}", prefix, connector, child.name()));

            if child.is_dir() {
                let child_prefix = child_prefix(prefix, is_last);
                self.render_children(child.children(), &child_prefix, lines);
            }
        }
    }
}

/// Calculate the prefix for child entries
fn child_prefix(current_prefix: &str, is_last: bool) -> String {
    if is_last {
        format!("{}{}", current_prefix, BLANK_PREFIX)
    } else {
        format!("{}{}", current_prefix, PIPE_PREFIX)
    }
}
