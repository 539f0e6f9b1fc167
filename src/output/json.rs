//! JSON output formatting

use std::io::{self, Write};

use crate::tree::TreeNode;

/// Write tree node as pretty-printed JSON.
pub fn write_json<W: Write>(node: &TreeNode, out: &mut W) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, node).map_err(io::Error::other)?;
    writeln!(out)?;
    out.flush()
}
