//! Entry points tying profile, walk and writers together

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::config::Profile;
use crate::error::{PulpError, Result};
use crate::output::{Concatenator, ExportReport, TreeFormatter, write_json};
use crate::tree::{TreeBuilder, TreeNode};
use crate::walk::{FilterConfig, SourceWalk, display_relative};

/// Output path meaning "write to stdout".
pub const STDOUT_MARKER: &str = "-";

/// Ensure the root exists and is a directory.
pub fn check_root(root: &Path) -> Result<()> {
    if !root.exists() {
        return Err(PulpError::RootNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(PulpError::NotADirectory(root.to_path_buf()));
    }
    Ok(())
}

/// Open the output, truncating an existing file. `-` is stdout.
pub fn open_output(path: &Path) -> Result<Box<dyn Write>> {
    if path.as_os_str() == STDOUT_MARKER {
        return Ok(Box::new(BufWriter::new(io::stdout().lock())));
    }
    let file = File::create(path).map_err(|source| PulpError::Output {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Box::new(BufWriter::new(file)))
}

/// Keep an output file that lives inside `root` out of its own dump.
///
/// Must run after the output is created so both paths canonicalize.
pub fn exclude_output(filter: &mut FilterConfig, root: &Path, output: &Path) {
    if output.as_os_str() == STDOUT_MARKER {
        return;
    }
    let (Ok(root), Ok(output)) = (root.canonicalize(), output.canonicalize()) else {
        return;
    };
    if let Ok(relative) = output.strip_prefix(&root) {
        debug!(path = %relative.display(), "excluding output file from walk");
        filter.exclude_paths.insert(display_relative(relative));
    }
}

/// Concatenate every emittable file under `root` into `out`.
pub fn export<W: Write>(
    root: &Path,
    profile: &Profile,
    out: &mut W,
    out_path: &Path,
) -> Result<ExportReport> {
    check_root(root)?;
    info!(root = %root.display(), "exporting file contents");

    let walk = SourceWalk::new(root, &profile.filter);
    let report = Concatenator::new(profile.format.clone())
        .export(walk, out)
        .map_err(|source| PulpError::Output {
            path: out_path.to_path_buf(),
            source,
        })?;

    info!(
        files = report.file_count(),
        skipped = report.skipped.len(),
        bytes = report.bytes_written,
        "export finished"
    );
    Ok(report)
}

/// Build the filtered tree for `root`.
pub fn build_tree(root: &Path, filter: &FilterConfig) -> Result<TreeNode> {
    check_root(root)?;
    info!(root = %root.display(), "building tree");
    Ok(TreeBuilder::new(filter).build(root))
}

/// Write a tree as box-drawing text or JSON.
pub fn write_tree<W: Write>(
    tree: &TreeNode,
    json: bool,
    out: &mut W,
    out_path: &Path,
) -> Result<()> {
    let written = if json {
        write_json(tree, out)
    } else {
        TreeFormatter::new().write(tree, out)
    };
    written.map_err(|source| PulpError::Output {
        path: out_path.to_path_buf(),
        source,
    })
}
