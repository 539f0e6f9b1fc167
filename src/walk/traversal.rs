//! Lazy depth-first traversal that prunes directories before descending.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use super::config::FilterConfig;
use super::filter::{Decision, PathFilter};
use super::utils::list_dir;

/// A file encountered during the walk, with its filter verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    /// Path relative to the walk root.
    pub relative: PathBuf,
    pub decision: Decision,
}

impl Candidate {
    pub fn is_included(&self) -> bool {
        self.decision.is_include()
    }
}

#[derive(Debug)]
struct PendingDir {
    path: PathBuf,
    relative: PathBuf,
}

/// Depth-first walk over a source tree.
///
/// Each directory yields its files in name order, then its surviving
/// subdirectories are walked in name order. Pruned directories are never
/// listed. Symlinks are skipped.
pub struct SourceWalk<'a> {
    paths: PathFilter<'a>,
    dirs: Vec<PendingDir>,
    files: VecDeque<Candidate>,
}

impl<'a> SourceWalk<'a> {
    pub fn new(root: &Path, config: &'a FilterConfig) -> Self {
        Self {
            paths: PathFilter::new(config),
            dirs: vec![PendingDir {
                path: root.to_path_buf(),
                relative: PathBuf::new(),
            }],
            files: VecDeque::new(),
        }
    }

    /// Only the candidates that passed every path filter.
    pub fn included(self) -> impl Iterator<Item = Candidate> + 'a {
        self.filter(Candidate::is_included)
    }

    /// List one directory, queueing its files and pushing its subdirectories.
    fn expand(&mut self, dir: PendingDir) {
        let mut entries = match list_dir(&dir.path) {
            Ok(e) => e,
            Err(e) => {
                warn!(path = %dir.path.display(), error = %e, "cannot list directory");
                return;
            }
        };
        entries.sort_by_key(|(entry, _)| entry.file_name());

        let keywords_ok = self.paths.matches_keywords(&dir.relative);
        let mut subdirs = Vec::new();

        for (entry, file_type) in entries {
            let relative = dir.relative.join(entry.file_name());

            if file_type.is_symlink() {
                trace!(path = %relative.display(), "skipping symlink");
                continue;
            }

            if file_type.is_dir() {
                if self.paths.prunes_dir(&relative) {
                    debug!(path = %relative.display(), "pruned directory");
                } else {
                    subdirs.push(PendingDir {
                        path: entry.path(),
                        relative,
                    });
                }
            } else if file_type.is_file() {
                let decision = self.paths.decide_file(&relative, keywords_ok);
                self.files.push_back(Candidate {
                    path: entry.path(),
                    relative,
                    decision,
                });
            }
        }

        // Stack order: first subdirectory on top
        self.dirs.extend(subdirs.into_iter().rev());
    }
}

impl Iterator for SourceWalk<'_> {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        loop {
            if let Some(candidate) = self.files.pop_front() {
                return Some(candidate);
            }
            let dir = self.dirs.pop()?;
            self.expand(dir);
        }
    }
}
