//! Concatenates walked files into a single text stream

use std::borrow::Cow;
use std::io::{self, Write};
use std::path::PathBuf;

use tracing::{debug, trace, warn};

use crate::walk::{Candidate, Decision, SkipReason, display_relative};

use super::config::{ConcatFormat, DecodePolicy};

/// Per-run outcome of a concatenation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    /// Relative paths written, in output order.
    pub emitted: Vec<PathBuf>,
    pub skipped: Vec<(PathBuf, SkipReason)>,
    pub bytes_written: u64,
}

impl ExportReport {
    pub fn file_count(&self) -> usize {
        self.emitted.len()
    }

    /// Files skipped for reasons found while reading (not path filtering).
    pub fn read_failures(&self) -> impl Iterator<Item = &(PathBuf, SkipReason)> {
        self.skipped.iter().filter(|(_, reason)| {
            matches!(reason, SkipReason::Unreadable(_) | SkipReason::InvalidUtf8)
        })
    }
}

/// Writes each surviving file as a path header followed by its trimmed content.
pub struct Concatenator {
    format: ConcatFormat,
}

impl Concatenator {
    pub fn new(format: ConcatFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> &ConcatFormat {
        &self.format
    }

    /// Consume the candidates and write every emittable file to `out`.
    ///
    /// Per-file problems are recorded in the report; only write errors fail.
    pub fn export<I, W>(&self, candidates: I, out: &mut W) -> io::Result<ExportReport>
    where
        I: IntoIterator<Item = Candidate>,
        W: Write,
    {
        let mut report = ExportReport::default();

        for candidate in candidates {
            if let Decision::Skip(reason) = candidate.decision {
                trace!(path = %candidate.relative.display(), %reason, "filtered");
                report.skipped.push((candidate.relative, reason));
                continue;
            }

            match self.read_content(&candidate) {
                Ok(content) => {
                    let entry = self.render_entry(&candidate, &content);
                    out.write_all(entry.as_bytes())?;
                    report.bytes_written += entry.len() as u64;
                    report.emitted.push(candidate.relative);
                }
                Err(reason) => {
                    self.log_skip(&candidate, &reason);
                    report.skipped.push((candidate.relative, reason));
                }
            }
        }

        out.flush()?;
        Ok(report)
    }

    /// Read, decode and trim a file. Empty content is a skip.
    fn read_content(&self, candidate: &Candidate) -> Result<String, SkipReason> {
        let bytes =
            std::fs::read(&candidate.path).map_err(|e| SkipReason::Unreadable(e.to_string()))?;

        let text: Cow<'_, str> = match self.format.decode {
            DecodePolicy::Lossy => String::from_utf8_lossy(&bytes),
            DecodePolicy::Strict => {
                Cow::Borrowed(std::str::from_utf8(&bytes).map_err(|_| SkipReason::InvalidUtf8)?)
            }
        };

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(SkipReason::Empty);
        }
        Ok(trimmed.to_string())
    }

    fn render_entry(&self, candidate: &Candidate, content: &str) -> String {
        let mut entry = String::with_capacity(content.len() + 64);
        if self.format.leading_newline {
            entry.push('\n');
        }
        entry.push_str(&self.format.marker);
        entry.push_str(&display_relative(&candidate.relative));
        entry.push('\n');
        entry.push_str(content);
        for _ in 0..self.format.trailing_newlines {
            entry.push('\n');
        }
        entry
    }

    fn log_skip(&self, candidate: &Candidate, reason: &SkipReason) {
        let path = candidate.relative.display();
        match reason {
            SkipReason::Empty => debug!(%path, "skipping empty file"),
            _ if self.format.report_skipped => warn!(%path, %reason, "skipping file"),
            _ => debug!(%path, %reason, "skipping file"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTree;
    use crate::walk::{ExtensionRule, FilterConfig, SourceWalk};

    fn export(tree: &TestTree, config: &FilterConfig, format: ConcatFormat) -> (String, ExportReport) {
        let mut out = Vec::new();
        let report = Concatenator::new(format)
            .export(SourceWalk::new(tree.path(), config), &mut out)
            .unwrap();
        (String::from_utf8(out).unwrap(), report)
    }

    #[test]
    fn test_hash_format_layout() {
        let tree = TestTree::new();
        tree.add_file("a.ts", "  const a = 1;\n\n");
        tree.add_file("lib/b.ts", "export {}");

        let (out, report) = export(&tree, &FilterConfig::default(), ConcatFormat::hash());
        assert_eq!(out, "# a.ts\nconst a = 1;\n\n# lib/b.ts\nexport {}\n\n");
        assert_eq!(report.file_count(), 2);
        assert_eq!(report.bytes_written, out.len() as u64);
    }

    #[test]
    fn test_arrow_format_layout() {
        let tree = TestTree::new();
        tree.add_file("App.tsx", "app");

        let (out, _) = export(&tree, &FilterConfig::default(), ConcatFormat::arrow(1));
        assert_eq!(out, "\n>>App.tsx\napp\n");

        let (out, _) = export(&tree, &FilterConfig::default(), ConcatFormat::arrow(2));
        assert_eq!(out, "\n>>App.tsx\napp\n\n");
    }

    #[test]
    fn test_empty_and_whitespace_files_are_skipped() {
        let tree = TestTree::new();
        tree.add_file("landing/empty.ts", "");
        tree.add_file("landing/blank.ts", " \n\t\n");
        tree.add_file("landing/real.ts", "x");

        let (out, report) = export(&tree, &FilterConfig::default(), ConcatFormat::hash());
        assert_eq!(out, "# landing/real.ts\nx\n\n");
        assert_eq!(
            report.skipped,
            vec![
                (PathBuf::from("landing/blank.ts"), SkipReason::Empty),
                (PathBuf::from("landing/empty.ts"), SkipReason::Empty),
            ]
        );
    }

    #[test]
    fn test_decode_policies() {
        let tree = TestTree::new();
        tree.add_bytes("bad.ts", b"ok \xff\xfe end");

        let (out, _) = export(&tree, &FilterConfig::default(), ConcatFormat::hash());
        assert!(out.contains("ok \u{FFFD}\u{FFFD} end"), "lossy should replace: {out:?}");

        let (out, report) = export(&tree, &FilterConfig::default(), ConcatFormat::arrow(1));
        assert!(out.is_empty());
        assert_eq!(report.read_failures().count(), 1);
        assert_eq!(report.skipped[0].1, SkipReason::InvalidUtf8);
    }

    #[test]
    fn test_filtered_candidates_recorded_not_read() {
        let tree = TestTree::new();
        tree.add_file("logo.png", "not really a png");
        tree.add_file("main.ts", "main");

        let config = FilterConfig {
            extensions: ExtensionRule::deny(["png"]),
            ..Default::default()
        };
        let (out, report) = export(&tree, &config, ConcatFormat::hash());
        assert!(!out.contains("logo.png"));
        assert_eq!(report.skipped, vec![(PathBuf::from("logo.png"), SkipReason::Extension)]);
        assert_eq!(report.read_failures().count(), 0);
    }

    #[test]
    #[cfg(unix)]
    fn test_unreadable_file_does_not_abort() {
        use std::os::unix::fs::PermissionsExt;

        let tree = TestTree::new();
        let secret = tree.add_file("a_secret.ts", "secret");
        tree.add_file("b_open.ts", "open");
        std::fs::set_permissions(&secret, std::fs::Permissions::from_mode(0o000)).unwrap();

        // root can read anything; nothing to assert then
        let readable_anyway = std::fs::read(&secret).is_ok();

        let (out, report) = export(&tree, &FilterConfig::default(), ConcatFormat::hash());
        std::fs::set_permissions(&secret, std::fs::Permissions::from_mode(0o644)).unwrap();

        assert!(out.contains("# b_open.ts\nopen"));
        if !readable_anyway {
            assert!(!out.contains("secret"));
            assert!(matches!(report.skipped[0].1, SkipReason::Unreadable(_)));
        }
    }
}
