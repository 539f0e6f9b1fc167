//! Output configuration types

use serde::{Deserialize, Serialize};

/// How file bytes are turned into text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
    /// Replace invalid UTF-8 sequences with U+FFFD.
    #[default]
    Lossy,
    /// Skip files that are not valid UTF-8.
    Strict,
}

/// Layout of each concatenated entry:
///
/// ```text
/// [\n]{marker}{relative/path}\n{trimmed content}{\n * trailing_newlines}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConcatFormat {
    pub marker: String,
    /// Emit an empty line before each header.
    pub leading_newline: bool,
    pub trailing_newlines: usize,
    pub decode: DecodePolicy,
    /// Log unreadable or undecodable files as warnings instead of debug.
    pub report_skipped: bool,
}

impl ConcatFormat {
    /// `# path` headers with one blank line between entries.
    pub fn hash() -> Self {
        Self {
            marker: "# ".to_string(),
            leading_newline: false,
            trailing_newlines: 2,
            decode: DecodePolicy::Lossy,
            report_skipped: false,
        }
    }

    /// `>>path` headers preceded by an empty line.
    pub fn arrow(trailing_newlines: usize) -> Self {
        Self {
            marker: ">>".to_string(),
            leading_newline: true,
            trailing_newlines,
            decode: DecodePolicy::Strict,
            report_skipped: false,
        }
    }

    pub fn with_report_skipped(mut self, report: bool) -> Self {
        self.report_skipped = report;
        self
    }
}

impl Default for ConcatFormat {
    fn default() -> Self {
        Self::hash()
    }
}
