//! Pulp - flatten a source tree into one text file

pub mod config;
pub mod error;
pub mod output;
pub mod run;
pub mod tree;
pub mod walk;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{
    ConfigError, FilterOverlay, FormatOverlay, KeywordOverlay, Mode, Preset, Profile, ProfileFile,
};
pub use error::{PulpError, Result};
pub use output::{
    ConcatFormat, Concatenator, DecodePolicy, ExportReport, StatusPrinter, TreeFormatter,
    write_json,
};
pub use run::{build_tree, check_root, exclude_output, export, open_output, write_tree};
pub use tree::{TreeBuilder, TreeNode};
pub use walk::{
    Candidate, Decision, ExtensionRule, FilterConfig, KeywordMatch, KeywordRule, SkipReason,
    SourceWalk, SubtreeRule,
};
