//! Source tree traversal and filtering
//!
//! - `config` - declarative `FilterConfig` rules
//! - `filter` - path predicates and per-file `Decision`s
//! - `traversal` - `SourceWalk`, the lazy depth-first walk used for concatenation
//! - `utils` - path helpers shared with the tree builder

mod config;
mod filter;
mod traversal;
pub(crate) mod utils;

pub use config::{
    ExtensionRule, FilterConfig, KeywordMatch, KeywordRule, SubtreeRule, normalize_extensions,
};
pub use filter::{Decision, PathFilter, SkipReason};
pub use traversal::{Candidate, SourceWalk};
pub use utils::display_relative;
