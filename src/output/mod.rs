//! Output writers
//!
//! - `config` - concatenation layout and decoding policy
//! - `concat` - `Concatenator`, writes file contents under path headers
//! - `tree` - `TreeFormatter`, box-drawing tree lines
//! - `json` - JSON tree output
//! - `status` - colored one-line run summaries

mod concat;
mod config;
mod json;
mod status;
mod tree;

pub use concat::{Concatenator, ExportReport};
pub use config::{ConcatFormat, DecodePolicy};
pub use json::write_json;
pub use status::StatusPrinter;
pub use tree::TreeFormatter;
