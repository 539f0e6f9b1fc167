//! Directory tree building
//!
//! `TreeBuilder` reads the whole filtered tree into a `TreeNode`, which
//! `output::TreeFormatter` renders with box-drawing connectors and
//! `output::write_json` serializes.

mod builder;
mod node;

pub use builder::TreeBuilder;
pub use node::TreeNode;
