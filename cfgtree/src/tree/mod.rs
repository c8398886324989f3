//! Generic ordered configuration trees.
//!
//! This module provides the document model used for every store file:
//!
//! - [`Node`], [`Mapping`] and [`Scalar`]: the tree itself
//! - [`find_node`] and [`Key`]: path-addressed lookup and creation
//! - [`concat`]: the merge of one tree into another
//!
//! Trees are parsed from and serialized to YAML through `serde_yaml`.

mod locator;
mod merge;
mod node;
mod yaml;

pub use locator::{find_node, get_node, Key};
pub use merge::concat;
pub use node::{Mapping, Node, NodeKind, Scalar, ScalarTag};
pub use yaml::ParseError;
