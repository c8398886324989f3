//! Merging of configuration trees.
//!
//! [`concat`] folds a source tree into a destination tree in place. The rules
//! are deliberately asymmetric:
//!
//! - Mapping: pairs whose key is missing from the destination are appended;
//!   existing destination keys win and are not merged recursively.
//! - Sequence: an empty destination adopts the source elements, otherwise the
//!   destination is kept as is.
//! - Scalar: a non-empty destination takes the source value, an empty
//!   destination stays empty.
//! - An uninitialized destination (a container without children) adopts the
//!   whole source node.

use super::node::{Mapping, Node, NodeKind};
use crate::error::{Error, Result};

const ROOT: &str = "(root)";

/// Merges `src` into `dst`, mutating `dst`.
///
/// # Errors
///
/// Returns [`Error::KindMismatch`] when `src` and `dst` have different kinds
/// and `dst` is not an uninitialized container.
///
/// # Examples
///
/// ```
/// use cfgtree::tree::{concat, Node};
///
/// let src = Node::parse("a: 1\nb: 2\n").unwrap();
/// let mut dst = Node::parse("a: 9\n").unwrap();
/// concat(&src, &mut dst).unwrap();
///
/// assert_eq!(dst.to_yaml_string().unwrap(), "a: 9\nb: 2\n");
/// ```
pub fn concat(src: &Node, dst: &mut Node) -> Result<()> {
    concat_at(src, dst, ROOT)
}

fn concat_at(src: &Node, dst: &mut Node, at: &str) -> Result<()> {
    if dst.is_uninitialized() {
        *dst = src.clone();
        return Ok(());
    }

    match (src, dst) {
        (Node::Document(src_root), Node::Document(dst_root)) => {
            concat_at(src_root, dst_root, at)
        }
        (Node::Mapping(src_map), Node::Mapping(dst_map)) => {
            concat_mappings(src_map, dst_map);
            Ok(())
        }
        (Node::Sequence(src_items), Node::Sequence(dst_items)) => {
            if dst_items.is_empty() {
                dst_items.clone_from(src_items);
            }
            Ok(())
        }
        (Node::Scalar(src_scalar), Node::Scalar(dst_scalar)) => {
            if !dst_scalar.is_empty() {
                // The source tag travels with its value
                dst_scalar.clone_from(src_scalar);
            }
            Ok(())
        }
        (src, dst) => Err(mismatch(at, dst.kind(), src.kind())),
    }
}

fn concat_mappings(src: &Mapping, dst: &mut Mapping) {
    for (key, value) in src.iter() {
        if !dst.contains_key(key.value()) {
            dst.push(key.clone(), value.clone());
        }
    }
}

fn mismatch(at: &str, expected: NodeKind, found: NodeKind) -> Error {
    Error::KindMismatch {
        key: at.to_string(),
        expected,
        found,
    }
}
