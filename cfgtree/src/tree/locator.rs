//! Path-addressed lookup and creation of nodes.

use super::node::{Node, NodeKind, Scalar, ScalarTag};
use crate::error::{Error, Result};

/// One step of a lookup path: a mapping key and the kind expected under it.
///
/// # Examples
///
/// ```
/// use cfgtree::tree::{Key, NodeKind};
///
/// let keys = Key::path("clientOptions.cli.edition");
/// assert_eq!(keys.len(), 3);
/// assert_eq!(keys[0], Key::mapping("clientOptions"));
/// assert_eq!(keys[2].kind, NodeKind::Scalar);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    /// The mapping key.
    pub name: String,
    /// The kind of the value stored under the key.
    pub kind: NodeKind,
}

impl Key {
    /// Creates a key step.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Creates a step expecting a mapping.
    #[must_use]
    pub fn mapping(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Mapping)
    }

    /// Creates a step expecting a sequence.
    #[must_use]
    pub fn sequence(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Sequence)
    }

    /// Creates a step expecting a scalar.
    #[must_use]
    pub fn scalar(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Scalar)
    }

    /// Builds keys from a dotted path: every segment but the last is a
    /// mapping, the last one a scalar. Empty segments are ignored.
    #[must_use]
    pub fn path(dotted: &str) -> Vec<Self> {
        let segments: Vec<&str> = dotted.split('.').filter(|s| !s.is_empty()).collect();
        let last = segments.len().saturating_sub(1);
        segments
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                if i == last {
                    Self::scalar(name)
                } else {
                    Self::mapping(name)
                }
            })
            .collect()
    }
}

/// Resolves `keys` from `root`, descending through nested mappings.
///
/// `root` may be a document (its root mapping is used) or a mapping. With
/// `force_create`, missing keys are appended as empty nodes of the declared
/// kind and values of the wrong kind are reset to an empty node of the
/// declared kind, so a node is always returned for a well-formed root.
/// Without it, a missing key yields `Ok(None)`.
///
/// An empty path returns the root mapping node.
///
/// # Errors
///
/// - [`Error::Malformed`] if `root` is neither a mapping nor a document
///   wrapping one
/// - [`Error::KindMismatch`] if, without `force_create`, a value along the
///   path has a different kind than declared
///
/// # Examples
///
/// ```
/// use cfgtree::tree::{find_node, Key, Node};
///
/// let mut doc = Node::empty_document();
/// let edition = find_node(&mut doc, &Key::path("clientOptions.cli.edition"), true)
///     .unwrap()
///     .unwrap();
/// edition.as_scalar_mut().unwrap().set_value("tkg");
///
/// assert_eq!(
///     doc.to_yaml_string().unwrap(),
///     "clientOptions:\n  cli:\n    edition: tkg\n"
/// );
/// ```
pub fn find_node<'a>(
    root: &'a mut Node,
    keys: &[Key],
    force_create: bool,
) -> Result<Option<&'a mut Node>> {
    let mut current: &mut Node = match root {
        Node::Document(child) => child.as_mut(),
        other => other,
    };
    if current.kind() != NodeKind::Mapping {
        return Err(Error::Malformed {
            details: format!(
                "expected a mapping at the document root, found {}",
                current.kind()
            ),
        });
    }

    for key in keys {
        let kind = current.kind();
        let Some(mapping) = current.as_mapping_mut() else {
            // Only reachable through a path that declares a non-mapping kind
            // before its last step.
            return Err(Error::KindMismatch {
                key: key.name.clone(),
                expected: NodeKind::Mapping,
                found: kind,
            });
        };

        if !mapping.contains_key(&key.name) {
            if !force_create {
                return Ok(None);
            }
            mapping.push(Scalar::string(key.name.clone()), Node::empty(key.kind));
        }

        let Some(value) = mapping.get_mut(&key.name) else {
            return Ok(None);
        };

        if value.kind() != key.kind {
            if !force_create {
                return Err(Error::KindMismatch {
                    key: key.name.clone(),
                    expected: key.kind,
                    found: value.kind(),
                });
            }
            *value = Node::empty(key.kind);
        }

        current = value;
    }

    Ok(Some(current))
}

/// Read-only lookup with the semantics of [`find_node`] without
/// `force_create`, except that a null value counts as absent.
///
/// # Errors
///
/// Same as [`find_node`] without `force_create`.
pub fn get_node<'a>(root: &'a Node, keys: &[Key]) -> Result<Option<&'a Node>> {
    let mut current = match root {
        Node::Document(child) => child.as_ref(),
        other => other,
    };
    if current.kind() != NodeKind::Mapping {
        return Err(Error::Malformed {
            details: format!(
                "expected a mapping at the document root, found {}",
                current.kind()
            ),
        });
    }

    for key in keys {
        let Some(mapping) = current.as_mapping() else {
            return Err(Error::KindMismatch {
                key: key.name.clone(),
                expected: NodeKind::Mapping,
                found: current.kind(),
            });
        };
        let Some(value) = mapping.get(&key.name) else {
            return Ok(None);
        };
        if matches!(value, Node::Scalar(s) if s.tag() == ScalarTag::Null) {
            return Ok(None);
        }
        if value.kind() != key.kind {
            return Err(Error::KindMismatch {
                key: key.name.clone(),
                expected: key.kind,
                found: value.kind(),
            });
        }
        current = value;
    }

    Ok(Some(current))
}



// Deeper paths and more cases, enabled with the `property-tests` feature
#[cfg(all(test, feature = "property-tests"))]
#[allow(unused_doc_comments)] // proptest! macro doesn't support doc comments
mod deep_property_tests {
    use super::property_tests::{dotted_path, keys_are_unique, seeded_document};
    use super::*;
    use proptest::prelude::*;

    /// Property: a force-created path is found again by a read-only lookup.
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(2048))]
        #[test]
        fn prop_force_created_path_is_readable(
            seeds in proptest::collection::vec(dotted_path(10), 0..32),
            path in dotted_path(12),
        ) {
            let mut doc = seeded_document(&seeds);
            let keys = Key::path(&path);
            find_node(&mut doc, &keys, true).unwrap();

            prop_assert!(get_node(&doc, &keys).unwrap().is_some());
            prop_assert!(keys_are_unique(&doc));
        }
    }
}
