//! Core node types of the configuration tree.
//!
//! A tree is made of four node kinds: a [`Node::Document`] wrapping exactly one
//! root node, ordered [`Mapping`]s with scalar keys, [`Node::Sequence`]s and
//! [`Scalar`] leaves. Mapping entries keep insertion order so that files
//! serialize back in the order they were written.

use std::fmt;

/// The kind of a [`Node`].
///
/// # Examples
///
/// ```
/// use cfgtree::tree::{Node, NodeKind};
///
/// assert_eq!(Node::mapping().kind(), NodeKind::Mapping);
/// assert_eq!(NodeKind::Sequence.to_string(), "sequence");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A document wrapping a single root node.
    Document,
    /// An ordered list of key/value pairs.
    Mapping,
    /// An ordered list of elements.
    Sequence,
    /// A leaf value.
    Scalar,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Document => write!(f, "document"),
            Self::Mapping => write!(f, "mapping"),
            Self::Sequence => write!(f, "sequence"),
            Self::Scalar => write!(f, "scalar"),
        }
    }
}

/// The resolved type of a scalar, kept so typed values re-serialize unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScalarTag {
    /// A string.
    #[default]
    Str,
    /// A boolean.
    Bool,
    /// An integer.
    Int,
    /// A floating point number.
    Float,
    /// An explicit or implicit null.
    Null,
}

/// A scalar leaf: its textual value plus its resolved tag.
///
/// Null scalars carry an empty value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Scalar {
    value: String,
    tag: ScalarTag,
}

impl Scalar {
    /// Creates a string scalar.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            tag: ScalarTag::Str,
        }
    }

    /// Creates a scalar with an explicit tag.
    #[must_use]
    pub fn tagged(value: impl Into<String>, tag: ScalarTag) -> Self {
        Self {
            value: value.into(),
            tag,
        }
    }

    /// Creates a null scalar.
    #[must_use]
    pub fn null() -> Self {
        Self {
            value: String::new(),
            tag: ScalarTag::Null,
        }
    }

    /// Returns the textual value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the resolved tag.
    #[must_use]
    pub const fn tag(&self) -> ScalarTag {
        self.tag
    }

    /// Replaces the value, turning the scalar into a string.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.tag = ScalarTag::Str;
    }

    /// Returns true when the textual value is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// An ordered mapping from scalar keys to nodes.
///
/// Lookups are linear scans; keys are unique within a mapping as long as
/// entries are only added through [`Mapping::insert`] or the locator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mapping {
    entries: Vec<(Scalar, Node)>,
}

impl Mapping {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of key/value pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the mapping has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if a pair with this key exists.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.position(key).map(move |i| &mut self.entries[i].1)
    }

    /// Sets `key` to `value`, replacing an existing value in place or
    /// appending a new pair.
    pub fn insert(&mut self, key: impl Into<String>, value: Node) {
        let key = key.into();
        match self.position(&key) {
            Some(i) => self.entries[i].1 = value,
            None => self.entries.push((Scalar::string(key), value)),
        }
    }

    /// Appends a pair without checking for an existing key.
    pub(crate) fn push(&mut self, key: Scalar, value: Node) {
        self.entries.push((key, value));
    }

    /// Removes the pair stored under `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        self.position(key).map(|i| self.entries.remove(i).1)
    }

    /// Iterates over key/value pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&Scalar, &Node)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Iterates over keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.value())
    }

    pub(crate) fn entries_mut(&mut self) -> &mut Vec<(Scalar, Node)> {
        &mut self.entries
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k.value() == key)
    }
}

/// A node of the configuration tree.
///
/// # Examples
///
/// ```
/// use cfgtree::tree::{Mapping, Node};
///
/// let mut root = Mapping::new();
/// root.insert("edition", Node::string("tkg"));
/// let doc = Node::document(Node::Mapping(root));
///
/// assert_eq!(doc.root_mapping().unwrap().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A document wrapping a single root node.
    Document(Box<Node>),
    /// An ordered mapping.
    Mapping(Mapping),
    /// An ordered sequence.
    Sequence(Vec<Node>),
    /// A leaf value.
    Scalar(Scalar),
}

impl Node {
    /// Creates a document around `root`.
    #[must_use]
    pub fn document(root: Node) -> Self {
        Self::Document(Box::new(root))
    }

    /// Creates the empty tree used when a store file is absent or empty.
    #[must_use]
    pub fn empty_document() -> Self {
        Self::document(Self::mapping())
    }

    /// Creates an empty mapping node.
    #[must_use]
    pub fn mapping() -> Self {
        Self::Mapping(Mapping::new())
    }

    /// Creates an empty sequence node.
    #[must_use]
    pub fn sequence() -> Self {
        Self::Sequence(Vec::new())
    }

    /// Creates a string scalar node.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Scalar(Scalar::string(value))
    }

    /// Creates an empty node of the given kind.
    ///
    /// An empty document wraps an empty mapping.
    #[must_use]
    pub fn empty(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Document => Self::empty_document(),
            NodeKind::Mapping => Self::mapping(),
            NodeKind::Sequence => Self::sequence(),
            NodeKind::Scalar => Self::Scalar(Scalar::string("")),
        }
    }

    /// Returns the kind of this node.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Document(_) => NodeKind::Document,
            Self::Mapping(_) => NodeKind::Mapping,
            Self::Sequence(_) => NodeKind::Sequence,
            Self::Scalar(_) => NodeKind::Scalar,
        }
    }

    /// Returns true for containers without children.
    ///
    /// Documents always have a child and scalars have none to begin with, so
    /// neither is ever considered uninitialized.
    #[must_use]
    pub fn is_uninitialized(&self) -> bool {
        match self {
            Self::Mapping(m) => m.is_empty(),
            Self::Sequence(items) => items.is_empty(),
            Self::Document(_) | Self::Scalar(_) => false,
        }
    }

    /// Returns the scalar payload, if this is a scalar.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the mutable scalar payload, if this is a scalar.
    pub fn as_scalar_mut(&mut self) -> Option<&mut Scalar> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the mapping payload, if this is a mapping.
    #[must_use]
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the mutable mapping payload, if this is a mapping.
    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Self::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the elements, if this is a sequence.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the mutable elements, if this is a sequence.
    pub fn as_sequence_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the root mapping of a document, or the mapping itself.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if the document root (or the node
    /// itself) is not a mapping.
    pub fn root_mapping(&self) -> crate::Result<&Mapping> {
        match self {
            Self::Document(root) => root.as_mapping().ok_or_else(|| malformed_root(root.kind())),
            Self::Mapping(m) => Ok(m),
            other => Err(malformed_root(other.kind())),
        }
    }

    /// Mutable variant of [`Node::root_mapping`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if there is no root mapping.
    pub fn root_mapping_mut(&mut self) -> crate::Result<&mut Mapping> {
        match self {
            Self::Document(root) => {
                let kind = root.kind();
                root.as_mapping_mut().ok_or_else(|| malformed_root(kind))
            }
            Self::Mapping(m) => Ok(m),
            other => Err(malformed_root(other.kind())),
        }
    }
}

fn malformed_root(found: NodeKind) -> crate::Error {
    crate::Error::Malformed {
        details: format!("expected a mapping at the document root, found {found}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_insert_preserves_order() {
        let mut m = Mapping::new();
        m.insert("b", Node::string("1"));
        m.insert("a", Node::string("2"));
        m.insert("b", Node::string("3"));

        let keys: Vec<_> = m.keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(m.get("b").and_then(Node::as_scalar).unwrap().value(), "3");
    }

    #[test]
    fn test_mapping_remove() {
        let mut m = Mapping::new();
        m.insert("a", Node::string("1"));
        m.insert("b", Node::string("2"));

        assert!(m.remove("a").is_some());
        assert!(m.remove("a").is_none());
        assert_eq!(m.keys().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn test_empty_nodes() {
        assert_eq!(Node::empty(NodeKind::Sequence), Node::sequence());
        assert_eq!(Node::empty(NodeKind::Document), Node::empty_document());
        assert!(Node::empty(NodeKind::Mapping).is_uninitialized());
        assert!(!Node::empty(NodeKind::Scalar).is_uninitialized());
        assert!(!Node::empty_document().is_uninitialized());
    }

    #[test]
    fn test_root_mapping_of_malformed_document() {
        let doc = Node::document(Node::sequence());
        let err = doc.root_mapping().unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_set_value_turns_scalar_into_string() {
        let mut s = Scalar::tagged("true", ScalarTag::Bool);
        s.set_value("false");
        assert_eq!(s.tag(), ScalarTag::Str);
        assert_eq!(s.value(), "false");
    }

    #[test]
    fn test_deep_copy_is_independent() {
        let mut original = Node::empty_document();
        original
            .root_mapping_mut()
            .unwrap()
            .insert("edition", Node::string("tkg"));

        let mut copy = original.clone();
        copy.root_mapping_mut()
            .unwrap()
            .insert("edition", Node::string("tce"));

        let value = original.root_mapping().unwrap().get("edition").unwrap();
        assert_eq!(value.as_scalar().unwrap().value(), "tkg");
    }
}
