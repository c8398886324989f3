//! Conversion between [`Node`] trees and YAML text.
//!
//! Parsing and emitting go through `serde_yaml`, so files written here are
//! formatted exactly like any other `serde_yaml` output.

use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_yaml::{Number, Value};

use super::node::{Mapping, Node, Scalar, ScalarTag};
use crate::error::{Error, Result};

/// Why a YAML document could not become a tree.
#[derive(Debug)]
pub enum ParseError {
    /// The text is not valid YAML.
    Syntax(serde_yaml::Error),
    /// The YAML is valid but cannot be represented as a tree.
    Structure(String),
}

impl Node {
    /// Parses YAML text into a document node.
    ///
    /// Empty, whitespace-only and comment-only input yields
    /// [`Node::empty_document`].
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Syntax`] for invalid YAML and
    /// [`ParseError::Structure`] for mappings with non-scalar keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use cfgtree::tree::Node;
    ///
    /// let doc = Node::parse("clientOptions:\n  cli:\n    edition: tkg\n").unwrap();
    /// assert!(doc.root_mapping().unwrap().contains_key("clientOptions"));
    /// ```
    pub fn parse(text: &str) -> std::result::Result<Self, ParseError> {
        if text.trim().is_empty() {
            return Ok(Self::empty_document());
        }
        let value: Value = serde_yaml::from_str(text).map_err(ParseError::Syntax)?;
        let root = match value {
            Value::Null => Self::mapping(),
            other => from_value(other).map_err(ParseError::Structure)?,
        };
        Ok(Self::document(root))
    }

    /// Serializes this node as YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the serializer fails.
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&to_value(self))?)
    }

    /// Converts this node into a `serde_yaml` value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        to_value(self)
    }

    /// Deserializes this subtree into a typed view.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Yaml`] if the subtree does not match `T`.
    pub fn to_typed<T: DeserializeOwned>(&self) -> Result<T> {
        serde_yaml::from_value(to_value(self)).map_err(Error::from)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        to_value(self).serialize(serializer)
    }
}

fn from_value(value: Value) -> std::result::Result<Node, String> {
    Ok(match value {
        Value::Mapping(map) => {
            let mut mapping = Mapping::new();
            for (key, value) in map {
                let key = match key {
                    Value::Tagged(tagged) => tagged.value,
                    other => other,
                };
                let key = scalar_from_value(key)
                    .ok_or_else(|| "mapping keys must be scalars".to_string())?;
                mapping.push(key, from_value(value)?);
            }
            Node::Mapping(mapping)
        }
        Value::Sequence(items) => Node::Sequence(
            items
                .into_iter()
                .map(from_value)
                .collect::<std::result::Result<_, _>>()?,
        ),
        Value::Tagged(tagged) => from_value(tagged.value)?,
        scalar => Node::Scalar(
            scalar_from_value(scalar).ok_or_else(|| "unsupported scalar value".to_string())?,
        ),
    })
}

fn scalar_from_value(value: Value) -> Option<Scalar> {
    match value {
        Value::Null => Some(Scalar::null()),
        Value::Bool(b) => Some(Scalar::tagged(b.to_string(), ScalarTag::Bool)),
        Value::Number(n) => {
            let tag = if n.is_f64() {
                ScalarTag::Float
            } else {
                ScalarTag::Int
            };
            Some(Scalar::tagged(n.to_string(), tag))
        }
        Value::String(s) => Some(Scalar::string(s)),
        Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => None,
    }
}

fn to_value(node: &Node) -> Value {
    match node {
        Node::Document(root) => to_value(root),
        Node::Mapping(mapping) => Value::Mapping(
            mapping
                .iter()
                .map(|(k, v)| (scalar_to_value(k), to_value(v)))
                .collect(),
        ),
        Node::Sequence(items) => Value::Sequence(items.iter().map(to_value).collect()),
        Node::Scalar(scalar) => scalar_to_value(scalar),
    }
}

// Typed scalars whose text no longer parses as their tag fall back to strings.
fn scalar_to_value(scalar: &Scalar) -> Value {
    let text = scalar.value();
    match scalar.tag() {
        ScalarTag::Str => Value::String(text.to_string()),
        ScalarTag::Null if text.is_empty() => Value::Null,
        ScalarTag::Null => Value::String(text.to_string()),
        ScalarTag::Bool => text
            .parse::<bool>()
            .map_or_else(|_| Value::String(text.to_string()), Value::Bool),
        ScalarTag::Int => {
            if let Ok(i) = text.parse::<i64>() {
                Value::Number(Number::from(i))
            } else if let Ok(u) = text.parse::<u64>() {
                Value::Number(Number::from(u))
            } else {
                Value::String(text.to_string())
            }
        }
        ScalarTag::Float => text.parse::<f64>().map_or_else(
            |_| serde_yaml::from_str::<Value>(text).unwrap_or_else(|_| Value::String(text.to_string())),
            |f| Value::Number(Number::from(f)),
        ),
    }
}
