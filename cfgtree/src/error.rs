//! Error types for the cfgtree library.
//!
//! This module provides the error hierarchy for tree manipulation, locking
//! and persistence, using `thiserror` for ergonomic error handling.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::tree::NodeKind;

/// Result type alias for operations that may fail with a cfgtree error.
///
/// # Examples
///
/// ```
/// use cfgtree::{Error, Result};
///
/// fn example_operation() -> Result<String> {
///     Ok("tkg".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the cfgtree library.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested key, flag or resource does not exist.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// A store file could not be parsed.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// The file that failed to parse.
        path: PathBuf,
        /// The underlying parser error.
        #[source]
        source: serde_yaml::Error,
    },

    /// A tree does not have the expected shape.
    #[error("malformed configuration tree: {details}")]
    Malformed {
        /// Details about the malformed structure.
        details: String,
    },

    /// A node has a different kind than the one required.
    #[error("kind mismatch at '{key}': expected {expected}, found {found}")]
    KindMismatch {
        /// The key (or merge position) where the mismatch occurred.
        key: String,
        /// The kind that was expected.
        expected: NodeKind,
        /// The kind that was found.
        found: NodeKind,
    },

    /// The cross-process store lock was not acquired in time.
    #[error("lock timeout after {timeout:?} waiting for {}", path.display())]
    LockTimeout {
        /// The lock marker file.
        path: PathBuf,
        /// How long the caller waited before giving up.
        timeout: Duration,
    },

    /// A filesystem operation failed.
    #[error("failed to {operation} {}: {source}", path.display())]
    Io {
        /// The operation that failed (e.g. "read", "write").
        operation: &'static str,
        /// The path involved.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Serializing a tree or converting it to a typed view failed.
    #[error("serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A configuration value (usually from the environment) is invalid.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },
}

impl Error {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Check if error indicates a missing key or resource.
    ///
    /// # Examples
    ///
    /// ```
    /// use cfgtree::Error;
    ///
    /// let err = Error::NotFound { resource: "edition".to_string() };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if error indicates corrupt store contents.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::Malformed { .. })
    }

    /// Check if error is a lock acquisition timeout.
    #[must_use]
    pub fn is_lock_timeout(&self) -> bool {
        matches!(self, Self::LockTimeout { .. })
    }
}
