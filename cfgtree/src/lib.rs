#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # cfgtree
//!
//! A library for reading, merging and persisting versioned configuration
//! trees.
//!
//! Configuration lives in two on-disk layouts, a legacy file and a v2 file,
//! plus a metadata file with feature flags. While the migration between the
//! layouts is in progress, reads see the legacy tree merged into the v2 tree
//! and writes move every migrated top-level key into the v2 file. All file
//! access is serialized by per-store locks that work across threads and
//! processes.
//!
//! ## Core Types
//!
//! - [`Node`], [`Mapping`] and [`Scalar`]: the ordered tree model
//! - [`find_node`] and [`Key`]: path-addressed lookup and creation
//! - [`concat`]: merging one tree into another
//! - [`ConfigClient`]: store access, migration, feature flags and options
//! - [`LockManager`]: per-store locks
//! - [`Error`] and [`Result`]: error handling types
//! - [`Logger`] and [`LogLevel`]: logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use cfgtree::{concat, Node};
//!
//! let legacy = Node::parse("kind: ClientConfig\ncontexts:\n- a\n").unwrap();
//! let mut v2 = Node::parse("contexts:\n- b\n").unwrap();
//! concat(&legacy, &mut v2).unwrap();
//!
//! assert_eq!(
//!     v2.to_yaml_string().unwrap(),
//!     "contexts:\n- b\nkind: ClientConfig\n"
//! );
//! ```

pub mod client;
pub mod error;
pub mod lock;
pub mod logging;
pub mod metadata;
pub mod options;
pub mod store;
pub mod tree;

// Re-export key types at crate root for convenience
pub use client::ConfigClient;
pub use error::{Error, Result};
pub use lock::{ConfigLocks, LockGuard, LockManager, StoreLock};
pub use logging::{init_logger, resolve_level, LogLevel, Logger};
pub use metadata::{default_migrated_items, MigratedItem, FEATURE_MIGRATE_TO_NEW_CONFIG};
pub use options::CliOptions;
pub use store::{load_tree, persist_tree, EnvironmentConfig, Store, StoreConfig};
pub use tree::{concat, find_node, get_node, Key, Mapping, Node, NodeKind, Scalar, ScalarTag};
