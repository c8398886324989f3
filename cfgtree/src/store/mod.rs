//! Store locations and whole-file persistence.
//!
//! A store is one YAML file holding a single configuration tree. This module
//! resolves where the stores live ([`StoreConfig`], [`EnvironmentConfig`]) and
//! reads and writes their trees ([`load_tree`], [`persist_tree`]).

mod config;
mod environment;
mod file;

pub use config::{
    default_legacy_copy_path, default_local_dir, Store, StoreConfig, CONFIG_FILE_NAME,
    CONFIG_V2_FILE_NAME, DEFAULT_LOCK_TIMEOUT, MAX_LOCK_TIMEOUT, METADATA_FILE_NAME,
};
pub use environment::{
    EnvironmentConfig, ENV_CONFIG, ENV_CONFIG_METADATA, ENV_CONFIG_V2, ENV_LEGACY_CONFIG,
    ENV_LOCK_TIMEOUT_SECONDS,
};
pub(crate) use file::ensure_parent_dir;
pub use file::{load_tree, persist_tree};
