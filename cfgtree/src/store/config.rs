//! Store configuration and path resolution.
//!
//! This module provides the [`StoreConfig`] describing where the three store
//! files (legacy config, v2 config, metadata) live and how long a caller may
//! wait for their locks.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Default time a caller waits for a store lock.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Longest lock timeout accepted from the environment or the command line.
pub const MAX_LOCK_TIMEOUT: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// File name of the legacy config store.
pub const CONFIG_FILE_NAME: &str = "config.yaml";
/// File name of the v2 config store.
pub const CONFIG_V2_FILE_NAME: &str = "config-v2.yaml";
/// File name of the metadata store.
pub const METADATA_FILE_NAME: &str = ".config-metadata.yaml";

/// One of the three physical stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Store {
    /// The legacy config file.
    Legacy,
    /// The v2 config file.
    V2,
    /// The metadata file holding feature flags and the migrated-items registry.
    Metadata,
}

impl Store {
    /// Name of the lock marker file created beside the store file.
    #[must_use]
    pub const fn lock_file_name(self) -> &'static str {
        match self {
            Self::Legacy => ".cfgtree.lock",
            Self::V2 => ".cfgtree-v2.lock",
            Self::Metadata => ".cfgtree-metadata.lock",
        }
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy config"),
            Self::V2 => write!(f, "v2 config"),
            Self::Metadata => write!(f, "metadata"),
        }
    }
}

/// Locations and lock settings for a set of stores.
///
/// # Examples
///
/// ```
/// use cfgtree::StoreConfig;
/// use std::time::Duration;
///
/// let config = StoreConfig::in_dir("/tmp/cfgtree")
///     .with_lock_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.legacy_path.to_str().unwrap(), "/tmp/cfgtree/config.yaml");
/// assert!(config.legacy_copy_path.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Path of the legacy config file.
    pub legacy_path: PathBuf,
    /// Path of the v2 config file.
    pub v2_path: PathBuf,
    /// Path of the metadata file.
    pub metadata_path: PathBuf,
    /// Optional extra location that receives the full, unsplit config on
    /// every persist while keys are being migrated.
    pub legacy_copy_path: Option<PathBuf>,
    /// How long to wait for a store lock before giving up.
    pub lock_timeout: Duration,
}

impl StoreConfig {
    /// Creates a configuration with all three stores in `dir`.
    ///
    /// Default settings:
    /// - `lock_timeout`: 10 minutes
    /// - `legacy_copy_path`: none
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            legacy_path: dir.join(CONFIG_FILE_NAME),
            v2_path: dir.join(CONFIG_V2_FILE_NAME),
            metadata_path: dir.join(METADATA_FILE_NAME),
            legacy_copy_path: None,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    /// Sets the lock timeout.
    #[must_use]
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Sets the extra location for the full legacy-format config.
    #[must_use]
    pub fn with_legacy_copy_path(mut self, path: impl AsRef<Path>) -> Self {
        self.legacy_copy_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Returns the file path of `store`.
    #[must_use]
    pub fn path(&self, store: Store) -> &Path {
        match store {
            Store::Legacy => &self.legacy_path,
            Store::V2 => &self.v2_path,
            Store::Metadata => &self.metadata_path,
        }
    }

    /// Returns the lock marker path of `store`, beside its file.
    #[must_use]
    pub fn lock_path(&self, store: Store) -> PathBuf {
        let path = self.path(store);
        path.parent()
            .unwrap_or_else(|| Path::new("."))
            .join(store.lock_file_name())
    }
}

/// Returns the default local directory for store files.
///
/// The default directory is `~/.config/cfgtree`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_local_dir() -> Result<PathBuf> {
    Ok(home_dir()?.join(".config").join("cfgtree"))
}

/// Returns the default location of the full legacy-format config copy.
///
/// The default location is `~/.cfgtree/config.yaml`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_legacy_copy_path() -> Result<PathBuf> {
    Ok(home_dir()?.join(".cfgtree").join(CONFIG_FILE_NAME))
}

fn home_dir() -> Result<PathBuf> {
    home::home_dir().ok_or_else(|| Error::Validation {
        field: "home_directory".into(),
        message: "Cannot determine home directory".into(),
    })
}
