//! Common test utilities for integration tests.
//!
//! This module provides a fixture that lays out the three stores in a
//! temporary directory.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use cfgtree::{ConfigClient, Store, StoreConfig};
use tempfile::TempDir;

/// A set of stores in a temporary directory.
///
/// The directory is removed when the fixture is dropped.
#[allow(dead_code)]
pub struct StoreFixture {
    pub dir: TempDir,
    pub config: StoreConfig,
}

#[allow(dead_code)]
impl StoreFixture {
    /// Creates empty stores (no files yet) with a legacy copy location and a
    /// short lock timeout.
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::in_dir(dir.path())
            .with_legacy_copy_path(dir.path().join("compat").join("config.yaml"))
            .with_lock_timeout(Duration::from_secs(30));
        Self { dir, config }
    }

    /// Writes raw text to a store file.
    pub fn with_store(self, store: Store, text: &str) -> Self {
        fs::write(self.config.path(store), text).unwrap();
        self
    }

    /// Enables v2-only mode.
    pub fn migrated(self) -> Self {
        self.with_store(
            Store::Metadata,
            "configMetadata:\n  featureFlags:\n    migrateToNewConfig: 'true'\n",
        )
    }

    /// Creates a client for the stores.
    pub fn client(&self) -> ConfigClient {
        ConfigClient::new(self.config.clone())
    }

    /// Reads a store file, empty if it does not exist.
    pub fn read(&self, store: Store) -> String {
        fs::read_to_string(self.config.path(store)).unwrap_or_default()
    }

    /// Reads the legacy copy file.
    pub fn read_copy(&self) -> String {
        fs::read_to_string(self.copy_path()).unwrap_or_default()
    }

    /// Path of the legacy copy file.
    pub fn copy_path(&self) -> PathBuf {
        self.config.legacy_copy_path.clone().unwrap()
    }
}
