//! Common test utilities for CLI integration tests.
//!
//! This module provides an isolated store directory and a command builder
//! that points every CFGTREE_* location into it.

use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test environment with isolated store files.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Legacy config path
    pub legacy: PathBuf,
    /// V2 config path
    pub v2: PathBuf,
    /// Metadata path
    pub metadata: PathBuf,
    /// Legacy copy path
    pub copy: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment. No store files exist yet.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let dir = temp_dir.path().join("stores");
        Self {
            legacy: dir.join("config.yaml"),
            v2: dir.join("config-v2.yaml"),
            metadata: dir.join(".config-metadata.yaml"),
            copy: temp_dir.path().join("compat").join("config.yaml"),
            temp_dir,
        }
    }

    /// Get a command builder with all store locations configured.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("cfgtree").expect("Failed to find cfgtree binary");
        cmd.env("CFGTREE_CONFIG", &self.legacy)
            .env("CFGTREE_CONFIG_V2", &self.v2)
            .env("CFGTREE_CONFIG_METADATA", &self.metadata)
            .env("CFGTREE_LEGACY_CONFIG", &self.copy)
            .env_remove("CFGTREE_LOCK_TIMEOUT_SECONDS")
            .env_remove("CFGTREE_LOG_MODE");
        cmd
    }

    /// Write a store file, creating its directory.
    pub fn write(&self, path: &PathBuf, text: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    /// Read a store file, empty if it does not exist.
    pub fn read(&self, path: &PathBuf) -> String {
        fs::read_to_string(path).unwrap_or_default()
    }
}
