//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI commands,
//! including client construction and output formatting.

use crate::error::CliError;
use cfgtree::store::MAX_LOCK_TIMEOUT;
use cfgtree::{ConfigClient, StoreConfig};
use clap::ValueEnum;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the lock timeout (in seconds).
    pub lock_timeout: Option<u64>,
}

/// Output format for structured values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// YAML, as stored on disk
    #[default]
    Yaml,
    /// Pretty-printed JSON
    Json,
}

/// Resolve store locations from the environment and apply global overrides.
pub fn store_config(global: &GlobalOptions) -> Result<StoreConfig, CliError> {
    let lock_timeout = global.lock_timeout.map(lock_timeout).transpose()?;
    let config = StoreConfig::from_env()?;
    Ok(match lock_timeout {
        Some(timeout) => config.with_lock_timeout(timeout),
        None => config,
    })
}

/// Validate a `--lock-timeout` value.
pub fn lock_timeout(seconds: u64) -> Result<Duration, CliError> {
    if seconds == 0 || seconds > MAX_LOCK_TIMEOUT.as_secs() {
        return Err(CliError::InvalidArguments(format!(
            "--lock-timeout must be between 1 and {} seconds",
            MAX_LOCK_TIMEOUT.as_secs()
        )));
    }
    Ok(Duration::from_secs(seconds))
}

/// Create a client for the resolved stores.
pub fn open_client(global: &GlobalOptions) -> Result<ConfigClient, CliError> {
    Ok(ConfigClient::new(store_config(global)?))
}

/// Render a serializable value in the requested format.
///
/// The result always ends with a newline.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String, CliError> {
    let mut text = match format {
        OutputFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| CliError::Output(e.to_string()))?
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(value).map_err(|e| CliError::Output(e.to_string()))?
        }
    };
    if !text.ends_with('\n') {
        text.push('\n');
    }
    Ok(text)
}

/// Shorten a path for display.
///
/// If the path is within the home directory, show it as ~/...
/// Otherwise, show the full path.
pub fn shorten_path(path: &Path) -> String {
    if let Some(home) = home::home_dir() {
        if let Ok(relative) = path.strip_prefix(&home) {
            return format!("~/{}", relative.display());
        }
    }
    path.display().to_string()
}
