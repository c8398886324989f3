//! Environment variable handling for store locations.
//!
//! This module provides support for CFGTREE_* environment variables that
//! override the default store paths and lock timeout.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use super::config::{
    default_legacy_copy_path, default_local_dir, StoreConfig, CONFIG_FILE_NAME,
    CONFIG_V2_FILE_NAME, MAX_LOCK_TIMEOUT, METADATA_FILE_NAME,
};
use crate::error::{Error, Result};

/// Overrides the legacy config path.
pub const ENV_CONFIG: &str = "CFGTREE_CONFIG";
/// Overrides the v2 config path.
pub const ENV_CONFIG_V2: &str = "CFGTREE_CONFIG_V2";
/// Overrides the metadata path.
pub const ENV_CONFIG_METADATA: &str = "CFGTREE_CONFIG_METADATA";
/// Overrides the full legacy-format copy location; an empty value disables it.
pub const ENV_LEGACY_CONFIG: &str = "CFGTREE_LEGACY_CONFIG";
/// Overrides the lock timeout, in seconds.
pub const ENV_LOCK_TIMEOUT_SECONDS: &str = "CFGTREE_LOCK_TIMEOUT_SECONDS";

/// Resolves a [`StoreConfig`] from CFGTREE_* environment variables.
///
/// # Examples
///
/// ```no_run
/// use cfgtree::store::EnvironmentConfig;
///
/// let config = EnvironmentConfig::resolve().unwrap();
/// println!("legacy config: {}", config.legacy_path.display());
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Resolve store locations from the process environment.
    ///
    /// Paths that are not overridden fall back to `~/.config/cfgtree`.
    ///
    /// # Errors
    ///
    /// Returns an error if a default path is needed but the home directory
    /// cannot be determined, or if the lock timeout is not a positive integer.
    pub fn resolve() -> Result<StoreConfig> {
        Self::resolve_with(|key| env::var(key).ok())
    }

    /// Resolve store locations using `lookup` in place of the environment.
    ///
    /// # Errors
    ///
    /// Same as [`EnvironmentConfig::resolve`].
    pub fn resolve_with(lookup: impl Fn(&str) -> Option<String>) -> Result<StoreConfig> {
        let path_or_default = |key: &str, file_name: &str| -> Result<PathBuf> {
            match lookup(key) {
                Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
                _ => Ok(default_local_dir()?.join(file_name)),
            }
        };

        let legacy_copy_path = match lookup(ENV_LEGACY_CONFIG) {
            Some(path) if path.is_empty() => None,
            Some(path) => Some(PathBuf::from(path)),
            None => default_legacy_copy_path().ok(),
        };

        let mut config = StoreConfig {
            legacy_path: path_or_default(ENV_CONFIG, CONFIG_FILE_NAME)?,
            v2_path: path_or_default(ENV_CONFIG_V2, CONFIG_V2_FILE_NAME)?,
            metadata_path: path_or_default(ENV_CONFIG_METADATA, METADATA_FILE_NAME)?,
            legacy_copy_path,
            lock_timeout: super::config::DEFAULT_LOCK_TIMEOUT,
        };

        if let Some(seconds) = lookup(ENV_LOCK_TIMEOUT_SECONDS) {
            config.lock_timeout = Self::parse_timeout(ENV_LOCK_TIMEOUT_SECONDS, &seconds)?;
        }

        Ok(config)
    }

    fn parse_timeout(field: &str, value: &str) -> Result<Duration> {
        match value.trim().parse::<u64>() {
            Ok(seconds) if seconds > 0 && seconds <= MAX_LOCK_TIMEOUT.as_secs() => {
                Ok(Duration::from_secs(seconds))
            }
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "Must be a positive integer no greater than {}",
                    MAX_LOCK_TIMEOUT.as_secs()
                ),
            }),
        }
    }
}

impl StoreConfig {
    /// Resolves store locations from the environment.
    ///
    /// See [`EnvironmentConfig::resolve`].
    ///
    /// # Errors
    ///
    /// Same as [`EnvironmentConfig::resolve`].
    pub fn from_env() -> Result<Self> {
        EnvironmentConfig::resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_overrides_replace_all_paths() {
        let config = EnvironmentConfig::resolve_with(lookup_from(&[
            (ENV_CONFIG, "/a/config.yaml"),
            (ENV_CONFIG_V2, "/b/config-v2.yaml"),
            (ENV_CONFIG_METADATA, "/c/meta.yaml"),
            (ENV_LEGACY_CONFIG, "/d/config.yaml"),
        ]))
        .unwrap();

        assert_eq!(config.legacy_path, PathBuf::from("/a/config.yaml"));
        assert_eq!(config.v2_path, PathBuf::from("/b/config-v2.yaml"));
        assert_eq!(config.metadata_path, PathBuf::from("/c/meta.yaml"));
        assert_eq!(config.legacy_copy_path, Some(PathBuf::from("/d/config.yaml")));
    }

    #[test]
    fn test_empty_legacy_copy_disables_it() {
        let config = EnvironmentConfig::resolve_with(lookup_from(&[
            (ENV_CONFIG, "/a/config.yaml"),
            (ENV_CONFIG_V2, "/a/config-v2.yaml"),
            (ENV_CONFIG_METADATA, "/a/meta.yaml"),
            (ENV_LEGACY_CONFIG, ""),
        ]))
        .unwrap();
        assert!(config.legacy_copy_path.is_none());
    }

    #[test]
    fn test_defaults_use_local_dir() {
        // Requires a resolvable home directory
        if default_local_dir().is_err() {
            return;
        }
        let config = EnvironmentConfig::resolve_with(|_| None).unwrap();
        assert!(config.legacy_path.ends_with(".config/cfgtree/config.yaml"));
        assert!(config.v2_path.ends_with(".config/cfgtree/config-v2.yaml"));
        assert!(config
            .metadata_path
            .ends_with(".config/cfgtree/.config-metadata.yaml"));
        assert!(config
            .legacy_copy_path
            .unwrap()
            .ends_with(".cfgtree/config.yaml"));
    }

    #[test]
    fn test_lock_timeout_override() {
        let config = EnvironmentConfig::resolve_with(lookup_from(&[
            (ENV_CONFIG, "/a/config.yaml"),
            (ENV_CONFIG_V2, "/a/config-v2.yaml"),
            (ENV_CONFIG_METADATA, "/a/meta.yaml"),
            (ENV_LOCK_TIMEOUT_SECONDS, "30"),
        ]))
        .unwrap();
        assert_eq!(config.lock_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_lock_timeout_upper_bound_accepted() {
        let config = EnvironmentConfig::resolve_with(lookup_from(&[
            (ENV_CONFIG, "/a/config.yaml"),
            (ENV_CONFIG_V2, "/a/config-v2.yaml"),
            (ENV_CONFIG_METADATA, "/a/meta.yaml"),
            (ENV_LOCK_TIMEOUT_SECONDS, "604800"),
        ]))
        .unwrap();
        assert_eq!(config.lock_timeout, MAX_LOCK_TIMEOUT);
    }

    #[test]
    fn test_lock_timeout_invalid() {
        for bad in ["0", "-1", "soon", "", "604801", "18446744073709551615"] {
            let result = EnvironmentConfig::resolve_with(lookup_from(&[
                (ENV_CONFIG, "/a/config.yaml"),
                (ENV_CONFIG_V2, "/a/config-v2.yaml"),
                (ENV_CONFIG_METADATA, "/a/meta.yaml"),
                (ENV_LOCK_TIMEOUT_SECONDS, bad),
            ]));
            assert!(
                matches!(result, Err(Error::Validation { .. })),
                "value {bad:?} should be rejected"
            );
        }
    }
}
