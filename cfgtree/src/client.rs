//! Config store access and legacy/v2 migration.
//!
//! [`ConfigClient`] owns the store locations and their locks. Which physical
//! store backs a read or write depends on the `migrateToNewConfig` feature
//! flag held in the metadata store:
//!
//! - flag enabled: the v2 store is used exclusively
//! - flag disabled (or unreadable): reads return the legacy tree merged into
//!   the v2 tree, and writes are split so that every migrated item lands in
//!   the v2 store while everything else stays in the legacy store
//!
//! The merged view is computed from disk on every read and never cached.

use log::{debug, info};

use crate::error::{Error, Result};
use crate::lock::LockManager;
use crate::metadata::FEATURE_MIGRATE_TO_NEW_CONFIG;
use crate::store::{load_tree, persist_tree, Store, StoreConfig};
use crate::tree::{concat, find_node, get_node, Key, Node};

/// Entry point for reading and writing configuration trees.
///
/// # Examples
///
/// ```no_run
/// use cfgtree::{ConfigClient, StoreConfig};
///
/// let client = ConfigClient::new(StoreConfig::in_dir("/tmp/cfgtree"));
/// client.set_value("clientOptions.cli.edition", "tkg").unwrap();
/// assert_eq!(client.edition().unwrap(), "tkg");
/// ```
#[derive(Debug)]
pub struct ConfigClient {
    config: StoreConfig,
    locks: LockManager,
}

impl ConfigClient {
    /// Creates a client for the stores described by `config`.
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        let locks = LockManager::new(&config);
        Self { config, locks }
    }

    /// Creates a client for the stores resolved from CFGTREE_* variables.
    ///
    /// # Errors
    ///
    /// See [`StoreConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(StoreConfig::from_env()?))
    }

    /// Returns the store configuration.
    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns the store locks.
    #[must_use]
    pub const fn locks(&self) -> &LockManager {
        &self.locks
    }

    /// Loads the tree of `store` while holding its lock.
    ///
    /// # Errors
    ///
    /// Returns lock, I/O and parse errors; see [`load_tree`].
    pub fn load(&self, store: Store) -> Result<Node> {
        let _guard = self.locks.acquire(store)?;
        self.load_no_lock(store)
    }

    /// Loads the tree of `store` without locking.
    ///
    /// For callers that already hold the store lock.
    ///
    /// # Errors
    ///
    /// See [`load_tree`].
    pub fn load_no_lock(&self, store: Store) -> Result<Node> {
        load_tree(self.config.path(store))
    }

    /// Overwrites the file of `store` with `node`. The caller must hold the
    /// store lock.
    ///
    /// # Errors
    ///
    /// See [`persist_tree`].
    pub fn persist(&self, store: Store, node: &Node) -> Result<()> {
        persist_tree(self.config.path(store), node)
    }

    /// Returns true if reads and writes address the v2 store only.
    ///
    /// Any failure to read the flag counts as "not migrating".
    #[must_use]
    pub fn should_migrate(&self) -> bool {
        self.is_feature_enabled(FEATURE_MIGRATE_TO_NEW_CONFIG)
            .unwrap_or_else(|e| {
                debug!("{FEATURE_MIGRATE_TO_NEW_CONFIG} unavailable ({e}), using legacy layout");
                false
            })
    }

    /// Returns the effective client config, holding the config locks while
    /// reading.
    ///
    /// # Errors
    ///
    /// Returns lock, I/O, parse and merge errors.
    pub fn client_config(&self) -> Result<Node> {
        let migrate = self.should_migrate();
        let _locks = self.locks.acquire_config(migrate)?;
        self.effective_config(migrate)
    }

    /// Returns the effective client config without locking.
    ///
    /// # Errors
    ///
    /// Returns I/O, parse and merge errors.
    pub fn client_config_no_lock(&self) -> Result<Node> {
        self.effective_config(self.should_migrate())
    }

    /// Persists a modified client config. The caller must hold the config
    /// locks (see [`LockManager::acquire_config`]); [`ConfigClient::update`]
    /// does this automatically.
    ///
    /// # Errors
    ///
    /// Returns I/O, lock (for the metadata read) and locator errors.
    pub fn persist_config(&self, node: &Node) -> Result<()> {
        self.persist_config_as(node, self.should_migrate())
    }

    /// Runs one locked read-modify-write cycle on the effective client config.
    ///
    /// `mutate` returns whether it changed the tree; the tree is persisted
    /// only in that case. Returns whether a persist happened.
    ///
    /// # Errors
    ///
    /// Returns errors from locking, loading, `mutate` and persisting.
    pub fn update<F>(&self, mutate: F) -> Result<bool>
    where
        F: FnOnce(&mut Node) -> Result<bool>,
    {
        let migrate = self.should_migrate();
        let _locks = self.locks.acquire_config(migrate)?;
        let mut node = self.effective_config(migrate)?;
        if !mutate(&mut node)? {
            return Ok(false);
        }
        self.persist_config_as(&node, migrate)?;
        Ok(true)
    }

    /// Returns the subtree at a dotted path of the effective client config.
    /// An empty path returns the whole tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the path does not exist, plus any
    /// error of [`ConfigClient::client_config`].
    pub fn get_value(&self, dotted: &str) -> Result<Node> {
        let doc = self.client_config()?;
        let keys = Key::path(dotted);
        let Some((last, parents)) = keys.split_last() else {
            return Ok(doc);
        };
        let parent = get_node(&doc, parents)?
            .and_then(Node::as_mapping)
            .ok_or_else(|| Error::not_found(dotted))?;
        parent
            .get(&last.name)
            .cloned()
            .ok_or_else(|| Error::not_found(dotted))
    }

    /// Sets the scalar at a dotted path, creating intermediate mappings.
    /// Returns whether the config changed.
    ///
    /// Mappings and sequences already on the path are never overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty path and
    /// [`Error::KindMismatch`] if a value on the path has another kind, plus
    /// any error of [`ConfigClient::update`].
    pub fn set_value(&self, dotted: &str, value: &str) -> Result<bool> {
        let keys = Key::path(dotted);
        if keys.is_empty() {
            return Err(empty_path());
        }
        self.update(|root| {
            // Null values may be replaced; any other kind is kept.
            get_node(root, &keys)?;
            let scalar = forced(root, &keys)?
                .as_scalar_mut()
                .ok_or_else(|| Error::Malformed {
                    details: format!("{dotted} is not a scalar"),
                })?;
            if scalar.value() == value {
                return Ok(false);
            }
            scalar.set_value(value);
            Ok(true)
        })
    }

    /// Removes the entry at a dotted path. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty path, plus any error of
    /// [`ConfigClient::update`].
    pub fn unset_value(&self, dotted: &str) -> Result<bool> {
        let keys = Key::path(dotted);
        let Some((last, parents)) = keys.split_last() else {
            return Err(empty_path());
        };
        self.update(|root| {
            let Some(parent) = find_node(root, parents, false)? else {
                return Ok(false);
            };
            Ok(parent
                .as_mapping_mut()
                .and_then(|m| m.remove(&last.name))
                .is_some())
        })
    }

    fn effective_config(&self, migrate: bool) -> Result<Node> {
        if migrate {
            return self.load_no_lock(Store::V2);
        }
        let legacy = self.load_no_lock(Store::Legacy)?;
        let mut v2 = self.load_no_lock(Store::V2)?;
        concat(&legacy, &mut v2)?;
        Ok(v2)
    }

    fn persist_config_as(&self, node: &Node, migrate: bool) -> Result<()> {
        if migrate {
            return self.persist(Store::V2, node);
        }

        let mut legacy = self.load_no_lock(Store::Legacy)?;
        let mut v2 = self.load_no_lock(Store::V2)?;
        let mut remainder = node.clone();

        let items = self.migrated_items()?;
        for item in &items {
            let key = [item.key()];
            let updated = forced(&mut remainder, &key)?.clone();
            let prior = forced(&mut legacy, &key)?.clone();
            *forced(&mut v2, &key)? = updated;
            *forced(&mut remainder, &key)? = prior;
        }

        self.persist(Store::Legacy, &remainder)?;
        self.persist(Store::V2, &v2)?;
        self.persist_legacy_copy(node)?;
        info!(
            "persisted config split across {} and {} ({} migrated items)",
            self.config.legacy_path.display(),
            self.config.v2_path.display(),
            items.len()
        );
        Ok(())
    }

    /// Writes the full, unsplit config to the legacy copy location, if any.
    ///
    /// # Errors
    ///
    /// See [`persist_tree`].
    pub fn persist_legacy_copy(&self, node: &Node) -> Result<()> {
        match &self.config.legacy_copy_path {
            Some(path) => persist_tree(path, node),
            None => Ok(()),
        }
    }
}

// Force-creating lookups only fail on malformed roots.
pub(crate) fn forced<'a>(root: &'a mut Node, keys: &[Key]) -> Result<&'a mut Node> {
    find_node(root, keys, true)?.ok_or_else(|| Error::Malformed {
        details: "force-created lookup returned no node".to_string(),
    })
}

fn empty_path() -> Error {
    Error::Validation {
        field: "path".into(),
        message: "must name at least one key".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup(legacy: &str, v2: &str, metadata: &str) -> (TempDir, ConfigClient) {
        let temp_dir = TempDir::new().unwrap();
        let config = StoreConfig::in_dir(temp_dir.path())
            .with_legacy_copy_path(temp_dir.path().join("old").join("config.yaml"));
        fs::write(&config.legacy_path, legacy).unwrap();
        fs::write(&config.v2_path, v2).unwrap();
        fs::write(&config.metadata_path, metadata).unwrap();
        (temp_dir, ConfigClient::new(config))
    }

    fn read(client: &ConfigClient, store: Store) -> String {
        fs::read_to_string(client.config().path(store)).unwrap()
    }

    #[test]
    fn test_merged_view_prefers_v2() {
        let (_dir, client) = setup(
            "kind: ClientConfig\ncurrentContext:\n  k8s: old\n",
            "currentContext:\n  k8s: new\n",
            "",
        );
        let doc = client.client_config().unwrap();
        assert_eq!(
            doc.to_yaml_string().unwrap(),
            "currentContext:\n  k8s: new\nkind: ClientConfig\n"
        );
        assert_eq!(client.client_config_no_lock().unwrap(), doc);
    }

    #[test]
    fn test_v2_only_when_migrating() {
        let (_dir, client) = setup(
            "kind: ClientConfig\n",
            "contexts: []\n",
            "configMetadata:\n  featureFlags:\n    migrateToNewConfig: 'true'\n",
        );
        assert!(client.should_migrate());
        let doc = client.client_config().unwrap();
        assert_eq!(doc.to_yaml_string().unwrap(), "contexts: []\n");
    }

    #[test]
    fn test_unreadable_metadata_means_legacy_layout() {
        let (_dir, client) = setup("", "", "invalid: yaml: syntax:");
        assert!(!client.should_migrate());
    }

    #[test]
    fn test_split_moves_migrated_items_to_v2() {
        let (_dir, client) = setup(
            "kind: ClientConfig\ncontexts:\n- name: legacy\n",
            "",
            "",
        );

        let changed = client
            .update(|root| {
                let current = forced(root, &[Key::mapping("currentContext")])?;
                current
                    .as_mapping_mut()
                    .unwrap()
                    .insert("k8s", Node::string("new-ctx"));
                Ok(true)
            })
            .unwrap();
        assert!(changed);

        assert_eq!(
            read(&client, Store::V2),
            "contexts:\n- name: legacy\ncurrentContext:\n  k8s: new-ctx\n"
        );
        // The legacy store keeps its own prior values for migrated items
        assert_eq!(
            read(&client, Store::Legacy),
            "kind: ClientConfig\ncontexts:\n- name: legacy\ncurrentContext: {}\n"
        );
        // The compatibility copy holds the full, unsplit tree
        let copy = fs::read_to_string(client.config().legacy_copy_path.as_ref().unwrap()).unwrap();
        assert_eq!(
            copy,
            "kind: ClientConfig\ncontexts:\n- name: legacy\ncurrentContext:\n  k8s: new-ctx\n"
        );
    }

    #[test]
    fn test_update_without_change_does_not_persist() {
        let (_dir, client) = setup("# keep me\nkind: ClientConfig\n", "", "");
        let changed = client.update(|_| Ok(false)).unwrap();
        assert!(!changed);
        assert_eq!(read(&client, Store::Legacy), "# keep me\nkind: ClientConfig\n");
    }

    #[test]
    fn test_set_get_unset_value() {
        let (_dir, client) = setup("", "", "");

        assert!(client.set_value("clientOptions.cli.edition", "tkg").unwrap());
        assert!(!client.set_value("clientOptions.cli.edition", "tkg").unwrap());

        let value = client.get_value("clientOptions.cli.edition").unwrap();
        assert_eq!(value.as_scalar().unwrap().value(), "tkg");

        assert!(client.unset_value("clientOptions.cli.edition").unwrap());
        assert!(!client.unset_value("clientOptions.cli.edition").unwrap());
        assert!(client
            .get_value("clientOptions.cli.edition")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_set_value_keeps_non_scalar_values() {
        let v2 = "contexts:\n- name: a\n- name: b\n";
        let (_dir, client) = setup("clientOptions:\n  cli:\n    edition: tkg\n", v2, "");

        let err = client.set_value("contexts", "x").unwrap_err();
        assert!(matches!(err, Error::KindMismatch { ref key, .. } if key == "contexts"));
        let err = client
            .set_value("clientOptions.cli.edition.flavor", "x")
            .unwrap_err();
        assert!(matches!(err, Error::KindMismatch { ref key, .. } if key == "edition"));

        // Nothing was persisted
        assert_eq!(read(&client, Store::V2), v2);
        assert_eq!(client.edition().unwrap(), "tkg");
    }

    #[test]
    fn test_set_value_replaces_null() {
        let (_dir, client) = setup("clientOptions: ~\n", "", "");
        assert!(client.set_value("clientOptions.cli.edition", "tkg").unwrap());
        assert_eq!(client.edition().unwrap(), "tkg");
    }

    #[test]
    fn test_empty_path_is_rejected_for_writes() {
        let (_dir, client) = setup("", "", "");
        assert!(matches!(
            client.set_value("", "x"),
            Err(Error::Validation { .. })
        ));
        assert!(matches!(client.unset_value("."), Err(Error::Validation { .. })));
    }

    #[test]
    fn test_corrupt_store_is_an_error() {
        let (_dir, client) = setup("invalid: yaml: syntax:", "", "");
        assert!(client.client_config().unwrap_err().is_malformed());
        assert!(client.set_value("a", "b").unwrap_err().is_malformed());
    }
}
