//! Feature flags and the migrated-items registry.
//!
//! Both live in the metadata store:
//!
//! ```yaml
//! configMetadata:
//!   featureFlags:
//!     migrateToNewConfig: 'true'
//!   migratedCfgItems:
//!   - contexts
//!   - currentContext
//! ```
//!
//! Every mutation holds the metadata lock for its read-modify-write cycle and
//! persists the whole metadata tree only when something changed.

use log::{debug, warn};

use crate::client::{forced, ConfigClient};
use crate::error::{Error, Result};
use crate::store::Store;
use crate::tree::{find_node, get_node, Key, Node, NodeKind};

/// Feature flag that switches all config reads and writes to the v2 store.
pub const FEATURE_MIGRATE_TO_NEW_CONFIG: &str = "migrateToNewConfig";

const KEY_CONFIG_METADATA: &str = "configMetadata";
const KEY_FEATURE_FLAGS: &str = "featureFlags";
const KEY_MIGRATED_CFG_ITEMS: &str = "migratedCfgItems";

/// A top-level config key that is stored in the v2 store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigratedItem {
    /// The top-level key.
    pub name: String,
    /// The kind of value stored under the key.
    pub kind: NodeKind,
}

impl MigratedItem {
    /// Creates an item, taking its kind from the table of known keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use cfgtree::{MigratedItem, NodeKind};
    ///
    /// assert_eq!(MigratedItem::from_name("servers").kind, NodeKind::Sequence);
    /// assert_eq!(MigratedItem::from_name("anything").kind, NodeKind::Scalar);
    /// ```
    #[must_use]
    pub fn from_name(name: impl Into<String>) -> Self {
        let name = name.into();
        let kind = match name.as_str() {
            "contexts" | "servers" => NodeKind::Sequence,
            "currentContext" | "clientOptions" => NodeKind::Mapping,
            _ => NodeKind::Scalar,
        };
        Self { name, kind }
    }

    /// Returns the lookup step for this item.
    #[must_use]
    pub fn key(&self) -> Key {
        Key::new(self.name.clone(), self.kind)
    }
}

/// The registry used while none is stored.
#[must_use]
pub fn default_migrated_items() -> Vec<MigratedItem> {
    vec![
        MigratedItem::from_name("contexts"),
        MigratedItem::from_name("currentContext"),
    ]
}

fn feature_flags_path() -> [Key; 2] {
    [
        Key::mapping(KEY_CONFIG_METADATA),
        Key::mapping(KEY_FEATURE_FLAGS),
    ]
}

fn migrated_items_path() -> [Key; 2] {
    [
        Key::mapping(KEY_CONFIG_METADATA),
        Key::sequence(KEY_MIGRATED_CFG_ITEMS),
    ]
}

/// Reads all feature flags of a metadata tree, in file order.
fn read_flags(doc: &Node) -> Result<Vec<(String, String)>> {
    let Some(flags) = get_node(doc, &feature_flags_path())? else {
        return Ok(Vec::new());
    };
    Ok(flags
        .as_mapping()
        .map(|m| {
            m.iter()
                .filter_map(|(k, v)| {
                    v.as_scalar()
                        .map(|s| (k.value().to_string(), s.value().to_string()))
                })
                .collect()
        })
        .unwrap_or_default())
}

/// Sets a flag in a metadata tree. Returns whether the tree changed.
fn write_flag(doc: &mut Node, key: &str, value: &str) -> Result<bool> {
    get_node(doc, &feature_flags_path())?;
    let flags = forced(doc, &feature_flags_path())?
        .as_mapping_mut()
        .ok_or_else(|| Error::Malformed {
            details: format!("{KEY_FEATURE_FLAGS} is not a mapping"),
        })?;
    let unchanged = flags
        .get(key)
        .and_then(Node::as_scalar)
        .is_some_and(|s| s.value() == value);
    if unchanged {
        return Ok(false);
    }
    flags.insert(key, Node::string(value));
    Ok(true)
}

/// Reads the stored registry, `None` when it is absent or empty.
fn read_items(doc: &Node) -> Result<Option<Vec<MigratedItem>>> {
    let Some(items) = get_node(doc, &migrated_items_path())? else {
        return Ok(None);
    };
    let names: Vec<MigratedItem> = items
        .as_sequence()
        .unwrap_or_default()
        .iter()
        .filter_map(|item| match item.as_scalar() {
            Some(s) if !s.is_empty() => Some(MigratedItem::from_name(s.value())),
            _ => {
                warn!("ignoring non-scalar entry in {KEY_MIGRATED_CFG_ITEMS}");
                None
            }
        })
        .collect();
    Ok((!names.is_empty()).then_some(names))
}

/// Appends registry names that are not present yet. Returns whether the tree
/// changed.
fn append_items<'n>(doc: &mut Node, names: impl IntoIterator<Item = &'n str>) -> Result<bool> {
    let items = forced(doc, &migrated_items_path())?
        .as_sequence_mut()
        .ok_or_else(|| Error::Malformed {
            details: format!("{KEY_MIGRATED_CFG_ITEMS} is not a sequence"),
        })?;

    let mut changed = false;
    for name in names {
        let exists = items
            .iter()
            .any(|item| item.as_scalar().is_some_and(|s| s.value() == name));
        if !exists {
            items.push(Node::string(name));
            changed = true;
        }
    }
    Ok(changed)
}

impl ConfigClient {
    /// Returns all feature flags in file order; empty if none are set.
    ///
    /// # Errors
    ///
    /// Returns lock, I/O and parse errors of the metadata store, or
    /// [`Error::KindMismatch`] if the flags are not stored as a mapping.
    pub fn feature_flags(&self) -> Result<Vec<(String, String)>> {
        read_flags(&self.load(Store::Metadata)?)
    }

    /// Returns the value of a feature flag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the flag is not set, plus the errors of
    /// [`ConfigClient::feature_flags`].
    pub fn feature_flag(&self, key: &str) -> Result<String> {
        self.feature_flags()?
            .into_iter()
            .find_map(|(k, v)| (k == key).then_some(v))
            .ok_or_else(|| Error::not_found(format!("feature flag {key}")))
    }

    /// Returns true if a feature flag is set to `true`, ignoring case.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigClient::feature_flag`].
    pub fn is_feature_enabled(&self, key: &str) -> Result<bool> {
        Ok(self.feature_flag(key)?.eq_ignore_ascii_case("true"))
    }

    /// Sets a feature flag. Returns whether the metadata store was written;
    /// setting a flag to its current value does nothing.
    ///
    /// # Errors
    ///
    /// Returns lock, I/O and parse errors of the metadata store.
    pub fn set_feature_flag(&self, key: &str, value: &str) -> Result<bool> {
        let _guard = self.locks().acquire(Store::Metadata)?;
        let mut doc = self.load_no_lock(Store::Metadata)?;
        if !write_flag(&mut doc, key, value)? {
            debug!("feature flag {key} already set to {value}");
            return Ok(false);
        }
        self.persist(Store::Metadata, &doc)?;
        Ok(true)
    }

    /// Removes a feature flag. Returns whether it was set.
    ///
    /// # Errors
    ///
    /// Returns lock, I/O and parse errors of the metadata store, and
    /// [`Error::KindMismatch`] if the flags are not a mapping.
    pub fn delete_feature_flag(&self, key: &str) -> Result<bool> {
        let _guard = self.locks().acquire(Store::Metadata)?;
        let mut doc = self.load_no_lock(Store::Metadata)?;
        let path = feature_flags_path();
        if get_node(&doc, &path)?.is_none() {
            return Ok(false);
        }
        let removed = find_node(&mut doc, &path, false)?
            .and_then(Node::as_mapping_mut)
            .and_then(|flags| flags.remove(key))
            .is_some();
        if removed {
            self.persist(Store::Metadata, &doc)?;
        }
        Ok(removed)
    }

    /// Returns the migrated-items registry, or [`default_migrated_items`]
    /// while none is stored.
    ///
    /// # Errors
    ///
    /// Returns lock, I/O and parse errors of the metadata store.
    pub fn migrated_items(&self) -> Result<Vec<MigratedItem>> {
        let doc = self.load(Store::Metadata)?;
        match read_items(&doc) {
            Ok(Some(items)) => Ok(items),
            Ok(None) => {
                debug!("no migrated items registered, using defaults");
                Ok(default_migrated_items())
            }
            Err(e) => {
                warn!("unreadable migrated items registry ({e}), using defaults");
                Ok(default_migrated_items())
            }
        }
    }

    /// Registers a top-level key as migrated. Returns whether the registry
    /// changed; re-adding a registered name does nothing.
    ///
    /// # Errors
    ///
    /// Returns lock, I/O and parse errors of the metadata store.
    pub fn add_migrated_item(&self, name: &str) -> Result<bool> {
        self.add_migrated_items(&[name])
    }

    /// Registers several keys at once, persisting at most once.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigClient::add_migrated_item`].
    pub fn add_migrated_items(&self, names: &[&str]) -> Result<bool> {
        let _guard = self.locks().acquire(Store::Metadata)?;
        let mut doc = self.load_no_lock(Store::Metadata)?;
        if !append_items(&mut doc, names.iter().copied())? {
            return Ok(false);
        }
        self.persist(Store::Metadata, &doc)?;
        Ok(true)
    }
}
