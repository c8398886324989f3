//! Typed accessors for `clientOptions.cli`.

use serde::Deserialize;

use crate::client::ConfigClient;
use crate::error::{Error, Result};
use crate::tree::{get_node, Key};

const CLI_OPTIONS_PATH: &str = "clientOptions.cli";

/// The `clientOptions.cli` section of the client config.
///
/// Unknown keys are ignored; unset or empty values are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CliOptions {
    /// Product edition the CLI operates as.
    pub edition: Option<String>,
    /// Repository holding bill-of-materials images.
    pub bom_repo: Option<String>,
    /// Path of the compatibility file inside the BOM repository.
    pub compatibility_file_path: Option<String>,
    /// Version selector for unstable releases.
    pub unstable_version_selector: Option<String>,
}

impl ConfigClient {
    /// Returns the `clientOptions.cli` section of the effective config.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`ConfigClient::client_config`], plus
    /// [`Error::Yaml`] if a value cannot be read as a string.
    pub fn cli_options(&self) -> Result<CliOptions> {
        let doc = self.client_config()?;
        let keys: Vec<Key> = CLI_OPTIONS_PATH.split('.').map(Key::mapping).collect();
        match get_node(&doc, &keys)? {
            Some(node) => node.to_typed(),
            None => Ok(CliOptions::default()),
        }
    }

    /// Returns the configured edition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no edition is set.
    pub fn edition(&self) -> Result<String> {
        required("edition", self.cli_options()?.edition)
    }

    /// Sets the edition. Returns whether the config changed.
    ///
    /// # Errors
    ///
    /// See [`ConfigClient::update`].
    pub fn set_edition(&self, value: &str) -> Result<bool> {
        self.set_cli_option("edition", value)
    }

    /// Returns the BOM repository.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if none is set.
    pub fn bom_repo(&self) -> Result<String> {
        required("bomRepo", self.cli_options()?.bom_repo)
    }

    /// Sets the BOM repository. Returns whether the config changed.
    ///
    /// # Errors
    ///
    /// See [`ConfigClient::update`].
    pub fn set_bom_repo(&self, value: &str) -> Result<bool> {
        self.set_cli_option("bomRepo", value)
    }

    /// Returns the compatibility file path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if none is set.
    pub fn compatibility_file_path(&self) -> Result<String> {
        required(
            "compatibilityFilePath",
            self.cli_options()?.compatibility_file_path,
        )
    }

    /// Sets the compatibility file path. Returns whether the config changed.
    ///
    /// # Errors
    ///
    /// See [`ConfigClient::update`].
    pub fn set_compatibility_file_path(&self, value: &str) -> Result<bool> {
        self.set_cli_option("compatibilityFilePath", value)
    }

    /// Returns the unstable version selector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if none is set.
    pub fn unstable_version_selector(&self) -> Result<String> {
        required(
            "unstableVersionSelector",
            self.cli_options()?.unstable_version_selector,
        )
    }

    /// Sets the unstable version selector. Returns whether the config changed.
    ///
    /// # Errors
    ///
    /// See [`ConfigClient::update`].
    pub fn set_unstable_version_selector(&self, value: &str) -> Result<bool> {
        self.set_cli_option("unstableVersionSelector", value)
    }

    fn set_cli_option(&self, key: &str, value: &str) -> Result<bool> {
        self.set_value(&format!("{CLI_OPTIONS_PATH}.{key}"), value)
    }
}

fn required(key: &str, value: Option<String>) -> Result<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::not_found(format!("{CLI_OPTIONS_PATH}.{key}")))
}
