//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `get`: Print a value of the client config
//! - `set`: Set a value of the client config
//! - `unset`: Remove a value from the client config
//! - `edition`: Show or set the configured edition
//! - `feature`: Manage feature flags
//! - `migrated_items`: Manage the migrated-items registry
//! - `show_paths`: Show resolved store locations
//! - `completions`: Generate shell completion scripts

pub mod completions;
pub mod edition;
pub mod feature;
pub mod get;
pub mod migrated_items;
pub mod set;
pub mod show_paths;
pub mod unset;

pub use completions::CompletionsCommand;
pub use edition::EditionCommand;
pub use feature::FeatureCommand;
pub use get::GetCommand;
pub use migrated_items::MigratedItemsCommand;
pub use set::SetCommand;
pub use show_paths::ShowPathsCommand;
pub use unset::UnsetCommand;
