//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    CompletionsCommand, EditionCommand, FeatureCommand, GetCommand, MigratedItemsCommand,
    SetCommand, ShowPathsCommand, UnsetCommand,
};
use clap::{Parser, Subcommand};

/// Command-line tool for inspecting and editing cfgtree configuration stores.
///
/// Store locations come from CFGTREE_CONFIG, CFGTREE_CONFIG_V2,
/// CFGTREE_CONFIG_METADATA and CFGTREE_LEGACY_CONFIG.
#[derive(Parser)]
#[command(name = "cfgtree")]
#[command(version, about = "Inspect and edit cfgtree configuration stores", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the store lock timeout (in seconds)
    #[arg(long, value_name = "SECONDS", global = true)]
    pub lock_timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Print a value of the client config
    Get(GetCommand),

    /// Set a value of the client config
    Set(SetCommand),

    /// Remove a value from the client config
    Unset(UnsetCommand),

    /// Show or set the configured edition
    Edition(EditionCommand),

    /// Manage feature flags
    Feature(FeatureCommand),

    /// Manage the keys stored in the v2 config
    MigratedItems(MigratedItemsCommand),

    /// Show resolved store locations
    ShowPaths(ShowPathsCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
