//! Feature flag commands.
//!
//! This module implements `feature list|get|set|delete` on the flags kept in
//! the metadata store.

use crate::error::CliError;
use crate::utils::{open_client, render, GlobalOptions, OutputFormat};
use clap::{Args, Subcommand};
use serde::Serialize;

/// Inspect and change feature flags.
#[derive(Args)]
pub struct FeatureCommand {
    #[command(subcommand)]
    pub action: FeatureAction,
}

/// Feature flag operations.
#[derive(Subcommand)]
pub enum FeatureAction {
    /// List all feature flags
    List {
        /// Output format (default: one `name: value` per line)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Print the value of a feature flag
    Get {
        /// Flag name
        name: String,
    },

    /// Set a feature flag
    Set {
        /// Flag name
        name: String,
        /// Flag value (e.g. true)
        value: String,
    },

    /// Delete a feature flag
    Delete {
        /// Flag name
        name: String,
    },
}

#[derive(Serialize)]
struct FlagEntry {
    name: String,
    value: String,
}

impl FeatureCommand {
    /// Execute the feature command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let client = open_client(global)?;

        match self.action {
            FeatureAction::List { format } => {
                let flags = client.feature_flags()?;
                match format {
                    None => {
                        for (name, value) in flags {
                            println!("{name}: {value}");
                        }
                    }
                    Some(format) => {
                        let entries: Vec<FlagEntry> = flags
                            .into_iter()
                            .map(|(name, value)| FlagEntry { name, value })
                            .collect();
                        print!("{}", render(&entries, format)?);
                    }
                }
            }
            FeatureAction::Get { name } => {
                println!("{}", client.feature_flag(&name)?);
            }
            FeatureAction::Set { name, value } => {
                let changed = client.set_feature_flag(&name, &value)?;
                if !global.quiet {
                    if changed {
                        eprintln!("Feature flag {name} set to {value}");
                    } else {
                        eprintln!("Feature flag {name} already set to {value}");
                    }
                }
            }
            FeatureAction::Delete { name } => {
                let removed = client.delete_feature_flag(&name)?;
                if !global.quiet && !removed {
                    eprintln!("Feature flag {name} is not set");
                }
            }
        }
        Ok(())
    }
}
