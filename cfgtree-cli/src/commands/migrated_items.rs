//! Migrated-items registry commands.

use crate::error::CliError;
use crate::utils::{open_client, render, GlobalOptions, OutputFormat};
use clap::{Args, Subcommand};
use serde::Serialize;

/// Inspect and extend the list of keys stored in the v2 config.
#[derive(Args)]
pub struct MigratedItemsCommand {
    #[command(subcommand)]
    pub action: MigratedItemsAction,
}

/// Registry operations.
#[derive(Subcommand)]
pub enum MigratedItemsAction {
    /// List migrated keys (the defaults while none are registered)
    List {
        /// Output format (default: one `name (kind)` per line)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Register top-level keys as migrated
    Add {
        /// Top-level key names
        #[arg(required = true)]
        names: Vec<String>,
    },
}

#[derive(Serialize)]
struct ItemEntry {
    name: String,
    kind: String,
}

impl MigratedItemsCommand {
    /// Execute the migrated-items command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let client = open_client(global)?;

        match self.action {
            MigratedItemsAction::List { format } => {
                let items = client.migrated_items()?;
                match format {
                    None => {
                        for item in items {
                            println!("{} ({})", item.name, item.kind);
                        }
                    }
                    Some(format) => {
                        let entries: Vec<ItemEntry> = items
                            .into_iter()
                            .map(|item| ItemEntry {
                                kind: item.kind.to_string(),
                                name: item.name,
                            })
                            .collect();
                        print!("{}", render(&entries, format)?);
                    }
                }
            }
            MigratedItemsAction::Add { names } => {
                if names.iter().any(|n| n.is_empty() || n.contains('.')) {
                    return Err(CliError::InvalidArguments(
                        "migrated items must be non-empty top-level key names".to_string(),
                    ));
                }
                let names: Vec<&str> = names.iter().map(String::as_str).collect();
                let changed = client.add_migrated_items(&names)?;
                if !global.quiet && !changed {
                    eprintln!("All items are already registered");
                }
            }
        }
        Ok(())
    }
}
