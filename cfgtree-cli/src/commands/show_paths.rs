//! Command to show the resolved store locations.

use crate::error::CliError;
use crate::utils::{render, shorten_path, store_config, GlobalOptions, OutputFormat};
use cfgtree::Store;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Show where the config stores and their locks live.
#[derive(Args)]
pub struct ShowPathsCommand {
    /// Output format (default: one `name: path` per line)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Serialize)]
struct Paths {
    legacy: PathBuf,
    v2: PathBuf,
    metadata: PathBuf,
    legacy_copy: Option<PathBuf>,
    lock_timeout_seconds: u64,
}

impl ShowPathsCommand {
    /// Execute the show-paths command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = store_config(global)?;

        if let Some(format) = self.format {
            let paths = Paths {
                legacy: config.legacy_path.clone(),
                v2: config.v2_path.clone(),
                metadata: config.metadata_path.clone(),
                legacy_copy: config.legacy_copy_path.clone(),
                lock_timeout_seconds: config.lock_timeout.as_secs(),
            };
            print!("{}", render(&paths, format)?);
            return Ok(());
        }

        for store in [Store::Legacy, Store::V2, Store::Metadata] {
            println!("{store}: {}", shorten_path(config.path(store)));
            if global.verbose {
                println!("  lock: {}", shorten_path(&config.lock_path(store)));
            }
        }
        match &config.legacy_copy_path {
            Some(path) => println!("legacy copy: {}", shorten_path(path)),
            None => println!("legacy copy: (disabled)"),
        }
        Ok(())
    }
}
