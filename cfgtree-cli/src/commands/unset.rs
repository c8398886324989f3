//! Unset command implementation.

use crate::error::CliError;
use crate::utils::{open_client, GlobalOptions};
use clap::Args;

/// Remove the entry at a dotted path of the client config.
#[derive(Args)]
pub struct UnsetCommand {
    /// Dotted path (e.g. clientOptions.cli.edition)
    #[arg(value_name = "PATH")]
    pub path: String,
}

impl UnsetCommand {
    /// Execute the unset command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        if self.path.split('.').all(str::is_empty) {
            return Err(CliError::InvalidArguments(
                "PATH must name at least one key".to_string(),
            ));
        }

        let client = open_client(global)?;
        let removed = client.unset_value(&self.path)?;

        if !global.quiet {
            if removed {
                eprintln!("Removed {}", self.path);
            } else {
                eprintln!("{} is not set", self.path);
            }
        }
        Ok(())
    }
}
