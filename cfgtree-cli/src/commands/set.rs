//! Set command implementation.

use crate::error::CliError;
use crate::utils::{open_client, GlobalOptions};
use clap::Args;

/// Set the scalar at a dotted path of the client config.
#[derive(Args)]
pub struct SetCommand {
    /// Dotted path (e.g. clientOptions.cli.edition)
    #[arg(value_name = "PATH")]
    pub path: String,

    /// New value
    #[arg(value_name = "VALUE")]
    pub value: String,
}

impl SetCommand {
    /// Execute the set command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        if self.path.split('.').all(str::is_empty) {
            return Err(CliError::InvalidArguments(
                "PATH must name at least one key".to_string(),
            ));
        }

        let client = open_client(global)?;
        let changed = client.set_value(&self.path, &self.value)?;

        if !global.quiet {
            if changed {
                eprintln!("Set {} = {}", self.path, self.value);
            } else {
                eprintln!("{} already set to {}", self.path, self.value);
            }
        }
        Ok(())
    }
}
