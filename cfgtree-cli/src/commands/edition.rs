//! Edition command implementation.
//!
//! This module implements the `edition` command, which shows or changes
//! `clientOptions.cli.edition`.

use crate::error::CliError;
use crate::utils::{open_client, GlobalOptions};
use clap::Args;

/// Show or set the configured edition.
#[derive(Args)]
pub struct EditionCommand {
    /// New edition; omit to print the current one
    #[arg(value_name = "EDITION")]
    pub value: Option<String>,
}

impl EditionCommand {
    /// Execute the edition command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let client = open_client(global)?;

        match self.value {
            None => println!("{}", client.edition()?),
            Some(value) => {
                if value.is_empty() {
                    return Err(CliError::InvalidArguments(
                        "EDITION must not be empty".to_string(),
                    ));
                }
                let changed = client.set_edition(&value)?;
                if changed && !global.quiet {
                    eprintln!("Edition set to {value}");
                }
            }
        }
        Ok(())
    }
}
