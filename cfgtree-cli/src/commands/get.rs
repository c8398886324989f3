//! Get command implementation.
//!
//! This module implements the `get` command, which prints a value or subtree
//! of the effective client config.

use crate::error::CliError;
use crate::utils::{open_client, render, GlobalOptions, OutputFormat};
use cfgtree::Node;
use clap::Args;

/// Print the value at a dotted path of the client config.
#[derive(Args)]
pub struct GetCommand {
    /// Dotted path (e.g. clientOptions.cli.edition); omit for the whole config
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,
}

impl GetCommand {
    /// Execute the get command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let client = open_client(global)?;
        let node = client.get_value(self.path.as_deref().unwrap_or_default())?;

        // Scalars print bare so the output can be used in scripts
        match (&node, self.format) {
            (Node::Scalar(scalar), OutputFormat::Yaml) => println!("{scalar}"),
            _ => print!("{}", render(&node, self.format)?),
        }
        Ok(())
    }
}
