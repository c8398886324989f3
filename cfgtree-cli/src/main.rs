//! Main entry point for the cfgtree CLI.
//!
//! This is the command-line interface for cfgtree configuration stores.
//! It provides commands for reading and editing the client config:
//! - `get` / `set` / `unset`: Dotted-path access to the client config
//! - `edition`: Show or set the configured edition
//! - `feature`: Manage feature flags
//! - `migrated-items`: Manage the keys stored in the v2 config

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Install the stderr logger for library messages
    cfgtree::init_logger(cli.verbose, cli.quiet);

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        lock_timeout: cli.lock_timeout,
    };

    let result = match cli.command {
        cli::Command::Get(cmd) => cmd.execute(&global),
        cli::Command::Set(cmd) => cmd.execute(&global),
        cli::Command::Unset(cmd) => cmd.execute(&global),
        cli::Command::Edition(cmd) => cmd.execute(&global),
        cli::Command::Feature(cmd) => cmd.execute(&global),
        cli::Command::MigratedItems(cmd) => cmd.execute(&global),
        cli::Command::ShowPaths(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
