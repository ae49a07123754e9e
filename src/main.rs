//! featurescript CLI entry point
//!
//! Parses arguments, runs the selected command and renders failures through
//! [`user_friendly_error`] before exiting with status 1.

use clap::Parser;
use featurescript::cli;
use featurescript::core::user_friendly_error;

fn main() {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    if let Err(e) = cli.execute() {
        user_friendly_error(e).display();
        std::process::exit(1);
    }
}
