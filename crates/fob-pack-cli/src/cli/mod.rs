//! Command-line interface definition.
//!
//! - `fob-pack build` - build every (entry, format) target and write the manifest
//! - `fob-pack plan` - resolve and print the targets without building

mod commands;
pub mod enums;
mod validation;

use clap::Parser;

pub use commands::{BuildArgs, Command};
pub use enums::*;
pub use validation::{parse_global_mapping, parse_library_name};

/// Fob pack - one library, every module format
#[derive(Parser, Debug)]
#[command(
    name = "fob-pack",
    version,
    about = "Build a JavaScript library as ES module, CommonJS and UMD in one run",
    long_about = "fob-pack compiles each entry point once per requested module format,\n\
                  writes every output into one directory and records them in a manifest.\n\
                  The global (UMD) build installs the library under its name when no\n\
                  module system is present."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
