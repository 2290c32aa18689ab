//! Fob pack CLI - build a JavaScript library in several module formats at once.
//!
//! Parses arguments, initializes logging and dispatches to the command.

use clap::Parser;
use fob_pack_cli::{cli, commands, error, logger, ui};
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);
    ui::set_quiet(args.quiet);

    let result = match args.command {
        cli::Command::Build(build_args) => commands::build_execute(build_args).await,
        cli::Command::Plan(plan_args) => commands::plan_execute(plan_args).await,
    };

    result.map_err(error::cli_error_to_miette)
}
