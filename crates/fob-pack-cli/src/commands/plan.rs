//! `fob-pack plan`: resolve the configuration and print the targets.
//!
//! Runs every check `build` runs before compiling, so a clean `plan` means
//! the build will not fail on configuration. Nothing is written.

use crate::cli::BuildArgs;
use crate::commands::utils;
use crate::config::PackConfig;
use crate::error::Result;
use crate::ui;

pub async fn execute(args: BuildArgs) -> Result<()> {
    let root = utils::resolve_root(args.cwd.as_deref())?;
    let config = PackConfig::load(&args, &root, args.config.as_deref())?;
    config.validate()?;

    let resolved = fob_pack::resolve_plan(&config.to_pack_options(&root))?;

    ui::info(&format!(
        "{} target(s), output directory {}",
        resolved.plan.len(),
        utils::display_relative(&resolved.out_dir, &root)
    ));
    ui::print_plan(&resolved.plan);

    Ok(())
}
