//! `fob-pack build`.

use crate::cli::BuildArgs;
use crate::commands::utils;
use crate::config::PackConfig;
use crate::error::Result;
use crate::ui;
use fob_pack::{BuildError, RolldownCompiler};
use std::sync::Arc;
use std::time::Instant;

/// Execute the build command.
///
/// # Build Process
///
/// 1. Load and validate configuration (CLI > Env > File > Defaults)
/// 2. Resolve the plan, so configuration errors surface before anything is touched
/// 3. Clean the output directory if requested
/// 4. Compile and write every target, then the manifest
/// 5. Display the build summary
pub async fn execute(args: BuildArgs) -> Result<()> {
    let start_time = Instant::now();

    let root = utils::resolve_root(args.cwd.as_deref())?;
    let config = PackConfig::load(&args, &root, args.config.as_deref())?;
    config.validate()?;

    let options = config.to_pack_options(&root);
    let resolved = fob_pack::resolve_plan(&options)?;

    ui::info(&format!(
        "Building {} target(s) into {}",
        resolved.plan.len(),
        utils::display_relative(&resolved.out_dir, &root)
    ));

    if config.clean {
        ui::info(&format!(
            "Cleaning output directory: {}",
            utils::display_relative(&resolved.out_dir, &root)
        ));
        utils::clean_output_dir(&resolved.out_dir, &root)?;
    }

    let total = resolved.plan.len();
    let report = match fob_pack::build(options, Arc::new(RolldownCompiler::new())).await {
        Ok(report) => report,
        Err(err) => {
            if let BuildError::Emission { failures } = &err {
                let finished = total.saturating_sub(failures.len());
                if finished > 0 {
                    ui::warning(&format!(
                        "{finished} of {total} target(s) were written, but no manifest was produced"
                    ));
                }
            }
            return Err(err.into());
        }
    };

    ui::print_build_summary(&report.artifacts);
    ui::success(&format!(
        "Built {} file(s) in {}, manifest at {}",
        report.artifacts.len(),
        ui::format_duration(start_time.elapsed()),
        utils::display_relative(&report.manifest_path, &root)
    ));

    Ok(())
}
