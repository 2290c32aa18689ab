//! The packaging pipeline: resolve, plan, emit, record.
//!
//! Stages run strictly forward. Configuration problems surface before the
//! compiler is called or anything is written; a failed target prevents the
//! manifest from being written.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, info_span, Instrument};

use crate::compiler::Compiler;
use crate::emit::{EmissionCoordinator, EmitSettings};
use crate::entry;
use crate::error::{BuildError, ConfigError, Result};
use crate::manifest::{Manifest, ManifestWriter};
use crate::options::PackOptions;
use crate::output::Artifact;
use crate::plan::{self, BuildPlan};

/// Outcome of a successful build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub manifest: Manifest,
    /// Artifacts in plan order.
    pub artifacts: Vec<Artifact>,
    /// Absolute path of the written manifest.
    pub manifest_path: PathBuf,
    pub out_dir: PathBuf,
    pub duration: Duration,
}

/// A validated plan together with the paths it was resolved against.
#[derive(Debug, Clone)]
pub struct ResolvedPlan {
    pub plan: BuildPlan,
    pub root: PathBuf,
    pub out_dir: PathBuf,
}

/// Validate options, resolve entries and build the plan. Writes nothing.
pub fn resolve_plan(options: &PackOptions) -> Result<ResolvedPlan> {
    options.validate()?;
    let identity = options.identity()?;

    let root = options.resolved_root().map_err(|e| ConfigError::InvalidOption {
        option: "root".to_string(),
        reason: format!("cannot determine project root: {e}"),
    })?;
    let out_dir = options.resolved_out_dir(&root);

    let entries = entry::resolve(&options.entry, &root, identity.as_ref())?;
    let plan = plan::build_plan(
        &entries,
        &options.resolved_formats(),
        identity.as_ref(),
        &options.resolved_file_name(),
        &options.manifest,
    )?;

    debug!(
        root = %root.display(),
        out_dir = %out_dir.display(),
        targets = plan.len(),
        "resolved plan"
    );

    Ok(ResolvedPlan {
        plan,
        root,
        out_dir,
    })
}

/// Run a full build with the given compiler.
///
/// # Errors
///
/// - [`BuildError::Config`] before anything is compiled or written
/// - [`BuildError::Emission`] if any target failed; no manifest is written
/// - [`BuildError::ManifestIo`] if the manifest could not be written
pub async fn build(options: PackOptions, compiler: Arc<dyn Compiler>) -> Result<BuildReport> {
    let start = Instant::now();
    let span = info_span!("build", library = options.name.as_deref().unwrap_or("<unnamed>"));

    async move {
        let ResolvedPlan {
            plan,
            root,
            out_dir,
        } = resolve_plan(&options)?;

        info!(
            targets = plan.len(),
            formats = ?plan.formats(),
            "emitting {} target(s)",
            plan.len()
        );

        let mut settings = EmitSettings::new(&out_dir, &root);
        settings.external = options.external.clone();
        settings.globals = options.globals.clone();
        settings.minify = options.minify;
        settings.platform = options.platform;
        settings.timeout = options.timeout;
        settings.max_parallel = options.resolved_max_parallel();
        settings.fail_fast = options.fail_fast;

        let coordinator = EmissionCoordinator::new(compiler, settings);
        let artifacts = coordinator.emit_all(&plan).await?;

        let writer = ManifestWriter::new(&out_dir, plan.manifest_path());
        let manifest = writer
            .write(&artifacts, options.name.as_deref(), &root)
            .await?;

        let duration = start.elapsed();
        info!(
            artifacts = artifacts.len(),
            duration_ms = duration.as_millis() as u64,
            "build complete"
        );

        Ok::<_, BuildError>(BuildReport {
            manifest,
            artifacts,
            manifest_path: writer.path(),
            out_dir,
            duration,
        })
    }
    .instrument(span)
    .await
}
