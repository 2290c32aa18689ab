//! Emission: compiles every target of a plan and writes the results.
//!
//! Targets run concurrently on a `JoinSet`, bounded by a semaphore. Results
//! are put back into plan order before they are returned, so completion order
//! never leaks into the manifest.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rustc_hash::FxHashMap;
use tracing::{debug, error, info_span, warn, Instrument};

use crate::compiler::{CompileRequest, Compiler, Externals, FormatDirectives, Platform};
use crate::error::{BuildError, CompileError, EmitError, EmitErrorKind};
use crate::format::Format;
use crate::output::Artifact;
use crate::output::writer::{validate_output_path, write_atomic};
use crate::plan::{BuildPlan, BuildTarget};

/// Default per-target compile timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Settings shared by every target of one build.
#[derive(Debug, Clone)]
pub struct EmitSettings {
    /// Absolute output directory.
    pub out_dir: PathBuf,
    /// Project root handed to the compiler.
    pub cwd: PathBuf,
    /// Specifiers kept external in the global build.
    pub external: Vec<String>,
    pub globals: FxHashMap<String, String>,
    pub minify: bool,
    pub platform: Platform,
    pub timeout: Duration,
    pub max_parallel: usize,
    pub fail_fast: bool,
}

impl EmitSettings {
    pub fn new(out_dir: impl Into<PathBuf>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            cwd: cwd.into(),
            external: Vec::new(),
            globals: FxHashMap::default(),
            minify: false,
            platform: Platform::default(),
            timeout: DEFAULT_TIMEOUT,
            max_parallel: default_max_parallel(),
            fail_fast: false,
        }
    }
}

/// `min(num_cpus, 8)`, at least 1.
pub fn default_max_parallel() -> usize {
    num_cpus::get().clamp(1, 8)
}

/// Drives the compiler for each target and writes artifacts.
#[derive(Clone)]
pub struct EmissionCoordinator {
    compiler: Arc<dyn Compiler>,
    settings: Arc<EmitSettings>,
}

impl EmissionCoordinator {
    pub fn new(compiler: Arc<dyn Compiler>, settings: EmitSettings) -> Self {
        Self {
            compiler,
            settings: Arc::new(settings),
        }
    }

    pub fn settings(&self) -> &EmitSettings {
        &self.settings
    }

    /// Compiler instructions for one target.
    ///
    /// Module and CommonJS output leave every bare import to the consumer's
    /// package manager. The global build has no module system to fall back
    /// on, so it inlines everything except the configured externals.
    pub fn directives_for(&self, target: &BuildTarget) -> FormatDirectives {
        let settings = &self.settings;
        let (externals, globals) = match target.format() {
            Format::Module | Format::CommonJs => (Externals::AllBare, FxHashMap::default()),
            Format::Global => (
                Externals::Only(settings.external.clone()),
                settings.globals.clone(),
            ),
        };

        FormatDirectives {
            format: target.format(),
            global_name: target.global_name().map(str::to_string),
            externals,
            globals,
            minify: settings.minify,
            platform: settings.platform,
        }
    }

    /// Compile one target, hash it, and write it under the output directory.
    pub async fn emit(&self, target: &BuildTarget) -> Result<Artifact, EmitError> {
        let label = target.label();
        let request = CompileRequest {
            entry_name: target.entry().logical_name().to_string(),
            source_path: target.entry().source_path().to_path_buf(),
            cwd: self.settings.cwd.clone(),
            directives: self.directives_for(target),
        };

        let timeout = self.settings.timeout;
        let compiled = match tokio::time::timeout(timeout, self.compiler.compile(&request)).await {
            Ok(Ok(compiled)) => compiled,
            Ok(Err(e)) => return Err(EmitError::new(label, e)),
            Err(_) => {
                return Err(EmitError::new(
                    label,
                    CompileError::Timeout { after: timeout },
                ));
            }
        };

        for warning in &compiled.warnings {
            warn!(label = %label, "{warning}");
        }

        let path = validate_output_path(&self.settings.out_dir, target.output_path())
            .map_err(|e| EmitError::new(label.clone(), EmitErrorKind::Internal(e.to_string())))?;

        write_atomic(&path, &compiled.code).await.map_err(|source| {
            EmitError::new(
                label.clone(),
                EmitErrorKind::Io {
                    path: path.clone(),
                    source,
                },
            )
        })?;

        let artifact = Artifact::new(target.clone(), path, compiled.code);
        debug!(
            label = %label,
            path = artifact.output_path(),
            size = artifact.size(),
            "emitted artifact"
        );
        Ok(artifact)
    }

    /// Emit every target in the plan.
    ///
    /// Returns artifacts in plan order, or every failure in plan order with
    /// cancelled targets after real failures.
    pub async fn emit_all(&self, plan: &BuildPlan) -> Result<Vec<Artifact>, BuildError> {
        let results = self.run_concurrent(plan.targets()).await;

        let mut artifacts = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        let mut cancelled = Vec::new();

        for result in results {
            match result {
                Ok(artifact) => artifacts.push(artifact),
                Err(e) if e.is_cancelled() => cancelled.push(e),
                Err(e) => failures.push(e),
            }
        }

        if failures.is_empty() && cancelled.is_empty() {
            return Ok(artifacts);
        }

        for failure in &failures {
            error!("{failure}");
        }
        failures.extend(cancelled);
        Err(BuildError::Emission { failures })
    }

    async fn run_concurrent(&self, targets: &[BuildTarget]) -> Vec<Result<Artifact, EmitError>> {
        use tokio::sync::Semaphore;
        use tokio::task::JoinSet;

        // Semaphore::new panics above MAX_PERMITS
        let permits = self
            .settings
            .max_parallel
            .min(targets.len())
            .clamp(1, Semaphore::MAX_PERMITS);
        let semaphore = Arc::new(Semaphore::new(permits));
        let abort = Arc::new(AtomicBool::new(false));
        let fail_fast = self.settings.fail_fast;
        let mut join_set = JoinSet::new();

        for (index, target) in targets.iter().enumerate() {
            let coordinator = self.clone();
            let target = target.clone();
            let semaphore = Arc::clone(&semaphore);
            let abort = Arc::clone(&abort);
            let span = info_span!("emit", label = %target.label());

            join_set.spawn(
                async move {
                    let label = target.label();
                    let _permit = match semaphore.acquire_owned().await {
                        Ok(permit) => permit,
                        Err(e) => {
                            let kind = EmitErrorKind::Internal(e.to_string());
                            return (index, Err(EmitError::new(label, kind)));
                        }
                    };

                    if fail_fast && abort.load(Ordering::SeqCst) {
                        return (index, Err(EmitError::new(label, EmitErrorKind::Cancelled)));
                    }

                    let result = coordinator.emit(&target).await;
                    if fail_fast && result.is_err() {
                        abort.store(true, Ordering::SeqCst);
                    }
                    (index, result)
                }
                .instrument(span),
            );
        }

        let mut slots: Vec<Option<Result<Artifact, EmitError>>> =
            targets.iter().map(|_| None).collect();

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(join_err) => {
                    // The panicking task's slot stays empty and is reported below
                    error!("emission task panicked: {join_err}");
                }
            }
        }

        slots
            .into_iter()
            .zip(targets)
            .map(|(slot, target)| {
                slot.unwrap_or_else(|| {
                    Err(EmitError::new(
                        target.label(),
                        EmitErrorKind::Internal("compiler task panicked".to_string()),
                    ))
                })
            })
            .collect()
    }
}
