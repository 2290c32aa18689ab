//! Format plan: expands entries × formats into concrete build targets.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::entry::EntryPoint;
use crate::error::{ConfigError, TargetLabel};
use crate::format::{FileNameContext, FileNameTemplate, Format};
use crate::identity::LibraryIdentity;
use crate::output::writer::normalize_relative_path;

/// One (entry, format) pair with its resolved output path.
///
/// Only [`build_plan`] creates targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    entry: EntryPoint,
    format: Format,
    output_path: String,
    global_name: Option<String>,
}

impl BuildTarget {
    pub fn entry(&self) -> &EntryPoint {
        &self.entry
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// Normalized output path, relative to the output directory, `/`-separated.
    pub fn output_path(&self) -> &str {
        &self.output_path
    }

    pub fn needs_global_name(&self) -> bool {
        self.format.needs_global_name()
    }

    /// Global variable name for formats that expose one.
    pub fn global_name(&self) -> Option<&str> {
        self.global_name.as_deref()
    }

    pub fn label(&self) -> TargetLabel {
        TargetLabel::new(self.entry.logical_name(), self.format)
    }
}

/// Ordered set of targets for one build.
#[derive(Debug, Clone)]
pub struct BuildPlan {
    targets: Vec<BuildTarget>,
    formats: Vec<Format>,
    manifest_path: String,
}

impl BuildPlan {
    /// Targets in entry declaration order, then canonical format order.
    pub fn targets(&self) -> &[BuildTarget] {
        &self.targets
    }

    /// Requested formats, deduplicated, in canonical order.
    pub fn formats(&self) -> &[Format] {
        &self.formats
    }

    /// Manifest file path relative to the output directory.
    pub fn manifest_path(&self) -> &str {
        &self.manifest_path
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

const MANIFEST_LABEL: &str = "the manifest";

/// Expand entries and formats into a [`BuildPlan`].
///
/// Checks, in order: at least one format, at least one entry, a library name
/// for global formats, a valid template, then per-target output paths and
/// their uniqueness (including against the manifest file).
pub fn build_plan(
    entries: &[EntryPoint],
    requested_formats: &[Format],
    identity: Option<&LibraryIdentity>,
    template: &FileNameTemplate,
    manifest_file: &str,
) -> Result<BuildPlan, ConfigError> {
    let formats = Format::canonicalize(requested_formats);
    if formats.is_empty() {
        return Err(ConfigError::NoFormats);
    }
    if entries.is_empty() {
        return Err(ConfigError::NoEntries);
    }

    let needs_name: Vec<Format> = formats
        .iter()
        .copied()
        .filter(|f| f.needs_global_name())
        .collect();
    if identity.is_none() && !needs_name.is_empty() {
        return Err(ConfigError::MissingLibraryName {
            formats: needs_name,
        });
    }

    template.validate()?;

    let base_name = identity.map(LibraryIdentity::base_name);
    let mut seen: FxHashMap<String, String> = FxHashMap::default();
    let mut targets = Vec::with_capacity(entries.len() * formats.len());

    for entry in entries {
        for &format in &formats {
            let label = TargetLabel::new(entry.logical_name(), format).to_string();
            let ctx = FileNameContext {
                name: base_name.as_deref().unwrap_or(entry.logical_name()),
                entry: entry.logical_name(),
                format,
            };

            let rendered = template.render(&ctx)?;
            let output_path = normalize_relative_path(&rendered).map_err(|reason| {
                ConfigError::InvalidOutputPath {
                    path: rendered.clone(),
                    target: label.clone(),
                    reason,
                }
            })?;

            if let Some(first) = seen.get(&collision_key(&output_path)) {
                return Err(ConfigError::DuplicateOutputPath {
                    path: output_path,
                    first: first.clone(),
                    second: label,
                });
            }
            seen.insert(collision_key(&output_path), label);

            targets.push(BuildTarget {
                entry: entry.clone(),
                format,
                output_path,
                global_name: if format.needs_global_name() {
                    identity.map(|i| i.name().to_string())
                } else {
                    None
                },
            });
        }
    }

    let manifest_path =
        normalize_relative_path(manifest_file).map_err(|reason| ConfigError::InvalidOutputPath {
            path: manifest_file.to_string(),
            target: MANIFEST_LABEL.to_string(),
            reason,
        })?;
    if let Some(first) = seen.get(&collision_key(&manifest_path)) {
        return Err(ConfigError::DuplicateOutputPath {
            path: manifest_path,
            first: first.clone(),
            second: MANIFEST_LABEL.to_string(),
        });
    }

    debug!(
        targets = targets.len(),
        formats = ?formats,
        template = template.describe(),
        "built format plan"
    );

    Ok(BuildPlan {
        targets,
        formats,
        manifest_path,
    })
}

/// Key under which two output paths count as the same file.
///
/// Case-folded, since macOS and Windows file systems are case-insensitive.
pub(crate) fn collision_key(path: &str) -> String {
    path.to_lowercase()
}
