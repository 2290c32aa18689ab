//! Artifact manifest: a single JSON record of everything one build produced.
//!
//! The manifest is deterministic. It holds no timestamps and no absolute
//! paths, so rebuilding unchanged inputs yields byte-identical output.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::BuildError;
use crate::format::Format;
use crate::output::Artifact;
use crate::output::writer::{validate_output_path, write_atomic};
use crate::plan::collision_key;

/// Manifest schema version.
pub const MANIFEST_VERSION: u32 = 1;

/// Default manifest file name inside the output directory.
pub const DEFAULT_MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub version: u32,
    /// Library global name, when configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// One entry per artifact, in plan order.
    pub artifacts: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    /// Path relative to the output directory.
    pub output_path: String,
    pub format: Format,
    /// Logical entry name.
    pub entry: String,
    /// Entry source, relative to the project root when inside it.
    pub source: String,
    /// Lowercase hex BLAKE3 digest.
    pub hash: String,
    pub size: u64,
}

impl Manifest {
    /// Aggregate artifacts, keeping their order.
    ///
    /// Fails with [`BuildError::InternalConsistency`] if two artifacts share
    /// an output path.
    pub fn from_artifacts(
        artifacts: &[Artifact],
        name: Option<&str>,
        root: &Path,
    ) -> Result<Self, BuildError> {
        let mut seen = FxHashSet::default();
        let mut entries = Vec::with_capacity(artifacts.len());

        for artifact in artifacts {
            if !seen.insert(collision_key(artifact.output_path())) {
                return Err(BuildError::InternalConsistency(format!(
                    "output path '{}' appears more than once in the manifest",
                    artifact.output_path()
                )));
            }

            let target = artifact.target();
            entries.push(ManifestEntry {
                output_path: artifact.output_path().to_string(),
                format: target.format(),
                entry: target.entry().logical_name().to_string(),
                source: display_source(target.entry().source_path(), root),
                hash: artifact.content_hash().to_string(),
                size: artifact.size(),
            });
        }

        Ok(Self {
            version: MANIFEST_VERSION,
            name: name.map(str::to_string),
            artifacts: entries,
        })
    }

    /// Pretty JSON with a trailing newline.
    pub fn to_json(&self) -> Result<String, BuildError> {
        let mut json = serde_json::to_string_pretty(self).map_err(|e| {
            BuildError::InternalConsistency(format!("failed to serialize manifest: {e}"))
        })?;
        json.push('\n');
        Ok(json)
    }
}

/// Persists the manifest for a build.
#[derive(Debug, Clone)]
pub struct ManifestWriter {
    out_dir: PathBuf,
    manifest_path: String,
}

impl ManifestWriter {
    /// `manifest_path` is relative to `out_dir`.
    pub fn new(out_dir: impl Into<PathBuf>, manifest_path: impl Into<String>) -> Self {
        Self {
            out_dir: out_dir.into(),
            manifest_path: manifest_path.into(),
        }
    }

    /// Where the manifest will be written.
    pub fn path(&self) -> PathBuf {
        self.out_dir.join(&self.manifest_path)
    }

    /// Build the manifest from `artifacts` and write it atomically.
    ///
    /// Only call this once every target has succeeded.
    pub async fn write(
        &self,
        artifacts: &[Artifact],
        name: Option<&str>,
        root: &Path,
    ) -> Result<Manifest, BuildError> {
        let manifest = Manifest::from_artifacts(artifacts, name, root)?;
        let json = manifest.to_json()?;

        let path = validate_output_path(&self.out_dir, &self.manifest_path).map_err(|source| {
            BuildError::ManifestIo {
                path: self.path(),
                source,
            }
        })?;

        write_atomic(&path, json.as_bytes())
            .await
            .map_err(|source| BuildError::ManifestIo {
                path: path.clone(),
                source,
            })?;

        info!(
            path = %path.display(),
            artifacts = manifest.artifacts.len(),
            "wrote manifest"
        );
        Ok(manifest)
    }
}

/// Root-relative, `/`-separated path when possible.
fn display_source(source: &Path, root: &Path) -> String {
    match source.strip_prefix(root) {
        Ok(relative) => relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => source.to_string_lossy().replace('\\', "/"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_source_relative_to_root() {
        assert_eq!(
            display_source(Path::new("/project/src/index.js"), Path::new("/project")),
            "src/index.js"
        );
    }

    #[test]
    fn test_manifest_json_shape() {
        let manifest = Manifest {
            version: MANIFEST_VERSION,
            name: Some("MyLib".to_string()),
            artifacts: vec![ManifestEntry {
                output_path: "mylib.es.js".to_string(),
                format: Format::Module,
                entry: "mylib".to_string(),
                source: "src/index.js".to_string(),
                hash: "abc".to_string(),
                size: 3,
            }],
        };

        let json = manifest.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["name"], "MyLib");
        assert_eq!(value["artifacts"][0]["outputPath"], "mylib.es.js");
        assert_eq!(value["artifacts"][0]["format"], "module");
        assert!(json.ends_with("}\n"));

        let parsed: Manifest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, manifest);
    }

    #[test]
    fn test_name_omitted_when_absent() {
        let manifest = Manifest {
            version: MANIFEST_VERSION,
            name: None,
            artifacts: Vec::new(),
        };
        assert!(!manifest.to_json().unwrap().contains("\"name\""));
    }
}
