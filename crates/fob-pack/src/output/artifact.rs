use std::path::{Path, PathBuf};

use crate::plan::BuildTarget;

/// One emitted file, after it has been compiled and written.
#[derive(Debug, Clone)]
pub struct Artifact {
    target: BuildTarget,
    path: PathBuf,
    content: Vec<u8>,
    content_hash: String,
}

impl Artifact {
    pub(crate) fn new(target: BuildTarget, path: PathBuf, content: Vec<u8>) -> Self {
        let content_hash = blake3::hash(&content).to_hex().to_string();
        Self {
            target,
            path,
            content,
            content_hash,
        }
    }

    /// The target this artifact was produced for.
    pub fn target(&self) -> &BuildTarget {
        &self.target
    }

    /// Output path relative to the output directory.
    pub fn output_path(&self) -> &str {
        self.target.output_path()
    }

    /// Location the artifact was written to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Emitted bytes.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Lowercase hex BLAKE3 digest of [`content`](Self::content).
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}
