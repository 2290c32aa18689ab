//! Path validation and atomic file writes for emitted output.
//!
//! Every file the packager produces goes through this module:
//!
//! - **Path validation**: output paths are normalized and must stay inside the
//!   output directory (no `..` escapes, no absolute paths, no null bytes)
//! - **Atomic writes**: content is written to a sibling temp file and renamed
//!   into place, so readers never observe a partially written artifact
//! - **Directory creation**: parent directories are created as needed

use std::io;
use std::path::{Component, Path, PathBuf};

use path_clean::PathClean;
use tracing::warn;

/// Normalize a rendered output path into a relative, `/`-separated path.
///
/// Returns a reason string when the path is empty, absolute, contains a null
/// byte, or resolves outside the output directory.
pub fn normalize_relative_path(raw: &str) -> Result<String, String> {
    if raw.trim().is_empty() {
        return Err("output path is empty".to_string());
    }
    if raw.contains('\0') {
        return Err("output path contains a null byte".to_string());
    }

    let unified = raw.replace('\\', "/");
    let path = Path::new(&unified);
    if path.is_absolute() || unified.starts_with('/') {
        return Err("output path must be relative to the output directory".to_string());
    }

    let cleaned = path.clean();
    let mut parts = Vec::new();
    for component in cleaned.components() {
        match component {
            Component::Normal(part) => match part.to_str() {
                Some(part) => parts.push(part),
                None => return Err("output path is not valid UTF-8".to_string()),
            },
            Component::CurDir => {}
            Component::ParentDir => {
                return Err("output path escapes the output directory".to_string());
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err("output path must be relative to the output directory".to_string());
            }
        }
    }

    if parts.is_empty() {
        return Err("output path does not name a file".to_string());
    }

    Ok(parts.join("/"))
}

/// Join a relative output path onto `base_dir`, rejecting escapes.
pub fn validate_output_path(base_dir: &Path, relative: &str) -> io::Result<PathBuf> {
    let normalized = normalize_relative_path(relative)
        .map_err(|reason| io::Error::new(io::ErrorKind::InvalidInput, reason))?;

    let full_path = base_dir.join(normalized).clean();
    if !full_path.starts_with(base_dir) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "path '{}' escapes output directory '{}'",
                relative,
                base_dir.display()
            ),
        ));
    }

    Ok(full_path)
}

/// Resolve a possibly relative directory against `root`, normalized.
pub fn normalize_dir(dir: &Path, root: &Path) -> PathBuf {
    if dir.is_absolute() {
        dir.to_path_buf().clean()
    } else {
        root.join(dir).clean()
    }
}

/// Write `contents` to `target` atomically (temp file + rename).
///
/// Parent directories are created. On failure the temp file is removed and
/// `target` is left as it was.
pub async fn write_atomic(target: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let temp_path = temp_path_for(target);

    if let Err(e) = tokio::fs::write(&temp_path, contents).await {
        cleanup_temp_file(&temp_path).await;
        return Err(e);
    }

    if let Err(e) = tokio::fs::rename(&temp_path, target).await {
        cleanup_temp_file(&temp_path).await;
        return Err(e);
    }

    Ok(())
}

/// `dist/mylib.es.js` -> `dist/.mylib.es.js.tmp`
fn temp_path_for(target: &Path) -> PathBuf {
    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{file_name}.tmp"))
}

async fn cleanup_temp_file(temp_path: &Path) {
    if let Err(e) = tokio::fs::remove_file(temp_path).await {
        if e.kind() != io::ErrorKind::NotFound {
            warn!(
                path = %temp_path.display(),
                error = %e,
                "failed to clean up temporary file"
            );
        }
    }
}
