//! Shared helpers for command implementations.

use crate::error::{CliError, Result, ResultExt};
use std::fs;
use std::path::{Path, PathBuf};

/// Resolve a path relative to a working directory.
pub fn resolve_path(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Project root from `--cwd`, or the current directory.
///
/// # Errors
///
/// Returns `FileNotFound` if the directory does not exist and
/// `InvalidArgument` if it is not a directory.
pub fn resolve_root(cwd: Option<&Path>) -> Result<PathBuf> {
    let current = std::env::current_dir().context("Failed to get current directory")?;

    let root = match cwd {
        Some(dir) => resolve_path(dir, &current),
        None => current,
    };

    if !fs::metadata(&root).with_path(&root)?.is_dir() {
        return Err(CliError::InvalidArgument(format!(
            "Project root is not a directory: {}",
            root.display()
        )));
    }

    Ok(root)
}

/// `path` relative to `root` for display, or as-is when outside it.
pub fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Remove the contents of `out_dir`, keeping the directory.
///
/// Refuses to clean the project root itself or anything outside it.
pub fn clean_output_dir(out_dir: &Path, root: &Path) -> Result<()> {
    if out_dir == root || !out_dir.starts_with(root) {
        return Err(CliError::InvalidArgument(format!(
            "Refusing to clean {}: the output directory must be inside the project root",
            out_dir.display()
        )));
    }

    if !out_dir.exists() {
        return Ok(());
    }
    if !out_dir.is_dir() {
        return Err(CliError::InvalidArgument(format!(
            "Output path exists but is not a directory: {}",
            out_dir.display()
        )));
    }

    let entries = fs::read_dir(out_dir)
        .with_hint("Check permissions on the output directory, or build without --clean")?;
    for entry in entries {
        let path = entry?.path();
        let removed = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        removed.context(format!("Failed to remove {}", path.display()))?;
    }

    Ok(())
}
