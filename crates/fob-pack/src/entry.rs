//! Entry resolution: turns configured entries into validated [`EntryPoint`]s.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use path_clean::PathClean;
use tracing::debug;

use crate::error::ConfigError;
use crate::identity::LibraryIdentity;

/// Entries as configured, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEntries {
    /// One unnamed entry. Its logical name is derived.
    Single(PathBuf),
    /// Logical name to source path, in declaration order.
    Named(IndexMap<String, PathBuf>),
}

impl RawEntries {
    /// Build a named entry set from `(name, path)` pairs.
    pub fn named<I, K, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: Into<PathBuf>,
    {
        RawEntries::Named(
            entries
                .into_iter()
                .map(|(k, p)| (k.into(), p.into()))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        match self {
            RawEntries::Single(_) => 1,
            RawEntries::Named(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&str> for RawEntries {
    fn from(path: &str) -> Self {
        RawEntries::Single(PathBuf::from(path))
    }
}

impl From<String> for RawEntries {
    fn from(path: String) -> Self {
        RawEntries::Single(PathBuf::from(path))
    }
}

impl From<PathBuf> for RawEntries {
    fn from(path: PathBuf) -> Self {
        RawEntries::Single(path)
    }
}

impl From<&Path> for RawEntries {
    fn from(path: &Path) -> Self {
        RawEntries::Single(path.to_path_buf())
    }
}

impl From<IndexMap<String, PathBuf>> for RawEntries {
    fn from(map: IndexMap<String, PathBuf>) -> Self {
        RawEntries::Named(map)
    }
}

/// A validated entry module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    logical_name: String,
    source_path: PathBuf,
}

impl EntryPoint {
    pub fn logical_name(&self) -> &str {
        &self.logical_name
    }

    /// Resolved source path, checked to exist when the entry was created.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }
}

/// Validate configured entries against the filesystem.
///
/// Relative paths are resolved against `root`. Every source path must exist
/// and be a file. Nothing is read or written.
pub fn resolve(
    raw: &RawEntries,
    root: &Path,
    identity: Option<&LibraryIdentity>,
) -> Result<Vec<EntryPoint>, ConfigError> {
    let pairs: Vec<(String, &Path)> = match raw {
        RawEntries::Single(path) => {
            let name = match identity {
                Some(identity) => identity.base_name(),
                None => path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .map(str::to_string)
                    .ok_or_else(|| ConfigError::InvalidEntryName {
                        name: path.display().to_string(),
                        reason: "cannot derive an entry name from this path".to_string(),
                    })?,
            };
            vec![(name, path.as_path())]
        }
        RawEntries::Named(map) => {
            if map.is_empty() {
                return Err(ConfigError::NoEntries);
            }
            map.iter().map(|(k, p)| (k.clone(), p.as_path())).collect()
        }
    };

    let mut entries = Vec::with_capacity(pairs.len());
    for (name, path) in pairs {
        validate_entry_name(&name)?;

        let source_path = resolve_path(path, root);
        if !source_path.is_file() {
            return Err(ConfigError::MissingEntry {
                name,
                path: source_path,
            });
        }

        debug!(entry = %name, path = %source_path.display(), "resolved entry");
        entries.push(EntryPoint {
            logical_name: name,
            source_path,
        });
    }

    Ok(entries)
}

fn validate_entry_name(name: &str) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidEntryName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.trim().is_empty() {
        return Err(invalid("entry names cannot be empty"));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(invalid("entry names cannot contain path separators"));
    }
    if name == "." || name == ".." {
        return Err(invalid("entry names cannot be '.' or '..'"));
    }

    Ok(())
}

/// Resolve a path relative to `root`, normalized.
fn resolve_path(path: &Path, root: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf().clean()
    } else {
        root.join(path).clean()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "export const x = 1;\n").unwrap();
        }
        dir
    }

    #[test]
    fn test_single_entry_uses_library_base_name() {
        let dir = project(&["src/index.js"]);
        let identity = LibraryIdentity::new("MyLib").unwrap();

        let entries = resolve(&"src/index.js".into(), dir.path(), Some(&identity)).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].logical_name(), "mylib");
        assert_eq!(entries[0].source_path(), dir.path().join("src/index.js"));
    }

    #[test]
    fn test_single_entry_without_identity_uses_file_stem() {
        let dir = project(&["src/index.js"]);

        let entries = resolve(&"./src/index.js".into(), dir.path(), None).unwrap();

        assert_eq!(entries[0].logical_name(), "index");
    }

    #[test]
    fn test_named_entries_keep_declaration_order() {
        let dir = project(&["src/z.js", "src/a.js"]);
        let raw = RawEntries::named([("zeta", "src/z.js"), ("alpha", "src/a.js")]);

        let entries = resolve(&raw, dir.path(), None).unwrap();

        let names: Vec<_> = entries.iter().map(|e| e.logical_name()).collect();
        assert_eq!(names, ["zeta", "alpha"]);
    }

    #[test]
    fn test_missing_entry() {
        let dir = project(&[]);

        let err = resolve(&"src/index.js".into(), dir.path(), None).unwrap_err();

        match err {
            ConfigError::MissingEntry { name, path } => {
                assert_eq!(name, "index");
                assert!(path.ends_with("src/index.js"));
            }
            other => panic!("expected MissingEntry, got {other:?}"),
        }
    }

    #[test]
    fn test_directory_is_not_an_entry() {
        let dir = project(&["src/index.js"]);

        let err = resolve(&"src".into(), dir.path(), None).unwrap_err();

        assert!(matches!(err, ConfigError::MissingEntry { .. }));
    }

    #[test]
    fn test_empty_mapping() {
        let dir = project(&[]);
        let raw = RawEntries::Named(IndexMap::new());

        assert_eq!(resolve(&raw, dir.path(), None), Err(ConfigError::NoEntries));
    }

    #[test]
    fn test_invalid_entry_names() {
        let dir = project(&["src/index.js"]);
        for name in ["", "  ", "a/b", "a\\b", ".."] {
            let raw = RawEntries::named([(name, "src/index.js")]);
            let err = resolve(&raw, dir.path(), None).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidEntryName { .. }),
                "{name:?} should be rejected"
            );
        }
    }
}
