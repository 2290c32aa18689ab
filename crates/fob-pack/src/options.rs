//! Options for one packaging run.
//!
//! Defaults that depend on the entry count (formats, file name template) are
//! left unset here and resolved by the `resolved_*` accessors.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::compiler::{Compiler, Platform, RolldownCompiler};
use crate::emit::{DEFAULT_TIMEOUT, default_max_parallel};
use crate::entry::RawEntries;
use crate::error::{ConfigError, Result};
use crate::format::{FileNameTemplate, Format};
use crate::identity::LibraryIdentity;
use crate::manifest::DEFAULT_MANIFEST_FILE;
use crate::pipeline::BuildReport;

/// Configuration for one packaging run.
///
/// Use the builder methods for ergonomic configuration, or construct directly
/// for full control. Every option has an explicit default.
#[derive(Debug, Clone)]
pub struct PackOptions {
    /// Entry point(s). A single path or logical names mapped to paths.
    pub entry: RawEntries,

    /// Library global name. Required when a global format is requested.
    pub name: Option<String>,

    /// Output file name template (default depends on the entry count).
    pub file_name: Option<FileNameTemplate>,

    /// Requested formats (default depends on the entry count).
    pub formats: Option<Vec<Format>>,

    /// Output directory, relative to `root` unless absolute (default: `dist`).
    pub out_dir: PathBuf,

    /// Project root used to resolve entries and packages (default: current directory).
    pub root: Option<PathBuf>,

    /// Packages kept out of the global build.
    ///
    /// Module and CommonJS builds always externalize every bare import.
    pub external: Vec<String>,

    /// Global variable names for external packages in the global build.
    ///
    /// Example: `{"react": "React", "react-dom": "ReactDOM"}`
    pub globals: FxHashMap<String, String>,

    /// Manifest file name inside `out_dir` (default: `manifest.json`).
    pub manifest: String,

    /// Target runtime platform (default: Browser).
    pub platform: Platform,

    /// Enable minification (default: false).
    pub minify: bool,

    /// Maximum targets compiled at once (default: `min(num_cpus, 8)`).
    pub max_parallel: Option<usize>,

    /// Per-target compile timeout (default: 120s).
    pub timeout: Duration,

    /// Skip targets that have not started once any target fails (default: false).
    pub fail_fast: bool,
}

impl PackOptions {
    /// Create options for the given entry.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fob_pack::{Format, PackOptions};
    ///
    /// let options = PackOptions::new("src/index.js")
    ///     .name("MyLib")
    ///     .formats([Format::Module, Format::CommonJs, Format::Global]);
    /// ```
    pub fn new(entry: impl Into<RawEntries>) -> Self {
        Self {
            entry: entry.into(),
            name: None,
            file_name: None,
            formats: None,
            out_dir: PathBuf::from("dist"),
            root: None,
            external: Vec::new(),
            globals: FxHashMap::default(),
            manifest: DEFAULT_MANIFEST_FILE.to_string(),
            platform: Platform::Browser,
            minify: false,
            max_parallel: None,
            timeout: DEFAULT_TIMEOUT,
            fail_fast: false,
        }
    }

    /// Create options with named entries, kept in the given order.
    pub fn new_named<I, K, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: Into<PathBuf>,
    {
        let map: IndexMap<String, PathBuf> = entries
            .into_iter()
            .map(|(k, p)| (k.into(), p.into()))
            .collect();
        Self::new(RawEntries::Named(map))
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn file_name(mut self, template: impl Into<FileNameTemplate>) -> Self {
        self.file_name = Some(template.into());
        self
    }

    pub fn formats<I>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = Format>,
    {
        self.formats = Some(formats.into_iter().collect());
        self
    }

    pub fn out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = dir.into();
        self
    }

    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Add packages that the global build should not inline.
    pub fn external<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for pkg in packages {
            let value = pkg.into();
            if !self.external.contains(&value) {
                self.external.push(value);
            }
        }
        self
    }

    /// Set global variable mappings for external packages.
    pub fn globals_map<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in entries {
            self.globals.insert(k.into(), v.into());
        }
        self
    }

    pub fn manifest(mut self, file: impl Into<String>) -> Self {
        self.manifest = file.into();
        self
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn minify(mut self, enabled: bool) -> Self {
        self.minify = enabled;
        self
    }

    pub fn max_parallel(mut self, n: usize) -> Self {
        self.max_parallel = Some(n);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn fail_fast(mut self, enabled: bool) -> Self {
        self.fail_fast = enabled;
        self
    }

    /// Validate options that do not need the filesystem.
    ///
    /// # Errors
    ///
    /// - `InvalidLibraryName` if `name` is not a JavaScript identifier
    /// - `InvalidOption` for a zero concurrency bound or timeout
    /// - `MissingLibraryName` if a global format is requested without a name
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let identity = self.identity()?;

        if self.max_parallel == Some(0) {
            return Err(ConfigError::InvalidOption {
                option: "maxParallel".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidOption {
                option: "timeout".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        if identity.is_none() {
            let formats: Vec<Format> = Format::canonicalize(&self.resolved_formats())
                .into_iter()
                .filter(|f| f.needs_global_name())
                .collect();
            if !formats.is_empty() {
                return Err(ConfigError::MissingLibraryName { formats });
            }
        }

        Ok(())
    }

    /// Parsed library identity, if a name is configured.
    pub fn identity(&self) -> std::result::Result<Option<LibraryIdentity>, ConfigError> {
        self.name.as_deref().map(LibraryIdentity::new).transpose()
    }

    /// Requested formats, or the defaults for this entry count:
    /// `[module, global]` for one entry, `[module, commonjs]` for several.
    pub fn resolved_formats(&self) -> Vec<Format> {
        match &self.formats {
            Some(formats) => formats.clone(),
            None if self.entry.len() > 1 => vec![Format::Module, Format::CommonJs],
            None => vec![Format::Module, Format::Global],
        }
    }

    /// Configured template, or the default for this entry count.
    pub fn resolved_file_name(&self) -> FileNameTemplate {
        self.file_name
            .clone()
            .unwrap_or_else(|| FileNameTemplate::default_for(self.entry.len()))
    }

    /// Project root: the configured root, or the current directory.
    pub fn resolved_root(&self) -> std::io::Result<PathBuf> {
        match &self.root {
            Some(root) if root.is_absolute() => Ok(root.clone()),
            Some(root) => Ok(std::env::current_dir()?.join(root)),
            None => std::env::current_dir(),
        }
    }

    /// Output directory resolved against `root`.
    pub fn resolved_out_dir(&self, root: &Path) -> PathBuf {
        crate::output::writer::normalize_dir(&self.out_dir, root)
    }

    pub fn resolved_max_parallel(&self) -> usize {
        self.max_parallel.unwrap_or_else(default_max_parallel).max(1)
    }

    /// Run the build with the bundled Rolldown compiler.
    pub async fn build(self) -> Result<BuildReport> {
        self.build_with(Arc::new(RolldownCompiler::new())).await
    }

    /// Run the build with a custom compiler.
    pub async fn build_with(self, compiler: Arc<dyn Compiler>) -> Result<BuildReport> {
        crate::pipeline::build(self, compiler).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = PackOptions::new("src/index.js");
        assert_eq!(options.out_dir, PathBuf::from("dist"));
        assert_eq!(options.manifest, "manifest.json");
        assert_eq!(options.timeout, Duration::from_secs(120));
        assert_eq!(options.platform, Platform::Browser);
        assert!(!options.fail_fast);
    }

    #[test]
    fn test_default_formats_depend_on_entry_count() {
        let single = PackOptions::new("src/index.js");
        assert_eq!(single.resolved_formats(), vec![Format::Module, Format::Global]);

        let multi = PackOptions::new_named([("index", "src/index.js"), ("utils", "src/utils.js")]);
        assert_eq!(multi.resolved_formats(), vec![Format::Module, Format::CommonJs]);
    }

    #[test]
    fn test_default_template_depends_on_entry_count() {
        let single = PackOptions::new("src/index.js");
        assert_eq!(single.resolved_file_name().describe(), "[name].[format].js");

        let multi = PackOptions::new_named([("a", "a.js"), ("b", "b.js")]);
        assert_eq!(multi.resolved_file_name().describe(), "[entry].[format].js");
    }

    #[test]
    fn test_validate_rejects_bad_name() {
        let err = PackOptions::new("src/index.js").name("my-lib").validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLibraryName { .. }));
    }

    #[test]
    fn test_validate_rejects_zero_parallel() {
        let err = PackOptions::new("src/index.js").max_parallel(0).validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOption { option, .. } if option == "maxParallel"));
    }

    #[test]
    fn test_validate_requires_name_for_default_global_build() {
        let err = PackOptions::new("src/missing.js").validate().unwrap_err();
        assert_eq!(err, ConfigError::MissingLibraryName { formats: vec![Format::Global] });

        let multi = PackOptions::new_named([("a", "a.js"), ("b", "b.js")]);
        assert!(multi.validate().is_ok());
    }

    #[test]
    fn test_external_is_deduplicated() {
        let options = PackOptions::new("src/index.js").external(["react", "react"]);
        assert_eq!(options.external, vec!["react".to_string()]);
    }
}
