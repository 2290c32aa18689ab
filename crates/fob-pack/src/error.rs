//! Error types for fob-pack operations.
//!
//! Errors are layered by the stage that raises them:
//!
//! - [`ConfigError`]: user-fixable problems found before anything is compiled
//! - [`CompileError`]: a single target failed inside the compiler
//! - [`EmitError`]: any per-target failure, always labelled with its target
//! - [`BuildError`]: what [`crate::build`] returns

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::format::Format;

/// Identifies one build target in messages: `entry:format`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TargetLabel {
    pub entry: String,
    pub format: Format,
}

impl TargetLabel {
    pub fn new(entry: impl Into<String>, format: Format) -> Self {
        Self {
            entry: entry.into(),
            format,
        }
    }
}

impl fmt::Display for TargetLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.entry, self.format)
    }
}

/// Configuration problems detected before compilation starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Entry source path does not exist or is not a file.
    #[error("entry '{name}' not found at {}", .path.display())]
    MissingEntry { name: String, path: PathBuf },

    /// A requested format exposes a global but no library name was given.
    #[error("a library name is required for {} output", join_formats(.formats))]
    MissingLibraryName { formats: Vec<Format> },

    /// Two outputs (or an output and the manifest) resolve to the same file.
    #[error("output path '{path}' is produced by both {first} and {second}")]
    DuplicateOutputPath {
        path: String,
        first: String,
        second: String,
    },

    #[error("invalid library name '{name}': {reason}")]
    InvalidLibraryName { name: String, reason: String },

    #[error("invalid entry name '{name}': {reason}")]
    InvalidEntryName { name: String, reason: String },

    #[error("no entry points configured")]
    NoEntries,

    #[error("no output formats requested")]
    NoFormats,

    #[error("invalid file name template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    /// A rendered output path is empty, absolute, or escapes the output directory.
    #[error("invalid output path '{path}' for {target}: {reason}")]
    InvalidOutputPath {
        path: String,
        target: String,
        reason: String,
    },

    #[error("invalid option '{option}': {reason}")]
    InvalidOption { option: String, reason: String },
}

/// Failure of the compiler for a single target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The compiler reported errors. Diagnostics are kept verbatim.
    #[error("{}", format_diagnostics(.diagnostics))]
    Failed { diagnostics: Vec<String> },

    #[error("compilation timed out after {after:?}")]
    Timeout { after: Duration },
}

impl CompileError {
    pub fn failed(diagnostic: impl Into<String>) -> Self {
        CompileError::Failed {
            diagnostics: vec![diagnostic.into()],
        }
    }
}

/// A per-target failure during emission.
#[derive(Debug, Error)]
#[error("{target}: {kind}")]
pub struct EmitError {
    pub target: TargetLabel,
    #[source]
    pub kind: EmitErrorKind,
}

impl EmitError {
    pub fn new(target: TargetLabel, kind: impl Into<EmitErrorKind>) -> Self {
        Self {
            target,
            kind: kind.into(),
        }
    }

    /// True for targets skipped because a sibling failed first.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.kind, EmitErrorKind::Cancelled)
    }
}

#[derive(Debug, Error)]
pub enum EmitErrorKind {
    #[error("compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cancelled after an earlier target failed")]
    Cancelled,

    #[error("internal error: {0}")]
    Internal(String),
}

/// Category of a [`BuildError`], as reported to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Compile,
    Io,
    InternalConsistency,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Config => "ConfigError",
            ErrorKind::Compile => "CompileError",
            ErrorKind::Io => "IOError",
            ErrorKind::InternalConsistency => "InternalConsistencyError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level error returned by [`crate::build`].
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// One or more targets failed. Failures are in plan order, with
    /// cancelled targets listed after real failures.
    #[error("{}", format_failures(.failures))]
    Emission { failures: Vec<EmitError> },

    #[error("failed to write manifest {}: {source}", .path.display())]
    ManifestIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("internal consistency error: {0}")]
    InternalConsistency(String),
}

/// Result type alias for fob-pack operations.
pub type Result<T, E = BuildError> = std::result::Result<T, E>;

impl BuildError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BuildError::Config(_) => ErrorKind::Config,
            BuildError::Emission { .. } => match self.primary_failure().map(|f| &f.kind) {
                Some(EmitErrorKind::Io { .. }) => ErrorKind::Io,
                Some(EmitErrorKind::Internal(_)) => ErrorKind::InternalConsistency,
                _ => ErrorKind::Compile,
            },
            BuildError::ManifestIo { .. } => ErrorKind::Io,
            BuildError::InternalConsistency(_) => ErrorKind::InternalConsistency,
        }
    }

    /// The first failure that was not a cancellation.
    pub fn primary_failure(&self) -> Option<&EmitError> {
        match self {
            BuildError::Emission { failures } => failures
                .iter()
                .find(|f| !f.is_cancelled())
                .or_else(|| failures.first()),
            _ => None,
        }
    }
}

fn join_formats(formats: &[Format]) -> String {
    formats
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_diagnostics(diagnostics: &[String]) -> String {
    match diagnostics {
        [] => "unknown compiler error".to_string(),
        [single] => single.clone(),
        many => format!("{} errors: {}", many.len(), many.join("; ")),
    }
}

fn format_failures(failures: &[EmitError]) -> String {
    let real = failures.iter().filter(|f| !f.is_cancelled()).count();
    let cancelled = failures.len() - real;
    let first = failures
        .iter()
        .find(|f| !f.is_cancelled())
        .or_else(|| failures.first());

    let Some(first) = first else {
        return "emission failed".to_string();
    };

    match (real, cancelled) {
        (1, 0) => first.to_string(),
        (_, 0) => format!("{real} targets failed; first: {first}"),
        _ => format!("{real} target(s) failed, {cancelled} cancelled; first: {first}"),
    }
}

impl miette::Diagnostic for ConfigError {
    fn code(&self) -> Option<Box<dyn fmt::Display + '_>> {
        Some(Box::new(match self {
            ConfigError::MissingEntry { .. } => "MISSING_ENTRY",
            ConfigError::MissingLibraryName { .. } => "MISSING_LIBRARY_NAME",
            ConfigError::DuplicateOutputPath { .. } => "DUPLICATE_OUTPUT_PATH",
            ConfigError::InvalidLibraryName { .. } => "INVALID_LIBRARY_NAME",
            ConfigError::InvalidEntryName { .. } => "INVALID_ENTRY_NAME",
            ConfigError::NoEntries => "NO_ENTRIES",
            ConfigError::NoFormats => "NO_FORMATS",
            ConfigError::InvalidTemplate { .. } => "INVALID_TEMPLATE",
            ConfigError::InvalidOutputPath { .. } => "INVALID_OUTPUT_PATH",
            ConfigError::InvalidOption { .. } => "INVALID_OPTION",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn fmt::Display + '_>> {
        let help = match self {
            ConfigError::MissingEntry { path, .. } => format!(
                "Check that '{}' exists and is a file, relative to the project root.",
                path.display()
            ),
            ConfigError::MissingLibraryName { .. } => {
                "Set a library name (for example --name MyLib) or drop the global format."
                    .to_string()
            }
            ConfigError::DuplicateOutputPath { .. } => {
                "Include [format] or [entry] in the file name template so every output is distinct."
                    .to_string()
            }
            ConfigError::InvalidLibraryName { .. } => {
                "Library names must be valid JavaScript identifiers, e.g. MyLib or my_lib."
                    .to_string()
            }
            ConfigError::InvalidEntryName { .. } => {
                "Entry names must be non-empty and must not contain path separators.".to_string()
            }
            ConfigError::NoEntries => "Specify at least one entry point.".to_string(),
            ConfigError::NoFormats => "Request at least one of: es, cjs, umd.".to_string(),
            ConfigError::InvalidTemplate { .. } => {
                "Supported placeholders are [name], [entry] and [format].".to_string()
            }
            ConfigError::InvalidOutputPath { .. } => {
                "Output paths must be relative and stay inside the output directory.".to_string()
            }
            ConfigError::InvalidOption { .. } => return None,
        };
        Some(Box::new(help))
    }
}

impl miette::Diagnostic for BuildError {
    fn code(&self) -> Option<Box<dyn fmt::Display + '_>> {
        match self {
            BuildError::Config(err) => miette::Diagnostic::code(err),
            _ => Some(Box::new(self.kind())),
        }
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn fmt::Display + '_>> {
        match self {
            BuildError::Config(err) => miette::Diagnostic::help(err),
            BuildError::Emission { failures } => {
                let primary = self.primary_failure()?;
                let help = match &primary.kind {
                    EmitErrorKind::Compile(CompileError::Timeout { .. }) => {
                        "Increase the per-target timeout with --timeout.".to_string()
                    }
                    EmitErrorKind::Io { .. } => {
                        "Failed to write file. Check disk space and permissions.".to_string()
                    }
                    _ if failures.len() > 1 => {
                        format!("{} targets did not complete. See the log for details.", failures.len())
                    }
                    _ => return None,
                };
                Some(Box::new(help))
            }
            BuildError::ManifestIo { .. } => Some(Box::new(
                "Failed to write the manifest. Check disk space and permissions.",
            )),
            BuildError::InternalConsistency(_) => None,
        }
    }
}
