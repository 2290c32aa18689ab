//! The compiler capability the emission stage delegates to.
//!
//! The packager never parses or bundles code itself. For each build target it
//! hands a [`CompileRequest`] to a [`Compiler`] and writes whatever comes back.
//! [`RolldownCompiler`] is the bundled implementation.

mod externalize_plugin;
mod rolldown_compiler;

use std::path::PathBuf;

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::CompileError;
use crate::format::Format;

pub use self::externalize_plugin::ExternalizePlugin;
pub use self::rolldown_compiler::RolldownCompiler;

/// Target runtime, forwarded to the compiler for export conditions and
/// builtin handling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Browser,
    Node,
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "browser" => Ok(Platform::Browser),
            "node" => Ok(Platform::Node),
            other => Err(format!("unknown platform '{other}' (expected browser or node)")),
        }
    }
}

/// Which imports stay out of the emitted bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Externals {
    /// Every bare specifier (anything not starting with `.` or `/`).
    AllBare,
    /// Only the listed specifiers and their subpaths.
    Only(Vec<String>),
}

impl Externals {
    pub fn is_external(&self, specifier: &str) -> bool {
        match self {
            Externals::AllBare => is_bare_specifier(specifier),
            Externals::Only(list) => list.iter().any(|ext| {
                specifier == ext
                    || specifier
                        .strip_prefix(ext.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            }),
        }
    }
}

/// Relative and absolute paths are part of the library; everything else is a
/// package, a builtin (`node:fs`) or a URL.
fn is_bare_specifier(specifier: &str) -> bool {
    !(specifier.is_empty()
        || specifier.starts_with('.')
        || specifier.starts_with('/')
        || specifier.starts_with('\0')
        || std::path::Path::new(specifier).is_absolute())
}

/// Per-target instructions for the compiler.
#[derive(Debug, Clone)]
pub struct FormatDirectives {
    pub format: Format,
    /// Name the global build installs itself under. `Some` only for global formats.
    pub global_name: Option<String>,
    pub externals: Externals,
    /// External specifier to global variable, for the global build.
    pub globals: FxHashMap<String, String>,
    pub minify: bool,
    pub platform: Platform,
}

/// Everything the compiler needs to produce one artifact.
#[derive(Debug, Clone)]
pub struct CompileRequest {
    pub entry_name: String,
    pub source_path: PathBuf,
    /// Project root, used to resolve packages.
    pub cwd: PathBuf,
    pub directives: FormatDirectives,
}

/// Output of a successful compilation.
#[derive(Debug, Clone, Default)]
pub struct CompiledModule {
    pub code: Vec<u8>,
    /// Non-fatal messages, logged by the caller.
    pub warnings: Vec<String>,
}

impl CompiledModule {
    pub fn new(code: impl Into<Vec<u8>>) -> Self {
        Self {
            code: code.into(),
            warnings: Vec::new(),
        }
    }
}

/// Turns one entry module into code for one format.
///
/// Implementations must be safe to call concurrently for different targets.
#[async_trait]
pub trait Compiler: Send + Sync {
    async fn compile(&self, request: &CompileRequest) -> Result<CompiledModule, CompileError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_bare_externals() {
        let externals = Externals::AllBare;
        assert!(externals.is_external("react"));
        assert!(externals.is_external("@scope/pkg/sub"));
        assert!(externals.is_external("node:fs"));
        assert!(!externals.is_external("./util.js"));
        assert!(!externals.is_external("../shared"));
        assert!(!externals.is_external("/abs/path.js"));
    }

    #[test]
    fn test_listed_externals_match_subpaths() {
        let externals = Externals::Only(vec!["react".to_string()]);
        assert!(externals.is_external("react"));
        assert!(externals.is_external("react/jsx-runtime"));
        assert!(!externals.is_external("react-dom"));
        assert!(!externals.is_external("lodash"));
    }

    #[test]
    fn test_platform_parse() {
        assert_eq!("node".parse::<Platform>().unwrap(), Platform::Node);
        assert_eq!("Browser".parse::<Platform>().unwrap(), Platform::Browser);
        assert!("deno".parse::<Platform>().is_err());
    }
}
