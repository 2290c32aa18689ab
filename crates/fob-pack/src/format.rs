//! Output formats and file name templates.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A module format the packager can emit.
///
/// The declaration order is the canonical order used everywhere a set of
/// formats is listed: plans, emission results and the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// ES module output (`export` statements).
    #[serde(alias = "es", alias = "esm")]
    Module,
    /// CommonJS output (`module.exports`).
    #[serde(alias = "cjs")]
    CommonJs,
    /// Universal output that installs the library under a global name when
    /// no module system is present.
    #[serde(alias = "umd")]
    Global,
}

impl Format {
    /// Every format, in canonical order.
    pub const ALL: [Format; 3] = [Format::Module, Format::CommonJs, Format::Global];

    /// Short token substituted for `[format]` in file name templates.
    pub fn token(self) -> &'static str {
        match self {
            Format::Module => "es",
            Format::CommonJs => "cjs",
            Format::Global => "umd",
        }
    }

    /// Long name used in logs, labels and the manifest.
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Module => "module",
            Format::CommonJs => "commonjs",
            Format::Global => "global",
        }
    }

    /// Whether output in this format refers to the library by its global name.
    pub fn needs_global_name(self) -> bool {
        matches!(self, Format::Global)
    }

    /// Sort and dedupe a list of formats into canonical order.
    pub fn canonicalize(formats: &[Format]) -> Vec<Format> {
        let mut formats = formats.to_vec();
        formats.sort();
        formats.dedup();
        formats
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "es" | "esm" | "module" => Ok(Format::Module),
            "cjs" | "commonjs" => Ok(Format::CommonJs),
            "umd" | "global" => Ok(Format::Global),
            other => Err(ConfigError::InvalidOption {
                option: "formats".to_string(),
                reason: format!(
                    "unknown format '{other}' (expected one of: es, cjs, umd, module, commonjs, global)"
                ),
            }),
        }
    }
}

/// Values available to a file name template.
#[derive(Debug, Clone, Copy)]
pub struct FileNameContext<'a> {
    /// Library base name (lowercased library name), or the entry name when
    /// no library name is configured.
    pub name: &'a str,
    /// Logical entry name.
    pub entry: &'a str,
    /// Target format.
    pub format: Format,
}

/// Signature of a custom file name function.
pub type FileNameFn = dyn Fn(&FileNameContext<'_>) -> String + Send + Sync;

/// Maps an (entry, format) pair to a relative output path.
///
/// Patterns may contain the placeholders `[name]`, `[entry]` and `[format]`.
/// `[format]` expands to the format's short token (`es`, `cjs`, `umd`).
#[derive(Clone)]
pub enum FileNameTemplate {
    Pattern(String),
    Custom(Arc<FileNameFn>),
}

const PLACEHOLDERS: [&str; 3] = ["name", "entry", "format"];

impl FileNameTemplate {
    /// Default pattern for single-entry libraries: `mylib.es.js`.
    pub const SINGLE_ENTRY_DEFAULT: &'static str = "[name].[format].js";
    /// Default pattern for multi-entry libraries: `index.es.js`, `utils.es.js`.
    pub const MULTI_ENTRY_DEFAULT: &'static str = "[entry].[format].js";

    pub fn pattern(pattern: impl Into<String>) -> Self {
        FileNameTemplate::Pattern(pattern.into())
    }

    /// Wrap a closure that computes the output path itself.
    ///
    /// ```
    /// use fob_pack::FileNameTemplate;
    ///
    /// let template = FileNameTemplate::custom(|ctx| format!("{}.{}.js", ctx.name, ctx.format.token()));
    /// # let _ = template;
    /// ```
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&FileNameContext<'_>) -> String + Send + Sync + 'static,
    {
        FileNameTemplate::Custom(Arc::new(f))
    }

    /// Default template for a build with `entry_count` entries.
    pub fn default_for(entry_count: usize) -> Self {
        if entry_count > 1 {
            Self::pattern(Self::MULTI_ENTRY_DEFAULT)
        } else {
            Self::pattern(Self::SINGLE_ENTRY_DEFAULT)
        }
    }

    /// Check that a pattern only uses known placeholders.
    ///
    /// Custom functions are always accepted; their output is validated per
    /// target when the plan is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            FileNameTemplate::Pattern(pattern) => {
                let sample = FileNameContext {
                    name: "name",
                    entry: "entry",
                    format: Format::Module,
                };
                expand(pattern, &sample).map(|_| ())
            }
            FileNameTemplate::Custom(_) => Ok(()),
        }
    }

    /// Produce the raw (not yet normalized) output path for one target.
    pub fn render(&self, ctx: &FileNameContext<'_>) -> Result<String, ConfigError> {
        match self {
            FileNameTemplate::Pattern(pattern) => expand(pattern, ctx),
            FileNameTemplate::Custom(f) => Ok(f(ctx)),
        }
    }

    /// Pattern text, or `<custom>` for functions.
    pub fn describe(&self) -> &str {
        match self {
            FileNameTemplate::Pattern(pattern) => pattern,
            FileNameTemplate::Custom(_) => "<custom>",
        }
    }
}

impl fmt::Debug for FileNameTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileNameTemplate::Pattern(pattern) => f.debug_tuple("Pattern").field(pattern).finish(),
            FileNameTemplate::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<&str> for FileNameTemplate {
    fn from(pattern: &str) -> Self {
        Self::pattern(pattern)
    }
}

impl From<String> for FileNameTemplate {
    fn from(pattern: String) -> Self {
        Self::pattern(pattern)
    }
}

fn expand(pattern: &str, ctx: &FileNameContext<'_>) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidTemplate {
        template: pattern.to_string(),
        reason,
    };

    let mut out = String::with_capacity(pattern.len() + 16);
    let mut rest = pattern;

    while let Some(open) = rest.find('[') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after
            .find(']')
            .ok_or_else(|| invalid("unterminated '[' placeholder".to_string()))?;
        let placeholder = &after[..close];
        match placeholder {
            "name" => out.push_str(ctx.name),
            "entry" => out.push_str(ctx.entry),
            "format" => out.push_str(ctx.format.token()),
            other => {
                return Err(invalid(format!(
                    "unknown placeholder '[{other}]' (supported: {})",
                    PLACEHOLDERS
                        .iter()
                        .map(|p| format!("[{p}]"))
                        .collect::<Vec<_>>()
                        .join(", ")
                )));
            }
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);

    Ok(out)
}
