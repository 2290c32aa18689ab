#![cfg_attr(docsrs, feature(doc_cfg))]

//! # fob-pack
//!
//! Multi-format library packaging on top of Rolldown.
//!
//! One source tree goes in; one file per (entry, format) pair comes out,
//! plus a manifest describing every artifact. Supported formats are ES
//! modules, CommonJS and a universal global build that installs the library
//! under its name when no module system is present.
//!
//! The build runs in four forward-only stages:
//!
//! 1. [`entry::resolve`] validates entry points against the filesystem
//! 2. [`plan::build_plan`] expands entries × formats into [`BuildTarget`]s
//! 3. [`EmissionCoordinator`] compiles and writes every target concurrently
//! 4. [`ManifestWriter`] records the artifacts once everything succeeded
//!
//! ## Quick Start
//!
//! ```no_run
//! use fob_pack::{Format, PackOptions};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = PackOptions::new("src/index.js")
//!     .name("MyLib")
//!     .formats([Format::Module, Format::CommonJs, Format::Global])
//!     .out_dir("dist")
//!     .build()
//!     .await?;
//!
//! // dist/mylib.es.js, dist/mylib.cjs.js, dist/mylib.umd.js, dist/manifest.json
//! for artifact in &report.artifacts {
//!     println!("{} ({} bytes)", artifact.output_path(), artifact.size());
//! }
//! # Ok(()) }
//! ```
//!
//! ## Custom compilers
//!
//! The packager only decides *what* to build. Compilation goes through the
//! [`Compiler`] trait; [`RolldownCompiler`] is used by [`PackOptions::build`],
//! and [`build`] accepts any other implementation.

pub mod compiler;
pub mod emit;
pub mod entry;
pub mod error;
pub mod format;
pub mod identity;
pub mod manifest;
pub mod options;
pub mod output;
pub mod pipeline;
pub mod plan;

pub use compiler::{
    CompileRequest, CompiledModule, Compiler, Externals, FormatDirectives, Platform,
    RolldownCompiler,
};
pub use emit::{EmissionCoordinator, EmitSettings};
pub use entry::{EntryPoint, RawEntries};
pub use error::{
    BuildError, CompileError, ConfigError, EmitError, EmitErrorKind, ErrorKind, Result,
    TargetLabel,
};
pub use format::{FileNameContext, FileNameTemplate, Format};
pub use identity::LibraryIdentity;
pub use manifest::{Manifest, ManifestEntry, ManifestWriter};
pub use options::PackOptions;
pub use output::Artifact;
pub use pipeline::{BuildReport, ResolvedPlan, build, resolve_plan};
pub use plan::{BuildPlan, BuildTarget};

// Logging utilities (optional, enabled with "logging" feature)
#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub mod logging;

#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub use logging::{LogLevel, init_logging, init_logging_from_env};
