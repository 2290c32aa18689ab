use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::cli::enums::{FormatArg, PlatformArg};
use crate::cli::validation::{parse_global_mapping, parse_library_name};

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the library in every requested format
    ///
    /// Writes one file per (entry, format) pair plus a manifest. The exit
    /// status is zero only when every target and the manifest were written.
    Build(BuildArgs),

    /// Print the resolved build targets without compiling anything
    Plan(BuildArgs),
}

/// Arguments shared by `build` and `plan`
///
/// Every option here overrides the same key from the config file and the
/// `FOB_PACK_*` environment.
#[derive(Args, Debug, Default, Clone)]
pub struct BuildArgs {
    /// Entry module of the library
    ///
    /// Overrides `entry` from the config file. Use the config file to declare
    /// several named entries.
    #[arg(value_name = "ENTRY")]
    pub entry: Option<String>,

    /// Library name, required for the global (UMD) format
    ///
    /// Must be a valid JavaScript identifier. Output file names use its
    /// lowercase form.
    ///
    /// Example: --name MyLib
    #[arg(short, long, value_parser = parse_library_name, value_name = "NAME")]
    pub name: Option<String>,

    /// Output formats to build (repeatable)
    ///
    /// - es: ES module (import/export)
    /// - cjs: CommonJS (require/module.exports)
    /// - umd: universal build, also usable from a script tag
    ///
    /// Examples:
    ///   --format es --format umd
    ///   --format es,cjs,umd
    #[arg(short = 'f', long = "format", value_enum, value_delimiter = ',', value_name = "FORMAT")]
    pub formats: Vec<FormatArg>,

    /// Output file name template
    ///
    /// Placeholders: [name] (lowercase library name), [entry], [format]
    /// (es/cjs/umd). Must produce a different path for every target.
    ///
    /// Example: --file-name "[name].[format].js"
    #[arg(long, value_name = "TEMPLATE")]
    pub file_name: Option<String>,

    /// Output directory (default: dist)
    #[arg(short = 'd', long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Packages the global build should leave to the page (repeatable)
    ///
    /// ES module and CommonJS builds always leave bare package imports external.
    ///
    /// Example: --external react --external react-dom
    #[arg(short, long, value_delimiter = ',', value_name = "PACKAGE")]
    pub external: Vec<String>,

    /// Global variable for an external package in the global build (repeatable)
    ///
    /// Example: --global react=React
    #[arg(short, long = "global", value_parser = parse_global_mapping, value_name = "PACKAGE=GLOBAL")]
    pub globals: Vec<(String, String)>,

    /// Manifest file name inside the output directory (default: manifest.json)
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<String>,

    /// Target platform forwarded to the compiler
    #[arg(long, value_enum)]
    pub platform: Option<PlatformArg>,

    /// Minify every output
    #[arg(short = 'm', long)]
    pub minify: bool,

    /// Maximum number of targets compiled at once
    #[arg(short = 'j', long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub max_parallel: Option<u64>,

    /// Per-target timeout in seconds (default: 120)
    #[arg(long = "timeout", value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,

    /// Stop starting new targets after the first failure
    #[arg(long)]
    pub fail_fast: bool,

    /// Empty the output directory before building
    #[arg(long)]
    pub clean: bool,

    /// Config file (default: fob-pack.config.json or fob-pack.toml in the project root)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Project root; relative paths resolve against it (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,
}
