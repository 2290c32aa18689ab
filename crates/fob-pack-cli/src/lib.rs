//! Fob pack CLI - multi-format library builds from the command line.
//!
//! This crate wraps `fob-pack` with argument parsing, layered configuration
//! and terminal output.
//!
//! # Architecture
//!
//! - [`cli`] - clap definitions for `fob-pack build` and `fob-pack plan`
//! - [`config`] - `fob-pack.config.json` / `fob-pack.toml` / `FOB_PACK_*` loading
//! - [`commands`] - command implementations
//! - [`error`] - error types with actionable hints
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - status lines and formatting
//!
//! # Example
//!
//! ```rust,no_run
//! use fob_pack_cli::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, ConfigError, Result, ResultExt};
