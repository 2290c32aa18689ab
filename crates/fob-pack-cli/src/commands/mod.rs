//! Command implementations.
//!
//! - [`build`] - build every target and write the manifest
//! - [`plan`] - print the resolved targets

pub mod build;
pub mod plan;
pub(crate) mod utils;

pub use build::execute as build_execute;
pub use plan::execute as plan_execute;
