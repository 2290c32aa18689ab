//! Output handling: artifacts, path validation and atomic writes.

mod artifact;
pub mod writer;

pub use artifact::Artifact;
