//! Configuration loading with multiple sources.
//!
//! Priority: CLI > environment (`FOB_PACK_*`) > config file > defaults.
//! The config file is `fob-pack.config.json` or `fob-pack.toml` in the
//! project root, or whatever `--config` points at.

mod conversions;
mod defaults;
mod loading;
mod validation;

use fob_pack::{Format, Platform};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use defaults::*;
pub use loading::{CONFIG_FILE_NAMES, ENV_PREFIX, find_config_file};

/// Entry declaration: one path, or logical names mapped to paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryConfig {
    Path(String),
    Named(IndexMap<String, String>),
}

/// Fully merged configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PackConfig {
    /// Entry module(s)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<EntryConfig>,

    /// Library name, required for the global format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Output file name template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// Requested formats; the library default applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formats: Option<Vec<Format>>,

    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external: Vec<String>,

    /// External package to global variable, for the global build
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub globals: IndexMap<String, String>,

    #[serde(default = "default_manifest")]
    pub manifest: String,

    #[serde(default)]
    pub platform: Platform,

    #[serde(default)]
    pub minify: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_parallel: Option<usize>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub fail_fast: bool,

    /// Empty the output directory before building
    #[serde(default)]
    pub clean: bool,
}

impl PackConfig {
    /// Default configuration values.
    pub fn default_config() -> Self {
        Self {
            entry: None,
            name: None,
            file_name: None,
            formats: None,
            out_dir: default_out_dir(),
            external: Vec::new(),
            globals: IndexMap::new(),
            manifest: default_manifest(),
            platform: Platform::default(),
            minify: false,
            max_parallel: None,
            timeout_secs: default_timeout_secs(),
            fail_fast: false,
            clean: false,
        }
    }

    /// Example `fob-pack.config.json` content.
    pub fn example_config() -> String {
        let example = Self {
            entry: Some(EntryConfig::Path("src/index.js".to_string())),
            name: Some("MyLib".to_string()),
            file_name: Some("[name].[format].js".to_string()),
            formats: Some(vec![Format::Module, Format::CommonJs, Format::Global]),
            external: vec!["react".to_string()],
            globals: IndexMap::from([("react".to_string(), "React".to_string())]),
            ..Self::default_config()
        };
        serde_json::to_string_pretty(&example).unwrap_or_default()
    }
}

/// Values that override the lower layers. Unset fields are not serialized,
/// so merging leaves the lower layer's value in place.
///
/// Deserialization also accepts snake_case keys, which is how `FOB_PACK_*`
/// variables arrive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<EntryConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, alias = "file_name", skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formats: Option<Vec<Format>>,
    #[serde(default, alias = "out_dir", skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub globals: Option<IndexMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minify: Option<bool>,
    #[serde(default, alias = "max_parallel", skip_serializing_if = "Option::is_none")]
    pub max_parallel: Option<usize>,
    #[serde(default, alias = "timeout_secs", skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default, alias = "fail_fast", skip_serializing_if = "Option::is_none")]
    pub fail_fast: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clean: Option<bool>,
}
