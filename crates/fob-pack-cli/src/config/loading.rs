use crate::cli::BuildArgs;
use crate::config::{ConfigOverrides, EntryConfig, PackConfig};
use crate::error::{ConfigError, Result};
use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Config files looked up in the project root, in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["fob-pack.config.json", "fob-pack.toml"];

/// Prefix of configuration environment variables (`FOB_PACK_OUT_DIR`, ...).
pub const ENV_PREFIX: &str = "FOB_PACK_";

/// First config file present in `root`, if any.
pub fn find_config_file(root: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
}

impl PackConfig {
    /// Load configuration from every source.
    ///
    /// `config_path` is an explicit file (relative to `root`); it must exist.
    /// Without it, the first of [`CONFIG_FILE_NAMES`] found in `root` is used.
    pub fn load(args: &BuildArgs, root: &Path, config_path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default_config()));

        let config_file = match config_path {
            Some(path) => {
                let path = crate::commands::utils::resolve_path(path, root);
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path).into());
                }
                Some(path)
            }
            None => find_config_file(root),
        };

        if let Some(path) = config_file {
            tracing::debug!(path = %path.display(), "loading config file");
            figment = match path.extension().and_then(|e| e.to_str()) {
                Some("toml") => figment.merge(Toml::file(path)),
                _ => figment.merge(Json::file(path)),
            };
        }

        figment = figment.merge(Serialized::defaults(env_overrides()?));
        figment = figment.merge(Serialized::defaults(Self::overrides_from_args(args)));

        figment.extract().map_err(|e| {
            ConfigError::InvalidValue {
                field: "configuration".to_string(),
                value: e.to_string(),
                hint: "Check the config file syntax and field types".to_string(),
            }
            .into()
        })
    }

    /// CLI arguments as overrides. Flags that were not given stay unset.
    pub(crate) fn overrides_from_args(args: &BuildArgs) -> ConfigOverrides {
        ConfigOverrides {
            entry: args.entry.clone().map(EntryConfig::Path),
            name: args.name.clone(),
            file_name: args.file_name.clone(),
            formats: (!args.formats.is_empty())
                .then(|| args.formats.iter().copied().map(Into::into).collect()),
            out_dir: args.out_dir.clone(),
            external: (!args.external.is_empty()).then(|| args.external.clone()),
            globals: (!args.globals.is_empty()).then(|| args.globals.iter().cloned().collect()),
            manifest: args.manifest.clone(),
            platform: args.platform.map(Into::into),
            minify: args.minify.then_some(true),
            max_parallel: args
                .max_parallel
                .map(|n| usize::try_from(n).unwrap_or(usize::MAX)),
            timeout_secs: args.timeout_secs,
            fail_fast: args.fail_fast.then_some(true),
            clean: args.clean.then_some(true),
        }
    }
}

/// `FOB_PACK_*` variables as overrides.
///
/// Read through a separate figment so snake_case variable names can map onto
/// the camelCase keys of the file layer.
fn env_overrides() -> Result<ConfigOverrides> {
    Figment::from(Env::prefixed(ENV_PREFIX))
        .extract()
        .map_err(|e| {
            ConfigError::InvalidValue {
                field: "environment".to_string(),
                value: e.to_string(),
                hint: format!("Check {ENV_PREFIX}* environment variables"),
            }
            .into()
        })
}
