use crate::cli::parse_library_name;
use crate::config::{EntryConfig, PackConfig};
use crate::error::{ConfigError, Result};

impl PackConfig {
    /// Validate the merged configuration.
    ///
    /// Catches what can be checked without the filesystem. Entry existence,
    /// the name requirement of the global format and output path collisions
    /// are checked by the packager when the plan is resolved.
    pub fn validate(&self) -> Result<()> {
        match &self.entry {
            None => {
                return Err(ConfigError::MissingField {
                    field: "entry".to_string(),
                    hint: "Pass an entry (fob-pack build src/index.js) or set 'entry' in fob-pack.config.json"
                        .to_string(),
                }
                .into());
            }
            Some(EntryConfig::Path(path)) if path.trim().is_empty() => {
                return Err(ConfigError::InvalidValue {
                    field: "entry".to_string(),
                    value: "\"\"".to_string(),
                    hint: "Entry must be a path to a module".to_string(),
                }
                .into());
            }
            Some(EntryConfig::Named(map)) if map.is_empty() => {
                return Err(ConfigError::InvalidValue {
                    field: "entry".to_string(),
                    value: "{}".to_string(),
                    hint: "Declare at least one named entry".to_string(),
                }
                .into());
            }
            Some(_) => {}
        }

        if let Some(name) = &self.name {
            parse_library_name(name).map_err(|reason| ConfigError::InvalidValue {
                field: "name".to_string(),
                value: name.clone(),
                hint: reason,
            })?;
        }

        if matches!(&self.formats, Some(formats) if formats.is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "formats".to_string(),
                value: "[]".to_string(),
                hint: "Request at least one of: module, commonjs, global".to_string(),
            }
            .into());
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeoutSecs".to_string(),
                value: "0".to_string(),
                hint: "Use a timeout of at least one second".to_string(),
            }
            .into());
        }

        if self.max_parallel == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "maxParallel".to_string(),
                value: "0".to_string(),
                hint: "Allow at least one target at a time".to_string(),
            }
            .into());
        }

        if let Some(pkg) = self.external.iter().find(|pkg| pkg.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "external".to_string(),
                value: format!("{pkg:?}"),
                hint: "External entries must be package names".to_string(),
            }
            .into());
        }

        for (pkg, global) in &self.globals {
            parse_library_name(global).map_err(|reason| ConfigError::InvalidValue {
                field: format!("globals.{pkg}"),
                value: global.clone(),
                hint: reason,
            })?;
        }

        Ok(())
    }
}
