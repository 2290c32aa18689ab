//! [`Compiler`] backed by Rolldown.
//!
//! Each request is an isolated Rolldown build with a single input. Dynamic
//! imports are inlined so every target yields exactly one file.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use rolldown::{
    BundlerBuilder, BundlerOptions, GlobalsOutputOption, InputItem, OutputFormat, RawMinifyOptions,
    ResolveOptions,
};
use rolldown_common::Output;
use rolldown_plugin::__inner::SharedPluginable;
use tracing::debug;

use super::{
    CompileRequest, CompiledModule, Compiler, ExternalizePlugin, FormatDirectives, Platform,
};
use crate::error::CompileError;
use crate::format::Format;

/// Compiles targets with an in-process Rolldown bundler.
#[derive(Debug, Clone, Default)]
pub struct RolldownCompiler {
    _private: (),
}

impl RolldownCompiler {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Compiler for RolldownCompiler {
    async fn compile(&self, request: &CompileRequest) -> Result<CompiledModule, CompileError> {
        let options = bundler_options(request);
        let plugins: Vec<SharedPluginable> = vec![Arc::new(ExternalizePlugin::new(
            request.directives.externals.clone(),
        ))];

        debug!(
            entry = %request.entry_name,
            format = %request.directives.format,
            "invoking rolldown"
        );

        let mut bundler = BundlerBuilder::default()
            .with_options(options)
            .with_plugins(plugins)
            .build()
            .map_err(|e| from_rolldown_error(&e))?;

        let output = bundler
            .generate()
            .await
            .map_err(|e| from_rolldown_error(&e))?;

        let code = output
            .assets
            .iter()
            .find_map(|asset| match asset {
                Output::Chunk(chunk) if chunk.is_entry => Some(chunk.code.clone()),
                _ => None,
            })
            .ok_or_else(|| {
                CompileError::failed(format!(
                    "rolldown produced no entry chunk for '{}'",
                    request.source_path.display()
                ))
            })?;

        Ok(CompiledModule {
            code: code.into_bytes(),
            warnings: output.warnings.iter().map(|w| format!("{w:?}")).collect(),
        })
    }
}

fn bundler_options(request: &CompileRequest) -> BundlerOptions {
    let directives = &request.directives;

    let mut options = BundlerOptions {
        input: Some(vec![InputItem {
            name: Some(request.entry_name.clone()),
            import: request.source_path.to_string_lossy().into_owned(),
        }]),
        cwd: Some(request.cwd.clone()),
        format: Some(output_format(directives.format)),
        platform: Some(match directives.platform {
            Platform::Browser => rolldown::Platform::Browser,
            Platform::Node => rolldown::Platform::Node,
        }),
        inline_dynamic_imports: Some(true),
        resolve: Some(resolve_options(&request.cwd, directives)),
        ..Default::default()
    };

    if let Some(name) = &directives.global_name {
        options.name = Some(name.clone());
    }

    // Globals only matter for the global build
    if directives.format == Format::Global && !directives.globals.is_empty() {
        options.globals = Some(GlobalsOutputOption::from(directives.globals.clone()));
    }

    if directives.minify {
        options.minify = Some(RawMinifyOptions::from(true));
    }

    options
}

fn output_format(format: Format) -> OutputFormat {
    match format {
        Format::Module => OutputFormat::Esm,
        Format::CommonJs => OutputFormat::Cjs,
        Format::Global => OutputFormat::Umd,
    }
}

/// Node-style package lookup from `cwd` upwards, with platform export conditions.
fn resolve_options(cwd: &Path, directives: &FormatDirectives) -> ResolveOptions {
    let mut modules: Vec<String> = cwd
        .ancestors()
        .map(|dir| dir.join("node_modules").to_string_lossy().into_owned())
        .collect();
    modules.push("node_modules".to_string());

    let (conditions, main_fields): (&[&str], &[&str]) = match directives.platform {
        Platform::Node => (&["node", "import", "module", "default"], &["module", "main"]),
        Platform::Browser => (
            &["browser", "import", "module", "default"],
            &["browser", "module", "main"],
        ),
    };

    ResolveOptions {
        main_fields: Some(main_fields.iter().map(|s| s.to_string()).collect()),
        condition_names: Some(conditions.iter().map(|s| s.to_string()).collect()),
        extensions: Some(
            [".js", ".mjs", ".cjs", ".json", ".ts", ".tsx", ".jsx"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        ),
        modules: Some(modules),
        symlinks: Some(true),
        ..Default::default()
    }
}

/// Rolldown errors are reported through their debug representation, which
/// carries every batched diagnostic.
fn from_rolldown_error(error: &dyn std::fmt::Debug) -> CompileError {
    CompileError::Failed {
        diagnostics: vec![format!("{error:?}")],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::Externals;
    use rustc_hash::FxHashMap;
    use std::path::PathBuf;

    fn request(format: Format, global_name: Option<&str>) -> CompileRequest {
        let mut globals = FxHashMap::default();
        globals.insert("react".to_string(), "React".to_string());
        CompileRequest {
            entry_name: "mylib".to_string(),
            source_path: PathBuf::from("/project/src/index.js"),
            cwd: PathBuf::from("/project"),
            directives: FormatDirectives {
                format,
                global_name: global_name.map(str::to_string),
                externals: Externals::Only(vec!["react".to_string()]),
                globals,
                minify: false,
                platform: Platform::Browser,
            },
        }
    }

    #[test]
    fn test_output_format_mapping() {
        assert!(matches!(output_format(Format::Module), OutputFormat::Esm));
        assert!(matches!(output_format(Format::CommonJs), OutputFormat::Cjs));
        assert!(matches!(output_format(Format::Global), OutputFormat::Umd));
    }

    #[test]
    fn test_global_build_options() {
        let options = bundler_options(&request(Format::Global, Some("MyLib")));
        assert_eq!(options.name.as_deref(), Some("MyLib"));
        assert!(options.globals.is_some());
        assert!(options.minify.is_none());
    }

    #[test]
    fn test_module_build_has_no_globals() {
        let options = bundler_options(&request(Format::Module, None));
        assert!(options.name.is_none());
        assert!(options.globals.is_none());
    }

    #[test]
    fn test_resolve_walks_ancestors() {
        let resolve = resolve_options(Path::new("/a/b"), &request(Format::Module, None).directives);
        let modules = resolve.modules.unwrap();
        assert_eq!(modules.first().map(String::as_str), Some("/a/b/node_modules"));
        assert!(modules.contains(&"/node_modules".to_string()));
    }
}
