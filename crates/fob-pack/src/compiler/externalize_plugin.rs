//! Rolldown plugin that keeps external imports out of the bundle.
//!
//! Runs in `resolve_id` so the decision is made on the raw specifier, before
//! Rolldown tries to locate the package on disk. Module and CommonJS builds
//! externalize every bare specifier; the global build only the configured list.

use std::borrow::Cow;

use rolldown_common::ResolvedExternal;
use rolldown_plugin::{
    HookResolveIdArgs, HookResolveIdOutput, HookResolveIdReturn, HookUsage, Plugin, PluginContext,
};
use tracing::trace;

use super::Externals;

#[derive(Debug, Clone)]
pub struct ExternalizePlugin {
    externals: Externals,
}

impl ExternalizePlugin {
    pub fn new(externals: Externals) -> Self {
        Self { externals }
    }
}

impl Plugin for ExternalizePlugin {
    fn name(&self) -> Cow<'static, str> {
        "fob-pack-externalize".into()
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::ResolveId
    }

    fn resolve_id(
        &self,
        _ctx: &PluginContext,
        args: &HookResolveIdArgs,
    ) -> impl std::future::Future<Output = HookResolveIdReturn> + Send {
        let specifier = args.specifier.to_string();
        let external = self.externals.is_external(&specifier);

        async move {
            if !external {
                // Let Rolldown resolve and inline it
                return Ok(None);
            }

            trace!(specifier = %specifier, "externalizing import");
            Ok(Some(HookResolveIdOutput {
                id: specifier.into(),
                external: Some(ResolvedExternal::Bool(true)),
                ..Default::default()
            }))
        }
    }
}
