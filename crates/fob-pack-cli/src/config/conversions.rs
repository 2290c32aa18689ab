use crate::config::{EntryConfig, PackConfig};
use fob_pack::{PackOptions, RawEntries};
use std::path::{Path, PathBuf};
use std::time::Duration;

impl From<&EntryConfig> for RawEntries {
    fn from(entry: &EntryConfig) -> Self {
        match entry {
            EntryConfig::Path(path) => RawEntries::Single(PathBuf::from(path)),
            EntryConfig::Named(map) => RawEntries::named(map.iter().map(|(k, v)| (k.clone(), v))),
        }
    }
}

impl PackConfig {
    /// Build packager options rooted at `root`.
    ///
    /// Call [`PackConfig::validate`] first; a missing entry becomes an empty
    /// entry set here and is rejected by the packager.
    pub fn to_pack_options(&self, root: &Path) -> PackOptions {
        let entry = self
            .entry
            .as_ref()
            .map(RawEntries::from)
            .unwrap_or_else(|| RawEntries::named(Vec::<(String, PathBuf)>::new()));

        let mut options = PackOptions::new(entry)
            .root(root)
            .out_dir(&self.out_dir)
            .external(self.external.iter().cloned())
            .globals_map(self.globals.iter().map(|(k, v)| (k.clone(), v.clone())))
            .manifest(self.manifest.clone())
            .platform(self.platform)
            .minify(self.minify)
            .timeout(Duration::from_secs(self.timeout_secs))
            .fail_fast(self.fail_fast);

        options.name = self.name.clone();
        options.file_name = self.file_name.clone().map(Into::into);
        options.formats = self.formats.clone();
        options.max_parallel = self.max_parallel;
        options
    }
}
