use std::path::PathBuf;

pub fn default_out_dir() -> PathBuf {
    PathBuf::from("dist")
}

pub fn default_manifest() -> String {
    fob_pack::manifest::DEFAULT_MANIFEST_FILE.to_string()
}

pub fn default_timeout_secs() -> u64 {
    fob_pack::emit::DEFAULT_TIMEOUT.as_secs()
}
