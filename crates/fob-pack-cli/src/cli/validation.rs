use fob_pack::LibraryIdentity;

/// Parse and validate a library name.
///
/// The name becomes the global variable of the UMD build, so it must be a
/// valid JavaScript identifier.
///
/// Valid: MyLib, _internal, $jquery, lib123
/// Invalid: 123abc, my-lib, my.lib, ""
pub fn parse_library_name(s: &str) -> Result<String, String> {
    LibraryIdentity::new(s)
        .map(|identity| identity.name().to_string())
        .map_err(|e| e.to_string())
}

/// Parse a `package=Global` mapping for `--global`.
pub fn parse_global_mapping(s: &str) -> Result<(String, String), String> {
    let Some((package, global)) = s.split_once('=') else {
        return Err(format!("expected PACKAGE=GLOBAL, got '{s}'"));
    };

    let package = package.trim();
    if package.is_empty() {
        return Err(format!("missing package name in '{s}'"));
    }

    let global = parse_library_name(global.trim())?;
    Ok((package.to_string(), global))
}
