//! Library identity: the global name the library is exposed under.

use std::fmt;

use crate::error::ConfigError;

/// Name of the library as seen from a non-module environment.
///
/// Must be a valid JavaScript identifier:
/// - Must start with a letter, underscore, or dollar sign
/// - Can contain letters, numbers, underscores, or dollar signs
///
/// Valid: `MyLib`, `_internal`, `$jquery`, `lib123`.
/// Invalid: `123abc`, `my-lib`, `my.lib`, `""`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LibraryIdentity {
    name: String,
}

impl LibraryIdentity {
    pub fn new(name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        validate_identifier(&name)?;
        Ok(Self { name })
    }

    /// The global variable name, exactly as configured.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lowercased name used as the default file base name (`MyLib` -> `mylib`).
    pub fn base_name(&self) -> String {
        self.name.to_lowercase()
    }
}

impl fmt::Display for LibraryIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn validate_identifier(name: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidLibraryName {
        name: name.to_string(),
        reason,
    };

    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(invalid("library name cannot be empty".to_string()));
    };

    if !first.is_alphabetic() && first != '_' && first != '$' {
        return Err(invalid(format!(
            "must start with a letter, underscore, or dollar sign (got '{first}')"
        )));
    }

    if let Some(c) = chars.find(|c| !c.is_alphanumeric() && *c != '_' && *c != '$') {
        return Err(invalid(format!("invalid character '{c}' in identifier")));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        for name in ["MyLib", "_internal", "$jquery", "lib123", "Ünicode"] {
            assert!(LibraryIdentity::new(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn test_invalid_identifiers() {
        for name in ["", "123abc", "my-lib", "my.lib", "my lib"] {
            let err = LibraryIdentity::new(name).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidLibraryName { .. }),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn test_base_name_is_lowercased() {
        let identity = LibraryIdentity::new("MyLib").unwrap();
        assert_eq!(identity.name(), "MyLib");
        assert_eq!(identity.base_name(), "mylib");
    }
}
