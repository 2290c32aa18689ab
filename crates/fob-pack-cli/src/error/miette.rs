//! Conversion of CLI errors into miette reports.

use crate::error::CliError;
use fob_pack::BuildError;
use miette::{Diagnostic, Report};
use std::fmt;

/// Report carrying the error kind, the message and the packager's help text.
#[derive(Debug, thiserror::Error)]
#[error("{kind}: {message}")]
struct PackReport {
    kind: &'static str,
    message: String,
    code: Option<String>,
    help: Option<String>,
}

impl Diagnostic for PackReport {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.code
            .as_ref()
            .map(|code| Box::new(code) as Box<dyn fmt::Display + 'a>)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|help| Box::new(help) as Box<dyn fmt::Display + 'a>)
    }
}

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Pack(e) => pack_error_to_miette(e),
        other => miette::miette!("{}", other),
    }
}

/// Convert a packager error to a report naming its kind.
///
/// Emission failures lead with the primary failing target; the remaining
/// failures are listed after it.
pub fn pack_error_to_miette(err: BuildError) -> Report {
    let kind = err.kind().as_str();
    let code = err.code().map(|c| c.to_string());
    let help = err.help().map(|h| h.to_string());

    let message = match &err {
        BuildError::Emission { failures } if failures.len() > 1 => {
            let mut message = err.to_string();
            for failure in failures.iter().skip(1) {
                message.push_str(&format!("\n  also: {failure}"));
            }
            message
        }
        _ => err.to_string(),
    };

    Report::new(PackReport {
        kind,
        message,
        code,
        help,
    })
}
