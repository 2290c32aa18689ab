//! Logging setup for the fob-pack CLI.
//!
//! Built on `tracing-subscriber`. `--verbose` shows per-target debug events
//! from the packager, `--quiet` keeps errors only, otherwise `RUST_LOG` is
//! honoured with an info-level fallback.
//!
//! ```rust,no_run
//! use fob_pack_cli::logger::init_logger;
//! use tracing::info;
//!
//! init_logger(false, false, false);
//! info!("starting build");
//! ```

use fob_pack::LogLevel;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
///
/// Priority: `--verbose`, then `--quiet`, then `RUST_LOG`, then the default
/// info filter. Calling it twice is harmless; the second call is ignored.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(filter_for(verbose, quiet), no_color);
}

/// Initialize with an explicit filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && crate::ui::should_use_color())
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

/// The packager's directives for `level`, extended to this crate.
fn directives(level: LogLevel) -> String {
    match level {
        LogLevel::Silent => level.directives(),
        level => format!("{},fob_pack_cli={level}", level.directives()),
    }
}

fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(directives(LogLevel::Debug))
    } else if quiet {
        EnvFilter::new(directives(LogLevel::Error))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(directives(LogLevel::Info)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directives_include_cli_crate() {
        assert_eq!(
            directives(LogLevel::Debug),
            "warn,fob_pack=debug,fob_pack_cli=debug"
        );
        assert_eq!(directives(LogLevel::Info), "warn,fob_pack=info,fob_pack_cli=info");
        assert_eq!(directives(LogLevel::Error), "error,fob_pack_cli=error");
        assert_eq!(directives(LogLevel::Silent), "off");
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_logger(false, true, true);
        init_logger(true, false, true);
    }
}
