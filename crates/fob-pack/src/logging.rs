//! Logging utilities for fob-pack
//!
//! This module is only available with the `logging` feature.
//!
//! fob-pack itself only emits `tracing` events. Applications either install
//! their own subscriber or use [`init_logging`], which scopes the level to
//! fob-pack and keeps Rolldown at warnings.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log level for packaging output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Silent,
    Error,
    /// Compiler warnings included
    Warn,
    /// Per-build progress
    #[default]
    Info,
    /// Resolved entries, the plan and every emitted artifact
    Debug,
    /// Externalization decisions
    Trace,
}

impl LogLevel {
    /// Filter directives for this level.
    ///
    /// Other crates stay at `warn` unless the level is stricter than that.
    pub fn directives(self) -> String {
        match self {
            LogLevel::Silent => "off".to_string(),
            LogLevel::Error => "error".to_string(),
            level => format!("warn,fob_pack={level}"),
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "off" => Ok(LogLevel::Silent),
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("Invalid log level: {}", other)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LogLevel::Silent => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        })
    }
}

/// Install a compact stderr subscriber at `level`. `RUST_LOG` is ignored.
///
/// Only the first subscriber installed in a process takes effect.
pub fn init_logging(level: LogLevel) {
    install(EnvFilter::new(level.directives()));
}

/// Like [`init_logging`], but honours `RUST_LOG` and falls back to `Info`.
pub fn init_logging_from_env() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(LogLevel::Info.directives()));
    install(filter);
}

fn install(filter: EnvFilter) {
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_target(false).without_time())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_from_str() {
        assert_eq!("debug".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("TRACE".parse::<LogLevel>().unwrap(), LogLevel::Trace);
        assert_eq!("off".parse::<LogLevel>().unwrap(), LogLevel::Silent);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_directives_scope_to_crate() {
        assert_eq!(LogLevel::Debug.directives(), "warn,fob_pack=debug");
        assert_eq!(LogLevel::Error.directives(), "error");
        assert_eq!(LogLevel::Silent.directives(), "off");
        for level in [LogLevel::Error, LogLevel::Info, LogLevel::Trace] {
            let _ = EnvFilter::new(level.directives());
        }
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_logging(LogLevel::Silent);
        init_logging_from_env();
    }
}
