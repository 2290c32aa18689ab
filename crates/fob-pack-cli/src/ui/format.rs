//! Formatting utilities for sizes, durations, plans and build summaries.

use std::time::Duration;

use fob_pack::{Artifact, BuildPlan};
use owo_colors::OwoColorize;

use super::{colors_enabled, is_quiet};

/// Format a byte count with the most fitting unit.
///
/// ```
/// use fob_pack_cli::ui::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(500), "500 B");
/// assert_eq!(format_size(1536), "1.50 KB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    let mut size = bytes as f64;
    let mut unit_idx = 0;
    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

/// Format a duration as `ms`, seconds, or minutes and seconds.
///
/// ```
/// use std::time::Duration;
/// use fob_pack_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Print one line per artifact and a total to stderr.
pub fn print_build_summary(artifacts: &[Artifact]) {
    if is_quiet() || artifacts.is_empty() {
        return;
    }

    let width = artifacts
        .iter()
        .map(|a| a.output_path().len())
        .max()
        .unwrap_or(0);

    eprintln!();
    for artifact in artifacts {
        let path = format!("{:<width$}", artifact.output_path());
        let size = format_size(artifact.size());
        let label = artifact.target().label().to_string();
        if colors_enabled() {
            eprintln!("  {}  {:>10}  {}", path.cyan(), size, label.dimmed());
        } else {
            eprintln!("  {path}  {size:>10}  {label}");
        }
    }

    let total: u64 = artifacts.iter().map(Artifact::size).sum();
    eprintln!(
        "  {:<width$}  {:>10}",
        format!("{} file(s)", artifacts.len()),
        format_size(total)
    );
    eprintln!();
}

/// Print the resolved targets to stdout, one `label -> path` line each.
pub fn print_plan(plan: &BuildPlan) {
    for target in plan.targets() {
        println!("{} -> {}", target.label(), target.output_path());
    }
    println!("manifest -> {}", plan.manifest_path());
}
