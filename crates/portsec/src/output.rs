//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one value per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use portsec_core::{LogEntry, LogLevel};

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled on stderr.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table and plain both use `text_fn`; single results are free text.
pub fn render_single<T>(format: &OutputFormat, data: &T, text_fn: impl Fn(&T) -> String) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table | OutputFormat::Plain => text_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Print session log entries to stderr.
pub fn print_log(entries: &[LogEntry], color: bool) {
    let mut stderr = io::stderr().lock();
    for entry in entries {
        let line = format_log_line(entry, color);
        let _ = writeln!(stderr, "{line}");
    }
}

pub fn format_log_line(entry: &LogEntry, color: bool) -> String {
    let stamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S");
    let level = format!("{:<5}", entry.level);
    if !color {
        return format!("{stamp} {level} {}", entry.message);
    }
    match entry.level {
        LogLevel::Info => format!("{} {} {}", stamp.dimmed(), level.cyan(), entry.message),
        LogLevel::Error => format!("{} {} {}", stamp.dimmed(), level.red().bold(), entry.message),
    }
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.unwrap_or_else(|e| format!("{{\"error\":\"serialization failed: {e}\"}}"))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_else(|e| format!("error: serialization failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use portsec_core::ExecutionResult;

    #[test]
    fn single_result_formats() {
        let result = ExecutionResult::ok("Port security cleared on Gi0/1");
        assert_eq!(
            render_single(&OutputFormat::JsonCompact, &result, |r| r.output.clone()),
            r#"{"success":true,"output":"Port security cleared on Gi0/1"}"#
        );
        assert_eq!(
            render_single(&OutputFormat::Plain, &result, |r| r.output.clone()),
            "Port security cleared on Gi0/1"
        );
        assert!(render_single(&OutputFormat::Yaml, &result, |r| r.output.clone()).contains("success: true"));
    }

    #[test]
    fn uncolored_log_line() {
        let entry = LogEntry::new(LogLevel::Error, "Action failed: boom");
        let line = format_log_line(&entry, false);
        assert!(line.ends_with("ERROR Action failed: boom"));
    }
}
