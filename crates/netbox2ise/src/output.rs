//! Output formatting: table, JSON, YAML.
//!
//! Table uses `tabled`, structured formats use serde over the report types.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use strum::IntoEnumIterator;
use tabled::{Table, Tabled, settings::Style};

use netbox2ise_core::reconcile::{FieldChange, Status, StatusCounts};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Status label, coloured when `color` is set.
pub fn paint_status(status: Status, color: bool) -> String {
    let label = status.to_string();
    if !color {
        return label;
    }
    match status {
        Status::Correct => label.blue().to_string(),
        Status::Incorrect => label.yellow().to_string(),
        Status::Missing => label.red().to_string(),
        Status::Extra => label.purple().to_string(),
    }
}

/// Success marker for a write result.
pub fn paint_outcome(success: bool, color: bool) -> String {
    match (success, color) {
        (true, true) => "ok".green().to_string(),
        (true, false) => "ok".into(),
        (false, true) => "failed".red().to_string(),
        (false, false) => "failed".into(),
    }
}

/// `5 correct, 1 incorrect, 0 missing, 2 extra`
pub fn summarize(counts: &StatusCounts, color: bool) -> String {
    Status::iter()
        .map(|status| format!("{} {}", counts.get(status), paint_status(status, color)))
        .collect::<Vec<_>>()
        .join(", ")
}

// ── Cell formatting ──────────────────────────────────────────────────

/// One line per field change, secrets masked.
pub fn format_changes(changes: &[FieldChange]) -> String {
    changes
        .iter()
        .map(|change| {
            let change = change.redacted();
            format!(
                "{}: {} -> {}",
                change.path,
                display_value(change.current.as_ref()),
                display_value(change.desired.as_ref()),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn display_value(value: Option<&serde_json::Value>) -> String {
    match value {
        None => "-".into(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// `+group` for memberships to add, `-group` for memberships to drop.
pub fn format_group_cell(missing: &[String], extra: &[String]) -> String {
    missing
        .iter()
        .map(|g| format!("+{g}"))
        .chain(extra.iter().map(|g| format!("-{g}")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Set contents in name order.
pub fn sorted<'a>(set: impl IntoIterator<Item = &'a String>) -> Vec<String> {
    let mut names: Vec<String> = set.into_iter().cloned().collect();
    names.sort();
    names
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a report in the chosen format. Table rendering uses `table_fn`,
/// since reports print several tables and summary lines.
pub fn render_report<T>(
    format: OutputFormat,
    data: &T,
    table_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize,
{
    match format {
        OutputFormat::Table => Ok(table_fn(data)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(data)?),
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

pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use netbox2ise_core::FieldPath;
    use serde_json::Value;

    use super::*;

    #[test]
    fn secrets_are_masked_in_change_cells() {
        let changes = vec![
            FieldChange {
                path: FieldPath::Description,
                current: Some(Value::from("old")),
                desired: Some(Value::from("new")),
            },
            FieldChange {
                path: FieldPath::TacacsSharedSecret,
                current: None,
                desired: Some(Value::from("hunter2")),
            },
        ];
        let cell = format_changes(&changes);
        assert!(cell.contains("description: old -> new"));
        assert!(!cell.contains("hunter2"));
        assert!(cell.contains("tacacsSettings.sharedSecret: - -> ********"));
    }

    #[test]
    fn group_cell_lists_additions_then_removals() {
        let missing = sorted(&["B#1".to_owned(), "A#1".to_owned()]);
        let cell = format_group_cell(&missing, &["Z#1".to_owned()]);
        assert_eq!(cell, "+A#1\n+B#1\n-Z#1");
    }

    #[test]
    fn summary_without_color_is_plain() {
        let counts = StatusCounts {
            correct: 3,
            incorrect: 1,
            missing: 0,
            extra: 2,
        };
        assert_eq!(
            summarize(&counts, false),
            "3 correct, 1 incorrect, 0 missing, 2 extra"
        );
    }

    #[test]
    fn summary_lists_every_status() {
        let line = summarize(&StatusCounts::default(), false);
        for status in Status::iter() {
            assert!(line.contains(&format!("0 {status}")), "{line}");
        }
        assert_eq!(line.matches(", ").count(), Status::iter().count() - 1);
    }
}
