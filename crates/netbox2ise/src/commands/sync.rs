//! `sync`: create and update ISE groups and devices to match NetBox.

use serde::Serialize;
use tabled::Tabled;
use tracing::{info, warn};

use netbox2ise_core::SyncReport;

use crate::cli::{GlobalOpts, SyncArgs};
use crate::error::CliError;
use crate::output;

use super::Session;

#[derive(Debug, Serialize)]
pub struct SyncOutput {
    pub groups: SyncReport,
    pub devices: SyncReport,
}

impl SyncOutput {
    fn failures(&self) -> usize {
        self.groups.failures() + self.devices.failures()
    }
}

#[derive(Tabled)]
struct WriteRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Action")]
    action: &'static str,
    #[tabled(rename = "Result")]
    outcome: String,
    #[tabled(rename = "Message")]
    message: String,
}

fn write_rows(report: &SyncReport, color: bool) -> Vec<WriteRow> {
    [
        ("create", &report.created),
        ("update", &report.updated),
        ("delete", &report.deleted),
    ]
    .into_iter()
    .flat_map(|(action, results)| {
        results.iter().map(move |(name, result)| WriteRow {
            name: name.clone(),
            action,
            outcome: output::paint_outcome(result.success, color),
            message: result.message.clone(),
        })
    })
    .collect()
}

fn render_section(kind: &str, report: &SyncReport, color: bool) -> String {
    if report.is_empty() {
        return format!("No changes to {kind} made.");
    }
    output::render_table(&write_rows(report, color))
}

fn render_table(out: &SyncOutput, color: bool) -> String {
    [
        render_section("groups", &out.groups, color),
        render_section("devices", &out.devices, color),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: &SyncArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut session = Session::open(global)?;
    let run = session.reconcile()?;

    if run.result.is_in_sync() {
        info!("ISE already in sync with NetBox");
    }

    let groups = session.backend.sync_groups(
        &run.current_groups,
        &run.result.groups,
        &session.datafile.group_description,
        args.remove_extra,
    );
    let devices = session
        .backend
        .sync_devices(&run.result.devices, args.remove_extra);
    session.backend.flush()?;

    let out = SyncOutput { groups, devices };
    let color = output::should_color(global.color);
    let rendered = output::render_report(global.output, &out, |o| render_table(o, color))?;
    output::print_output(&rendered, global.quiet);

    match out.failures() {
        0 => Ok(()),
        count => {
            warn!(count, "sync finished with failed writes");
            Err(CliError::SyncFailures { count })
        }
    }
}

#[cfg(test)]
mod tests {
    use netbox2ise_core::WriteResult;

    use super::*;

    #[test]
    fn empty_report_prints_no_changes() {
        let out = SyncOutput {
            groups: SyncReport::default(),
            devices: SyncReport::default(),
        };
        assert_eq!(
            render_table(&out, false),
            "No changes to groups made.\nNo changes to devices made."
        );
    }

    #[test]
    fn failed_writes_are_counted_and_listed() {
        let mut devices = SyncReport::default();
        devices
            .created
            .insert("SW1".into(), WriteResult::ok("SW1 created"));
        devices.updated.insert(
            "SW2".into(),
            WriteResult {
                success: false,
                message: "Update failed for SW2: device not found".into(),
            },
        );
        let out = SyncOutput {
            groups: SyncReport::default(),
            devices,
        };
        assert_eq!(out.failures(), 1);
        let table = render_table(&out, false);
        assert!(table.contains("SW1 created"));
        assert!(table.contains("failed"));
    }
}
