//! `verify`: report drift between NetBox and ISE without writing.

use serde::Serialize;
use tabled::Tabled;
use tracing::info;

use netbox2ise_core::reconcile::{
    DevicePlan, FieldChange, GroupReconciliation, Reconciliation, Status, StatusCounts,
};

use crate::cli::{GlobalOpts, VerifyArgs};
use crate::error::CliError;
use crate::output;

use super::{Run, Session};

// ── Report ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct VerifyReport {
    pub in_sync: bool,
    pub devices: DeviceSection,
    pub groups: GroupSection,
}

#[derive(Debug, Serialize)]
pub struct DeviceSection {
    pub counts: StatusCounts,
    pub entries: Vec<DeviceEntry>,
}

#[derive(Debug, Serialize)]
pub struct DeviceEntry {
    pub name: String,
    pub status: Status,
    /// ISE name when the device was paired by IP under another name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<FieldChange>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_groups: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_groups: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct GroupSection {
    pub counts: StatusCounts,
    pub entries: Vec<GroupEntry>,
}

#[derive(Debug, Serialize)]
pub struct GroupEntry {
    pub name: String,
    pub status: Status,
}

impl VerifyReport {
    pub fn from_run(run: &Run) -> Self {
        let Reconciliation { groups, devices } = &run.result;

        let plan_entry = |plan: &DevicePlan, status: Status| DeviceEntry {
            name: plan.desired.name.clone(),
            status,
            current_name: plan
                .current_name()
                .filter(|_| plan.is_rename())
                .map(str::to_owned),
            job: run.desired.source_of(&plan.desired.name).map(str::to_owned),
            changes: plan.changes.iter().map(FieldChange::redacted).collect(),
            missing_groups: output::sorted(&plan.groups.missing),
            extra_groups: output::sorted(&plan.groups.extra),
        };

        let mut entries: Vec<DeviceEntry> = Vec::new();
        entries.extend(devices.incorrect.values().map(|p| plan_entry(p, Status::Incorrect)));
        entries.extend(devices.missing.values().map(|p| plan_entry(p, Status::Missing)));
        entries.extend(devices.correct.values().map(|p| plan_entry(p, Status::Correct)));
        entries.extend(devices.extra.keys().map(|name| DeviceEntry {
            name: name.clone(),
            status: Status::Extra,
            current_name: None,
            job: None,
            changes: Vec::new(),
            missing_groups: Vec::new(),
            extra_groups: Vec::new(),
        }));

        Self {
            in_sync: run.result.is_in_sync(),
            devices: DeviceSection {
                counts: devices.counts(),
                entries,
            },
            groups: GroupSection {
                counts: groups.counts(),
                entries: group_entries(groups),
            },
        }
    }
}

fn group_entries(groups: &GroupReconciliation) -> Vec<GroupEntry> {
    [
        (Status::Incorrect, &groups.incorrect),
        (Status::Missing, &groups.missing),
        (Status::Correct, &groups.correct),
        (Status::Extra, &groups.extra),
    ]
    .into_iter()
    .flat_map(|(status, names)| {
        output::sorted(names)
            .into_iter()
            .map(move |name| GroupEntry { name, status })
    })
    .collect()
}

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Device")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Changes")]
    changes: String,
    #[tabled(rename = "Groups")]
    groups: String,
}

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "Group")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
}

fn device_row(entry: &DeviceEntry, color: bool) -> DeviceRow {
    let mut changes = output::format_changes(&entry.changes);
    if let Some(ref current) = entry.current_name {
        let rename = format!("name: {current} -> {}", entry.name);
        changes = if changes.is_empty() {
            rename
        } else {
            format!("{rename}\n{changes}")
        };
    }
    DeviceRow {
        name: entry.name.clone(),
        status: output::paint_status(entry.status, color),
        changes,
        groups: output::format_group_cell(&entry.missing_groups, &entry.extra_groups),
    }
}

fn render_table(report: &VerifyReport, display_group_diff: bool, color: bool) -> String {
    let mut sections = Vec::new();

    if display_group_diff {
        let rows: Vec<GroupRow> = report
            .groups
            .entries
            .iter()
            .map(|e| GroupRow {
                name: e.name.clone(),
                status: output::paint_status(e.status, color),
            })
            .collect();
        sections.push(output::render_table(&rows));
    }

    let rows: Vec<DeviceRow> = report
        .devices
        .entries
        .iter()
        .map(|e| device_row(e, color))
        .collect();
    sections.push(output::render_table(&rows));

    sections.push(format!(
        "Groups:  {}\nDevices: {}",
        output::summarize(&report.groups.counts, color),
        output::summarize(&report.devices.counts, color),
    ));
    sections.push(if report.in_sync {
        "ISE is in sync with NetBox.".to_owned()
    } else {
        "ISE is out of sync with NetBox.".to_owned()
    });
    sections.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: &VerifyArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let session = Session::open(global)?;
    let run = session.reconcile()?;
    let report = VerifyReport::from_run(&run);
    info!(in_sync = report.in_sync, "verification complete");

    let color = output::should_color(global.color);
    let rendered = output::render_report(global.output, &report, |r| {
        render_table(r, args.display_group_diff, color)
    })?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}
