// ── Reconciliation ──
//
// Classifies desired vs. current state. Every desired name lands in
// exactly one of correct / incorrect / missing; every current name that
// nothing desired maps to lands in extra.

pub mod devices;
pub mod fields;
pub mod groups;

use indexmap::IndexMap;
use serde::Serialize;
use strum::{Display, EnumIter};

use crate::aggregate::DesiredState;
use crate::model::{CurrentGroup, DeviceRecord};

pub use devices::{DevicePlan, DeviceReconciliation, GroupMembershipDiff, diff_devices};
pub use fields::{ChangeKind, EXCLUDED_PATHS, FieldChange, FieldPath, field_changes};
pub use groups::{GroupReconciliation, diff_groups};

/// Reconciliation status of a device or group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Status {
    Correct,
    Incorrect,
    Missing,
    Extra,
}

/// Number of entries per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub correct: usize,
    pub incorrect: usize,
    pub missing: usize,
    pub extra: usize,
}

impl StatusCounts {
    pub fn get(&self, status: Status) -> usize {
        match status {
            Status::Correct => self.correct,
            Status::Incorrect => self.incorrect,
            Status::Missing => self.missing,
            Status::Extra => self.extra,
        }
    }

    /// Entries derived from the inventory.
    pub fn desired(&self) -> usize {
        self.correct + self.incorrect + self.missing
    }

    /// Nothing has to be created or updated. Extra entries are reported
    /// but never acted on, so they do not count against this.
    pub fn is_in_sync(&self) -> bool {
        self.incorrect == 0 && self.missing == 0
    }
}

/// Group and device results of one reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub groups: GroupReconciliation,
    pub devices: DeviceReconciliation,
}

impl Reconciliation {
    pub fn is_in_sync(&self) -> bool {
        self.groups.counts().is_in_sync() && self.devices.counts().is_in_sync()
    }
}

/// Run the group and device reconcilers once against the merged desired
/// state.
pub fn diff_configs(
    desired: &DesiredState,
    current_groups: &IndexMap<String, CurrentGroup>,
    current_devices: &IndexMap<String, DeviceRecord>,
    group_description: &str,
) -> Reconciliation {
    let groups = diff_groups(&desired.groups, current_groups, group_description);
    let devices = diff_devices(&desired.devices, current_devices);

    tracing::info!(
        groups = ?groups.counts(),
        devices = ?devices.counts(),
        "reconciliation complete"
    );

    Reconciliation { groups, devices }
}
