// ── Device reconciliation ──
//
// Pairs desired devices with current ones (by name, then by IP so renames
// are tolerated), computes the structural field diff and the group
// membership sub-diff for each pair, and classifies the result.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use super::StatusCounts;
use super::fields::{FieldChange, field_changes};
use crate::model::DeviceRecord;

/// Group membership of one device, desired vs. current.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupMembershipDiff {
    pub correct: HashSet<String>,
    pub missing: HashSet<String>,
    pub extra: HashSet<String>,
}

impl GroupMembershipDiff {
    pub fn between(desired: &[String], current: &[String]) -> Self {
        let desired: HashSet<&String> = desired.iter().collect();
        let current: HashSet<&String> = current.iter().collect();
        Self {
            correct: desired.intersection(&current).map(|g| (*g).clone()).collect(),
            missing: desired.difference(&current).map(|g| (*g).clone()).collect(),
            extra: current.difference(&desired).map(|g| (*g).clone()).collect(),
        }
    }

    /// No group has to be added or removed.
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }
}

/// One desired device, its paired current device (if any), and what differs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DevicePlan {
    pub desired: DeviceRecord,
    pub current: Option<DeviceRecord>,
    pub changes: Vec<FieldChange>,
    pub groups: GroupMembershipDiff,
}

impl DevicePlan {
    /// Name the appliance currently knows this device by.
    pub fn current_name(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.name.as_str())
    }

    /// Paired by IP under a different name.
    pub fn is_rename(&self) -> bool {
        self.current_name()
            .is_some_and(|name| name != self.desired.name)
    }
}

/// Classification of every desired device plus unpaired current devices.
///
/// Desired devices are keyed by desired name; `extra` is keyed by the
/// current name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceReconciliation {
    pub correct: IndexMap<String, DevicePlan>,
    pub incorrect: IndexMap<String, DevicePlan>,
    pub missing: IndexMap<String, DevicePlan>,
    pub extra: IndexMap<String, DeviceRecord>,
}

impl DeviceReconciliation {
    pub fn counts(&self) -> StatusCounts {
        StatusCounts {
            correct: self.correct.len(),
            incorrect: self.incorrect.len(),
            missing: self.missing.len(),
            extra: self.extra.len(),
        }
    }
}

/// Diff desired devices against the appliance's devices.
///
/// Current records are normalized (unconfigured RADIUS blocks dropped)
/// before comparison. A device whose first IP matches a current device is
/// paired with it even when a same-named current device exists; when
/// several current devices share an IP, the last one listed wins.
pub fn diff_devices(
    desired: &IndexMap<String, DeviceRecord>,
    current: &IndexMap<String, DeviceRecord>,
) -> DeviceReconciliation {
    let normalized: IndexMap<&str, DeviceRecord> = current
        .iter()
        .map(|(name, device)| {
            let mut device = device.clone();
            device.normalize_radius();
            (name.as_str(), device)
        })
        .collect();

    let pairing = pair_devices(desired, &normalized);
    let mut result = DeviceReconciliation::default();

    for (name, device) in desired {
        let current = pairing
            .get(name.as_str())
            .and_then(|current_name| normalized.get(current_name))
            .cloned();

        let (changes, groups) = match &current {
            Some(current) => (
                field_changes(current, device),
                GroupMembershipDiff::between(&device.groups, &current.groups),
            ),
            None => (Vec::new(), GroupMembershipDiff::between(&device.groups, &[])),
        };

        let plan = DevicePlan {
            desired: device.clone(),
            current,
            changes,
            groups,
        };

        let bucket = if !plan.changes.is_empty() {
            &mut result.incorrect
        } else if plan.current.is_none() {
            &mut result.missing
        } else if !plan.groups.is_clean() {
            &mut result.incorrect
        } else {
            &mut result.correct
        };
        debug!(device = %name, changes = plan.changes.len(), "device classified");
        bucket.insert(name.clone(), plan);
    }

    let paired: HashSet<&str> = pairing.values().copied().collect();
    result.extra = normalized
        .into_iter()
        .filter(|(name, _)| !paired.contains(name))
        .map(|(name, device)| (name.to_owned(), device))
        .collect();

    result
}

/// Desired name -> current name.
fn pair_devices<'a>(
    desired: &'a IndexMap<String, DeviceRecord>,
    current: &IndexMap<&'a str, DeviceRecord>,
) -> IndexMap<&'a str, &'a str> {
    let mut pairing: IndexMap<&str, &str> = desired
        .keys()
        .filter_map(|name| current.get_key_value(name.as_str()).map(|(k, _)| (name.as_str(), *k)))
        .collect();

    let by_ip: IndexMap<&str, &str> = current
        .iter()
        .filter_map(|(name, device)| device.primary_ip().map(|ip| (ip, *name)))
        .collect();

    for (name, device) in desired {
        let Some(current_name) = device.primary_ip().and_then(|ip| by_ip.get(ip)).copied() else {
            continue;
        };
        if let Some(previous) = pairing.insert(name.as_str(), current_name) {
            if previous != current_name {
                debug!(
                    device = %name,
                    by_name = previous,
                    by_ip = current_name,
                    "IP match overrides name match"
                );
            }
        }
    }

    pairing
}
