// ── Snapshot-backed adapter ──
//
// Applies sync writes to a captured ISE snapshot. The write payloads differ
// per API flavour; everything else is shared.

use std::marker::PhantomData;
use std::path::Path;

use indexmap::IndexMap;
use netbox2ise_api::ise_models::NetworkDevice;
use netbox2ise_api::{GroupUpdate, IseSnapshot, UpdatedField};
use tracing::{debug, info, warn};

use super::{ApiVersion, ApplianceBackend, SyncReport, WriteResult};
use crate::error::CoreError;
use crate::model::{CurrentGroup, DeviceRecord};
use crate::reconcile::{DeviceReconciliation, GroupReconciliation};

/// Payload and message differences between API flavours.
pub trait Flavour {
    /// `othername` written with a group, if the flavour sets one.
    fn othername(group: &str) -> Option<String>;

    /// Fields sent when updating an existing group.
    fn group_update(group: &str, description: &str) -> GroupUpdate;

    fn device_created(name: &str) -> String;

    fn device_updated(name: &str, fields: &[UpdatedField]) -> String {
        let names: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
        if names.is_empty() {
            format!("{name} updated")
        } else {
            format!("{name} updated: {}", names.join(", "))
        }
    }
}

/// An ISE backend over a snapshot file.
#[derive(Debug)]
pub struct SnapshotBackend<F> {
    version: ApiVersion,
    snapshot: IseSnapshot,
    flavour: PhantomData<F>,
}

impl<F: Flavour> SnapshotBackend<F> {
    /// Load the snapshot. A missing, malformed, or truncated snapshot is
    /// `BackendUnavailable`.
    pub fn open(version: ApiVersion, path: impl AsRef<Path>) -> Result<Self, CoreError> {
        Ok(Self::new(version, IseSnapshot::open(path)?))
    }

    pub fn new(version: ApiVersion, snapshot: IseSnapshot) -> Self {
        Self {
            version,
            snapshot,
            flavour: PhantomData,
        }
    }

    pub fn snapshot(&self) -> &IseSnapshot {
        &self.snapshot
    }
}

fn sorted<'a>(names: impl IntoIterator<Item = &'a String>) -> Vec<&'a String> {
    let mut names: Vec<_> = names.into_iter().collect();
    names.sort();
    names
}

impl<F: Flavour> ApplianceBackend for SnapshotBackend<F> {
    fn version(&self) -> ApiVersion {
        self.version
    }

    fn verify(&self) -> Result<String, CoreError> {
        Ok(format!(
            "ISE snapshot {} loaded ({} API): {} groups, {} devices",
            self.snapshot.path().display(),
            self.version,
            self.snapshot.groups().count(),
            self.snapshot.devices().count(),
        ))
    }

    fn lookup_current_groups(&self) -> Result<IndexMap<String, CurrentGroup>, CoreError> {
        Ok(self
            .snapshot
            .groups()
            .map(|g| (g.name.clone(), CurrentGroup::from(g)))
            .collect())
    }

    fn lookup_current_devices(&self) -> Result<IndexMap<String, DeviceRecord>, CoreError> {
        Ok(self
            .snapshot
            .devices()
            .map(|d| (d.name.clone(), DeviceRecord::from(d)))
            .collect())
    }

    fn sync_groups(
        &mut self,
        current: &IndexMap<String, CurrentGroup>,
        diff: &GroupReconciliation,
        description: &str,
        remove_extra: bool,
    ) -> SyncReport {
        let mut report = SyncReport::default();

        for name in sorted(&diff.correct) {
            debug!(group = %name, "group is correct");
        }

        for name in sorted(&diff.incorrect) {
            info!(group = %name, "updating group");
            let result = match current.get(name.as_str()) {
                Some(group) => match self
                    .snapshot
                    .update_group(&group.id, F::group_update(name, description))
                {
                    Ok(_) => WriteResult::ok(format!("{name} updated")),
                    Err(e) => WriteResult::failed(&CoreError::UpdateFailed {
                        name: name.clone(),
                        reason: e.to_string(),
                    }),
                },
                None => WriteResult::failed(&CoreError::UpdateFailed {
                    name: name.clone(),
                    reason: "group has no current id".into(),
                }),
            };
            report.updated.insert(name.clone(), result);
        }

        for name in sorted(&diff.missing) {
            info!(group = %name, "creating group");
            let othername = F::othername(name);
            let result = match self
                .snapshot
                .create_group(name, description, othername.as_deref())
            {
                Ok(_) => WriteResult::ok(format!("{name} created")),
                Err(e) => WriteResult::failed(&CoreError::CreateFailed {
                    name: name.clone(),
                    reason: e.to_string(),
                }),
            };
            report.created.insert(name.clone(), result);
        }

        for name in sorted(&diff.extra) {
            if remove_extra {
                warn!(group = %name, "group deletion is disabled, leaving extra group in place");
            } else {
                debug!(group = %name, "extra group left in place");
            }
        }

        report
    }

    fn sync_devices(&mut self, diff: &DeviceReconciliation, remove_extra: bool) -> SyncReport {
        let mut report = SyncReport::default();

        for name in diff.correct.keys() {
            debug!(device = %name, "device is correct");
        }

        for (name, plan) in &diff.incorrect {
            let target = plan.current_name().unwrap_or(name);
            info!(device = %name, current = %target, "updating device");
            let result = match self
                .snapshot
                .update_device(target, NetworkDevice::from(&plan.desired))
            {
                Ok(fields) => WriteResult::ok(F::device_updated(name, &fields)),
                Err(e) => WriteResult::failed(&CoreError::UpdateFailed {
                    name: name.clone(),
                    reason: e.to_string(),
                }),
            };
            report.updated.insert(name.clone(), result);
        }

        for (name, plan) in &diff.missing {
            info!(device = %name, "creating device");
            let result = match self
                .snapshot
                .create_device(NetworkDevice::from(&plan.desired))
            {
                Ok(_) => WriteResult::ok(F::device_created(name)),
                Err(e) => WriteResult::failed(&CoreError::CreateFailed {
                    name: name.clone(),
                    reason: e.to_string(),
                }),
            };
            report.created.insert(name.clone(), result);
        }

        if remove_extra {
            for name in diff.extra.keys() {
                warn!(device = %name, "device deletion is disabled, leaving extra device in place");
                report.deleted.insert(
                    name.clone(),
                    WriteResult {
                        success: false,
                        message: "deletion disabled".into(),
                    },
                );
            }
        }

        report
    }

    fn flush(&mut self) -> Result<(), CoreError> {
        if !self.snapshot.is_dirty() {
            debug!("no pending ISE writes");
            return Ok(());
        }
        self.snapshot.save()?;
        info!(path = %self.snapshot.path().display(), "ISE snapshot written");
        Ok(())
    }
}
