// ── Job aggregation ──
//
// Each job is one inventory query plus the secrets for its devices. Jobs
// run strictly in sequence; their desired devices merge by name (later
// jobs overwrite earlier ones) and their group sets union.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::{info, warn};

use crate::desired::{DeviceSecrets, build_desired_device, groups_in_use};
use crate::error::CoreError;
use crate::inventory::{InventoryQuery, InventoryRecords, InventorySource};
use crate::model::DeviceRecord;

/// One inventory query definition.
#[derive(Debug, Clone, Default)]
pub struct Job {
    pub name: String,
    pub query: InventoryQuery,
    pub secrets: DeviceSecrets,
}

/// Desired devices and groups merged across jobs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesiredState {
    pub devices: IndexMap<String, DeviceRecord>,
    pub groups: HashSet<String>,
    /// Job that last produced each device.
    sources: IndexMap<String, String>,
}

impl DesiredState {
    /// Merge one job's devices. A device name seen in an earlier job is
    /// overwritten. Groups are unioned, so groups of an overwritten device
    /// stay required.
    pub fn merge_job(&mut self, job: &str, devices: IndexMap<String, DeviceRecord>) {
        self.groups.extend(groups_in_use(devices.values()));

        for (name, device) in devices {
            if let Some(previous) = self.sources.insert(name.clone(), job.to_owned()) {
                warn!(
                    device = %name,
                    previous_job = %previous,
                    job,
                    "device produced by more than one job, keeping the later one"
                );
            }
            self.devices.insert(name, device);
        }
    }

    /// Job that produced `device`.
    pub fn source_of(&self, device: &str) -> Option<&str> {
        self.sources.get(device).map(String::as_str)
    }
}

/// Desired devices for one job's records, keyed by name.
pub fn desired_devices(
    records: &InventoryRecords,
    secrets: &DeviceSecrets,
) -> IndexMap<String, DeviceRecord> {
    records
        .iter()
        .map(|record| {
            let device = build_desired_device(record, secrets);
            (device.name.clone(), device)
        })
        .collect()
}

/// Query every job in order and merge the results.
///
/// An unavailable inventory aborts before any state is returned.
pub fn aggregate_jobs(
    jobs: &[Job],
    inventory: &dyn InventorySource,
) -> Result<DesiredState, CoreError> {
    let mut state = DesiredState::default();

    for job in jobs {
        let records = inventory.query_records(&job.query)?;
        let devices = desired_devices(&records, &job.secrets);
        info!(
            job = %job.name,
            records = records.len(),
            devices = devices.len(),
            "job processed"
        );
        state.merge_job(&job.name, devices);
    }

    info!(
        devices = state.devices.len(),
        groups = state.groups.len(),
        "desired state assembled"
    );
    Ok(state)
}
