//! Command dispatch: data file -> collaborators -> engine -> output.

pub mod datafile;
pub mod sync;
pub mod verify;

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::info;

use netbox2ise_config::{ValidatedDatafile, default_datafile_path, load_datafile};
use netbox2ise_core::{
    ApplianceBackend, CurrentGroup, DesiredState, NetBoxInventory, aggregate_jobs, backend_for,
    diff_configs, reconcile::Reconciliation,
};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Data file path from `--data-file`, or the platform default.
pub fn datafile_path(global: &GlobalOpts) -> PathBuf {
    global
        .data_file
        .clone()
        .unwrap_or_else(default_datafile_path)
}

/// Load and validate the data file at `path`.
pub fn load_validated(path: &Path) -> Result<ValidatedDatafile, CliError> {
    let loaded = load_datafile(path)?;
    Ok(loaded.validate()?)
}

// ── Session ──────────────────────────────────────────────────────────

/// Both collaborators opened from one validated data file.
pub struct Session {
    pub datafile: ValidatedDatafile,
    pub inventory: NetBoxInventory,
    pub backend: Box<dyn ApplianceBackend>,
}

/// Result of one reconciliation pass.
pub struct Run {
    pub desired: DesiredState,
    pub current_groups: IndexMap<String, CurrentGroup>,
    pub result: Reconciliation,
}

impl Session {
    /// Open both collaborators. Either one being unavailable aborts here.
    pub fn open(global: &GlobalOpts) -> Result<Self, CliError> {
        let datafile = load_validated(&datafile_path(global))?;
        let backend = backend_for(datafile.version, &datafile.ise_snapshot)?;
        let inventory = NetBoxInventory::open(&datafile.netbox_export)?;
        Ok(Self {
            datafile,
            inventory,
            backend,
        })
    }

    /// Look up current state, aggregate the jobs, and reconcile.
    pub fn reconcile(&self) -> Result<Run, CliError> {
        let current_groups = self.backend.lookup_current_groups()?;
        let current_devices = self.backend.lookup_current_devices()?;
        info!(
            groups = current_groups.len(),
            devices = current_devices.len(),
            "current ISE state loaded"
        );

        let desired = aggregate_jobs(&self.datafile.jobs(), &self.inventory)?;
        let result = diff_configs(
            &desired,
            &current_groups,
            &current_devices,
            &self.datafile.group_description,
        );
        Ok(Run {
            desired,
            current_groups,
            result,
        })
    }
}
