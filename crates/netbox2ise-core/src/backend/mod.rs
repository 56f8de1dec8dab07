// ── Appliance backends ──
//
// One adapter per ISE API flavour behind a single trait, chosen once at
// startup from the configured version string.

mod ers;
mod sdk;
mod snapshot;

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};
use tracing::info;

use crate::error::CoreError;
use crate::model::{CurrentGroup, DeviceRecord};
use crate::reconcile::{DeviceReconciliation, GroupReconciliation};

pub use ers::Ers;
pub use sdk::Sdk;
pub use snapshot::{Flavour, SnapshotBackend};

// ── Version registry ────────────────────────────────────────────────

/// Supported ISE API versions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, EnumIter, AsRefStr,
)]
pub enum ApiVersion {
    /// ERS API as exposed by pre-SDK releases.
    #[strum(serialize = "legacy")]
    #[serde(rename = "legacy")]
    Legacy,
    #[strum(serialize = "3.1.0")]
    #[serde(rename = "3.1.0")]
    V3_1_0,
    #[strum(serialize = "3.1_Patch_1")]
    #[serde(rename = "3.1_Patch_1")]
    V3_1Patch1,
    #[strum(serialize = "3.2_beta")]
    #[serde(rename = "3.2_beta")]
    V3_2Beta,
    #[strum(serialize = "3.3_patch_1")]
    #[serde(rename = "3.3_patch_1")]
    V3_3Patch1,
}

impl ApiVersion {
    /// Whether this version speaks the SDK flavour of the API.
    pub fn is_sdk(self) -> bool {
        !matches!(self, Self::Legacy)
    }

    /// Comma-separated list of accepted version strings.
    pub fn supported() -> String {
        Self::iter()
            .map(|v| v.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Parse a configured version string, failing with the supported list.
    pub fn parse(version: &str) -> Result<Self, CoreError> {
        Self::from_str(version).map_err(|_| CoreError::UnsupportedVersion {
            version: version.to_owned(),
            supported: Self::supported(),
        })
    }
}

// ── Sync reports ────────────────────────────────────────────────────

/// Outcome of one write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteResult {
    pub success: bool,
    pub message: String,
}

impl WriteResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(err: &CoreError) -> Self {
        Self {
            success: false,
            message: err.to_string(),
        }
    }
}

/// Per-entity write outcomes of one sync call, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub created: BTreeMap<String, WriteResult>,
    pub updated: BTreeMap<String, WriteResult>,
    pub deleted: BTreeMap<String, WriteResult>,
}

impl SyncReport {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }

    /// Failed creates and updates. Deletion entries only record that a
    /// delete was skipped.
    pub fn failures(&self) -> usize {
        self.created
            .values()
            .chain(self.updated.values())
            .filter(|r| !r.success)
            .count()
    }
}

// ── Backend trait ───────────────────────────────────────────────────

/// The appliance side of a run.
pub trait ApplianceBackend {
    fn version(&self) -> ApiVersion;

    /// Check the backend is usable and describe it.
    fn verify(&self) -> Result<String, CoreError>;

    fn lookup_current_groups(&self) -> Result<IndexMap<String, CurrentGroup>, CoreError>;

    fn lookup_current_devices(&self) -> Result<IndexMap<String, DeviceRecord>, CoreError>;

    /// Create missing groups and update incorrect ones. Extra groups are
    /// logged and never deleted.
    fn sync_groups(
        &mut self,
        current: &IndexMap<String, CurrentGroup>,
        diff: &GroupReconciliation,
        description: &str,
        remove_extra: bool,
    ) -> SyncReport;

    /// Create missing devices and update incorrect ones. With
    /// `remove_extra`, extra devices are reported as deletion-disabled
    /// entries; nothing is deleted.
    fn sync_devices(&mut self, diff: &DeviceReconciliation, remove_extra: bool) -> SyncReport;

    /// Persist pending writes.
    fn flush(&mut self) -> Result<(), CoreError>;
}

/// Resolve the backend for `version`, loading the snapshot at `path`.
pub fn backend_for(
    version: ApiVersion,
    path: impl AsRef<Path>,
) -> Result<Box<dyn ApplianceBackend>, CoreError> {
    info!(%version, path = %path.as_ref().display(), "opening ISE backend");
    let backend: Box<dyn ApplianceBackend> = if version.is_sdk() {
        Box::new(SnapshotBackend::<Sdk>::open(version, path)?)
    } else {
        Box::new(SnapshotBackend::<Ers>::open(version, path)?)
    };
    Ok(backend)
}
