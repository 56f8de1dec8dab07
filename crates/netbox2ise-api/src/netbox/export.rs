// NetBox export client
//
// Loads a captured NetBox REST export from disk and answers the same
// name-based filter queries the NetBox API would: every non-empty filter
// list restricts the result, empty lists match everything.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::Error;
use crate::netbox::models::{Device, DeviceRole, ExportDocument, NestedRef, VirtualMachine};

/// Name-based filters for devices and virtual machines.
///
/// Mirrors the NetBox query parameters the sync jobs use. `device_types`
/// applies to physical devices only (virtual machines have no device type).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    pub sites: Vec<String>,
    pub device_types: Vec<String>,
    pub roles: Vec<String>,
    pub tenants: Vec<String>,
    pub status: Vec<String>,
    /// Only return records that have a primary IP assigned.
    pub has_primary_ip: bool,
}

/// Record counts reported by [`NetBoxExport::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExportStatus {
    pub devices: usize,
    pub virtual_machines: usize,
    pub device_roles: usize,
}

/// A NetBox export loaded from a JSON file.
#[derive(Debug, Clone)]
pub struct NetBoxExport {
    path: PathBuf,
    document: ExportDocument,
}

impl NetBoxExport {
    /// Read and parse an export file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading NetBox export");

        let body = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let document: ExportDocument =
            serde_json::from_str(&body).map_err(|e| Error::deserialization(&e, &body))?;

        Ok(Self::from_document(path, document))
    }

    /// Wrap an already-parsed export document.
    pub fn from_document(path: impl Into<PathBuf>, document: ExportDocument) -> Self {
        Self {
            path: path.into(),
            document,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn status(&self) -> ExportStatus {
        ExportStatus {
            devices: self.document.devices.len(),
            virtual_machines: self.document.virtual_machines.len(),
            device_roles: self.document.device_roles.len(),
        }
    }

    /// Physical devices matching every non-empty filter.
    pub fn query_devices(&self, query: &RecordQuery) -> Vec<&Device> {
        let matched: Vec<&Device> = self
            .document
            .devices
            .iter()
            .filter(|d| matches_name(&query.sites, Some(d.site.name.as_str())))
            .filter(|d| matches_name(&query.device_types, Some(d.device_type.model.as_str())))
            .filter(|d| matches_name(&query.roles, ref_name(d.role())))
            .filter(|d| matches_name(&query.tenants, d.tenant.as_ref().map(|t| t.name.as_str())))
            .filter(|d| {
                matches_name(&query.status, d.status.as_ref().map(|s| s.value.as_str()))
            })
            .filter(|d| !query.has_primary_ip || d.primary_ip.is_some())
            .collect();

        debug!(count = matched.len(), ?query, "device query");
        matched
    }

    /// Virtual machines matching every non-empty filter.
    ///
    /// `device_types` is ignored. Sites match either the VM's own site or
    /// the site of its cluster.
    pub fn query_virtual_machines(&self, query: &RecordQuery) -> Vec<&VirtualMachine> {
        let matched: Vec<&VirtualMachine> = self
            .document
            .virtual_machines
            .iter()
            .filter(|vm| {
                matches_name(&query.sites, ref_name(vm.site.as_ref()))
                    || matches_name(
                        &query.sites,
                        ref_name(vm.cluster.as_ref().and_then(|c| c.site.as_ref())),
                    )
            })
            .filter(|vm| matches_name(&query.roles, ref_name(vm.role.as_ref())))
            .filter(|vm| {
                matches_name(&query.tenants, vm.tenant.as_ref().map(|t| t.name.as_str()))
            })
            .filter(|vm| {
                matches_name(&query.status, vm.status.as_ref().map(|s| s.value.as_str()))
            })
            .filter(|vm| !query.has_primary_ip || vm.primary_ip.is_some())
            .collect();

        debug!(count = matched.len(), ?query, "virtual machine query");
        matched
    }

    /// The subset of `names` that may be assigned to virtual machines.
    ///
    /// A role that is missing from the catalog is assumed to be usable by
    /// VMs: older exports do not include `device_roles` at all.
    pub fn vm_roles<'a>(&self, names: &'a [String]) -> Vec<&'a str> {
        names
            .iter()
            .filter(|name| self.find_role(name).is_none_or(|role| role.vm_role))
            .map(String::as_str)
            .collect()
    }

    fn find_role(&self, name: &str) -> Option<&DeviceRole> {
        self.document.device_roles.iter().find(|r| r.name == name)
    }
}

// ── Filter helpers ───────────────────────────────────────────────────

fn matches_name(filter: &[String], value: Option<&str>) -> bool {
    filter.is_empty() || value.is_some_and(|v| filter.iter().any(|f| f == v))
}

fn ref_name(r: Option<&NestedRef>) -> Option<&str> {
    r.map(|r| r.name.as_str())
}
