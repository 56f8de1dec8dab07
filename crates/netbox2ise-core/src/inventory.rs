// ── Inventory collaborator ──
//
// The source-of-truth side: answers filter queries with inventory records
// that already have a name and a primary address.

use std::path::Path;

use netbox2ise_api::{NetBoxExport, RecordQuery};
use tracing::{debug, info};

use crate::convert;
use crate::error::CoreError;
use crate::model::InventoryRecord;

/// Name-based filters for one job. Empty lists do not restrict.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryQuery {
    pub sites: Vec<String>,
    pub device_types: Vec<String>,
    pub roles: Vec<String>,
    pub tenants: Vec<String>,
    pub status: Vec<String>,
}

/// Records returned for one query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryRecords {
    pub devices: Vec<InventoryRecord>,
    pub virtual_machines: Vec<InventoryRecord>,
}

impl InventoryRecords {
    pub fn len(&self) -> usize {
        self.devices.len() + self.virtual_machines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Devices first, then virtual machines.
    pub fn iter(&self) -> impl Iterator<Item = &InventoryRecord> {
        self.devices.iter().chain(&self.virtual_machines)
    }
}

/// Source of inventory records.
pub trait InventorySource {
    /// Check the source is usable and describe it.
    fn verify(&self) -> Result<String, CoreError>;

    /// Devices and virtual machines matching `query`.
    fn query_records(&self, query: &InventoryQuery) -> Result<InventoryRecords, CoreError>;
}

/// Inventory backed by a NetBox export file.
#[derive(Debug, Clone)]
pub struct NetBoxInventory {
    export: NetBoxExport,
}

impl NetBoxInventory {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let export = NetBoxExport::open(path).map_err(|e| CoreError::inventory(&e))?;
        Ok(Self { export })
    }

    pub fn new(export: NetBoxExport) -> Self {
        Self { export }
    }
}

impl InventorySource for NetBoxInventory {
    fn verify(&self) -> Result<String, CoreError> {
        let status = self.export.status();
        Ok(format!(
            "NetBox export {} loaded: {} devices, {} virtual machines, {} device roles",
            self.export.path().display(),
            status.devices,
            status.virtual_machines,
            status.device_roles,
        ))
    }

    fn query_records(&self, query: &InventoryQuery) -> Result<InventoryRecords, CoreError> {
        let device_query = RecordQuery {
            sites: query.sites.clone(),
            device_types: query.device_types.clone(),
            roles: query.roles.clone(),
            tenants: query.tenants.clone(),
            status: query.status.clone(),
            has_primary_ip: true,
        };
        let devices: Vec<InventoryRecord> = self
            .export
            .query_devices(&device_query)
            .into_iter()
            .filter_map(convert::physical_device)
            .collect();

        // VMs are only looked up for roles that may be assigned to VMs.
        let vm_roles = self.export.vm_roles(&query.roles);
        let virtual_machines: Vec<InventoryRecord> = if vm_roles.is_empty() {
            debug!(roles = ?query.roles, "no VM roles in query, skipping virtual machines");
            Vec::new()
        } else {
            let vm_query = RecordQuery {
                roles: vm_roles.into_iter().map(str::to_owned).collect(),
                device_types: Vec::new(),
                ..device_query
            };
            self.export
                .query_virtual_machines(&vm_query)
                .into_iter()
                .filter_map(convert::virtual_machine)
                .collect()
        };

        info!(
            devices = devices.len(),
            virtual_machines = virtual_machines.len(),
            "inventory query complete"
        );
        Ok(InventoryRecords {
            devices,
            virtual_machines,
        })
    }
}
