// NetBox REST object shapes
//
// Models for the objects returned by `/api/dcim/devices/`,
// `/api/virtualization/virtual-machines/` and `/api/dcim/device-roles/`.
// Nested references carry only what the NetBox "brief" representation
// guarantees; everything optional is `#[serde(default)]` because exports
// taken from different NetBox releases disagree on field presence.

use serde::{Deserialize, Serialize};

// ── Nested references ────────────────────────────────────────────────

/// A brief nested object (`{id, name, slug}`), e.g. a site, rack, role,
/// or manufacturer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedRef {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedDeviceType {
    #[serde(default)]
    pub id: Option<u64>,
    pub model: String,
    pub manufacturer: NestedRef,
}

/// Tenant reference. NetBox only nests the tenant group when the export
/// was taken with `?brief=false` or the group was expanded explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedTenant {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub group: Option<NestedRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedCluster {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub site: Option<NestedRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedIpAddress {
    #[serde(default)]
    pub id: Option<u64>,
    /// Address in CIDR notation, e.g. `10.0.0.5/24`.
    pub address: String,
}

/// Choice field (`{"value": "active", "label": "Active"}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChoice {
    pub value: String,
    #[serde(default)]
    pub label: Option<String>,
}

// ── Devices ──────────────────────────────────────────────────────────

/// Physical device from `/api/dcim/devices/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: String,
    pub site: NestedRef,
    #[serde(default)]
    pub rack: Option<NestedRef>,
    pub device_type: NestedDeviceType,
    /// NetBox 3.6+ name for the device role.
    #[serde(default)]
    pub role: Option<NestedRef>,
    /// Pre-3.6 name for the device role.
    #[serde(default)]
    pub device_role: Option<NestedRef>,
    #[serde(default)]
    pub tenant: Option<NestedTenant>,
    #[serde(default)]
    pub primary_ip: Option<NestedIpAddress>,
    #[serde(default)]
    pub status: Option<StatusChoice>,
}

impl Device {
    /// The device role regardless of which NetBox release produced the export.
    pub fn role(&self) -> Option<&NestedRef> {
        self.role.as_ref().or(self.device_role.as_ref())
    }
}

/// Virtual machine from `/api/virtualization/virtual-machines/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VirtualMachine {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub site: Option<NestedRef>,
    #[serde(default)]
    pub cluster: Option<NestedCluster>,
    #[serde(default)]
    pub role: Option<NestedRef>,
    #[serde(default)]
    pub tenant: Option<NestedTenant>,
    #[serde(default)]
    pub primary_ip: Option<NestedIpAddress>,
    #[serde(default)]
    pub status: Option<StatusChoice>,
}

/// Role catalog entry from `/api/dcim/device-roles/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRole {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub vm_role: bool,
}

// ── Export document ──────────────────────────────────────────────────

/// The captured export: one list per NetBox endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportDocument {
    #[serde(default)]
    pub devices: Vec<Device>,
    #[serde(default)]
    pub virtual_machines: Vec<VirtualMachine>,
    #[serde(default)]
    pub device_roles: Vec<DeviceRole>,
}
