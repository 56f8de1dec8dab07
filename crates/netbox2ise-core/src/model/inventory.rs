// ── Inventory records ──

use serde::Serialize;
use strum::Display;

/// Tenant assignment, optionally grouped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tenant {
    pub name: String,
    pub group: Option<String>,
}

/// Virtualization cluster a VM runs on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cluster {
    pub name: String,
    pub site: Option<String>,
}

/// A physical device from the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhysicalDevice {
    pub name: String,
    pub url: String,
    /// Primary address in CIDR notation.
    pub primary_address: String,
    pub site: String,
    pub rack: Option<String>,
    pub manufacturer: String,
    pub model: String,
    pub role: String,
    pub tenant: Option<Tenant>,
}

/// A virtual machine from the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VirtualMachine {
    pub name: String,
    pub url: String,
    /// Primary address in CIDR notation.
    pub primary_address: String,
    pub site: Option<String>,
    pub cluster: Option<Cluster>,
    pub role: Option<String>,
    pub tenant: Option<Tenant>,
}

/// One inventory record, physical or virtual.
///
/// Only records that have a name and a primary address ever reach this
/// type; the inventory adapter filters the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Display)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InventoryRecord {
    #[strum(to_string = "device")]
    Device(PhysicalDevice),
    #[strum(to_string = "virtual machine")]
    VirtualMachine(VirtualMachine),
}

impl InventoryRecord {
    pub fn name(&self) -> &str {
        match self {
            Self::Device(d) => &d.name,
            Self::VirtualMachine(vm) => &vm.name,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Device(d) => &d.url,
            Self::VirtualMachine(vm) => &vm.url,
        }
    }

    pub fn primary_address(&self) -> &str {
        match self {
            Self::Device(d) => &d.primary_address,
            Self::VirtualMachine(vm) => &vm.primary_address,
        }
    }

    pub fn tenant(&self) -> Option<&Tenant> {
        match self {
            Self::Device(d) => d.tenant.as_ref(),
            Self::VirtualMachine(vm) => vm.tenant.as_ref(),
        }
    }
}
