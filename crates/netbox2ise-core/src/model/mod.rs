// ── Domain model ──
//
// Canonical representations of what the engine reasons about: inventory
// records pulled from NetBox, device records in the ISE shape (desired or
// current), and appliance-side groups.

pub mod device;
pub mod group;
pub mod inventory;

// ── Re-exports ──────────────────────────────────────────────────────

pub use device::{DeviceRecord, IpAddress, RadiusSettings, TacacsSettings};
pub use group::CurrentGroup;
pub use inventory::{Cluster, InventoryRecord, PhysicalDevice, Tenant, VirtualMachine};
