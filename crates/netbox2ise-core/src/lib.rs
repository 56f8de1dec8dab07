//! Desired-state derivation and reconciliation engine for netbox2ise.
//!
//! This crate owns the domain model and the logic between the NetBox
//! inventory and Cisco ISE:
//!
//! - **Derivation** ([`canonical`], [`groups`], [`desired`]): inventory
//!   records become desired ISE network devices with an ordered list of
//!   `Category#Segment...` group memberships.
//!
//! - **Aggregation** ([`aggregate`]): jobs (one inventory query each) run in
//!   sequence and merge into one [`DesiredState`], last job wins per device.
//!
//! - **Reconciliation** ([`reconcile`]): desired groups and devices are
//!   classified against current ISE state as correct, incorrect, missing,
//!   or extra, with a field diff and group sub-diff per device.
//!
//! - **Collaborators** ([`inventory`], [`backend`]): the [`InventorySource`]
//!   and [`ApplianceBackend`] traits, their file-backed implementations, and
//!   the ISE version registry ([`ApiVersion`], [`backend_for`]).

pub mod aggregate;
pub mod backend;
pub mod canonical;
pub mod convert;
pub mod desired;
pub mod error;
pub mod groups;
pub mod inventory;
pub mod model;
pub mod reconcile;

// ── Primary re-exports ──────────────────────────────────────────────
pub use aggregate::{DesiredState, Job, aggregate_jobs};
pub use backend::{ApiVersion, ApplianceBackend, SyncReport, WriteResult, backend_for};
pub use canonical::canonicalize;
pub use desired::{DeviceSecrets, build_desired_device, groups_in_use};
pub use error::CoreError;
pub use groups::derive_groups;
pub use inventory::{InventoryQuery, InventoryRecords, InventorySource, NetBoxInventory};
pub use model::{CurrentGroup, DeviceRecord, InventoryRecord};
pub use reconcile::{
    DevicePlan, DeviceReconciliation, FieldChange, FieldPath, GroupMembershipDiff,
    GroupReconciliation, Reconciliation, Status, StatusCounts, diff_configs, diff_devices,
    diff_groups,
};
