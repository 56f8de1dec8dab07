//! Wire types and file-backed clients for the two systems netbox2ise
//! reconciles.
//!
//! - **[`NetBoxExport`]**: a captured NetBox REST export (devices, virtual
//!   machines, role catalog) with the same name-based filters the NetBox
//!   query API offers.
//! - **[`IseSnapshot`]**: a captured Cisco ISE ERS snapshot (network device
//!   groups and network devices). Reads walk the `SearchResult` pages the
//!   way the ERS API pages them; writes mutate the snapshot in memory and
//!   [`IseSnapshot::save`] persists it.
//!
//! Nothing in this crate talks to the network. Domain logic lives in
//! `netbox2ise-core`.

pub mod error;
pub mod ise;
pub mod netbox;

pub use error::Error;
pub use ise::models as ise_models;
pub use ise::snapshot::{GroupUpdate, IseSnapshot, PAGE_SIZE, UpdatedField};
pub use netbox::export::{ExportStatus, NetBoxExport, RecordQuery};
pub use netbox::models as netbox_models;
