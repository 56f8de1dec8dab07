// Cisco ISE ERS snapshot: resource shapes and the snapshot client.

pub mod models;
pub mod snapshot;
