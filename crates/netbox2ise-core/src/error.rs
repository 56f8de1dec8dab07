// ── Core error types ──
//
// Collaborator-level conditions surfaced by netbox2ise-core. Consumers
// never see raw file or JSON errors directly: the `From<netbox2ise_api::Error>`
// impl translates them into appliance conditions, and the inventory
// adapter maps its own failures through `CoreError::inventory`.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Collaborator availability (fatal to the run) ─────────────────
    #[error("ISE backend unavailable: {reason}")]
    BackendUnavailable { reason: String },

    #[error("NetBox inventory unavailable: {reason}")]
    InventorySourceUnavailable { reason: String },

    // ── Per-entity write failures (captured, never fatal) ────────────
    #[error("Create failed for {name}: {reason}")]
    CreateFailed { name: String, reason: String },

    #[error("Update failed for {name}: {reason}")]
    UpdateFailed { name: String, reason: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Unsupported ISE version '{version}' (supported: {supported})")]
    UnsupportedVersion { version: String, supported: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Map an api error raised while reading the NetBox export.
    pub fn inventory(err: &netbox2ise_api::Error) -> Self {
        Self::InventorySourceUnavailable {
            reason: err.to_string(),
        }
    }
}

// ── Conversion from api errors ───────────────────────────────────────

impl From<netbox2ise_api::Error> for CoreError {
    fn from(err: netbox2ise_api::Error) -> Self {
        match err {
            netbox2ise_api::Error::AlreadyExists { kind, name } => CoreError::CreateFailed {
                reason: format!("{kind} already exists"),
                name,
            },
            netbox2ise_api::Error::NotFound { kind, identifier } => CoreError::UpdateFailed {
                reason: format!("{kind} not found"),
                name: identifier,
            },
            netbox2ise_api::Error::Serialization(e) => CoreError::Internal(e.to_string()),
            other @ (netbox2ise_api::Error::Io { .. }
            | netbox2ise_api::Error::Deserialization { .. }
            | netbox2ise_api::Error::IncompletePages { .. }) => CoreError::BackendUnavailable {
                reason: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn write_rejections_become_create_failed() {
        let err: CoreError = netbox2ise_api::Error::AlreadyExists {
            kind: "network device",
            name: "sw1".into(),
        }
        .into();
        assert!(matches!(err, CoreError::CreateFailed { ref name, .. } if name == "sw1"));
    }

    #[test]
    fn truncated_snapshot_is_backend_unavailable() {
        let err: CoreError = netbox2ise_api::Error::IncompletePages {
            collection: "network device",
            total: 45,
            received: 40,
        }
        .into();
        assert!(matches!(err, CoreError::BackendUnavailable { .. }));
    }
}
