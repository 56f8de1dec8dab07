//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use netbox2ise_config::ConfigError;
use netbox2ise_core::CoreError;

/// Process exit codes. Usage errors exit with 2 from clap itself.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const CONFIG: i32 = 3;
    pub const INVENTORY: i32 = 4;
    pub const BACKEND: i32 = 5;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Data file ────────────────────────────────────────────────────
    #[error("Data file not found: {path}")]
    #[diagnostic(
        code(netbox2ise::no_datafile),
        help(
            "Pass one with --data-file or NETBOX2ISE_DATA_FILE.\n\
             Start from the example: netbox2ise example-datafile --output-file {path}"
        )
    )]
    NoDatafile { path: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(
        code(netbox2ise::validation),
        help("Run: netbox2ise check-datafile")
    )]
    Validation { field: String, reason: String },

    #[error("Unsupported ISE version '{version}'")]
    #[diagnostic(
        code(netbox2ise::unsupported_version),
        help("Set defaults.ise.version to one of: {supported}")
    )]
    UnsupportedVersion { version: String, supported: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(netbox2ise::config))]
    Config { message: String },

    // ── Collaborators ────────────────────────────────────────────────
    #[error("NetBox inventory unavailable: {reason}")]
    #[diagnostic(
        code(netbox2ise::inventory_unavailable),
        help("Check defaults.netbox.export points at a readable NetBox JSON export.")
    )]
    InventoryUnavailable { reason: String },

    #[error("ISE backend unavailable: {reason}")]
    #[diagnostic(
        code(netbox2ise::backend_unavailable),
        help(
            "Check defaults.ise.snapshot points at a complete ISE snapshot.\n\
             Nothing was reconciled or written."
        )
    )]
    BackendUnavailable { reason: String },

    // ── Sync ─────────────────────────────────────────────────────────
    #[error("{count} write(s) failed during sync")]
    #[diagnostic(
        code(netbox2ise::sync_failed),
        help("The failed entries are listed above; rerun verify to see what is left.")
    )]
    SyncFailures { count: usize },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON rendering failed: {0}")]
    #[diagnostic(code(netbox2ise::json))]
    Json(#[from] serde_json::Error),

    #[error("YAML rendering failed: {0}")]
    #[diagnostic(code(netbox2ise::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    #[diagnostic(code(netbox2ise::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoDatafile { .. }
            | Self::Validation { .. }
            | Self::UnsupportedVersion { .. }
            | Self::Config { .. } => exit_code::CONFIG,
            Self::InventoryUnavailable { .. } => exit_code::INVENTORY,
            Self::BackendUnavailable { .. } => exit_code::BACKEND,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::BackendUnavailable { reason } => CliError::BackendUnavailable { reason },
            CoreError::InventorySourceUnavailable { reason } => {
                CliError::InventoryUnavailable { reason }
            }
            CoreError::UnsupportedVersion { version, supported } => {
                CliError::UnsupportedVersion { version, supported }
            }
            other @ (CoreError::CreateFailed { .. }
            | CoreError::UpdateFailed { .. }
            | CoreError::Internal(_)) => CliError::Internal(other.to_string()),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NotFound { path } => CliError::NoDatafile {
                path: path.display().to_string(),
            },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other @ (ConfigError::Serialization(_) | ConfigError::Figment(_)) => {
                CliError::Config {
                    message: other.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn collaborator_failures_have_distinct_exit_codes() {
        let inventory = CliError::from(CoreError::InventorySourceUnavailable {
            reason: "missing".into(),
        });
        let backend = CliError::from(CoreError::BackendUnavailable {
            reason: "truncated".into(),
        });
        assert_eq!(inventory.exit_code(), exit_code::INVENTORY);
        assert_eq!(backend.exit_code(), exit_code::BACKEND);
    }

    #[test]
    fn missing_datafile_is_a_config_error() {
        let err = CliError::from(ConfigError::NotFound {
            path: PathBuf::from("/nope.yaml"),
        });
        assert_eq!(err.exit_code(), exit_code::CONFIG);
        assert_eq!(err.to_string(), "Data file not found: /nope.yaml");
    }

    #[test]
    fn core_version_error_exits_with_config_code() {
        let version = CliError::from(CoreError::UnsupportedVersion {
            version: "9".into(),
            supported: "legacy".into(),
        });
        let internal = CliError::from(CoreError::Internal("boom".into()));
        assert_eq!(version.exit_code(), exit_code::CONFIG);
        assert_eq!(internal.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn sync_failures_are_general() {
        assert_eq!(
            CliError::SyncFailures { count: 2 }.exit_code(),
            exit_code::GENERAL
        );
    }
}
