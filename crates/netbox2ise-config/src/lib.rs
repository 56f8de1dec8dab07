//! Data file configuration for netbox2ise.
//!
//! YAML data file (defaults + jobs), environment overrides, validation,
//! shared-secret resolution (env + plaintext + keyring), and translation
//! to `netbox2ise_core::Job`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use netbox2ise_core::{ApiVersion, DeviceSecrets, InventoryQuery, Job};

/// The bundled example data file.
pub const EXAMPLE_DATAFILE: &str = include_str!("../files/datafile-example.yaml");

/// Keyring service name for shared secrets.
pub const KEYRING_SERVICE: &str = "netbox2ise";

/// Prefix for environment overrides (`NETBOX2ISE_DEFAULTS__ISE__VERSION`).
pub const ENV_PREFIX: &str = "NETBOX2ISE_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("data file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to serialize data file: {0}")]
    Serialization(#[from] serde_yaml::Error),

    #[error("data file loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl ConfigError {
    fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// ── Data file structs ───────────────────────────────────────────────

/// Top-level data file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Datafile {
    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub jobs: Vec<JobConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default)]
    pub netbox: NetBoxSettings,

    #[serde(default)]
    pub ise: IseSettings,

    /// Description written to every managed group.
    #[serde(default = "default_group_description")]
    pub group_description: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            netbox: NetBoxSettings::default(),
            ise: IseSettings::default(),
            group_description: default_group_description(),
        }
    }
}

fn default_group_description() -> String {
    "From NetBox SoT".into()
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NetBoxSettings {
    /// NetBox export (JSON).
    #[serde(default)]
    pub export: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct IseSettings {
    /// API version string; `legacy` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// ISE snapshot (JSON).
    #[serde(default)]
    pub snapshot: PathBuf,
}

/// One NetBox query and the secrets for its devices.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct JobConfig {
    pub name: String,

    #[serde(default)]
    pub netbox_query: NetBoxQuery,

    #[serde(default)]
    pub ise_config: IseJobConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct NetBoxQuery {
    #[serde(default)]
    pub sites: Vec<String>,
    #[serde(default)]
    pub device_types: Vec<String>,
    #[serde(default)]
    pub device_roles: Vec<String>,
    #[serde(default)]
    pub tenants: Vec<String>,
    #[serde(default)]
    pub status: Vec<String>,
}

impl From<&NetBoxQuery> for InventoryQuery {
    fn from(q: &NetBoxQuery) -> Self {
        Self {
            sites: q.sites.clone(),
            device_types: q.device_types.clone(),
            roles: q.device_roles.clone(),
            tenants: q.tenants.clone(),
            status: q.status.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct IseJobConfig {
    #[serde(default)]
    pub tacacs: SecretConfig,
    #[serde(default)]
    pub radius: SecretConfig,
}

/// Where to find one shared secret.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SecretConfig {
    /// Plaintext secret (prefer `secret_env` or the keyring).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,

    /// Environment variable holding the secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_env: Option<String>,

    /// Look the secret up in the system keyring.
    #[serde(default)]
    pub keyring: bool,
}

/// Which protocol a shared secret is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SecretKind {
    Tacacs,
    Radius,
}

impl SecretKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Tacacs => "tacacs",
            Self::Radius => "radius",
        }
    }
}

// ── Data file path ──────────────────────────────────────────────────

/// Default data file path via XDG / platform conventions.
pub fn default_datafile_path() -> PathBuf {
    ProjectDirs::from("io", "netbox2ise", "netbox2ise").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("datafile.yaml");
            p
        },
        |dirs| dirs.config_dir().join("datafile.yaml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("netbox2ise");
    p
}

// ── Loading ─────────────────────────────────────────────────────────

/// A data file together with the path it was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedDatafile {
    pub path: PathBuf,
    pub datafile: Datafile,
}

/// Load a data file from `path`, with `NETBOX2ISE_` environment overrides
/// (`__` separates nesting levels).
pub fn load_datafile(path: &Path) -> Result<LoadedDatafile, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    debug!(path = %path.display(), "loading data file");

    let datafile: Datafile = Figment::new()
        .merge(Serialized::defaults(Datafile::default()))
        .merge(Yaml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()?;

    Ok(LoadedDatafile {
        path: path.to_path_buf(),
        datafile,
    })
}

/// Serialize a data file to YAML.
pub fn to_yaml(datafile: &Datafile) -> Result<String, ConfigError> {
    Ok(serde_yaml::to_string(datafile)?)
}

// ── Validation ──────────────────────────────────────────────────────

/// A data file that passed validation, with paths resolved.
#[derive(Debug, Clone)]
pub struct ValidatedDatafile {
    pub version: ApiVersion,
    pub netbox_export: PathBuf,
    pub ise_snapshot: PathBuf,
    pub group_description: String,
    pub jobs: Vec<JobConfig>,
}

impl LoadedDatafile {
    /// Resolve `path` against the data file's directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        self.path
            .parent()
            .map_or_else(|| path.to_path_buf(), |dir| dir.join(path))
    }

    /// Check the data file and resolve its paths.
    pub fn validate(&self) -> Result<ValidatedDatafile, ConfigError> {
        let defaults = &self.datafile.defaults;

        let version = match defaults.ise.version.as_deref() {
            Some(v) => ApiVersion::parse(v)
                .map_err(|e| ConfigError::validation("defaults.ise.version", e.to_string()))?,
            None => {
                warn!("no ISE version configured, defaulting to legacy");
                ApiVersion::Legacy
            }
        };

        if defaults.netbox.export.as_os_str().is_empty() {
            return Err(ConfigError::validation(
                "defaults.netbox.export",
                "a NetBox export path is required",
            ));
        }
        if defaults.ise.snapshot.as_os_str().is_empty() {
            return Err(ConfigError::validation(
                "defaults.ise.snapshot",
                "an ISE snapshot path is required",
            ));
        }

        let jobs = &self.datafile.jobs;
        if jobs.is_empty() {
            return Err(ConfigError::validation("jobs", "at least one job is required"));
        }
        let mut seen = HashSet::new();
        for (i, job) in jobs.iter().enumerate() {
            if job.name.trim().is_empty() {
                return Err(ConfigError::validation(
                    format!("jobs[{i}].name"),
                    "job name must not be empty",
                ));
            }
            if !seen.insert(job.name.as_str()) {
                return Err(ConfigError::validation(
                    format!("jobs[{i}].name"),
                    format!("duplicate job name '{}'", job.name),
                ));
            }
        }

        Ok(ValidatedDatafile {
            version,
            netbox_export: self.resolve_path(&defaults.netbox.export),
            ise_snapshot: self.resolve_path(&defaults.ise.snapshot),
            group_description: defaults.group_description.clone(),
            jobs: jobs.clone(),
        })
    }
}

// ── Secret resolution ───────────────────────────────────────────────

/// Resolve one shared secret from the credential chain:
/// `secret_env` variable, then plaintext `secret`, then the keyring entry
/// `netbox2ise` / `<job>/<kind>` when `keyring` is set.
///
/// An empty or absent secret resolves to `None`.
fn resolve_secret(config: &SecretConfig, job: &str, kind: SecretKind) -> Option<SecretString> {
    // 1. Environment variable
    if let Some(ref env_name) = config.secret_env {
        if let Ok(val) = std::env::var(env_name) {
            if !val.is_empty() {
                return Some(SecretString::from(val));
            }
        }
    }

    // 2. Plaintext in data file
    if let Some(ref secret) = config.secret {
        if !secret.is_empty() {
            return Some(SecretString::from(secret.clone()));
        }
    }

    // 3. System keyring
    if config.keyring {
        let account = format!("{job}/{}", kind.as_str());
        match keyring::Entry::new(KEYRING_SERVICE, &account).and_then(|e| e.get_password()) {
            Ok(secret) if !secret.is_empty() => return Some(SecretString::from(secret)),
            Ok(_) => {}
            Err(e) => debug!(%account, error = %e, "no keyring secret"),
        }
    }

    None
}

/// Resolve both shared secrets for a job.
pub fn resolve_secrets(job: &JobConfig) -> DeviceSecrets {
    DeviceSecrets {
        tacacs: resolve_secret(&job.ise_config.tacacs, &job.name, SecretKind::Tacacs),
        radius: resolve_secret(&job.ise_config.radius, &job.name, SecretKind::Radius),
    }
}

impl ValidatedDatafile {
    /// Engine jobs, in data file order, with secrets resolved.
    pub fn jobs(&self) -> Vec<Job> {
        self.jobs
            .iter()
            .map(|job| Job {
                name: job.name.clone(),
                query: InventoryQuery::from(&job.netbox_query),
                secrets: resolve_secrets(job),
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn loaded(yaml: &str) -> LoadedDatafile {
        LoadedDatafile {
            path: PathBuf::from("/etc/netbox2ise/datafile.yaml"),
            datafile: serde_yaml::from_str(yaml).unwrap(),
        }
    }

    const MINIMAL: &str = "
defaults:
  netbox: { export: netbox.json }
  ise: { version: legacy, snapshot: /var/lib/ise.json }
jobs:
  - name: all
";

    #[test]
    fn relative_paths_resolve_against_datafile_dir() {
        let validated = loaded(MINIMAL).validate().unwrap();
        assert_eq!(
            validated.netbox_export,
            PathBuf::from("/etc/netbox2ise/netbox.json")
        );
        assert_eq!(validated.ise_snapshot, PathBuf::from("/var/lib/ise.json"));
        assert_eq!(validated.group_description, "From NetBox SoT");
    }

    #[test]
    fn missing_version_defaults_to_legacy() {
        let validated = loaded(&MINIMAL.replace("version: legacy, ", ""))
            .validate()
            .unwrap();
        assert_eq!(validated.version, ApiVersion::Legacy);
    }

    #[test]
    fn unknown_version_is_rejected() {
        let err = loaded(&MINIMAL.replace("legacy", "unsupported"))
            .validate()
            .unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation { ref field, .. } if field == "defaults.ise.version")
        );
    }

    #[test]
    fn duplicate_job_names_are_rejected() {
        let yaml = format!("{MINIMAL}  - name: all\n");
        let err = loaded(&yaml).validate().unwrap_err();
        assert!(err.to_string().contains("duplicate job name"));
    }

    #[test]
    fn jobs_are_required() {
        let yaml = MINIMAL.replace("jobs:\n  - name: all\n", "");
        let err = loaded(&yaml).validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "jobs"));
    }

    #[test]
    fn plaintext_secret_is_used_when_env_is_unset() {
        let config = SecretConfig {
            secret: Some("plain".into()),
            secret_env: Some("NETBOX2ISE_TEST_UNSET_SECRET_VAR".into()),
            keyring: false,
        };
        let secret = resolve_secret(&config, "job", SecretKind::Tacacs).unwrap();
        assert_eq!(secret.expose_secret(), "plain");
    }

    #[test]
    fn empty_secret_is_not_configured() {
        let config = SecretConfig {
            secret: Some(String::new()),
            ..SecretConfig::default()
        };
        assert!(resolve_secret(&config, "job", SecretKind::Radius).is_none());
    }

    #[test]
    fn example_datafile_validates() {
        let loaded = loaded(EXAMPLE_DATAFILE);
        let validated = loaded.validate().unwrap();
        assert_eq!(validated.jobs.len(), 2);
        assert_eq!(
            InventoryQuery::from(&validated.jobs[0].netbox_query).roles,
            vec!["Access".to_owned(), "Distribution".to_owned()]
        );
    }
}
