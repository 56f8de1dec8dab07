// Cisco ISE ERS resource types
//
// Models for the ERS `SearchResult` envelope, network device groups, and
// network devices. Field presence varies by ISE release and by which
// protocols are enabled on a device, so nearly everything is optional and
// unmodelled fields land in `extra`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Envelopes ────────────────────────────────────────────────────────

/// ERS search envelope, one per page:
/// ```json
/// { "SearchResult": { "total": 42, "resources": [...] } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPage<T> {
    #[serde(rename = "SearchResult")]
    pub search_result: SearchResult<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct SearchResult<T> {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub resources: Vec<T>,
}

/// Envelope returned by `GET /ers/config/networkdevice/name/{name}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkDeviceDetail {
    #[serde(rename = "NetworkDevice")]
    pub network_device: NetworkDevice,
}

// ── Network device groups ────────────────────────────────────────────

/// Network device group as listed by `/ers/config/networkdevicegroup`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkDeviceGroup {
    pub id: String,
    /// Full hierarchical name, e.g. `Location#All Locations#SiteA`.
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Group category (the root of `name`). Only set by newer API versions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub othername: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Network devices ──────────────────────────────────────────────────

/// Summary row from the network device listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkDeviceSummary {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Full network device configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkDevice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Value>,
    #[serde(default, rename = "profileName")]
    pub profile_name: Option<String>,
    #[serde(default, rename = "coaPort")]
    pub coa_port: Option<u32>,
    #[serde(default, rename = "NetworkDeviceIPList")]
    pub ip_list: Vec<IpEntry>,
    #[serde(default, rename = "NetworkDeviceGroupList")]
    pub group_list: Vec<String>,
    #[serde(
        default,
        rename = "tacacsSettings",
        skip_serializing_if = "Option::is_none"
    )]
    pub tacacs_settings: Option<TacacsSettings>,
    #[serde(
        default,
        rename = "authenticationSettings",
        skip_serializing_if = "Option::is_none"
    )]
    pub authentication_settings: Option<AuthenticationSettings>,
    /// Catch-all for settings this tool does not manage (SNMP, TrustSec, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpEntry {
    pub ipaddress: String,
    #[serde(default = "default_mask")]
    pub mask: u8,
}

fn default_mask() -> u8 {
    32
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TacacsSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_mode_options: Option<String>,
    /// Write-only on the appliance side; never echoed back reliably.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_shared_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_shared_secret_expiry: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_shared_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_key_wrap: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dtls_required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_encryption_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_authenticator_code_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_input_format: Option<String>,
    /// ISE sends this as the string `"true"` / `"false"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_multi_secret: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Snapshot document ────────────────────────────────────────────────

/// On-disk layout of a captured ISE snapshot.
///
/// `groups` and `devices` hold the listing pages exactly as ERS returned
/// them; `device_details` holds the per-device lookups keyed by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotDocument {
    #[serde(default)]
    pub groups: Vec<SearchPage<NetworkDeviceGroup>>,
    #[serde(default)]
    pub devices: Vec<SearchPage<NetworkDeviceSummary>>,
    #[serde(default)]
    pub device_details: IndexMap<String, NetworkDeviceDetail>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_page_without_resources_deserializes() {
        let page: SearchPage<NetworkDeviceGroup> =
            serde_json::from_str(r#"{"SearchResult": {"total": 0}}"#).unwrap();
        assert_eq!(page.search_result.total, 0);
        assert!(page.search_result.resources.is_empty());
    }

    #[test]
    fn device_summary_page_deserializes() {
        let page: SearchPage<NetworkDeviceSummary> = serde_json::from_str(
            r#"{"SearchResult": {"total": 1, "resources": [{"id": "d1", "name": "sw1"}]}}"#,
        )
        .unwrap();
        assert_eq!(page.search_result.resources.len(), 1);
        assert_eq!(page.search_result.resources[0].name, "sw1");
    }
}
