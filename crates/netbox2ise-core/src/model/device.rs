// ── Network device records ──
//
// One shape for both sides of the diff: desired records built from the
// inventory and current records read from the appliance. Current records
// carry an id and link; desired ones never do.

use serde::Serialize;

/// Address entry of a device's IP list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IpAddress {
    pub address: String,
    pub mask: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TacacsSettings {
    pub shared_secret: Option<String>,
    pub connect_mode_options: Option<String>,
    /// Write-only on the appliance; excluded from diffs.
    pub previous_shared_secret: Option<String>,
    /// Write-only on the appliance; excluded from diffs.
    pub previous_shared_secret_expiry: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RadiusSettings {
    pub network_protocol: Option<String>,
    pub radius_shared_secret: Option<String>,
    pub enable_key_wrap: Option<bool>,
    pub dtls_required: Option<bool>,
    pub key_encryption_key: Option<String>,
    pub message_authenticator_code_key: Option<String>,
    pub key_input_format: Option<String>,
    pub enable_multi_secret: Option<String>,
}

impl RadiusSettings {
    /// The appliance reports RADIUS-disabled devices inconsistently: the
    /// block may lack a shared secret entirely, or carry an empty one with
    /// no protocol. Both mean "not configured".
    pub fn is_unconfigured(&self) -> bool {
        match self.radius_shared_secret.as_deref() {
            None => true,
            Some(secret) => secret.is_empty() && self.network_protocol.is_none(),
        }
    }
}

/// A network device in the appliance's shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub profile_name: Option<String>,
    pub coa_port: Option<u32>,
    pub ip_addresses: Vec<IpAddress>,
    /// Ordered `Category#Segment...` group names.
    pub groups: Vec<String>,
    pub tacacs: Option<TacacsSettings>,
    pub radius: Option<RadiusSettings>,
}

impl DeviceRecord {
    /// The address used for identity resolution (first IP entry).
    pub fn primary_ip(&self) -> Option<&str> {
        self.ip_addresses.first().map(|ip| ip.address.as_str())
    }

    /// Drop an unconfigured RADIUS block so it compares equal to "absent".
    pub fn normalize_radius(&mut self) {
        if self.radius.as_ref().is_some_and(RadiusSettings::is_unconfigured) {
            self.radius = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_radius(radius: RadiusSettings) -> DeviceRecord {
        DeviceRecord {
            name: "sw1".into(),
            radius: Some(radius),
            ..DeviceRecord::default()
        }
    }

    #[test]
    fn radius_without_secret_is_dropped() {
        let mut device = with_radius(RadiusSettings {
            network_protocol: Some("RADIUS".into()),
            ..RadiusSettings::default()
        });
        device.normalize_radius();
        assert_eq!(device.radius, None);
    }

    #[test]
    fn empty_secret_without_protocol_is_dropped() {
        let mut device = with_radius(RadiusSettings {
            radius_shared_secret: Some(String::new()),
            enable_key_wrap: Some(false),
            key_input_format: Some("ASCII".into()),
            ..RadiusSettings::default()
        });
        device.normalize_radius();
        assert_eq!(device.radius, None);
    }

    #[test]
    fn empty_secret_with_protocol_is_kept() {
        let mut device = with_radius(RadiusSettings {
            network_protocol: Some("RADIUS".into()),
            radius_shared_secret: Some(String::new()),
            ..RadiusSettings::default()
        });
        device.normalize_radius();
        assert!(device.radius.is_some());
    }
}
