// ── Desired device builder ──
//
// Turns an inventory record plus optional shared secrets into the device
// record ISE should hold, and reduces a set of desired devices to the
// groups they require.

use std::collections::HashSet;

use secrecy::{ExposeSecret, SecretString};

use crate::groups::derive_groups;
use crate::model::{DeviceRecord, InventoryRecord, IpAddress, RadiusSettings, TacacsSettings};

pub const PROFILE_NAME: &str = "Cisco";
pub const COA_PORT: u32 = 1700;
pub const HOST_MASK: u8 = 32;
pub const TACACS_CONNECT_MODE: &str = "ON_LEGACY";
pub const RADIUS_PROTOCOL: &str = "RADIUS";
pub const KEY_INPUT_FORMAT: &str = "ASCII";

/// Shared secrets applied to every device of a job.
#[derive(Debug, Clone, Default)]
pub struct DeviceSecrets {
    pub tacacs: Option<SecretString>,
    pub radius: Option<SecretString>,
}

impl DeviceSecrets {
    fn tacacs(&self) -> Option<&str> {
        non_empty(self.tacacs.as_ref())
    }

    fn radius(&self) -> Option<&str> {
        non_empty(self.radius.as_ref())
    }
}

fn non_empty(secret: Option<&SecretString>) -> Option<&str> {
    secret.map(ExposeSecret::expose_secret).filter(|s| !s.is_empty())
}

/// Description stamped on every managed device.
pub fn device_description(url: &str) -> String {
    format!("From NetBox: {url}")
}

/// Build the desired ISE configuration for one inventory record.
pub fn build_desired_device(record: &InventoryRecord, secrets: &DeviceSecrets) -> DeviceRecord {
    let address = record
        .primary_address()
        .split('/')
        .next()
        .unwrap_or_default()
        .to_owned();

    DeviceRecord {
        id: None,
        link: None,
        name: record.name().to_owned(),
        description: Some(device_description(record.url())),
        profile_name: Some(PROFILE_NAME.to_owned()),
        coa_port: Some(COA_PORT),
        ip_addresses: vec![IpAddress {
            address,
            mask: HOST_MASK,
        }],
        groups: derive_groups(record),
        tacacs: secrets.tacacs().map(|secret| TacacsSettings {
            shared_secret: Some(secret.to_owned()),
            connect_mode_options: Some(TACACS_CONNECT_MODE.to_owned()),
            ..TacacsSettings::default()
        }),
        radius: secrets.radius().map(|secret| RadiusSettings {
            network_protocol: Some(RADIUS_PROTOCOL.to_owned()),
            radius_shared_secret: Some(secret.to_owned()),
            enable_key_wrap: Some(false),
            dtls_required: Some(false),
            key_encryption_key: Some(String::new()),
            message_authenticator_code_key: Some(String::new()),
            key_input_format: Some(KEY_INPUT_FORMAT.to_owned()),
            enable_multi_secret: Some("false".to_owned()),
        }),
    }
}

/// Every distinct group referenced by `devices`.
pub fn groups_in_use<'a>(devices: impl IntoIterator<Item = &'a DeviceRecord>) -> HashSet<String> {
    devices
        .into_iter()
        .flat_map(|d| d.groups.iter().cloned())
        .collect()
}
