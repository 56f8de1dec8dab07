// ── Structural field diff ──
//
// Field-level comparison of two device records over an explicit, typed set
// of paths. Nested protocol fields are only compared when both sides carry
// the enclosing block; otherwise the block itself is reported as added or
// removed.

use serde::Serialize;
use serde_json::{Value, json};
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::model::{DeviceRecord, RadiusSettings, TacacsSettings};

/// Every comparable path of a device record, named as ISE names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter)]
pub enum FieldPath {
    #[strum(to_string = "id")]
    #[serde(rename = "id")]
    Id,
    #[strum(to_string = "link")]
    #[serde(rename = "link")]
    Link,
    #[strum(to_string = "name")]
    #[serde(rename = "name")]
    Name,
    #[strum(to_string = "description")]
    #[serde(rename = "description")]
    Description,
    #[strum(to_string = "profileName")]
    #[serde(rename = "profileName")]
    ProfileName,
    #[strum(to_string = "coaPort")]
    #[serde(rename = "coaPort")]
    CoaPort,
    #[strum(to_string = "NetworkDeviceIPList")]
    #[serde(rename = "NetworkDeviceIPList")]
    IpList,
    #[strum(to_string = "NetworkDeviceGroupList")]
    #[serde(rename = "NetworkDeviceGroupList")]
    GroupList,

    #[strum(to_string = "tacacsSettings")]
    #[serde(rename = "tacacsSettings")]
    Tacacs,
    #[strum(to_string = "tacacsSettings.sharedSecret")]
    #[serde(rename = "tacacsSettings.sharedSecret")]
    TacacsSharedSecret,
    #[strum(to_string = "tacacsSettings.connectModeOptions")]
    #[serde(rename = "tacacsSettings.connectModeOptions")]
    TacacsConnectMode,
    #[strum(to_string = "tacacsSettings.previousSharedSecret")]
    #[serde(rename = "tacacsSettings.previousSharedSecret")]
    TacacsPreviousSharedSecret,
    #[strum(to_string = "tacacsSettings.previousSharedSecretExpiry")]
    #[serde(rename = "tacacsSettings.previousSharedSecretExpiry")]
    TacacsPreviousSharedSecretExpiry,

    #[strum(to_string = "authenticationSettings")]
    #[serde(rename = "authenticationSettings")]
    Radius,
    #[strum(to_string = "authenticationSettings.networkProtocol")]
    #[serde(rename = "authenticationSettings.networkProtocol")]
    RadiusNetworkProtocol,
    #[strum(to_string = "authenticationSettings.radiusSharedSecret")]
    #[serde(rename = "authenticationSettings.radiusSharedSecret")]
    RadiusSharedSecret,
    #[strum(to_string = "authenticationSettings.enableKeyWrap")]
    #[serde(rename = "authenticationSettings.enableKeyWrap")]
    RadiusEnableKeyWrap,
    #[strum(to_string = "authenticationSettings.dtlsRequired")]
    #[serde(rename = "authenticationSettings.dtlsRequired")]
    RadiusDtlsRequired,
    #[strum(to_string = "authenticationSettings.keyEncryptionKey")]
    #[serde(rename = "authenticationSettings.keyEncryptionKey")]
    RadiusKeyEncryptionKey,
    #[strum(to_string = "authenticationSettings.messageAuthenticatorCodeKey")]
    #[serde(rename = "authenticationSettings.messageAuthenticatorCodeKey")]
    RadiusMessageAuthenticatorCodeKey,
    #[strum(to_string = "authenticationSettings.keyInputFormat")]
    #[serde(rename = "authenticationSettings.keyInputFormat")]
    RadiusKeyInputFormat,
    #[strum(to_string = "authenticationSettings.enableMultiSecret")]
    #[serde(rename = "authenticationSettings.enableMultiSecret")]
    RadiusEnableMultiSecret,
}

/// Paths never compared.
///
/// Identity fields belong to the appliance, group membership is diffed
/// separately, the previous TACACS secret is write-only, and the name is
/// tolerated so IP-paired renames reconcile cleanly.
pub const EXCLUDED_PATHS: &[FieldPath] = &[
    FieldPath::Id,
    FieldPath::Link,
    FieldPath::Name,
    FieldPath::GroupList,
    FieldPath::TacacsPreviousSharedSecret,
    FieldPath::TacacsPreviousSharedSecretExpiry,
];

impl FieldPath {
    pub fn is_excluded(self) -> bool {
        EXCLUDED_PATHS.contains(&self)
    }

    /// Values at these paths are redacted in rendered output.
    pub fn is_secret(self) -> bool {
        matches!(
            self,
            Self::TacacsSharedSecret
                | Self::TacacsPreviousSharedSecret
                | Self::RadiusSharedSecret
                | Self::RadiusKeyEncryptionKey
                | Self::RadiusMessageAuthenticatorCodeKey
        )
    }

    /// The enclosing protocol block, for nested paths.
    pub fn parent(self) -> Option<Self> {
        match self {
            Self::TacacsSharedSecret
            | Self::TacacsConnectMode
            | Self::TacacsPreviousSharedSecret
            | Self::TacacsPreviousSharedSecretExpiry => Some(Self::Tacacs),
            Self::RadiusNetworkProtocol
            | Self::RadiusSharedSecret
            | Self::RadiusEnableKeyWrap
            | Self::RadiusDtlsRequired
            | Self::RadiusKeyEncryptionKey
            | Self::RadiusMessageAuthenticatorCodeKey
            | Self::RadiusKeyInputFormat
            | Self::RadiusEnableMultiSecret => Some(Self::Radius),
            _ => None,
        }
    }

    /// Read the value at this path. `None` means the field is absent.
    pub fn read(self, device: &DeviceRecord) -> Option<Value> {
        let tacacs = device.tacacs.as_ref();
        let radius = device.radius.as_ref();
        match self {
            Self::Id => device.id.as_deref().map(Value::from),
            Self::Link => device.link.as_deref().map(Value::from),
            Self::Name => Some(Value::from(device.name.as_str())),
            Self::Description => device.description.as_deref().map(Value::from),
            Self::ProfileName => device.profile_name.as_deref().map(Value::from),
            Self::CoaPort => device.coa_port.map(Value::from),
            Self::IpList => Some(
                device
                    .ip_addresses
                    .iter()
                    .map(|ip| json!(format!("{}/{}", ip.address, ip.mask)))
                    .collect(),
            ),
            Self::GroupList => Some(json!(device.groups)),
            Self::Tacacs => tacacs.map(|_| Value::Bool(true)),
            Self::TacacsSharedSecret => tacacs_text(tacacs, |t| t.shared_secret.as_deref()),
            Self::TacacsConnectMode => tacacs_text(tacacs, |t| t.connect_mode_options.as_deref()),
            Self::TacacsPreviousSharedSecret => {
                tacacs_text(tacacs, |t| t.previous_shared_secret.as_deref())
            }
            Self::TacacsPreviousSharedSecretExpiry => {
                tacacs_text(tacacs, |t| t.previous_shared_secret_expiry.as_deref())
            }
            Self::Radius => radius.map(|_| Value::Bool(true)),
            Self::RadiusNetworkProtocol => radius_text(radius, |r| r.network_protocol.as_deref()),
            Self::RadiusSharedSecret => radius_text(radius, |r| r.radius_shared_secret.as_deref()),
            Self::RadiusEnableKeyWrap => radius.and_then(|r| r.enable_key_wrap).map(Value::Bool),
            Self::RadiusDtlsRequired => radius.and_then(|r| r.dtls_required).map(Value::Bool),
            Self::RadiusKeyEncryptionKey => radius_text(radius, |r| r.key_encryption_key.as_deref()),
            Self::RadiusMessageAuthenticatorCodeKey => {
                radius_text(radius, |r| r.message_authenticator_code_key.as_deref())
            }
            Self::RadiusKeyInputFormat => radius_text(radius, |r| r.key_input_format.as_deref()),
            Self::RadiusEnableMultiSecret => radius_text(radius, |r| r.enable_multi_secret.as_deref()),
        }
    }
}

fn tacacs_text(
    tacacs: Option<&TacacsSettings>,
    field: impl Fn(&TacacsSettings) -> Option<&str>,
) -> Option<Value> {
    tacacs.and_then(field).map(Value::from)
}

fn radius_text(
    radius: Option<&RadiusSettings>,
    field: impl Fn(&RadiusSettings) -> Option<&str>,
) -> Option<Value> {
    radius.and_then(field).map(Value::from)
}

/// How a field differs between current and desired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Removed,
    Changed,
}

/// One structural difference at a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    pub path: FieldPath,
    pub current: Option<Value>,
    pub desired: Option<Value>,
}

impl FieldChange {
    pub fn kind(&self) -> ChangeKind {
        match (&self.current, &self.desired) {
            (None, _) => ChangeKind::Added,
            (_, None) => ChangeKind::Removed,
            _ => ChangeKind::Changed,
        }
    }

    /// Copy with secret values masked.
    pub fn redacted(&self) -> Self {
        if !self.path.is_secret() {
            return self.clone();
        }
        let mask = |v: &Option<Value>| v.as_ref().map(|_| Value::from("********"));
        Self {
            path: self.path,
            current: mask(&self.current),
            desired: mask(&self.desired),
        }
    }
}

/// Differences between `current` and `desired`, in path order.
pub fn field_changes(current: &DeviceRecord, desired: &DeviceRecord) -> Vec<FieldChange> {
    FieldPath::iter()
        .filter(|path| !path.is_excluded())
        .filter(|path| {
            path.parent()
                .is_none_or(|block| block.read(current).is_some() && block.read(desired).is_some())
        })
        .filter_map(|path| {
            let (current, desired) = (path.read(current), path.read(desired));
            (current != desired).then_some(FieldChange {
                path,
                current,
                desired,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IpAddress;

    fn device() -> DeviceRecord {
        DeviceRecord {
            name: "sw1".into(),
            description: Some("From NetBox: u".into()),
            profile_name: Some("Cisco".into()),
            coa_port: Some(1700),
            ip_addresses: vec![IpAddress {
                address: "10.0.0.5".into(),
                mask: 32,
            }],
            groups: vec!["IPSEC#Is IPSEC Device#No".into()],
            tacacs: Some(TacacsSettings {
                shared_secret: Some("tac".into()),
                connect_mode_options: Some("ON_LEGACY".into()),
                ..TacacsSettings::default()
            }),
            ..DeviceRecord::default()
        }
    }

    #[test]
    fn identical_records_have_no_changes() {
        assert!(field_changes(&device(), &device()).is_empty());
    }

    #[test]
    fn excluded_paths_are_ignored() {
        let mut current = device();
        current.id = Some("abc".into());
        current.link = Some("https://ise/ers/config/networkdevice/abc".into());
        current.name = "OLD-sw1".into();
        current.groups.clear();
        if let Some(tacacs) = current.tacacs.as_mut() {
            tacacs.previous_shared_secret = Some("old".into());
            tacacs.previous_shared_secret_expiry = Some("0".into());
        }
        assert!(field_changes(&current, &device()).is_empty());
    }

    #[test]
    fn missing_block_is_reported_once() {
        let mut current = device();
        current.tacacs = None;
        let changes = field_changes(&current, &device());
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path, FieldPath::Tacacs);
        assert_eq!(changes[0].kind(), ChangeKind::Added);
    }

    #[test]
    fn nested_change_is_reported_by_path() {
        let mut current = device();
        if let Some(tacacs) = current.tacacs.as_mut() {
            tacacs.shared_secret = Some("other".into());
        }
        let changes = field_changes(&current, &device());
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path.to_string(), "tacacsSettings.sharedSecret");
        assert_eq!(
            changes[0].redacted().desired,
            Some(Value::from("********"))
        );
    }

    #[test]
    fn description_change_is_detected() {
        let mut current = device();
        current.description = Some("hand edited".into());
        let changes = field_changes(&current, &device());
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path, FieldPath::Description);
        assert_eq!(changes[0].kind(), ChangeKind::Changed);
    }
}
