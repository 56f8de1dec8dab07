// ── API-to-domain type conversions ──
//
// Bridges raw `netbox2ise_api` shapes into canonical `netbox2ise_core::model`
// types and back. NetBox records missing what the engine requires (a name,
// a primary address, a device role) are rejected here; ISE records are
// normalized leniently (absent becomes empty) since their shape varies by
// release.

use serde_json::Value;
use tracing::debug;

use netbox2ise_api::ise_models::{
    AuthenticationSettings, IpEntry, NetworkDevice, NetworkDeviceGroup,
    TacacsSettings as IseTacacs,
};
use netbox2ise_api::netbox_models::{self, NestedRef, NestedTenant};

use crate::model::{
    Cluster, CurrentGroup, DeviceRecord, InventoryRecord, IpAddress, PhysicalDevice,
    RadiusSettings, TacacsSettings, Tenant, VirtualMachine,
};

// ── Helpers ────────────────────────────────────────────────────────

fn ref_name(r: Option<&NestedRef>) -> Option<String> {
    r.map(|r| r.name.clone())
}

fn tenant(t: Option<&NestedTenant>) -> Option<Tenant> {
    t.map(|t| Tenant {
        name: t.name.clone(),
        group: ref_name(t.group.as_ref()),
    })
}

/// Render a loosely typed ISE value as text.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map.get("href").and_then(value_text),
        other => Some(other.to_string()),
    }
}

// ── NetBox → inventory ─────────────────────────────────────────────

/// A NetBox device as an inventory record, if it has everything the
/// engine needs.
pub fn physical_device(device: &netbox_models::Device) -> Option<InventoryRecord> {
    let Some(name) = device.name.clone() else {
        debug!(id = device.id, "skipping unnamed device");
        return None;
    };
    let Some(primary_ip) = &device.primary_ip else {
        debug!(device = %name, "skipping device without primary IP");
        return None;
    };
    let Some(role) = device.role() else {
        debug!(device = %name, "skipping device without role");
        return None;
    };

    Some(InventoryRecord::Device(PhysicalDevice {
        url: device.url.clone(),
        primary_address: primary_ip.address.clone(),
        site: device.site.name.clone(),
        rack: ref_name(device.rack.as_ref()),
        manufacturer: device.device_type.manufacturer.name.clone(),
        model: device.device_type.model.clone(),
        role: role.name.clone(),
        tenant: tenant(device.tenant.as_ref()),
        name,
    }))
}

/// A NetBox virtual machine as an inventory record, if it has a name and
/// a primary address.
pub fn virtual_machine(vm: &netbox_models::VirtualMachine) -> Option<InventoryRecord> {
    let Some(name) = vm.name.clone() else {
        debug!(id = vm.id, "skipping unnamed virtual machine");
        return None;
    };
    let Some(primary_ip) = &vm.primary_ip else {
        debug!(vm = %name, "skipping virtual machine without primary IP");
        return None;
    };

    Some(InventoryRecord::VirtualMachine(VirtualMachine {
        url: vm.url.clone(),
        primary_address: primary_ip.address.clone(),
        site: ref_name(vm.site.as_ref()),
        cluster: vm.cluster.as_ref().map(|c| Cluster {
            name: c.name.clone(),
            site: ref_name(c.site.as_ref()),
        }),
        role: ref_name(vm.role.as_ref()),
        tenant: tenant(vm.tenant.as_ref()),
        name,
    }))
}

// ── ISE → domain ───────────────────────────────────────────────────

impl From<&NetworkDeviceGroup> for CurrentGroup {
    fn from(group: &NetworkDeviceGroup) -> Self {
        Self {
            id: group.id.clone(),
            description: group.description.clone().unwrap_or_default(),
        }
    }
}

impl From<&IseTacacs> for TacacsSettings {
    fn from(t: &IseTacacs) -> Self {
        Self {
            shared_secret: t.shared_secret.clone(),
            connect_mode_options: t.connect_mode_options.clone(),
            previous_shared_secret: t.previous_shared_secret.clone(),
            previous_shared_secret_expiry: t
                .previous_shared_secret_expiry
                .as_ref()
                .and_then(value_text),
        }
    }
}

impl From<&AuthenticationSettings> for RadiusSettings {
    fn from(a: &AuthenticationSettings) -> Self {
        Self {
            network_protocol: a.network_protocol.clone(),
            radius_shared_secret: a.radius_shared_secret.clone(),
            enable_key_wrap: a.enable_key_wrap,
            dtls_required: a.dtls_required,
            key_encryption_key: a.key_encryption_key.clone(),
            message_authenticator_code_key: a.message_authenticator_code_key.clone(),
            key_input_format: a.key_input_format.clone(),
            enable_multi_secret: a.enable_multi_secret.clone(),
        }
    }
}

impl From<&NetworkDevice> for DeviceRecord {
    fn from(device: &NetworkDevice) -> Self {
        Self {
            id: device.id.clone(),
            link: device.link.as_ref().and_then(value_text),
            name: device.name.clone(),
            description: device.description.clone(),
            profile_name: device.profile_name.clone(),
            coa_port: device.coa_port,
            ip_addresses: device
                .ip_list
                .iter()
                .map(|ip| IpAddress {
                    address: ip.ipaddress.clone(),
                    mask: ip.mask,
                })
                .collect(),
            groups: device.group_list.clone(),
            tacacs: device.tacacs_settings.as_ref().map(TacacsSettings::from),
            radius: device
                .authentication_settings
                .as_ref()
                .map(RadiusSettings::from),
        }
    }
}

// ── Domain → ISE payloads ──────────────────────────────────────────

impl From<&DeviceRecord> for NetworkDevice {
    fn from(device: &DeviceRecord) -> Self {
        Self {
            id: device.id.clone(),
            name: device.name.clone(),
            description: device.description.clone(),
            profile_name: device.profile_name.clone(),
            coa_port: device.coa_port,
            ip_list: device
                .ip_addresses
                .iter()
                .map(|ip| IpEntry {
                    ipaddress: ip.address.clone(),
                    mask: ip.mask,
                })
                .collect(),
            group_list: device.groups.clone(),
            tacacs_settings: device.tacacs.as_ref().map(|t| IseTacacs {
                shared_secret: t.shared_secret.clone(),
                connect_mode_options: t.connect_mode_options.clone(),
                ..IseTacacs::default()
            }),
            authentication_settings: device.radius.as_ref().map(|r| AuthenticationSettings {
                network_protocol: r.network_protocol.clone(),
                radius_shared_secret: r.radius_shared_secret.clone(),
                enable_key_wrap: r.enable_key_wrap,
                dtls_required: r.dtls_required,
                key_encryption_key: r.key_encryption_key.clone(),
                message_authenticator_code_key: r.message_authenticator_code_key.clone(),
                key_input_format: r.key_input_format.clone(),
                enable_multi_secret: r.enable_multi_secret.clone(),
                ..AuthenticationSettings::default()
            }),
            ..NetworkDevice::default()
        }
    }
}
