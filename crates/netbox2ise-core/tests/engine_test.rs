#![allow(clippy::unwrap_used)]

use std::collections::HashSet;

use indexmap::IndexMap;
use netbox2ise_core::model::{Cluster, PhysicalDevice, Tenant, VirtualMachine};
use netbox2ise_core::{
    CurrentGroup, DesiredState, DeviceRecord, DeviceSecrets, FieldPath, InventoryRecord,
    build_desired_device, canonicalize, derive_groups, diff_configs, diff_devices, diff_groups,
};
use pretty_assertions::assert_eq;
use secrecy::SecretString;

// ── Fixtures ────────────────────────────────────────────────────────

fn physical(name: &str, address: &str) -> PhysicalDevice {
    PhysicalDevice {
        name: name.into(),
        url: format!("https://netbox.example.com/api/dcim/devices/{name}/"),
        primary_address: address.into(),
        site: "SiteA".into(),
        rack: Some("Rack 1".into()),
        manufacturer: "Cisco/Nexus".into(),
        model: "N9K-C93180YC-EX".into(),
        role: "Access".into(),
        tenant: None,
    }
}

fn records() -> Vec<InventoryRecord> {
    vec![
        InventoryRecord::Device(physical("SW1", "10.0.0.1/24")),
        InventoryRecord::Device(PhysicalDevice {
            tenant: Some(Tenant {
                name: "TeamX".into(),
                group: Some("Engineering".into()),
            }),
            rack: None,
            ..physical("SW2", "10.0.0.2/24")
        }),
        InventoryRecord::VirtualMachine(VirtualMachine {
            name: "FW1".into(),
            url: "https://netbox.example.com/api/virtualization/virtual-machines/1/".into(),
            primary_address: "10.0.9.1/24".into(),
            site: None,
            cluster: Some(Cluster {
                name: "Prod/East".into(),
                site: Some("SiteB".into()),
            }),
            role: Some("Firewall".into()),
            tenant: None,
        }),
    ]
}

fn secrets() -> DeviceSecrets {
    DeviceSecrets {
        tacacs: Some(SecretString::from("tacacs-key")),
        radius: Some(SecretString::from("radius-key")),
    }
}

fn desired_state() -> DesiredState {
    let devices: IndexMap<String, DeviceRecord> = records()
        .iter()
        .map(|r| {
            let d = build_desired_device(r, &secrets());
            (d.name.clone(), d)
        })
        .collect();
    let mut state = DesiredState::default();
    state.merge_job("all", devices);
    state
}

/// Current state built by copying every desired record, as the appliance
/// would report it after a clean sync.
fn mirrored(state: &DesiredState) -> (IndexMap<String, CurrentGroup>, IndexMap<String, DeviceRecord>) {
    let groups = state
        .groups
        .iter()
        .enumerate()
        .map(|(i, name)| {
            (
                name.clone(),
                CurrentGroup {
                    id: format!("g{i}"),
                    description: "From NetBox SoT".into(),
                },
            )
        })
        .collect();
    let devices = state
        .devices
        .iter()
        .enumerate()
        .map(|(i, (name, device))| {
            let mut current = device.clone();
            current.id = Some(format!("d{i}"));
            current.link = Some(format!("https://ise/ers/config/networkdevice/d{i}"));
            (name.clone(), current)
        })
        .collect();
    (groups, devices)
}

// ── Properties ──────────────────────────────────────────────────────

#[test]
fn reconciling_a_mirror_is_all_correct() {
    let state = desired_state();
    let (groups, devices) = mirrored(&state);

    let result = diff_configs(&state, &groups, &devices, "From NetBox SoT");

    assert!(result.is_in_sync());
    assert_eq!(result.groups.correct.len(), state.groups.len());
    assert_eq!(result.devices.correct.len(), state.devices.len());
    for plan in result.devices.correct.values() {
        assert!(plan.changes.is_empty());
        assert!(plan.groups.missing.is_empty());
        assert!(plan.groups.extra.is_empty());
    }
}

#[test]
fn every_name_lands_in_exactly_one_category() {
    let state = desired_state();
    let (mut groups, mut devices) = mirrored(&state);

    // Drift: one stale group, one missing device, one hand-edited device,
    // one device nobody asked for.
    groups.insert(
        "Tenant#Tenant#Retired".into(),
        CurrentGroup {
            id: "gx".into(),
            description: String::new(),
        },
    );
    devices.shift_remove("SW2");
    devices.get_mut("SW1").unwrap().description = Some("hand edited".into());
    let mut stray = devices["FW1"].clone();
    stray.name = "STRAY".into();
    stray.ip_addresses[0].address = "192.0.2.50".into();
    devices.insert("STRAY".into(), stray);

    let result = diff_configs(&state, &groups, &devices, "From NetBox SoT");

    let counts = result.devices.counts();
    assert_eq!(counts.desired(), state.devices.len());
    assert_eq!((counts.correct, counts.incorrect, counts.missing), (1, 1, 1));
    assert!(result.devices.extra.contains_key("STRAY"));

    let group_counts = result.groups.counts();
    assert_eq!(group_counts.desired(), state.groups.len());
    assert_eq!(
        result.groups.extra,
        HashSet::from(["Tenant#Tenant#Retired".to_owned()])
    );

    let device_names: Vec<&String> = result
        .devices
        .correct
        .keys()
        .chain(result.devices.incorrect.keys())
        .chain(result.devices.missing.keys())
        .collect();
    let unique: HashSet<&String> = device_names.iter().copied().collect();
    assert_eq!(unique.len(), device_names.len());
}

#[test]
fn empty_inputs_reconcile_to_nothing() {
    let result = diff_configs(
        &DesiredState::default(),
        &IndexMap::new(),
        &IndexMap::new(),
        "From NetBox SoT",
    );
    assert_eq!(result.groups.counts().desired(), 0);
    assert_eq!(result.devices.counts().desired(), 0);
    assert!(result.devices.extra.is_empty());
}

#[test]
fn canonicalize_is_idempotent_over_awkward_names() {
    for name in ["Gi1/0/1", "(core)", "a//b((c))", "Rack 1", "Cisco/Nexus (9k)"] {
        let once = canonicalize(name);
        assert_eq!(canonicalize(&once), once);
        assert!(!once.contains(['/', '(', ')']), "{once}");
    }
}

#[test]
fn group_derivation_is_deterministic() {
    for record in records() {
        assert_eq!(derive_groups(&record), derive_groups(&record));
    }
}

// ── Scenarios ───────────────────────────────────────────────────────

#[test]
fn physical_device_group_list() {
    let record = InventoryRecord::Device(physical("SW1", "10.0.0.1/24"));
    insta::assert_debug_snapshot!(derive_groups(&record), @r#"
    [
        "Location#All Locations#SiteA#Rack 1",
        "Device Type#All Device Types#Cisco-Nexus#N9K-C93180YC-EX",
        "Device Role#Device Role#Access",
        "Tenant#Tenant",
        "IPSEC#Is IPSEC Device#No",
    ]
    "#);
}

#[test]
fn clustered_vm_group_list() {
    let record = records().pop().unwrap();
    insta::assert_debug_snapshot!(derive_groups(&record), @r#"
    [
        "Location#All Locations#SiteB#VM Clusters#Prod-East",
        "Device Type#All Device Types#All VMs#General VM",
        "Device Role#Device Role#Firewall",
        "Tenant#Tenant",
        "IPSEC#Is IPSEC Device#No",
    ]
    "#);
}

#[test]
fn new_tenant_group_is_missing() {
    let desired: HashSet<String> = HashSet::from(["Tenant#Tenant#TeamX".to_owned()]);
    let result = diff_groups(&desired, &IndexMap::new(), "From NetBox SoT");

    assert_eq!(result.missing, desired);
    assert!(result.extra.is_empty());
    assert!(result.correct.is_empty());
    assert!(result.incorrect.is_empty());
}

#[test]
fn renamed_device_is_paired_by_ip() {
    let desired = build_desired_device(
        &InventoryRecord::Device(physical("D1", "10.0.0.5/24")),
        &DeviceSecrets::default(),
    );
    let mut current = desired.clone();
    current.name = "OLD-D1".into();
    current.id = Some("abc".into());

    let desired_map = IndexMap::from([(desired.name.clone(), desired)]);
    let current_map = IndexMap::from([(current.name.clone(), current)]);

    let result = diff_devices(&desired_map, &current_map);
    let plan = &result.correct["D1"];
    assert_eq!(plan.current_name(), Some("OLD-D1"));
    assert!(plan.is_rename());
    assert!(result.extra.is_empty());
}

#[test]
fn description_only_change_is_incorrect() {
    let desired = build_desired_device(
        &InventoryRecord::Device(physical("D2", "10.0.0.6/24")),
        &secrets(),
    );
    let mut current = desired.clone();
    current.description = Some("From NetBox: somewhere else".into());

    let desired_map = IndexMap::from([(desired.name.clone(), desired)]);
    let current_map = IndexMap::from([(current.name.clone(), current)]);

    let result = diff_devices(&desired_map, &current_map);
    let plan = &result.incorrect["D2"];
    let paths: Vec<FieldPath> = plan.changes.iter().map(|c| c.path).collect();
    assert_eq!(paths, vec![FieldPath::Description]);
    assert!(plan.groups.is_clean());
}
