#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use netbox2ise_api::ise_models::{IpEntry, NetworkDevice};
use netbox2ise_api::{Error, GroupUpdate, IseSnapshot};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

fn write_snapshot(dir: &TempDir, body: &serde_json::Value) -> PathBuf {
    let path = dir.path().join("ise.json");
    std::fs::write(&path, serde_json::to_string_pretty(body).unwrap()).unwrap();
    path
}

fn group_pages(count: usize) -> serde_json::Value {
    let groups: Vec<_> = (0..count)
        .map(|i| json!({"id": format!("g{i}"), "name": format!("Tenant#Tenant#T{i}"), "description": ""}))
        .collect();
    let total = count;
    let pages: Vec<_> = groups
        .chunks(20)
        .map(|chunk| json!({"SearchResult": {"total": total, "resources": chunk}}))
        .collect();
    json!(pages)
}

#[test]
fn open_reads_every_page() {
    let dir = TempDir::new().unwrap();
    let path = write_snapshot(&dir, &json!({ "groups": group_pages(45) }));

    let snapshot = IseSnapshot::open(&path).unwrap();
    assert_eq!(snapshot.groups().count(), 45);
    assert!(snapshot.group_by_name("Tenant#Tenant#T44").is_some());
}

#[test]
fn open_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = IseSnapshot::open(dir.path().join("absent.json")).unwrap_err();
    assert!(err.is_io());
}

#[test]
fn open_malformed_file_keeps_body() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ise.json");
    std::fs::write(&path, "{ not json").unwrap();

    match IseSnapshot::open(&path).unwrap_err() {
        Error::Deserialization { body, .. } => assert_eq!(body, "{ not json"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn device_details_are_joined_by_name() {
    let dir = TempDir::new().unwrap();
    let path = write_snapshot(
        &dir,
        &json!({
            "devices": [{"SearchResult": {"total": 1, "resources": [{"id": "d1", "name": "sw1"}]}}],
            "device_details": {
                "sw1": {"NetworkDevice": {
                    "id": "d1",
                    "name": "sw1",
                    "description": "From NetBox: https://netbox/api/dcim/devices/1/",
                    "profileName": "Cisco",
                    "coaPort": 1700,
                    "NetworkDeviceIPList": [{"ipaddress": "10.0.0.5", "mask": 32}],
                    "NetworkDeviceGroupList": ["IPSEC#Is IPSEC Device#No"],
                    "snmpsettings": {"version": "TWO_C"}
                }}
            }
        }),
    );

    let snapshot = IseSnapshot::open(&path).unwrap();
    let device = snapshot.device("sw1").unwrap();
    assert_eq!(device.coa_port, Some(1700));
    assert_eq!(
        device.ip_list,
        vec![IpEntry {
            ipaddress: "10.0.0.5".into(),
            mask: 32
        }]
    );
    assert!(device.extra.contains_key("snmpsettings"));
}

#[test]
fn save_round_trips_writes() {
    let dir = TempDir::new().unwrap();
    let path = write_snapshot(&dir, &json!({ "groups": group_pages(3) }));

    let mut snapshot = IseSnapshot::open(&path).unwrap();
    snapshot
        .create_group("Location#All Locations#SiteA", "From NetBox SoT", Some("Location"))
        .unwrap();
    snapshot
        .update_group(
            "g0",
            GroupUpdate {
                description: Some("From NetBox SoT".into()),
                ..GroupUpdate::default()
            },
        )
        .unwrap();
    snapshot
        .create_device(NetworkDevice {
            name: "sw1".into(),
            ..NetworkDevice::default()
        })
        .unwrap();
    snapshot.save().unwrap();
    assert!(!snapshot.is_dirty());

    let reloaded = IseSnapshot::open(&path).unwrap();
    assert_eq!(reloaded.groups().count(), 4);
    assert_eq!(
        reloaded
            .group_by_name("Tenant#Tenant#T0")
            .unwrap()
            .description
            .as_deref(),
        Some("From NetBox SoT")
    );
    assert_eq!(
        reloaded
            .group_by_name("Location#All Locations#SiteA")
            .unwrap()
            .othername
            .as_deref(),
        Some("Location")
    );
    assert!(reloaded.device("sw1").unwrap().id.is_some());
}

#[test]
fn update_unknown_device_is_rejected() {
    let mut snapshot = IseSnapshot::empty("unused.json");
    let err = snapshot
        .update_device(
            "ghost",
            NetworkDevice {
                name: "ghost".into(),
                ..NetworkDevice::default()
            },
        )
        .unwrap_err();
    assert!(err.is_write_rejection());
}
