// ISE snapshot client
//
// Reads a captured ERS snapshot the way the ERS API is paged: pages of
// `PAGE_SIZE` are consumed while `total > page * PAGE_SIZE`, and device
// details are looked up by name for every listed device. Writes are
// applied to the in-memory state; `save` persists the result as a single
// complete page per collection.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::error::Error;
use crate::ise::models::{
    NetworkDevice, NetworkDeviceDetail, NetworkDeviceGroup, NetworkDeviceSummary, SearchPage,
    SearchResult, SnapshotDocument,
};

/// Page size used by the ERS listing endpoints.
pub const PAGE_SIZE: u64 = 20;

/// Fields written by a group update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub othername: Option<String>,
}

/// One entry of the ERS `UpdatedFieldsList` response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdatedField {
    pub field: String,
    #[serde(rename = "oldValue")]
    pub old_value: Option<Value>,
    #[serde(rename = "newValue")]
    pub new_value: Option<Value>,
}

/// A captured ISE snapshot, keyed the way ERS addresses each resource:
/// groups by id, devices by name.
#[derive(Debug, Clone)]
pub struct IseSnapshot {
    path: PathBuf,
    groups: IndexMap<String, NetworkDeviceGroup>,
    devices: IndexMap<String, NetworkDevice>,
    dirty: bool,
}

impl IseSnapshot {
    /// Read and parse a snapshot file, walking its listing pages.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading ISE snapshot");

        let body = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let document: SnapshotDocument =
            serde_json::from_str(&body).map_err(|e| Error::deserialization(&e, &body))?;

        Self::from_document(path, document)
    }

    /// Build a snapshot from an already-parsed document.
    pub fn from_document(
        path: impl Into<PathBuf>,
        document: SnapshotDocument,
    ) -> Result<Self, Error> {
        let SnapshotDocument {
            groups: group_pages,
            devices: device_pages,
            mut device_details,
        } = document;

        let groups = collect_pages("network device group", group_pages)?
            .into_iter()
            .map(|g| (g.id.clone(), g))
            .collect();

        let mut devices = IndexMap::new();
        for summary in collect_pages("network device", device_pages)? {
            trace!(name = %summary.name, "looking up network device details");
            match device_details.shift_remove(&summary.name) {
                Some(detail) => {
                    devices.insert(summary.name, detail.network_device);
                }
                None => warn!(name = %summary.name, "listed network device has no details, skipping"),
            }
        }

        Ok(Self {
            path: path.into(),
            groups,
            devices,
            dirty: false,
        })
    }

    /// An empty snapshot that will be written to `path` on save.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            groups: IndexMap::new(),
            devices: IndexMap::new(),
            dirty: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether any write has been applied since load or the last save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn groups(&self) -> impl Iterator<Item = &NetworkDeviceGroup> {
        self.groups.values()
    }

    pub fn devices(&self) -> impl Iterator<Item = &NetworkDevice> {
        self.devices.values()
    }

    pub fn device(&self, name: &str) -> Option<&NetworkDevice> {
        self.devices.get(name)
    }

    pub fn group_by_name(&self, name: &str) -> Option<&NetworkDeviceGroup> {
        self.groups.values().find(|g| g.name == name)
    }

    // ── Group writes ─────────────────────────────────────────────────

    /// `POST /ers/config/networkdevicegroup`
    pub fn create_group(
        &mut self,
        name: &str,
        description: &str,
        othername: Option<&str>,
    ) -> Result<NetworkDeviceGroup, Error> {
        if self.group_by_name(name).is_some() {
            return Err(Error::AlreadyExists {
                kind: "network device group",
                name: name.to_owned(),
            });
        }

        let group = NetworkDeviceGroup {
            id: Uuid::new_v4().to_string(),
            name: name.to_owned(),
            description: Some(description.to_owned()),
            othername: othername.map(str::to_owned),
            extra: serde_json::Map::new(),
        };
        debug!(name, id = %group.id, "creating network device group");

        self.groups.insert(group.id.clone(), group.clone());
        self.dirty = true;
        Ok(group)
    }

    /// `PUT /ers/config/networkdevicegroup/{id}`
    pub fn update_group(
        &mut self,
        id: &str,
        update: GroupUpdate,
    ) -> Result<Vec<UpdatedField>, Error> {
        let group = self.groups.get_mut(id).ok_or_else(|| Error::NotFound {
            kind: "network device group",
            identifier: id.to_owned(),
        })?;
        debug!(id, name = %group.name, "updating network device group");

        let mut updated = Vec::new();
        if let Some(name) = update.name {
            record_change(&mut updated, "name", Some(&group.name), Some(&name));
            group.name = name;
        }
        if let Some(description) = update.description {
            record_change(
                &mut updated,
                "description",
                group.description.as_ref(),
                Some(&description),
            );
            group.description = Some(description);
        }
        if let Some(othername) = update.othername {
            record_change(
                &mut updated,
                "othername",
                group.othername.as_ref(),
                Some(&othername),
            );
            group.othername = Some(othername);
        }

        self.dirty = true;
        Ok(updated)
    }

    // ── Device writes ────────────────────────────────────────────────

    /// `POST /ers/config/networkdevice`
    pub fn create_device(&mut self, mut device: NetworkDevice) -> Result<NetworkDevice, Error> {
        if self.devices.contains_key(&device.name) {
            return Err(Error::AlreadyExists {
                kind: "network device",
                name: device.name,
            });
        }

        device.id = Some(Uuid::new_v4().to_string());
        device.link = None;
        debug!(name = %device.name, "creating network device");

        self.devices.insert(device.name.clone(), device.clone());
        self.dirty = true;
        Ok(device)
    }

    /// `PUT /ers/config/networkdevice/name/{name}`
    ///
    /// Replaces the managed configuration of the device currently named
    /// `name`. The payload may carry a different name, which renames the
    /// device. The appliance-side id, link, and unmanaged settings are kept.
    pub fn update_device(
        &mut self,
        name: &str,
        mut device: NetworkDevice,
    ) -> Result<Vec<UpdatedField>, Error> {
        if device.name != name && self.devices.contains_key(&device.name) {
            return Err(Error::AlreadyExists {
                kind: "network device",
                name: device.name,
            });
        }

        let existing = self.devices.shift_remove(name).ok_or_else(|| Error::NotFound {
            kind: "network device",
            identifier: name.to_owned(),
        })?;
        debug!(name, new_name = %device.name, "updating network device");

        device.id.clone_from(&existing.id);
        device.link.clone_from(&existing.link);
        for (key, value) in &existing.extra {
            device
                .extra
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }

        let updated = updated_fields(&existing, &device)?;
        self.devices.insert(device.name.clone(), device);
        self.dirty = true;
        Ok(updated)
    }

    // ── Persistence ──────────────────────────────────────────────────

    /// Render the current state as a snapshot document.
    pub fn to_document(&self) -> SnapshotDocument {
        let groups: Vec<NetworkDeviceGroup> = self.groups.values().cloned().collect();
        let summaries: Vec<NetworkDeviceSummary> = self
            .devices
            .values()
            .map(|d| NetworkDeviceSummary {
                id: d.id.clone(),
                name: d.name.clone(),
                extra: serde_json::Map::new(),
            })
            .collect();
        let device_details = self
            .devices
            .iter()
            .map(|(name, d)| {
                (
                    name.clone(),
                    NetworkDeviceDetail {
                        network_device: d.clone(),
                    },
                )
            })
            .collect();

        SnapshotDocument {
            groups: vec![single_page(groups)],
            devices: vec![single_page(summaries)],
            device_details,
        }
    }

    /// Write the snapshot back to its path.
    pub fn save(&mut self) -> Result<(), Error> {
        let body = serde_json::to_string_pretty(&self.to_document())?;
        std::fs::write(&self.path, body).map_err(|e| Error::io(&self.path, e))?;
        debug!(path = %self.path.display(), "saved ISE snapshot");
        self.dirty = false;
        Ok(())
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Concatenate listing pages the way the ERS pager walks them.
///
/// An empty page list is an empty collection. Otherwise pages are consumed
/// until `total <= pages_read * PAGE_SIZE` or every entry has been seen
/// (saved snapshots hold one oversized page); running out first means the
/// capture was truncated.
fn collect_pages<T>(collection: &'static str, pages: Vec<SearchPage<T>>) -> Result<Vec<T>, Error> {
    let mut all = Vec::new();
    if pages.is_empty() {
        return Ok(all);
    }

    let mut total = 0;
    let mut read: u64 = 0;
    for page in pages {
        read += 1;
        total = page.search_result.total;
        trace!(collection, page = read, total, "reading page");
        all.extend(page.search_result.resources);

        let received = u64::try_from(all.len()).unwrap_or(u64::MAX);
        if total <= read * PAGE_SIZE || received >= total {
            return Ok(all);
        }
    }

    Err(Error::IncompletePages {
        collection,
        total,
        received: u64::try_from(all.len()).unwrap_or(u64::MAX),
    })
}

fn single_page<T>(resources: Vec<T>) -> SearchPage<T> {
    SearchPage {
        search_result: SearchResult {
            total: u64::try_from(resources.len()).unwrap_or(u64::MAX),
            resources,
        },
    }
}

fn record_change(
    updated: &mut Vec<UpdatedField>,
    field: &str,
    old: Option<&String>,
    new: Option<&String>,
) {
    if old != new {
        updated.push(UpdatedField {
            field: field.to_owned(),
            old_value: old.map(|v| Value::String(v.clone())),
            new_value: new.map(|v| Value::String(v.clone())),
        });
    }
}

/// Top-level fields whose JSON value differs between two device payloads.
fn updated_fields(old: &NetworkDevice, new: &NetworkDevice) -> Result<Vec<UpdatedField>, Error> {
    let Value::Object(old) = serde_json::to_value(old)? else {
        return Ok(Vec::new());
    };
    let Value::Object(mut new) = serde_json::to_value(new)? else {
        return Ok(Vec::new());
    };

    let mut fields = Vec::new();
    for (field, old_value) in old {
        let new_value = new.remove(&field);
        if new_value.as_ref() != Some(&old_value) {
            fields.push(UpdatedField {
                field,
                old_value: Some(old_value),
                new_value,
            });
        }
    }
    fields.extend(new.into_iter().map(|(field, value)| UpdatedField {
        field,
        old_value: None,
        new_value: Some(value),
    }));
    Ok(fields)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn group(id: &str, name: &str) -> NetworkDeviceGroup {
        NetworkDeviceGroup {
            id: id.into(),
            name: name.into(),
            description: Some(String::new()),
            othername: None,
            extra: serde_json::Map::new(),
        }
    }

    fn page<T>(total: u64, resources: Vec<T>) -> SearchPage<T> {
        SearchPage {
            search_result: SearchResult { total, resources },
        }
    }

    #[test]
    fn collect_pages_stops_when_total_is_covered() {
        let pages = vec![page(21, vec![1; 20]), page(21, vec![2]), page(21, vec![3])];
        let all = collect_pages("test", pages).unwrap();
        assert_eq!(all.len(), 21);
        assert_eq!(all.last(), Some(&2));
    }

    #[test]
    fn collect_pages_reports_truncated_capture() {
        let pages = vec![page(45, vec![0; 20]), page(45, vec![0; 20])];
        let err = collect_pages("test", pages).unwrap_err();
        assert!(
            matches!(
                err,
                Error::IncompletePages {
                    total: 45,
                    received: 40,
                    ..
                }
            ),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn collect_pages_accepts_no_pages() {
        let all: Vec<u8> = collect_pages("test", Vec::new()).unwrap();
        assert!(all.is_empty());
    }

    #[test]
    fn listed_device_without_details_is_skipped() {
        let document: SnapshotDocument = serde_json::from_value(json!({
            "devices": [{"SearchResult": {"total": 2, "resources": [
                {"id": "1", "name": "sw1"},
                {"id": "2", "name": "sw2"}
            ]}}],
            "device_details": {
                "sw1": {"NetworkDevice": {"id": "1", "name": "sw1"}}
            }
        }))
        .unwrap();

        let snapshot = IseSnapshot::from_document("snap.json", document).unwrap();
        let names: Vec<_> = snapshot.devices().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["sw1"]);
    }

    #[test]
    fn create_group_rejects_duplicate_name() {
        let mut snapshot = IseSnapshot::empty("snap.json");
        snapshot
            .create_group("Tenant#Tenant", "From NetBox SoT", None)
            .unwrap();
        let err = snapshot
            .create_group("Tenant#Tenant", "From NetBox SoT", None)
            .unwrap_err();
        assert!(err.is_write_rejection());
    }

    #[test]
    fn update_group_reports_changed_fields() {
        let mut snapshot = IseSnapshot::empty("snap.json");
        snapshot
            .groups
            .insert("g1".into(), group("g1", "Tenant#Tenant"));

        let updated = snapshot
            .update_group(
                "g1",
                GroupUpdate {
                    description: Some("From NetBox SoT".into()),
                    ..GroupUpdate::default()
                },
            )
            .unwrap();

        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].field, "description");
        assert_eq!(
            snapshot.group_by_name("Tenant#Tenant").unwrap().description.as_deref(),
            Some("From NetBox SoT")
        );
        assert!(snapshot.is_dirty());
    }

    #[test]
    fn update_unknown_group_is_not_found() {
        let mut snapshot = IseSnapshot::empty("snap.json");
        let err = snapshot
            .update_group("missing", GroupUpdate::default())
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn update_device_renames_and_keeps_identity() {
        let mut snapshot = IseSnapshot::empty("snap.json");
        let mut old = NetworkDevice {
            name: "OLD-D1".into(),
            description: Some("old".into()),
            ..NetworkDevice::default()
        };
        old.extra.insert("snmpsettings".into(), json!({"version": "TWO_C"}));
        let created = snapshot.create_device(old).unwrap();

        let new = NetworkDevice {
            name: "D1".into(),
            description: Some("new".into()),
            ..NetworkDevice::default()
        };
        let updated = snapshot.update_device("OLD-D1", new).unwrap();

        let renamed = snapshot.device("D1").unwrap();
        assert_eq!(renamed.id, created.id);
        assert!(renamed.extra.contains_key("snmpsettings"));
        assert!(snapshot.device("OLD-D1").is_none());

        let fields: Vec<_> = updated.iter().map(|f| f.field.as_str()).collect();
        assert!(fields.contains(&"name"));
        assert!(fields.contains(&"description"));
        assert!(!fields.contains(&"snmpsettings"));
    }
}
