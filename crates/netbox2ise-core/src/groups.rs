// ── Group derivation ──
//
// Every inventory record maps to an ordered list of ISE network device
// group names: location, device type, role, tenant, IPSEC flag. Virtual
// machines without a role produce no role group, so list length varies
// by record kind.

use crate::canonical::canonicalize;
use crate::model::{InventoryRecord, PhysicalDevice, Tenant, VirtualMachine};

/// Separator between group name segments.
pub const SEPARATOR: char = '#';

/// Placeholder until the inventory carries an IPSEC signal.
pub const IPSEC_GROUP: &str = "IPSEC#Is IPSEC Device#No";

/// Device type group shared by every virtual machine.
pub const VM_DEVICE_TYPE_GROUP: &str = "Device Type#All Device Types#All VMs#General VM";

/// Builds a `Category#Segment...` name. Free-text segments are
/// canonicalized; absent optional segments are skipped.
#[derive(Debug, Clone)]
struct GroupPath(String);

impl GroupPath {
    fn new(root: &str) -> Self {
        Self(root.to_owned())
    }

    fn fixed(mut self, segment: &str) -> Self {
        self.0.push(SEPARATOR);
        self.0.push_str(segment);
        self
    }

    fn segment(self, segment: &str) -> Self {
        self.fixed(&canonicalize(segment))
    }

    fn optional(self, segment: Option<&str>) -> Self {
        match segment {
            Some(s) => self.segment(s),
            None => self,
        }
    }

    fn build(self) -> String {
        self.0
    }
}

/// The group category (root segment) of a group name.
pub fn category(group: &str) -> &str {
    group.split(SEPARATOR).next().unwrap_or(group)
}

/// Ordered group memberships for one inventory record.
pub fn derive_groups(record: &InventoryRecord) -> Vec<String> {
    let mut groups = match record {
        InventoryRecord::Device(device) => device_groups(device),
        InventoryRecord::VirtualMachine(vm) => vm_groups(vm),
    };
    groups.push(tenant_group(record.tenant()));
    groups.push(IPSEC_GROUP.to_owned());
    groups
}

fn device_groups(device: &PhysicalDevice) -> Vec<String> {
    vec![
        locations()
            .segment(&device.site)
            .optional(device.rack.as_deref())
            .build(),
        GroupPath::new("Device Type")
            .fixed("All Device Types")
            .segment(&device.manufacturer)
            .segment(&device.model)
            .build(),
        roles().segment(&device.role).build(),
    ]
}

fn vm_groups(vm: &VirtualMachine) -> Vec<String> {
    let location = match &vm.cluster {
        Some(cluster) => locations()
            .optional(cluster.site.as_deref())
            .fixed("VM Clusters")
            .segment(&cluster.name),
        None => locations()
            .optional(vm.site.as_deref())
            .fixed("VM Clusters")
            .fixed("None"),
    };

    let mut groups = vec![location.build(), VM_DEVICE_TYPE_GROUP.to_owned()];
    if let Some(role) = &vm.role {
        groups.push(roles().segment(role).build());
    }
    groups
}

fn tenant_group(tenant: Option<&Tenant>) -> String {
    GroupPath::new("Tenant")
        .fixed("Tenant")
        .optional(tenant.and_then(|t| t.group.as_deref()))
        .optional(tenant.map(|t| t.name.as_str()))
        .build()
}

fn locations() -> GroupPath {
    GroupPath::new("Location").fixed("All Locations")
}

fn roles() -> GroupPath {
    GroupPath::new("Device Role").fixed("Device Role")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Cluster;

    fn vm() -> VirtualMachine {
        VirtualMachine {
            name: "vm1".into(),
            url: "https://netbox/api/virtualization/virtual-machines/1/".into(),
            primary_address: "10.0.1.5/24".into(),
            site: Some("SiteB".into()),
            cluster: None,
            role: None,
            tenant: None,
        }
    }

    fn device() -> PhysicalDevice {
        PhysicalDevice {
            name: "sw1".into(),
            url: "https://netbox/api/dcim/devices/1/".into(),
            primary_address: "10.0.0.1/24".into(),
            site: "Site(A)/1".into(),
            rack: None,
            manufacturer: "Cisco".into(),
            model: "C9300".into(),
            role: "Access".into(),
            tenant: None,
        }
    }

    #[test]
    fn rackless_device_stops_at_site() {
        let groups = derive_groups(&InventoryRecord::Device(device()));
        assert_eq!(groups[0], "Location#All Locations#SiteA-1");
        assert_eq!(groups.len(), 5);
    }

    #[test]
    fn racked_device_appends_rack() {
        let record = InventoryRecord::Device(PhysicalDevice {
            rack: Some("Row 1/R2".into()),
            ..device()
        });
        assert_eq!(
            derive_groups(&record)[0],
            "Location#All Locations#SiteA-1#Row 1-R2"
        );
    }

    #[test]
    fn unclustered_vm_uses_own_site() {
        let groups = derive_groups(&InventoryRecord::VirtualMachine(vm()));
        assert_eq!(groups[0], "Location#All Locations#SiteB#VM Clusters#None");
        assert_eq!(groups[1], VM_DEVICE_TYPE_GROUP);
    }

    #[test]
    fn vm_without_site_or_cluster_skips_site_segment() {
        let record = InventoryRecord::VirtualMachine(VirtualMachine {
            site: None,
            ..vm()
        });
        let groups = derive_groups(&record);
        assert_eq!(groups[0], "Location#All Locations#VM Clusters#None");
    }

    #[test]
    fn vm_without_role_omits_role_group() {
        let groups = derive_groups(&InventoryRecord::VirtualMachine(vm()));
        assert_eq!(groups.len(), 4);
        assert!(!groups.iter().any(|g| g.starts_with("Device Role")));
    }

    #[test]
    fn clustered_vm_uses_cluster_site() {
        let record = InventoryRecord::VirtualMachine(VirtualMachine {
            cluster: Some(Cluster {
                name: "Prod (East)".into(),
                site: Some("SiteA".into()),
            }),
            role: Some("Firewall".into()),
            ..vm()
        });
        let groups = derive_groups(&record);
        assert_eq!(groups[0], "Location#All Locations#SiteA#VM Clusters#Prod East");
        assert_eq!(groups[2], "Device Role#Device Role#Firewall");
    }

    #[test]
    fn tenant_segments_are_optional() {
        assert_eq!(tenant_group(None), "Tenant#Tenant");
        let ungrouped = Tenant {
            name: "TeamX".into(),
            group: None,
        };
        assert_eq!(tenant_group(Some(&ungrouped)), "Tenant#Tenant#TeamX");
        let grouped = Tenant {
            name: "TeamX".into(),
            group: Some("R&D/Labs".into()),
        };
        assert_eq!(tenant_group(Some(&grouped)), "Tenant#Tenant#R&D-Labs#TeamX");
    }

    #[test]
    fn category_is_root_segment() {
        assert_eq!(category("Location#All Locations#SiteA"), "Location");
        assert_eq!(category("IPSEC"), "IPSEC");
    }
}
