// ── SDK flavour ──

use netbox2ise_api::GroupUpdate;

use super::snapshot::Flavour;
use crate::groups::category;

/// SDK-era API. Groups carry their category as `othername`, and updates
/// resend the name.
#[derive(Debug, Clone, Copy)]
pub struct Sdk;

impl Flavour for Sdk {
    fn othername(group: &str) -> Option<String> {
        Some(category(group).to_owned())
    }

    fn group_update(group: &str, description: &str) -> GroupUpdate {
        GroupUpdate {
            name: Some(group.to_owned()),
            description: Some(description.to_owned()),
            othername: Self::othername(group),
        }
    }

    fn device_created(name: &str) -> String {
        format!("{name} Added Successfully")
    }
}
