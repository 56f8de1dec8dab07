// ── ERS flavour ──

use netbox2ise_api::GroupUpdate;

use super::snapshot::Flavour;

/// Pre-SDK ERS API. Group updates carry only the description.
#[derive(Debug, Clone, Copy)]
pub struct Ers;

impl Flavour for Ers {
    fn othername(_group: &str) -> Option<String> {
        None
    }

    fn group_update(_group: &str, description: &str) -> GroupUpdate {
        GroupUpdate {
            description: Some(description.to_owned()),
            ..GroupUpdate::default()
        }
    }

    fn device_created(name: &str) -> String {
        format!("{name} created")
    }
}
