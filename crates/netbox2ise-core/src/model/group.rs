// ── Appliance-side groups ──

use serde::Serialize;

/// A network device group as it currently exists on the appliance.
///
/// Keyed externally by its full `Category#Segment...` name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CurrentGroup {
    pub id: String,
    /// Absent descriptions are normalized to the empty string.
    pub description: String,
}
