// ── Group reconciliation ──

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use super::StatusCounts;
use crate::model::CurrentGroup;

/// Classification of every desired and current group name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupReconciliation {
    pub correct: HashSet<String>,
    pub incorrect: HashSet<String>,
    pub missing: HashSet<String>,
    pub extra: HashSet<String>,
}

impl GroupReconciliation {
    pub fn counts(&self) -> StatusCounts {
        StatusCounts {
            correct: self.correct.len(),
            incorrect: self.incorrect.len(),
            missing: self.missing.len(),
            extra: self.extra.len(),
        }
    }
}

/// Diff the desired group set against the appliance's groups.
///
/// Description is the only mutable attribute: a group that exists with a
/// different description is `incorrect` and gets updated in place.
pub fn diff_groups(
    desired: &HashSet<String>,
    current: &IndexMap<String, CurrentGroup>,
    desired_description: &str,
) -> GroupReconciliation {
    let mut result = GroupReconciliation::default();

    for name in desired {
        match current.get(name) {
            None => {
                result.missing.insert(name.clone());
            }
            Some(group) if group.description == desired_description => {
                result.correct.insert(name.clone());
            }
            Some(group) => {
                debug!(
                    group = %name,
                    current = %group.description,
                    "group description differs"
                );
                result.incorrect.insert(name.clone());
            }
        }
    }

    result.extra = current
        .keys()
        .filter(|name| !desired.contains(*name))
        .cloned()
        .collect();

    result
}
