use std::collections::HashMap;

use api_types::report::ReportField;

use crate::flatten::{FlatItem, flatten_report};

/// Flattened items sharing the same top-level section.
#[derive(Clone, Debug, PartialEq)]
pub struct Group {
    pub key: String,
    pub items: Vec<FlatItem>,
    pub total: f64,
}

/// Explicit ordering for [`sort_groups`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GroupOrder {
    /// First-occurrence order, as produced by [`group`].
    #[default]
    Encounter,
    Alphabetical,
    TotalDescending,
}

/// Groups and malformed paths of one report, ready to render.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReportSummary {
    pub groups: Vec<Group>,
    pub malformed: Vec<Vec<String>>,
}

/// Partitions `items` by their first path segment.
///
/// Groups keep the order in which keys are first seen; totals use plain `f64`
/// addition.
#[must_use]
pub fn group(items: Vec<FlatItem>) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items {
        let slot = match index.get(item.key()) {
            Some(&slot) => slot,
            None => {
                let key = item.key().to_string();
                groups.push(Group {
                    key: key.clone(),
                    items: Vec::new(),
                    total: 0.0,
                });
                index.insert(key, groups.len() - 1);
                groups.len() - 1
            }
        };

        let group = &mut groups[slot];
        group.total += item.value;
        group.items.push(item);
    }

    groups
}

/// Reorders groups; [`GroupOrder::Encounter`] leaves them untouched.
pub fn sort_groups(groups: &mut [Group], order: GroupOrder) {
    match order {
        GroupOrder::Encounter => {}
        GroupOrder::Alphabetical => groups.sort_by(|a, b| a.key.cmp(&b.key)),
        GroupOrder::TotalDescending => groups.sort_by(|a, b| b.total.total_cmp(&a.total)),
    }
}

/// Flattens and groups a report tree.
#[must_use]
pub fn summarize(fields: &ReportField) -> ReportSummary {
    let flat = flatten_report(fields);
    ReportSummary {
        groups: group(flat.items),
        malformed: flat.malformed,
    }
}
