//! Attach time entries to hierarchy nodes and roll totals up the tree.
//!
//! Self time is what was logged directly on a node. Rollup time is self
//! time plus the rollups of every child, computed strictly bottom-up.

use crate::hierarchy::{flatten, HierarchyNode};
use crate::parser::schema::TimeEntry;
use log::debug;
use std::collections::{BTreeMap, HashMap};

/// Entries grouped by the key of the work item they were logged on
pub type EntryIndex<'a> = HashMap<&'a str, Vec<&'a TimeEntry>>;

/// Group entries by issue key
///
/// **Public** - shared by both rollup variants
pub fn index_entries(entries: &[TimeEntry]) -> EntryIndex<'_> {
    let mut index: EntryIndex<'_> = HashMap::new();
    for entry in entries {
        index.entry(entry.issue_key.as_str()).or_default().push(entry);
    }
    index
}

/// Attach entries to the forest and compute per-author rollups
///
/// **Public** - simple rollup, no pruning
///
/// # Arguments
/// * `forest` - Forest from `build_forest`; consumed and rebuilt
/// * `entries` - Time entries; those on keys outside the forest are ignored
///
/// # Returns
/// The same nodes with `self_*` and `rollup_*` populated
pub fn aggregate(forest: Vec<HierarchyNode>, entries: &[TimeEntry]) -> Vec<HierarchyNode> {
    let index = index_entries(entries);

    let forest: Vec<HierarchyNode> = forest
        .into_iter()
        .map(|root| rollup_node(root, &index))
        .collect();

    let attached: usize = flatten(&forest).iter().map(|node| node.entries.len()).sum();
    debug!(
        "Attached {} of {} entries ({} outside the forest)",
        attached,
        entries.len(),
        entries.len().saturating_sub(attached)
    );

    forest
}

/// Post-order: children are finished before the parent sums them
fn rollup_node(mut node: HierarchyNode, index: &EntryIndex<'_>) -> HierarchyNode {
    attach(&mut node, index);

    node.children = std::mem::take(&mut node.children)
        .into_iter()
        .map(|child| rollup_node(child, index))
        .collect();

    node.rollup_seconds = node.self_seconds;
    node.rollup_seconds_by_author = node.self_seconds_by_author.clone();

    for child in &node.children {
        node.rollup_seconds += child.rollup_seconds;
        merge_seconds(&mut node.rollup_seconds_by_author, &child.rollup_seconds_by_author);
    }

    node
}

/// Self time from the entries logged directly on this node
fn attach(node: &mut HierarchyNode, index: &EntryIndex<'_>) {
    let matched: Vec<TimeEntry> = index
        .get(node.issue_key.as_str())
        .map(|entries| entries.iter().map(|&entry| entry.clone()).collect())
        .unwrap_or_default();

    node.self_seconds = matched.iter().map(|entry| entry.logged_seconds).sum();
    node.self_seconds_by_author = BTreeMap::new();
    for entry in &matched {
        *node
            .self_seconds_by_author
            .entry(entry.author.account_id.clone())
            .or_insert(0) += entry.logged_seconds;
    }

    node.entries = matched;
}

/// Key-wise sum of `from` into `into`
///
/// **Public** - the merge behind every per-author and per-day rollup
pub fn merge_seconds<K: Ord + Clone>(into: &mut BTreeMap<K, u64>, from: &BTreeMap<K, u64>) {
    for (key, seconds) in from {
        *into.entry(key.clone()).or_insert(0) += seconds;
    }
}
