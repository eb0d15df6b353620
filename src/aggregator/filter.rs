//! Contributor scoping of a timesheet forest.
//!
//! Filtering never looks at source entries again: self time is rebuilt from
//! the retained author records, rollups are recomputed bottom-up from the
//! filtered values, and empty subtrees are pruned.

use super::daily::{prune_empty, DailySeconds, TimesheetNode};
use super::rollup::merge_seconds;
use crate::hierarchy::flatten;
use log::debug;
use std::collections::BTreeSet;

/// Restrict a timesheet forest to the selected contributors
///
/// **Public** - main entry point for author filtering
///
/// # Arguments
/// * `forest` - Output of `aggregate_daily` (or of a previous filter)
/// * `selected` - Account ids to keep; empty means no filter
///
/// # Returns
/// Rebuilt, pruned forest. Idempotent for a fixed selection.
pub fn filter_by_authors(
    forest: Vec<TimesheetNode>,
    selected: &BTreeSet<String>,
) -> Vec<TimesheetNode> {
    if selected.is_empty() {
        return forest;
    }

    debug!("Filtering timesheet to {} authors", selected.len());

    let filtered = forest
        .into_iter()
        .map(|node| filter_node(node, selected))
        .collect();

    prune_empty(filtered)
}

/// Every contributor with direct time anywhere in the forest
///
/// **Public** - the selection under which filtering is the identity
pub fn authors_in(forest: &[TimesheetNode]) -> BTreeSet<String> {
    flatten(forest)
        .into_iter()
        .flat_map(|node| node.authors.iter().map(|author| author.account_id.clone()))
        .collect()
}

fn filter_node(mut node: TimesheetNode, selected: &BTreeSet<String>) -> TimesheetNode {
    node.authors.retain(|author| selected.contains(&author.account_id));

    let mut self_seconds_by_day = DailySeconds::new();
    let mut self_total_seconds = 0;
    for author in &node.authors {
        merge_seconds(&mut self_seconds_by_day, &author.seconds_by_day);
        self_total_seconds += author.total_seconds;
    }
    node.self_seconds_by_day = self_seconds_by_day;
    node.self_total_seconds = self_total_seconds;

    node.children = std::mem::take(&mut node.children)
        .into_iter()
        .map(|child| filter_node(child, selected))
        .collect();

    node.recompute_rollup();
    node
}
