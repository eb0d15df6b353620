//! Daily-breakdown rollup: per-day and per-author time on every node.
//!
//! Builds a fresh `TimesheetNode` tree from a hierarchy forest, then prunes
//! every subtree that has no time at all. Authors are listed only on the
//! node they logged time on; ancestors see their time through the rollup.

use super::rollup::{index_entries, merge_seconds, EntryIndex};
use crate::hierarchy::{flatten, HierarchyNode, TreeNode};
use crate::parser::schema::{project_key, IssueType, TimeEntry};
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Seconds per calendar day
pub type DailySeconds = BTreeMap<NaiveDate, u64>;

/// One contributor's direct time on one node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetAuthor {
    pub account_id: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub seconds_by_day: DailySeconds,
    pub total_seconds: u64,
}

/// Hierarchy node with per-day self and rollup time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetNode {
    pub issue_id: String,
    pub issue_key: String,
    pub summary: String,
    pub issue_type: IssueType,
    pub project_key: String,
    #[serde(default)]
    pub parent_key: Option<String>,
    pub children: Vec<TimesheetNode>,
    pub self_seconds_by_day: DailySeconds,
    pub self_total_seconds: u64,
    pub rollup_seconds_by_day: DailySeconds,
    pub rollup_total_seconds: u64,
    pub authors: Vec<TimesheetAuthor>,
}

impl TimesheetNode {
    /// Recompute rollups from self values and the (already final) children
    pub(crate) fn recompute_rollup(&mut self) {
        self.rollup_seconds_by_day = self.self_seconds_by_day.clone();
        self.rollup_total_seconds = self.self_total_seconds;

        for child in &self.children {
            merge_seconds(&mut self.rollup_seconds_by_day, &child.rollup_seconds_by_day);
            self.rollup_total_seconds += child.rollup_total_seconds;
        }
    }
}

impl TreeNode for TimesheetNode {
    fn children(&self) -> &[Self] {
        &self.children
    }
}

/// Convert a hierarchy forest into timesheet nodes with daily rollups
///
/// **Public** - main entry point for the daily view
///
/// # Arguments
/// * `forest` - Forest from `build_forest` (self time is taken from `entries`)
/// * `entries` - Time entries; those on keys outside the forest are ignored
///
/// # Returns
/// Pruned forest: every node left has a non-zero rollup total
pub fn aggregate_daily(forest: &[HierarchyNode], entries: &[TimeEntry]) -> Vec<TimesheetNode> {
    let index = index_entries(entries);

    let converted: Vec<TimesheetNode> = forest.iter().map(|root| convert(root, &index)).collect();
    let pruned = prune_empty(converted);

    debug!(
        "Daily rollup: {} roots with time out of {}",
        pruned.len(),
        forest.len()
    );
    pruned
}

/// Drop every node whose rollup total is zero, children first
///
/// **Public** - reused after author filtering
pub fn prune_empty(nodes: Vec<TimesheetNode>) -> Vec<TimesheetNode> {
    nodes
        .into_iter()
        .filter(|node| node.rollup_total_seconds > 0)
        .map(|mut node| {
            node.children = prune_empty(std::mem::take(&mut node.children));
            node
        })
        .collect()
}

/// Describe every node that breaks a rollup invariant
///
/// **Public** - used to validate reports read back from disk
///
/// Checks, per node: rollup total is self total plus child rollups, the
/// per-day rollup sums to the rollup total, self per-day sums to the self
/// total, and the rollup total is non-zero (pruned forest).
pub fn check_rollups(forest: &[TimesheetNode]) -> Vec<String> {
    let mut problems = Vec::new();

    for node in flatten(forest) {
        let children_total: u64 = node.children.iter().map(|c| c.rollup_total_seconds).sum();
        if node.rollup_total_seconds != node.self_total_seconds + children_total {
            problems.push(format!(
                "{}: rollup {} != self {} + children {}",
                node.issue_key, node.rollup_total_seconds, node.self_total_seconds, children_total
            ));
        }

        let rollup_days: u64 = node.rollup_seconds_by_day.values().sum();
        if rollup_days != node.rollup_total_seconds {
            problems.push(format!(
                "{}: daily rollup sums to {} but total is {}",
                node.issue_key, rollup_days, node.rollup_total_seconds
            ));
        }

        let self_days: u64 = node.self_seconds_by_day.values().sum();
        if self_days != node.self_total_seconds {
            problems.push(format!(
                "{}: daily self time sums to {} but total is {}",
                node.issue_key, self_days, node.self_total_seconds
            ));
        }

        if node.rollup_total_seconds == 0 {
            problems.push(format!("{}: empty node was not pruned", node.issue_key));
        }
    }

    problems
}

/// Build self values for a node, then roll up its converted children
fn convert(node: &HierarchyNode, index: &EntryIndex<'_>) -> TimesheetNode {
    let direct: &[&TimeEntry] = index
        .get(node.issue_key.as_str())
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    let mut self_seconds_by_day = DailySeconds::new();
    let mut self_total_seconds = 0;
    for entry in direct {
        *self_seconds_by_day.entry(entry.day()).or_insert(0) += entry.logged_seconds;
        self_total_seconds += entry.logged_seconds;
    }

    let children = node.children.iter().map(|child| convert(child, index)).collect();

    let mut converted = TimesheetNode {
        issue_id: node.issue_id.clone(),
        issue_key: node.issue_key.clone(),
        summary: node.summary.clone(),
        issue_type: node.issue_type.clone(),
        project_key: project_key(&node.issue_key).to_string(),
        parent_key: node.parent_key.clone(),
        children,
        self_seconds_by_day,
        self_total_seconds,
        rollup_seconds_by_day: DailySeconds::new(),
        rollup_total_seconds: 0,
        authors: group_by_author(direct),
    };
    converted.recompute_rollup();
    converted
}

/// One author record per contributor, in first-seen order
fn group_by_author(entries: &[&TimeEntry]) -> Vec<TimesheetAuthor> {
    let mut authors: Vec<TimesheetAuthor> = Vec::new();

    for entry in entries {
        let position = authors
            .iter()
            .position(|author| author.account_id == entry.author.account_id);

        let author = match position {
            Some(i) => &mut authors[i],
            None => {
                authors.push(TimesheetAuthor {
                    account_id: entry.author.account_id.clone(),
                    display_name: entry.author.display_name.clone(),
                    avatar_url: entry.author.avatar_url.clone(),
                    seconds_by_day: DailySeconds::new(),
                    total_seconds: 0,
                });
                let last = authors.len() - 1;
                &mut authors[last]
            }
        };

        *author.seconds_by_day.entry(entry.day()).or_insert(0) += entry.logged_seconds;
        author.total_seconds += entry.logged_seconds;
    }

    authors
}
