//! Summary numbers for a timesheet forest.
//!
//! Contributors, per-day totals and the grand total are all derived from
//! the (possibly filtered) forest, so they always agree with the tree.

use super::daily::{DailySeconds, TimesheetNode};
use super::rollup::merge_seconds;
use crate::hierarchy::flatten;
use crate::parser::schema::{Author, TimeEntry};
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Totals reported next to the tree
///
/// **Public** - returned from summarize
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    /// Contributors sorted by display name
    pub users: Vec<Author>,

    /// Seconds per day across the whole forest
    pub daily_totals: DailySeconds,

    /// Seconds per contributor across the whole forest
    pub seconds_by_author: BTreeMap<String, u64>,

    pub grand_total: u64,

    pub root_count: usize,

    pub node_count: usize,
}

impl ReportSummary {
    /// Day with the most logged time (earliest on ties)
    pub fn busiest_day(&self) -> Option<(NaiveDate, u64)> {
        self.daily_totals
            .iter()
            .fold(None, |best, (&day, &seconds)| match best {
                Some((_, top)) if top >= seconds => best,
                _ => Some((day, seconds)),
            })
    }

    /// Get human-readable summary
    ///
    /// **Public** - for logging and debugging
    pub fn summary(&self) -> String {
        format!(
            "Total: {}s | Roots: {} | Nodes: {} | Contributors: {} | Days: {}",
            self.grand_total,
            self.root_count,
            self.node_count,
            self.users.len(),
            self.daily_totals.len()
        )
    }
}

/// Compute all summary numbers for a forest
///
/// **Public** - main entry point for metrics calculation
pub fn summarize(forest: &[TimesheetNode]) -> ReportSummary {
    let nodes = flatten(forest);
    debug!("Summarizing {} timesheet nodes", nodes.len());

    let mut seconds_by_author = BTreeMap::new();
    for node in &nodes {
        for author in &node.authors {
            *seconds_by_author.entry(author.account_id.clone()).or_insert(0) += author.total_seconds;
        }
    }

    ReportSummary {
        users: collect_users(forest),
        daily_totals: daily_totals(forest),
        seconds_by_author,
        grand_total: grand_total(forest),
        root_count: forest.len(),
        node_count: nodes.len(),
    }
}

/// Unique contributors, sorted by display name then account id
pub fn collect_users(forest: &[TimesheetNode]) -> Vec<Author> {
    let mut users: BTreeMap<String, Author> = BTreeMap::new();

    for node in flatten(forest) {
        for author in &node.authors {
            users.entry(author.account_id.clone()).or_insert_with(|| Author {
                account_id: author.account_id.clone(),
                display_name: author.display_name.clone(),
                avatar_url: author.avatar_url.clone(),
            });
        }
    }

    sort_users(users.into_values().collect())
}

/// Unique authors of a set of entries, sorted like `collect_users`
///
/// Unlike `collect_users` this includes contributors whose time fell on
/// items outside every forest.
pub fn users_from_entries(entries: &[TimeEntry]) -> Vec<Author> {
    let mut users: BTreeMap<&str, &Author> = BTreeMap::new();
    for entry in entries {
        users.entry(entry.author.account_id.as_str()).or_insert(&entry.author);
    }
    sort_users(users.into_values().cloned().collect())
}

fn sort_users(mut users: Vec<Author>) -> Vec<Author> {
    users.sort_by(|a, b| {
        a.display_name
            .cmp(&b.display_name)
            .then_with(|| a.account_id.cmp(&b.account_id))
    });
    users
}

/// Per-day sum of the root rollups
pub fn daily_totals(forest: &[TimesheetNode]) -> DailySeconds {
    let mut totals = DailySeconds::new();
    for root in forest {
        merge_seconds(&mut totals, &root.rollup_seconds_by_day);
    }
    totals
}

pub fn grand_total(forest: &[TimesheetNode]) -> u64 {
    forest.iter().map(|root| root.rollup_total_seconds).sum()
}
