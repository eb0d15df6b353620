//! Flat per-issue timesheet, without hierarchy.

use super::daily::DailySeconds;
use crate::parser::schema::{project_key, TimeEntry, WorkItem};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One issue's row in the flat timesheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetRow {
    pub issue_key: String,
    pub issue_summary: String,
    pub issue_type: String,
    pub project_key: String,
    pub daily_seconds: DailySeconds,
    pub total_seconds: u64,
    /// accountId -> day -> seconds
    pub by_author: BTreeMap<String, DailySeconds>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatTimesheet {
    pub rows: Vec<TimesheetRow>,
    pub daily_totals: DailySeconds,
    pub grand_total: u64,
}

/// Group entries by issue, one row per issue key that has entries
///
/// Summary and type come from `items` when the key is known there and are
/// left empty otherwise. Rows are sorted by issue key.
pub fn flat_timesheet(items: &[WorkItem], entries: &[TimeEntry]) -> FlatTimesheet {
    let known: HashMap<&str, &WorkItem> =
        items.iter().map(|item| (item.key.as_str(), item)).collect();

    let mut rows: BTreeMap<&str, TimesheetRow> = BTreeMap::new();
    let mut sheet = FlatTimesheet::default();

    for entry in entries {
        let day = entry.day();
        let row = rows.entry(entry.issue_key.as_str()).or_insert_with(|| {
            let item = known.get(entry.issue_key.as_str());
            TimesheetRow {
                issue_key: entry.issue_key.clone(),
                issue_summary: item.map(|i| i.summary.clone()).unwrap_or_default(),
                issue_type: item.map(|i| i.issue_type.to_string()).unwrap_or_default(),
                project_key: project_key(&entry.issue_key).to_string(),
                daily_seconds: DailySeconds::new(),
                total_seconds: 0,
                by_author: BTreeMap::new(),
            }
        });

        *row.daily_seconds.entry(day).or_insert(0) += entry.logged_seconds;
        row.total_seconds += entry.logged_seconds;
        *row
            .by_author
            .entry(entry.author.account_id.clone())
            .or_default()
            .entry(day)
            .or_insert(0) += entry.logged_seconds;

        *sheet.daily_totals.entry(day).or_insert(0) += entry.logged_seconds;
        sheet.grand_total += entry.logged_seconds;
    }

    sheet.rows = rows.into_values().collect();
    debug!("Flat timesheet: {} rows, {}s total", sheet.rows.len(), sheet.grand_total);
    sheet
}
