//! Report JSON schema definitions.
//!
//! This module defines the structure of JSON files we write to disk.
//! Schema is versioned to allow future evolution.

use crate::aggregator::{summarize, FlatTimesheet, ReportSummary, TimesheetNode};
use crate::hierarchy::HierarchyNode;
use crate::parser::schema::{Author, DateRange};
use crate::utils::config::SCHEMA_VERSION;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Top-level report structure written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Schema version for compatibility checking
    pub version: String,

    /// Timestamp when the report was generated
    pub generated_at: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,

    /// Contributor filter applied to `nodes` (empty = everyone)
    #[serde(default)]
    pub selected_authors: Vec<String>,

    /// Everyone with worklogs in the period, before the contributor filter
    #[serde(default)]
    pub contributors: Vec<Author>,

    /// Daily timesheet forest, pruned
    pub nodes: Vec<TimesheetNode>,

    /// Simple rollup forest, every node kept
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchy: Option<Vec<HierarchyNode>>,

    /// Flat per-issue rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timesheet: Option<FlatTimesheet>,

    pub summary: ReportSummary,
}

/// Wrap a timesheet forest into a report
///
/// **Public** - used by commands to create final output
pub fn to_report(
    nodes: Vec<TimesheetNode>,
    range: Option<DateRange>,
    selected: &BTreeSet<String>,
) -> Report {
    let summary = summarize(&nodes);

    Report {
        version: SCHEMA_VERSION.to_string(),
        generated_at: Utc::now().to_rfc3339(),
        start_date: range.map(|r| r.start),
        end_date: range.map(|r| r.end),
        selected_authors: selected.iter().cloned().collect(),
        contributors: Vec::new(),
        nodes,
        hierarchy: None,
        timesheet: None,
        summary,
    }
}
