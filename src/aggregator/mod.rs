//! Aggregation of time entries over the work-item hierarchy.
//!
//! This module turns a hierarchy forest plus time entries into:
//! - Simple per-author rollups (every node kept)
//! - Daily per-author timesheet trees (empty subtrees pruned)
//! - Contributor-filtered timesheet trees
//! - Summary numbers and a flat per-issue timesheet

pub mod daily;
pub mod filter;
pub mod metrics;
pub mod rollup;
pub mod timesheet;

// Re-export main types and functions
pub use daily::{
    aggregate_daily, check_rollups, prune_empty, DailySeconds, TimesheetAuthor, TimesheetNode,
};
pub use filter::{authors_in, filter_by_authors};
pub use metrics::{
    collect_users, daily_totals, grand_total, summarize, users_from_entries, ReportSummary,
};
pub use rollup::{aggregate, index_entries, merge_seconds};
pub use timesheet::{flat_timesheet, FlatTimesheet, TimesheetRow};
