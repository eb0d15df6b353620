//! Worklog Rollup
//!
//! Hierarchical time reporting for issue-tracker worklogs.
//! Work items are arranged into Epic > Story > Task > Sub-task trees
//! and logged time is rolled up the tree, by day and by contributor.
//!
//! This crate provides the core implementation for the
//! `worklog-rollup` CLI tool.
//!
//! ## Getting Started
//!
//! ```bash
//! worklog-rollup report --issues issues.json --worklogs worklogs.json \
//!     --start 2024-01-01 --end 2024-01-31 --summary
//! ```

pub mod aggregator;
pub mod commands;
pub mod hierarchy;
pub mod output;
pub mod parser;
pub mod utils;
