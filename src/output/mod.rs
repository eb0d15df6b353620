//! Output writers for report data.
//!
//! This module handles:
//! - The versioned JSON report schema
//! - Writing and reading JSON reports
//! - Text rendering of trees, totals and durations

pub mod json;
pub mod report;
pub mod text;

// Re-export main functions
pub use json::{read_report, report_to_string, write_report};
pub use report::{to_report, Report};
pub use text::{format_decimal_hours, format_duration, render_summary, render_tree};
