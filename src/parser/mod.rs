//! Input parsing and schema definitions.
//!
//! This module handles:
//! - Decoding work-item and worklog exports (flat or tracker REST shape)
//! - Normalizing worklog timestamps to calendar days
//! - Date-range and contributor filtering of time entries
//! - Defining the engine's input types

pub mod input;
pub mod schema;
pub mod timestamp;

// Re-export main types
pub use input::{
    filter_entries_by_authors, filter_entries_by_range, parse_time_entries, parse_work_items, read_time_entries,
    read_work_items,
};
pub use schema::{project_key, Author, DateRange, IssueType, TimeEntry, WorkItem};
pub use timestamp::{parse_date, parse_timestamp};
