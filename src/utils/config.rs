//! Configuration and constants for the engine and the CLI.

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Default path for the JSON report
pub const DEFAULT_REPORT_PATH: &str = "report.json";

/// Separator between project key and issue number ("PROJ-42")
pub const PROJECT_KEY_SEPARATOR: char = '-';

/// Deepest hierarchy the builder will assemble.
/// Real trackers nest four or five levels; anything near this is malformed input.
pub const MAX_HIERARCHY_DEPTH: usize = 64;

// Sibling ordering: lower priority sorts first
pub const EPIC_PRIORITY: u8 = 0;
pub const STORY_PRIORITY: u8 = 1;
pub const DEFAULT_TYPE_PRIORITY: u8 = 2;
pub const SUBTASK_PRIORITY: u8 = 3;

/// Avatar size picked from tracker `avatarUrls` maps
pub const AVATAR_SIZE_KEY: &str = "24x24";

// Container field names accepted in input files (bare arrays also work)
pub const ISSUE_LIST_FIELDS: &[&str] = &["issues", "items", "workItems"];
pub const WORKLOG_LIST_FIELDS: &[&str] = &["worklogs", "entries", "timeEntries"];

/// Largest accepted `loggedSeconds` on a single entry (about 136 years)
///
/// Keeps every rollup sum far below `u64::MAX`.
pub const MAX_LOGGED_SECONDS: u64 = u32::MAX as u64;

/// Timestamp layouts tried after RFC 3339, in order
pub const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%z",
];

/// Offset-free layouts
pub const NAIVE_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];
