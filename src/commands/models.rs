use crate::parser::schema::DateRange;
use crate::utils::config::DEFAULT_REPORT_PATH;
use crate::utils::error::ParseError;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Arguments for the report command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ReportArgs {
    /// Work-item export (JSON)
    pub issues_path: PathBuf,

    /// Worklog export (JSON)
    pub worklogs_path: PathBuf,

    /// First day to include
    pub start: Option<NaiveDate>,

    /// Last day to include
    pub end: Option<NaiveDate>,

    /// Contributors to keep (empty = everyone)
    pub authors: Vec<String>,

    /// Output path for JSON report
    pub output_json: PathBuf,

    /// Embed the simple rollup forest (every node kept)
    pub include_hierarchy: bool,

    /// Embed the flat per-issue timesheet
    pub include_flat: bool,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for ReportArgs {
    fn default() -> Self {
        Self {
            issues_path: PathBuf::from("issues.json"),
            worklogs_path: PathBuf::from("worklogs.json"),
            start: None,
            end: None,
            authors: Vec::new(),
            output_json: PathBuf::from(DEFAULT_REPORT_PATH),
            include_hierarchy: false,
            include_flat: false,
            print_summary: false,
        }
    }
}

impl ReportArgs {
    /// Inclusive range when both ends are given
    pub fn date_range(&self) -> Result<Option<DateRange>, ParseError> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => DateRange::new(start, end).map(Some),
            _ => Ok(None),
        }
    }

    pub fn selected_authors(&self) -> BTreeSet<String> {
        self.authors.iter().cloned().collect()
    }
}
