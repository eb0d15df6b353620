//! Input data shapes consumed by the hierarchy engine.
//!
//! These are the normalized forms produced by the input parser. The engine
//! never sees tracker-specific JSON, only these types.

use crate::utils::config::{
    DEFAULT_TYPE_PRIORITY, EPIC_PRIORITY, PROJECT_KEY_SEPARATOR, STORY_PRIORITY,
    SUBTASK_PRIORITY,
};
use crate::utils::error::ParseError;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Work item type. The set is open: anything unrecognized is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IssueType {
    Epic,
    Story,
    Task,
    Bug,
    Subtask,
    Other(String),
}

impl IssueType {
    /// Sibling ordering priority (lower sorts first)
    pub fn priority(&self) -> u8 {
        match self {
            IssueType::Epic => EPIC_PRIORITY,
            IssueType::Story => STORY_PRIORITY,
            IssueType::Task | IssueType::Bug => DEFAULT_TYPE_PRIORITY,
            IssueType::Subtask => SUBTASK_PRIORITY,
            IssueType::Other(_) => DEFAULT_TYPE_PRIORITY,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            IssueType::Epic => "Epic",
            IssueType::Story => "Story",
            IssueType::Task => "Task",
            IssueType::Bug => "Bug",
            IssueType::Subtask => "Sub-task",
            IssueType::Other(name) => name.as_str(),
        }
    }
}

impl FromStr for IssueType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Epic" => IssueType::Epic,
            "Story" => IssueType::Story,
            "Task" => IssueType::Task,
            "Bug" => IssueType::Bug,
            "Sub-task" | "Subtask" => IssueType::Subtask,
            other => IssueType::Other(other.to_string()),
        })
    }
}

impl From<String> for IssueType {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(issue_type) => issue_type,
            Err(never) => match never {},
        }
    }
}

impl From<IssueType> for String {
    fn from(value: IssueType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trackable unit of work (epic, story, task, bug, sub-task, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    pub id: String,

    /// Unique human-readable key, `PROJECT-NUMBER`
    pub key: String,

    #[serde(default)]
    pub summary: String,

    #[serde(rename = "type")]
    pub issue_type: IssueType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_key: Option<String>,
}

impl WorkItem {
    pub fn project_key(&self) -> &str {
        project_key(&self.key)
    }
}

/// Project part of an issue key: everything before the first separator
pub fn project_key(issue_key: &str) -> &str {
    issue_key
        .split_once(PROJECT_KEY_SEPARATOR)
        .map_or(issue_key, |(project, _)| project)
}

/// Contributor who logged time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub account_id: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Seconds spent by one contributor on one work item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub id: String,

    /// Key of the work item; not required to resolve
    pub issue_key: String,

    pub author: Author,

    pub logged_seconds: u64,

    /// Wall-clock time as written in the source, offset dropped
    pub started_at: NaiveDateTime,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl TimeEntry {
    /// Calendar day this entry is bucketed under
    pub fn day(&self) -> NaiveDate {
        self.started_at.date()
    }
}

/// Inclusive calendar-date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ParseError> {
        if start > end {
            return Err(ParseError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Every date in the range, in order
    pub fn days(&self) -> Vec<NaiveDate> {
        self.start
            .iter_days()
            .take_while(|day| *day <= self.end)
            .collect()
    }
}
