//! Decoding of work-item and worklog exports into engine input.
//!
//! Two shapes are accepted for each dataset: the flat shape the engine
//! documents, and the issue-tracker REST shape (`fields.issuetype.name`,
//! `timeSpentSeconds`, `avatarUrls`, rich-text comments). Files may hold a
//! bare array or an object wrapping one.

use super::schema::{Author, DateRange, IssueType, TimeEntry, WorkItem};
use super::timestamp::parse_timestamp;
use crate::utils::config::{
    AVATAR_SIZE_KEY, ISSUE_LIST_FIELDS, MAX_LOGGED_SECONDS, WORKLOG_LIST_FIELDS,
};
use crate::utils::error::ParseError;
use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWorkItem {
    #[serde(default)]
    id: Value,
    key: String,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default, rename = "type", alias = "issueType")]
    issue_type: Option<String>,
    #[serde(default)]
    parent_key: Option<String>,
    #[serde(default)]
    fields: Option<RawIssueFields>,
}

#[derive(Debug, Deserialize)]
struct RawIssueFields {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    issuetype: Option<RawNamed>,
    #[serde(default)]
    parent: Option<RawParent>,
}

#[derive(Debug, Deserialize)]
struct RawNamed {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawParent {
    key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTimeEntry {
    #[serde(default)]
    id: Value,
    issue_key: String,
    author: RawAuthor,
    #[serde(alias = "timeSpentSeconds")]
    logged_seconds: u64,
    #[serde(alias = "started")]
    started_at: String,
    #[serde(default)]
    comment: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAuthor {
    account_id: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    avatar_url: Option<String>,
    #[serde(default)]
    avatar_urls: Option<BTreeMap<String, String>>,
}

/// Parse work items from raw JSON
///
/// # Errors
/// * `ParseError::InvalidFormat` - no item array found, or every element failed
pub fn parse_work_items(raw: &Value) -> Result<Vec<WorkItem>, ParseError> {
    let elements = extract_array(raw, ISSUE_LIST_FIELDS, "work items")?;
    let items = parse_elements(elements, "work item", convert_work_item)?;
    debug!("Parsed {} work items", items.len());
    Ok(items)
}

/// Parse time entries from raw JSON
///
/// # Errors
/// * `ParseError::InvalidFormat` - no entry array found, or every element failed
pub fn parse_time_entries(raw: &Value) -> Result<Vec<TimeEntry>, ParseError> {
    let elements = extract_array(raw, WORKLOG_LIST_FIELDS, "time entries")?;
    let entries = parse_elements(elements, "time entry", convert_time_entry)?;
    debug!("Parsed {} time entries", entries.len());
    Ok(entries)
}

/// Read and parse a work-item export file
pub fn read_work_items(path: impl AsRef<Path>) -> Result<Vec<WorkItem>, ParseError> {
    parse_work_items(&read_json(path.as_ref())?)
}

/// Read and parse a worklog export file
pub fn read_time_entries(path: impl AsRef<Path>) -> Result<Vec<TimeEntry>, ParseError> {
    parse_time_entries(&read_json(path.as_ref())?)
}

/// Keep entries whose calendar day lies inside the (inclusive) range
pub fn filter_entries_by_range(entries: Vec<TimeEntry>, range: &DateRange) -> Vec<TimeEntry> {
    let before = entries.len();
    let kept: Vec<TimeEntry> = entries
        .into_iter()
        .filter(|entry| range.contains(entry.day()))
        .collect();

    debug!(
        "Date range {}..={} kept {} of {} entries",
        range.start,
        range.end,
        kept.len(),
        before
    );
    kept
}

/// Keep entries logged by the selected contributors; empty means everyone
pub fn filter_entries_by_authors(
    entries: Vec<TimeEntry>,
    selected: &BTreeSet<String>,
) -> Vec<TimeEntry> {
    if selected.is_empty() {
        return entries;
    }
    entries
        .into_iter()
        .filter(|entry| selected.contains(&entry.author.account_id))
        .collect()
}

fn read_json(path: &Path) -> Result<Value, ParseError> {
    debug!("Reading input from: {}", path.display());
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Locate the element array: the value itself, or a known container field
fn extract_array<'a>(
    raw: &'a Value,
    fields: &[&str],
    label: &str,
) -> Result<&'a [Value], ParseError> {
    match raw {
        Value::Array(elements) => Ok(elements),
        Value::Object(obj) => fields
            .iter()
            .find_map(|field| obj.get(*field).and_then(Value::as_array))
            .map(Vec::as_slice)
            .ok_or_else(|| {
                ParseError::InvalidFormat(format!(
                    "Expected an array of {} or an object with one of: {}",
                    label,
                    fields.join(", ")
                ))
            }),
        _ => Err(ParseError::InvalidFormat(format!(
            "{} must be a JSON array or object",
            label
        ))),
    }
}

/// Convert each element, skipping (and logging) the malformed ones
fn parse_elements<T>(
    elements: &[Value],
    label: &str,
    convert: impl Fn(&Value) -> Result<T, ParseError>,
) -> Result<Vec<T>, ParseError> {
    let mut parsed = Vec::with_capacity(elements.len());

    for (index, element) in elements.iter().enumerate() {
        match convert(element) {
            Ok(value) => parsed.push(value),
            Err(e) => warn!("Skipping {} {}: {}", label, index, e),
        }
    }

    if parsed.is_empty() && !elements.is_empty() {
        return Err(ParseError::InvalidFormat(format!(
            "All {} elements failed to parse",
            label
        )));
    }

    Ok(parsed)
}

fn convert_work_item(value: &Value) -> Result<WorkItem, ParseError> {
    let raw: RawWorkItem = serde_json::from_value(value.clone())?;
    let fields = raw.fields.as_ref();

    let issue_type = raw
        .issue_type
        .or_else(|| fields.and_then(|f| f.issuetype.as_ref()).map(|t| t.name.clone()))
        .ok_or_else(|| ParseError::InvalidFormat(format!("{} has no issue type", raw.key)))?;

    let summary = raw
        .summary
        .or_else(|| fields.and_then(|f| f.summary.clone()))
        .unwrap_or_default();

    let parent_key = raw
        .parent_key
        .or_else(|| fields.and_then(|f| f.parent.as_ref()).map(|p| p.key.clone()))
        .filter(|key| !key.is_empty());

    Ok(WorkItem {
        id: id_to_string(&raw.id, &raw.key),
        key: raw.key,
        summary,
        issue_type: IssueType::from(issue_type),
        parent_key,
    })
}

fn convert_time_entry(value: &Value) -> Result<TimeEntry, ParseError> {
    let raw: RawTimeEntry = serde_json::from_value(value.clone())?;
    if raw.logged_seconds > MAX_LOGGED_SECONDS {
        return Err(ParseError::InvalidFormat(format!(
            "loggedSeconds {} exceeds {}",
            raw.logged_seconds, MAX_LOGGED_SECONDS
        )));
    }
    let started_at = parse_timestamp(&raw.started_at)?;

    let avatar_url = raw.author.avatar_url.or_else(|| {
        raw.author
            .avatar_urls
            .and_then(|urls| urls.get(AVATAR_SIZE_KEY).cloned())
    });

    Ok(TimeEntry {
        id: id_to_string(&raw.id, ""),
        issue_key: raw.issue_key,
        author: Author {
            account_id: raw.author.account_id,
            display_name: raw.author.display_name,
            avatar_url,
        },
        logged_seconds: raw.logged_seconds,
        started_at,
        comment: raw.comment.as_ref().and_then(extract_comment_text),
    })
}

/// Ids arrive as strings or numbers depending on the exporter
fn id_to_string(id: &Value, fallback: &str) -> String {
    match id {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => fallback.to_string(),
    }
}

/// Plain text of a comment: either a string or a rich-text document whose
/// blocks hold inline `text` nodes. Blank comments become `None`.
pub fn extract_comment_text(comment: &Value) -> Option<String> {
    let text = match comment {
        Value::String(s) => s.trim().to_string(),
        Value::Object(doc) => doc
            .get("content")
            .and_then(Value::as_array)?
            .iter()
            .map(|block| {
                block
                    .get("content")
                    .and_then(Value::as_array)
                    .map(|inlines| {
                        inlines
                            .iter()
                            .filter_map(|inline| inline.get("text").and_then(Value::as_str))
                            .collect::<String>()
                    })
                    .unwrap_or_default()
            })
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string(),
        _ => return None,
    };

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_flat_work_items() {
        let raw = json!([
            {"id": "1", "key": "E-1", "summary": "Epic", "type": "Epic"},
            {"id": "2", "key": "S-1", "summary": "Story", "type": "Story", "parentKey": "E-1"}
        ]);

        let items = parse_work_items(&raw).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].parent_key.as_deref(), Some("E-1"));
        assert_eq!(items[0].issue_type, IssueType::Epic);
    }

    #[test]
    fn test_parse_tracker_shaped_work_items() {
        let raw = json!({"issues": [
            {"id": 10001, "key": "X-2", "fields": {
                "summary": "Child", "issuetype": {"name": "Sub-task"}, "parent": {"id": "9", "key": "X-1"}
            }}
        ]});

        let items = parse_work_items(&raw).unwrap();
        assert_eq!(items[0].id, "10001");
        assert_eq!(items[0].issue_type, IssueType::Subtask);
        assert_eq!(items[0].parent_key.as_deref(), Some("X-1"));
        assert_eq!(items[0].summary, "Child");
    }

    #[test]
    fn test_empty_parent_key_is_none() {
        let raw = json!([{"id": "1", "key": "A-1", "type": "Task", "parentKey": ""}]);
        let items = parse_work_items(&raw).unwrap();
        assert!(items[0].parent_key.is_none());
    }

    #[test]
    fn test_parse_tracker_worklog() {
        let raw = json!({"worklogs": [{
            "id": "77",
            "issueKey": "S-1",
            "author": {
                "accountId": "alice",
                "displayName": "Alice",
                "avatarUrls": {"24x24": "https://example.test/a24.png", "48x48": "https://example.test/a48.png"}
            },
            "timeSpentSeconds": 3600,
            "started": "2024-01-01T09:00:00.000+0000",
            "comment": {"type": "doc", "content": [
                {"type": "paragraph", "content": [{"type": "text", "text": "Wrote "}, {"type": "text", "text": "tests"}]},
                {"type": "paragraph", "content": [{"type": "text", "text": "Reviewed"}]}
            ]}
        }]});

        let entries = parse_time_entries(&raw).unwrap();
        let entry = &entries[0];
        assert_eq!(entry.logged_seconds, 3600);
        assert_eq!(entry.day().to_string(), "2024-01-01");
        assert_eq!(entry.author.avatar_url.as_deref(), Some("https://example.test/a24.png"));
        assert_eq!(entry.comment.as_deref(), Some("Wrote tests\nReviewed"));
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let raw = json!([
            {"id": "1", "issueKey": "A-1", "author": {"accountId": "a"}, "loggedSeconds": 60, "startedAt": "2024-01-01"},
            {"id": "2", "issueKey": "A-1", "author": {"accountId": "a"}, "loggedSeconds": -5, "startedAt": "2024-01-01"}
        ]);

        let entries = parse_time_entries(&raw).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_oversized_logged_seconds_are_rejected() {
        let huge = u64::MAX / 2 + 1;
        let raw = json!([
            {"id": "1", "issueKey": "A-1", "author": {"accountId": "a"}, "loggedSeconds": MAX_LOGGED_SECONDS, "startedAt": "2024-01-01"},
            {"id": "2", "issueKey": "A-1", "author": {"accountId": "a"}, "loggedSeconds": huge, "startedAt": "2024-01-01"},
            {"id": "3", "issueKey": "A-1", "author": {"accountId": "a"}, "loggedSeconds": huge, "startedAt": "2024-01-01"}
        ]);

        let entries = parse_time_entries(&raw).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].logged_seconds, MAX_LOGGED_SECONDS);
    }

    #[test]
    fn test_filter_entries_by_authors() {
        let raw = json!([
            {"id": "1", "issueKey": "A-1", "author": {"accountId": "a"}, "loggedSeconds": 60, "startedAt": "2024-01-01"},
            {"id": "2", "issueKey": "A-1", "author": {"accountId": "b"}, "loggedSeconds": 60, "startedAt": "2024-01-01"}
        ]);
        let entries = parse_time_entries(&raw).unwrap();

        assert_eq!(filter_entries_by_authors(entries.clone(), &BTreeSet::new()).len(), 2);
        let kept = filter_entries_by_authors(entries, &BTreeSet::from(["b".to_string()]));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "2");
    }

    #[test]
    fn test_all_malformed_is_error() {
        let raw = json!([{"key": "A-1"}]);
        assert!(parse_work_items(&raw).is_err());
        assert!(parse_work_items(&json!("nope")).is_err());
    }

    #[test]
    fn test_blank_comment_is_none() {
        assert_eq!(extract_comment_text(&json!("   ")), None);
        assert_eq!(extract_comment_text(&json!({"content": []})), None);
    }
}
